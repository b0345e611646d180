use async_trait::async_trait;

/// TTS interface trait - the synthesis engine lives in the speech sidecar.
#[async_trait]
pub trait TTSInterface: Send + Sync {
    /// Speak `text` aloud in the given language.
    ///
    /// # Arguments
    /// * `text` - The text to synthesize
    /// * `language` - Language code used to pick the engine voice
    async fn speak(&self, text: &str, language: &str) -> Result<(), anyhow::Error>;
}
