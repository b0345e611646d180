use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::config::TtsConfig;
use crate::speech_service::SpeechServiceClient;

use super::client::TTSClient;
use super::interface::TTSInterface;

/// Factory for creating the TTS client from configuration.
pub struct TTSFactory;

impl TTSFactory {
    pub fn create_tts(
        tts_config: &TtsConfig,
        speech_service: Arc<SpeechServiceClient>,
    ) -> Result<Arc<dyn TTSInterface>> {
        info!("Initializing TTS via speech service at {}", tts_config.service_url);
        let client = TTSClient::new(speech_service, tts_config.voice.clone());
        Ok(Arc::new(client))
    }
}
