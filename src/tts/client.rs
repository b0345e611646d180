use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error};

use crate::speech_service::{SpeakRequest, SpeechServiceClient};

use super::interface::TTSInterface;

/// TTS client that forwards speak requests to the speech sidecar service.
pub struct TTSClient {
    speech_service: Arc<SpeechServiceClient>,
    default_voice: Option<String>,
}

impl TTSClient {
    pub fn new(speech_service: Arc<SpeechServiceClient>, default_voice: Option<String>) -> Self {
        Self {
            speech_service,
            default_voice,
        }
    }
}

#[async_trait]
impl TTSInterface for TTSClient {
    async fn speak(&self, text: &str, language: &str) -> Result<(), anyhow::Error> {
        let request = SpeakRequest {
            text: text.to_string(),
            language: language.to_string(),
            voice: self.default_voice.clone(),
        };

        debug!("Sending speak request: language={} chars={}", language, text.chars().count());

        let response = self.speech_service.speak(request).await?;
        if response.success {
            Ok(())
        } else {
            let error_msg = response.error.unwrap_or_else(|| "Unknown error".to_string());
            error!("Speech synthesis failed: {}", error_msg);
            Err(anyhow::anyhow!("Speech synthesis failed: {}", error_msg))
        }
    }
}
