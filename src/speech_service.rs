use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// HTTP client for the speech sidecar service that performs the actual
/// text-to-speech synthesis. The engine itself is a black box.
#[derive(Debug, Clone)]
pub struct SpeechServiceClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SpeakRequest {
    pub text: String,
    pub language: String,
    pub voice: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SpeakResponse {
    pub success: bool,
    pub error: Option<String>,
}

impl SpeechServiceClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Ask the engine to speak `request.text` aloud.
    pub async fn speak(&self, request: SpeakRequest) -> Result<SpeakResponse> {
        let response = self
            .client
            .post(format!("{}/speak", self.base_url))
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response)
    }

    pub async fn health_check(&self) -> Result<bool> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(response.status().is_success())
    }
}
