use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::TranslatorConfig;

use super::interface::{TranslateInterface, TranslateRequest, TranslateResponse};

/// The one failure kind the view cares about: the request did not produce a
/// usable translation. Callers log it and keep the previous result.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("translation request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("translation response had an unexpected shape")]
    MalformedPayload,
}

/// Client for the unofficial Google Translate (GTX) endpoint.
///
/// The endpoint answers a GET with a nested array; the translated string sits
/// at `payload[0][0][0]`.
pub struct GtxTranslateClient {
    client: Client,
    endpoint: String,
    client_tag: String,
}

impl GtxTranslateClient {
    pub fn new(config: &TranslatorConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            client_tag: config.client_tag.clone(),
        })
    }

    fn request_url(&self, request: &TranslateRequest) -> String {
        format!(
            "{}?client={}&sl={}&tl={}&dt=t&q={}",
            self.endpoint,
            self.client_tag,
            request.source_lang,
            request.target_lang,
            urlencoding::encode(&request.text)
        )
    }
}

/// First segment of the nested response payload.
fn extract_translation(payload: &Value) -> Option<String> {
    payload
        .get(0)?
        .get(0)?
        .get(0)?
        .as_str()
        .map(|s| s.to_string())
}

#[async_trait]
impl TranslateInterface for GtxTranslateClient {
    async fn translate(&self, request: TranslateRequest) -> anyhow::Result<TranslateResponse> {
        let url = self.request_url(&request);
        debug!(
            "Requesting translation: sl={} tl={} chars={}",
            request.source_lang,
            request.target_lang,
            request.text.chars().count()
        );

        let payload: Value = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(TranslateError::Request)?
            .error_for_status()
            .map_err(TranslateError::Request)?
            .json()
            .await
            .map_err(TranslateError::Request)?;

        let translated_text =
            extract_translation(&payload).ok_or(TranslateError::MalformedPayload)?;
        Ok(TranslateResponse { translated_text })
    }
}
