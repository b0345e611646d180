use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One translation request: effective source (may be the "auto" sentinel),
/// target, and the literal text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub translated_text: String,
}

/// Translation endpoint seam. The production implementation talks to the
/// remote GTX endpoint; tests substitute their own.
#[async_trait]
pub trait TranslateInterface: Send + Sync {
    async fn translate(&self, request: TranslateRequest) -> anyhow::Result<TranslateResponse>;
}
