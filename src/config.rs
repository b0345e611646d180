use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub system_config: SystemConfig,
    #[serde(default)]
    pub translator_config: TranslatorConfig,
    #[serde(default)]
    pub tts_config: TtsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    /// Base URL of the translation endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Client tag the endpoint expects in the query string.
    #[serde(default = "default_client_tag")]
    pub client_tag: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsConfig {
    /// Base URL of the speech sidecar service.
    #[serde(default = "default_tts_service_url")]
    pub service_url: String,
    /// Engine voice override; the engine picks per-language defaults when
    /// absent.
    #[serde(default)]
    pub voice: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    12393
}

fn default_endpoint() -> String {
    "https://translate.googleapis.com/translate_a/single".to_string()
}

fn default_client_tag() -> String {
    "gtx".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_tts_service_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            client_tag: default_client_tag(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            service_url: default_tts_service_url(),
            voice: None,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;

        // Determine file type by extension
        let path_lower = path.to_lowercase();
        if path_lower.ends_with(".json") {
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            let config: Config = serde_yaml::from_str(&content)?;
            Ok(config)
        }
    }
}
