use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::Config;
use crate::detect::{DetectInterface, WhatlangDetector};
use crate::session::ViewState;
use crate::speech_service::SpeechServiceClient;
use crate::translate::{GtxTranslateClient, TranslateInterface};
use crate::tts::{TTSFactory, TTSInterface};

/// Handle to one client's translate view state.
pub type SessionHandle = Arc<RwLock<ViewState>>;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub sessions: Arc<DashMap<String, SessionHandle>>,
    pub translator: Arc<dyn TranslateInterface>,
    pub detector: Arc<dyn DetectInterface>,
    pub tts: Arc<dyn TTSInterface>,
    pub speech_service: Arc<SpeechServiceClient>,
    /// At most one in-flight translation per client; spawning a new request
    /// aborts the previous one.
    pub translation_tasks: Arc<DashMap<String, tokio::task::AbortHandle>>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let speech_service = Arc::new(SpeechServiceClient::new(
            std::env::var("SPEECH_SERVICE_URL")
                .unwrap_or_else(|_| config.tts_config.service_url.clone()),
        ));
        let translator = Arc::new(GtxTranslateClient::new(&config.translator_config)?);
        let tts = TTSFactory::create_tts(&config.tts_config, speech_service.clone())?;

        Ok(Self {
            config,
            sessions: Arc::new(DashMap::new()),
            translator,
            detector: Arc::new(WhatlangDetector),
            tts,
            speech_service,
            translation_tasks: Arc::new(DashMap::new()),
        })
    }

    pub fn generate_client_uid(&self) -> String {
        Uuid::new_v4().to_string()
    }

    /// Create and register a fresh session for a new connection.
    pub fn create_session(&self, client_uid: &str) -> SessionHandle {
        let session: SessionHandle = Arc::new(RwLock::new(ViewState::default()));
        self.sessions.insert(client_uid.to_string(), session.clone());
        session
    }

    /// Drop a session and abort any translation still in flight for it.
    pub fn remove_session(&self, client_uid: &str) {
        self.sessions.remove(client_uid);
        if let Some((_, handle)) = self.translation_tasks.remove(client_uid) {
            handle.abort();
        }
    }
}
