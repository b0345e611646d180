use serde_json::{json, Value};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{error, warn};

use crate::languages;
use crate::session::{apply, Effect, ViewEvent, ViewState};
use crate::state::{AppState, SessionHandle};
use crate::translate::TranslateRequest;

/// Dispatch one client message against its session.
pub async fn handle_message(
    state: &AppState,
    client_uid: &str,
    text: &str,
    sender: &UnboundedSender<String>,
) -> anyhow::Result<()> {
    let msg: Value = serde_json::from_str(text)?;
    let msg_type = msg.get("type").and_then(|v| v.as_str());

    match msg_type {
        Some("input-text") => {
            let input = msg.get("text").and_then(|v| v.as_str()).unwrap_or("");
            dispatch_event(state, client_uid, ViewEvent::InputChanged(input.to_string()), sender)
                .await?;
        }
        Some("set-input-language") => {
            if let Some(language) = msg.get("language").and_then(|v| v.as_str()) {
                dispatch_event(
                    state,
                    client_uid,
                    ViewEvent::InputLanguageSelected(language.to_string()),
                    sender,
                )
                .await?;
            }
        }
        Some("set-target-language") => {
            if let Some(language) = msg.get("language").and_then(|v| v.as_str()) {
                dispatch_event(
                    state,
                    client_uid,
                    ViewEvent::TargetLanguageSelected(language.to_string()),
                    sender,
                )
                .await?;
            }
        }
        Some("toggle-input-picker") => {
            let open = msg.get("open").and_then(|v| v.as_bool()).unwrap_or(false);
            dispatch_event(state, client_uid, ViewEvent::InputPickerToggled(open), sender).await?;
        }
        Some("toggle-target-picker") => {
            let open = msg.get("open").and_then(|v| v.as_bool()).unwrap_or(false);
            dispatch_event(state, client_uid, ViewEvent::TargetPickerToggled(open), sender)
                .await?;
        }
        Some("swap-languages") => {
            dispatch_event(state, client_uid, ViewEvent::LanguagesSwapped, sender).await?;
        }
        Some("speak") => {
            handle_speak(state, client_uid).await?;
        }
        Some("fetch-languages") => {
            let _ = sender.send(languages_message());
        }
        _ => {
            warn!("Unknown message type: {:?}", msg_type);
        }
    }

    Ok(())
}

/// Apply a UI event, run the effects it produced, and push the new snapshot.
pub async fn dispatch_event(
    state: &AppState,
    client_uid: &str,
    event: ViewEvent,
    sender: &UnboundedSender<String>,
) -> anyhow::Result<()> {
    let session = state
        .sessions
        .get(client_uid)
        .map(|entry| entry.clone())
        .ok_or_else(|| anyhow::anyhow!("No session for client {}", client_uid))?;

    let effects = {
        let mut view = session.write().await;
        apply(&mut view, event)
    };

    run_effects(state, client_uid, &session, effects, sender).await;

    let view = session.read().await;
    let _ = sender.send(view_state_message(&view));
    Ok(())
}

/// Execute transition effects. Detection runs inline (it may supersede the
/// pending translation); at most one translation request survives, the one
/// with the newest revision.
async fn run_effects(
    state: &AppState,
    client_uid: &str,
    session: &SessionHandle,
    effects: Vec<Effect>,
    sender: &UnboundedSender<String>,
) {
    let mut pending: Option<(u64, TranslateRequest)> = None;

    for effect in effects {
        match effect {
            Effect::CancelInFlight => abort_in_flight(state, client_uid),
            Effect::Translate {
                revision,
                text,
                source,
                target,
            } => {
                let request = TranslateRequest {
                    text,
                    source_lang: source,
                    target_lang: target,
                };
                if pending.as_ref().map_or(true, |(r, _)| revision > *r) {
                    pending = Some((revision, request));
                }
            }
            Effect::Detect { text } => {
                if let Some(code) = state.detector.detect(&text) {
                    let follow_up = {
                        let mut view = session.write().await;
                        apply(&mut view, ViewEvent::LanguageDetected(code))
                    };
                    for effect in follow_up {
                        if let Effect::Translate {
                            revision,
                            text,
                            source,
                            target,
                        } = effect
                        {
                            let request = TranslateRequest {
                                text,
                                source_lang: source,
                                target_lang: target,
                            };
                            if pending.as_ref().map_or(true, |(r, _)| revision > *r) {
                                pending = Some((revision, request));
                            }
                        }
                    }
                }
            }
        }
    }

    if let Some((revision, request)) = pending {
        spawn_translation(state, client_uid, session.clone(), revision, request, sender.clone());
    }
}

/// Issue one translation request in the background. The previous in-flight
/// request is aborted; the revision check catches the remainder.
fn spawn_translation(
    state: &AppState,
    client_uid: &str,
    session: SessionHandle,
    revision: u64,
    request: TranslateRequest,
    sender: UnboundedSender<String>,
) {
    abort_in_flight(state, client_uid);

    let translator = state.translator.clone();
    let task = tokio::spawn(async move {
        match translator.translate(request).await {
            Ok(response) => {
                let mut view = session.write().await;
                apply(
                    &mut view,
                    ViewEvent::TranslationArrived {
                        revision,
                        text: response.translated_text,
                    },
                );
                let _ = sender.send(view_state_message(&view));
            }
            Err(e) => {
                // Keep the previous translation; no retry, nothing surfaced.
                error!("Error translating text: {}", e);
            }
        }
    });

    state
        .translation_tasks
        .insert(client_uid.to_string(), task.abort_handle());
}

fn abort_in_flight(state: &AppState, client_uid: &str) {
    if let Some((_, handle)) = state.translation_tasks.remove(client_uid) {
        handle.abort();
    }
}

/// Speak the current translation through the TTS engine.
async fn handle_speak(state: &AppState, client_uid: &str) -> anyhow::Result<()> {
    let session = state
        .sessions
        .get(client_uid)
        .map(|entry| entry.clone())
        .ok_or_else(|| anyhow::anyhow!("No session for client {}", client_uid))?;

    let (text, language) = {
        let view = session.read().await;
        (view.translated_text.clone(), view.target_language.clone())
    };

    if text.is_empty() {
        warn!("No translated text to speak");
        return Ok(());
    }

    if let Err(e) = state.tts.speak(&text, &language).await {
        error!("Error speaking translation: {}", e);
    }
    Ok(())
}

pub fn view_state_message(view: &ViewState) -> String {
    json!({
        "type": "view-state",
        "state": view,
    })
    .to_string()
}

pub fn languages_message() -> String {
    let mut payload = languages::languages_payload();
    payload["type"] = json!("languages");
    payload.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::detect::DetectInterface;
    use crate::speech_service::SpeechServiceClient;
    use crate::translate::{TranslateInterface, TranslateResponse};
    use crate::tts::TTSInterface;
    use async_trait::async_trait;
    use dashmap::DashMap;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::sync::mpsc;

    /// Canned translator: responses (and optional delays) keyed by input text.
    struct StubTranslator {
        replies: HashMap<String, (String, u64)>,
        calls: Mutex<Vec<TranslateRequest>>,
    }

    impl StubTranslator {
        fn new(replies: &[(&str, &str, u64)]) -> Self {
            Self {
                replies: replies
                    .iter()
                    .map(|(input, output, delay)| {
                        (input.to_string(), (output.to_string(), *delay))
                    })
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TranslateInterface for StubTranslator {
        async fn translate(&self, request: TranslateRequest) -> anyhow::Result<TranslateResponse> {
            self.calls.lock().unwrap().push(request.clone());
            let (text, delay_ms) = self
                .replies
                .get(&request.text)
                .cloned()
                .unwrap_or_else(|| (format!("translated:{}", request.text), 0));
            if delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
            Ok(TranslateResponse { translated_text: text })
        }
    }

    struct CountingDetector {
        result: Option<String>,
        calls: Mutex<Vec<String>>,
    }

    impl DetectInterface for CountingDetector {
        fn detect(&self, text: &str) -> Option<String> {
            self.calls.lock().unwrap().push(text.to_string());
            self.result.clone()
        }
    }

    struct RecordingTts {
        calls: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl TTSInterface for RecordingTts {
        async fn speak(&self, text: &str, language: &str) -> Result<(), anyhow::Error> {
            self.calls
                .lock()
                .unwrap()
                .push((text.to_string(), language.to_string()));
            Ok(())
        }
    }

    fn test_state(
        translator: Arc<dyn TranslateInterface>,
        detector: Arc<dyn DetectInterface>,
        tts: Arc<dyn TTSInterface>,
    ) -> AppState {
        AppState {
            config: Config::default(),
            sessions: Arc::new(DashMap::new()),
            translator,
            detector,
            tts,
            speech_service: Arc::new(SpeechServiceClient::new("http://localhost:0".into())),
            translation_tasks: Arc::new(DashMap::new()),
        }
    }

    fn silent_detector() -> Arc<CountingDetector> {
        Arc::new(CountingDetector {
            result: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    async fn wait_for_translation(session: &SessionHandle, expected: &str) -> bool {
        for _ in 0..200 {
            if session.read().await.translated_text == expected {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        false
    }

    #[tokio::test]
    async fn translation_result_lands_in_state() {
        let translator = Arc::new(StubTranslator::new(&[("hola", "hello", 0)]));
        let state = test_state(
            translator.clone(),
            silent_detector(),
            Arc::new(RecordingTts { calls: Mutex::new(Vec::new()) }),
        );
        let session = state.create_session("c1");
        let (tx, _rx) = mpsc::unbounded_channel();

        handle_message(&state, "c1", r#"{"type":"input-text","text":"hola"}"#, &tx)
            .await
            .unwrap();

        assert!(wait_for_translation(&session, "hello").await);
        let calls = translator.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].source_lang, "auto");
        assert_eq!(calls[0].target_lang, "en");
    }

    #[tokio::test]
    async fn blank_input_clears_previous_translation() {
        let translator = Arc::new(StubTranslator::new(&[("hola", "hello", 0)]));
        let state = test_state(
            translator,
            silent_detector(),
            Arc::new(RecordingTts { calls: Mutex::new(Vec::new()) }),
        );
        let session = state.create_session("c1");
        let (tx, _rx) = mpsc::unbounded_channel();

        handle_message(&state, "c1", r#"{"type":"input-text","text":"hola"}"#, &tx)
            .await
            .unwrap();
        assert!(wait_for_translation(&session, "hello").await);

        handle_message(&state, "c1", r#"{"type":"input-text","text":"   "}"#, &tx)
            .await
            .unwrap();
        assert!(session.read().await.translated_text.is_empty());
    }

    #[tokio::test]
    async fn superseded_response_cannot_overwrite_newer_one() {
        let translator = Arc::new(StubTranslator::new(&[
            ("slow early input", "SLOW", 150),
            ("quick", "QUICK", 0),
        ]));
        let state = test_state(
            translator,
            silent_detector(),
            Arc::new(RecordingTts { calls: Mutex::new(Vec::new()) }),
        );
        let session = state.create_session("c1");
        let (tx, _rx) = mpsc::unbounded_channel();

        handle_message(&state, "c1", r#"{"type":"input-text","text":"slow early input"}"#, &tx)
            .await
            .unwrap();
        handle_message(&state, "c1", r#"{"type":"input-text","text":"quick"}"#, &tx)
            .await
            .unwrap();

        assert!(wait_for_translation(&session, "QUICK").await);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(session.read().await.translated_text, "QUICK");
    }

    #[tokio::test]
    async fn detection_not_invoked_below_threshold() {
        let detector = silent_detector();
        let state = test_state(
            Arc::new(StubTranslator::new(&[])),
            detector.clone(),
            Arc::new(RecordingTts { calls: Mutex::new(Vec::new()) }),
        );
        state.create_session("c1");
        let (tx, _rx) = mpsc::unbounded_channel();

        handle_message(&state, "c1", r#"{"type":"input-text","text":"short"}"#, &tx)
            .await
            .unwrap();
        assert!(detector.calls.lock().unwrap().is_empty());

        handle_message(&state, "c1", r#"{"type":"input-text","text":"long enough text"}"#, &tx)
            .await
            .unwrap();
        assert_eq!(detector.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn detection_updates_auto_input_language() {
        let detector = Arc::new(CountingDetector {
            result: Some("fr".to_string()),
            calls: Mutex::new(Vec::new()),
        });
        let state = test_state(
            Arc::new(StubTranslator::new(&[])),
            detector,
            Arc::new(RecordingTts { calls: Mutex::new(Vec::new()) }),
        );
        let session = state.create_session("c1");
        let (tx, _rx) = mpsc::unbounded_channel();

        handle_message(
            &state,
            "c1",
            r#"{"type":"input-text","text":"bonjour tout le monde"}"#,
            &tx,
        )
        .await
        .unwrap();

        let view = session.read().await;
        assert_eq!(view.input_language, "fr");
        assert_eq!(view.detected_language.as_deref(), Some("fr"));
    }

    #[tokio::test]
    async fn speak_with_empty_translation_makes_no_engine_call() {
        let tts = Arc::new(RecordingTts { calls: Mutex::new(Vec::new()) });
        let state = test_state(
            Arc::new(StubTranslator::new(&[])),
            silent_detector(),
            tts.clone(),
        );
        state.create_session("c1");
        let (tx, _rx) = mpsc::unbounded_channel();

        handle_message(&state, "c1", r#"{"type":"speak"}"#, &tx)
            .await
            .unwrap();
        assert!(tts.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn speak_passes_translation_and_target_language() {
        let tts = Arc::new(RecordingTts { calls: Mutex::new(Vec::new()) });
        let state = test_state(
            Arc::new(StubTranslator::new(&[])),
            silent_detector(),
            tts.clone(),
        );
        let session = state.create_session("c1");
        {
            let mut view = session.write().await;
            view.translated_text = "bonjour".to_string();
            view.target_language = "fr".to_string();
        }
        let (tx, _rx) = mpsc::unbounded_channel();

        handle_message(&state, "c1", r#"{"type":"speak"}"#, &tx)
            .await
            .unwrap();
        assert_eq!(
            tts.calls.lock().unwrap().as_slice(),
            &[("bonjour".to_string(), "fr".to_string())]
        );
    }

    #[tokio::test]
    async fn swap_retranslates_the_swapped_text() {
        let translator = Arc::new(StubTranslator::new(&[
            ("hola", "hello", 0),
            ("hello", "hola", 0),
        ]));
        let state = test_state(
            translator,
            silent_detector(),
            Arc::new(RecordingTts { calls: Mutex::new(Vec::new()) }),
        );
        let session = state.create_session("c1");
        {
            let mut view = session.write().await;
            view.input_text = "hola".to_string();
            view.translated_text = "hello".to_string();
            view.input_language = "es".to_string();
            view.target_language = "en".to_string();
        }
        let (tx, _rx) = mpsc::unbounded_channel();

        handle_message(&state, "c1", r#"{"type":"swap-languages"}"#, &tx)
            .await
            .unwrap();

        assert!(wait_for_translation(&session, "hola").await);
        let view = session.read().await;
        assert_eq!(view.input_text, "hello");
        assert_eq!(view.input_language, "en");
        assert_eq!(view.target_language, "es");
    }
}
