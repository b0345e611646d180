use crate::languages::{is_supported, AUTO};

use super::state::ViewState;

/// Detection below this many characters is skipped, it is too unreliable on
/// short fragments.
pub const MIN_DETECT_CHARS: usize = 10;

/// Everything the translate view can react to. UI events arrive over the
/// socket; `LanguageDetected` and `TranslationArrived` are fed back by the
/// effect runner.
#[derive(Debug, Clone)]
pub enum ViewEvent {
    InputChanged(String),
    InputLanguageSelected(String),
    TargetLanguageSelected(String),
    InputPickerToggled(bool),
    TargetPickerToggled(bool),
    LanguagesSwapped,
    LanguageDetected(String),
    TranslationArrived { revision: u64, text: String },
}

/// Side effects a transition asks the runtime to perform. Transitions stay
/// pure; the handler layer executes these against the real services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run the detection library over the current input text.
    Detect { text: String },
    /// Issue one translation request. Carries the revision the result must
    /// still match to be applied.
    Translate {
        revision: u64,
        text: String,
        source: String,
        target: String,
    },
    /// Abort whatever translation request is still in flight.
    CancelInFlight,
}

/// Apply one event to the view state and return the effects to run.
pub fn apply(state: &mut ViewState, event: ViewEvent) -> Vec<Effect> {
    match event {
        ViewEvent::InputChanged(text) => {
            state.input_text = text;
            let mut effects = Vec::new();
            if state.input_text.chars().count() >= MIN_DETECT_CHARS {
                effects.push(Effect::Detect {
                    text: state.input_text.clone(),
                });
            }
            effects.extend(retranslate(state));
            effects
        }
        ViewEvent::InputLanguageSelected(language) => {
            state.input_language = language;
            retranslate(state)
        }
        ViewEvent::TargetLanguageSelected(language) => {
            state.target_language = language;
            retranslate(state)
        }
        ViewEvent::InputPickerToggled(open) => {
            state.input_picker_open = open;
            Vec::new()
        }
        ViewEvent::TargetPickerToggled(open) => {
            state.target_picker_open = open;
            Vec::new()
        }
        ViewEvent::LanguagesSwapped => {
            let prev_input = std::mem::take(&mut state.input_language);
            let prev_target = state.target_language.clone();
            if prev_input == AUTO {
                // "auto" is not a meaningful target; fall back to the
                // detected language when there is one.
                state.input_language = prev_target;
                if let Some(detected) = state.detected_language.clone() {
                    state.target_language = detected;
                }
            } else {
                state.input_language = prev_target;
                state.target_language = prev_input;
            }
            state.detected_language = None;
            std::mem::swap(&mut state.input_text, &mut state.translated_text);
            retranslate(state)
        }
        ViewEvent::LanguageDetected(code) => {
            if !is_supported(&code) {
                return Vec::new();
            }
            state.detected_language = Some(code.clone());
            if state.input_language == AUTO {
                state.input_language = code;
            }
            retranslate(state)
        }
        ViewEvent::TranslationArrived { revision, text } => {
            if revision == state.revision {
                state.translated_text = text;
            }
            Vec::new()
        }
    }
}

/// The translation inputs changed: bump the revision so any in-flight result
/// goes stale, then either clear (blank input) or request a fresh
/// translation.
fn retranslate(state: &mut ViewState) -> Vec<Effect> {
    state.revision += 1;
    if !state.has_input() {
        state.translated_text.clear();
        return vec![Effect::CancelInFlight];
    }
    vec![Effect::Translate {
        revision: state.revision,
        text: state.input_text.clone(),
        source: state.effective_source().to_string(),
        target: state.target_language.clone(),
    }]
}
