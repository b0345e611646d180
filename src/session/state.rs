use serde::Serialize;

use crate::languages::AUTO;

/// All mutable state owned by one translate view. One instance per connected
/// client, dropped when the socket closes.
#[derive(Debug, Clone, Serialize)]
pub struct ViewState {
    pub input_text: String,
    pub translated_text: String,
    pub input_language: String,
    pub target_language: String,
    pub detected_language: Option<String>,
    pub input_picker_open: bool,
    pub target_picker_open: bool,
    /// Bumped by every transition that changes the translation inputs. A
    /// translation result is applied only while its revision is still
    /// current, so a superseded response can never overwrite a newer one.
    #[serde(skip)]
    pub revision: u64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            input_text: String::new(),
            translated_text: String::new(),
            input_language: AUTO.to_string(),
            target_language: "en".to_string(),
            detected_language: None,
            input_picker_open: false,
            target_picker_open: false,
            revision: 0,
        }
    }
}

impl ViewState {
    /// Source language actually sent to the translation endpoint: the
    /// detected language while the picker sits on "auto" and detection has
    /// succeeded, otherwise whatever the picker holds.
    pub fn effective_source(&self) -> &str {
        if self.input_language == AUTO {
            self.detected_language.as_deref().unwrap_or(AUTO)
        } else {
            &self.input_language
        }
    }

    pub fn has_input(&self) -> bool {
        !self.input_text.trim().is_empty()
    }
}
