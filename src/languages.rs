use serde_json::{json, Value};

/// Sentinel source language meaning "determine from text content".
pub const AUTO: &str = "auto";

/// Supported languages, ISO 639-1 code to display label.
/// Populates both pickers and validates detection results.
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("it", "Italian"),
    ("pt", "Portuguese"),
    ("nl", "Dutch"),
    ("pl", "Polish"),
    ("sv", "Swedish"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("ru", "Russian"),
    ("ar", "Arabic"),
    ("hi", "Hindi"),
    ("vi", "Vietnamese"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("zh", "Chinese"),
];

/// Whether `code` is a selectable target / detectable source. `"auto"` is not
/// a supported language, it is a picker sentinel.
pub fn is_supported(code: &str) -> bool {
    SUPPORTED_LANGUAGES.iter().any(|(c, _)| *c == code)
}

pub fn label_for(code: &str) -> Option<&'static str> {
    SUPPORTED_LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| *label)
}

/// JSON payload for the picker lists, sent on connect and from /api/languages.
pub fn languages_payload() -> Value {
    let languages: Vec<Value> = SUPPORTED_LANGUAGES
        .iter()
        .map(|(code, label)| json!({ "value": code, "label": label }))
        .collect();
    json!({
        "auto": { "value": AUTO, "label": "Detect language" },
        "languages": languages,
    })
}
