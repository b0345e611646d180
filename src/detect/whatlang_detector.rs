use super::interface::DetectInterface;

/// In-process detection via `whatlang`. whatlang reports ISO 639-3 codes
/// ("fra", "kor"); the supported-language list uses 639-1, so results go
/// through `isolang` before anyone sees them.
pub struct WhatlangDetector;

impl DetectInterface for WhatlangDetector {
    fn detect(&self, text: &str) -> Option<String> {
        let info = whatlang::detect(text)?;
        isolang::Language::from_639_3(info.lang().code())
            .and_then(|lang| lang.to_639_1())
            .map(|code| code.to_string())
    }
}
