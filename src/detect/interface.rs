/// Language detection seam. Returns an ISO 639-1 code, or `None` when the
/// text's language cannot be determined.
pub trait DetectInterface: Send + Sync {
    fn detect(&self, text: &str) -> Option<String>;
}
