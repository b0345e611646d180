pub mod interface;
pub mod whatlang_detector;

pub use interface::DetectInterface;
pub use whatlang_detector::WhatlangDetector;
