pub mod client;
pub mod interface;

pub use client::GtxTranslateClient;
pub use interface::{TranslateInterface, TranslateRequest, TranslateResponse};
