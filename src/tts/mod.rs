pub mod client;
pub mod factory;
pub mod interface;

pub use client::TTSClient;
pub use factory::TTSFactory;
pub use interface::TTSInterface;
