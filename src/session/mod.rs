pub mod events;
pub mod state;

pub use events::{apply, Effect, ViewEvent};
pub use state::ViewState;
