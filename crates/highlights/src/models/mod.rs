//! Domain models for synced highlights

mod article;
mod sync_state;
mod window;

pub use article::Article;
pub use sync_state::SyncCheckpoint;
pub use window::{SyncWindow, WindowMode};
