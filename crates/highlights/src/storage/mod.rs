//! Storage traits and implementations
//!
//! This module defines the storage abstraction layer for the article
//! snapshot and sync checkpoint. The trait-based design allows swapping
//! between in-memory and JSON-file storage implementations.

mod json;
mod memory;
mod traits;

pub use json::JsonArticleStore;
pub use memory::InMemoryArticleStore;
pub use traits::ArticleStore;
