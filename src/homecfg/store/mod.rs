//! # Storage Layer
//!
//! The services file is persisted as one piece of text. [`DocumentStore`]
//! abstracts where that text lives so commands can be exercised without a
//! filesystem.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: the file at the configured path
//!   - parent directories are created on the first save
//!   - a save writes a sibling temp file and renames it over the target, so a
//!     reader sees either the old or the new contents, never a mix
//!
//! - [`memory::InMemoryStore`]: a `String` slot, for tests
//!
//! ## Concurrency
//!
//! Every command does one `load_text`, one in-memory transform and at most one
//! `save_text`. Nothing is locked between the load and the save: two writers
//! racing each other both succeed and the later save wins.

use crate::error::Result;

pub mod fs;
pub mod memory;

/// Raw-text persistence for the services document.
pub trait DocumentStore {
    /// Current contents, or `None` if nothing has been saved yet.
    fn load_text(&self) -> Result<Option<String>>;

    /// Replaces the whole contents.
    fn save_text(&mut self, text: &str) -> Result<()>;

    /// Human-readable location, for messages.
    fn location(&self) -> String;
}
