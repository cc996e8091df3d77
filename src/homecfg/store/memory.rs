use super::DocumentStore;
use crate::error::Result;

#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    text: Option<String>,
    saves: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            saves: 0,
        }
    }

    /// Contents as last saved (or seeded).
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Number of `save_text` calls so far.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl DocumentStore for InMemoryStore {
    fn load_text(&self) -> Result<Option<String>> {
        Ok(self.text.clone())
    }

    fn save_text(&mut self, text: &str) -> Result<()> {
        self.text = Some(text.to_string());
        self.saves += 1;
        Ok(())
    }

    fn location(&self) -> String {
        "<memory>".to_string()
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;

    /// A small homepage-style document: Media with a hidden Plex above a
    /// visible Emby, and Tools with FileBrowser.
    pub const SAMPLE: &str = "\
# For configuration options and examples, please see:
# https://gethomepage.dev/configs/services

- Media:
    # - Plex:
    #     href: http://plex.local
    - Emby:
        href: http://emby.local
        ping: http://emby.local
- Tools:
    - FileBrowser:
        href: http://files.local
";

    pub fn sample_store() -> InMemoryStore {
        InMemoryStore::with_text(SAMPLE)
    }
}
