use crate::config::AppConfig;
use crate::model::{Document, Entry};
use serde::Serialize;
use std::path::PathBuf;

pub mod active;
pub mod add;
pub mod backup;
pub mod categories;
pub mod config;
pub mod delete;
pub mod example;
pub mod export;
pub mod get;
pub mod helpers;
pub mod import;
pub mod move_entry;
pub mod rename;
pub mod reorder;
pub mod update;
pub mod validate;
pub mod visibility;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// An entry together with the category it lives in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryRef {
    pub category: String,
    #[serde(flatten)]
    pub entry: Entry,
}

impl EntryRef {
    pub fn new(category: impl Into<String>, entry: Entry) -> Self {
        Self {
            category: category.into(),
            entry,
        }
    }
}

/// Outcome of checking a document without saving it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub document: Option<Document>,
    pub affected_entries: Vec<EntryRef>,
    pub categories: Vec<String>,
    pub text: Option<String>,
    pub validation: Option<ValidationReport>,
    pub config: Option<AppConfig>,
    pub paths: Vec<PathBuf>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_document(mut self, document: Document) -> Self {
        self.document = Some(document);
        self
    }

    pub fn with_affected_entry(mut self, category: &str, entry: Entry) -> Self {
        self.affected_entries.push(EntryRef::new(category, entry));
        self
    }

    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_text(mut self, text: String) -> Self {
        self.text = Some(text);
        self
    }

    pub fn with_validation(mut self, report: ValidationReport) -> Self {
        self.validation = Some(report);
        self
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.paths = paths;
        self
    }
}
