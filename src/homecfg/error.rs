use thiserror::Error;

/// Coarse classification of failures, as seen by callers that only need to
/// decide between "not there", "already there", "bad input" and "disk trouble".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    ParseFailure,
    IoFailure,
    Invalid,
}

#[derive(Error, Debug)]
pub enum HomecfgError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Entry not found: {category}/{name}")]
    EntryNotFound { category: String, name: String },

    #[error("Category already exists: {0}")]
    CategoryExists(String),

    #[error("Entry already exists: {category}/{name}")]
    EntryExists { category: String, name: String },

    #[error("Category is not empty: {0} (use force to delete it with its entries)")]
    CategoryNotEmpty(String),

    #[error("No document at {0}")]
    DocumentMissing(String),

    #[error("Invalid document: {0}")]
    Parse(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl HomecfgError {
    pub fn entry_not_found(category: &str, name: &str) -> Self {
        HomecfgError::EntryNotFound {
            category: category.to_string(),
            name: name.to_string(),
        }
    }

    pub fn entry_exists(category: &str, name: &str) -> Self {
        HomecfgError::EntryExists {
            category: category.to_string(),
            name: name.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            HomecfgError::CategoryNotFound(_)
            | HomecfgError::EntryNotFound { .. }
            | HomecfgError::DocumentMissing(_) => ErrorKind::NotFound,
            HomecfgError::CategoryExists(_)
            | HomecfgError::EntryExists { .. }
            | HomecfgError::CategoryNotEmpty(_) => ErrorKind::Conflict,
            HomecfgError::Yaml(_) | HomecfgError::Json(_) | HomecfgError::Parse(_) => {
                ErrorKind::ParseFailure
            }
            HomecfgError::Io(_) => ErrorKind::IoFailure,
            HomecfgError::Config(_) | HomecfgError::InvalidName(_) => ErrorKind::Invalid,
        }
    }
}

pub type Result<T> = std::result::Result<T, HomecfgError>;
