use crate::commands::CmdResult;
use crate::error::{HomecfgError, Result};
use crate::store::DocumentStore;

use super::helpers::{category, load_document};

/// The whole document, hidden entries included.
pub fn list<S: DocumentStore>(store: &S) -> Result<CmdResult> {
    let document = load_document(store)?;
    Ok(CmdResult::default()
        .with_categories(document.category_names())
        .with_document(document))
}

pub fn entry<S: DocumentStore>(store: &S, category_name: &str, name: &str) -> Result<CmdResult> {
    let document = load_document(store)?;
    let entry = category(&document, category_name)?
        .entry(name)
        .cloned()
        .ok_or_else(|| HomecfgError::entry_not_found(category_name, name))?;
    Ok(CmdResult::default().with_affected_entry(category_name, entry))
}
