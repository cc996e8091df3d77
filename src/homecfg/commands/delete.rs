use crate::commands::{CmdMessage, CmdResult};
use crate::error::{HomecfgError, Result};
use crate::store::DocumentStore;

use super::helpers::{category_mut, load_document, save_document};

/// Removes an entry. A category left without entries (hidden ones count) is
/// removed with it.
pub fn run<S: DocumentStore>(store: &mut S, category: &str, name: &str) -> Result<CmdResult> {
    let mut document = load_document(store)?;
    let target = category_mut(&mut document, category)?;
    let idx = target
        .position(name)
        .ok_or_else(|| HomecfgError::entry_not_found(category, name))?;
    let removed = target.entries.remove(idx);
    let pruned = document.prune_if_empty(category);
    save_document(store, &document)?;

    let mut result = CmdResult::default().with_affected_entry(category, removed);
    result.add_message(CmdMessage::success(format!(
        "Entry deleted: {}/{}",
        category, name
    )));
    if pruned {
        result.add_message(CmdMessage::info(format!(
            "Category removed (no entries left): {}",
            category
        )));
    }
    Ok(result)
}
