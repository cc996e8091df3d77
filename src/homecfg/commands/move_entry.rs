use crate::commands::{CmdMessage, CmdResult};
use crate::error::{HomecfgError, Result};
use crate::store::DocumentStore;

use super::helpers::{category, category_mut, check_name, load_document, save_document};

/// Moves an entry to the end of another category, flags and fields included.
/// The destination is created if missing; the source is pruned if emptied.
pub fn run<S: DocumentStore>(
    store: &mut S,
    name: &str,
    from: &str,
    to: &str,
) -> Result<CmdResult> {
    check_name("category", to)?;

    let mut document = load_document(store)?;
    let source = category(&document, from)?;
    if !source.contains(name) {
        return Err(HomecfgError::entry_not_found(from, name));
    }

    let mut result = CmdResult::default();
    if from == to {
        result.add_message(CmdMessage::info(format!(
            "{} is already in {}",
            name, to
        )));
        return Ok(result);
    }
    if document.entry(to, name).is_some() {
        return Err(HomecfgError::entry_exists(to, name));
    }

    let source = category_mut(&mut document, from)?;
    let idx = source
        .position(name)
        .ok_or_else(|| HomecfgError::entry_not_found(from, name))?;
    let mut entry = source.entries.remove(idx);
    // position in the new category is the end, not the old line
    entry.origin_line = None;

    let pruned = document.prune_if_empty(from);
    document.ensure_category(to).entries.push(entry.clone());
    save_document(store, &document)?;

    result = result.with_affected_entry(to, entry);
    result.add_message(CmdMessage::success(format!(
        "Entry moved: {} ({} -> {})",
        name, from, to
    )));
    if pruned {
        result.add_message(CmdMessage::info(format!(
            "Category removed (no entries left): {}",
            from
        )));
    }
    Ok(result)
}
