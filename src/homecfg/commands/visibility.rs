use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::HEALTH_CHECK_KEYS;
use crate::store::DocumentStore;

use super::helpers::{entry_mut, load_document, save_document};

/// Hides (comments out) or shows an entry. The entry keeps its place among
/// its siblings either way.
pub fn set_hidden<S: DocumentStore>(
    store: &mut S,
    category: &str,
    name: &str,
    hidden: bool,
) -> Result<CmdResult> {
    let mut document = load_document(store)?;
    let entry = entry_mut(&mut document, category, name)?;

    let mut result = CmdResult::default();
    if entry.hidden == hidden {
        let state = if hidden { "hidden" } else { "visible" };
        result.add_message(CmdMessage::info(format!(
            "{}/{} is already {}",
            category, name, state
        )));
        return Ok(result.with_affected_entry(category, entry.clone()));
    }

    entry.hidden = hidden;
    let changed = entry.clone();
    save_document(store, &document)?;

    let verb = if hidden { "hidden" } else { "shown" };
    result.add_message(CmdMessage::success(format!(
        "Entry {}: {}/{}",
        verb, category, name
    )));
    Ok(result.with_affected_entry(category, changed))
}

/// Comments out (or restores) the entry's `ping`, `server` and `container`
/// fields, leaving every other field alone.
pub fn set_health_check_disabled<S: DocumentStore>(
    store: &mut S,
    category: &str,
    name: &str,
    disabled: bool,
) -> Result<CmdResult> {
    let mut document = load_document(store)?;
    let entry = entry_mut(&mut document, category, name)?;

    let mut result = CmdResult::default();
    if entry.health_check_disabled == disabled {
        let state = if disabled { "disabled" } else { "enabled" };
        result.add_message(CmdMessage::info(format!(
            "Health check for {}/{} is already {}",
            category, name, state
        )));
        return Ok(result.with_affected_entry(category, entry.clone()));
    }

    entry.health_check_disabled = disabled;
    if disabled && !entry.has_health_check_fields() {
        result.add_message(CmdMessage::warning(format!(
            "{}/{} has no {} field; the setting will not survive a reload",
            category,
            name,
            HEALTH_CHECK_KEYS.join("/")
        )));
    }
    let changed = entry.clone();
    save_document(store, &document)?;

    let verb = if disabled { "disabled" } else { "enabled" };
    result.add_message(CmdMessage::success(format!(
        "Health check {}: {}/{}",
        verb, category, name
    )));
    Ok(result.with_affected_entry(category, changed))
}
