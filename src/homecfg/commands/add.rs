use crate::commands::{CmdMessage, CmdResult};
use crate::error::{HomecfgError, Result};
use crate::model::Entry;
use crate::store::DocumentStore;
use serde_yaml::Mapping;

use super::helpers::{check_name, load_document, save_document};

/// Adds an entry, creating the category at the end if it does not exist yet.
/// `hidden` / `healthCheckDisabled` keys in `fields` become the entry's flags.
pub fn run<S: DocumentStore>(
    store: &mut S,
    category: &str,
    name: &str,
    fields: Mapping,
) -> Result<CmdResult> {
    check_name("category", category)?;
    check_name("entry", name)?;

    let mut document = load_document(store)?;
    let created_category = document.category(category).is_none();
    let target = document.ensure_category(category);
    if target.contains(name) {
        return Err(HomecfgError::entry_exists(category, name));
    }

    let entry = Entry::new(name, fields);
    target.entries.push(entry.clone());
    save_document(store, &document)?;

    let mut result = CmdResult::default().with_affected_entry(category, entry);
    if created_category {
        result.add_message(CmdMessage::info(format!("Category created: {}", category)));
    }
    result.add_message(CmdMessage::success(format!(
        "Entry added: {}/{}",
        category, name
    )));
    Ok(result)
}
