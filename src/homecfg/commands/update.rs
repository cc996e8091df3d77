use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::DocumentStore;
use serde_yaml::Mapping;

use super::helpers::{entry_mut, load_document, save_document};

/// Replaces an entry's fields wholesale. Reserved keys in `fields` update the
/// flags; a flag whose key is absent keeps its current value.
pub fn run<S: DocumentStore>(
    store: &mut S,
    category: &str,
    name: &str,
    fields: Mapping,
) -> Result<CmdResult> {
    let mut document = load_document(store)?;
    let entry = entry_mut(&mut document, category, name)?;
    entry.fields = fields;
    entry.absorb_flags();
    let updated = entry.clone();
    save_document(store, &document)?;

    let mut result = CmdResult::default().with_affected_entry(category, updated);
    result.add_message(CmdMessage::success(format!(
        "Entry updated: {}/{}",
        category, name
    )));
    Ok(result)
}
