use crate::codec;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{HomecfgError, Result};
use crate::store::DocumentStore;
use log::info;

use super::helpers::save_document;

/// Replaces the stored document with `raw`. The text is normalized and fully
/// decoded first; nothing is written unless that succeeds.
pub fn run<S: DocumentStore>(store: &mut S, raw: &str) -> Result<CmdResult> {
    let document = codec::decode(raw)?;
    if document.is_empty() {
        return Err(HomecfgError::Parse("nothing to import".to_string()));
    }
    save_document(store, &document)?;

    let hidden = document
        .categories
        .iter()
        .flat_map(|c| &c.entries)
        .filter(|e| e.hidden)
        .count();
    info!(
        "event=document_imported categories={} entries={} hidden={}",
        document.categories.len(),
        document.entry_count(),
        hidden
    );

    let mut result = CmdResult::default().with_categories(document.category_names());
    result.add_message(CmdMessage::success(format!(
        "Imported {} categories, {} entries ({} hidden) into {}",
        document.categories.len(),
        document.entry_count(),
        hidden,
        store.location()
    )));
    Ok(result.with_document(document))
}
