use crate::commands::{CmdMessage, CmdResult};
use crate::error::{HomecfgError, Result};
use crate::store::DocumentStore;

use super::helpers::{category_mut, check_name, load_document, save_document};

/// Renames an entry in place: position, fields and flags are kept.
pub fn run<S: DocumentStore>(
    store: &mut S,
    category: &str,
    old_name: &str,
    new_name: &str,
) -> Result<CmdResult> {
    check_name("entry", new_name)?;

    let mut document = load_document(store)?;
    let target = category_mut(&mut document, category)?;
    let idx = target
        .position(old_name)
        .ok_or_else(|| HomecfgError::entry_not_found(category, old_name))?;

    let mut result = CmdResult::default();
    if old_name == new_name {
        result.add_message(CmdMessage::info(format!(
            "Entry already named {}",
            new_name
        )));
        return Ok(result);
    }
    if target.contains(new_name) {
        return Err(HomecfgError::entry_exists(category, new_name));
    }

    target.entries[idx].name = new_name.to_string();
    let renamed = target.entries[idx].clone();
    save_document(store, &document)?;

    result = result.with_affected_entry(category, renamed);
    result.add_message(CmdMessage::success(format!(
        "Entry renamed: {}/{} -> {}",
        category, old_name, new_name
    )));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::get;
    use crate::error::ErrorKind;
    use crate::store::memory::fixtures::sample_store;

    #[test]
    fn keeps_position_and_flags() {
        let mut store = sample_store();
        run(&mut store, "Media", "Plex", "Plex Media Server").unwrap();

        let doc = get::list(&store).unwrap().document.unwrap();
        let media = doc.category("Media").unwrap();
        assert_eq!(media.entries[0].name, "Plex Media Server");
        assert!(media.entries[0].hidden);
        assert_eq!(media.entries[1].name, "Emby");
    }

    #[test]
    fn taken_name_is_conflict() {
        let mut store = sample_store();
        let err = run(&mut store, "Media", "Plex", "Emby").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn same_name_is_a_no_op() {
        let mut store = sample_store();
        let result = run(&mut store, "Media", "Emby", "Emby").unwrap();
        assert!(result.affected_entries.is_empty());
        assert_eq!(store.saves(), 0);
    }

    #[test]
    fn missing_entry_is_not_found() {
        let mut store = sample_store();
        let err = run(&mut store, "Media", "Kodi", "Kodi 2").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
