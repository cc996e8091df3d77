use crate::commands::{CmdMessage, CmdResult};
use crate::error::{HomecfgError, Result};
use crate::model::Category;
use crate::store::DocumentStore;

use super::helpers::{category, check_name, load_document, save_document};

pub fn list<S: DocumentStore>(store: &S) -> Result<CmdResult> {
    let document = load_document(store)?;
    Ok(CmdResult::default().with_categories(document.category_names()))
}

/// Appends an empty category. It is written out as `- Name: []`.
pub fn create<S: DocumentStore>(store: &mut S, name: &str) -> Result<CmdResult> {
    check_name("category", name)?;

    let mut document = load_document(store)?;
    if document.category(name).is_some() {
        return Err(HomecfgError::CategoryExists(name.to_string()));
    }
    document.categories.push(Category::new(name));
    save_document(store, &document)?;

    let mut result = CmdResult::default().with_categories(vec![name.to_string()]);
    result.add_message(CmdMessage::success(format!("Category created: {}", name)));
    Ok(result)
}

pub fn rename<S: DocumentStore>(store: &mut S, old_name: &str, new_name: &str) -> Result<CmdResult> {
    check_name("category", new_name)?;

    let mut document = load_document(store)?;
    let idx = document
        .category_position(old_name)
        .ok_or_else(|| HomecfgError::CategoryNotFound(old_name.to_string()))?;

    let mut result = CmdResult::default();
    if old_name == new_name {
        result.add_message(CmdMessage::info(format!(
            "Category already named {}",
            new_name
        )));
        return Ok(result);
    }
    if document.category(new_name).is_some() {
        return Err(HomecfgError::CategoryExists(new_name.to_string()));
    }

    document.categories[idx].name = new_name.to_string();
    save_document(store, &document)?;

    result.add_message(CmdMessage::success(format!(
        "Category renamed: {} -> {}",
        old_name, new_name
    )));
    Ok(result.with_categories(vec![new_name.to_string()]))
}

/// Deletes a category. One that still has entries (hidden ones count) is only
/// deleted with `force`, and its entries go with it.
pub fn delete<S: DocumentStore>(store: &mut S, name: &str, force: bool) -> Result<CmdResult> {
    let mut document = load_document(store)?;
    let count = category(&document, name)?.entries.len();
    if count > 0 && !force {
        return Err(HomecfgError::CategoryNotEmpty(name.to_string()));
    }

    document.categories.retain(|c| c.name != name);
    save_document(store, &document)?;

    let mut result = CmdResult::default();
    if count > 0 {
        result.add_message(CmdMessage::warning(format!(
            "{} entr{} deleted with {}",
            count,
            if count == 1 { "y" } else { "ies" },
            name
        )));
    }
    result.add_message(CmdMessage::success(format!("Category deleted: {}", name)));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{add, delete as delete_entry, export};
    use crate::error::ErrorKind;
    use crate::store::memory::fixtures::sample_store;
    use crate::store::memory::InMemoryStore;

    #[test]
    fn lists_in_document_order() {
        let store = sample_store();
        assert_eq!(list(&store).unwrap().categories, vec!["Media", "Tools"]);
    }

    #[test]
    fn empty_category_persists() {
        let mut store = InMemoryStore::new();
        create(&mut store, "Games").unwrap();
        let text = export::run(&store).unwrap().text.unwrap();
        assert_eq!(text, "- Games: []\n");
        assert_eq!(list(&store).unwrap().categories, vec!["Games"]);
    }

    #[test]
    fn create_existing_is_conflict() {
        let mut store = sample_store();
        assert_eq!(create(&mut store, "Media").unwrap_err().kind(), ErrorKind::Conflict);
    }

    #[test]
    fn rename_keeps_position_and_entries() {
        let mut store = sample_store();
        rename(&mut store, "Media", "Streaming").unwrap();
        let doc = crate::commands::get::list(&store).unwrap().document.unwrap();
        assert_eq!(doc.category_names(), vec!["Streaming", "Tools"]);
        assert!(doc.entry("Streaming", "Plex").unwrap().hidden);
        assert!(doc.entry("Streaming", "Emby").is_some());
    }

    #[test]
    fn rename_errors() {
        let mut store = sample_store();
        assert_eq!(rename(&mut store, "Games", "X").unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(rename(&mut store, "Media", "Tools").unwrap_err().kind(), ErrorKind::Conflict);
    }

    #[test]
    fn delete_requires_force_when_not_empty() {
        let mut store = sample_store();
        let err = delete(&mut store, "Media", false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let result = delete(&mut store, "Media", true).unwrap();
        assert_eq!(result.messages[0].content, "2 entries deleted with Media");
        assert_eq!(list(&store).unwrap().categories, vec!["Tools"]);
    }

    #[test]
    fn delete_empty_category() {
        let mut store = sample_store();
        create(&mut store, "Games").unwrap();
        delete(&mut store, "Games", false).unwrap();
        assert_eq!(list(&store).unwrap().categories, vec!["Media", "Tools"]);
    }

    #[test]
    fn category_emptied_by_entry_delete_is_gone() {
        let mut store = InMemoryStore::new();
        add::run(&mut store, "Tools", "FileBrowser", Default::default()).unwrap();
        delete_entry::run(&mut store, "Tools", "FileBrowser").unwrap();
        assert!(list(&store).unwrap().categories.is_empty());
        assert_eq!(store.text(), Some(""));
    }
}
