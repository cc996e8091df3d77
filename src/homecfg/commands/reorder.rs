use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{Category, Entry};
use crate::store::DocumentStore;

use super::helpers::{category_mut, load_document, save_document};

/// Re-sequences a category's entries to `order`. Unknown names are ignored and
/// entries left out of `order` are dropped: callers pass the complete order.
pub fn entries<S: DocumentStore, N: AsRef<str>>(
    store: &mut S,
    category: &str,
    order: &[N],
) -> Result<CmdResult> {
    let mut document = load_document(store)?;
    let target = category_mut(&mut document, category)?;

    let (ordered, rest) = pick(std::mem::take(&mut target.entries), order, |e: &Entry| {
        e.name.as_str()
    });
    target.entries = ordered;
    let names: Vec<String> = target.entries.iter().map(|e| e.name.clone()).collect();
    save_document(store, &document)?;

    let mut result = CmdResult::default().with_categories(vec![category.to_string()]);
    for entry in &rest {
        result.add_message(CmdMessage::warning(format!(
            "Entry dropped (not in new order): {}/{}",
            category, entry.name
        )));
    }
    result.add_message(CmdMessage::success(format!(
        "Entries reordered in {}: {}",
        category,
        names.join(", ")
    )));
    Ok(result)
}

/// Puts the named categories first, in `order`; the others follow in their
/// current relative order.
pub fn categories<S: DocumentStore, N: AsRef<str>>(
    store: &mut S,
    order: &[N],
) -> Result<CmdResult> {
    let mut document = load_document(store)?;
    let (mut ordered, rest) = pick(
        std::mem::take(&mut document.categories),
        order,
        |c: &Category| c.name.as_str(),
    );
    ordered.extend(rest);
    document.categories = ordered;
    save_document(store, &document)?;

    let names = document.category_names();
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Categories reordered: {}",
        names.join(", ")
    )));
    Ok(result.with_categories(names))
}

/// Splits `items` into those named in `order` (in that order, first mention
/// wins) and the rest (in their original order).
fn pick<T, N, F>(items: Vec<T>, order: &[N], name_of: F) -> (Vec<T>, Vec<T>)
where
    N: AsRef<str>,
    F: Fn(&T) -> &str,
{
    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let mut ordered = Vec::with_capacity(slots.len());
    for wanted in order {
        let found = slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|item| name_of(item) == wanted.as_ref()));
        if let Some(item) = found.and_then(|idx| slots[idx].take()) {
            ordered.push(item);
        }
    }
    let rest = slots.into_iter().flatten().collect();
    (ordered, rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{add, get};
    use crate::error::ErrorKind;
    use crate::store::memory::fixtures::sample_store;
    use crate::store::memory::InMemoryStore;

    fn names_in(store: &InMemoryStore, category: &str) -> Vec<String> {
        let doc = get::list(store).unwrap().document.unwrap();
        doc.category(category)
            .unwrap()
            .entries
            .iter()
            .map(|e| e.name.clone())
            .collect()
    }

    #[test]
    fn unknown_names_are_ignored() {
        let mut store = InMemoryStore::new();
        add::run(&mut store, "Media", "Emby", Default::default()).unwrap();
        entries(&mut store, "Media", &["Plex", "Emby"]).unwrap();
        assert_eq!(names_in(&store, "Media"), vec!["Emby"]);
    }

    #[test]
    fn reorders_visible_and_hidden() {
        let mut store = sample_store();
        entries(&mut store, "Media", &["Emby", "Plex"]).unwrap();
        assert_eq!(names_in(&store, "Media"), vec!["Emby", "Plex"]);

        let doc = get::list(&store).unwrap().document.unwrap();
        assert!(doc.entry("Media", "Plex").unwrap().hidden);
    }

    #[test]
    fn unmentioned_entries_are_dropped() {
        let mut store = sample_store();
        let result = entries(&mut store, "Media", &["Emby"]).unwrap();
        assert_eq!(names_in(&store, "Media"), vec!["Emby"]);
        assert_eq!(result.messages[0].content, "Entry dropped (not in new order): Media/Plex");
    }

    #[test]
    fn missing_category_is_not_found() {
        let mut store = sample_store();
        let err = entries(&mut store, "Games", &["Emby"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn unmentioned_categories_are_appended() {
        let mut store = sample_store();
        let result = categories(&mut store, &["Tools"]).unwrap();
        assert_eq!(result.categories, vec!["Tools", "Media"]);

        let doc = get::list(&store).unwrap().document.unwrap();
        assert_eq!(doc.category_names(), vec!["Tools", "Media"]);
    }

    #[test]
    fn duplicate_and_unknown_category_names() {
        let mut store = sample_store();
        let result = categories(&mut store, &["Games", "Media", "Media"]).unwrap();
        assert_eq!(result.categories, vec!["Media", "Tools"]);
    }
}
