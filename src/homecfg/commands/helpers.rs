use crate::codec;
use crate::error::{HomecfgError, Result};
use crate::model::{Category, Document, Entry};
use crate::store::DocumentStore;
use log::debug;

/// Decodes the stored document; a store with nothing in it is an empty document.
pub fn load_document<S: DocumentStore>(store: &S) -> Result<Document> {
    match store.load_text()? {
        Some(text) => codec::decode(&text),
        None => {
            debug!("event=load_empty location={}", store.location());
            Ok(Document::new())
        }
    }
}

pub fn save_document<S: DocumentStore>(store: &mut S, document: &Document) -> Result<()> {
    let text = codec::encode(document)?;
    store.save_text(&text)
}

pub fn category<'a>(document: &'a Document, name: &str) -> Result<&'a Category> {
    document
        .category(name)
        .ok_or_else(|| HomecfgError::CategoryNotFound(name.to_string()))
}

pub fn category_mut<'a>(document: &'a mut Document, name: &str) -> Result<&'a mut Category> {
    document
        .category_mut(name)
        .ok_or_else(|| HomecfgError::CategoryNotFound(name.to_string()))
}

pub fn entry_mut<'a>(
    document: &'a mut Document,
    category: &str,
    name: &str,
) -> Result<&'a mut Entry> {
    category_mut(document, category)?
        .entry_mut(name)
        .ok_or_else(|| HomecfgError::entry_not_found(category, name))
}

/// Names are used as YAML keys and as line markers; they must be non-blank
/// single-line text.
pub fn check_name(kind: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(HomecfgError::InvalidName(format!("{} name is empty", kind)));
    }
    if name.contains(['\n', '\r']) {
        return Err(HomecfgError::InvalidName(format!(
            "{} name '{}' spans several lines",
            kind,
            name.escape_debug()
        )));
    }
    Ok(())
}
