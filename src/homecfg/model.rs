//! # Document Model
//!
//! The in-memory hierarchy of a services file, independent of any text layout:
//! a [`Document`] is an ordered list of [`Category`], each an ordered list of
//! [`Entry`]. Field values are kept as opaque `serde_yaml` values.
//!
//! Two reserved field keys, `hidden` and `healthCheckDisabled`, never live in
//! `Entry::fields`. Whenever a mapping enters the model (decode, API payloads)
//! they are promoted into the entry's own flags; whenever the model is turned
//! back into a structural tree they are left out. How those flags show up in
//! the file (commented blocks and lines) is the codec's business.
//!
//! The structural tree comes in two shapes, a list of one-key mappings or a
//! single mapping. [`Structural`] tags the shape at the decode boundary and
//! [`Document::from_structural`] normalizes both into one `Document`.

use crate::error::{HomecfgError, Result};
use serde::Serialize;
use serde_yaml::{Mapping, Value};

pub const HIDDEN_KEY: &str = "hidden";
pub const HEALTH_CHECK_DISABLED_KEY: &str = "healthCheckDisabled";

/// Fields that are commented out, rather than removed, when an entry's
/// health check is disabled.
pub const HEALTH_CHECK_KEYS: [&str; 3] = ["ping", "server", "container"];

pub fn is_reserved_key(key: &str) -> bool {
    key == HIDDEN_KEY || key == HEALTH_CHECK_DISABLED_KEY
}

pub fn is_health_check_key(key: &str) -> bool {
    HEALTH_CHECK_KEYS.contains(&key)
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Entry {
    pub name: String,
    pub fields: Mapping,
    pub hidden: bool,
    #[serde(rename = "healthCheckDisabled")]
    pub health_check_disabled: bool,
    /// Line of this entry's header in the text it was last decoded from.
    /// `None` for entries created since the last load; those sort last.
    #[serde(skip)]
    pub origin_line: Option<usize>,
}

impl Entry {
    /// Builds an entry from a raw field mapping, promoting reserved keys to flags.
    pub fn new(name: impl Into<String>, fields: Mapping) -> Self {
        let mut entry = Self {
            name: name.into(),
            fields,
            ..Default::default()
        };
        entry.absorb_flags();
        entry
    }

    /// Moves `hidden` / `healthCheckDisabled` out of `fields` into the flags.
    /// Flags whose key is absent keep their current value.
    pub fn absorb_flags(&mut self) {
        if let Some(value) = self.fields.get(HIDDEN_KEY) {
            self.hidden = flag_value(value);
        }
        if let Some(value) = self.fields.get(HEALTH_CHECK_DISABLED_KEY) {
            self.health_check_disabled = flag_value(value);
        }
        if self.fields.keys().any(|k| k.as_str().is_some_and(is_reserved_key)) {
            self.fields = strip_reserved(std::mem::take(&mut self.fields));
        }
    }

    pub fn has_health_check_fields(&self) -> bool {
        self.fields
            .keys()
            .any(|k| k.as_str().is_some_and(is_health_check_key))
    }
}

// origin_line is positional bookkeeping and is left out of equality, so a
// document compares equal to itself after a save/load cycle.
impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.fields == other.fields
            && self.hidden == other.hidden
            && self.health_check_disabled == other.health_check_disabled
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Category {
    pub name: String,
    pub entries: Vec<Entry>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    pub fn entry(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn entry_mut(&mut self, name: &str) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|e| e.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Stable sort by `origin_line`; entries without one keep their relative
    /// order after all positioned entries.
    pub fn sort_by_origin(&mut self) {
        self.entries
            .sort_by_key(|e| e.origin_line.map_or((1, 0), |line| (0, line)));
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    /// Comment lines found above the first category, kept verbatim.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub preamble: Vec<String>,
    pub categories: Vec<Category>,
}

/// Which entries a structural tree should carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Only entries that are not hidden: the document a consumer acts on.
    Active,
    /// Every entry; the codec comments hidden ones out afterwards.
    All,
}

/// Top-level shape of a parsed document.
#[derive(Debug, Clone, PartialEq)]
pub enum Structural {
    Empty,
    /// `- Category: [...]` items.
    Sequence(Vec<Value>),
    /// `Category: [...]` keys.
    Mapping(Mapping),
}

impl Structural {
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Structural::Empty),
            Value::Sequence(items) => Ok(Structural::Sequence(items)),
            Value::Mapping(map) => Ok(Structural::Mapping(map)),
            Value::Tagged(tagged) => Structural::from_value(tagged.value),
            other => Err(HomecfgError::Parse(format!(
                "top level must be a list of categories or a mapping, found {}",
                value_kind(&other)
            ))),
        }
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn category_names(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.name.clone()).collect()
    }

    pub fn category_position(&self, name: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.name == name)
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn category_mut(&mut self, name: &str) -> Option<&mut Category> {
        self.categories.iter_mut().find(|c| c.name == name)
    }

    /// Returns the named category, appending an empty one if it is missing.
    pub fn ensure_category(&mut self, name: &str) -> &mut Category {
        let idx = match self.category_position(name) {
            Some(idx) => idx,
            None => {
                self.categories.push(Category::new(name));
                self.categories.len() - 1
            }
        };
        &mut self.categories[idx]
    }

    /// Drops the named category if it has no entries left.
    pub fn prune_if_empty(&mut self, name: &str) -> bool {
        match self.category_position(name) {
            Some(idx) if self.categories[idx].entries.is_empty() => {
                self.categories.remove(idx);
                true
            }
            _ => false,
        }
    }

    pub fn entry(&self, category: &str, name: &str) -> Option<&Entry> {
        self.category(category).and_then(|c| c.entry(name))
    }

    pub fn entry_count(&self) -> usize {
        self.categories.iter().map(|c| c.entries.len()).sum()
    }

    pub fn sort_by_origin(&mut self) {
        for category in &mut self.categories {
            category.sort_by_origin();
        }
    }

    pub fn from_structural(tree: Structural) -> Result<Document> {
        let pairs: Vec<(Value, Value)> = match tree {
            Structural::Empty => Vec::new(),
            Structural::Mapping(map) => map.into_iter().collect(),
            Structural::Sequence(items) => {
                let mut pairs = Vec::new();
                for (idx, item) in items.into_iter().enumerate() {
                    match item {
                        Value::Mapping(map) => pairs.extend(map),
                        Value::Null => continue,
                        other => {
                            return Err(HomecfgError::Parse(format!(
                                "top-level item {} must be a mapping, found {}",
                                idx + 1,
                                value_kind(&other)
                            )))
                        }
                    }
                }
                pairs
            }
        };

        let mut document = Document::new();
        for (key, value) in pairs {
            let name = key_to_name(&key);
            if document.category(&name).is_some() {
                return Err(HomecfgError::Parse(format!("duplicate category '{}'", name)));
            }
            let entries = entries_from_value(&name, value)?;
            document.categories.push(Category { name, entries });
        }
        Ok(document)
    }

    /// The active structural tree: hidden entries and flag keys left out.
    pub fn to_structural(&self) -> Value {
        self.structural(Visibility::Active)
    }

    /// Always sequence-shaped, whatever shape the document was read from.
    pub fn structural(&self, visibility: Visibility) -> Value {
        let categories = self
            .categories
            .iter()
            .map(|category| {
                let entries: Vec<Value> = category
                    .entries
                    .iter()
                    .filter(|e| visibility == Visibility::All || !e.hidden)
                    .map(|e| {
                        single_key(
                            &e.name,
                            Value::Mapping(strip_reserved(e.fields.clone())),
                        )
                    })
                    .collect();
                single_key(&category.name, Value::Sequence(entries))
            })
            .collect();
        Value::Sequence(categories)
    }
}

fn entries_from_value(category: &str, value: Value) -> Result<Vec<Entry>> {
    let items = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Sequence(items) => items,
        Value::Tagged(tagged) => return entries_from_value(category, tagged.value),
        other => {
            return Err(HomecfgError::Parse(format!(
                "category '{}' must be a list of entries, found {}",
                category,
                value_kind(&other)
            )))
        }
    };

    let mut entries: Vec<Entry> = Vec::new();
    for item in items {
        let map = match item {
            Value::Mapping(map) => map,
            Value::Null => continue,
            other => {
                return Err(HomecfgError::Parse(format!(
                    "items of category '{}' must be mappings, found {}",
                    category,
                    value_kind(&other)
                )))
            }
        };
        for (key, value) in map {
            let name = key_to_name(&key);
            let fields = match value {
                Value::Null => Mapping::new(),
                Value::Mapping(fields) => fields,
                other => {
                    return Err(HomecfgError::Parse(format!(
                        "entry '{}' in category '{}' must be a mapping, found {}",
                        name,
                        category,
                        value_kind(&other)
                    )))
                }
            };
            if entries.iter().any(|e| e.name == name) {
                return Err(HomecfgError::Parse(format!(
                    "duplicate entry '{}' in category '{}'",
                    name, category
                )));
            }
            entries.push(Entry::new(name, fields));
        }
    }
    Ok(entries)
}

fn single_key(key: &str, value: Value) -> Value {
    let mut map = Mapping::new();
    map.insert(Value::String(key.to_string()), value);
    Value::Mapping(map)
}

pub(crate) fn strip_reserved(fields: Mapping) -> Mapping {
    fields
        .into_iter()
        .filter(|(k, _)| !k.as_str().is_some_and(is_reserved_key))
        .collect()
}

fn flag_value(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// Category and entry names are strings even when the YAML key is not.
pub fn key_to_name(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Document {
        let value: Value = serde_yaml::from_str(text).unwrap();
        Document::from_structural(Structural::from_value(value).unwrap()).unwrap()
    }

    fn fields(text: &str) -> Mapping {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn reads_sequence_shape() {
        let doc = parse(
            "- Media:\n  - Emby:\n      href: http://x\n  - Plex:\n      href: http://y\n- Tools:\n  - FileBrowser: {}\n",
        );
        assert_eq!(doc.category_names(), vec!["Media", "Tools"]);
        let media = doc.category("Media").unwrap();
        assert_eq!(media.entries[0].name, "Emby");
        assert_eq!(media.entries[1].name, "Plex");
        assert_eq!(
            media.entries[0].fields.get("href"),
            Some(&Value::String("http://x".into()))
        );
    }

    #[test]
    fn reads_mapping_shape() {
        let doc = parse("Media:\n  - Emby:\n      href: http://x\nTools: []\n");
        assert_eq!(doc.category_names(), vec!["Media", "Tools"]);
        assert!(doc.category("Tools").unwrap().entries.is_empty());
    }

    #[test]
    fn coerces_non_string_keys() {
        let doc = parse("- 2024:\n  - 8080:\n      href: http://x\n  - true: {}\n");
        let cat = doc.category("2024").unwrap();
        assert_eq!(cat.entries[0].name, "8080");
        assert_eq!(cat.entries[1].name, "true");
    }

    #[test]
    fn empty_entry_value_becomes_empty_fields() {
        let doc = parse("- Media:\n  - Emby:\n");
        assert!(doc.entry("Media", "Emby").unwrap().fields.is_empty());
    }

    #[test]
    fn null_category_value_is_empty_category() {
        let doc = parse("- Media:\n");
        assert!(doc.category("Media").unwrap().entries.is_empty());
    }

    #[test]
    fn promotes_reserved_keys_to_flags() {
        let doc = parse(
            "- Media:\n  - Emby:\n      href: http://x\n      hidden: true\n      healthCheckDisabled: true\n",
        );
        let emby = doc.entry("Media", "Emby").unwrap();
        assert!(emby.hidden);
        assert!(emby.health_check_disabled);
        assert_eq!(emby.fields.len(), 1);
        assert!(emby.fields.get(HIDDEN_KEY).is_none());
        assert!(emby.fields.get(HEALTH_CHECK_DISABLED_KEY).is_none());
    }

    #[test]
    fn false_flag_is_removed_but_not_set() {
        let entry = Entry::new("Emby", fields("href: x\nhidden: false\n"));
        assert!(!entry.hidden);
        assert_eq!(entry.fields.len(), 1);
    }

    #[test]
    fn rejects_scalar_entry_value() {
        let value: Value = serde_yaml::from_str("- Media:\n  - Emby: http://x\n").unwrap();
        let err = Document::from_structural(Structural::from_value(value).unwrap()).unwrap_err();
        assert!(err.to_string().contains("Emby"));
        assert!(err.to_string().contains("Media"));
    }

    #[test]
    fn rejects_duplicate_categories() {
        let value: Value = serde_yaml::from_str("- Media: []\n- Media: []\n").unwrap();
        assert!(Document::from_structural(Structural::from_value(value).unwrap()).is_err());
    }

    #[test]
    fn rejects_scalar_top_level() {
        let value: Value = serde_yaml::from_str("just text").unwrap();
        assert!(Structural::from_value(value).is_err());
    }

    #[test]
    fn to_structural_omits_hidden_entries_and_flags() {
        let mut doc = Document::new();
        let media = doc.ensure_category("Media");
        media.entries.push(Entry::new("Emby", fields("href: http://x\n")));
        let mut plex = Entry::new("Plex", fields("href: http://y\n"));
        plex.hidden = true;
        media.entries.push(plex);
        let mut jelly = Entry::new("Jelly", fields("ping: http://z\n"));
        jelly.health_check_disabled = true;
        media.entries.push(jelly);

        let text = serde_yaml::to_string(&doc.to_structural()).unwrap();
        assert!(text.contains("Emby"));
        assert!(!text.contains("Plex"));
        assert!(!text.contains(HEALTH_CHECK_DISABLED_KEY));
        assert!(!text.contains(HIDDEN_KEY));

        let all = serde_yaml::to_string(&doc.structural(Visibility::All)).unwrap();
        assert!(all.contains("Plex"));
        assert!(!all.contains(HIDDEN_KEY));
    }

    #[test]
    fn structural_round_trip_preserves_order() {
        let doc = parse("Tools:\n  - B: {}\n  - A: {}\nMedia: []\n");
        let again = Document::from_structural(
            Structural::from_value(doc.to_structural()).unwrap(),
        )
        .unwrap();
        assert_eq!(doc, again);
        assert!(matches!(
            Structural::from_value(doc.to_structural()).unwrap(),
            Structural::Sequence(_)
        ));
    }

    #[test]
    fn sort_by_origin_puts_new_entries_last() {
        let mut cat = Category::new("Media");
        for (name, line) in [("New1", None), ("B", Some(9)), ("New2", None), ("A", Some(3))] {
            let mut e = Entry::new(name, Mapping::new());
            e.origin_line = line;
            cat.entries.push(e);
        }
        cat.sort_by_origin();
        let names: Vec<_> = cat.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "New1", "New2"]);
    }

    #[test]
    fn equality_ignores_origin_line() {
        let mut a = Entry::new("Emby", Mapping::new());
        let b = a.clone();
        a.origin_line = Some(4);
        assert_eq!(a, b);
    }

    #[test]
    fn prune_only_removes_empty_categories() {
        let mut doc = parse("- Media:\n  - Emby: {}\n- Tools: []\n");
        assert!(!doc.prune_if_empty("Media"));
        assert!(doc.prune_if_empty("Tools"));
        assert_eq!(doc.category_names(), vec!["Media"]);
    }
}
