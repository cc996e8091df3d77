//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for every homecfg operation, whichever UI drives it.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** to the appropriate command function
//! - **Normalizes inputs** (field payloads from JSON or `key=value` pairs)
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It does no business logic (that lives in `commands/*.rs`), no terminal I/O
//! and no formatting.
//!
//! ## Generic Over DocumentStore
//!
//! `HomecfgApi<S: DocumentStore>` is generic over where the text lives:
//! - Production: `HomecfgApi<FileStore>`
//! - Testing: `HomecfgApi<InMemoryStore>`
//!
//! Every mutating call is one load, one transform and one save. Nothing is
//! cached between calls, so back-to-back calls always see the latest file.

use crate::commands;
use crate::error::{HomecfgError, Result};
use crate::store::DocumentStore;
use serde_yaml::{Mapping, Value};
use std::path::PathBuf;

pub use crate::commands::config::ConfigAction;
pub use crate::commands::{CmdMessage, CmdResult, EntryRef, MessageLevel, ValidationReport};

/// Where the API keeps things other than the document itself.
#[derive(Debug, Clone)]
pub struct HomecfgPaths {
    pub config_dir: PathBuf,
    pub backup_dir: PathBuf,
}

pub struct HomecfgApi<S: DocumentStore> {
    store: S,
    paths: HomecfgPaths,
}

impl<S: DocumentStore> HomecfgApi<S> {
    pub fn new(store: S, paths: HomecfgPaths) -> Self {
        Self { store, paths }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn paths(&self) -> &HomecfgPaths {
        &self.paths
    }

    // --- entries ---

    pub fn list_entries(&self) -> Result<CmdResult> {
        commands::get::list(&self.store)
    }

    pub fn get_entry(&self, category: &str, name: &str) -> Result<CmdResult> {
        commands::get::entry(&self.store, category, name)
    }

    pub fn add_entry(&mut self, category: &str, name: &str, fields: Mapping) -> Result<CmdResult> {
        commands::add::run(&mut self.store, category, name, fields)
    }

    pub fn update_entry(
        &mut self,
        category: &str,
        name: &str,
        fields: Mapping,
    ) -> Result<CmdResult> {
        commands::update::run(&mut self.store, category, name, fields)
    }

    pub fn delete_entry(&mut self, category: &str, name: &str) -> Result<CmdResult> {
        commands::delete::run(&mut self.store, category, name)
    }

    pub fn rename_entry(
        &mut self,
        category: &str,
        old_name: &str,
        new_name: &str,
    ) -> Result<CmdResult> {
        commands::rename::run(&mut self.store, category, old_name, new_name)
    }

    pub fn move_entry(&mut self, name: &str, from: &str, to: &str) -> Result<CmdResult> {
        commands::move_entry::run(&mut self.store, name, from, to)
    }

    pub fn reorder_entries<N: AsRef<str>>(
        &mut self,
        category: &str,
        order: &[N],
    ) -> Result<CmdResult> {
        commands::reorder::entries(&mut self.store, category, order)
    }

    pub fn set_hidden(&mut self, category: &str, name: &str, hidden: bool) -> Result<CmdResult> {
        commands::visibility::set_hidden(&mut self.store, category, name, hidden)
    }

    pub fn set_health_check_disabled(
        &mut self,
        category: &str,
        name: &str,
        disabled: bool,
    ) -> Result<CmdResult> {
        commands::visibility::set_health_check_disabled(&mut self.store, category, name, disabled)
    }

    // --- categories ---

    pub fn list_categories(&self) -> Result<CmdResult> {
        commands::categories::list(&self.store)
    }

    pub fn create_category(&mut self, name: &str) -> Result<CmdResult> {
        commands::categories::create(&mut self.store, name)
    }

    pub fn rename_category(&mut self, old_name: &str, new_name: &str) -> Result<CmdResult> {
        commands::categories::rename(&mut self.store, old_name, new_name)
    }

    pub fn delete_category(&mut self, name: &str, force: bool) -> Result<CmdResult> {
        commands::categories::delete(&mut self.store, name, force)
    }

    pub fn reorder_categories<N: AsRef<str>>(&mut self, order: &[N]) -> Result<CmdResult> {
        commands::reorder::categories(&mut self.store, order)
    }

    // --- whole document ---

    pub fn import_document(&mut self, raw: &str) -> Result<CmdResult> {
        commands::import::run(&mut self.store, raw)
    }

    pub fn export_document(&self) -> Result<CmdResult> {
        commands::export::run(&self.store)
    }

    pub fn active_document(&self) -> Result<CmdResult> {
        commands::active::run(&self.store)
    }

    pub fn validate_document(&self, raw: &str) -> Result<CmdResult> {
        commands::validate::run(raw)
    }

    pub fn backup(&self) -> Result<CmdResult> {
        commands::backup::run(&self.store, &self.paths.backup_dir)
    }

    pub fn example(&self) -> Result<CmdResult> {
        commands::example::run()
    }

    pub fn config(&self, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.paths.config_dir, action)
    }
}

/// Builds a field mapping from a JSON object.
pub fn fields_from_json(json: &str) -> Result<Mapping> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if !value.is_object() {
        return Err(HomecfgError::Parse(
            "fields must be a JSON object".to_string(),
        ));
    }
    match serde_yaml::to_value(value)? {
        Value::Mapping(map) => Ok(map),
        _ => Err(HomecfgError::Parse(
            "fields must be a JSON object".to_string(),
        )),
    }
}

/// Builds a field mapping from `key=value` pairs. Values are read as YAML
/// scalars, so `true` and `8080` keep their types; a dotted key
/// (`widget.type=emby`) nests.
pub fn fields_from_pairs<P: AsRef<str>>(pairs: &[P]) -> Result<Mapping> {
    let mut fields = Mapping::new();
    for pair in pairs {
        let pair = pair.as_ref();
        let (key, raw) = pair.split_once('=').ok_or_else(|| {
            HomecfgError::Parse(format!("expected key=value, got '{}'", pair))
        })?;
        let key = key.trim();
        if key.is_empty() || key.split('.').any(str::is_empty) {
            return Err(HomecfgError::Parse(format!("bad field key in '{}'", pair)));
        }
        insert_path(&mut fields, key, scalar(raw))?;
    }
    Ok(fields)
}

// Anything that would not read back as the same single scalar stays a string.
fn scalar(raw: &str) -> Value {
    if raw.is_empty() || raw.contains(" #") {
        return Value::String(raw.to_string());
    }
    match serde_yaml::from_str::<Value>(raw) {
        Ok(value @ (Value::Bool(_) | Value::Number(_))) => value,
        _ => Value::String(raw.to_string()),
    }
}

fn insert_path(map: &mut Mapping, dotted: &str, value: Value) -> Result<()> {
    match dotted.split_once('.') {
        None => {
            map.insert(Value::String(dotted.to_string()), value);
            Ok(())
        }
        Some((head, rest)) => {
            let slot = map
                .entry(Value::String(head.to_string()))
                .or_insert_with(|| Value::Mapping(Mapping::new()));
            match slot {
                Value::Mapping(inner) => insert_path(inner, rest, value),
                _ => Err(HomecfgError::Parse(format!(
                    "field '{}' is both a value and a group",
                    head
                ))),
            }
        }
    }
}
