use crate::error::{HomecfgError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_SERVICES_FILE: &str = "config/services.yaml";
const DEFAULT_BACKUP_DIR: &str = "backups";

/// Keys accepted by `get` / `set`, in display order.
pub const CONFIG_KEYS: [&str; 2] = ["services-file", "backup-dir"];

/// Configuration for homecfg, stored in `<config dir>/config.json`.
///
/// Relative paths are resolved against the config dir.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    /// The services document to edit
    #[serde(default = "default_services_file")]
    pub services_file: String,

    /// Where `backup` puts timestamped copies
    #[serde(default = "default_backup_dir")]
    pub backup_dir: String,
}

fn default_services_file() -> String {
    DEFAULT_SERVICES_FILE.to_string()
}

fn default_backup_dir() -> String {
    DEFAULT_BACKUP_DIR.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            services_file: default_services_file(),
            backup_dir: default_backup_dir(),
        }
    }
}

impl AppConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(HomecfgError::Io)?;
        let config: AppConfig = serde_json::from_str(&content).map_err(HomecfgError::Json)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(HomecfgError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(HomecfgError::Json)?;
        fs::write(config_path, content).map_err(HomecfgError::Io)?;
        Ok(())
    }

    pub fn services_path(&self, config_dir: &Path) -> PathBuf {
        resolve(config_dir, &self.services_file)
    }

    pub fn backup_path(&self, config_dir: &Path) -> PathBuf {
        resolve(config_dir, &self.backup_dir)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "services-file" => Some(self.services_file.clone()),
            "backup-dir" => Some(self.backup_dir.clone()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        let value = value.trim();
        if value.is_empty() {
            return Err(format!("{} cannot be empty", key));
        }
        match key {
            "services-file" => self.services_file = value.to_string(),
            "backup-dir" => self.backup_dir = value.to_string(),
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }
}

fn resolve(base: &Path, value: &str) -> PathBuf {
    let path = Path::new(value);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
