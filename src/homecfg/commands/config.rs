use crate::commands::{CmdMessage, CmdResult};
use crate::config::{AppConfig, CONFIG_KEYS};
use crate::error::Result;
use log::info;
use std::path::Path;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

/// Reads or changes `config.json`. Bad keys and values come back as error
/// messages, not as `Err`; only I/O and JSON failures are errors.
pub fn run(config_dir: &Path, action: ConfigAction) -> Result<CmdResult> {
    let mut config = AppConfig::load(config_dir)?;
    let mut result = CmdResult::default();

    match action {
        ConfigAction::ShowAll => return Ok(result.with_config(config)),
        ConfigAction::ShowKey(key) => match config.get(&key) {
            Some(value) => result.add_message(CmdMessage::info(value)),
            None => result.add_message(CmdMessage::error(format!(
                "Unknown config key: {} (expected one of: {})",
                key,
                CONFIG_KEYS.join(", ")
            ))),
        },
        ConfigAction::Set(key, value) => {
            if let Err(reason) = config.set(&key, &value) {
                result.add_message(CmdMessage::error(reason));
                return Ok(result);
            }
            config.save(config_dir)?;
            info!("event=config_saved key={}", key);
            let stored = config.get(&key).unwrap_or(value);
            result.add_message(CmdMessage::success(format!("{} = {}", key, stored)));
            return Ok(result.with_config(config));
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use tempfile::tempdir;

    #[test]
    fn show_all_defaults() {
        let dir = tempdir().unwrap();
        let result = run(dir.path(), ConfigAction::ShowAll).unwrap();
        assert_eq!(result.config, Some(AppConfig::default()));
    }

    #[test]
    fn set_persists() {
        let dir = tempdir().unwrap();
        run(
            dir.path(),
            ConfigAction::Set("services-file".into(), "/srv/services.yaml".into()),
        )
        .unwrap();
        let result = run(dir.path(), ConfigAction::ShowKey("services-file".into())).unwrap();
        assert_eq!(result.messages[0].content, "/srv/services.yaml");
    }

    #[test]
    fn unknown_key_is_reported() {
        let dir = tempdir().unwrap();
        let result = run(dir.path(), ConfigAction::Set("colour".into(), "red".into())).unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Error);
        assert!(!dir.path().join("config.json").exists());

        let result = run(dir.path(), ConfigAction::ShowKey("colour".into())).unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Error);
    }
}
