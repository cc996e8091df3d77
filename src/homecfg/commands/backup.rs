use crate::commands::{CmdMessage, CmdResult};
use crate::error::{HomecfgError, Result};
use crate::store::DocumentStore;
use chrono::{Local, NaiveDateTime};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

const BACKUP_PREFIX: &str = "services_backup_";

pub fn backup_file_name(at: NaiveDateTime) -> String {
    format!("{}{}.yaml", BACKUP_PREFIX, at.format("%Y%m%d_%H%M%S"))
}

/// Copies the stored text, untouched, to a timestamped file in `backup_dir`.
pub fn run<S: DocumentStore>(store: &S, backup_dir: &Path) -> Result<CmdResult> {
    run_at(store, backup_dir, Local::now().naive_local())
}

pub fn run_at<S: DocumentStore>(
    store: &S,
    backup_dir: &Path,
    at: NaiveDateTime,
) -> Result<CmdResult> {
    let text = store
        .load_text()?
        .ok_or_else(|| HomecfgError::DocumentMissing(store.location()))?;

    if !backup_dir.exists() {
        fs::create_dir_all(backup_dir).map_err(HomecfgError::Io)?;
    }
    let path: PathBuf = backup_dir.join(backup_file_name(at));
    fs::write(&path, &text).map_err(HomecfgError::Io)?;
    info!("event=backup_written path={}", path.display());

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Backup created: {}",
        path.display()
    )));
    Ok(result.with_paths(vec![path]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::store::memory::fixtures::{sample_store, SAMPLE};
    use crate::store::memory::InMemoryStore;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(12, 30, 5)
            .unwrap()
    }

    #[test]
    fn file_name_has_timestamp() {
        assert_eq!(backup_file_name(noon()), "services_backup_20240309_123005.yaml");
    }

    #[test]
    fn copies_text_verbatim() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("backups");
        let result = run_at(&sample_store(), &target, noon()).unwrap();

        let path = &result.paths[0];
        assert_eq!(path, &target.join("services_backup_20240309_123005.yaml"));
        assert_eq!(fs::read_to_string(path).unwrap(), SAMPLE);
    }

    #[test]
    fn nothing_to_back_up() {
        let dir = tempdir().unwrap();
        let err = run(&InMemoryStore::new(), dir.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
