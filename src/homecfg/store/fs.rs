use super::DocumentStore;
use crate::error::{HomecfgError, Result};
use log::info;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path).map_err(HomecfgError::Io)?;
        }
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "services".to_string());
        self.path
            .with_file_name(format!(".{}-{}.tmp", name, Uuid::new_v4()))
    }
}

impl DocumentStore for FileStore {
    fn load_text(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(HomecfgError::Io(err)),
        }
    }

    fn save_text(&mut self, text: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            self.ensure_dir(parent)?;
        }

        let tmp = self.tmp_path();
        if let Err(err) = fs::write(&tmp, text) {
            let _ = fs::remove_file(&tmp);
            return Err(HomecfgError::Io(err));
        }
        if let Err(err) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(HomecfgError::Io(err));
        }

        info!(
            "event=document_saved path={} bytes={}",
            self.path.display(),
            text.len()
        );
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
