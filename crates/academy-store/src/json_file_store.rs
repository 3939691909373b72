//! JSON file implementation of the `ProgressStore` trait.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use academy_core::error::GameError;
use academy_core::store::{PROGRESS_KEY, PersistedRecord, ProgressStore};
use async_trait::async_trait;
use tracing::debug;

/// Progress store that keeps the record in a single JSON file.
///
/// Writes go to a sibling temporary file that is then renamed over the
/// target, so a crash mid-write leaves the previous record intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store backed by `path`. The file need not exist yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store in `dir`, named after the progress key.
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(format!("{PROGRESS_KEY}.json")))
    }

    /// The backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn io_error(action: &str, path: &Path, err: &std::io::Error) -> GameError {
    GameError::Persistence(format!("failed to {action} {}: {err}", path.display()))
}

#[async_trait]
impl ProgressStore for JsonFileStore {
    async fn load(&self) -> Result<Option<PersistedRecord>, GameError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no progress file yet");
                return Ok(None);
            }
            Err(err) => return Err(io_error("read", &self.path, &err)),
        };
        PersistedRecord::from_json(&raw).map(Some)
    }

    async fn save(&self, record: &PersistedRecord) -> Result<(), GameError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error("create", parent, &e))?;
        }
        let json = record.to_json()?;
        let temp = self.temp_path();
        tokio::fs::write(&temp, json)
            .await
            .map_err(|e| io_error("write", &temp, &e))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| io_error("replace", &self.path, &e))?;
        debug!(path = %self.path.display(), "progress saved");
        Ok(())
    }
}
