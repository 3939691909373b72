//! Test stores: mock `ProgressStore` implementations for tests.

use std::sync::Mutex;

use academy_core::error::GameError;
use academy_core::store::{PersistedRecord, ProgressStore};
use async_trait::async_trait;

/// A progress store that remembers every saved record. `load` returns the
/// most recently saved record, or the initial one if nothing was saved yet.
#[derive(Debug, Default)]
pub struct RecordingProgressStore {
    initial: Option<PersistedRecord>,
    saved: Mutex<Vec<PersistedRecord>>,
}

impl RecordingProgressStore {
    /// Create a recording store that starts out holding `initial`.
    #[must_use]
    pub fn new(initial: Option<PersistedRecord>) -> Self {
        Self {
            initial,
            saved: Mutex::new(Vec::new()),
        }
    }

    /// Returns a snapshot of every record passed to `save`, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn saved_records(&self) -> Vec<PersistedRecord> {
        self.saved.lock().unwrap().clone()
    }

    /// Returns the last saved record, if any.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn last_saved(&self) -> Option<PersistedRecord> {
        self.saved.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ProgressStore for RecordingProgressStore {
    async fn load(&self) -> Result<Option<PersistedRecord>, GameError> {
        let saved = self.saved.lock().unwrap();
        Ok(saved.last().cloned().or_else(|| self.initial.clone()))
    }

    async fn save(&self, record: &PersistedRecord) -> Result<(), GameError> {
        self.saved.lock().unwrap().push(record.clone());
        Ok(())
    }
}

/// A store with nothing in it that silently accepts writes. Useful for
/// fresh-process scenarios.
#[derive(Debug)]
pub struct EmptyProgressStore;

#[async_trait]
impl ProgressStore for EmptyProgressStore {
    async fn load(&self) -> Result<Option<PersistedRecord>, GameError> {
        Ok(None)
    }

    async fn save(&self, _record: &PersistedRecord) -> Result<(), GameError> {
        Ok(())
    }
}

/// A store that fails every read and write. Useful for testing the
/// fall-back-to-defaults path.
#[derive(Debug)]
pub struct FailingProgressStore;

#[async_trait]
impl ProgressStore for FailingProgressStore {
    async fn load(&self) -> Result<Option<PersistedRecord>, GameError> {
        Err(GameError::Persistence("corrupt progress record".into()))
    }

    async fn save(&self, _record: &PersistedRecord) -> Result<(), GameError> {
        Err(GameError::Persistence("disk full".into()))
    }
}
