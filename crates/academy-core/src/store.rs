//! Progress store abstraction.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::language::Language;

/// Storage key the progress record is kept under.
pub const PROGRESS_KEY: &str = "academy.progress";

/// Durable snapshot of player progress.
///
/// Every field tolerates absence so that older or hand-edited records load
/// with defaults instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedRecord {
    /// Name the player entered on the landing screen.
    #[serde(default)]
    pub player_identifier: String,
    /// Highest level the player may select.
    #[serde(default = "default_max_unlocked_level")]
    pub max_unlocked_level: u32,
    /// Cumulative experience points.
    #[serde(default)]
    pub experience_points: u64,
    /// Cumulative score.
    #[serde(default)]
    pub score: u64,
    /// Raw language code; unknown codes are resolved by the consumer.
    #[serde(default = "default_language_code")]
    pub language_code: String,
}

fn default_max_unlocked_level() -> u32 {
    1
}

fn default_language_code() -> String {
    Language::default().code().to_owned()
}

impl Default for PersistedRecord {
    fn default() -> Self {
        Self {
            player_identifier: String::new(),
            max_unlocked_level: default_max_unlocked_level(),
            experience_points: 0,
            score: 0,
            language_code: default_language_code(),
        }
    }
}

impl PersistedRecord {
    /// Parses a record from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Persistence` if the JSON is malformed.
    pub fn from_json(raw: &str) -> Result<Self, GameError> {
        serde_json::from_str(raw)
            .map_err(|e| GameError::Persistence(format!("corrupt progress record: {e}")))
    }

    /// Serializes the record to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Persistence` if serialization fails.
    pub fn to_json(&self) -> Result<String, GameError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| GameError::Persistence(format!("record serialization failed: {e}")))
    }
}

/// Key-value store holding the single progress record.
///
/// Records are always read and written whole.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Load the record, or `None` if nothing has been saved yet.
    async fn load(&self) -> Result<Option<PersistedRecord>, GameError>;

    /// Replace the stored record.
    async fn save(&self, record: &PersistedRecord) -> Result<(), GameError>;
}
