//! Runtime configuration read from the environment.

use std::path::PathBuf;

use academy_orchestrator::OrchestratorConfig;

use crate::error::AppError;

/// Save file used when `ACADEMY_SAVE_PATH` is unset.
pub const DEFAULT_SAVE_PATH: &str = "academy-progress.json";

/// Reserved player name used when `ACADEMY_RESERVED_NAME` is unset.
pub const DEFAULT_RESERVED_NAME: &str = "admin";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable lines.
    Pretty,
}

/// Terminal front-end configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Where progress is saved.
    pub save_path: PathBuf,
    /// A YAML mission catalog to play instead of the built-in one.
    pub missions_path: Option<PathBuf>,
    /// Player name that unlocks every mission; `None` disables it.
    pub reserved_name: Option<String>,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable holds an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let save_path = lookup("ACADEMY_SAVE_PATH")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SAVE_PATH.to_owned());
        let missions_path = lookup("ACADEMY_MISSIONS")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        let reserved_name = match lookup("ACADEMY_RESERVED_NAME") {
            None => Some(DEFAULT_RESERVED_NAME.to_owned()),
            Some(value) if value.trim().is_empty() => None,
            Some(value) => Some(value.trim().to_owned()),
        };
        let log_format = match lookup("ACADEMY_LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("" | "json") => LogFormat::Json,
            Some("pretty") => LogFormat::Pretty,
            Some(other) => {
                return Err(AppError::Config(format!(
                    "ACADEMY_LOG_FORMAT must be json or pretty, got {other:?}"
                )));
            }
        };

        Ok(Self {
            save_path: PathBuf::from(save_path),
            missions_path,
            reserved_name,
            log_format,
        })
    }

    /// The orchestrator settings this configuration implies.
    #[must_use]
    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            reserved_name: self.reserved_name.clone(),
        }
    }
}
