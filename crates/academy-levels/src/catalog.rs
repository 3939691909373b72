//! Mission catalogs.
//!
//! A catalog is a YAML document listing missions in play order; a mission's
//! level index is its position plus one. Content problems surface when the
//! level is resolved, not when the catalog is read, so one broken mission
//! does not take the rest of the campaign down with it.

use std::sync::{Arc, Mutex, PoisonError};

use academy_core::error::GameError;
use academy_core::rng::DeterministicRng;
use serde::Deserialize;
use tracing::info;

use crate::contract::LevelModule;
use crate::kinds::cipher::{CipherLevel, CipherSpec};
use crate::kinds::quiz::{QuizLevel, QuizSpec};
use crate::registry::LevelRegistry;

/// Shared RNG handed to mission factories.
pub type SharedRng = Arc<Mutex<dyn DeterministicRng + Send>>;

/// One mission's authoring data.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MissionSpec {
    /// Multiple-choice quiz.
    Quiz(QuizSpec),
    /// Caesar-cipher decoding.
    Cipher(CipherSpec),
}

impl MissionSpec {
    /// Builds a fresh level from this spec.
    ///
    /// # Errors
    ///
    /// Returns `GameError::ModuleLoad` if the content is not playable.
    pub fn build(&self, level: u32, rng: &SharedRng) -> Result<Box<dyn LevelModule>, GameError> {
        let built: Result<Box<dyn LevelModule>, GameError> = match self {
            Self::Quiz(spec) => {
                let mut rng = rng.lock().unwrap_or_else(PoisonError::into_inner);
                QuizLevel::try_new(spec.clone(), &mut *rng)
                    .map(|quiz| Box::new(quiz) as Box<dyn LevelModule>)
            }
            Self::Cipher(spec) => CipherLevel::try_new(spec.clone())
                .map(|cipher| Box::new(cipher) as Box<dyn LevelModule>),
        };
        built.map_err(|err| GameError::ModuleLoad {
            level,
            reason: err.to_string(),
        })
    }
}

/// An ordered list of missions.
#[derive(Debug, Clone, Deserialize)]
pub struct MissionCatalog {
    /// Missions in play order.
    pub missions: Vec<MissionSpec>,
}

impl MissionCatalog {
    /// Parses a catalog from YAML.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Validation` if the YAML does not describe a
    /// catalog.
    pub fn from_yaml(yaml: &str) -> Result<Self, GameError> {
        serde_yaml::from_str(yaml)
            .map_err(|e| GameError::Validation(format!("invalid mission catalog: {e}")))
    }

    /// Number of missions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.missions.len()
    }

    /// Whether the catalog has no missions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.missions.is_empty()
    }

    /// Registers one factory per mission, numbered from 1.
    #[must_use]
    pub fn into_registry(self, rng: SharedRng) -> LevelRegistry {
        let mut registry = LevelRegistry::new();
        for (level, spec) in (1u32..).zip(self.missions) {
            let rng = Arc::clone(&rng);
            registry.register(level, move || spec.build(level, &rng));
        }
        info!(levels = registry.levels().count(), "mission catalog registered");
        registry
    }
}
