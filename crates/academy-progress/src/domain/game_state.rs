//! The in-memory record of player progress.

use academy_core::error::GameError;
use academy_core::language::Language;
use academy_core::store::PersistedRecord;
use tracing::warn;

use super::outcome::Outcome;

/// What a reconciled outcome changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressChange {
    /// The level the outcome was recorded against.
    pub level: u32,
    /// Score added.
    pub score_added: u32,
    /// Experience added.
    pub xp_added: u32,
    /// Whether a new level was unlocked.
    pub unlocked_next: bool,
}

/// Player progress for the running session.
///
/// Invariants held by every method:
/// - `1 <= current_level <= max_unlocked_level`
/// - `max_unlocked_level` never decreases
/// - `experience_points` never decreases
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    player_identifier: String,
    current_level: u32,
    max_unlocked_level: u32,
    score: u64,
    experience_points: u64,
    language: Language,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            player_identifier: String::new(),
            current_level: 1,
            max_unlocked_level: 1,
            score: 0,
            experience_points: 0,
            language: Language::default(),
        }
    }
}

impl GameState {
    /// Rebuilds state from a persisted record. The current level starts at
    /// the highest unlocked level.
    #[must_use]
    pub fn from_record(record: &PersistedRecord) -> Self {
        let language = record.language_code.parse().unwrap_or_else(|err| {
            warn!(code = %record.language_code, %err, "unknown persisted language, using default");
            Language::default()
        });
        if record.max_unlocked_level == 0 {
            warn!("persisted maxUnlockedLevel was 0, clamping to 1");
        }
        let max_unlocked_level = record.max_unlocked_level.max(1);
        Self {
            player_identifier: record.player_identifier.trim().to_owned(),
            current_level: max_unlocked_level,
            max_unlocked_level,
            score: record.score,
            experience_points: record.experience_points,
            language,
        }
    }

    /// Snapshot for the progress store.
    #[must_use]
    pub fn to_record(&self) -> PersistedRecord {
        PersistedRecord {
            player_identifier: self.player_identifier.clone(),
            max_unlocked_level: self.max_unlocked_level,
            experience_points: self.experience_points,
            score: self.score,
            language_code: self.language.code().to_owned(),
        }
    }

    /// The player's name, empty before a session begins.
    #[must_use]
    pub fn player_identifier(&self) -> &str {
        &self.player_identifier
    }

    /// Whether a player name has been recorded.
    #[must_use]
    pub fn has_player(&self) -> bool {
        !self.player_identifier.is_empty()
    }

    /// The level being attempted or last attempted.
    #[must_use]
    pub fn current_level(&self) -> u32 {
        self.current_level
    }

    /// The highest selectable level.
    #[must_use]
    pub fn max_unlocked_level(&self) -> u32 {
        self.max_unlocked_level
    }

    /// Cumulative score.
    #[must_use]
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Cumulative experience.
    #[must_use]
    pub fn experience_points(&self) -> u64 {
        self.experience_points
    }

    /// Active display language.
    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    /// Whether `level` may be selected.
    #[must_use]
    pub fn is_unlocked(&self, level: u32) -> bool {
        (1..=self.max_unlocked_level).contains(&level)
    }

    /// Records the player's name.
    pub fn set_player(&mut self, name: &str) {
        name.trim().clone_into(&mut self.player_identifier);
    }

    /// Switches language. Returns `false` if it was already active.
    pub fn set_language(&mut self, language: Language) -> bool {
        if self.language == language {
            return false;
        }
        self.language = language;
        true
    }

    /// Points the session at `level`.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Validation` if `level` is not unlocked.
    pub fn select_level(&mut self, level: u32) -> Result<(), GameError> {
        if !self.is_unlocked(level) {
            return Err(GameError::Validation(format!(
                "level {level} is locked (max unlocked {})",
                self.max_unlocked_level
            )));
        }
        self.current_level = level;
        Ok(())
    }

    /// Resumes at the highest unlocked level.
    pub fn resume_at_frontier(&mut self) {
        self.current_level = self.max_unlocked_level;
    }

    /// Raises `max_unlocked_level` to at least `level`. Never lowers it.
    pub fn unlock_through(&mut self, level: u32) {
        self.max_unlocked_level = self.max_unlocked_level.max(level);
    }

    /// Merges an outcome for `level` into the running totals and points the
    /// session at that level.
    ///
    /// The next level unlocks only when `level` is the frontier and the
    /// outcome is a success; replays never unlock. An outcome for a level
    /// that is not unlocked is scored but moves nothing.
    pub fn apply_outcome(&mut self, level: u32, outcome: &Outcome) -> ProgressChange {
        let xp_added = outcome.effective_xp();
        self.score = self.score.saturating_add(u64::from(outcome.score_delta));
        self.experience_points = self.experience_points.saturating_add(u64::from(xp_added));

        if self.is_unlocked(level) {
            self.current_level = level;
        } else {
            warn!(level, max_unlocked = self.max_unlocked_level, "outcome for a locked level");
        }
        let unlocked_next = outcome.success
            && level == self.max_unlocked_level
            && self.max_unlocked_level < u32::MAX;
        if unlocked_next {
            self.max_unlocked_level = self.max_unlocked_level.saturating_add(1);
        }

        ProgressChange {
            level,
            score_added: outcome.score_delta,
            xp_added,
            unlocked_next,
        }
    }
}
