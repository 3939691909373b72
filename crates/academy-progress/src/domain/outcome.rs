//! The record a level reports when an attempt ends.

use academy_core::error::GameError;
use serde::{Deserialize, Serialize};

/// Experience awarded when a level reports none (or zero).
pub const DEFAULT_XP_REWARD: u32 = 100;

/// One answered prompt in a detailed breakdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BreakdownEntry {
    /// The question as shown to the player.
    pub prompt_text: String,
    /// What the player picked; `None` when the prompt was skipped.
    pub chosen_answer_text: Option<String>,
    /// The expected answer.
    pub correct_answer_text: String,
    /// Whether the chosen answer was right.
    pub is_correct: bool,
    /// Why the correct answer is correct.
    pub explanation_text: String,
}

/// Result of one level attempt.
///
/// Only `success` is required on the wire; every other field has a default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Outcome {
    /// Whether the level counts as cleared.
    pub success: bool,
    /// Score to add to the running total.
    pub score_delta: u32,
    /// Experience to add; `None` or zero means [`DEFAULT_XP_REWARD`].
    pub xp_delta: Option<u32>,
    /// Accuracy shown on the summary screen, 0–100.
    pub accuracy_percent: u8,
    /// Bonus shown on the summary screen.
    pub time_bonus: i32,
    /// Per-question results; presence selects the detailed results view.
    pub breakdown: Option<Vec<BreakdownEntry>>,
}

impl Outcome {
    /// A cleared attempt with no scoring detail.
    #[must_use]
    pub fn success() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    /// A failed attempt with no scoring detail.
    #[must_use]
    pub fn failure() -> Self {
        Self::default()
    }

    /// Parses an outcome from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Validation` if the JSON is malformed.
    pub fn from_json(raw: &str) -> Result<Self, GameError> {
        serde_json::from_str(raw).map_err(|e| GameError::Validation(format!("invalid outcome: {e}")))
    }

    /// Sets the score delta.
    #[must_use]
    pub fn with_score(mut self, score_delta: u32) -> Self {
        self.score_delta = score_delta;
        self
    }

    /// Sets the experience delta.
    #[must_use]
    pub fn with_xp(mut self, xp_delta: u32) -> Self {
        self.xp_delta = Some(xp_delta);
        self
    }

    /// Sets the accuracy, clamped to 100.
    #[must_use]
    pub fn with_accuracy(mut self, accuracy_percent: u8) -> Self {
        self.accuracy_percent = accuracy_percent.min(100);
        self
    }

    /// Sets the time bonus.
    #[must_use]
    pub fn with_time_bonus(mut self, time_bonus: i32) -> Self {
        self.time_bonus = time_bonus;
        self
    }

    /// Attaches a per-question breakdown.
    #[must_use]
    pub fn with_breakdown(mut self, breakdown: Vec<BreakdownEntry>) -> Self {
        self.breakdown = Some(breakdown);
        self
    }

    /// Experience this outcome awards.
    #[must_use]
    pub fn effective_xp(&self) -> u32 {
        match self.xp_delta {
            Some(xp) if xp > 0 => xp,
            _ => DEFAULT_XP_REWARD,
        }
    }
}
