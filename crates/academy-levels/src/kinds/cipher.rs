//! Caesar-cipher decoding missions.
//!
//! The player decodes a shifted message. Each wrong guess costs points from
//! the mission's local score, which never drops below the mission floor.
//! Cipher missions report no breakdown and end on the summary screen.

use academy_core::error::GameError;
use academy_progress::application::results::percentage;
use academy_progress::domain::outcome::Outcome;
use serde::Deserialize;

use crate::contract::{
    Dialog, DialogKind, LevelContainer, LevelContext, LevelModule, OutcomeReporter, time_bonus,
};

/// Authoring form of a cipher mission.
#[derive(Debug, Clone, Deserialize)]
pub struct CipherSpec {
    /// The decoded message.
    pub plaintext: String,
    /// Alphabet shift used to encode it.
    pub shift: u8,
    /// Guesses allowed before the mission fails.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Starting local score.
    #[serde(default = "default_points")]
    pub points: u32,
    /// Deducted per wrong guess.
    #[serde(default = "default_penalty")]
    pub penalty: u32,
    /// Lowest the local score can fall.
    #[serde(default = "default_floor")]
    pub floor: u32,
    /// Experience for finishing; the game default applies when absent.
    #[serde(default)]
    pub xp: Option<u32>,
    /// Seconds before the time bonus runs out.
    #[serde(default = "default_par_seconds")]
    pub par_seconds: u32,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_points() -> u32 {
    300
}

fn default_penalty() -> u32 {
    50
}

fn default_floor() -> u32 {
    100
}

fn default_par_seconds() -> u32 {
    90
}

impl CipherSpec {
    /// Checks the spec can be played.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Validation` describing the problem.
    pub fn validate(&self) -> Result<(), GameError> {
        if !self.plaintext.chars().any(|c| c.is_ascii_alphabetic()) {
            return Err(GameError::Validation(
                "cipher plaintext has no letters to encode".into(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(GameError::Validation("cipher allows zero attempts".into()));
        }
        if self.floor > self.points {
            return Err(GameError::Validation(format!(
                "cipher floor {} exceeds starting points {}",
                self.floor, self.points
            )));
        }
        Ok(())
    }
}

/// Shifts ASCII letters forward by `shift`, preserving case.
#[must_use]
pub fn encode(text: &str, shift: u8) -> String {
    let shift = shift % 26;
    text.chars()
        .map(|c| {
            let base = match c {
                'a'..='z' => b'a',
                'A'..='Z' => b'A',
                _ => return c,
            };
            char::from((c as u8 - base + shift) % 26 + base)
        })
        .collect()
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_uppercase()
}

/// A running cipher attempt.
#[derive(Debug)]
pub struct CipherLevel {
    spec: CipherSpec,
    ciphertext: String,
    attempts_used: u32,
    points: u32,
    reporter: Option<OutcomeReporter>,
}

impl CipherLevel {
    /// Builds a cipher attempt.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Validation` if the spec is not playable.
    pub fn try_new(spec: CipherSpec) -> Result<Self, GameError> {
        spec.validate()?;
        let ciphertext = encode(&spec.plaintext.to_ascii_uppercase(), spec.shift);
        let points = spec.points;
        Ok(Self {
            spec,
            ciphertext,
            attempts_used: 0,
            points,
            reporter: None,
        })
    }

    /// Current local score.
    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }

    fn attempts_left(&self) -> u32 {
        self.spec.max_attempts.saturating_sub(self.attempts_used)
    }

    fn draw(&self, container: &mut LevelContainer, ctx: &LevelContext<'_>) {
        container.clear();
        let shift = self.spec.shift.to_string();
        let attempts = self.attempts_left().to_string();
        container.push_line(ctx.tr_with("cipher.prompt", &[("shift", shift.as_str())]));
        container.push_line(format!("  {}", self.ciphertext));
        container.push_line(ctx.tr_with(
            "cipher.attempts_left",
            &[("attempts", attempts.as_str())],
        ));
    }

    fn report(&mut self, outcome: Outcome) {
        if let Some(reporter) = self.reporter.take() {
            reporter.report(outcome);
        }
    }
}

impl LevelModule for CipherLevel {
    fn init(
        &mut self,
        container: &mut LevelContainer,
        ctx: &mut LevelContext<'_>,
        reporter: OutcomeReporter,
    ) {
        self.reporter = Some(reporter);
        self.draw(container, ctx);
    }

    fn handle_input(
        &mut self,
        input: &str,
        container: &mut LevelContainer,
        ctx: &mut LevelContext<'_>,
    ) {
        if self.reporter.is_none() || input.trim().is_empty() {
            return;
        }
        self.attempts_used += 1;

        if normalize(input) == normalize(&self.spec.plaintext) {
            let bonus = time_bonus(self.spec.par_seconds, ctx.elapsed());
            let attempts = usize::try_from(self.attempts_used).unwrap_or(usize::MAX);
            let accuracy = u8::try_from(percentage(1, attempts)).unwrap_or(100);
            let mut outcome = Outcome::success()
                .with_score(self.points.saturating_add(bonus.unsigned_abs()))
                .with_accuracy(accuracy)
                .with_time_bonus(bonus);
            outcome.xp_delta = self.spec.xp;
            ctx.show_feedback(Dialog::new(
                DialogKind::Success,
                ctx.tr("cipher.correct"),
                self.spec.plaintext.clone(),
            ));
            container.clear();
            self.report(outcome);
            return;
        }

        let before = self.points;
        self.points = self
            .points
            .saturating_sub(self.spec.penalty)
            .max(self.spec.floor);
        let deducted = (before - self.points).to_string();
        ctx.show_feedback(Dialog::new(
            DialogKind::Warning,
            self.ciphertext.clone(),
            ctx.tr_with("cipher.wrong", &[("points", deducted.as_str())]),
        ));

        if self.attempts_left() == 0 {
            let mut outcome = Outcome::failure();
            outcome.xp_delta = self.spec.xp;
            container.clear();
            self.report(outcome);
        } else {
            self.draw(container, ctx);
        }
    }

    fn render(&mut self, container: &mut LevelContainer, ctx: &mut LevelContext<'_>) -> bool {
        if self.reporter.is_some() {
            self.draw(container, ctx);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use academy_core::language::Language;
    use academy_i18n::Localizer;

    use super::*;
    use crate::contract::OutcomeReceiver;

    fn spec() -> CipherSpec {
        CipherSpec {
            plaintext: "hello cadet".into(),
            shift: 3,
            max_attempts: 3,
            points: 300,
            penalty: 150,
            floor: 100,
            xp: None,
            par_seconds: 90,
        }
    }

    fn start(level: &mut CipherLevel, localizer: &Localizer) -> (LevelContainer, OutcomeReceiver) {
        let (reporter, receiver) = OutcomeReporter::channel(2);
        let mut container = LevelContainer::new();
        let mut dialogs = Vec::new();
        let mut ctx = LevelContext::new(localizer, Language::En, 2, Duration::ZERO, &mut dialogs);
        level.init(&mut container, &mut ctx, reporter);
        (container, receiver)
    }

    fn guess(
        level: &mut CipherLevel,
        localizer: &Localizer,
        container: &mut LevelContainer,
        text: &str,
        elapsed_secs: u64,
    ) -> Vec<Dialog> {
        let mut dialogs = Vec::new();
        let mut ctx = LevelContext::new(
            localizer,
            Language::En,
            2,
            Duration::from_secs(elapsed_secs),
            &mut dialogs,
        );
        level.handle_input(text, container, &mut ctx);
        dialogs
    }

    #[test]
    fn test_encode_shifts_letters_and_keeps_everything_else() {
        assert_eq!(encode("Hello, XYZ!", 3), "Khoor, ABC!");
        assert_eq!(encode("abc", 29), "def");
    }

    #[test]
    fn test_init_shows_encoded_message() {
        let localizer = Localizer::builtin().unwrap();
        let mut level = CipherLevel::try_new(spec()).unwrap();

        let (container, _receiver) = start(&mut level, &localizer);

        assert_eq!(container.lines()[1], "  KHOOR FDGHW");
        assert_eq!(container.lines()[2], "Attempts left: 3");
    }

    #[test]
    fn test_correct_guess_reports_success_with_bonus() {
        // Arrange
        let localizer = Localizer::builtin().unwrap();
        let mut level = CipherLevel::try_new(spec()).unwrap();
        let (mut container, mut receiver) = start(&mut level, &localizer);

        // Act
        let dialogs = guess(&mut level, &localizer, &mut container, "  Hello   CADET ", 30);

        // Assert
        let outcome = receiver.try_take().unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.time_bonus, 60);
        assert_eq!(outcome.score_delta, 360);
        assert_eq!(outcome.accuracy_percent, 100);
        assert!(outcome.breakdown.is_none());
        assert_eq!(dialogs[0].kind, DialogKind::Success);
    }

    #[test]
    fn test_wrong_guesses_deduct_points_down_to_floor() {
        // Arrange
        let localizer = Localizer::builtin().unwrap();
        let mut level = CipherLevel::try_new(spec()).unwrap();
        let (mut container, mut receiver) = start(&mut level, &localizer);

        // Act
        let first = guess(&mut level, &localizer, &mut container, "goodbye", 1);
        let second = guess(&mut level, &localizer, &mut container, "nope", 2);

        // Assert
        assert_eq!(level.points(), 100);
        assert_eq!(first[0].message, "That is not it. 150 points deducted.");
        assert_eq!(second[0].message, "That is not it. 50 points deducted.");
        assert!(receiver.try_take().is_none());
    }

    #[test]
    fn test_running_out_of_attempts_reports_failure() {
        let localizer = Localizer::builtin().unwrap();
        let mut level = CipherLevel::try_new(spec()).unwrap();
        let (mut container, mut receiver) = start(&mut level, &localizer);

        for _ in 0..3 {
            guess(&mut level, &localizer, &mut container, "wrong", 1);
        }

        let outcome = receiver.try_take().unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.score_delta, 0);
        assert!(container.lines().is_empty());
    }

    #[test]
    fn test_try_new_rejects_floor_above_points() {
        let mut bad = spec();
        bad.floor = 500;

        assert!(matches!(
            CipherLevel::try_new(bad),
            Err(GameError::Validation(_))
        ));
    }
}
