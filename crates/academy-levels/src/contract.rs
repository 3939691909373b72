//! The level module contract.
//!
//! A level is mounted into a [`LevelContainer`], talks to the game only
//! through the [`LevelContext`] it is handed on every call, and ends its
//! attempt by consuming its [`OutcomeReporter`]. Because `report` takes the
//! reporter by value, a level cannot report twice; a restart always builds a
//! fresh instance.

use std::time::Duration;

use academy_core::language::Language;
use academy_i18n::Localizer;
use academy_progress::domain::outcome::Outcome;
use tokio::sync::oneshot;
use tracing::debug;

/// Severity of a dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    /// Neutral notice.
    Info,
    /// Positive feedback.
    Success,
    /// Something the player must correct.
    Warning,
}

/// A blocking dialog shown over the active screen until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    /// Severity.
    pub kind: DialogKind,
    /// Heading.
    pub title: String,
    /// Body text.
    pub message: String,
}

impl Dialog {
    /// Creates a dialog.
    pub fn new(kind: DialogKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// The display region a level draws into.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelContainer {
    lines: Vec<String>,
    prompt: Option<String>,
}

impl LevelContainer {
    /// Creates an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes all content.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.prompt = None;
    }

    /// Appends a line of content.
    pub fn push_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Sets the input hint shown under the content.
    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = Some(prompt.into());
    }

    /// Content lines, top to bottom.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Input hint, if any.
    #[must_use]
    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }
}

/// What a level may see and ask for while it runs.
pub struct LevelContext<'a> {
    localizer: &'a Localizer,
    language: Language,
    level: u32,
    elapsed: Duration,
    dialogs: &'a mut Vec<Dialog>,
}

impl<'a> LevelContext<'a> {
    /// Creates a context. Dialogs the level requests are pushed onto
    /// `dialogs` for the caller to present.
    pub fn new(
        localizer: &'a Localizer,
        language: Language,
        level: u32,
        elapsed: Duration,
        dialogs: &'a mut Vec<Dialog>,
    ) -> Self {
        Self {
            localizer,
            language,
            level,
            elapsed,
            dialogs,
        }
    }

    /// Localizes `key` in the active language.
    #[must_use]
    pub fn tr(&self, key: &str) -> String {
        self.localizer.resolve(key, self.language)
    }

    /// Localizes `key` with `{name}` substitutions.
    #[must_use]
    pub fn tr_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        self.localizer.resolve_with(key, self.language, args)
    }

    /// The active language.
    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    /// Index of the level being played.
    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Wall-clock time since the attempt started, pauses included.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Requests a feedback dialog.
    pub fn show_feedback(&mut self, dialog: Dialog) {
        self.dialogs.push(dialog);
    }
}

/// One-shot handle a level consumes to end its attempt.
#[derive(Debug)]
pub struct OutcomeReporter {
    level: u32,
    sender: oneshot::Sender<Outcome>,
}

/// The game's end of an [`OutcomeReporter`].
#[derive(Debug)]
pub struct OutcomeReceiver {
    receiver: oneshot::Receiver<Outcome>,
}

impl OutcomeReporter {
    /// Creates a connected reporter/receiver pair for one attempt at `level`.
    #[must_use]
    pub fn channel(level: u32) -> (Self, OutcomeReceiver) {
        let (sender, receiver) = oneshot::channel();
        (Self { level, sender }, OutcomeReceiver { receiver })
    }

    /// Reports the outcome, ending the attempt.
    pub fn report(self, outcome: Outcome) {
        if self.sender.send(outcome).is_err() {
            debug!(level = self.level, "attempt was abandoned before the outcome arrived");
        }
    }
}

impl OutcomeReceiver {
    /// Takes the outcome if the level has reported one.
    pub fn try_take(&mut self) -> Option<Outcome> {
        self.receiver.try_recv().ok()
    }
}

/// A unit of interactive content.
///
/// `init` is mandatory. `handle_input` and `render` are optional
/// capabilities; the defaults ignore input and decline to re-render.
pub trait LevelModule: Send {
    /// Mounts the level's UI into `container` and keeps `reporter` until the
    /// attempt ends.
    fn init(
        &mut self,
        container: &mut LevelContainer,
        ctx: &mut LevelContext<'_>,
        reporter: OutcomeReporter,
    );

    /// Reacts to one line of player input.
    fn handle_input(
        &mut self,
        _input: &str,
        _container: &mut LevelContainer,
        _ctx: &mut LevelContext<'_>,
    ) {
    }

    /// Redraws after a language change. Returns `false` if the level does
    /// not support re-rendering.
    fn render(&mut self, _container: &mut LevelContainer, _ctx: &mut LevelContext<'_>) -> bool {
        false
    }
}

/// Seconds left on the par clock, floored at zero.
#[must_use]
pub fn time_bonus(par_seconds: u32, elapsed: Duration) -> i32 {
    let elapsed = u32::try_from(elapsed.as_secs()).unwrap_or(u32::MAX);
    i32::try_from(par_seconds.saturating_sub(elapsed)).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_delivers_outcome_once() {
        // Arrange
        let (reporter, mut receiver) = OutcomeReporter::channel(1);
        assert!(receiver.try_take().is_none());

        // Act
        reporter.report(Outcome::success().with_score(10));

        // Assert
        assert_eq!(receiver.try_take().unwrap().score_delta, 10);
        assert!(receiver.try_take().is_none());
    }

    #[test]
    fn test_report_after_receiver_dropped_does_not_panic() {
        let (reporter, receiver) = OutcomeReporter::channel(2);
        drop(receiver);

        reporter.report(Outcome::failure());
    }

    #[test]
    fn test_time_bonus_counts_down_and_floors_at_zero() {
        assert_eq!(time_bonus(60, Duration::from_secs(45)), 15);
        assert_eq!(time_bonus(60, Duration::from_secs(600)), 0);
    }

    #[test]
    fn test_context_collects_feedback_and_localizes() {
        // Arrange
        let localizer = Localizer::builtin().unwrap();
        let mut dialogs = Vec::new();
        let mut ctx =
            LevelContext::new(&localizer, Language::Es, 3, Duration::from_secs(5), &mut dialogs);

        // Act
        let text = ctx.tr("quiz.correct");
        ctx.show_feedback(Dialog::new(DialogKind::Success, "t", "m"));

        // Assert
        assert_eq!(text, "¡Correcto!");
        assert_eq!(ctx.level(), 3);
        assert_eq!(dialogs.len(), 1);
    }
}
