//! The screen surface.
//!
//! A renderer-agnostic model of everything the player can currently see.
//! Exactly one [`Screen`] is visible at a time; the orchestrator is the only
//! writer, front-ends only read.

use std::collections::VecDeque;

use academy_levels::{Dialog, LevelContainer};

/// The top-level screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Name entry.
    Landing,
    /// Briefing text.
    Intro,
    /// A level is loading, failed to load, or being played.
    Game,
    /// Outcome of the last attempt.
    Results,
    /// Mission picker.
    LevelSelect,
}

/// Static labels for the header, localized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderLabels {
    pub player: String,
    pub level: String,
    pub score: String,
    pub xp: String,
    pub paused: String,
    /// How to close the presented dialog.
    pub dismiss: String,
}

/// The title bar and progress UI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    /// Level title while a level is mounted, the app title otherwise.
    pub title: String,
    /// Whether the player/score/xp line is shown.
    pub progress_visible: bool,
    pub player: String,
    pub level: u32,
    pub score: u64,
    pub xp: u64,
    /// Session timer display, `MM:SS`.
    pub timer_text: String,
    pub timer_paused: bool,
    pub labels: HeaderLabels,
}

/// Name entry screen text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandingView {
    pub title: String,
    pub prompt: String,
    pub hint: String,
}

/// Briefing screen text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntroView {
    pub title: String,
    pub body: String,
    pub hint: String,
}

/// Availability of one mission in the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelStatus {
    Locked,
    Unlocked,
    /// The frontier: the highest unlocked mission.
    Current,
}

/// One row of the mission picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelSelectEntry {
    pub level: u32,
    pub title: String,
    pub status: LevelStatus,
    pub status_text: String,
}

/// The mission picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelSelectView {
    pub title: String,
    pub entries: Vec<LevelSelectEntry>,
    pub hint: String,
}

/// A labelled figure on the results screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    pub label: String,
    pub value: String,
}

/// One question in the detailed results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub prompt: String,
    pub is_correct: bool,
    /// The player's answer, or the localized "no answer" text.
    pub chosen: String,
    /// Present only for incorrect rows.
    pub correct_answer: Option<String>,
    pub explanation: String,
}

/// Column labels for the detailed results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerLabels {
    pub chosen: String,
    pub correct: String,
    pub explanation: String,
}

/// Actions offered on the results screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultAction {
    Next,
    Retry,
}

/// Which results layout is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultsLayout {
    /// Legacy single panel.
    Summary,
    /// Per-question table.
    Detailed,
}

/// The results screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsView {
    pub layout: ResultsLayout,
    pub level: u32,
    pub passed: bool,
    pub headline: String,
    /// `"6 of 10 correct"` on the detailed layout.
    pub subtitle: Option<String>,
    pub stats: Vec<Stat>,
    pub rows: Vec<ResultRow>,
    pub answer_labels: AnswerLabels,
    pub actions: Vec<(ResultAction, String)>,
}

/// Contents of the game screen's level region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LevelPane {
    #[default]
    Empty,
    /// Resolution in flight.
    Loading { level: u32, message: String },
    /// Resolution failed; shown inline instead of a module.
    Failed {
        level: u32,
        reason: String,
        message: String,
        hint: String,
    },
    /// A module is mounted and drawing here.
    Mounted { level: u32, container: LevelContainer },
}

/// Everything currently on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    visible: Screen,
    header: Header,
    landing: Option<LandingView>,
    intro: Option<IntroView>,
    level_select: Option<LevelSelectView>,
    level_pane: LevelPane,
    results: Option<ResultsView>,
    dialogs: VecDeque<Dialog>,
}

impl Default for Surface {
    fn default() -> Self {
        Self {
            visible: Screen::Landing,
            header: Header::default(),
            landing: None,
            intro: None,
            level_select: None,
            level_pane: LevelPane::Empty,
            results: None,
            dialogs: VecDeque::new(),
        }
    }
}

impl Surface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The visible screen.
    #[must_use]
    pub fn visible(&self) -> Screen {
        self.visible
    }

    #[must_use]
    pub fn header(&self) -> &Header {
        &self.header
    }

    #[must_use]
    pub fn landing(&self) -> Option<&LandingView> {
        self.landing.as_ref()
    }

    #[must_use]
    pub fn intro(&self) -> Option<&IntroView> {
        self.intro.as_ref()
    }

    #[must_use]
    pub fn level_select(&self) -> Option<&LevelSelectView> {
        self.level_select.as_ref()
    }

    #[must_use]
    pub fn level_pane(&self) -> &LevelPane {
        &self.level_pane
    }

    #[must_use]
    pub fn results(&self) -> Option<&ResultsView> {
        self.results.as_ref()
    }

    /// Open dialogs, oldest first. Only the first is presented.
    #[must_use]
    pub fn dialogs(&self) -> &VecDeque<Dialog> {
        &self.dialogs
    }

    /// The dialog currently presented.
    #[must_use]
    pub fn active_dialog(&self) -> Option<&Dialog> {
        self.dialogs.front()
    }

    /// Makes `screen` the only visible screen. Injected landing, briefing
    /// and picker content is cleared first, so showing a screen twice
    /// leaves the surface unchanged.
    pub fn show(&mut self, screen: Screen) {
        self.landing = None;
        self.intro = None;
        self.level_select = None;
        self.visible = screen;
    }

    pub(crate) fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    pub(crate) fn set_landing(&mut self, view: LandingView) {
        self.landing = Some(view);
    }

    pub(crate) fn set_intro(&mut self, view: IntroView) {
        self.intro = Some(view);
    }

    pub(crate) fn set_level_select(&mut self, view: LevelSelectView) {
        self.level_select = Some(view);
    }

    pub(crate) fn set_level_pane(&mut self, pane: LevelPane) {
        self.level_pane = pane;
    }

    pub(crate) fn level_pane_mut(&mut self) -> &mut LevelPane {
        &mut self.level_pane
    }

    pub(crate) fn set_results(&mut self, view: Option<ResultsView>) {
        self.results = view;
    }

    pub(crate) fn push_dialog(&mut self, dialog: Dialog) {
        self.dialogs.push_back(dialog);
    }

    pub(crate) fn pop_dialog(&mut self) -> Option<Dialog> {
        self.dialogs.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use academy_levels::DialogKind;

    use super::*;

    fn landing() -> LandingView {
        LandingView {
            title: "Welcome".into(),
            prompt: "Name?".into(),
            hint: String::new(),
        }
    }

    #[test]
    fn test_new_surface_shows_landing_only() {
        let surface = Surface::new();

        assert_eq!(surface.visible(), Screen::Landing);
        assert_eq!(*surface.level_pane(), LevelPane::Empty);
        assert!(surface.active_dialog().is_none());
    }

    #[test]
    fn test_show_clears_injected_content() {
        // Arrange
        let mut surface = Surface::new();
        surface.set_landing(landing());
        surface.set_intro(IntroView {
            title: "Briefing".into(),
            body: String::new(),
            hint: String::new(),
        });

        // Act
        surface.show(Screen::LevelSelect);

        // Assert
        assert_eq!(surface.visible(), Screen::LevelSelect);
        assert!(surface.landing().is_none());
        assert!(surface.intro().is_none());
    }

    #[test]
    fn test_show_is_idempotent() {
        // Arrange
        let mut surface = Surface::new();
        surface.set_landing(landing());
        surface.show(Screen::Results);
        let once = surface.clone();

        // Act
        surface.show(Screen::Results);

        // Assert
        assert_eq!(surface, once);
    }

    #[test]
    fn test_show_keeps_open_dialogs() {
        let mut surface = Surface::new();
        surface.push_dialog(Dialog::new(DialogKind::Info, "Title", "Body"));

        surface.show(Screen::Game);

        assert_eq!(surface.active_dialog().map(|d| d.title.as_str()), Some("Title"));
    }

    #[test]
    fn test_dialogs_are_presented_in_order() {
        let mut surface = Surface::new();
        surface.push_dialog(Dialog::new(DialogKind::Info, "first", ""));
        surface.push_dialog(Dialog::new(DialogKind::Warning, "second", ""));

        let popped = surface.pop_dialog();

        assert_eq!(popped.map(|d| d.title), Some("first".to_owned()));
        assert_eq!(surface.active_dialog().map(|d| d.title.as_str()), Some("second"));
    }
}
