//! The game orchestrator.
//!
//! Owns the [`GameState`] and is its only writer. Every player action and
//! every level outcome flows through here: load state, mutate, persist,
//! re-render. Level resolution is asynchronous, so each load takes a
//! [`LoadTicket`]; a resolution that finishes after a newer load has begun
//! is discarded.

use std::sync::Arc;
use std::time::Duration;

use academy_core::clock::Clock;
use academy_core::error::GameError;
use academy_core::language::Language;
use academy_core::store::ProgressStore;
use academy_i18n::Localizer;
use academy_levels::{
    Dialog, DialogKind, LevelContainer, LevelContext, LevelLoader, LevelModule, OutcomeReceiver,
    OutcomeReporter,
};
use academy_progress::application::results::ResultsReport;
use academy_progress::domain::game_state::GameState;
use academy_progress::domain::outcome::Outcome;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::screen::{LevelPane, Screen, Surface};
use crate::timer::SessionTimer;
use crate::views;

/// Behavior switches for the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Player name that unlocks every level on session start, compared
    /// case-insensitively. `None` disables it.
    pub reserved_name: Option<String>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            reserved_name: Some("admin".to_owned()),
        }
    }
}

/// Identifies one level load. Only the most recent ticket may mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    level: u32,
    attempt_id: Uuid,
}

impl LoadTicket {
    /// The level being loaded.
    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Correlates log lines for this attempt.
    #[must_use]
    pub fn attempt_id(&self) -> Uuid {
        self.attempt_id
    }
}

struct ActiveLevel {
    level: u32,
    attempt_id: Uuid,
    module: Box<dyn LevelModule>,
    outcome: OutcomeReceiver,
}

struct CompletedAttempt {
    level: u32,
    report: ResultsReport,
}

enum PaneRefresh {
    Module,
    Loading(u32),
    Failed(u32, String),
    Nothing,
}

/// Coordinates screens, levels, the session timer and persistence.
pub struct Orchestrator {
    clock: Arc<dyn Clock>,
    store: Arc<dyn ProgressStore>,
    loader: Arc<dyn LevelLoader>,
    localizer: Arc<Localizer>,
    config: OrchestratorConfig,
    state: GameState,
    surface: Surface,
    timer: SessionTimer,
    generation: u64,
    active: Option<ActiveLevel>,
    last_results: Option<CompletedAttempt>,
    progress_visible: bool,
    paused_by_player: bool,
    paused_by_dialog: bool,
}

impl Orchestrator {
    /// Creates an orchestrator with default state showing nothing yet.
    /// Call [`start`](Self::start) to load saved progress.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        store: Arc<dyn ProgressStore>,
        loader: Arc<dyn LevelLoader>,
        localizer: Arc<Localizer>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            clock,
            store,
            loader,
            localizer,
            config,
            state: GameState::default(),
            surface: Surface::new(),
            timer: SessionTimer::new(),
            generation: 0,
            active: None,
            last_results: None,
            progress_visible: false,
            paused_by_player: false,
            paused_by_dialog: false,
        }
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    #[must_use]
    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    /// Number of loads begun so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The level whose module is mounted, if any.
    #[must_use]
    pub fn mounted_level(&self) -> Option<u32> {
        self.active.as_ref().map(|active| active.level)
    }

    /// The highest level the loader knows about.
    #[must_use]
    pub fn level_count(&self) -> u32 {
        self.loader.level_count()
    }

    fn language(&self) -> Language {
        self.state.language()
    }

    fn tr(&self, key: &str) -> String {
        self.localizer.resolve(key, self.language())
    }

    fn tr_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        self.localizer.resolve_with(key, self.language(), args)
    }

    /// Loads saved progress and picks the first screen.
    ///
    /// A saved record with a player name resumes at the highest unlocked
    /// level. Anything else, including an unreadable record, shows the
    /// landing screen with default state.
    #[instrument(skip(self))]
    pub async fn start(&mut self) {
        let record = match self.store.load().await {
            Ok(record) => record,
            Err(err) => {
                warn!(%err, "saved progress unreadable, starting fresh");
                None
            }
        };
        if let Some(record) = &record {
            self.state = GameState::from_record(record);
        }

        if self.state.has_player() {
            info!(
                player = self.state.player_identifier(),
                max_unlocked = self.state.max_unlocked_level(),
                "returning player"
            );
            self.resume_at_frontier();
            self.progress_visible = true;
            self.load_level(self.state.current_level()).await;
        } else {
            self.show_landing();
        }
    }

    /// Shows the name entry screen.
    pub fn show_landing(&mut self) {
        self.leave_level();
        self.surface.show(Screen::Landing);
        self.surface
            .set_landing(views::landing(&self.localizer, self.language()));
        self.refresh_header();
    }

    /// Shows the briefing screen.
    pub fn show_intro(&mut self) {
        self.leave_level();
        self.surface.show(Screen::Intro);
        self.surface
            .set_intro(views::intro(&self.localizer, self.language()));
        self.refresh_header();
    }

    /// Starts a session for `entered_name` and loads the frontier level.
    ///
    /// With `skip_validation` the name is ignored and the player already in
    /// state is kept, for re-entering a returning session.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Validation` if the trimmed name is empty. A
    /// dialog has been raised and nothing else changed.
    #[instrument(skip(self, entered_name))]
    pub async fn begin_session(
        &mut self,
        entered_name: &str,
        skip_validation: bool,
    ) -> Result<(), GameError> {
        if !skip_validation {
            let name = entered_name.trim();
            if name.is_empty() {
                self.raise_dialog(Dialog::new(
                    DialogKind::Warning,
                    self.tr("dialog.validation.title"),
                    self.tr("dialog.validation.empty_name"),
                ));
                return Err(GameError::Validation("player name is empty".into()));
            }
            if self.is_reserved_name(name) {
                warn!("reserved player name entered, unlocking every level");
                self.state.unlock_through(self.loader.level_count());
            }
            self.state.set_player(name);
        }

        self.resume_at_frontier();
        self.progress_visible = true;
        self.persist().await;
        info!(
            player = self.state.player_identifier(),
            level = self.state.current_level(),
            "session started"
        );
        self.load_level(self.state.current_level()).await;
        Ok(())
    }

    fn is_reserved_name(&self, name: &str) -> bool {
        self.config
            .reserved_name
            .as_deref()
            .is_some_and(|reserved| !reserved.is_empty() && reserved.eq_ignore_ascii_case(name))
    }

    /// Points the session at the frontier, capped at the last defined level
    /// so a finished campaign resumes on its final mission.
    fn resume_at_frontier(&mut self) {
        self.state.resume_at_frontier();
        let last = self.loader.level_count();
        if last > 0 && self.state.current_level() > last {
            self.state.select_level(last).unwrap_or_else(|err| {
                debug!(%err, "could not cap level at catalog end");
            });
        }
    }

    /// Resolves and mounts `level`, showing the game screen.
    ///
    /// A failed resolution is shown inline and leaves the state untouched.
    /// A level past the frontier is refused with a dialog.
    #[instrument(skip(self))]
    pub async fn load_level(&mut self, level: u32) {
        if !self.state.is_unlocked(level) {
            warn!(
                level,
                max_unlocked = self.state.max_unlocked_level(),
                "refusing to load a locked level"
            );
            self.raise_locked_dialog(level);
            return;
        }
        let ticket = self.begin_load(level);
        let loader = Arc::clone(&self.loader);
        let resolved = loader.resolve(level).await;
        self.finish_load(ticket, resolved).await;
    }

    /// First half of [`load_level`](Self::load_level): tears down any
    /// mounted level, shows the loading placeholder and issues the ticket
    /// for this load. Any earlier ticket becomes stale. The session's
    /// current level is only moved once the level mounts.
    pub fn begin_load(&mut self, level: u32) -> LoadTicket {
        self.leave_level();
        self.surface.show(Screen::Game);
        self.surface.set_level_pane(LevelPane::Loading {
            level,
            message: views::loading_message(&self.localizer, self.language(), level),
        });
        self.refresh_header();

        let ticket = LoadTicket {
            generation: self.generation,
            level,
            attempt_id: Uuid::now_v7(),
        };
        debug!(level, generation = ticket.generation, attempt_id = %ticket.attempt_id, "level load started");
        ticket
    }

    /// Second half of [`load_level`](Self::load_level). Returns `false` if
    /// the ticket was stale and the resolution was discarded.
    pub async fn finish_load(
        &mut self,
        ticket: LoadTicket,
        resolved: Result<Box<dyn LevelModule>, GameError>,
    ) -> bool {
        if ticket.generation != self.generation {
            debug!(
                level = ticket.level,
                generation = ticket.generation,
                current = self.generation,
                "discarding stale level resolution"
            );
            return false;
        }
        let level = ticket.level;

        let mut module = match resolved {
            Ok(module) => module,
            Err(err) => {
                error!(level, attempt_id = %ticket.attempt_id, %err, "level failed to load");
                let reason = err.to_string();
                self.surface.set_level_pane(LevelPane::Failed {
                    level,
                    message: views::load_error_message(
                        &self.localizer,
                        self.language(),
                        level,
                        &reason,
                    ),
                    hint: self.tr("level.load_error_hint"),
                    reason,
                });
                return true;
            }
        };
        if let Err(err) = self.state.select_level(level) {
            warn!(level, attempt_id = %ticket.attempt_id, %err, "resolved level is locked");
            self.surface.set_level_pane(LevelPane::Empty);
            self.refresh_header();
            self.raise_locked_dialog(level);
            return true;
        }

        let (reporter, outcome) = OutcomeReporter::channel(level);
        let mut container = LevelContainer::new();
        let mut dialogs = Vec::new();
        {
            let mut ctx = LevelContext::new(
                &self.localizer,
                self.language(),
                level,
                Duration::ZERO,
                &mut dialogs,
            );
            module.init(&mut container, &mut ctx, reporter);
        }
        self.surface
            .set_level_pane(LevelPane::Mounted { level, container });
        self.active = Some(ActiveLevel {
            level,
            attempt_id: ticket.attempt_id,
            module,
            outcome,
        });
        self.timer.start(self.clock.now());
        self.refresh_header();
        info!(level, attempt_id = %ticket.attempt_id, "level mounted");

        for dialog in dialogs {
            self.raise_dialog(dialog);
        }
        self.collect_outcome().await;
        true
    }

    /// Passes a line of player input to the mounted level.
    ///
    /// Ignored unless the game screen is visible with a level mounted and
    /// no dialog is open.
    pub async fn dispatch_input(&mut self, input: &str) {
        if self.surface.visible() != Screen::Game {
            debug!("input outside the game screen ignored");
            return;
        }
        if self.surface.active_dialog().is_some() {
            debug!("input blocked by an open dialog");
            return;
        }
        let handled = self.drive_level(|module, container, ctx| {
            module.handle_input(input, container, ctx);
        });
        if handled.is_none() {
            debug!("no level mounted, input ignored");
            return;
        }
        self.collect_outcome().await;
    }

    /// Runs `f` against the mounted level with a fresh context, then
    /// presents any dialogs it requested. `None` if nothing is mounted.
    fn drive_level<R>(
        &mut self,
        f: impl FnOnce(&mut dyn LevelModule, &mut LevelContainer, &mut LevelContext<'_>) -> R,
    ) -> Option<R> {
        let elapsed = self.timer.elapsed(self.clock.now());
        let language = self.state.language();
        let active = self.active.as_mut()?;
        let LevelPane::Mounted { container, .. } = self.surface.level_pane_mut() else {
            return None;
        };

        let mut dialogs = Vec::new();
        let result = {
            let mut ctx =
                LevelContext::new(&self.localizer, language, active.level, elapsed, &mut dialogs);
            f(active.module.as_mut(), container, &mut ctx)
        };
        for dialog in dialogs {
            self.raise_dialog(dialog);
        }
        Some(result)
    }

    async fn collect_outcome(&mut self) {
        let outcome = self
            .active
            .as_mut()
            .and_then(|active| active.outcome.try_take());
        if let Some(outcome) = outcome {
            self.complete_level(outcome).await;
        }
    }

    /// Applies a reported outcome: stops the timer, unmounts the level,
    /// updates and persists progress, and shows the results screen.
    ///
    /// A persistence failure is logged; the session carries on with the
    /// in-memory state.
    #[instrument(skip_all, fields(success = outcome.success, score_delta = outcome.score_delta))]
    pub async fn complete_level(&mut self, outcome: Outcome) {
        let elapsed = self.timer.stop(self.clock.now());
        self.paused_by_player = false;
        self.paused_by_dialog = false;
        let (level, attempt_id) = match self.active.take() {
            Some(active) => (active.level, Some(active.attempt_id)),
            None => (self.state.current_level(), None),
        };

        let change = self.state.apply_outcome(level, &outcome);
        info!(
            level = change.level,
            attempt_id = ?attempt_id,
            score_added = change.score_added,
            xp_added = change.xp_added,
            unlocked_next = change.unlocked_next,
            elapsed_secs = elapsed.as_secs(),
            "level completed"
        );
        self.persist().await;

        let report = ResultsReport::from_outcome(&outcome, self.state.experience_points());
        self.last_results = Some(CompletedAttempt {
            level: change.level,
            report,
        });
        self.surface.set_level_pane(LevelPane::Empty);
        self.surface.show(Screen::Results);
        self.render_results();
        self.refresh_header();
    }

    fn render_results(&mut self) {
        let view = self.last_results.as_ref().map(|done| {
            views::results(&self.localizer, self.language(), done.level, &done.report)
        });
        self.surface.set_results(view);
    }

    /// Moves on from the current level.
    ///
    /// Past the last defined level a campaign-complete dialog is shown over
    /// the mission picker; a locked next level raises a dialog instead of
    /// loading.
    #[instrument(skip(self))]
    pub async fn advance_to_next_level(&mut self) {
        let next = self.state.current_level().saturating_add(1);
        if next > self.loader.level_count() {
            info!(player = self.state.player_identifier(), "campaign complete");
            self.open_level_select();
            self.raise_dialog(Dialog::new(
                DialogKind::Success,
                self.tr("dialog.campaign_complete.title"),
                self.tr("dialog.campaign_complete.body"),
            ));
            return;
        }
        if !self.state.is_unlocked(next) {
            debug!(level = next, "next level still locked");
            self.raise_locked_dialog(next);
            return;
        }
        self.load_level(next).await;
    }

    /// Replays the current level with a fresh module instance.
    pub async fn retry(&mut self) {
        self.load_level(self.state.current_level()).await;
    }

    /// The results screen's "next mission" action. Only offered after a
    /// passing attempt; otherwise a dialog explains why.
    pub async fn next_mission(&mut self) {
        let offered = self.surface.visible() == Screen::Results
            && self
                .last_results
                .as_ref()
                .is_some_and(|done| done.report.offers_next());
        if !offered {
            self.raise_dialog(Dialog::new(
                DialogKind::Info,
                self.tr("dialog.validation.title"),
                self.tr("dialog.next_unavailable"),
            ));
            return;
        }
        self.advance_to_next_level().await;
    }

    /// Shows the mission picker, abandoning any level in progress.
    pub fn open_level_select(&mut self) {
        self.leave_level();
        self.surface.show(Screen::LevelSelect);
        self.surface.set_level_select(views::level_select(
            &self.localizer,
            self.language(),
            &self.state,
            self.loader.level_count(),
        ));
        self.refresh_header();
    }

    /// Loads `level` from the mission picker.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Validation` if the level is locked or not
    /// defined. A dialog has been raised and the picker stays up.
    pub async fn select_level(&mut self, level: u32) -> Result<(), GameError> {
        if level == 0 || level > self.loader.level_count() || !self.state.is_unlocked(level) {
            self.raise_locked_dialog(level);
            return Err(GameError::Validation(format!(
                "level {level} is not available (max unlocked {})",
                self.state.max_unlocked_level()
            )));
        }
        self.load_level(level).await;
        Ok(())
    }

    fn raise_locked_dialog(&mut self, level: u32) {
        let level = level.to_string();
        self.raise_dialog(Dialog::new(
            DialogKind::Warning,
            self.tr("dialog.level_locked.title"),
            self.tr_with("dialog.level_locked.body", &[("level", level.as_str())]),
        ));
    }

    /// Switches the display language and re-localizes the visible screen.
    ///
    /// The timer keeps running and the mounted level keeps its state; it is
    /// asked to redraw if it supports that.
    #[instrument(skip(self))]
    pub async fn set_language(&mut self, language: Language) {
        if !self.state.set_language(language) {
            return;
        }
        info!(%language, "language changed");
        self.persist().await;
        self.relocalize();
    }

    fn relocalize(&mut self) {
        self.refresh_header();
        let language = self.language();
        match self.surface.visible() {
            Screen::Landing => self
                .surface
                .set_landing(views::landing(&self.localizer, language)),
            Screen::Intro => self
                .surface
                .set_intro(views::intro(&self.localizer, language)),
            Screen::LevelSelect => self.surface.set_level_select(views::level_select(
                &self.localizer,
                language,
                &self.state,
                self.loader.level_count(),
            )),
            Screen::Results => self.render_results(),
            Screen::Game => self.relocalize_level_pane(),
        }
    }

    fn relocalize_level_pane(&mut self) {
        let refresh = match self.surface.level_pane() {
            LevelPane::Mounted { .. } => PaneRefresh::Module,
            LevelPane::Loading { level, .. } => PaneRefresh::Loading(*level),
            LevelPane::Failed { level, reason, .. } => PaneRefresh::Failed(*level, reason.clone()),
            LevelPane::Empty => PaneRefresh::Nothing,
        };
        let language = self.language();
        match refresh {
            PaneRefresh::Module => {
                let redrawn = self.drive_level(|module, container, ctx| module.render(container, ctx));
                if redrawn == Some(false) {
                    debug!("mounted level does not support re-rendering");
                }
            }
            PaneRefresh::Loading(level) => {
                self.surface.set_level_pane(LevelPane::Loading {
                    level,
                    message: views::loading_message(&self.localizer, language, level),
                });
            }
            PaneRefresh::Failed(level, reason) => {
                self.surface.set_level_pane(LevelPane::Failed {
                    level,
                    message: views::load_error_message(&self.localizer, language, level, &reason),
                    hint: self.tr("level.load_error_hint"),
                    reason,
                });
            }
            PaneRefresh::Nothing => {}
        }
    }

    /// The once-a-second callback. Returns whether the timer display
    /// changed.
    pub fn tick(&mut self) -> bool {
        let changed = self.timer.tick(self.clock.now());
        if changed {
            self.sync_timer_display();
        }
        changed
    }

    /// Freezes the timer display at the player's request.
    pub fn pause(&mut self) {
        if !self.timer.is_running() {
            return;
        }
        self.paused_by_player = true;
        self.timer.pause();
        self.sync_timer_display();
    }

    /// Undoes [`pause`](Self::pause). The display stays frozen while a
    /// dialog is open.
    pub fn resume(&mut self) {
        if !self.paused_by_player {
            return;
        }
        self.paused_by_player = false;
        if !self.paused_by_dialog {
            self.timer.resume(self.clock.now());
        }
        self.sync_timer_display();
    }

    /// Queues a dialog. While a level is being timed the display is frozen
    /// until every dialog is dismissed.
    pub fn raise_dialog(&mut self, dialog: Dialog) {
        debug!(title = %dialog.title, "dialog raised");
        if self.timer.is_running() {
            self.paused_by_dialog = true;
            self.timer.pause();
            self.sync_timer_display();
        }
        self.surface.push_dialog(dialog);
    }

    /// Closes the presented dialog. Returns `false` if none was open.
    pub fn dismiss_dialog(&mut self) -> bool {
        if self.surface.pop_dialog().is_none() {
            return false;
        }
        if self.surface.active_dialog().is_none() && self.paused_by_dialog {
            self.paused_by_dialog = false;
            if !self.paused_by_player {
                self.timer.resume(self.clock.now());
            }
            self.sync_timer_display();
        }
        true
    }

    /// Abandons the mounted level, if any, and invalidates in-flight loads.
    fn leave_level(&mut self) {
        self.generation += 1;
        if let Some(active) = self.active.take() {
            info!(level = active.level, attempt_id = %active.attempt_id, "level abandoned");
        }
        self.timer.stop(self.clock.now());
        self.paused_by_player = false;
        self.paused_by_dialog = false;
        self.surface.set_level_pane(LevelPane::Empty);
        self.surface.set_results(None);
    }

    async fn persist(&self) {
        let record = self.state.to_record();
        if let Err(err) = self.store.save(&record).await {
            error!(%err, "failed to persist progress");
        }
    }

    fn sync_timer_display(&mut self) {
        let header = self.surface.header_mut();
        self.timer.display().clone_into(&mut header.timer_text);
        header.timer_paused = self.timer.is_paused();
    }

    fn refresh_header(&mut self) {
        let language = self.language();
        let title = match &self.active {
            Some(active) => self
                .localizer
                .resolve(&views::level_title_key(active.level), language),
            None => self.localizer.resolve("app.title", language),
        };
        let labels = views::header_labels(&self.localizer, language);
        let level = match self.surface.level_pane() {
            LevelPane::Loading { level, .. }
            | LevelPane::Failed { level, .. }
            | LevelPane::Mounted { level, .. } => *level,
            LevelPane::Empty => self.state.current_level(),
        };
        let header = self.surface.header_mut();
        header.title = title;
        header.progress_visible = self.progress_visible;
        self.state
            .player_identifier()
            .clone_into(&mut header.player);
        header.level = level;
        header.score = self.state.score();
        header.xp = self.state.experience_points();
        header.labels = labels;
        self.sync_timer_display();
    }
}
