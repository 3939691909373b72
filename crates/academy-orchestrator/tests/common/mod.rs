//! Shared fixtures for orchestrator integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use academy_core::clock::Clock;
use academy_core::store::{PersistedRecord, ProgressStore};
use academy_i18n::Localizer;
use academy_levels::{
    Dialog, DialogKind, LevelContainer, LevelContext, LevelModule, LevelRegistry, OutcomeReporter,
};
use academy_orchestrator::{LevelPane, Orchestrator, OrchestratorConfig};
use academy_progress::domain::outcome::{BreakdownEntry, Outcome};
use academy_test_support::{ManualClock, RecordingProgressStore};
use chrono::{DateTime, TimeZone, Utc};

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
}

/// A level driven by keywords:
///
/// - `win` / `lose` report a summary outcome
/// - `quiz-pass` / `quiz-fail` report a ten-question breakdown (6 or 5 right)
/// - `feedback` raises a dialog
/// - anything else is echoed into the container
pub struct ScriptedLevel {
    level: u32,
    reporter: Option<OutcomeReporter>,
    report_on_init: Option<Outcome>,
}

impl ScriptedLevel {
    pub fn new(level: u32) -> Self {
        Self {
            level,
            reporter: None,
            report_on_init: None,
        }
    }

    pub fn reporting_on_init(level: u32, outcome: Outcome) -> Self {
        Self {
            level,
            reporter: None,
            report_on_init: Some(outcome),
        }
    }

    fn draw(&self, container: &mut LevelContainer, ctx: &LevelContext<'_>) {
        container.clear();
        container.push_line(ctx.tr(&format!("level.{}.title", self.level)));
        container.set_prompt("win or lose");
    }

    fn report(&mut self, outcome: Outcome) {
        if let Some(reporter) = self.reporter.take() {
            reporter.report(outcome);
        }
    }
}

fn breakdown(correct: usize) -> Vec<BreakdownEntry> {
    (0..10)
        .map(|i| BreakdownEntry {
            prompt_text: format!("Question {i}"),
            chosen_answer_text: Some("B".to_owned()),
            correct_answer_text: if i < correct { "B" } else { "C" }.to_owned(),
            is_correct: i < correct,
            explanation_text: String::new(),
        })
        .collect()
}

impl LevelModule for ScriptedLevel {
    fn init(
        &mut self,
        container: &mut LevelContainer,
        ctx: &mut LevelContext<'_>,
        reporter: OutcomeReporter,
    ) {
        self.reporter = Some(reporter);
        self.draw(container, ctx);
        if let Some(outcome) = self.report_on_init.take() {
            self.report(outcome);
        }
    }

    fn handle_input(
        &mut self,
        input: &str,
        container: &mut LevelContainer,
        ctx: &mut LevelContext<'_>,
    ) {
        match input {
            "win" => self.report(Outcome::success().with_score(100).with_accuracy(100)),
            "lose" => self.report(Outcome::failure().with_accuracy(20)),
            "quiz-pass" => self.report(Outcome::success().with_breakdown(breakdown(6))),
            "quiz-fail" => self.report(Outcome::failure().with_breakdown(breakdown(5))),
            "feedback" => ctx.show_feedback(Dialog::new(DialogKind::Info, "Nice", "Keep going")),
            other => container.push_line(format!("echo {other}")),
        }
    }

    fn render(&mut self, container: &mut LevelContainer, ctx: &mut LevelContext<'_>) -> bool {
        self.draw(container, ctx);
        true
    }
}

/// Registers a [`ScriptedLevel`] for every listed index.
pub fn registry(levels: &[u32]) -> LevelRegistry {
    let mut registry = LevelRegistry::new();
    for &level in levels {
        registry.register(level, move || {
            Ok(Box::new(ScriptedLevel::new(level)) as Box<dyn LevelModule>)
        });
    }
    registry
}

pub fn record(player: &str, max_unlocked_level: u32) -> PersistedRecord {
    PersistedRecord {
        player_identifier: player.to_owned(),
        max_unlocked_level,
        ..PersistedRecord::default()
    }
}

pub struct Harness {
    pub orchestrator: Orchestrator,
    pub store: Arc<RecordingProgressStore>,
    pub clock: Arc<ManualClock>,
}

pub fn harness(initial: Option<PersistedRecord>, registry: LevelRegistry) -> Harness {
    harness_with(initial, registry, OrchestratorConfig::default())
}

pub fn harness_with(
    initial: Option<PersistedRecord>,
    registry: LevelRegistry,
    config: OrchestratorConfig,
) -> Harness {
    let store = Arc::new(RecordingProgressStore::new(initial));
    let clock = Arc::new(ManualClock::new(t0()));
    let orchestrator = orchestrator_with_store(
        Arc::clone(&store) as Arc<dyn ProgressStore>,
        Arc::clone(&clock) as Arc<dyn Clock>,
        registry,
        config,
    );
    Harness {
        orchestrator,
        store,
        clock,
    }
}

pub fn orchestrator_with_store(
    store: Arc<dyn ProgressStore>,
    clock: Arc<dyn Clock>,
    registry: LevelRegistry,
    config: OrchestratorConfig,
) -> Orchestrator {
    Orchestrator::new(
        clock,
        store,
        Arc::new(registry),
        Arc::new(Localizer::builtin().unwrap()),
        config,
    )
}

/// Lines drawn by the mounted level, empty if none is mounted.
pub fn level_lines(orchestrator: &Orchestrator) -> Vec<String> {
    match orchestrator.surface().level_pane() {
        LevelPane::Mounted { container, .. } => container.lines().to_vec(),
        _ => Vec::new(),
    }
}
