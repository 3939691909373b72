//! Localized view builders.
//!
//! Pure functions from game data to the text shown on each screen. They are
//! re-run on a language change, so nothing here keeps state.

use academy_core::language::Language;
use academy_i18n::Localizer;
use academy_progress::application::results::{DetailedReport, ResultsReport, SummaryReport};
use academy_progress::domain::game_state::GameState;

use crate::screen::{
    AnswerLabels, HeaderLabels, IntroView, LandingView, LevelSelectEntry, LevelSelectView, LevelStatus,
    ResultAction, ResultRow, ResultsLayout, ResultsView, Stat,
};

/// Localization key of a level's title.
#[must_use]
pub fn level_title_key(level: u32) -> String {
    format!("level.{level}.title")
}

#[must_use]
pub fn header_labels(localizer: &Localizer, language: Language) -> HeaderLabels {
    HeaderLabels {
        player: localizer.resolve("header.player", language),
        level: localizer.resolve("header.level", language),
        score: localizer.resolve("header.score", language),
        xp: localizer.resolve("header.xp", language),
        paused: localizer.resolve("header.paused", language),
        dismiss: localizer.resolve("dialog.dismiss_hint", language),
    }
}

#[must_use]
pub fn landing(localizer: &Localizer, language: Language) -> LandingView {
    LandingView {
        title: localizer.resolve("landing.title", language),
        prompt: localizer.resolve("landing.prompt", language),
        hint: localizer.resolve("landing.hint", language),
    }
}

#[must_use]
pub fn intro(localizer: &Localizer, language: Language) -> IntroView {
    IntroView {
        title: localizer.resolve("intro.title", language),
        body: localizer.resolve("intro.body", language),
        hint: localizer.resolve("intro.back_hint", language),
    }
}

/// The mission picker for levels `1..=level_count`.
#[must_use]
pub fn level_select(
    localizer: &Localizer,
    language: Language,
    state: &GameState,
    level_count: u32,
) -> LevelSelectView {
    let frontier = state.max_unlocked_level().min(level_count);
    let entries = (1..=level_count)
        .map(|level| {
            let status = if level == frontier {
                LevelStatus::Current
            } else if state.is_unlocked(level) {
                LevelStatus::Unlocked
            } else {
                LevelStatus::Locked
            };
            let status_key = match status {
                LevelStatus::Current => "level_select.current",
                LevelStatus::Unlocked => "level_select.unlocked",
                LevelStatus::Locked => "level_select.locked",
            };
            LevelSelectEntry {
                level,
                title: localizer.resolve(&level_title_key(level), language),
                status,
                status_text: localizer.resolve(status_key, language),
            }
        })
        .collect();
    LevelSelectView {
        title: localizer.resolve("level_select.title", language),
        entries,
        hint: localizer.resolve("level_select.hint", language),
    }
}

#[must_use]
pub fn loading_message(localizer: &Localizer, language: Language, level: u32) -> String {
    let level = level.to_string();
    localizer.resolve_with("level.loading", language, &[("level", level.as_str())])
}

#[must_use]
pub fn load_error_message(
    localizer: &Localizer,
    language: Language,
    level: u32,
    reason: &str,
) -> String {
    let level = level.to_string();
    localizer.resolve_with(
        "level.load_error",
        language,
        &[("level", level.as_str()), ("reason", reason)],
    )
}

/// The results screen for a completed attempt at `level`.
#[must_use]
pub fn results(
    localizer: &Localizer,
    language: Language,
    level: u32,
    report: &ResultsReport,
) -> ResultsView {
    let passed = report.offers_next();
    let headline = localizer.resolve(
        if passed { "results.passed" } else { "results.failed" },
        language,
    );
    let mut actions = Vec::with_capacity(2);
    if passed {
        actions.push((ResultAction::Next, localizer.resolve("results.next", language)));
    }
    actions.push((ResultAction::Retry, localizer.resolve("results.retry", language)));

    match report {
        ResultsReport::Summary(summary) => ResultsView {
            layout: ResultsLayout::Summary,
            level,
            passed,
            headline,
            subtitle: None,
            stats: summary_stats(localizer, language, summary),
            rows: Vec::new(),
            answer_labels: AnswerLabels::default(),
            actions,
        },
        ResultsReport::Detailed(detailed) => ResultsView {
            layout: ResultsLayout::Detailed,
            level,
            passed,
            headline,
            subtitle: Some(correct_count(localizer, language, detailed)),
            stats: vec![
                Stat {
                    label: localizer.resolve("results.percentage", language),
                    value: format!("{}%", detailed.percentage),
                },
                Stat {
                    label: localizer.resolve("results.total_xp", language),
                    value: detailed.total_xp.to_string(),
                },
            ],
            rows: detailed_rows(localizer, language, detailed),
            answer_labels: AnswerLabels {
                chosen: localizer.resolve("results.your_answer", language),
                correct: localizer.resolve("results.correct_answer", language),
                explanation: localizer.resolve("results.explanation", language),
            },
            actions,
        },
    }
}

fn summary_stats(localizer: &Localizer, language: Language, summary: &SummaryReport) -> Vec<Stat> {
    vec![
        Stat {
            label: localizer.resolve("results.accuracy", language),
            value: format!("{}%", summary.accuracy_percent),
        },
        Stat {
            label: localizer.resolve("results.time_bonus", language),
            value: summary.time_bonus.to_string(),
        },
        Stat {
            label: localizer.resolve("results.total_xp", language),
            value: summary.total_xp.to_string(),
        },
    ]
}

fn correct_count(localizer: &Localizer, language: Language, detailed: &DetailedReport) -> String {
    let correct = detailed.correct.to_string();
    let total = detailed.total.to_string();
    localizer.resolve_with(
        "results.correct_count",
        language,
        &[("correct", correct.as_str()), ("total", total.as_str())],
    )
}

fn detailed_rows(
    localizer: &Localizer,
    language: Language,
    detailed: &DetailedReport,
) -> Vec<ResultRow> {
    detailed
        .entries
        .iter()
        .map(|entry| ResultRow {
            prompt: entry.prompt_text.clone(),
            is_correct: entry.is_correct,
            chosen: entry
                .chosen_answer_text
                .clone()
                .unwrap_or_else(|| localizer.resolve("results.no_answer", language)),
            correct_answer: (!entry.is_correct).then(|| entry.correct_answer_text.clone()),
            explanation: entry.explanation_text.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use academy_core::store::PersistedRecord;
    use academy_progress::domain::outcome::{BreakdownEntry, Outcome};

    use super::*;

    fn localizer() -> Localizer {
        Localizer::builtin().unwrap()
    }

    #[test]
    fn test_summary_results_show_accuracy_bonus_and_total_xp() {
        // Arrange
        let outcome = Outcome::success().with_accuracy(90).with_time_bonus(15);
        let report = ResultsReport::from_outcome(&outcome, 1300);

        // Act
        let view = results(&localizer(), Language::En, 2, &report);

        // Assert
        assert_eq!(view.layout, ResultsLayout::Summary);
        assert_eq!(view.headline, "Mission accomplished!");
        assert_eq!(view.stats[0].value, "90%");
        assert_eq!(view.stats[1].value, "15");
        assert_eq!(view.stats[2].value, "1300");
        assert_eq!(view.actions[0].0, ResultAction::Next);
    }

    #[test]
    fn test_detailed_results_mark_unanswered_and_show_correct_answer() {
        // Arrange
        let entry = BreakdownEntry {
            prompt_text: "Capital of France?".into(),
            chosen_answer_text: None,
            correct_answer_text: "Paris".into(),
            is_correct: false,
            explanation_text: "Paris is the capital.".into(),
        };
        let outcome = Outcome::failure().with_breakdown(vec![entry]);
        let report = ResultsReport::from_outcome(&outcome, 100);

        // Act
        let view = results(&localizer(), Language::En, 1, &report);

        // Assert
        assert_eq!(view.layout, ResultsLayout::Detailed);
        assert!(!view.passed);
        assert_eq!(view.subtitle.as_deref(), Some("0 of 1 correct"));
        assert_eq!(view.rows[0].chosen, "No Answer");
        assert_eq!(view.rows[0].correct_answer.as_deref(), Some("Paris"));
        assert_eq!(view.actions, vec![(ResultAction::Retry, ":retry to try again".to_owned())]);
    }

    #[test]
    fn test_level_select_marks_frontier_and_locked_levels() {
        let state = GameState::from_record(&PersistedRecord {
            player_identifier: "Cadet".into(),
            max_unlocked_level: 2,
            ..PersistedRecord::default()
        });

        let view = level_select(&localizer(), Language::En, &state, 4);

        let statuses: Vec<_> = view.entries.iter().map(|e| e.status).collect();
        assert_eq!(
            statuses,
            vec![
                LevelStatus::Unlocked,
                LevelStatus::Current,
                LevelStatus::Locked,
                LevelStatus::Locked
            ]
        );
        assert_eq!(view.entries[0].title, "Mission 1: Signals");
    }

    #[test]
    fn test_views_follow_the_language() {
        let localizer = localizer();

        let en = landing(&localizer, Language::En);
        let es = landing(&localizer, Language::Es);

        assert_ne!(en.title, es.title);
    }
}
