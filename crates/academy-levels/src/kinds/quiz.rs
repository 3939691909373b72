//! Multiple-choice quiz missions.
//!
//! A quiz reports a full per-question breakdown, so it always ends on the
//! detailed results screen.

use academy_core::error::GameError;
use academy_core::rng::{DeterministicRng, shuffle};
use academy_progress::application::results::{PASS_THRESHOLD_PERCENT, percentage};
use academy_progress::domain::outcome::{BreakdownEntry, Outcome};
use serde::Deserialize;
use tracing::debug;

use crate::contract::{
    Dialog, DialogKind, LevelContainer, LevelContext, LevelModule, OutcomeReporter, time_bonus,
};

/// One question.
#[derive(Debug, Clone, Deserialize)]
pub struct QuizQuestion {
    /// Question text.
    pub prompt: String,
    /// Answer options in authoring order.
    pub options: Vec<String>,
    /// Zero-based index of the correct option.
    pub answer: usize,
    /// Shown on a wrong answer and on the results screen.
    #[serde(default)]
    pub explanation: String,
}

/// Authoring form of a quiz mission.
#[derive(Debug, Clone, Deserialize)]
pub struct QuizSpec {
    /// Questions in the order they are asked.
    pub questions: Vec<QuizQuestion>,
    /// Score per correct answer.
    #[serde(default = "default_points_per_correct")]
    pub points_per_correct: u32,
    /// Experience for finishing; the game default applies when absent.
    #[serde(default)]
    pub xp: Option<u32>,
    /// Seconds before the time bonus runs out.
    #[serde(default = "default_par_seconds")]
    pub par_seconds: u32,
    /// Present options in a random order.
    #[serde(default)]
    pub shuffle_options: bool,
}

fn default_points_per_correct() -> u32 {
    100
}

fn default_par_seconds() -> u32 {
    120
}

impl QuizSpec {
    /// Checks the spec can be played.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Validation` describing the first problem found.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.questions.is_empty() {
            return Err(GameError::Validation("quiz has no questions".into()));
        }
        for (i, question) in self.questions.iter().enumerate() {
            if question.options.len() < 2 {
                return Err(GameError::Validation(format!(
                    "question {} needs at least two options",
                    i + 1
                )));
            }
            if question.answer >= question.options.len() {
                return Err(GameError::Validation(format!(
                    "question {} answer index {} is out of range",
                    i + 1,
                    question.answer
                )));
            }
        }
        Ok(())
    }
}

/// A running quiz attempt.
#[derive(Debug)]
pub struct QuizLevel {
    spec: QuizSpec,
    /// Display order of option indices, per question.
    order: Vec<Vec<usize>>,
    /// Chosen option (authoring index) per answered question.
    answers: Vec<Option<usize>>,
    reporter: Option<OutcomeReporter>,
}

impl QuizLevel {
    /// Builds a quiz attempt, shuffling options if the spec asks for it.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Validation` if the spec is not playable.
    pub fn try_new(spec: QuizSpec, rng: &mut dyn DeterministicRng) -> Result<Self, GameError> {
        spec.validate()?;
        let order = spec
            .questions
            .iter()
            .map(|question| {
                let mut indices: Vec<usize> = (0..question.options.len()).collect();
                if spec.shuffle_options {
                    shuffle(&mut indices, rng);
                }
                indices
            })
            .collect();
        Ok(Self {
            spec,
            order,
            answers: Vec::new(),
            reporter: None,
        })
    }

    fn current(&self) -> Option<usize> {
        (self.answers.len() < self.spec.questions.len()).then_some(self.answers.len())
    }

    fn draw(&self, container: &mut LevelContainer, ctx: &LevelContext<'_>) {
        container.clear();
        let Some(index) = self.current() else {
            return;
        };
        let question = &self.spec.questions[index];
        let number = (index + 1).to_string();
        let total = self.spec.questions.len().to_string();
        container.push_line(ctx.tr_with(
            "quiz.question",
            &[("number", number.as_str()), ("total", total.as_str())],
        ));
        container.push_line(question.prompt.clone());
        for (slot, option) in self.order[index].iter().enumerate() {
            container.push_line(format!("  {}) {}", slot + 1, question.options[*option]));
        }
        container.set_prompt(ctx.tr("quiz.options_hint"));
    }

    fn finish(&mut self, ctx: &LevelContext<'_>) {
        let breakdown: Vec<BreakdownEntry> = self
            .spec
            .questions
            .iter()
            .zip(&self.answers)
            .map(|(question, chosen)| BreakdownEntry {
                prompt_text: question.prompt.clone(),
                chosen_answer_text: chosen.map(|i| question.options[i].clone()),
                correct_answer_text: question.options[question.answer].clone(),
                is_correct: *chosen == Some(question.answer),
                explanation_text: question.explanation.clone(),
            })
            .collect();
        let correct = breakdown.iter().filter(|entry| entry.is_correct).count();
        let accuracy = percentage(correct, breakdown.len());
        let passed = accuracy >= PASS_THRESHOLD_PERCENT;
        let bonus = if passed {
            time_bonus(self.spec.par_seconds, ctx.elapsed())
        } else {
            0
        };
        let correct_points = u32::try_from(correct)
            .unwrap_or(u32::MAX)
            .saturating_mul(self.spec.points_per_correct);

        let mut outcome = Outcome {
            success: passed,
            score_delta: correct_points.saturating_add(bonus.unsigned_abs()),
            accuracy_percent: u8::try_from(accuracy).unwrap_or(100),
            time_bonus: bonus,
            ..Outcome::default()
        }
        .with_breakdown(breakdown);
        outcome.xp_delta = self.spec.xp;

        if let Some(reporter) = self.reporter.take() {
            reporter.report(outcome);
        }
    }
}

impl LevelModule for QuizLevel {
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
        let Some(index) = self.current() else {
            return;
        };
        let input = input.trim();
        let question = &self.spec.questions[index];

        let chosen = if input.eq_ignore_ascii_case("skip") {
            None
        } else {
            let picked = input
                .parse::<usize>()
                .ok()
                .and_then(|slot| slot.checked_sub(1))
                .and_then(|slot| self.order[index].get(slot).copied());
            let Some(option) = picked else {
                debug!(level = ctx.level(), input, "ignoring unrecognized quiz input");
                return;
            };
            Some(option)
        };

        if let Some(option) = chosen {
            if option != question.answer {
                let mut message = ctx.tr("quiz.incorrect");
                if !question.explanation.is_empty() {
                    message = format!("{message} {}", question.explanation);
                }
                ctx.show_feedback(Dialog::new(
                    DialogKind::Warning,
                    question.prompt.clone(),
                    message,
                ));
            }
        }
        self.answers.push(chosen);

        if self.current().is_some() {
            self.draw(container, ctx);
        } else {
            container.clear();
            self.finish(ctx);
        }
    }

    fn render(&mut self, container: &mut LevelContainer, ctx: &mut LevelContext<'_>) -> bool {
        self.draw(container, ctx);
        true
    }
}
