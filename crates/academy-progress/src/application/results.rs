//! Results reconciliation.
//!
//! Turns a reported outcome into the numbers the results screen shows. The
//! presence of a breakdown alone decides between the detailed report and the
//! legacy single-panel summary.

use crate::domain::outcome::{BreakdownEntry, Outcome};

/// Minimum percentage for a detailed report to count as passed.
pub const PASS_THRESHOLD_PERCENT: u32 = 60;

/// `round(100 * correct / total)`, rounding halves up. Zero when `total` is
/// zero.
#[must_use]
pub fn percentage(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let correct = correct.min(total) as u64;
    let total = total as u64;
    let rounded = (200 * correct + total) / (2 * total);
    u32::try_from(rounded).unwrap_or(100)
}

/// Aggregate figures for the legacy summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryReport {
    /// Pass/fail headline.
    pub success: bool,
    /// Accuracy reported by the level.
    pub accuracy_percent: u8,
    /// Time bonus reported by the level.
    pub time_bonus: i32,
    /// Cumulative experience after the outcome was applied.
    pub total_xp: u64,
}

/// Per-question report for the detailed summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailedReport {
    /// Number of correct entries.
    pub correct: usize,
    /// Number of entries.
    pub total: usize,
    /// Rounded percentage correct.
    pub percentage: u32,
    /// Whether `percentage` met the pass threshold.
    pub passed: bool,
    /// Cumulative experience after the outcome was applied.
    pub total_xp: u64,
    /// The entries, in the order the level reported them.
    pub entries: Vec<BreakdownEntry>,
}

impl DetailedReport {
    /// Builds a report from breakdown entries.
    #[must_use]
    pub fn new(entries: Vec<BreakdownEntry>, total_xp: u64) -> Self {
        let correct = entries.iter().filter(|e| e.is_correct).count();
        let total = entries.len();
        let percentage = percentage(correct, total);
        Self {
            correct,
            total,
            percentage,
            passed: percentage >= PASS_THRESHOLD_PERCENT,
            total_xp,
            entries,
        }
    }
}

/// What the results screen presents for a completed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsReport {
    /// Legacy single-panel summary.
    Summary(SummaryReport),
    /// Detailed per-question summary.
    Detailed(DetailedReport),
}

impl ResultsReport {
    /// Chooses and builds the report for `outcome`.
    #[must_use]
    pub fn from_outcome(outcome: &Outcome, total_xp: u64) -> Self {
        match &outcome.breakdown {
            Some(entries) => Self::Detailed(DetailedReport::new(entries.clone(), total_xp)),
            None => Self::Summary(SummaryReport {
                success: outcome.success,
                accuracy_percent: outcome.accuracy_percent.min(100),
                time_bonus: outcome.time_bonus,
                total_xp,
            }),
        }
    }

    /// Whether the "next mission" action is offered.
    #[must_use]
    pub fn offers_next(&self) -> bool {
        match self {
            Self::Summary(summary) => summary.success,
            Self::Detailed(detailed) => detailed.passed,
        }
    }
}
