//! Session timer.
//!
//! Measures wall-clock time for the active level attempt. Pausing freezes
//! only the displayed value; measurement keeps running, so the first update
//! after resuming shows the true elapsed time.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Formats a duration as `MM:SS`. Minutes keep counting past 59.
#[must_use]
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Suspendable stopwatch for one level attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTimer {
    started_at: Option<DateTime<Utc>>,
    paused: bool,
    display: String,
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self {
            started_at: None,
            paused: false,
            display: format_elapsed(Duration::ZERO),
        }
    }
}

impl SessionTimer {
    /// Creates a stopped timer showing `00:00`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an attempt is being timed.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Whether display updates are suspended.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// The last displayed value.
    #[must_use]
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Starts timing from `now`, resetting the display.
    pub fn start(&mut self, now: DateTime<Utc>) {
        self.started_at = Some(now);
        self.paused = false;
        self.display = format_elapsed(Duration::ZERO);
    }

    /// Stops timing and returns the measured time. The display keeps its
    /// last value.
    pub fn stop(&mut self, now: DateTime<Utc>) -> Duration {
        let elapsed = self.elapsed(now);
        self.started_at = None;
        self.paused = false;
        elapsed
    }

    /// Suspends display updates. No effect when stopped.
    pub fn pause(&mut self) {
        if self.is_running() {
            self.paused = true;
        }
    }

    /// Resumes display updates and refreshes the display immediately.
    pub fn resume(&mut self, now: DateTime<Utc>) {
        if self.paused {
            self.paused = false;
            self.tick(now);
        }
    }

    /// Wall-clock time since `start`, pauses included. Zero when stopped.
    #[must_use]
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        self.started_at
            .and_then(|start| (now - start).to_std().ok())
            .unwrap_or_default()
    }

    /// The periodic callback. Updates the display only while running and
    /// not paused; returns whether the display changed.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        if !self.is_running() || self.paused {
            return false;
        }
        let text = format_elapsed(self.elapsed(now));
        if text == self.display {
            return false;
        }
        self.display = text;
        true
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration as ChronoDuration, TimeZone};

    use super::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_format_elapsed_pads_and_keeps_counting_minutes() {
        assert_eq!(format_elapsed(Duration::from_secs(0)), "00:00");
        assert_eq!(format_elapsed(Duration::from_secs(65)), "01:05");
        assert_eq!(format_elapsed(Duration::from_secs(4503)), "75:03");
    }

    #[test]
    fn test_tick_advances_display_while_running() {
        // Arrange
        let mut timer = SessionTimer::new();
        timer.start(t0());

        // Act
        let changed = timer.tick(t0() + ChronoDuration::seconds(3));

        // Assert
        assert!(changed);
        assert_eq!(timer.display(), "00:03");
    }

    #[test]
    fn test_pause_freezes_display_but_not_measurement() {
        // Arrange
        let mut timer = SessionTimer::new();
        timer.start(t0());
        timer.tick(t0() + ChronoDuration::seconds(2));

        // Act
        timer.pause();
        let changed = timer.tick(t0() + ChronoDuration::seconds(10));

        // Assert
        assert!(!changed);
        assert_eq!(timer.display(), "00:02");
        assert_eq!(
            timer.elapsed(t0() + ChronoDuration::seconds(10)),
            Duration::from_secs(10)
        );
    }

    #[test]
    fn test_resume_shows_true_elapsed_time() {
        let mut timer = SessionTimer::new();
        timer.start(t0());
        timer.pause();

        timer.resume(t0() + ChronoDuration::seconds(42));

        assert!(!timer.is_paused());
        assert_eq!(timer.display(), "00:42");
    }

    #[test]
    fn test_stopped_timer_ignores_ticks_and_pause() {
        // Arrange
        let mut timer = SessionTimer::new();
        timer.start(t0());
        timer.tick(t0() + ChronoDuration::seconds(7));

        // Act
        let measured = timer.stop(t0() + ChronoDuration::seconds(8));
        timer.pause();
        let changed = timer.tick(t0() + ChronoDuration::seconds(20));

        // Assert
        assert_eq!(measured, Duration::from_secs(8));
        assert!(!timer.is_running());
        assert!(!timer.is_paused());
        assert!(!changed);
        assert_eq!(timer.display(), "00:07");
    }

    #[test]
    fn test_clock_going_backwards_reads_as_zero() {
        let mut timer = SessionTimer::new();
        timer.start(t0());

        assert_eq!(timer.elapsed(t0() - ChronoDuration::seconds(5)), Duration::ZERO);
    }
}
