//! Shared test mocks and utilities for the Cadet Academy mission game.

mod clock;
mod rng;
mod store;

pub use clock::{FixedClock, ManualClock};
pub use rng::{MockRng, SequenceRng};
pub use store::{EmptyProgressStore, FailingProgressStore, RecordingProgressStore};
