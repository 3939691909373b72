//! Domain types for player progress.

pub mod game_state;
pub mod outcome;
