//! Cadet Academy: Levels.
//!
//! A level is a self-contained unit of interactive content. This crate
//! defines the contract every level satisfies, the registry that resolves a
//! level index to a fresh module instance, and the mission kinds that ship
//! with the game.

pub mod catalog;
pub mod contract;
pub mod kinds;
pub mod registry;

pub use contract::{
    Dialog, DialogKind, LevelContainer, LevelContext, LevelModule, OutcomeReceiver,
    OutcomeReporter,
};
pub use registry::{LevelFactory, LevelLoader, LevelRegistry};
