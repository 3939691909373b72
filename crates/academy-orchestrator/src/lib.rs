//! Cadet Academy: Game Orchestrator.
//!
//! The orchestrator is the sole owner of the game state. It switches
//! screens, mounts and tears down level modules, runs the session timer and
//! turns each level outcome into persisted progress and a results view.
//! Front-ends only read the [`Surface`] and call orchestrator methods.

pub mod orchestrator;
pub mod screen;
pub mod timer;
pub mod views;

pub use orchestrator::{LoadTicket, Orchestrator, OrchestratorConfig};
pub use screen::{LevelPane, Screen, Surface};
pub use timer::SessionTimer;
