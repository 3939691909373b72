//! Cadet Academy: terminal front-end.
//!
//! Wires the orchestrator to a JSON save file, a YAML mission catalog and a
//! line-oriented terminal. Lines starting with `:` are commands; anything
//! else is passed to the mounted level.

pub mod app;
pub mod commands;
pub mod config;
pub mod error;
pub mod rng;
pub mod terminal;
