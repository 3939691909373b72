//! Cadet Academy: Progress & Results.
//!
//! Owns the in-memory game state, the outcome record a level reports when an
//! attempt ends, and the rules that turn one into the other.

pub mod application;
pub mod domain;
