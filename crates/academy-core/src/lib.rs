//! Cadet Academy Core: shared abstractions.
//!
//! This crate defines the traits and value types every other crate depends
//! on: time, randomness, languages, errors and the progress store boundary.
//! It contains no infrastructure code.

pub mod clock;
pub mod error;
pub mod language;
pub mod rng;
pub mod store;
