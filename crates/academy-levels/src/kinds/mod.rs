//! Built-in mission kinds.

pub mod cipher;
pub mod quiz;
