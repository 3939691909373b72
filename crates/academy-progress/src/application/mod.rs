//! Application services for progress reconciliation.

pub mod results;
