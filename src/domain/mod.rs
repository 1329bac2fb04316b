//! Shared domain types and reference data.

pub mod types;

pub use types::*;
