//! Deterministic feature pipeline.
//!
//! - affordability score + installment math (`affordability`)
//! - raw record → engineered record transformation (`engineer`)
//! - age / credit / tenure / risk banding (`bands`)
//!
//! Everything in here is a pure function: no IO, no model calls, and every
//! degenerate input has a defined fallback instead of an error path.

pub mod affordability;
pub mod bands;
pub mod engineer;

pub use affordability::*;
pub use bands::*;
pub use engineer::*;
