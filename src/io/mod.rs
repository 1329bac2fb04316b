//! Input/output helpers.
//!
//! - CSV ingest + per-row parsing (`ingest`)
//! - scored-batch CSV export (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
