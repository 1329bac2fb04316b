//! `loan-scorer` library crate.
//!
//! The binary (`loanpd`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - modules are reusable (e.g., future service wrapper, notebooks, etc.)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod batch;
pub mod cli;
pub mod domain;
pub mod error;
pub mod features;
pub mod io;
pub mod report;
pub mod score;
