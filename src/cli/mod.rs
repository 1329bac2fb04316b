//! Command-line parsing for the loan-default scoring front-end.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the feature/scoring code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "loanpd", version, about = "Loan default risk scoring (single applicant or CSV batch)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Score a single applicant from flags and print the result.
    Score(ScoreArgs),
    /// Score every row of an application CSV and export the scored file.
    Batch(BatchArgs),
}

/// Scoring-backend selection, shared by both subcommands.
///
/// Exactly one backend runs per invocation: `--model` wins when given,
/// otherwise the remote endpoint is used (`--api-url`, then the `API_URL`
/// environment variable, then the local-dev default).
#[derive(Debug, Args, Clone)]
pub struct BackendArgs {
    /// Path to a local model artifact (JSON logistic export).
    /// Falls back to the `MODEL_PATH` environment variable.
    #[arg(long, value_name = "PATH")]
    pub model: Option<PathBuf>,

    /// Remote PD scoring endpoint URL.
    /// Falls back to the `API_URL` environment variable.
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Reference date for "today" fallbacks (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_name = "DATE")]
    pub asof: Option<String>,
}

/// Single-applicant scoring. Defaults mirror the interactive form.
#[derive(Debug, Args)]
pub struct ScoreArgs {
    #[command(flatten)]
    pub backend: BackendArgs,

    /// Customer ID.
    #[arg(long, default_value_t = 1)]
    pub customer_id: u64,

    /// Applicant age (21-70).
    #[arg(long, default_value_t = 35)]
    pub age: u32,

    /// Annual income (ZAR).
    #[arg(long, default_value_t = 80000.0)]
    pub income: f64,

    /// Annual expenses (ZAR).
    #[arg(long, default_value_t = 35000.0)]
    pub expenses: f64,

    /// Loan amount (ZAR).
    #[arg(long, default_value_t = 15000.0)]
    pub loan_amount: f64,

    /// Loan term in months (36, 48, or 60).
    #[arg(long, default_value_t = 36)]
    pub term: u32,

    /// Credit score (660-850).
    #[arg(long, default_value_t = 700)]
    pub credit_score: u32,

    /// Employment status (e.g. "3 years", "10+ years", "< 1 year").
    #[arg(long, default_value = "5 years")]
    pub employment_status: String,

    /// Marital status.
    #[arg(long, default_value = "Single")]
    pub marital_status: String,

    /// Education level.
    #[arg(long, default_value = "Degree")]
    pub education_level: String,

    /// Property ownership (OWN, RENT, MORTGAGE, ANY, OTHER, NONE).
    #[arg(long, default_value = "RENT")]
    pub property_ownership: String,

    /// Loan purpose.
    #[arg(long, default_value = "debt_consolidation")]
    pub loan_purpose: String,

    /// Co-applicant (Yes/No).
    #[arg(long, default_value = "No")]
    pub co_applicant: String,

    /// Approval channel (Web, Agent, Branch, Mobile App).
    #[arg(long, default_value = "Web")]
    pub approval_channel: String,

    /// Region.
    #[arg(long, default_value = "Gauteng")]
    pub region: String,

    /// Application date (YYYY-MM-DD). Defaults to the as-of date.
    #[arg(long, value_name = "DATE")]
    pub application_date: Option<String>,

    /// Count of past defaults.
    #[arg(long, default_value_t = 0)]
    pub past_defaults: u32,
}

/// Batch scoring over a CSV file.
#[derive(Debug, Args)]
pub struct BatchArgs {
    #[command(flatten)]
    pub backend: BackendArgs,

    /// Input application CSV.
    #[arg(short = 'i', long, value_name = "CSV")]
    pub input: PathBuf,

    /// Output scored CSV.
    #[arg(short = 'o', long, value_name = "CSV", default_value = "scored_loan_applications.csv")]
    pub output: PathBuf,
}
