//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the scoring backend (local artifact vs remote endpoint)
//! - runs the shared pipeline
//! - prints reports and summaries

use chrono::NaiveDate;
use clap::Parser;

use crate::cli::{BackendArgs, BatchArgs, Command, ScoreArgs};
use crate::domain::{RawApplicant, RunConfig, ScorerChoice};
use crate::error::AppError;

pub mod pipeline;

/// Default endpoint for local development (mirrors the Docker setup where
/// `API_URL` is injected).
const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/predict";

/// Entry point for the `loanpd` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Score(args) => handle_score(args),
        Command::Batch(args) => handle_batch(args),
    }
}

fn handle_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = run_config(&args.backend)?;

    let application_date = match &args.application_date {
        Some(s) => Some(parse_cli_date(s, "--application-date")?),
        None => Some(config.asof_date),
    };

    let raw = RawApplicant {
        customer_id: args.customer_id,
        age: args.age,
        income: args.income,
        annual_expenses: args.expenses,
        loan_amount: args.loan_amount,
        loan_term_months: args.term,
        credit_score: args.credit_score,
        employment_status: args.employment_status,
        marital_status: args.marital_status,
        education_level: args.education_level,
        property_ownership: args.property_ownership,
        loan_purpose: args.loan_purpose,
        co_applicant: args.co_applicant,
        approval_channel: args.approval_channel,
        region: args.region,
        application_date,
        past_defaults: args.past_defaults,
    };

    let (scored, backend) = pipeline::run_single(&raw, &config)?;
    println!("{}", crate::report::format_single_report(&scored, &backend));
    Ok(())
}

fn handle_batch(args: BatchArgs) -> Result<(), AppError> {
    let config = run_config(&args.backend)?;

    let (scored, backend) = pipeline::run_batch(&args.input, &args.output, &config)?;
    println!(
        "{}",
        crate::report::format_batch_summary(&scored, &backend, &args.output.display().to_string())
    );
    Ok(())
}

/// Resolve backend selection and the as-of date from flags + environment.
pub fn run_config(args: &BackendArgs) -> Result<RunConfig, AppError> {
    dotenvy::dotenv().ok();

    let asof_date = match &args.asof {
        Some(s) => parse_cli_date(s, "--asof")?,
        None => chrono::Local::now().date_naive(),
    };

    // Explicit flags beat the environment; `--model` selects the in-process
    // artifact, otherwise scoring goes through the remote endpoint.
    let scorer = if let Some(path) = args.model.clone() {
        ScorerChoice::Local(path)
    } else if let Some(url) = args.api_url.clone() {
        ScorerChoice::Remote(url)
    } else if let Ok(path) = std::env::var("MODEL_PATH") {
        ScorerChoice::Local(path.into())
    } else {
        let url = std::env::var("API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        ScorerChoice::Remote(url)
    };

    Ok(RunConfig { scorer, asof_date })
}

fn parse_cli_date(s: &str, flag: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| AppError::usage(format!("Invalid {flag} date '{s}'. Expected YYYY-MM-DD.")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend_args(model: Option<&str>, api_url: Option<&str>, asof: Option<&str>) -> BackendArgs {
        BackendArgs {
            model: model.map(Into::into),
            api_url: api_url.map(String::from),
            asof: asof.map(String::from),
        }
    }

    #[test]
    fn model_flag_wins_over_remote() {
        let config = run_config(&backend_args(Some("m.json"), Some("http://x/predict"), Some("2025-06-01"))).unwrap();
        assert!(matches!(config.scorer, ScorerChoice::Local(_)));
    }

    #[test]
    fn remote_default_url_applies() {
        // Only meaningful when the environment doesn't override; guard for that.
        if std::env::var("API_URL").is_ok() || std::env::var("MODEL_PATH").is_ok() {
            return;
        }
        let config = run_config(&backend_args(None, None, Some("2025-06-01"))).unwrap();
        match config.scorer {
            ScorerChoice::Remote(url) => assert_eq!(url, DEFAULT_API_URL),
            other => panic!("expected remote scorer, got {other:?}"),
        }
    }

    #[test]
    fn bad_asof_is_a_usage_error() {
        let err = run_config(&backend_args(None, None, Some("June 1st"))).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
