//! Shared scoring pipeline used by both subcommands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! ingest -> feature engineering -> scoring -> banding -> export
//!
//! The CLI front-end then focuses on argument handling and printing.

use std::path::Path;

use crate::batch::BatchOutput;
use crate::domain::{RawApplicant, RiskBand, RunConfig, ScoredRecord};
use crate::error::AppError;
use crate::features::engineer_single;
use crate::io::{load_applications, write_scored_csv};
use crate::score::build_scorer;

/// Score one applicant end to end.
///
/// The record is its own batch, so the vintage feature is 0. Scoring
/// failures are fatal here (exit code 4): there are no sibling rows to
/// continue past.
pub fn run_single(raw: &RawApplicant, config: &RunConfig) -> Result<(ScoredRecord, String), AppError> {
    let scorer = build_scorer(config)?;
    let record = engineer_single(raw, None);

    let prediction = scorer
        .score(&record)
        .map_err(|e| AppError::scoring(e.message().to_string()))?;

    Ok((
        ScoredRecord {
            record,
            risk_band: RiskBand::from_pd(prediction.pd),
            prediction,
        },
        scorer.describe(),
    ))
}

/// Score a whole CSV and write the scored export.
///
/// Row-level failures never abort the run; they surface in the export and
/// in the returned counts.
pub fn run_batch(input: &Path, output: &Path, config: &RunConfig) -> Result<(BatchOutput, String), AppError> {
    let scorer = build_scorer(config)?;
    let batch = load_applications(input)?;

    let scored = crate::batch::score_batch(batch, scorer.as_ref());
    write_scored_csv(output, &scored)?;

    Ok((scored, scorer.describe()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ScorerChoice;
    use std::io::Write as _;

    fn local_config(name: &str, artifact_json: &str) -> RunConfig {
        let dir = std::env::temp_dir().join("loanpd-pipeline-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(artifact_json.as_bytes()).unwrap();
        RunConfig {
            scorer: ScorerChoice::Local(path),
            asof_date: "2025-06-01".parse().unwrap(),
        }
    }

    fn applicant() -> RawApplicant {
        RawApplicant {
            customer_id: 1,
            age: 35,
            income: 80000.0,
            annual_expenses: 35000.0,
            loan_amount: 15000.0,
            loan_term_months: 36,
            credit_score: 700,
            employment_status: "3 years".to_string(),
            marital_status: "Single".to_string(),
            education_level: "Degree".to_string(),
            property_ownership: "RENT".to_string(),
            loan_purpose: "medical".to_string(),
            co_applicant: "No".to_string(),
            approval_channel: "Web".to_string(),
            region: "Gauteng".to_string(),
            application_date: Some("2025-01-15".parse().unwrap()),
            past_defaults: 0,
        }
    }

    #[test]
    fn single_flow_scores_and_bands() {
        // bias 0 => pd 0.5 => High Risk.
        let config = local_config(
            "single.json",
            r#"{ "bias": 0.0, "numeric": { "Has_Past_Defaults": 0.0 } }"#,
        );
        let (scored, backend) = run_single(&applicant(), &config).unwrap();
        assert!((scored.prediction.pd - 0.5).abs() < 1e-12);
        assert_eq!(scored.risk_band, RiskBand::High);
        assert_eq!(scored.record.app_vintage_months, 0);
        assert!(backend.starts_with("local model"));
    }

    #[test]
    fn missing_artifact_fails_at_startup() {
        let config = RunConfig {
            scorer: ScorerChoice::Local("/nonexistent/model.json".into()),
            asof_date: "2025-06-01".parse().unwrap(),
        };
        let err = run_single(&applicant(), &config).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn batch_flow_writes_export_and_counts() {
        let dir = std::env::temp_dir().join("loanpd-pipeline-test");
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("apps.csv");
        let mut f = std::fs::File::create(&input).unwrap();
        f.write_all(
            b"Customer_ID,Income,Loan_Amount,Loan_Term_Months,Credit_Score\n\
              1,80000,15000,36,700\n\
              2,bad,9000,48,665\n",
        )
        .unwrap();

        let config = local_config(
            "batch.json",
            r#"{ "bias": -2.0, "numeric": { "Has_Past_Defaults": 0.0 } }"#,
        );
        let output = dir.join("scored.csv");
        let (scored, _) = run_batch(&input, &output, &config).unwrap();

        assert_eq!(scored.rows_total(), 2);
        assert_eq!(scored.rows_scored(), 1);
        assert_eq!(scored.rows_failed(), 1);

        let text = std::fs::read_to_string(&output).unwrap();
        assert_eq!(text.lines().count(), 3); // header + 2 rows
        // bias -2 => pd ~0.119 => Low Risk.
        assert!(text.contains("Low Risk"));
        assert!(text.contains("Exception:"));
    }
}
