//! In-process scoring against a logistic-regression artifact.
//!
//! The artifact is a JSON export of a trained classifier:
//!
//! ```json
//! {
//!   "bias": -1.2,
//!   "numeric": { "DTI": 2.1, "Affordability_Score": -0.03, ... },
//!   "categorical": { "Credit_Band": { "Subprime": 0.8, ... }, ... },
//!   "threshold": 0.5
//! }
//! ```
//!
//! Scoring is a linear term over the engineered record's numeric features
//! plus per-level categorical contributions, squashed through a sigmoid.
//! Unknown categorical levels contribute 0 (the model's "unknown" handling).

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::domain::{EngineeredRecord, Prediction};
use crate::error::AppError;
use crate::score::{ScoreError, Scorer, validate_pd};

/// Default decision threshold when the artifact does not carry one.
fn default_threshold() -> f64 {
    0.5
}

/// A trained classifier artifact as stored on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelArtifact {
    pub bias: f64,
    /// Coefficients keyed by engineered numeric feature name.
    pub numeric: HashMap<String, f64>,
    /// Per-level coefficients keyed by categorical field name.
    #[serde(default)]
    pub categorical: HashMap<String, HashMap<String, f64>>,
    /// PD at or above which the predicted class is 1 (default).
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl ModelArtifact {
    /// Load and validate an artifact file.
    ///
    /// Any problem here is fatal for the local variant, so errors carry
    /// exit code 4 and fire at construction, never lazily per request.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let file = std::fs::File::open(path).map_err(|e| {
            AppError::scoring(format!("Failed to open model artifact '{}': {e}", path.display()))
        })?;
        let artifact: ModelArtifact = serde_json::from_reader(file).map_err(|e| {
            AppError::scoring(format!("Invalid model artifact '{}': {e}", path.display()))
        })?;

        if artifact.numeric.is_empty() && artifact.categorical.is_empty() {
            return Err(AppError::scoring(format!(
                "Model artifact '{}' has no coefficients.",
                path.display()
            )));
        }
        if !artifact.threshold.is_finite() || !(0.0..=1.0).contains(&artifact.threshold) {
            return Err(AppError::scoring(format!(
                "Model artifact '{}' has an invalid threshold: {}.",
                path.display(),
                artifact.threshold
            )));
        }

        Ok(artifact)
    }

    fn linear_term(&self, record: &EngineeredRecord) -> f64 {
        let mut z = self.bias;

        for (name, coef) in &self.numeric {
            z += coef * numeric_feature(record, name);
        }
        for (field, levels) in &self.categorical {
            if let Some(level) = categorical_feature(record, field) {
                z += levels.get(level).copied().unwrap_or(0.0);
            }
        }

        z
    }
}

/// Numeric feature lookup by wire name. Unrecognized names contribute 0 so an
/// artifact trained with a superset of features still loads.
fn numeric_feature(record: &EngineeredRecord, name: &str) -> f64 {
    match name {
        "Age" => record.raw.age as f64,
        "Income" => record.raw.income,
        "Annual_Expenses" => record.raw.annual_expenses,
        "Loan_Amount" => record.raw.loan_amount,
        "Loan_Term_Months" => record.raw.loan_term_months as f64,
        "Credit_Score" => record.raw.credit_score as f64,
        "Past_Defaults" => record.raw.past_defaults as f64,
        "DTI" => record.dti,
        "Income_Loan_Ratio" => record.income_loan_ratio,
        "Loan_to_Income_Ratio" => record.loan_to_income_ratio,
        "Monthly_Installment" => record.monthly_installment,
        "Affordability_Score" => record.affordability_score,
        "App_Vintage" => record.app_vintage_months as f64,
        "Has_Past_Defaults" => record.has_past_defaults as f64,
        "High_DTI_Flag" => record.high_dti_flag as f64,
        "Low_Affordability_Flag" => record.low_affordability_flag as f64,
        _ => 0.0,
    }
}

/// Categorical feature lookup by wire name.
fn categorical_feature<'a>(record: &'a EngineeredRecord, field: &str) -> Option<&'a str> {
    match field {
        "Employment_Status" => Some(&record.raw.employment_status),
        "Marital_Status" => Some(&record.raw.marital_status),
        "Education_Level" => Some(&record.raw.education_level),
        "Property_Ownership" => Some(&record.raw.property_ownership),
        "Loan_Purpose" => Some(&record.raw.loan_purpose),
        "Co_Applicant" => Some(&record.raw.co_applicant),
        "Approval_Channel" => Some(&record.raw.approval_channel),
        "Region" => Some(&record.raw.region),
        "Age_Band" => Some(record.age_band.display_name()),
        "Credit_Band" => Some(record.credit_band.display_name()),
        "Employment_Tenure_Band" => Some(record.employment_tenure_band),
        _ => None,
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Scorer backed by an exclusively owned, eagerly loaded model artifact.
///
/// The artifact is read-only after load, so sharing across threads would be
/// safe if a parallel batch mode were ever added.
pub struct LocalScorer {
    artifact: ModelArtifact,
    path: String,
}

impl LocalScorer {
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        Ok(Self {
            artifact: ModelArtifact::load(path)?,
            path: path.display().to_string(),
        })
    }

    pub fn from_artifact(artifact: ModelArtifact) -> Self {
        Self {
            artifact,
            path: "<in-memory>".to_string(),
        }
    }
}

impl Scorer for LocalScorer {
    fn score(&self, record: &EngineeredRecord) -> Result<Prediction, ScoreError> {
        let z = self.artifact.linear_term(record);
        if !z.is_finite() {
            return Err(ScoreError::Invalid(
                "Non-finite linear term from model artifact (bad input values?).".to_string(),
            ));
        }

        let pd = validate_pd(sigmoid(z), "local model")?;
        let class = (pd >= self.artifact.threshold) as u8;
        Ok(Prediction { pd, class })
    }

    fn describe(&self) -> String {
        format!("local model ({})", self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RawApplicant;
    use crate::features::engineer_single;

    fn record() -> EngineeredRecord {
        let raw = RawApplicant {
            customer_id: 7,
            age: 42,
            income: 60000.0,
            annual_expenses: 42000.0,
            loan_amount: 20000.0,
            loan_term_months: 48,
            credit_score: 665,
            employment_status: "2 years".to_string(),
            marital_status: "Married".to_string(),
            education_level: "Diploma".to_string(),
            property_ownership: "OWN".to_string(),
            loan_purpose: "medical".to_string(),
            co_applicant: "Yes".to_string(),
            approval_channel: "Branch".to_string(),
            region: "Limpopo".to_string(),
            application_date: Some("2025-02-01".parse().unwrap()),
            past_defaults: 2,
        };
        engineer_single(&raw, None)
    }

    fn artifact(json: &str) -> ModelArtifact {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn bias_only_artifact_scores_sigmoid_of_bias() {
        let scorer = LocalScorer::from_artifact(artifact(
            r#"{ "bias": 0.0, "numeric": { "Has_Past_Defaults": 0.0 } }"#,
        ));
        let pred = scorer.score(&record()).unwrap();
        assert!((pred.pd - 0.5).abs() < 1e-12);
        assert_eq!(pred.class, 1); // default threshold 0.5, pd >= threshold
    }

    #[test]
    fn categorical_levels_shift_the_score() {
        let base = LocalScorer::from_artifact(artifact(
            r#"{ "bias": -1.0, "numeric": { "Has_Past_Defaults": 0.5 } }"#,
        ));
        let with_band = LocalScorer::from_artifact(artifact(
            r#"{
                "bias": -1.0,
                "numeric": { "Has_Past_Defaults": 0.5 },
                "categorical": { "Credit_Band": { "Subprime": 1.5 } }
            }"#,
        ));

        let rec = record(); // credit 665 => Subprime
        let low = base.score(&rec).unwrap().pd;
        let high = with_band.score(&rec).unwrap().pd;
        assert!(high > low);
    }

    #[test]
    fn unknown_level_contributes_nothing() {
        let scorer = LocalScorer::from_artifact(artifact(
            r#"{
                "bias": 0.25,
                "numeric": {},
                "categorical": { "Region": { "Gauteng": 9.0 } }
            }"#,
        ));
        // Record's region is Limpopo, absent from the artifact.
        let pred = scorer.score(&record()).unwrap();
        assert!((pred.pd - sigmoid(0.25)).abs() < 1e-12);
    }

    #[test]
    fn load_rejects_missing_and_malformed_files() {
        let missing = ModelArtifact::load(Path::new("/nonexistent/model.json"));
        assert_eq!(missing.unwrap_err().exit_code(), 4);

        let dir = std::env::temp_dir().join("loanpd-artifact-test");
        std::fs::create_dir_all(&dir).unwrap();
        let bad = dir.join("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();
        assert_eq!(ModelArtifact::load(&bad).unwrap_err().exit_code(), 4);

        let empty = dir.join("empty.json");
        std::fs::write(&empty, r#"{ "bias": 0.0, "numeric": {} }"#).unwrap();
        assert_eq!(ModelArtifact::load(&empty).unwrap_err().exit_code(), 4);
    }

    #[test]
    fn threshold_splits_classes() {
        let scorer = LocalScorer::from_artifact(artifact(
            r#"{ "bias": -0.5, "numeric": { "Has_Past_Defaults": 0.0 }, "threshold": 0.3 }"#,
        ));
        let pred = scorer.score(&record()).unwrap();
        // sigmoid(-0.5) ~ 0.3775 >= 0.3
        assert_eq!(pred.class, 1);
        assert!(pred.pd > 0.3 && pred.pd < 0.5);
    }
}
