//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during feature engineering and scoring
//! - serialized to the remote scoring endpoint's wire format
//! - exported to CSV alongside the original input columns

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reference label lists for the categorical applicant fields.
///
/// These mirror the lending front-end's pick lists. CSV ingest does not
/// enforce them (unknown labels flow through to the model as-is), but the
/// single-applicant form defaults and the demo data are drawn from here.
pub mod labels {
    pub const REGIONS: [&str; 9] = [
        "Gauteng",
        "KwaZulu-Natal",
        "Western Cape",
        "Eastern Cape",
        "Northern Cape",
        "Free State",
        "North West",
        "Limpopo",
        "Mpumalanga",
    ];

    pub const EMPLOYMENT_STATUSES: [&str; 11] = [
        "10+ years",
        "9 years",
        "8 years",
        "7 years",
        "6 years",
        "5 years",
        "4 years",
        "3 years",
        "2 years",
        "1 year",
        "< 1 year",
    ];

    pub const MARITAL_STATUSES: [&str; 3] = ["Single", "Married", "Divorced"];
    pub const EDUCATION_LEVELS: [&str; 4] = ["High School", "Diploma", "Degree", "Masters"];
    pub const PROPERTY_TYPES: [&str; 6] = ["OWN", "RENT", "MORTGAGE", "ANY", "OTHER", "NONE"];

    pub const LOAN_PURPOSES: [&str; 8] = [
        "debt_consolidation",
        "credit_card",
        "home_improvement",
        "medical",
        "small_business",
        "vacation",
        "major_purchase",
        "other",
    ];

    pub const APPROVAL_CHANNELS: [&str; 4] = ["Web", "Agent", "Branch", "Mobile App"];
    pub const CO_APPLICANT_OPTS: [&str; 2] = ["No", "Yes"];
    pub const LOAN_TERMS: [u32; 3] = [36, 48, 60];
}

/// One loan application as submitted (form or CSV row).
///
/// Categorical fields stay as free-form strings: batch files come from
/// upstream systems we do not control, and an unknown label must degrade to
/// the model's "unknown" handling rather than fail the row.
#[derive(Debug, Clone, PartialEq)]
pub struct RawApplicant {
    pub customer_id: u64,
    pub age: u32,
    /// Annual income (currency units).
    pub income: f64,
    /// Annual expenses (currency units).
    pub annual_expenses: f64,
    pub loan_amount: f64,
    pub loan_term_months: u32,
    pub credit_score: u32,
    pub employment_status: String,
    pub marital_status: String,
    pub education_level: String,
    pub property_ownership: String,
    pub loan_purpose: String,
    pub co_applicant: String,
    pub approval_channel: String,
    pub region: String,
    /// `None` when the submitted date was missing or unparseable.
    ///
    /// Batch flows exclude `None` from the vintage reference-date computation
    /// and give the row vintage 0; the single-applicant form always supplies a
    /// concrete date.
    pub application_date: Option<NaiveDate>,
    pub past_defaults: u32,
}

/// Age bucket derived from applicant age.
///
/// Bins cover the lending range [21, 70]; out-of-range ages are clamped to
/// the nearest bucket so a stray row never aborts a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeBand {
    From21To30,
    From31To40,
    From41To50,
    From51To60,
    From61To70,
}

impl AgeBand {
    pub fn display_name(self) -> &'static str {
        match self {
            AgeBand::From21To30 => "21-30",
            AgeBand::From31To40 => "31-40",
            AgeBand::From41To50 => "41-50",
            AgeBand::From51To60 => "51-60",
            AgeBand::From61To70 => "61-70",
        }
    }
}

/// Credit-score bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreditBand {
    Subprime,
    NearPrime,
    Prime,
    SuperPrime,
}

impl CreditBand {
    pub fn display_name(self) -> &'static str {
        match self {
            CreditBand::Subprime => "Subprime",
            CreditBand::NearPrime => "Near-prime",
            CreditBand::Prime => "Prime",
            CreditBand::SuperPrime => "Super-prime",
        }
    }
}

/// Ordinal risk classification of a probability of default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    pub fn display_name(self) -> &'static str {
        match self {
            RiskBand::Low => "Low Risk",
            RiskBand::Medium => "Medium Risk",
            RiskBand::High => "High Risk",
        }
    }
}

/// A `RawApplicant` plus every derived model feature.
///
/// Engineering always fills every field (zero / "Unknown" sentinels for
/// degenerate inputs) so scorers receive a uniformly shaped record.
#[derive(Debug, Clone)]
pub struct EngineeredRecord {
    pub raw: RawApplicant,

    /// Debt-to-income: annual expenses / annual income (0 if income is 0).
    pub dti: f64,
    /// Annual income / loan amount (0 if loan amount is 0).
    pub income_loan_ratio: f64,
    /// Loan amount / annual income (0 if income is 0).
    pub loan_to_income_ratio: f64,
    /// Amortizing payment at 12% nominal, rounded to the nearest unit.
    pub monthly_installment: f64,
    /// Bounded [0, 100] affordability score.
    pub affordability_score: f64,
    /// Whole months between this application and the newest in its batch.
    pub app_vintage_months: u32,

    pub age_band: AgeBand,
    pub credit_band: CreditBand,
    /// Tenure bucket label, `"Unknown"` for unmapped employment statuses.
    pub employment_tenure_band: &'static str,

    pub has_past_defaults: u8,
    pub high_dti_flag: u8,
    pub low_affordability_flag: u8,
}

/// Model output for one record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Probability of default in [0, 1].
    pub pd: f64,
    /// 1 = default, 0 = non-default.
    pub class: u8,
}

/// A fully scored record: features + prediction + banding.
#[derive(Debug, Clone)]
pub struct ScoredRecord {
    pub record: EngineeredRecord,
    pub prediction: Prediction,
    pub risk_band: RiskBand,
}

/// Which scoring backend to use, resolved from CLI flags and environment.
#[derive(Debug, Clone)]
pub enum ScorerChoice {
    /// In-process model artifact at the given path.
    Local(PathBuf),
    /// Remote scoring endpoint URL.
    Remote(String),
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus environment defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub scorer: ScorerChoice,
    /// Reference date for "today" fallbacks (date parsing, single-record
    /// vintage). Overridable via `--asof` for reproducible runs.
    pub asof_date: NaiveDate,
}
