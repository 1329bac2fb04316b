//! Banding rules: age, credit score, employment tenure, and risk.

use crate::domain::{AgeBand, CreditBand, RiskBand};

/// Risk banding thresholds on probability of default.
pub const HIGH_RISK_PD: f64 = 0.40;
pub const MEDIUM_RISK_PD: f64 = 0.25;

impl RiskBand {
    /// Band a probability of default.
    ///
    /// Total over all inputs: scorers validate PD into [0, 1] before banding,
    /// but non-finite or out-of-range values are clamped here as well so this
    /// can never misbehave on a rogue input.
    pub fn from_pd(pd: f64) -> RiskBand {
        let pd = if pd.is_finite() { pd.clamp(0.0, 1.0) } else { 0.0 };
        if pd >= HIGH_RISK_PD {
            RiskBand::High
        } else if pd >= MEDIUM_RISK_PD {
            RiskBand::Medium
        } else {
            RiskBand::Low
        }
    }
}

impl AgeBand {
    /// Bucket an applicant age.
    ///
    /// The documented range is [21, 70]; ages outside it are clamped to the
    /// nearest bucket (a stray row must never abort a batch).
    pub fn from_age(age: u32) -> AgeBand {
        match age {
            0..=30 => AgeBand::From21To30,
            31..=40 => AgeBand::From31To40,
            41..=50 => AgeBand::From41To50,
            51..=60 => AgeBand::From51To60,
            _ => AgeBand::From61To70,
        }
    }
}

impl CreditBand {
    /// Bucket a credit score. Boundaries are inclusive of the lower band.
    pub fn from_score(score: u32) -> CreditBand {
        match score {
            0..=680 => CreditBand::Subprime,
            681..=700 => CreditBand::NearPrime,
            701..=720 => CreditBand::Prime,
            _ => CreditBand::SuperPrime,
        }
    }
}

/// Map an employment-status label to its tenure bucket.
///
/// Fixed lookup over the reference labels; anything else is `"Unknown"`.
pub fn employment_tenure_band(status: &str) -> &'static str {
    match status.trim() {
        "< 1 year" => "0-1 yr",
        "1 year" | "2 years" => "1-3 yrs",
        "3 years" | "4 years" => "3-5 yrs",
        "5 years" | "6 years" => "5-7 yrs",
        "7 years" | "8 years" | "9 years" => "7-10 yrs",
        "10+ years" => "10+ yrs",
        _ => "Unknown",
    }
}
