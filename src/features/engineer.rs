//! Raw → engineered record transformation.
//!
//! Engineering operates over a batch so that batch-relative features
//! (application vintage) are computed against one shared reference date.
//! A single record is treated as its own batch (vintage = 0).
//!
//! Every ratio uses divide-with-fallback-to-zero semantics: no division by
//! zero and no NaN ever reaches the binary flags or the scorer.

use chrono::{Datelike, NaiveDate};

use crate::domain::{AgeBand, CreditBand, EngineeredRecord, RawApplicant};
use crate::features::affordability::{compute_affordability, monthly_installment};
use crate::features::bands::employment_tenure_band;

/// DTI above this flags the record as high debt-to-income.
pub const HIGH_DTI_THRESHOLD: f64 = 0.6;
/// Affordability below this flags the record as low affordability.
pub const LOW_AFFORDABILITY_THRESHOLD: f64 = 85.0;

/// Engineer features for a whole batch.
///
/// The vintage reference date is the maximum application date present in the
/// batch; records without a parseable date are excluded from that maximum and
/// get vintage 0. Output order matches input order.
pub fn engineer_batch(records: &[RawApplicant]) -> Vec<EngineeredRecord> {
    let reference = records
        .iter()
        .filter_map(|r| r.application_date)
        .max();

    records
        .iter()
        .map(|r| engineer_record(r, reference))
        .collect()
}

/// Engineer a single record as its own batch.
///
/// Vintage is measured against `reference` when supplied (e.g., a batch
/// re-score against a fixed as-of date), otherwise against the record's own
/// date, which makes the vintage 0.
pub fn engineer_single(record: &RawApplicant, reference: Option<NaiveDate>) -> EngineeredRecord {
    engineer_record(record, reference.or(record.application_date))
}

fn engineer_record(raw: &RawApplicant, reference: Option<NaiveDate>) -> EngineeredRecord {
    let dti = ratio(raw.annual_expenses, raw.income);
    let income_loan_ratio = ratio(raw.income, raw.loan_amount);
    let loan_to_income_ratio = ratio(raw.loan_amount, raw.income);

    let installment = monthly_installment(raw.loan_amount, raw.loan_term_months).round();
    let affordability = compute_affordability(raw.income, raw.loan_amount, raw.loan_term_months);

    let vintage = match (raw.application_date, reference) {
        (Some(date), Some(reference)) => months_between(date, reference),
        _ => 0,
    };

    EngineeredRecord {
        dti,
        income_loan_ratio,
        loan_to_income_ratio,
        monthly_installment: installment,
        affordability_score: affordability,
        app_vintage_months: vintage,
        age_band: AgeBand::from_age(raw.age),
        credit_band: CreditBand::from_score(raw.credit_score),
        employment_tenure_band: employment_tenure_band(&raw.employment_status),
        has_past_defaults: (raw.past_defaults > 0) as u8,
        high_dti_flag: (dti > HIGH_DTI_THRESHOLD) as u8,
        low_affordability_flag: (affordability < LOW_AFFORDABILITY_THRESHOLD) as u8,
        raw: raw.clone(),
    }
}

/// `numerator / denominator`, or 0 when the denominator is 0 (or the result
/// would be non-finite).
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let v = numerator / denominator;
    if v.is_finite() { v } else { 0.0 }
}

/// Whole calendar months from `date` to `reference`, floored at 0.
fn months_between(date: NaiveDate, reference: NaiveDate) -> u32 {
    let months = (reference.year() - date.year()) * 12 + (reference.month() as i32 - date.month() as i32);
    months.max(0) as u32
}
