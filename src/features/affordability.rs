//! Affordability score and installment math.
//!
//! The affordability score measures how comfortably an applicant's monthly
//! income covers the estimated loan installment, bounded to [0, 100]. The
//! installment uses the standard amortizing-loan payment formula at a fixed
//! nominal annual rate of 12%.

/// Fixed monthly interest rate: 12% nominal annual.
pub const MONTHLY_RATE: f64 = 0.12 / 12.0;

/// Standard amortizing-loan monthly payment (unrounded).
///
/// `P * r(1+r)^n / ((1+r)^n - 1)` for principal `P`, monthly rate `r`,
/// term `n` months. Returns 0 for non-positive principal or term.
pub fn monthly_installment(principal: f64, term_months: u32) -> f64 {
    if principal <= 0.0 || term_months == 0 {
        return 0.0;
    }
    let r = MONTHLY_RATE;
    let growth = (1.0 + r).powi(term_months as i32);
    principal * (r * growth) / (growth - 1.0)
}

/// Bounded [0, 100] affordability score.
///
/// Degenerate inputs (non-positive income, loan amount, or term) score
/// exactly 0 rather than erroring, so batch rows with bad data still flow
/// through to the scorer.
pub fn compute_affordability(income: f64, loan_amount: f64, term_months: u32) -> f64 {
    if term_months == 0 || loan_amount <= 0.0 || income <= 0.0 {
        return 0.0;
    }

    let installment = monthly_installment(loan_amount, term_months);
    let monthly_income = income / 12.0;
    // Unreachable once income > 0 is checked, but guard anyway.
    if monthly_income <= 0.0 {
        return 0.0;
    }

    let burden = installment / monthly_income;
    let raw = (1.0 - burden).clamp(0.0, 1.0);
    // Ties round half-away-from-zero (f64::round), not half-to-even.
    (raw * 100.0).round()
}
