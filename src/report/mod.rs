//! Terminal output formatting.
//!
//! We keep formatting code in one place so:
//! - the feature/scoring code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::batch::BatchOutput;
use crate::domain::ScoredRecord;

/// Format the single-applicant scoring report.
pub fn format_single_report(scored: &ScoredRecord, backend: &str) -> String {
    let rec = &scored.record;
    let raw = &rec.raw;
    let mut out = String::new();

    out.push_str("=== loanpd - Loan Default Scoring ===\n");
    out.push_str(&format!("Backend: {backend}\n"));
    out.push_str(&format!("Customer: {}\n", raw.customer_id));
    out.push('\n');

    out.push_str("Engineered features:\n");
    out.push_str(&format!(
        "  DTI: {:.4} | Income/Loan: {:.4} | Loan/Income: {:.4}\n",
        rec.dti, rec.income_loan_ratio, rec.loan_to_income_ratio
    ));
    out.push_str(&format!(
        "  Monthly installment: {:.0} | Affordability: {:.0}/100\n",
        rec.monthly_installment, rec.affordability_score
    ));
    out.push_str(&format!(
        "  Age band: {} | Credit band: {} | Tenure: {}\n",
        rec.age_band.display_name(),
        rec.credit_band.display_name(),
        rec.employment_tenure_band
    ));
    out.push_str(&format!(
        "  Flags: past_defaults={} high_dti={} low_affordability={}\n",
        rec.has_past_defaults, rec.high_dti_flag, rec.low_affordability_flag
    ));
    out.push('\n');

    out.push_str(&format!("Predicted PD (Default): {:.3}\n", scored.prediction.pd));
    out.push_str(&format!(
        "Predicted Class: {} (1 = Default, 0 = Non-Default)\n",
        scored.prediction.class
    ));
    out.push_str(&format!("Risk Band: {}\n", scored.risk_band.display_name()));

    out
}

/// Format the batch run summary printed after export.
pub fn format_batch_summary(output: &BatchOutput, backend: &str, export_path: &str) -> String {
    let mut out = String::new();

    out.push_str("=== loanpd - Batch Scoring ===\n");
    out.push_str(&format!("Backend: {backend}\n"));
    out.push_str(&format!(
        "Rows: {} total | {} scored | {} failed\n",
        output.rows_total(),
        output.rows_scored(),
        output.rows_failed()
    ));
    out.push_str(&format!("Scored file written to {export_path}\n"));

    if output.rows_failed() > 0 {
        out.push_str("\nFailed rows (diagnostic in Risk_Band column):\n");
        for outcome in &output.outcomes {
            if let crate::batch::RowResult::Failed { diagnostic } = &outcome.result {
                out.push_str(&format!("  line {}: {}\n", outcome.row.line, diagnostic));
            }
        }
    }

    out
}
