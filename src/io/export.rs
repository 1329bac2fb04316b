//! Export a scored batch to CSV.
//!
//! The output is the original input columns verbatim, followed by
//! `PD_Default`, `Default_Pred`, `Risk_Band`. Keeping the original cells
//! untouched gives the round-trip guarantee: re-importing an export
//! reproduces every raw field exactly.

use std::path::Path;

use crate::batch::{BatchOutput, RowResult};
use crate::error::AppError;

/// Result columns appended after the original input columns.
pub const RESULT_COLUMNS: [&str; 3] = ["PD_Default", "Default_Pred", "Risk_Band"];

/// Write the scored batch to `path`.
pub fn write_scored_csv(path: &Path, output: &BatchOutput) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| {
        AppError::usage(format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;

    let header: Vec<&str> = output
        .headers
        .iter()
        .map(String::as_str)
        .chain(RESULT_COLUMNS)
        .collect();
    writer
        .write_record(&header)
        .map_err(|e| AppError::usage(format!("Failed to write export CSV header: {e}")))?;

    for outcome in &output.outcomes {
        let (pd_cell, class_cell) = match &outcome.result {
            RowResult::Scored(s) => (
                format!("{:.6}", s.prediction.pd),
                s.prediction.class.to_string(),
            ),
            // Missing sentinel: empty cells, diagnostic goes in Risk_Band.
            RowResult::Failed { .. } => (String::new(), String::new()),
        };

        let band_cell = outcome.result.risk_band_cell();
        let record: Vec<&str> = outcome
            .row
            .cells
            .iter()
            .map(String::as_str)
            .chain([pd_cell.as_str(), class_cell.as_str(), band_cell.as_str()])
            .collect();

        writer
            .write_record(&record)
            .map_err(|e| AppError::usage(format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::usage(format!("Failed to flush export CSV: {e}")))?;

    Ok(())
}
