//! Batch orchestration: Feature Engineer → Scorer → Risk Bander over every
//! row of an ingested table.
//!
//! The hard invariant here is row preservation: one output per input row, in
//! input order, no matter which rows fail. A failed row carries a diagnostic
//! in its risk-band slot and missing sentinels for PD/class, so the exported
//! file stays inspectable end to end.

use crate::domain::{RiskBand, ScoredRecord};
use crate::io::ingest::{BatchRow, IngestedBatch};
use crate::score::{ScoreError, Scorer};

/// Result slot for one batch row.
#[derive(Debug, Clone)]
pub enum RowResult {
    Scored(ScoredRecord),
    /// Diagnostic string that replaces the risk band in exports.
    Failed { diagnostic: String },
}

impl RowResult {
    /// The text written to the `Risk_Band` output column.
    pub fn risk_band_cell(&self) -> String {
        match self {
            RowResult::Scored(s) => s.risk_band.display_name().to_string(),
            RowResult::Failed { diagnostic } => diagnostic.clone(),
        }
    }
}

/// One fully processed batch row: original input + result.
#[derive(Debug, Clone)]
pub struct RowOutcome {
    pub row: BatchRow,
    pub result: RowResult,
}

/// Aggregate of a batch run.
#[derive(Debug, Clone)]
pub struct BatchOutput {
    pub headers: Vec<String>,
    pub outcomes: Vec<RowOutcome>,
}

impl BatchOutput {
    pub fn rows_total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn rows_scored(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.result, RowResult::Scored(_)))
            .count()
    }

    pub fn rows_failed(&self) -> usize {
        self.rows_total() - self.rows_scored()
    }
}

/// Score every row of an ingested batch.
///
/// Feature engineering runs over the whole batch first so the vintage
/// feature shares one reference date; scoring is then row-at-a-time, with
/// each failure converted into that row's diagnostic.
pub fn score_batch(batch: IngestedBatch, scorer: &dyn Scorer) -> BatchOutput {
    // Engineer only the parseable rows, but against the whole batch.
    let parsed: Vec<_> = batch
        .rows
        .iter()
        .filter_map(|r| r.parsed.as_ref().ok().cloned())
        .collect();
    let mut engineered = crate::features::engineer_batch(&parsed).into_iter();

    let outcomes = batch
        .rows
        .into_iter()
        .map(|row| {
            let result = match &row.parsed {
                Err(message) => RowResult::Failed {
                    diagnostic: format!("Exception: {message}"),
                },
                // One engineered record per parsed row, in order. The `None`
                // arm is unreachable (engineer_batch is length-preserving)
                // but degrades to a diagnostic rather than a panic.
                Ok(_) => match engineered.next() {
                    Some(record) => match scorer.score(&record) {
                        Ok(prediction) => RowResult::Scored(ScoredRecord {
                            record,
                            risk_band: RiskBand::from_pd(prediction.pd),
                            prediction,
                        }),
                        Err(err) => RowResult::Failed {
                            diagnostic: diagnostic_for(&err),
                        },
                    },
                    None => RowResult::Failed {
                        diagnostic: "Exception: engineered batch shorter than parsed rows".to_string(),
                    },
                },
            };
            RowOutcome { row, result }
        })
        .collect();

    BatchOutput {
        headers: batch.headers,
        outcomes,
    }
}

fn diagnostic_for(err: &ScoreError) -> String {
    match err {
        ScoreError::Transport(m) => format!("API error: {m}"),
        ScoreError::Invalid(m) => format!("Exception: {m}"),
    }
}
