//! CSV ingest and per-row parsing.
//!
//! Turns an uploaded application CSV into rows the batch orchestrator can
//! process. Design goals:
//!
//! - **Lenient schema**: missing columns default to zero/empty per field type
//!   (upstream exports vary), but a file with no recognized columns at all is
//!   rejected with a clear error.
//! - **Row-level isolation**: a malformed cell poisons only its own row,
//!   surfaced later as that row's diagnostic rather than aborting the batch.
//! - **Verbatim retention**: every row keeps its original header→cell values
//!   untouched so the export can reproduce them exactly.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::RawApplicant;
use crate::error::AppError;

/// The canonical application columns, in export order.
///
/// Header matching is case-sensitive: these are wire names shared with the
/// scoring endpoint, not loose labels.
pub const COLUMNS: [&str; 17] = [
    "Customer_ID",
    "Age",
    "Income",
    "Annual_Expenses",
    "Loan_Amount",
    "Loan_Term_Months",
    "Credit_Score",
    "Employment_Status",
    "Marital_Status",
    "Education_Level",
    "Property_Ownership",
    "Loan_Purpose",
    "Co_Applicant",
    "Approval_Channel",
    "Region",
    "Application_Date",
    "Past_Defaults",
];

/// One input row: original cells plus the parse attempt.
#[derive(Debug, Clone)]
pub struct BatchRow {
    /// 1-based CSV line number (header is line 1).
    pub line: usize,
    /// Original cell values, aligned with the file's header row.
    pub cells: Vec<String>,
    /// Parsed applicant, or a diagnostic naming the offending field.
    pub parsed: Result<RawApplicant, String>,
}

/// Ingest output: rows in input order plus the file's header row.
#[derive(Debug, Clone)]
pub struct IngestedBatch {
    pub headers: Vec<String>,
    pub rows: Vec<BatchRow>,
}

impl IngestedBatch {
    pub fn rows_read(&self) -> usize {
        self.rows.len()
    }

    pub fn rows_parsed(&self) -> usize {
        self.rows.iter().filter(|r| r.parsed.is_ok()).count()
    }
}

/// Load an application CSV.
pub fn load_applications(path: &Path) -> Result<IngestedBatch, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::usage(format!("Failed to open CSV '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AppError::usage(format!("Failed to read CSV headers: {e}")))?
        .iter()
        .map(|h| strip_bom(h).to_string())
        .collect();

    let header_map = build_header_map(&headers);
    if !COLUMNS.iter().any(|c| header_map.contains_key(*c)) {
        return Err(AppError::usage(format!(
            "CSV '{}' has none of the expected application columns (e.g. {}).",
            path.display(),
            COLUMNS[..6].join(", ")
        )));
    }

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header; CSV line numbers are 1-based.
        let line = idx + 2;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                // The cells are unrecoverable here, but the row slot must
                // still export at header width or the writer rejects it.
                rows.push(BatchRow {
                    line,
                    cells: vec![String::new(); headers.len()],
                    parsed: Err(format!("CSV parse error: {e}")),
                });
                continue;
            }
        };

        let mut cells: Vec<String> = record.iter().map(str::to_string).collect();
        // Keep cells aligned with the header: the export writes a
        // rectangular file. Short rows are padded; rows with unnamed
        // trailing cells are surfaced as failures naming the dropped cells
        // rather than losing them silently.
        let parsed = if cells.len() > headers.len() {
            let dropped = cells.split_off(headers.len());
            Err(format!(
                "row has {} cells but the header has {}; dropped trailing cells: {}",
                headers.len() + dropped.len(),
                headers.len(),
                dropped.join(", ")
            ))
        } else {
            cells.resize(headers.len(), String::new());
            parse_row(&record, &header_map)
        };
        rows.push(BatchRow { line, cells, parsed });
    }

    if rows.is_empty() {
        return Err(AppError::no_data(format!(
            "CSV '{}' contains no application rows.",
            path.display()
        )));
    }

    Ok(IngestedBatch { headers, rows })
}

fn build_header_map(headers: &[String]) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.clone(), idx))
        .collect()
}

fn strip_bom(name: &str) -> &str {
    // Excel-exported UTF-8 CSVs often carry a BOM on the first header.
    name.trim().trim_start_matches('\u{feff}')
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<RawApplicant, String> {
    Ok(RawApplicant {
        customer_id: parse_num(record, header_map, "Customer_ID")?.max(0.0).round() as u64,
        age: parse_uint(record, header_map, "Age")?,
        income: parse_num(record, header_map, "Income")?,
        annual_expenses: parse_num(record, header_map, "Annual_Expenses")?,
        loan_amount: parse_num(record, header_map, "Loan_Amount")?,
        loan_term_months: parse_uint(record, header_map, "Loan_Term_Months")?,
        credit_score: parse_uint(record, header_map, "Credit_Score")?,
        employment_status: get_str(record, header_map, "Employment_Status"),
        marital_status: get_str(record, header_map, "Marital_Status"),
        education_level: get_str(record, header_map, "Education_Level"),
        property_ownership: get_str(record, header_map, "Property_Ownership"),
        loan_purpose: get_str(record, header_map, "Loan_Purpose"),
        co_applicant: get_str(record, header_map, "Co_Applicant"),
        approval_channel: get_str(record, header_map, "Approval_Channel"),
        region: get_str(record, header_map, "Region"),
        application_date: get_cell(record, header_map, "Application_Date").and_then(parse_date),
        past_defaults: parse_uint(record, header_map, "Past_Defaults")?,
    })
}

fn get_cell<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

/// String field: missing column or empty cell defaults to "".
fn get_str(record: &StringRecord, header_map: &HashMap<String, usize>, name: &str) -> String {
    get_cell(record, header_map, name).unwrap_or_default().to_string()
}

/// Currency/float field: missing defaults to 0; garbage is a row error.
fn parse_num(record: &StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Result<f64, String> {
    let Some(cell) = get_cell(record, header_map, name) else {
        return Ok(0.0);
    };
    let v: f64 = cell
        .parse()
        .map_err(|_| format!("invalid `{name}` value '{cell}'"))?;
    if !v.is_finite() {
        return Err(format!("invalid `{name}` value '{cell}'"));
    }
    Ok(v)
}

/// Count-like field: accepts `35` or `35.0`, floors negatives to 0.
fn parse_uint(record: &StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Result<u32, String> {
    let v = parse_num(record, header_map, name)?;
    Ok(v.max(0.0).round() as u32)
}

/// Parse an application date; `None` means "no usable date".
///
/// ISO dates are canonical, but uploads commonly use slash or day-first
/// formats, so a small fixed set is accepted. Unparseable dates are not row
/// errors: the engineer falls back to vintage 0 and the as-of month.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    const FMTS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];
    FMTS.iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(name: &str, body: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join("loanpd-ingest-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn parses_full_rows() {
        let path = write_csv(
            "full.csv",
            "Customer_ID,Age,Income,Annual_Expenses,Loan_Amount,Loan_Term_Months,Credit_Score,\
             Employment_Status,Marital_Status,Education_Level,Property_Ownership,Loan_Purpose,\
             Co_Applicant,Approval_Channel,Region,Application_Date,Past_Defaults\n\
             10,35,80000,35000,15000,36,700,3 years,Single,Degree,RENT,medical,No,Web,Gauteng,2025-01-15,0\n",
        );
        let batch = load_applications(&path).unwrap();
        assert_eq!(batch.rows_read(), 1);

        let raw = batch.rows[0].parsed.as_ref().unwrap();
        assert_eq!(raw.customer_id, 10);
        assert_eq!(raw.age, 35);
        assert_eq!(raw.income, 80000.0);
        assert_eq!(raw.loan_term_months, 36);
        assert_eq!(raw.region, "Gauteng");
        assert_eq!(raw.application_date, Some("2025-01-15".parse().unwrap()));
    }

    #[test]
    fn missing_columns_default_per_field_type() {
        let path = write_csv("sparse.csv", "Customer_ID,Income\n1,50000\n");
        let batch = load_applications(&path).unwrap();
        let raw = batch.rows[0].parsed.as_ref().unwrap();
        assert_eq!(raw.income, 50000.0);
        assert_eq!(raw.loan_amount, 0.0);
        assert_eq!(raw.age, 0);
        assert_eq!(raw.employment_status, "");
        assert_eq!(raw.application_date, None);
    }

    #[test]
    fn malformed_numeric_is_a_row_error_not_a_batch_error() {
        let path = write_csv(
            "bad.csv",
            "Customer_ID,Income,Loan_Amount\n1,eighty thousand,15000\n2,60000,9000\n",
        );
        let batch = load_applications(&path).unwrap();
        assert_eq!(batch.rows_read(), 2);
        assert_eq!(batch.rows_parsed(), 1);

        let err = batch.rows[0].parsed.as_ref().unwrap_err();
        assert!(err.contains("Income"), "diagnostic should name the field: {err}");
        // Original cells preserved for export even on failure.
        assert_eq!(batch.rows[0].cells, vec!["1", "eighty thousand", "15000"]);
    }

    #[test]
    fn unparseable_dates_become_none() {
        let path = write_csv(
            "dates.csv",
            "Customer_ID,Application_Date\n1,2025-01-15\n2,15/01/2025\n3,not a date\n4,\n",
        );
        let batch = load_applications(&path).unwrap();
        let dates: Vec<_> = batch
            .rows
            .iter()
            .map(|r| r.parsed.as_ref().unwrap().application_date)
            .collect();
        assert_eq!(dates[0], Some("2025-01-15".parse().unwrap()));
        assert_eq!(dates[1], Some("2025-01-15".parse().unwrap()));
        assert_eq!(dates[2], None);
        assert_eq!(dates[3], None);
    }

    #[test]
    fn unreadable_record_keeps_header_width() {
        // Invalid UTF-8 in a cell fails the reader for that record only; the
        // row slot must stay export-shaped (one cell per header column).
        let dir = std::env::temp_dir().join("loanpd-ingest-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("utf8.csv");
        let mut f = File::create(&path).unwrap();
        f.write_all(b"Customer_ID,Income,Region\n1,50000,Gauteng\n2,60000,G\xff\xfe\n3,70000,Limpopo\n")
            .unwrap();

        let batch = load_applications(&path).unwrap();
        assert_eq!(batch.rows_read(), 3);
        assert_eq!(batch.rows_parsed(), 2);

        let bad = &batch.rows[1];
        assert!(bad.parsed.as_ref().unwrap_err().contains("CSV parse error"));
        assert_eq!(bad.cells.len(), batch.headers.len());
    }

    #[test]
    fn overlong_row_fails_with_dropped_cells_named() {
        let path = write_csv(
            "overlong.csv",
            "Customer_ID,Income,Loan_Amount\n1,50000,9000,stray,extra\n2,60000,8000\n",
        );
        let batch = load_applications(&path).unwrap();
        assert_eq!(batch.rows_read(), 2);
        assert_eq!(batch.rows_parsed(), 1);

        let bad = &batch.rows[0];
        let err = bad.parsed.as_ref().unwrap_err();
        assert!(err.contains("5 cells"), "diagnostic should count cells: {err}");
        assert!(err.contains("stray, extra"), "diagnostic should name dropped cells: {err}");
        // Retained cells still align with the header for export.
        assert_eq!(bad.cells, vec!["1", "50000", "9000"]);
    }

    #[test]
    fn unrecognized_schema_is_exit_2() {
        let path = write_csv("alien.csv", "foo,bar\n1,2\n");
        assert_eq!(load_applications(&path).unwrap_err().exit_code(), 2);
    }

    #[test]
    fn empty_file_is_exit_3() {
        let path = write_csv("empty.csv", "Customer_ID,Income\n");
        assert_eq!(load_applications(&path).unwrap_err().exit_code(), 3);
    }
}
