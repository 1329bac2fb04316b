//! Remote scoring over HTTP.
//!
//! Serializes the raw applicant fields (plus the precomputed affordability
//! score and zeroed placeholders for values the service recomputes) as JSON
//! and POSTs them to the configured endpoint. Transport problems and non-200
//! responses come back as recoverable [`ScoreError::Transport`] values so
//! batch processing can continue past individual failures.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::domain::{EngineeredRecord, Prediction};
use crate::error::AppError;
use crate::score::{ScoreError, Scorer, validate_pd};

/// Fixed request timeout for scoring calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Wire payload for the PD endpoint.
///
/// Field names are the endpoint's exact contract; the zeroed ratio fields are
/// recomputed server-side and exist only to keep the schema complete.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreRequest {
    #[serde(rename = "Customer_ID")]
    pub customer_id: u64,
    #[serde(rename = "Age")]
    pub age: f64,
    #[serde(rename = "Income")]
    pub income: f64,
    #[serde(rename = "Annual_Expenses")]
    pub annual_expenses: f64,
    #[serde(rename = "Loan_Amount")]
    pub loan_amount: f64,
    #[serde(rename = "Loan_Term_Months")]
    pub loan_term_months: f64,
    #[serde(rename = "Credit_Score")]
    pub credit_score: f64,
    #[serde(rename = "Employment_Status")]
    pub employment_status: String,
    #[serde(rename = "Marital_Status")]
    pub marital_status: String,
    #[serde(rename = "Education_Level")]
    pub education_level: String,
    #[serde(rename = "Property_Ownership")]
    pub property_ownership: String,
    #[serde(rename = "Loan_Purpose")]
    pub loan_purpose: String,
    #[serde(rename = "Co_Applicant")]
    pub co_applicant: String,
    #[serde(rename = "Approval_Channel")]
    pub approval_channel: String,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Application_Date")]
    pub application_date: String,
    #[serde(rename = "Past_Defaults")]
    pub past_defaults: f64,
    #[serde(rename = "DTI")]
    pub dti: f64,
    #[serde(rename = "Income_Loan_Ratio")]
    pub income_loan_ratio: f64,
    #[serde(rename = "Monthly_Installment")]
    pub monthly_installment: f64,
    #[serde(rename = "Loan_to_Income_Ratio")]
    pub loan_to_income_ratio: f64,
    #[serde(rename = "Affordability_Score")]
    pub affordability_score: f64,
    #[serde(rename = "App_Month")]
    pub app_month: String,
}

impl ScoreRequest {
    /// Build the wire payload for one engineered record.
    ///
    /// `asof` supplies the month abbreviation when the record has no
    /// parseable application date.
    pub fn from_record(record: &EngineeredRecord, asof: NaiveDate) -> Self {
        let raw = &record.raw;
        let date = raw.application_date.unwrap_or(asof);
        ScoreRequest {
            customer_id: raw.customer_id,
            age: raw.age as f64,
            income: raw.income,
            annual_expenses: raw.annual_expenses,
            loan_amount: raw.loan_amount,
            loan_term_months: raw.loan_term_months as f64,
            credit_score: raw.credit_score as f64,
            employment_status: raw.employment_status.clone(),
            marital_status: raw.marital_status.clone(),
            education_level: raw.education_level.clone(),
            property_ownership: raw.property_ownership.clone(),
            loan_purpose: raw.loan_purpose.clone(),
            co_applicant: raw.co_applicant.clone(),
            approval_channel: raw.approval_channel.clone(),
            region: raw.region.clone(),
            application_date: date.format("%Y-%m-%d").to_string(),
            past_defaults: raw.past_defaults as f64,
            // Recomputed server-side; sent as zeros per the contract.
            dti: 0.0,
            income_loan_ratio: 0.0,
            monthly_installment: 0.0,
            loan_to_income_ratio: 0.0,
            affordability_score: record.affordability_score,
            app_month: date.format("%b").to_string(),
        }
    }
}

/// Wire response from the PD endpoint.
///
/// The response's own `Risk_Band` is informational; banding is recomputed
/// locally from the PD so both scorer variants band identically.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreResponse {
    #[serde(rename = "Predicted_PD")]
    pub predicted_pd: f64,
    #[serde(rename = "Predicted_Class")]
    pub predicted_class: f64,
    #[serde(rename = "Risk_Band", default)]
    pub risk_band: Option<String>,
}

/// Scorer that defers to a remote PD endpoint.
pub struct RemoteScorer {
    client: Client,
    url: String,
    asof: NaiveDate,
}

impl RemoteScorer {
    pub fn new(url: String, asof: NaiveDate) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::scoring(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, url, asof })
    }
}

impl Scorer for RemoteScorer {
    fn score(&self, record: &EngineeredRecord) -> Result<Prediction, ScoreError> {
        let payload = ScoreRequest::from_record(record, self.asof);

        let resp = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .map_err(|e| ScoreError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(ScoreError::Transport(format!(
                "API error {}: {body}",
                status.as_u16()
            )));
        }

        let body: ScoreResponse = resp
            .json()
            .map_err(|e| ScoreError::Invalid(format!("Unparseable API response: {e}")))?;

        let pd = validate_pd(body.predicted_pd, "scoring API")?;
        let class = (body.predicted_class != 0.0) as u8;
        Ok(Prediction { pd, class })
    }

    fn describe(&self) -> String {
        format!("remote API ({})", self.url)
    }
}
