use loan_calc_core::amortization::{self, LoanRequest};
use loan_calc_core::export::ExportRequest;
use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Schedules
// ---------------------------------------------------------------------------

/// `{ principal, annual_rate, term_months }` -> schedule result JSON.
/// Any `extra_payments` in the payload are ignored.
#[napi]
pub fn calculate_amortization(input_json: String) -> NapiResult<String> {
    let input = LoanRequest::from_json(&input_json)
        .map_err(to_napi_error)?
        .without_extra_payments();
    let output = amortization::compute_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// `{ principal, annual_rate, term_months, extra_payments }` -> schedule result JSON.
#[napi]
pub fn calculate_with_extra_payments(input_json: String) -> NapiResult<String> {
    let input = LoanRequest::from_json(&input_json).map_err(to_napi_error)?;
    let output = amortization::compute_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Schedule plus extra-payment savings, wrapped in the computation envelope.
#[napi]
pub fn analyze_loan(input_json: String) -> NapiResult<String> {
    let input = LoanRequest::from_json(&input_json).map_err(to_napi_error)?;
    let output = amortization::analyze_loan(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// `{ schedule: [...] }` -> CSV text.
#[napi]
pub fn export_to_csv(input_json: String) -> NapiResult<String> {
    let input = ExportRequest::from_json(&input_json).map_err(to_napi_error)?;
    input.to_csv().map_err(to_napi_error)
}
