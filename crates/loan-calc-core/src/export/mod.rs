//! Serialization of computed schedules into portable tabular formats.

pub mod csv_writer;

use serde::{Deserialize, Serialize};

use crate::amortization::PaymentRecord;
use crate::error::LoanCalcError;
use crate::LoanCalcResult;

pub use csv_writer::{to_csv, CSV_HEADER};

/// Export request: a previously computed schedule, in payment order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRequest {
    pub schedule: Vec<PaymentRecord>,
}

impl ExportRequest {
    /// Decode `{ "schedule": [...] }`. A full schedule result also decodes,
    /// its summary fields are ignored.
    pub fn from_json(json: &str) -> LoanCalcResult<Self> {
        serde_json::from_str(json).map_err(|e| LoanCalcError::invalid("schedule", e.to_string()))
    }

    pub fn to_csv(&self) -> LoanCalcResult<String> {
        to_csv(&self.schedule)
    }
}
