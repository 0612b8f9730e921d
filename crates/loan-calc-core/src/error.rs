use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoanCalcError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl LoanCalcError {
    /// Shorthand for the validation failure raised by every component.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        LoanCalcError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Human-readable reason without the field prefix.
    pub fn reason(&self) -> &str {
        match self {
            LoanCalcError::InvalidInput { reason, .. } => reason,
            LoanCalcError::SerializationError(msg) => msg,
        }
    }
}

impl From<serde_json::Error> for LoanCalcError {
    fn from(e: serde_json::Error) -> Self {
        LoanCalcError::SerializationError(e.to_string())
    }
}

#[cfg(feature = "export")]
impl From<csv::Error> for LoanCalcError {
    fn from(e: csv::Error) -> Self {
        LoanCalcError::SerializationError(e.to_string())
    }
}
