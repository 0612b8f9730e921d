//! Fixed-rate loan amortization schedules with decimal precision.
//!
//! [`amortization::compute_schedule`] turns a [`amortization::LoanRequest`]
//! into a month-by-month schedule; [`export::to_csv`] serializes it.

pub mod amortization;
pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "export")]
pub mod export;

pub use error::LoanCalcError;
pub use types::*;

/// Standard result type for all loan-calc operations
pub type LoanCalcResult<T> = Result<T, LoanCalcError>;
