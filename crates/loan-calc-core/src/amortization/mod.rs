//! Fixed-rate loan amortization with optional extra principal payments.

pub mod analysis;
pub mod request;
pub mod schedule;

pub use analysis::{analyze_loan, ExtraPaymentImpact, LoanAnalysis};
pub use request::{term_in_months, ExtraPayments, LoanRequest, TermUnit, MAX_TERM_MONTHS};
pub use schedule::{compute_schedule, PaymentRecord, ScheduleResult};
