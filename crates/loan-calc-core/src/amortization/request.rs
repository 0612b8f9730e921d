//! Loan request: the immutable input to every schedule computation.
//!
//! Validation is eager and reports the first violated constraint, in the
//! order principal, rate, term, extra payments.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LoanCalcError;
use crate::types::{Money, Rate, RoundingMode};
use crate::LoanCalcResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Longest supported term: 100 years of monthly installments.
pub const MAX_TERM_MONTHS: u32 = 1200;

const MAX_PRINCIPAL: Decimal = dec!(1_000_000_000_000_000);
const MAX_ANNUAL_RATE_PCT: Decimal = dec!(100);

/// Sparse map from 1-based payment number to an extra principal amount.
pub type ExtraPayments = BTreeMap<u32, Money>;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Parameters of a fixed-rate, monthly-compounding loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    /// Initial loan balance
    pub principal: Money,
    /// Nominal annual rate as a percentage in [0, 100]
    pub annual_rate: Rate,
    /// Scheduled number of monthly installments
    pub term_months: u32,
    /// Extra principal keyed by payment number; absent keys mean no extra
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra_payments: ExtraPayments,
    /// Rounding applied to every monetary field
    #[serde(default)]
    pub rounding: RoundingMode,
    /// Date of the first installment, if records should carry dates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_payment_date: Option<NaiveDate>,
}

/// Unit of the term entered by a borrower.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermUnit {
    #[default]
    Months,
    Years,
}

impl LoanRequest {
    /// Request for a standard schedule without extra payments.
    pub fn new(principal: Money, annual_rate: Rate, term_months: u32) -> Self {
        Self {
            principal,
            annual_rate,
            term_months,
            extra_payments: ExtraPayments::new(),
            rounding: RoundingMode::default(),
            first_payment_date: None,
        }
    }

    /// Same loan with the given extra-payment map.
    pub fn with_extra_payments(mut self, extra_payments: ExtraPayments) -> Self {
        self.extra_payments = extra_payments;
        self
    }

    /// Decode a JSON request. Malformed payloads, including non-integer or
    /// negative payment-number keys, are reported as invalid input.
    pub fn from_json(json: &str) -> LoanCalcResult<Self> {
        serde_json::from_str(json).map_err(|e| LoanCalcError::invalid("request", e.to_string()))
    }

    /// Same loan with no extra payments.
    pub fn without_extra_payments(&self) -> Self {
        Self {
            extra_payments: ExtraPayments::new(),
            ..self.clone()
        }
    }

    pub fn has_extra_payments(&self) -> bool {
        self.extra_payments.values().any(|amount| *amount > Decimal::ZERO)
    }

    /// Check every constraint before any computation starts.
    pub fn validate(&self) -> LoanCalcResult<()> {
        // The engine amortizes the principal in cents
        if self.rounding.round(self.principal) <= Decimal::ZERO {
            return Err(LoanCalcError::invalid(
                "principal",
                "principal must be positive",
            ));
        }
        if self.principal > MAX_PRINCIPAL {
            return Err(LoanCalcError::invalid(
                "principal",
                "principal exceeds supported range",
            ));
        }
        if self.annual_rate < Decimal::ZERO || self.annual_rate > MAX_ANNUAL_RATE_PCT {
            return Err(LoanCalcError::invalid("annual_rate", "rate out of range"));
        }
        if self.term_months == 0 {
            return Err(LoanCalcError::invalid(
                "term_months",
                "term must be positive",
            ));
        }
        if self.term_months > MAX_TERM_MONTHS {
            return Err(LoanCalcError::invalid(
                "term_months",
                format!("term exceeds {MAX_TERM_MONTHS} months"),
            ));
        }
        for (&payment_number, &amount) in &self.extra_payments {
            if payment_number == 0 {
                return Err(LoanCalcError::invalid(
                    "extra_payments",
                    "payment number must be a positive integer",
                ));
            }
            if amount < Decimal::ZERO {
                return Err(LoanCalcError::invalid(
                    "extra_payments",
                    format!("extra payment cannot be negative (payment {payment_number})"),
                ));
            }
        }
        Ok(())
    }
}

/// Convert a term entered in months or years into monthly installments.
pub fn term_in_months(term: u32, unit: TermUnit) -> LoanCalcResult<u32> {
    let months = match unit {
        TermUnit::Months => Some(term),
        TermUnit::Years => term.checked_mul(12),
    };
    match months {
        Some(m) if m > 0 && m <= MAX_TERM_MONTHS => Ok(m),
        Some(0) => Err(LoanCalcError::invalid("term", "term must be positive")),
        _ => Err(LoanCalcError::invalid(
            "term",
            format!("term exceeds {MAX_TERM_MONTHS} months"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn base_request() -> LoanRequest {
        LoanRequest::new(dec!(10000), dec!(5), 12)
    }

    fn reason_of(req: &LoanRequest) -> String {
        match req.validate() {
            Err(LoanCalcError::InvalidInput { reason, .. }) => reason,
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(base_request().validate().is_ok());
    }

    #[test]
    fn test_non_positive_principal() {
        let mut req = base_request();
        req.principal = dec!(-100);
        assert_eq!(reason_of(&req), "principal must be positive");
        req.principal = Decimal::ZERO;
        assert_eq!(reason_of(&req), "principal must be positive");
    }

    #[test]
    fn test_principal_rounding_to_zero_cents() {
        let mut req = base_request();
        req.principal = dec!(0.004);
        assert_eq!(reason_of(&req), "principal must be positive");

        req.principal = dec!(0.005);
        assert!(req.validate().is_ok());
        req.rounding = RoundingMode::HalfEven;
        assert_eq!(reason_of(&req), "principal must be positive");
    }

    #[test]
    fn test_rate_bounds() {
        let mut req = base_request();
        req.annual_rate = dec!(100);
        assert!(req.validate().is_ok());
        req.annual_rate = dec!(100.01);
        assert_eq!(reason_of(&req), "rate out of range");
        req.annual_rate = dec!(-0.5);
        assert_eq!(reason_of(&req), "rate out of range");
    }

    #[test]
    fn test_zero_and_oversized_term() {
        let mut req = base_request();
        req.term_months = 0;
        assert_eq!(reason_of(&req), "term must be positive");
        req.term_months = MAX_TERM_MONTHS + 1;
        assert!(reason_of(&req).starts_with("term exceeds"));
    }

    #[test]
    fn test_negative_extra_payment() {
        let req = base_request().with_extra_payments(ExtraPayments::from([(3, dec!(-1))]));
        assert!(reason_of(&req).starts_with("extra payment cannot be negative"));
    }

    #[test]
    fn test_zero_payment_number() {
        let req = base_request().with_extra_payments(ExtraPayments::from([(0, dec!(50))]));
        assert_eq!(reason_of(&req), "payment number must be a positive integer");
    }

    #[test]
    fn test_first_violation_wins() {
        let mut req = base_request();
        req.principal = dec!(-1);
        req.annual_rate = dec!(200);
        req.term_months = 0;
        assert_eq!(reason_of(&req), "principal must be positive");
    }

    #[test]
    fn test_from_json_standard_shape() {
        let req = LoanRequest::from_json(
            r#"{"principal": "250000", "annual_rate": "6.5", "term_months": 360}"#,
        )
        .unwrap();
        assert_eq!(req, LoanRequest::new(dec!(250000), dec!(6.5), 360));
    }

    #[test]
    fn test_from_json_numeric_fields_and_extra_map() {
        let req = LoanRequest::from_json(
            r#"{"principal": 10000, "annual_rate": 5, "term_months": 12,
                "extra_payments": {"1": 9500, "4": "25.50"}}"#,
        )
        .unwrap();
        assert_eq!(req.extra_payments.get(&1), Some(&dec!(9500)));
        assert_eq!(req.extra_payments.get(&4), Some(&dec!(25.50)));
    }

    #[test]
    fn test_from_json_rejects_fractional_key() {
        let err = LoanRequest::from_json(
            r#"{"principal": 100, "annual_rate": 5, "term_months": 12,
                "extra_payments": {"1.5": 10}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, LoanCalcError::InvalidInput { .. }));
    }

    #[test]
    fn test_from_json_rejects_negative_key() {
        let err = LoanRequest::from_json(
            r#"{"principal": 100, "annual_rate": 5, "term_months": 12,
                "extra_payments": {"-2": 10}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, LoanCalcError::InvalidInput { .. }));
    }

    #[test]
    fn test_term_in_months() {
        assert_eq!(term_in_months(30, TermUnit::Years).unwrap(), 360);
        assert_eq!(term_in_months(18, TermUnit::Months).unwrap(), 18);
        assert!(term_in_months(0, TermUnit::Years).is_err());
        assert!(term_in_months(101, TermUnit::Years).is_err());
    }
}
