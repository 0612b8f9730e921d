//! Extra-payment impact: the requested schedule measured against the same
//! loan without any extra payments.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::request::LoanRequest;
use super::schedule::{compute_schedule, ScheduleResult};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::LoanCalcResult;

/// Savings produced by the extra payments of a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraPaymentImpact {
    /// Periods that received a non-zero extra amount
    pub extra_payment_count: u32,
    pub total_extra_applied: Money,
    /// Installments of the schedule without extra payments
    pub baseline_payments: u32,
    pub payments_saved: u32,
    pub baseline_total_interest: Money,
    pub interest_saved: Money,
}

/// Schedule plus its extra-payment impact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanAnalysis {
    pub schedule: ScheduleResult,
    pub payoff_payments: u32,
    pub extra_payments: ExtraPaymentImpact,
}

/// Compute the schedule for `request` and compare it with its baseline.
pub fn analyze_loan(request: &LoanRequest) -> LoanCalcResult<ComputationOutput<LoanAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let result = compute_schedule(request)?;

    let baseline = if request.has_extra_payments() {
        compute_schedule(&request.without_extra_payments())?
    } else {
        result.clone()
    };

    let extra_payment_count = result
        .schedule
        .iter()
        .filter(|r| r.extra_payment > Decimal::ZERO)
        .count() as u32;

    let impact = ExtraPaymentImpact {
        extra_payment_count,
        total_extra_applied: result.total_extra_applied(),
        baseline_payments: baseline.payoff_payments(),
        payments_saved: baseline
            .payoff_payments()
            .saturating_sub(result.payoff_payments()),
        baseline_total_interest: baseline.total_interest,
        interest_saved: baseline.total_interest - result.total_interest,
    };

    for n in &result.unapplied_extra_payments {
        warnings.push(format!(
            "Extra payment for payment {n} not applied: loan is paid off after payment {}",
            result.payoff_payments()
        ));
    }

    let payoff_payments = result.payoff_payments();
    let output = LoanAnalysis {
        schedule: result,
        payoff_payments,
        extra_payments: impact,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-rate amortization with extra principal payments",
        &serde_json::json!({
            "principal": request.principal.to_string(),
            "annual_rate_pct": request.annual_rate.to_string(),
            "term_months": request.term_months,
            "compounding": "monthly",
            "rounding": request.rounding,
        }),
        warnings,
        elapsed,
        output,
    ))
}
