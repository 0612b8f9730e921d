//! Month-by-month amortization of a fixed-rate loan.
//!
//! Every monetary field is rounded to cents when it is computed, and the
//! summary totals are sums of those rounded values. As a result
//! `total_paid == principal + total_interest` holds exactly.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::request::LoanRequest;
use crate::time_value::{level_payment, periodic_rate};
use crate::types::{Money, Rate, RoundingMode};
use crate::LoanCalcResult;

const CENT: Money = dec!(0.01);

/// Interest rounding drifts the balance by at most half a cent a period, so
/// a payment two cents above the rounded level payment always settles in time.
const MAX_PAYMENT_RAISES: usize = 2;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One installment of the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Installment number, contiguous from 1
    pub payment_number: u32,
    /// Cash paid this period: interest plus principal (including any extra)
    pub payment_amount: Money,
    /// Portion that reduces the balance
    pub principal_payment: Money,
    /// Interest on the balance outstanding at the start of the period
    pub interest_payment: Money,
    /// Balance after this payment
    pub remaining_balance: Money,
    /// Part of `principal_payment` funded by the extra-payment map
    #[serde(default)]
    pub extra_payment: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<NaiveDate>,
}

/// Schedule plus summary totals for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResult {
    /// Nominal level payment from the original terms, unaffected by extras
    pub monthly_payment: Money,
    pub schedule: Vec<PaymentRecord>,
    pub total_interest: Money,
    pub total_paid: Money,
    /// Extra-payment keys never reached because the loan paid off first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unapplied_extra_payments: Vec<u32>,
}

impl ScheduleResult {
    /// Number of installments until the balance reaches zero.
    pub fn payoff_payments(&self) -> u32 {
        self.schedule.len() as u32
    }

    /// Sum of the extra principal actually applied.
    pub fn total_extra_applied(&self) -> Money {
        self.schedule.iter().map(|r| r.extra_payment).sum()
    }

    /// Sum of all principal repaid.
    pub fn total_principal(&self) -> Money {
        self.schedule.iter().map(|r| r.principal_payment).sum()
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Compute the amortization schedule for `request`.
///
/// Without extra payments the schedule runs at most `term_months` periods and
/// its last installment is never larger than `monthly_payment`. Extra payments
/// can only shorten it.
pub fn compute_schedule(request: &LoanRequest) -> LoanCalcResult<ScheduleResult> {
    request.validate()?;

    let rounding = request.rounding;
    let principal = rounding.round(request.principal);
    let monthly_rate = periodic_rate(request.annual_rate);
    let monthly_payment = nominal_payment(principal, monthly_rate, request.term_months, rounding)?;

    let mut schedule = Vec::with_capacity(request.term_months as usize);
    let mut balance = principal;
    let mut total_interest = Decimal::ZERO;
    let mut total_paid = Decimal::ZERO;

    // The range is the hard upper bound on the schedule length.
    for payment_number in 1..=request.term_months {
        let interest_payment = rounding.round(balance * monthly_rate);
        let extra = request
            .extra_payments
            .get(&payment_number)
            .map(|amount| rounding.round(*amount))
            .unwrap_or(Decimal::ZERO);

        let scheduled_principal =
            rounding.round((monthly_payment - interest_payment).max(Decimal::ZERO));
        let tentative = scheduled_principal + extra;

        let principal_payment = if tentative >= balance || payment_number == request.term_months {
            // Final payment: retire exactly what is left, never more.
            balance
        } else {
            tentative
        };
        let extra_payment = rounding.round(
            (principal_payment - scheduled_principal)
                .max(Decimal::ZERO)
                .min(extra),
        );

        balance -= principal_payment;
        let payment_amount = interest_payment + principal_payment;

        total_interest += interest_payment;
        total_paid += payment_amount;

        schedule.push(PaymentRecord {
            payment_number,
            payment_amount,
            principal_payment,
            interest_payment,
            remaining_balance: balance,
            extra_payment,
            payment_date: request
                .first_payment_date
                .and_then(|first| installment_date(first, payment_number)),
        });

        if balance.is_zero() {
            break;
        }
    }

    let last_payment = schedule.len() as u32;
    let unapplied_extra_payments: Vec<u32> = request
        .extra_payments
        .iter()
        .filter(|&(&n, &amount)| n > last_payment && amount > Decimal::ZERO)
        .map(|(&n, _)| n)
        .collect();

    tracing::debug!(
        term_months = request.term_months,
        payoff_payments = last_payment,
        monthly_payment = %monthly_payment,
        total_interest = %total_interest,
        "amortization schedule computed"
    );

    Ok(ScheduleResult {
        monthly_payment,
        schedule,
        total_interest,
        total_paid,
        unapplied_extra_payments,
    })
}

/// Level payment in cents, raised a cent at a time until the level schedule
/// retires the loan within the term without a balloon installment.
fn nominal_payment(
    principal: Money,
    monthly_rate: Rate,
    term_months: u32,
    rounding: RoundingMode,
) -> LoanCalcResult<Money> {
    let mut payment = rounding.round(level_payment(principal, monthly_rate, term_months)?);
    for _ in 0..MAX_PAYMENT_RAISES {
        if settles_within_term(principal, monthly_rate, term_months, payment, rounding) {
            break;
        }
        payment += CENT;
    }
    Ok(payment)
}

/// True when paying `payment` every period, with no extras, reaches a period
/// whose scheduled principal covers the whole balance by `term_months`.
fn settles_within_term(
    principal: Money,
    monthly_rate: Rate,
    term_months: u32,
    payment: Money,
    rounding: RoundingMode,
) -> bool {
    let mut balance = principal;
    for _ in 0..term_months {
        let scheduled_principal = payment - rounding.round(balance * monthly_rate);
        if scheduled_principal >= balance {
            return true;
        }
        if scheduled_principal <= Decimal::ZERO {
            // Interest swallows the payment; the balance never moves again
            return false;
        }
        balance -= scheduled_principal;
    }
    false
}

/// Calendar date of installment `payment_number`, one month apart, clamped to month end.
fn installment_date(first: NaiveDate, payment_number: u32) -> Option<NaiveDate> {
    first.checked_add_months(Months::new(payment_number - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::request::ExtraPayments;
    use crate::types::RoundingMode;
    use rust_decimal_macros::dec;

    fn small_loan() -> LoanRequest {
        LoanRequest::new(dec!(1000), dec!(12), 3)
    }

    #[test]
    fn test_three_month_schedule_exact_figures() {
        let result = compute_schedule(&small_loan()).unwrap();

        // r = 1%: payment = 1000 * 0.01 / (1 - 1.01^-3) = 340.0221...
        // 340.02 would leave a 340.03 final installment, so it is raised a cent.
        assert_eq!(result.monthly_payment, dec!(340.03));
        assert_eq!(result.schedule.len(), 3);

        let p1 = &result.schedule[0];
        assert_eq!(p1.interest_payment, dec!(10.00));
        assert_eq!(p1.principal_payment, dec!(330.03));
        assert_eq!(p1.remaining_balance, dec!(669.97));

        let p2 = &result.schedule[1];
        assert_eq!(p2.interest_payment, dec!(6.70));
        assert_eq!(p2.principal_payment, dec!(333.33));
        assert_eq!(p2.remaining_balance, dec!(336.64));

        // Final installment is clamped to the balance and comes in under the nominal payment
        let p3 = &result.schedule[2];
        assert_eq!(p3.interest_payment, dec!(3.37));
        assert_eq!(p3.principal_payment, dec!(336.64));
        assert_eq!(p3.payment_amount, dec!(340.01));
        assert_eq!(p3.remaining_balance, Decimal::ZERO);

        assert_eq!(result.total_interest, dec!(20.07));
        assert_eq!(result.total_paid, dec!(1020.07));
    }

    #[test]
    fn test_final_payment_clamped_by_extra() {
        let req = small_loan().with_extra_payments(ExtraPayments::from([(2, dec!(5000))]));
        let result = compute_schedule(&req).unwrap();

        assert_eq!(result.schedule.len(), 2);
        let last = &result.schedule[1];
        assert_eq!(last.principal_payment, dec!(669.97));
        assert_eq!(last.payment_amount, dec!(676.67));
        assert_eq!(last.remaining_balance, Decimal::ZERO);
        // Only the part beyond the scheduled principal counts as extra
        assert_eq!(last.extra_payment, dec!(669.97) - dec!(333.33));
    }

    #[test]
    fn test_extra_payment_recorded_on_its_period() {
        let req = small_loan().with_extra_payments(ExtraPayments::from([(1, dec!(100))]));
        let result = compute_schedule(&req).unwrap();

        let p1 = &result.schedule[0];
        assert_eq!(p1.extra_payment, dec!(100.00));
        assert_eq!(p1.principal_payment, dec!(430.03));
        assert_eq!(p1.payment_amount, dec!(440.03));
        assert_eq!(result.schedule[1].extra_payment, Decimal::ZERO);
        // monthly_payment is untouched by the extra payment
        assert_eq!(result.monthly_payment, dec!(340.03));
    }

    #[test]
    fn test_unapplied_keys_after_payoff() {
        let req = small_loan().with_extra_payments(ExtraPayments::from([
            (1, dec!(2000)),
            (2, dec!(50)),
            (7, dec!(10)),
        ]));
        let result = compute_schedule(&req).unwrap();
        assert_eq!(result.schedule.len(), 1);
        assert_eq!(result.unapplied_extra_payments, vec![2, 7]);
    }

    #[test]
    fn test_zero_amount_keys_are_not_reported() {
        let req = small_loan().with_extra_payments(ExtraPayments::from([(9, Decimal::ZERO)]));
        let result = compute_schedule(&req).unwrap();
        assert!(result.unapplied_extra_payments.is_empty());
        assert_eq!(result.schedule.len(), 3);
    }

    #[test]
    fn test_payment_dates_step_monthly() {
        let mut req = LoanRequest::new(dec!(1200), dec!(0), 3);
        req.first_payment_date = NaiveDate::from_ymd_opt(2025, 1, 31);
        let result = compute_schedule(&req).unwrap();
        let dates: Vec<_> = result.schedule.iter().map(|r| r.payment_date).collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2025, 1, 31),
                NaiveDate::from_ymd_opt(2025, 2, 28),
                NaiveDate::from_ymd_opt(2025, 3, 31),
            ]
        );
    }

    #[test]
    fn test_principal_rounded_to_cents() {
        let req = LoanRequest::new(dec!(1000.004), dec!(0), 2);
        let result = compute_schedule(&req).unwrap();
        assert_eq!(result.total_principal(), dec!(1000.00));
    }

    #[test]
    fn test_zero_rate_uneven_split() {
        let req = LoanRequest::new(dec!(1000), dec!(0), 3);
        let result = compute_schedule(&req).unwrap();
        // 333.33 x 3 would leave a cent for the last period to absorb
        assert_eq!(result.monthly_payment, dec!(333.34));
        assert_eq!(result.schedule[2].principal_payment, dec!(333.32));
        assert_eq!(result.total_paid, dec!(1000));
    }

    #[test]
    fn test_half_even_changes_midpoint_interest() {
        // First-period interest lands exactly on a half cent: 105 * 0.005 = 0.525
        let mut req = LoanRequest::new(dec!(105), dec!(6), 12);
        let up = compute_schedule(&req).unwrap();
        req.rounding = RoundingMode::HalfEven;
        let even = compute_schedule(&req).unwrap();
        assert_eq!(up.schedule[0].interest_payment, dec!(0.53));
        assert_eq!(even.schedule[0].interest_payment, dec!(0.52));
    }

    #[test]
    fn test_payment_raised_when_interest_swallows_it() {
        // 2.5% a month on 1000: the level payment rounds to 25.00, the first interest
        let result = compute_schedule(&LoanRequest::new(dec!(1000), dec!(30), 480)).unwrap();
        assert_eq!(result.monthly_payment, dec!(25.01));

        let p1 = &result.schedule[0];
        assert_eq!(p1.interest_payment, dec!(25.00));
        assert_eq!(p1.principal_payment, dec!(0.01));
        assert_eq!(p1.remaining_balance, dec!(999.99));

        assert_eq!(result.schedule.len(), 321);
        let last = result.schedule.last().unwrap();
        assert!(last.payment_amount <= result.monthly_payment);
        assert_eq!(last.remaining_balance, Decimal::ZERO);
    }

    #[test]
    fn test_sub_cent_level_payment_raised_to_a_cent() {
        let result = compute_schedule(&LoanRequest::new(dec!(0.05), dec!(0), 12)).unwrap();
        assert_eq!(result.monthly_payment, dec!(0.01));
        assert_eq!(result.schedule.len(), 5);
        assert!(result.schedule.iter().all(|r| r.payment_amount == dec!(0.01)));
    }

    #[test]
    fn test_zero_amounts_keep_cent_scale() {
        let req = small_loan().with_extra_payments(ExtraPayments::from([(1, dec!(100))]));
        let result = compute_schedule(&req).unwrap();
        let json = serde_json::to_value(&result.schedule[1]).unwrap();
        assert_eq!(json["extra_payment"], "0.00");

        let zero_rate = compute_schedule(&LoanRequest::new(dec!(1200), dec!(0), 3)).unwrap();
        let json = serde_json::to_value(&zero_rate.schedule[0]).unwrap();
        assert_eq!(json["interest_payment"], "0.00");
        assert_eq!(json["principal_payment"], "400.00");
    }

    #[test]
    fn test_settles_within_term() {
        let rate = periodic_rate(dec!(12));
        let half_up = RoundingMode::HalfUp;
        assert!(!settles_within_term(dec!(1000), rate, 3, dec!(340.02), half_up));
        assert!(settles_within_term(dec!(1000), rate, 3, dec!(340.03), half_up));
        // Payment equal to the interest never moves the balance
        assert!(!settles_within_term(dec!(1000), rate, 3, dec!(10.00), half_up));
    }

    #[test]
    fn test_invalid_request_produces_no_schedule() {
        let req = LoanRequest::new(dec!(-100), dec!(5), 12);
        assert!(compute_schedule(&req).is_err());
    }
}
