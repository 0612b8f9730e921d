use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::LoanCalcError;
use crate::types::{Money, Rate};
use crate::LoanCalcResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT: Decimal = dec!(100);

/// Monthly periodic rate from a nominal annual percentage (6.5 -> 0.0054166...).
pub fn periodic_rate(annual_rate_pct: Rate) -> Rate {
    annual_rate_pct / PERCENT / MONTHS_PER_YEAR
}

/// Level payment that fully amortises `principal` over `nper` periods.
///
/// Unrounded; callers round to cents. A zero rate divides principal evenly.
pub fn level_payment(principal: Money, rate: Rate, nper: u32) -> LoanCalcResult<Money> {
    if nper == 0 {
        return Err(LoanCalcError::invalid(
            "nper",
            "Number of periods must be > 0",
        ));
    }

    if rate.is_zero() {
        return Ok(principal / Decimal::from(nper));
    }

    // (1 + r)^n can leave the 96-bit range for long terms at high rates;
    // the discount factor is then indistinguishable from zero.
    let discount = match (Decimal::ONE + rate).checked_powi(i64::from(nper)) {
        Some(factor) if !factor.is_zero() => Decimal::ONE / factor,
        _ => Decimal::ZERO,
    };

    let annuity_factor = Decimal::ONE - discount;
    if annuity_factor.is_zero() {
        return Err(LoanCalcError::invalid(
            "rate",
            "Annuity factor collapsed to zero",
        ));
    }

    Ok(principal * rate / annuity_factor)
}
