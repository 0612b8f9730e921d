use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use loan_calc_core::amortization::{self, ExtraPayments, LoanRequest, TermUnit};
use loan_calc_core::RoundingMode;

use crate::input;

/// Arguments shared by `schedule` and `analyze`
#[derive(Args)]
#[command(allow_negative_numbers = true)]
pub struct ScheduleArgs {
    /// Path to JSON request file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Initial loan balance
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Nominal annual interest rate in percent (6.5 = 6.5%)
    #[arg(long, alias = "annual-rate")]
    pub rate: Option<Decimal>,

    /// Loan term, in --term-unit
    #[arg(long)]
    pub term: Option<u32>,

    /// Unit of --term
    #[arg(long, value_enum, default_value = "months")]
    pub term_unit: TermUnitArg,

    /// Extra principal payment as PAYMENT=AMOUNT (repeatable, or comma-separated)
    #[arg(long = "extra", value_delimiter = ',', value_parser = parse_extra_payment)]
    pub extra: Vec<(u32, Decimal)>,

    /// Rounding applied to every monetary amount
    #[arg(long, value_enum, default_value = "half-up")]
    pub rounding: RoundingArg,

    /// Date of the first installment (YYYY-MM-DD)
    #[arg(long)]
    pub first_payment_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TermUnitArg {
    Months,
    Years,
}

impl From<TermUnitArg> for TermUnit {
    fn from(arg: TermUnitArg) -> Self {
        match arg {
            TermUnitArg::Months => TermUnit::Months,
            TermUnitArg::Years => TermUnit::Years,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RoundingArg {
    HalfUp,
    HalfEven,
}

impl From<RoundingArg> for RoundingMode {
    fn from(arg: RoundingArg) -> Self {
        match arg {
            RoundingArg::HalfUp => RoundingMode::HalfUp,
            RoundingArg::HalfEven => RoundingMode::HalfEven,
        }
    }
}

/// Parse `12=500` into payment 12, amount 500.
fn parse_extra_payment(s: &str) -> Result<(u32, Decimal), String> {
    let (number, amount) = s
        .split_once('=')
        .ok_or_else(|| format!("expected PAYMENT=AMOUNT, got '{s}'"))?;
    let number: u32 = number
        .trim()
        .parse()
        .map_err(|_| format!("payment number must be a positive integer, got '{number}'"))?;
    let amount: Decimal = amount
        .trim()
        .parse()
        .map_err(|_| format!("invalid amount '{amount}'"))?;
    Ok((number, amount))
}

fn build_request(args: ScheduleArgs) -> Result<LoanRequest, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        debug!(path = %path, "reading loan request from file");
        return Ok(LoanRequest::from_json(&input::file::read_text(path)?)?);
    }
    if let Some(text) = input::stdin::read_stdin()? {
        debug!(bytes = text.len(), "reading loan request from stdin");
        return Ok(LoanRequest::from_json(&text)?);
    }

    let principal = args
        .principal
        .ok_or("--principal is required (or provide --input)")?;
    let rate = args.rate.ok_or("--rate is required (or provide --input)")?;
    let term = args.term.ok_or("--term is required (or provide --input)")?;
    let term_months = amortization::term_in_months(term, args.term_unit.into())?;

    let mut extra_payments = ExtraPayments::new();
    for (number, amount) in args.extra {
        // Repeated keys accumulate, like several edits to the same row
        *extra_payments.entry(number).or_insert(Decimal::ZERO) += amount;
    }

    let mut request = LoanRequest::new(principal, rate, term_months).with_extra_payments(extra_payments);
    request.rounding = args.rounding.into();
    request.first_payment_date = args.first_payment_date;
    Ok(request)
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = build_request(args)?;
    let result = amortization::compute_schedule(&request)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_analyze(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = build_request(args)?;
    let result = amortization::analyze_loan(&request)?;
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_extra_payment() {
        assert_eq!(parse_extra_payment("12=500").unwrap(), (12, dec!(500)));
        assert_eq!(parse_extra_payment(" 3 = 25.50 ").unwrap(), (3, dec!(25.50)));
        assert!(parse_extra_payment("12").is_err());
        assert!(parse_extra_payment("1.5=10").is_err());
        assert!(parse_extra_payment("-1=10").is_err());
        assert!(parse_extra_payment("4=abc").is_err());
    }
}
