//! CSV export of a payment schedule.
//!
//! Locale independent: `,` separator, `.` decimal point, `\n` after every
//! line including the last, two fraction digits on every monetary field.

use crate::amortization::PaymentRecord;
use crate::error::LoanCalcError;
use crate::types::{Money, RoundingMode};
use crate::LoanCalcResult;

/// Column titles, in output order.
pub const CSV_HEADER: [&str; 5] = [
    "Payment Number",
    "Payment Amount",
    "Principal",
    "Interest",
    "Remaining Balance",
];

/// Render `schedule` as CSV text: one header line, then one line per record.
pub fn to_csv(schedule: &[PaymentRecord]) -> LoanCalcResult<String> {
    if schedule.is_empty() {
        return Err(LoanCalcError::invalid("schedule", "nothing to export"));
    }

    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b',')
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::with_capacity(64 * (schedule.len() + 1)));

    wtr.write_record(CSV_HEADER)?;
    for record in schedule {
        wtr.write_record([
            record.payment_number.to_string(),
            format_amount(record.payment_amount),
            format_amount(record.principal_payment),
            format_amount(record.interest_payment),
            format_amount(record.remaining_balance),
        ])?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| LoanCalcError::SerializationError(e.to_string()))?;
    let text =
        String::from_utf8(bytes).map_err(|e| LoanCalcError::SerializationError(e.to_string()))?;

    tracing::debug!(rows = schedule.len(), bytes = text.len(), "schedule exported to csv");
    Ok(text)
}

/// Plain decimal with exactly two fraction digits, no symbols or separators.
fn format_amount(value: Money) -> String {
    let cents = RoundingMode::default().round(value);
    if cents.is_zero() {
        // never "-0.00"
        return "0.00".to_string();
    }
    cents.to_string()
}
