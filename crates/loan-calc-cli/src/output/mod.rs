pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Pretty-print JSON to stdout.
fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}

/// Locate the schedule result in either a bare result or an analysis envelope.
pub(crate) fn find_schedule(value: &Value) -> Option<&serde_json::Map<String, Value>> {
    let map = value.as_object()?;
    if matches!(map.get("schedule"), Some(Value::Array(_))) {
        return Some(map);
    }
    map.get("result")
        .and_then(|r| r.get("schedule"))
        .and_then(|s| s.as_object())
        .filter(|s| matches!(s.get("schedule"), Some(Value::Array(_))))
}
