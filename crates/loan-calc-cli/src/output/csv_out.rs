use serde_json::Value;
use std::io;

use loan_calc_core::export::ExportRequest;

use super::find_schedule;

/// Write output as CSV to stdout.
///
/// Schedules go through the core exporter so the file matches `loancalc export`;
/// anything else becomes a two-column field/value listing.
pub fn print_csv(value: &Value) {
    if let Some(result) = find_schedule(value) {
        let exported = serde_json::from_value::<ExportRequest>(Value::Object(result.clone()))
            .map_err(|e| e.to_string())
            .and_then(|req| req.to_csv().map_err(|e| e.to_string()));
        match exported {
            Ok(csv) => print!("{}", csv),
            Err(e) => eprintln!("CSV export error: {}", e),
        }
        return;
    }

    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            let fields = map
                .get("result")
                .and_then(|r| r.as_object())
                .unwrap_or(map);
            let _ = wtr.write_record(["field", "value"]);
            for (key, val) in fields {
                let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
            }
        }
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
