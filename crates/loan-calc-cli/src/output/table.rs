use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::find_schedule;

const SCHEDULE_COLUMNS: [(&str, &str); 6] = [
    ("#", "payment_number"),
    ("Payment", "payment_amount"),
    ("Principal", "principal_payment"),
    ("Interest", "interest_payment"),
    ("Extra", "extra_payment"),
    ("Balance", "remaining_balance"),
];

/// Format output as tables using the tabled crate.
///
/// Summary fields first, then the payment schedule one row per installment.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_summary(map);
            }
            if let Some(schedule) = find_schedule(value) {
                if let Some(Value::Array(rows)) = schedule.get("schedule") {
                    print_schedule(rows);
                }
            }
        }
        _ => {
            println!("{}", value);
        }
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    if let Value::Object(res_map) = result {
        print_summary(res_map);
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

/// Field/value table; nested objects are flattened as `parent.child`.
fn print_summary(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    push_fields(&mut builder, "", map);
    println!("{}", Table::from(builder));
}

fn push_fields(builder: &mut Builder, prefix: &str, map: &Map<String, Value>) {
    for (key, val) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            // The schedule itself gets its own table
            Value::Array(_) if key == "schedule" => {}
            Value::Object(inner) => push_fields(builder, &name, inner),
            _ => builder.push_record([name, format_value(val)]),
        }
    }
}

fn print_schedule(rows: &[Value]) {
    if rows.is_empty() {
        println!("(empty)");
        return;
    }

    let dated = rows.iter().any(|r| r.get("payment_date").is_some());

    let mut builder = Builder::default();
    let mut header: Vec<String> = SCHEDULE_COLUMNS.iter().map(|(h, _)| h.to_string()).collect();
    if dated {
        header.insert(1, "Date".to_string());
    }
    builder.push_record(header);

    for row in rows {
        let mut record: Vec<String> = SCHEDULE_COLUMNS
            .iter()
            .map(|(_, key)| row.get(*key).map(format_value).unwrap_or_default())
            .collect();
        if dated {
            record.insert(
                1,
                row.get("payment_date").map(format_value).unwrap_or_default(),
            );
        }
        builder.push_record(record);
    }

    println!();
    println!("{}", Table::from(builder));
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
