use std::fs;

use clap::Args;
use tracing::info;

use loan_calc_core::export::ExportRequest;

use crate::input;

/// Arguments for CSV export of a computed schedule
#[derive(Args)]
pub struct ExportArgs {
    /// Path to JSON file holding `{ "schedule": [...] }` (or a full `schedule` result)
    #[arg(long)]
    pub input: Option<String>,

    /// Write the CSV to this file instead of stdout
    #[arg(long, short = 'o')]
    pub out_file: Option<String>,
}

/// Produce CSV text; returns `None` when it was written to `--out-file`.
pub fn run_export(args: ExportArgs) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let text = if let Some(ref path) = args.input {
        input::file::read_text(path)?
    } else if let Some(text) = input::stdin::read_stdin()? {
        text
    } else {
        return Err("--input <schedule.json> or stdin required for export".into());
    };

    let csv = ExportRequest::from_json(&text)?.to_csv()?;

    match args.out_file {
        Some(path) => {
            fs::write(&path, &csv).map_err(|e| format!("Failed to write '{}': {}", path, e))?;
            info!(path = %path, bytes = csv.len(), "schedule csv written");
            Ok(None)
        }
        None => Ok(Some(csv)),
    }
}
