use crate::error::CliError;
use adapter_runtime::{RowChange, RowView, metrics::FetchMetricsSnapshot};
use std::fmt::Display;
use tracing::warn;

pub fn print_screen<H: Display>(step: usize, top: usize, rows: &[RowView<H>]) {
    println!("--- screen {step} (rows from {top}) ---");
    for row in rows {
        println!("{}", row.handle());
    }
}

/// Prints one structural change as a JSON line.
pub fn print_change(change: &RowChange) {
    match serde_json::to_string(change) {
        Ok(json) => println!("change {json}"),
        Err(err) => warn!(error = %err, "Failed to serialize row change"),
    }
}

pub fn print_metrics(snapshot: &FetchMetricsSnapshot) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(snapshot)?;
    println!("{json}");
    Ok(())
}
