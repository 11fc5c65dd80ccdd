use adq_core::error::AdqError;
use adq_core::extraction::csv_tables::write_csv_file;
use std::path::PathBuf;
use tracing::info;

use crate::commands::{csv_source, resolve_config};
use crate::output;
use crate::TableArgs;

pub fn run(tables: &TableArgs, out: Option<PathBuf>, output_format: &str) -> Result<(), AdqError> {
    let config = resolve_config(tables.config.as_deref())?;
    let source = csv_source(tables);
    let result = adq_core::compute_adqs(&source, &config)?;

    if let Some(ref path) = out {
        write_csv_file(path, &result.rows)?;
        info!("wrote {} rows to {}", result.rows.len(), path.display());
    }

    match output_format {
        "json" => output::json::print(&result)?,
        "csv" => output::csv::print(&result.rows)?,
        _ => output::table::print(&result),
    }

    output::table::print_summary(&result.summary);
    Ok(())
}
