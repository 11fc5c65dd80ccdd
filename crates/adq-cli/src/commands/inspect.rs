use adq_core::error::AdqError;

use crate::commands::{csv_source, resolve_config};
use crate::output;
use crate::TableArgs;

pub fn run(drug_code: &str, tables: &TableArgs, output_format: &str) -> Result<(), AdqError> {
    let config = resolve_config(tables.config.as_deref())?;
    let source = csv_source(tables);
    let parsed = adq_core::load_tables(&source, &config)?;
    let rows = adq_core::inspect_drug(&parsed, &config, drug_code.trim());

    if rows.is_empty() {
        eprintln!(
            "Drug code {} is not present in all three tables.",
            drug_code.trim()
        );
        return Ok(());
    }

    match output_format {
        "json" => output::json::print(&rows)?,
        _ => output::table::print_inspection(&rows),
    }
    Ok(())
}
