pub mod compute;
pub mod config;
pub mod inspect;
pub mod squ;

use adq_core::config::builtin::default_config;
use adq_core::config::load_config;
use adq_core::config::schema::ReconcileConfig;
use adq_core::error::AdqError;
use adq_core::extraction::csv_tables::CsvTables;
use std::path::Path;

use crate::TableArgs;

/// The configuration at `path`, or the built-in one.
pub fn resolve_config(path: Option<&Path>) -> Result<ReconcileConfig, AdqError> {
    match path {
        Some(path) => load_config(path),
        None => default_config(),
    }
}

pub fn csv_source(args: &TableArgs) -> CsvTables {
    CsvTables::new(&args.products, &args.adqs, &args.squs)
}
