use adq_core::error::AdqError;
use adq_core::extraction::csv_tables::write_csv_file;
use adq_core::extraction::pca_xlsx::read_pca_squs;
use adq_core::parsing::parse_squs;
use std::path::{Path, PathBuf};

use crate::commands::resolve_config;

pub fn run(files: &[PathBuf], out: &Path, config: Option<PathBuf>) -> Result<(), AdqError> {
    let config = resolve_config(config.as_deref())?;

    let mut observations = Vec::new();
    for file in files {
        observations.extend(read_pca_squs(file, &config)?);
    }
    let total = observations.len();

    // Codes are written as unit labels ("ml", "g", ...), one row per drug code.
    let records = parse_squs(observations, &config)?;
    write_csv_file(out, &records)?;

    eprintln!(
        "Wrote {} drug codes ({} observations in {} file(s)) to {}",
        records.len(),
        total,
        files.len(),
        out.display()
    );
    Ok(())
}
