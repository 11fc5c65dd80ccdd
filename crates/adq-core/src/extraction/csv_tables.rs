use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::AdqError;
use crate::extraction::{RawAdqRow, RawProductRow, RawSquRow, TableSource};

/// Table backend reading the three inputs from CSV files with header rows.
pub struct CsvTables {
    pub products: PathBuf,
    pub adqs: PathBuf,
    pub squs: PathBuf,
}

impl CsvTables {
    pub fn new(
        products: impl Into<PathBuf>,
        adqs: impl Into<PathBuf>,
        squs: impl Into<PathBuf>,
    ) -> Self {
        CsvTables {
            products: products.into(),
            adqs: adqs.into(),
            squs: squs.into(),
        }
    }
}

impl TableSource for CsvTables {
    fn products(&self) -> Result<Vec<RawProductRow>, AdqError> {
        read_csv_file(&self.products)
    }

    fn adqs(&self) -> Result<Vec<RawAdqRow>, AdqError> {
        read_csv_file(&self.adqs)
    }

    fn squs(&self) -> Result<Vec<RawSquRow>, AdqError> {
        read_csv_file(&self.squs)
    }

    fn source_name(&self) -> &str {
        "csv"
    }
}

/// Read every row of a CSV file into `T`, keyed by the header row.
pub fn read_csv_file<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, AdqError> {
    let file = File::open(path).map_err(|e| AdqError::TableLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let rows = read_csv(file).map_err(|e| AdqError::TableLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    debug!("read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Read every row of CSV data into `T`, keyed by the header row.
pub fn read_csv<T: DeserializeOwned, R: Read>(reader: R) -> Result<Vec<T>, AdqError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let rows = reader.deserialize().collect::<Result<Vec<T>, _>>()?;
    Ok(rows)
}

/// Serialize rows as CSV with a header row.
pub fn write_csv<T: Serialize, W: Write>(writer: W, rows: &[T]) -> Result<(), AdqError> {
    let mut writer = csv::Writer::from_writer(writer);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Serialize rows to a CSV file, replacing any existing file.
pub fn write_csv_file<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), AdqError> {
    let file = File::create(path)?;
    write_csv(file, rows)?;
    debug!("wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}
