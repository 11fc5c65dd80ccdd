use std::path::Path;

use calamine::{Data, Range, Reader};
use tracing::debug;

use crate::config::schema::ReconcileConfig;
use crate::error::AdqError;
use crate::extraction::RawSquRow;

const BNF_CODE: &str = "BNF Code";
const STANDARD_QUANTITY_UNIT: &str = "Standard Quantity Unit";
const PREPARATION_CLASS: &str = "Preparation Class";

/// The header row sits below a title row in published files.
const HEADER_SEARCH_ROWS: usize = 5;

/// Read the (drug code, SQU code) observations from a Prescription Cost
/// Analysis spreadsheet (xls, xlsx or ods).
///
/// Only the first worksheet is read. Rows whose preparation class is
/// listed in `excluded_preparation_classes` (appliances) are skipped.
pub fn read_pca_squs(path: &Path, config: &ReconcileConfig) -> Result<Vec<RawSquRow>, AdqError> {
    let mut workbook = calamine::open_workbook_auto(path).map_err(|e| AdqError::Spreadsheet {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let sheet = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AdqError::Spreadsheet {
            path: path.to_path_buf(),
            reason: "workbook has no worksheets".into(),
        })?
        .map_err(|e| AdqError::Spreadsheet {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let rows = parse_pca_sheet(&sheet, path, config)?;
    debug!("read {} SQU observations from {}", rows.len(), path.display());
    Ok(rows)
}

/// Extract SQU observations from an already opened PCA worksheet.
pub fn parse_pca_sheet(
    sheet: &Range<Data>,
    path: &Path,
    config: &ReconcileConfig,
) -> Result<Vec<RawSquRow>, AdqError> {
    let (header_idx, header) = sheet
        .rows()
        .enumerate()
        .take(HEADER_SEARCH_ROWS)
        .find(|(_, row)| column_index(row, BNF_CODE).is_some())
        .ok_or_else(|| missing_column(path, BNF_CODE))?;

    let code_col = column_index(header, BNF_CODE).ok_or_else(|| missing_column(path, BNF_CODE))?;
    let squ_col = column_index(header, STANDARD_QUANTITY_UNIT)
        .ok_or_else(|| missing_column(path, STANDARD_QUANTITY_UNIT))?;
    let class_col = column_index(header, PREPARATION_CLASS)
        .ok_or_else(|| missing_column(path, PREPARATION_CLASS))?;

    let mut rows = Vec::new();
    for row in sheet.rows().skip(header_idx + 1) {
        let drug_code = match row.get(code_col).and_then(cell_as_string) {
            Some(code) => code,
            None => continue,
        };

        let excluded = row
            .get(class_col)
            .and_then(cell_as_i64)
            .is_some_and(|class| config.excluded_preparation_classes.contains(&class));
        if excluded {
            continue;
        }

        rows.push(RawSquRow {
            drug_code,
            squ: row.get(squ_col).and_then(cell_as_string),
        });
    }

    Ok(rows)
}

fn missing_column(path: &Path, column: &str) -> AdqError {
    AdqError::MissingColumn {
        path: path.to_path_buf(),
        column: column.to_string(),
    }
}

fn column_index(row: &[Data], name: &str) -> Option<usize> {
    row.iter().position(|cell| {
        cell_as_string(cell).is_some_and(|s| s.eq_ignore_ascii_case(name))
    })
}

fn cell_as_string(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        // SQU codes are stored as numbers; 1.0 must read as "1"
        Data::Float(f) if f.fract() == 0.0 => Some(format!("{}", *f as i64)),
        Data::Float(f) => Some(f.to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Empty => None,
        _ => Some(format!("{cell}")),
    }
}

fn cell_as_i64(cell: &Data) -> Option<i64> {
    match cell {
        Data::Int(i) => Some(*i),
        Data::Float(f) if f.fract() == 0.0 => Some(*f as i64),
        Data::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
