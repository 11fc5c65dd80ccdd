pub mod names;
pub mod normalize;
pub mod values;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::schema::ReconcileConfig;
use crate::error::AdqError;
use crate::extraction::{RawAdqRow, RawProductRow, RawSquRow};
use crate::model::{AdqRecord, ProductRecord, SquRecord, Unit};
use names::extract_dose_multiplier;
use normalize::normalize_quantity;
use values::{parse_count, parse_number};

/// The three input tables after unit normalization.
#[derive(Debug, Clone, Default)]
pub struct ParsedTables {
    pub products: Vec<ProductRecord>,
    pub adqs: Vec<AdqRecord>,
    pub squs: Vec<SquRecord>,
    pub stats: ParseStats,
}

/// Row counts observed while parsing the input tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    pub product_rows: usize,
    pub adq_rows: usize,
    /// ADQ rows dropped because no ADQ value was published. Rows dropped for
    /// a malformed value are only counted in `malformed_numerics`.
    pub adq_rows_without_value: usize,
    pub squ_observations: usize,
    /// Numeric cells that were present but not numbers. The cell is treated
    /// as missing.
    pub malformed_numerics: usize,
}

/// Normalize the raw input tables.
pub fn parse_tables(
    products: Vec<RawProductRow>,
    adqs: Vec<RawAdqRow>,
    squs: Vec<RawSquRow>,
    config: &ReconcileConfig,
) -> Result<ParsedTables, AdqError> {
    let mut stats = ParseStats {
        product_rows: products.len(),
        adq_rows: adqs.len(),
        squ_observations: squs.len(),
        ..Default::default()
    };

    let products: Vec<ProductRecord> = products
        .into_iter()
        .filter(|row| has_drug_code(&row.drug_code, "product"))
        .map(|row| parse_product(row, &mut stats.malformed_numerics))
        .collect();

    let mut parsed_adqs = Vec::with_capacity(adqs.len());
    for row in adqs {
        if !has_drug_code(&row.drug_code, "ADQ") {
            continue;
        }
        let malformed_before = stats.malformed_numerics;
        match parse_adq(row, &mut stats.malformed_numerics) {
            Some(adq) => parsed_adqs.push(adq),
            None if stats.malformed_numerics == malformed_before => {
                stats.adq_rows_without_value += 1
            }
            None => {}
        }
    }

    let squs = parse_squs(squs, config)?;

    debug!(
        "parsed {} products, {} ADQs ({} without value), {} SQUs",
        products.len(),
        parsed_adqs.len(),
        stats.adq_rows_without_value,
        squs.len()
    );

    Ok(ParsedTables {
        products,
        adqs: parsed_adqs,
        squs,
        stats,
    })
}

/// Convert a product row, normalizing the strength numerator and
/// denominator onto canonical units.
pub fn parse_product(row: RawProductRow, malformed: &mut usize) -> ProductRecord {
    let code = row.drug_code.trim().to_string();
    let malformed_before = *malformed;

    let numerator = numeric_field(&code, "numerator", row.numerator.as_deref(), malformed);
    let (numerator, numerator_unit_of_measure) =
        normalize_quantity(numerator, row.numerator_unit_of_measure.as_deref().unwrap_or(""));

    let denominator = numeric_field(&code, "denominator", row.denominator.as_deref(), malformed);
    let (denominator, denominator_unit_of_measure) = normalize_quantity(
        denominator,
        row.denominator_unit_of_measure.as_deref().unwrap_or(""),
    );

    let form_size = numeric_field(&code, "form_size", row.form_size.as_deref(), malformed);

    let ingredient_count = match row.ingredient_count.as_deref().map(parse_count).transpose() {
        Ok(count) => count.flatten(),
        Err(e) => {
            warn!("product {}: ingredient_count: {}", code, e);
            *malformed += 1;
            None
        }
    };

    ProductRecord {
        drug_code: code,
        name: row.name.unwrap_or_default(),
        vpid: row.vpid,
        form: row.form,
        form_indicator: row.form_indicator,
        form_size,
        form_units: row.form_units,
        unit_of_measure: row.unit_of_measure,
        numerator,
        numerator_unit_of_measure,
        denominator,
        denominator_unit_of_measure,
        ingredient_count,
        malformed_numeric: *malformed > malformed_before,
    }
}

/// Convert an ADQ row. Returns `None` when the row has no usable ADQ value.
pub fn parse_adq(row: RawAdqRow, malformed: &mut usize) -> Option<AdqRecord> {
    let code = row.drug_code.trim().to_string();
    let value = numeric_field(&code, "adq_value", row.adq_value.as_deref(), malformed);
    let (adq_value, adq_denominator) =
        normalize_quantity(value, row.adq_denominator.as_deref().unwrap_or(""));
    let adq_value = adq_value?;

    let drug_name = row.drug_name.unwrap_or_default();
    let dose_multiplier = extract_dose_multiplier(&drug_name);

    Some(AdqRecord {
        drug_code: code,
        drug_name,
        adq_value,
        adq_denominator,
        dose_multiplier,
    })
}

/// Resolve SQU codes and keep one observation per drug code.
///
/// Observations are expected oldest first; the last one seen for a code
/// wins. Output order follows the first appearance of each code.
pub fn parse_squs(rows: Vec<RawSquRow>, config: &ReconcileConfig) -> Result<Vec<SquRecord>, AdqError> {
    let mut records: Vec<SquRecord> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let code = row.drug_code.trim().to_string();
        if !has_drug_code(&code, "SQU") {
            continue;
        }
        let squ = resolve_squ(&code, row.squ.as_deref(), config)?;

        match index.get(&code) {
            Some(&i) => records[i].squ = squ,
            None => {
                index.insert(code.clone(), records.len());
                records.push(SquRecord {
                    drug_code: code,
                    squ,
                });
            }
        }
    }

    Ok(records)
}

/// Map an SQU cell (a code such as "3" or a label such as "ml") to a unit.
fn resolve_squ(
    drug_code: &str,
    text: Option<&str>,
    config: &ReconcileConfig,
) -> Result<Option<Unit>, AdqError> {
    let text = match text.map(str::trim) {
        Some(t) if !t.is_empty() => t,
        _ => return Ok(None),
    };

    if let Some(unit) = config.squ_for_code(text) {
        return Ok(Some(unit));
    }

    let label = Unit::parse(&text.to_lowercase());
    if label.is_squ() {
        return Ok(Some(label));
    }

    Err(AdqError::UnknownSquCode {
        drug_code: drug_code.to_string(),
        code: text.to_string(),
    })
}

fn numeric_field(
    drug_code: &str,
    column: &str,
    text: Option<&str>,
    malformed: &mut usize,
) -> Option<f64> {
    match text.map(parse_number).transpose() {
        Ok(value) => value.flatten(),
        Err(e) => {
            warn!("drug code {}: {}: {}", drug_code, column, e);
            *malformed += 1;
            None
        }
    }
}

fn has_drug_code(code: &str, table: &str) -> bool {
    if code.trim().is_empty() {
        warn!("skipping {} row without a drug code", table);
        return false;
    }
    true
}
