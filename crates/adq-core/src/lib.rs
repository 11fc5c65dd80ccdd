pub mod classify;
pub mod config;
pub mod error;
pub mod extraction;
pub mod join;
pub mod model;
pub mod parsing;
pub mod reconcile;

use std::collections::HashSet;

use rayon::prelude::*;
use tracing::{debug, info};

use config::schema::ReconcileConfig;
use error::AdqError;
use extraction::TableSource;
use model::JoinedRecord;
use parsing::ParsedTables;
use reconcile::{
    reconcile, reconciled_adq_denominator, AdqPerQuantity, Reconciliation, ReconciliationResult,
    RowInspection, RunSummary,
};

/// Main API entry point: load the three tables from `source` and compute
/// the ADQs per dispensed quantity unit for every drug code that resolves.
pub fn compute_adqs(
    source: &dyn TableSource,
    config: &ReconcileConfig,
) -> Result<ReconciliationResult, AdqError> {
    let tables = load_tables(source, config)?;
    Ok(reconcile_tables(&tables, config))
}

/// Read and normalize the input tables.
pub fn load_tables(
    source: &dyn TableSource,
    config: &ReconcileConfig,
) -> Result<ParsedTables, AdqError> {
    debug!("loading tables from {}", source.source_name());
    let products = source.products()?;
    let adqs = source.adqs()?;
    let squs = source.squs()?;
    parsing::parse_tables(products, adqs, squs, config)
}

/// Join the parsed tables and reconcile every joined row.
///
/// Rows are reconciled in parallel. The output holds the first resolved
/// row per drug code, in product table order.
pub fn reconcile_tables(tables: &ParsedTables, config: &ReconcileConfig) -> ReconciliationResult {
    let joined = join::join_tables(tables, config);
    let outcomes: Vec<Reconciliation> = joined.par_iter().map(|record| reconcile(record)).collect();

    let mut summary = RunSummary {
        product_rows: tables.stats.product_rows,
        adq_rows: tables.stats.adq_rows,
        adq_rows_without_value: tables.stats.adq_rows_without_value,
        squ_rows: tables.squs.len(),
        malformed_numerics: tables.stats.malformed_numerics,
        joined_rows: joined.len(),
        ..Default::default()
    };

    let mut seen: HashSet<&str> = HashSet::new();
    let mut rows = Vec::new();
    for (record, outcome) in joined.iter().zip(&outcomes) {
        match outcome {
            Reconciliation::Resolved {
                adq_per_quantity, ..
            } => {
                summary.resolved_rows += 1;
                if seen.insert(record.drug_code()) {
                    rows.push(output_row(record, *adq_per_quantity));
                } else {
                    summary.superseded_rows += 1;
                }
            }
            Reconciliation::Unresolved { reason } => {
                debug!("{}: {}", record.drug_code(), reason);
                *summary.unresolved.entry(*reason).or_insert(0) += 1;
            }
        }
    }
    summary.output_rows = rows.len();

    info!(
        "reconciled {} of {} joined rows into {} drug codes",
        summary.resolved_rows, summary.joined_rows, summary.output_rows
    );

    ReconciliationResult {
        config_name: config.name.clone(),
        rows,
        summary,
    }
}

/// Every joined row for one drug code with its derived fields.
pub fn inspect_drug(
    tables: &ParsedTables,
    config: &ReconcileConfig,
    drug_code: &str,
) -> Vec<RowInspection> {
    join::join_tables(tables, config)
        .iter()
        .filter(|record| record.drug_code() == drug_code)
        .map(|record| {
            let product = record.product;
            let adq = record.adq;
            RowInspection {
                drug_code: product.drug_code.clone(),
                product_name: product.name.clone(),
                drug_name: adq.drug_name.clone(),
                form: product.form.clone(),
                form_indicator: product.form_indicator.clone(),
                form_size: product.form_size,
                unit_of_measure: product.unit_of_measure.clone(),
                numerator: product.numerator,
                numerator_unit_of_measure: product.numerator_unit_of_measure.clone(),
                denominator_unit_of_measure: product.denominator_unit_of_measure.clone(),
                ingredient_count: product.ingredient_count,
                squ: record.squ.squ.clone(),
                quantity_denominator: record.quantity_denominator.clone(),
                adq_value: adq.adq_value,
                adq_denominator: adq.adq_denominator.clone(),
                reconciled_adq_denominator: reconciled_adq_denominator(
                    &adq.adq_denominator,
                    record.quantity_denominator.as_ref(),
                ),
                dose_multiplier: adq.dose_multiplier,
                outcome: reconcile(record),
            }
        })
        .collect()
}

fn output_row(record: &JoinedRecord<'_>, adq_per_quantity: f64) -> AdqPerQuantity {
    AdqPerQuantity {
        drug_code: record.drug_code().to_string(),
        drug_name: record.adq.drug_name.clone(),
        vpid: record.product.vpid.clone(),
        quantity_denominator: record.quantity_denominator.clone(),
        adq_value: record.adq.adq_value,
        adq_denominator: record.adq.adq_denominator.clone(),
        dose_multiplier: record.adq.dose_multiplier,
        adq_per_quantity,
    }
}
