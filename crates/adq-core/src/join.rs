use std::collections::HashMap;

use tracing::debug;

use crate::classify::classify_quantity_unit;
use crate::config::schema::ReconcileConfig;
use crate::model::{AdqRecord, JoinedRecord, SquRecord};
use crate::parsing::ParsedTables;

/// Inner-join products with their ADQ and SQU rows on drug code and
/// classify each joined row's quantity unit.
///
/// Products keep their input order. A product without both an ADQ and an
/// SQU row is dropped.
pub fn join_tables<'a>(tables: &'a ParsedTables, config: &ReconcileConfig) -> Vec<JoinedRecord<'a>> {
    let mut adqs: HashMap<&str, &AdqRecord> = HashMap::with_capacity(tables.adqs.len());
    for adq in &tables.adqs {
        if adqs.insert(adq.drug_code.as_str(), adq).is_some() {
            debug!("duplicate ADQ row for {}, keeping the later one", adq.drug_code);
        }
    }

    let squs: HashMap<&str, &SquRecord> = tables
        .squs
        .iter()
        .map(|squ| (squ.drug_code.as_str(), squ))
        .collect();

    let joined: Vec<JoinedRecord<'a>> = tables
        .products
        .iter()
        .filter_map(|product| {
            let code = product.drug_code.as_str();
            let adq = *adqs.get(code)?;
            let squ = *squs.get(code)?;
            Some(JoinedRecord {
                product,
                adq,
                squ,
                quantity_denominator: classify_quantity_unit(product, squ.squ.as_ref(), config),
            })
        })
        .collect();

    debug!(
        "joined {} of {} product rows",
        joined.len(),
        tables.products.len()
    );
    joined
}
