use crate::config::schema::ReconcileConfig;
use crate::model::{ProductRecord, Unit};

const NOT_APPLICABLE: &str = "Not applicable";
const DISCRETE: &str = "Discrete";
const SPOONFUL: &str = "spoonful";
const LITRE: &str = "litre";

/// Infer the unit a product's dispensed quantity is counted in.
///
/// A known SQU is ground truth. Otherwise the unit is inferred from the
/// dosage form and the form indicator; `None` means the unit is undefined
/// for this kind of product.
pub fn classify_quantity_unit(
    product: &ProductRecord,
    squ: Option<&Unit>,
    config: &ReconcileConfig,
) -> Option<Unit> {
    if let Some(squ) = squ {
        return Some(squ.clone());
    }

    let form = product.form.as_deref().unwrap_or("");
    let form_indicator = product.form_indicator.as_deref().unwrap_or("");

    if form_indicator == NOT_APPLICABLE || form == NOT_APPLICABLE {
        return None;
    }

    if config.is_solid_continuous(form) {
        return Some(Unit::Gram);
    }

    if product.form_units.as_deref() == Some(LITRE) {
        return Some(Unit::Millilitre);
    }

    if form_indicator == DISCRETE {
        match product.unit_of_measure.as_deref() {
            Some(SPOONFUL) => {}
            Some(uom) => return Some(Unit::parse(uom)),
            None => return None,
        }
    }

    Some(Unit::Millilitre)
}
