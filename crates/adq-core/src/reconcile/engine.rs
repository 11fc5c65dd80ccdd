use crate::model::{JoinedRecord, Unit};
use crate::parsing::names::quantity_from_name;
use crate::reconcile::outcome::{Branch, Reconciliation, Unresolved};

const HOUR: &str = "hour";
const UNIT_DOSE: &str = "unit dose";

/// The ADQ denominator as it is compared against the quantity unit.
///
/// "dose" and "unit" are synonyms in ADQ terminology, so the text "dose" is
/// replaced by "unit". An unspecified ADQ unit takes the quantity unit.
pub fn reconciled_adq_denominator(
    adq_denominator: &Unit,
    quantity_denominator: Option<&Unit>,
) -> Option<Unit> {
    let replaced = adq_denominator.as_str().replace("dose", "unit");
    if replaced.is_empty() {
        quantity_denominator.cloned()
    } else {
        Some(Unit::parse(&replaced))
    }
}

/// Compute how many ADQs one dispensed quantity unit of the product holds.
pub fn reconcile(record: &JoinedRecord<'_>) -> Reconciliation {
    let product = record.product;
    let adq = record.adq;

    if product.malformed_numeric {
        return unresolved(Unresolved::MalformedNumeric);
    }

    if product.denominator_unit_of_measure.as_str() == HOUR && adq.adq_denominator == Unit::Gram {
        return unresolved(Unresolved::IrreducibleAmbiguity);
    }

    let form_size = product.form_size.unwrap_or(1.0);
    let quantity_denominator = record.quantity_denominator.as_ref();
    let reconciled = reconciled_adq_denominator(&adq.adq_denominator, quantity_denominator);

    let resolved = if reconciled.as_ref() == quantity_denominator {
        if product.unit_of_measure.as_deref() == Some(UNIT_DOSE) {
            Ok((form_size, Branch::UnitDoseFormSize))
        } else {
            Ok((1.0, Branch::EqualUnits))
        }
    } else if quantity_denominator == Some(&Unit::Unit) {
        if product.ingredient_count == Some(1) {
            let numerator = product.numerator.ok_or(Unresolved::MissingNumerator);
            if reconciled.as_ref() == Some(&product.numerator_unit_of_measure) {
                numerator.map(|n| (form_size * n, Branch::ScaledNumerator))
            } else {
                numerator.map(|n| (n, Branch::SingleIngredientNumerator))
            }
        } else {
            quantity_from_name(&adq.drug_name, &adq.adq_denominator)
                .map(|q| (q, Branch::NameQuantity))
                .ok_or(Unresolved::NoNameQuantity)
        }
    } else {
        product
            .numerator
            .map(|n| (n, Branch::Numerator))
            .ok_or(Unresolved::MissingNumerator)
    };

    let (quantity, branch) = match resolved {
        Ok(resolved) => resolved,
        Err(reason) => return unresolved(reason),
    };

    if adq.adq_value == 0.0 {
        return unresolved(Unresolved::DivisionByZero);
    }

    Reconciliation::Resolved {
        adq_per_quantity: (quantity * adq.dose_multiplier) / adq.adq_value,
        quantity_in_adq_units: quantity,
        branch,
    }
}

fn unresolved(reason: Unresolved) -> Reconciliation {
    Reconciliation::Unresolved { reason }
}
