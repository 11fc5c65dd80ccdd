use crate::model::Unit;

/// Bring a (value, unit) pair onto the canonical unit vocabulary.
///
/// The unit is lower-cased and trimmed before lookup. Weights become grams,
/// volumes millilitres, international units and Therapeutic Equivalents
/// become unit doses, puffs become doses. A unit outside the table is
/// returned as-is (lower-cased and trimmed) with the value untouched.
///
/// Therapeutic Equivalent ("te") is how the drug dictionary records
/// strengths of 10,000u/ml and above: one TE is 1,000u.
pub fn normalize_quantity(value: Option<f64>, unit: &str) -> (Option<f64>, Unit) {
    let unit = unit.trim().to_lowercase();
    match unit.as_str() {
        "mega u" | "u" => (value.map(|v| v / 1000.0), Unit::UnitDose),
        "mcg" | "microgram" => (value.map(|v| v / 1000.0 / 1000.0), Unit::Gram),
        "mg" => (value.map(|v| v / 1000.0), Unit::Gram),
        "gramme" | "gram" => (value, Unit::Gram),
        "te" => (value.map(|v| v * 1000.0), Unit::UnitDose),
        "puffs" => (value, Unit::Dose),
        "microlitre" => (value.map(|v| v / 1000.0), Unit::Millilitre),
        "litre" => (value.map(|v| v * 1000.0), Unit::Millilitre),
        other => (value, Unit::parse(other)),
    }
}
