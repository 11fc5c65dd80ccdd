//! Quantities hidden in free-text drug names.
//!
//! ADQ names sometimes carry a pack multiplier the structured fields do
//! not, e.g. `Seretide 500_Accuhaler 500mcg/50mcg(60D)` is dispensed per
//! inhaler of 60 doses. Both extractors are best-effort pattern matches and
//! return `None` for names that encode the quantity some other way.

use crate::model::Unit;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{LazyLock, RwLock};

/// `...(60D)`, `...500mcg50mcg14D` or `...1g/D 14g`. The leading `.*` is
/// greedy so the last occurrence in the name wins.
static DOSE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.*(?:(?:\b|mg|mcg|ml)(\d+) ?D\b|\d.{1,5}/D (\d+))")
        .expect("dose multiplier pattern is valid")
});

/// Pack multiplier encoded in a drug name, if any.
pub fn dose_multiplier(name: &str) -> Option<f64> {
    let caps = DOSE_PATTERN.captures(name)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Pack multiplier encoded in a drug name, defaulting to 1.
pub fn extract_dose_multiplier(name: &str) -> f64 {
    dose_multiplier(name).unwrap_or(1.0)
}

/// Find `<integer><unit>` in a drug name, e.g. `1g` in `Maxepa_Cap 1g`.
///
/// Used for multi-ingredient products, where the strength columns describe
/// individual ingredients rather than the product.
pub fn quantity_from_name(name: &str, unit: &Unit) -> Option<f64> {
    name_quantity_pattern(unit)
        .captures(name)?
        .get(1)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Compiled `<integer><unit>` patterns, one per unit seen.
static NAME_QUANTITY_PATTERNS: LazyLock<RwLock<HashMap<String, Regex>>> =
    LazyLock::new(Default::default);

fn name_quantity_pattern(unit: &Unit) -> Regex {
    let key = unit.as_str();
    if let Some(re) = NAME_QUANTITY_PATTERNS
        .read()
        .ok()
        .and_then(|patterns| patterns.get(key).cloned())
    {
        return re;
    }

    let re = Regex::new(&format!(r"^.*\b(\d+){}\b", regex::escape(key)))
        .expect("escaped unit pattern is valid");
    if let Ok(mut patterns) = NAME_QUANTITY_PATTERNS.write() {
        patterns.entry(key.to_string()).or_insert_with(|| re.clone());
    }
    re
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parenthesised_dose_count() {
        assert_eq!(
            extract_dose_multiplier("Seretide 500_Accuhaler 500mcg/50mcg(60D)"),
            60.0
        );
    }

    #[test]
    fn test_count_after_per_dose_fragment() {
        assert_eq!(
            extract_dose_multiplier("Mesalazine_Foam Aero Enem 1g/D 14g"),
            14.0
        );
    }

    #[test]
    fn test_count_after_unit_token() {
        assert_eq!(
            extract_dose_multiplier("Symbicort_Turbohaler 400mcg/12mcg120D"),
            120.0
        );
        assert_eq!(extract_dose_multiplier("Budesonide_Inh 500mcg50mcg14D"), 14.0);
    }

    #[test]
    fn test_space_before_marker() {
        assert_eq!(extract_dose_multiplier("Qvar 50_Autohaler 50mcg (200 D)"), 200.0);
    }

    #[test]
    fn test_no_multiplier_defaults_to_one() {
        assert_eq!(extract_dose_multiplier("Paracetamol 500mg Tablets"), 1.0);
        assert_eq!(dose_multiplier("Paracetamol 500mg Tablets"), None);
    }

    #[test]
    fn test_marker_must_end_a_word() {
        // "30Day" is not a dose marker
        assert_eq!(dose_multiplier("Nicotine_Patch 30Day Pack"), None);
    }

    #[test]
    fn test_quantity_from_name() {
        assert_eq!(quantity_from_name("Maxepa_Cap 1g", &Unit::Gram), Some(1.0));
        assert_eq!(
            quantity_from_name("Co-Magaldrox_Susp 195mg/220mg/5ml 500ml", &Unit::Millilitre),
            Some(500.0)
        );
    }

    #[test]
    fn test_quantity_from_name_needs_whole_token() {
        // "1gm" does not end on a word boundary after "g"
        assert_eq!(quantity_from_name("Omacor_Cap 1gm", &Unit::Gram), None);
        assert_eq!(quantity_from_name("Gaviscon_Liq", &Unit::Millilitre), None);
    }

    #[test]
    fn test_quantity_from_name_escapes_unit() {
        assert_eq!(
            quantity_from_name("Vit D 3unit dose", &Unit::UnitDose),
            Some(3.0)
        );
    }

    #[test]
    fn test_name_quantity_pattern_is_compiled_once_per_unit() {
        let unit = Unit::Other("sachet".into());
        assert_eq!(quantity_from_name("Movicol 13.8g 30sachet", &unit), Some(30.0));
        assert_eq!(quantity_from_name("Movicol 20sachet", &unit), Some(20.0));

        let patterns = NAME_QUANTITY_PATTERNS.read().unwrap();
        assert!(patterns.contains_key("sachet"));
        assert_eq!(patterns["sachet"].as_str(), r"^.*\b(\d+)sachet\b");
    }
}
