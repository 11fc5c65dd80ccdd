use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::model::Unit;

/// Static lookup data the classifier and the SQU loader depend on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    /// Dosage forms whose dispensed quantity is counted in grams.
    pub solid_continuous_forms: Vec<String>,
    /// Map of PCA "Standard Quantity Unit" code -> unit label.
    #[serde(deserialize_with = "distinct_codes")]
    pub squ_codes: BTreeMap<String, String>,
    /// PCA preparation classes that never carry a drug SQU (appliances).
    #[serde(default)]
    pub excluded_preparation_classes: Vec<i64>,
}

impl ReconcileConfig {
    pub fn is_solid_continuous(&self, form: &str) -> bool {
        self.solid_continuous_forms.iter().any(|f| f == form)
    }

    /// Look up an SQU code. Codes read from float columns ("3.0") match
    /// their integer key.
    pub fn squ_for_code(&self, code: &str) -> Option<Unit> {
        let code = code.trim();
        if let Some(label) = self.squ_codes.get(code) {
            return Some(Unit::parse(label));
        }
        let as_int = code
            .parse::<f64>()
            .ok()
            .filter(|v| v.fract() == 0.0)
            .map(|v| (v as i64).to_string())?;
        self.squ_codes.get(&as_int).map(|label| Unit::parse(label))
    }
}

/// Deserialize the SQU code map, rejecting a code that appears twice.
fn distinct_codes<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct CodesVisitor;

    impl<'de> Visitor<'de> for CodesVisitor {
        type Value = BTreeMap<String, String>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of SQU code to unit")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut codes = BTreeMap::new();
            while let Some((code, unit)) = map.next_entry::<String, String>()? {
                if codes.contains_key(&code) {
                    return Err(de::Error::custom(format!("SQU code '{}' is listed twice", code)));
                }
                codes.insert(code, unit);
            }
            Ok(codes)
        }
    }

    deserializer.deserialize_map(CodesVisitor)
}
