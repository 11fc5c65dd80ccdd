use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit vocabulary shared by the product, ADQ and SQU tables.
///
/// Parsing is exact on the canonical spellings, so two units are equal
/// exactly when their textual forms are equal. Anything outside the
/// vocabulary is carried through as `Other`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Unit {
    Gram,
    Millilitre,
    Unit,
    UnitDose,
    Dose,
    Individual,
    /// No unit given upstream (an empty cell).
    #[default]
    Unspecified,
    Other(String),
}

impl Unit {
    pub fn parse(s: &str) -> Unit {
        match s {
            "g" => Unit::Gram,
            "ml" => Unit::Millilitre,
            "unit" => Unit::Unit,
            "unit dose" => Unit::UnitDose,
            "dose" => Unit::Dose,
            "individual" => Unit::Individual,
            "" => Unit::Unspecified,
            other => Unit::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Unit::Gram => "g",
            Unit::Millilitre => "ml",
            Unit::Unit => "unit",
            Unit::UnitDose => "unit dose",
            Unit::Dose => "dose",
            Unit::Individual => "individual",
            Unit::Unspecified => "",
            Unit::Other(s) => s,
        }
    }

    /// True for the units the normalizer produces: g, ml, unit, unit dose, dose.
    pub fn is_canonical(&self) -> bool {
        matches!(
            self,
            Unit::Gram | Unit::Millilitre | Unit::Unit | Unit::UnitDose | Unit::Dose
        )
    }

    /// True for the units a Standard Quantity Unit can take.
    pub fn is_squ(&self) -> bool {
        matches!(
            self,
            Unit::Unit | Unit::Millilitre | Unit::Gram | Unit::Individual
        )
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Unit {
    fn from(s: String) -> Self {
        Unit::parse(&s)
    }
}

impl From<Unit> for String {
    fn from(unit: Unit) -> Self {
        unit.as_str().to_string()
    }
}

/// A dm+d product row with strength units normalized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub drug_code: String,
    pub name: String,
    pub vpid: Option<String>,
    pub form: Option<String>,
    pub form_indicator: Option<String>,
    pub form_size: Option<f64>,
    pub form_units: Option<String>,
    pub unit_of_measure: Option<String>,
    pub numerator: Option<f64>,
    pub numerator_unit_of_measure: Unit,
    pub denominator: Option<f64>,
    pub denominator_unit_of_measure: Unit,
    pub ingredient_count: Option<u32>,
    /// A numeric cell of the row could not be parsed.
    #[serde(default)]
    pub malformed_numeric: bool,
}

/// A published Average Daily Quantity, normalized, with the pack-size
/// multiplier taken from the drug name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdqRecord {
    pub drug_code: String,
    pub drug_name: String,
    pub adq_value: f64,
    pub adq_denominator: Unit,
    pub dose_multiplier: f64,
}

/// The Standard Quantity Unit observed for a drug code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquRecord {
    pub drug_code: String,
    /// `None` when the source row carried no classification.
    pub squ: Option<Unit>,
}

/// One product row matched with its ADQ and SQU rows.
#[derive(Debug, Clone)]
pub struct JoinedRecord<'a> {
    pub product: &'a ProductRecord,
    pub adq: &'a AdqRecord,
    pub squ: &'a SquRecord,
    pub quantity_denominator: Option<Unit>,
}

impl JoinedRecord<'_> {
    pub fn drug_code(&self) -> &str {
        &self.product.drug_code
    }
}
