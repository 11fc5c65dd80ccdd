pub mod csv_tables;
pub mod pca_xlsx;

use crate::error::AdqError;
use serde::{Deserialize, Serialize};

/// A product row as exported from the drug dictionary. Numeric columns are
/// kept as text until parsing so that thousand separators and malformed
/// cells can be handled per row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawProductRow {
    #[serde(alias = "bnf_code")]
    pub drug_code: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub vpid: Option<String>,
    #[serde(default)]
    pub form: Option<String>,
    #[serde(default)]
    pub form_indicator: Option<String>,
    #[serde(default)]
    pub form_size: Option<String>,
    #[serde(default)]
    pub form_units: Option<String>,
    #[serde(default)]
    pub unit_of_measure: Option<String>,
    #[serde(default)]
    pub numerator: Option<String>,
    #[serde(default)]
    pub numerator_unit_of_measure: Option<String>,
    #[serde(default)]
    pub denominator: Option<String>,
    #[serde(default)]
    pub denominator_unit_of_measure: Option<String>,
    #[serde(default)]
    pub ingredient_count: Option<String>,
}

/// An ADQ row as supplied in the data request response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawAdqRow {
    #[serde(alias = "bnf_code")]
    pub drug_code: String,
    #[serde(alias = "bnf_name", default)]
    pub drug_name: Option<String>,
    #[serde(default)]
    pub adq_value: Option<String>,
    #[serde(default)]
    pub adq_denominator: Option<String>,
}

/// A (drug code, SQU) observation. `squ` is a numeric SQU code or a label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSquRow {
    #[serde(alias = "bnf_code")]
    pub drug_code: String,
    #[serde(default)]
    pub squ: Option<String>,
}

/// Trait for the backends that supply the three input tables.
pub trait TableSource: Send + Sync {
    fn products(&self) -> Result<Vec<RawProductRow>, AdqError>;

    fn adqs(&self) -> Result<Vec<RawAdqRow>, AdqError>;

    /// SQU observations, oldest first.
    fn squs(&self) -> Result<Vec<RawSquRow>, AdqError>;

    /// Name of this backend (for diagnostics).
    fn source_name(&self) -> &str;
}
