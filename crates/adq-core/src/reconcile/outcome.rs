use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::Unit;

/// Why a joined row produced no ADQ-per-quantity value.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    thiserror::Error,
)]
#[serde(rename_all = "snake_case")]
pub enum Unresolved {
    /// Transdermal patch (dosed per hour) with an ADQ in grams.
    #[error("patch dosed per hour with an ADQ in grams has no known conversion")]
    IrreducibleAmbiguity,

    /// Multi-ingredient product whose ADQ name carries no quantity in ADQ units.
    #[error("no quantity in ADQ units found in the product name")]
    NoNameQuantity,

    #[error("strength numerator is missing")]
    MissingNumerator,

    #[error("ADQ value is zero")]
    DivisionByZero,

    /// A numeric cell of the product row could not be parsed.
    #[error("product row has a malformed numeric cell")]
    MalformedNumeric,
}

/// Which step of the decision procedure produced the quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Branch {
    /// ADQ and quantity units agree; one quantity unit is one ADQ unit.
    EqualUnits,
    /// Units agree and the product is counted in unit doses of `form_size`.
    UnitDoseFormSize,
    /// Single ingredient counted in units, strength in ADQ units:
    /// `form_size * numerator`.
    ScaledNumerator,
    /// Single ingredient counted in units, strength in other units.
    SingleIngredientNumerator,
    /// Multi-ingredient product, quantity read from the name.
    NameQuantity,
    /// Quantity unit is not "unit": the strength numerator.
    Numerator,
}

/// Outcome of reconciling one joined row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Reconciliation {
    Resolved {
        adq_per_quantity: f64,
        quantity_in_adq_units: f64,
        branch: Branch,
    },
    Unresolved {
        reason: Unresolved,
    },
}

impl Reconciliation {
    pub fn adq_per_quantity(&self) -> Option<f64> {
        match self {
            Reconciliation::Resolved {
                adq_per_quantity, ..
            } => Some(*adq_per_quantity),
            Reconciliation::Unresolved { .. } => None,
        }
    }
}

/// One output row: the ADQs contained in one dispensed quantity unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdqPerQuantity {
    pub drug_code: String,
    pub drug_name: String,
    pub vpid: Option<String>,
    pub quantity_denominator: Option<Unit>,
    pub adq_value: f64,
    pub adq_denominator: Unit,
    pub dose_multiplier: f64,
    pub adq_per_quantity: f64,
}

/// Row counts for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub product_rows: usize,
    pub adq_rows: usize,
    pub adq_rows_without_value: usize,
    pub squ_rows: usize,
    pub malformed_numerics: usize,
    pub joined_rows: usize,
    pub resolved_rows: usize,
    /// Resolved rows for a drug code that already had an output row.
    pub superseded_rows: usize,
    pub output_rows: usize,
    pub unresolved: BTreeMap<Unresolved, usize>,
}

impl RunSummary {
    pub fn unresolved_rows(&self) -> usize {
        self.unresolved.values().sum()
    }
}

/// Result of a full run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationResult {
    /// Name of the configuration the run used.
    pub config_name: String,
    pub rows: Vec<AdqPerQuantity>,
    pub summary: RunSummary,
}

/// Every derived field of one joined row, for diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowInspection {
    pub drug_code: String,
    pub product_name: String,
    pub drug_name: String,
    pub form: Option<String>,
    pub form_indicator: Option<String>,
    pub form_size: Option<f64>,
    pub unit_of_measure: Option<String>,
    pub numerator: Option<f64>,
    pub numerator_unit_of_measure: Unit,
    pub denominator_unit_of_measure: Unit,
    pub ingredient_count: Option<u32>,
    pub squ: Option<Unit>,
    pub quantity_denominator: Option<Unit>,
    pub adq_value: f64,
    pub adq_denominator: Unit,
    pub reconciled_adq_denominator: Option<Unit>,
    pub dose_multiplier: f64,
    pub outcome: Reconciliation,
}
