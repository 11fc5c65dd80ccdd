pub mod engine;
pub mod outcome;

pub use engine::{reconcile, reconciled_adq_denominator};
pub use outcome::{
    AdqPerQuantity, Branch, Reconciliation, ReconciliationResult, RowInspection, RunSummary,
    Unresolved,
};
