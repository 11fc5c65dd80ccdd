pub mod quantity;

pub use quantity::classify_quantity_unit;
