use adq_core::error::AdqError;
use adq_core::extraction::csv_tables::write_csv;
use adq_core::reconcile::AdqPerQuantity;

pub fn print(rows: &[AdqPerQuantity]) -> Result<(), AdqError> {
    write_csv(std::io::stdout().lock(), rows)
}
