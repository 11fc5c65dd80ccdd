use adq_core::error::AdqError;
use serde::Serialize;

pub fn print<T: Serialize + ?Sized>(value: &T) -> Result<(), AdqError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
