use crate::error::AdqError;

/// Parse a numeric cell from one of the input tables.
///
/// Handles formats like:
/// - "68" -> Some(68.0)
/// - "0.030" -> Some(0.03)
/// - "10,000" -> Some(10000.0) (thousand separators are stripped)
/// - "" -> None
pub fn parse_number(s: &str) -> Result<Option<f64>, AdqError> {
    let s = s.trim();

    if s.is_empty() {
        return Ok(None);
    }

    let stripped = s.replace(',', "");
    let value = stripped
        .trim()
        .parse::<f64>()
        .map_err(|_| AdqError::MalformedNumeric {
            text: s.to_string(),
        })?;

    // Dataframe exports write missing values as "nan"
    if value.is_nan() {
        return Ok(None);
    }
    if value.is_infinite() {
        return Err(AdqError::MalformedNumeric {
            text: s.to_string(),
        });
    }
    Ok(Some(value))
}

/// Parse an ingredient count. Counts arrive as "1" or, from float
/// columns, "1.0".
pub fn parse_count(s: &str) -> Result<Option<u32>, AdqError> {
    match parse_number(s)? {
        None => Ok(None),
        Some(v) if v >= 1.0 && v.fract() == 0.0 && v <= u32::MAX as f64 => Ok(Some(v as u32)),
        Some(_) => Err(AdqError::MalformedNumeric {
            text: s.trim().to_string(),
        }),
    }
}
