pub mod builtin;
pub mod schema;

use crate::error::AdqError;
use crate::model::Unit;
use schema::ReconcileConfig;
use std::collections::HashSet;
use std::path::Path;

/// Load a configuration from a JSON file.
pub fn load_config(path: &Path) -> Result<ReconcileConfig, AdqError> {
    let content = std::fs::read_to_string(path).map_err(|e| AdqError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_config(&content, path)
}

/// Parse a configuration from a JSON string.
pub fn parse_config(json: &str, source: &Path) -> Result<ReconcileConfig, AdqError> {
    let config: ReconcileConfig = serde_json::from_str(json).map_err(|e| AdqError::ConfigLoad {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    validate_config(&config)?;
    Ok(config)
}

/// Parse a configuration from a JSON string (no file path context).
pub fn parse_config_str(json: &str) -> Result<ReconcileConfig, AdqError> {
    let config: ReconcileConfig = serde_json::from_str(json).map_err(AdqError::Json)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate that a configuration is well-formed.
pub fn validate_config(config: &ReconcileConfig) -> Result<(), AdqError> {
    if config.solid_continuous_forms.is_empty() {
        return Err(AdqError::ConfigInvalid(
            "solid_continuous_forms must not be empty".into(),
        ));
    }

    let mut seen = HashSet::new();
    for form in &config.solid_continuous_forms {
        if form.trim().is_empty() {
            return Err(AdqError::ConfigInvalid(
                "dosage form names must not be empty".into(),
            ));
        }
        if !seen.insert(form.as_str()) {
            return Err(AdqError::ConfigInvalid(format!(
                "dosage form '{}' is listed twice",
                form
            )));
        }
    }

    if config.squ_codes.is_empty() {
        return Err(AdqError::ConfigInvalid("squ_codes must not be empty".into()));
    }

    let mut seen_codes = HashSet::new();
    for (code, label) in &config.squ_codes {
        let value = code.parse::<u32>().map_err(|_| {
            AdqError::ConfigInvalid(format!(
                "SQU code '{}' is not a non-negative integer",
                code
            ))
        })?;
        if !seen_codes.insert(value) {
            return Err(AdqError::ConfigInvalid(format!(
                "SQU code '{}' repeats code {}",
                code, value
            )));
        }
        if !Unit::parse(label).is_squ() {
            return Err(AdqError::ConfigInvalid(format!(
                "SQU code '{}' maps to '{}' (expected unit, ml, g or individual)",
                code, label
            )));
        }
    }

    Ok(())
}
