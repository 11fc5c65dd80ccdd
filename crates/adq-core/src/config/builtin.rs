use crate::config::schema::ReconcileConfig;
use crate::config::validate_config;
use crate::error::AdqError;

const DEFAULT_CONFIG_JSON: &str = include_str!("../../../../config/default.json");

/// The built-in configuration as JSON text.
pub fn default_config_json() -> &'static str {
    DEFAULT_CONFIG_JSON
}

/// Load the built-in configuration.
pub fn default_config() -> Result<ReconcileConfig, AdqError> {
    let config: ReconcileConfig = serde_json::from_str(DEFAULT_CONFIG_JSON)?;
    validate_config(&config)?;
    Ok(config)
}
