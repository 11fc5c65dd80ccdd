use adq_core::config::builtin::{default_config, default_config_json};
use adq_core::error::AdqError;
use std::path::Path;

pub fn show() -> Result<(), AdqError> {
    let config = default_config()?;
    println!("{} (version {})", config.name, config.version);
    if let Some(ref desc) = config.description {
        println!("{}", desc);
    }
    println!();
    print!("{}", default_config_json());
    Ok(())
}

pub fn schema() -> Result<(), AdqError> {
    print!(
        r#"Configuration Schema
====================

A configuration file holds the static lookup data used to infer the unit
a product's dispensed quantity is counted in, and to read Standard
Quantity Units from Prescription Cost Analysis spreadsheets.

Top-level fields:
  name                    (string, required)  Human-readable name
  description             (string, optional)  What this configuration is for
  version                 (string, required)  Version identifier (e.g., "2018.06")
  solid_continuous_forms  (array, required)   Dosage forms whose quantity is
                                              counted in grams when no SQU is
                                              known. Names match the dm+d form
                                              exactly (e.g., "Cream").
  squ_codes               (object, required)  Map of PCA "Standard Quantity
                                              Unit" code -> unit. Codes are
                                              non-negative integers; units are
                                              one of unit, ml, g, individual.
  excluded_preparation_classes
                          (array, optional)   PCA preparation classes skipped
                                              when reading spreadsheets.

Example:
{{
  "name": "Local overrides",
  "version": "1.0",
  "solid_continuous_forms": ["Cream", "Ointment", "Gel"],
  "squ_codes": {{ "0": "individual", "1": "unit", "3": "ml", "6": "g" }},
  "excluded_preparation_classes": [4]
}}

Run `adq config show` for the built-in configuration.
"#
    );
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), AdqError> {
    let config = adq_core::config::load_config(file)?;

    println!("Configuration '{}' (v{}) is valid.", config.name, config.version);
    println!(
        "  Solid continuous forms: {}",
        config.solid_continuous_forms.len()
    );
    let codes: Vec<String> = config
        .squ_codes
        .iter()
        .map(|(code, unit)| format!("{code}={unit}"))
        .collect();
    println!("  SQU codes: {}", codes.join(", "));

    let builtin = default_config()?;
    let missing: Vec<&String> = builtin
        .solid_continuous_forms
        .iter()
        .filter(|form| !config.is_solid_continuous(form))
        .collect();
    if !missing.is_empty() {
        println!("\nWarnings:");
        for form in missing {
            println!("  - built-in form '{}' is not listed", form);
        }
    }

    Ok(())
}
