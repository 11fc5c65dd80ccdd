use adq_core::model::Unit;
use adq_core::reconcile::{Reconciliation, ReconciliationResult, RowInspection, RunSummary};

pub fn print(result: &ReconciliationResult) {
    println!("=== {} ===\n", result.config_name);

    if result.rows.is_empty() {
        println!("  No drug code resolved.\n");
        return;
    }

    let max_code = result
        .rows
        .iter()
        .map(|r| r.drug_code.len())
        .max()
        .unwrap_or(15);
    let max_name = result
        .rows
        .iter()
        .map(|r| r.drug_name.chars().count())
        .max()
        .unwrap_or(20)
        .min(48);

    println!(
        "  {:<code$}  {:<name$}  {:<10}  {:>14}",
        "Drug code",
        "Name",
        "Quantity",
        "ADQ/quantity",
        code = max_code,
        name = max_name
    );
    println!("  {}", "-".repeat(max_code + max_name + 32));

    for row in &result.rows {
        println!(
            "  {:<code$}  {:<name$}  {:<10}  {:>14}",
            row.drug_code,
            truncate(&row.drug_name, max_name),
            unit_label(row.quantity_denominator.as_ref()),
            format_ratio(row.adq_per_quantity),
            code = max_code,
            name = max_name
        );
    }
    println!();
}

/// Run summary, written to stderr so stdout stays machine readable.
pub fn print_summary(summary: &RunSummary) {
    eprintln!(
        "Products: {}  ADQs: {} ({} without value)  SQUs: {}",
        summary.product_rows, summary.adq_rows, summary.adq_rows_without_value, summary.squ_rows
    );
    if summary.malformed_numerics > 0 {
        eprintln!("Malformed numeric cells: {}", summary.malformed_numerics);
    }
    eprintln!(
        "Joined rows: {}  resolved: {}  superseded: {}  output drug codes: {}",
        summary.joined_rows, summary.resolved_rows, summary.superseded_rows, summary.output_rows
    );
    if !summary.unresolved.is_empty() {
        eprintln!("Unresolved rows: {}", summary.unresolved_rows());
        for (reason, count) in &summary.unresolved {
            eprintln!("  {:>6}  {}", count, reason);
        }
    }
}

pub fn print_inspection(rows: &[RowInspection]) {
    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("--- {} (row {} of {}) ---\n", row.drug_code, i + 1, rows.len());
        println!("  Product:            {}", row.product_name);
        println!("  ADQ name:           {}", row.drug_name);
        println!("  Form:               {}", opt(row.form.as_deref()));
        println!("  Form indicator:     {}", opt(row.form_indicator.as_deref()));
        println!("  Form size:          {}", opt_num(row.form_size));
        println!("  Unit of measure:    {}", opt(row.unit_of_measure.as_deref()));
        println!(
            "  Strength:           {} {} per {}",
            opt_num(row.numerator),
            row.numerator_unit_of_measure,
            row.denominator_unit_of_measure
        );
        println!(
            "  Ingredients:        {}",
            row.ingredient_count
                .map(|c| c.to_string())
                .unwrap_or_else(|| "-".into())
        );
        println!("  SQU:                {}", unit_label(row.squ.as_ref()));
        println!(
            "  Quantity unit:      {}",
            unit_label(row.quantity_denominator.as_ref())
        );
        println!("  ADQ:                {} {}", row.adq_value, row.adq_denominator);
        println!(
            "  Compared as:        {}",
            unit_label(row.reconciled_adq_denominator.as_ref())
        );
        println!("  Dose multiplier:    {}", row.dose_multiplier);

        match &row.outcome {
            Reconciliation::Resolved {
                adq_per_quantity,
                quantity_in_adq_units,
                branch,
            } => {
                println!("  Quantity in ADQ units: {} ({:?})", quantity_in_adq_units, branch);
                println!("  ADQ per quantity:      {}", format_ratio(*adq_per_quantity));
            }
            Reconciliation::Unresolved { reason } => {
                println!("  Unresolved: {}", reason);
            }
        }
    }
}

fn unit_label(unit: Option<&Unit>) -> String {
    match unit {
        None => "-".into(),
        Some(Unit::Unspecified) => "(none)".into(),
        Some(unit) => unit.to_string(),
    }
}

fn opt(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

fn opt_num(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".into())
}

fn format_ratio(value: f64) -> String {
    format!("{:.6}", value)
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(3)).collect();
        cut.push_str("...");
        cut
    }
}
