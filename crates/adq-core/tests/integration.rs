//! Integration tests for the compute_adqs() pipeline.
//!
//! A MockSource hands the pipeline pre-built raw rows so the tests exercise
//! parsing, joining, classification and reconciliation without touching
//! the filesystem. The CSV tests at the bottom go through real files.

use adq_core::compute_adqs;
use adq_core::config::builtin::default_config;
use adq_core::error::AdqError;
use adq_core::extraction::csv_tables::{read_csv_file, write_csv_file, CsvTables};
use adq_core::extraction::{RawAdqRow, RawProductRow, RawSquRow, TableSource};
use adq_core::model::Unit;
use adq_core::reconcile::{AdqPerQuantity, Reconciliation, Unresolved};
use adq_core::{inspect_drug, load_tables};
use std::collections::HashSet;

struct MockSource {
    products: Vec<RawProductRow>,
    adqs: Vec<RawAdqRow>,
    squs: Vec<RawSquRow>,
}

impl TableSource for MockSource {
    fn products(&self) -> Result<Vec<RawProductRow>, AdqError> {
        Ok(self.products.clone())
    }

    fn adqs(&self) -> Result<Vec<RawAdqRow>, AdqError> {
        Ok(self.adqs.clone())
    }

    fn squs(&self) -> Result<Vec<RawSquRow>, AdqError> {
        Ok(self.squs.clone())
    }

    fn source_name(&self) -> &str {
        "mock"
    }
}

fn s(text: &str) -> Option<String> {
    Some(text.to_string())
}

#[allow(clippy::too_many_arguments)]
fn product(
    code: &str,
    form: &str,
    indicator: &str,
    form_size: Option<&str>,
    numerator: (&str, &str),
    denominator: (&str, &str),
    ingredients: &str,
) -> RawProductRow {
    RawProductRow {
        drug_code: code.into(),
        name: s(code),
        form: s(form),
        form_indicator: s(indicator),
        form_size: form_size.map(String::from),
        numerator: s(numerator.0),
        numerator_unit_of_measure: s(numerator.1),
        denominator: s(denominator.0),
        denominator_unit_of_measure: s(denominator.1),
        ingredient_count: s(ingredients),
        ..Default::default()
    }
}

fn adq(code: &str, name: &str, value: Option<&str>, denominator: &str) -> RawAdqRow {
    RawAdqRow {
        drug_code: code.into(),
        drug_name: s(name),
        adq_value: value.map(String::from),
        adq_denominator: s(denominator),
    }
}

fn squ(code: &str, squ: &str) -> RawSquRow {
    RawSquRow {
        drug_code: code.into(),
        squ: s(squ),
    }
}

/// Equal-denominator, single-ingredient unit, multi-ingredient name parse,
/// hour/"g" patch and an unresolvable multi-ingredient product.
fn fixture() -> MockSource {
    MockSource {
        products: vec![
            product("EQ01", "Oral suspension", "Continuous", None, ("250", "mg"), ("5", "ml"), "1"),
            product("UNIT01", "Tablet", "Discrete", Some("2"), ("5000", "mg"), ("1", "tablet"), "1"),
            product("MULTI01", "Powder", "Continuous", None, ("500", "mg"), ("1", "sachet"), "2"),
            product("PATCH01", "Transdermal patch", "Discrete", None, ("25", "mcg"), ("1", "hour"), "1"),
            product("MULTI02", "Chewable tablet", "Discrete", None, ("500", "mg"), ("1", "tablet"), "3"),
            product("EQ01", "Oral suspension", "Continuous", None, ("250", "mg"), ("5", "ml"), "1"),
            product("ORPHAN", "Tablet", "Discrete", None, ("1", "mg"), ("1", "tablet"), "1"),
        ],
        adqs: vec![
            adq("EQ01", "Amoxicillin 250mg/5ml oral suspension", Some("20"), "ml"),
            adq("UNIT01", "Calcium carbonate 5g tablets", Some("10"), "g"),
            adq("MULTI01", "Peptac 500mg/267mg 2g powder", Some("4"), "g"),
            adq("PATCH01", "Fentanyl 25micrograms/hour patches", Some("0.0012"), "g"),
            adq("MULTI02", "Gaviscon Advance tablets", Some("2"), "g"),
            adq("NOVALUE", "Nothing published", None, "g"),
        ],
        squs: vec![
            squ("EQ01", "3"),
            squ("UNIT01", "1"),
            squ("MULTI01", "1"),
            squ("PATCH01", "1"),
            squ("MULTI02", "1"),
            squ("NOVALUE", "1"),
        ],
    }
}

#[test]
fn end_to_end_fixture_resolves_expected_rows() {
    let config = default_config().unwrap();
    let result = compute_adqs(&fixture(), &config).unwrap();

    let resolved: Vec<(&str, f64)> = result
        .rows
        .iter()
        .map(|r| (r.drug_code.as_str(), r.adq_per_quantity))
        .collect();
    assert_eq!(
        resolved,
        vec![("EQ01", 0.05), ("UNIT01", 1.0), ("MULTI01", 0.5)]
    );

    assert_eq!(result.rows[0].quantity_denominator, Some(Unit::Millilitre));
    assert_eq!(result.rows[1].quantity_denominator, Some(Unit::Unit));
    assert_eq!(result.rows[1].adq_denominator, Unit::Gram);
}

#[test]
fn end_to_end_summary_counts() {
    let config = default_config().unwrap();
    let result = compute_adqs(&fixture(), &config).unwrap();
    let summary = &result.summary;

    assert_eq!(summary.product_rows, 7);
    assert_eq!(summary.adq_rows, 6);
    assert_eq!(summary.adq_rows_without_value, 1);
    assert_eq!(summary.joined_rows, 6);
    assert_eq!(summary.resolved_rows, 4);
    assert_eq!(summary.superseded_rows, 1);
    assert_eq!(summary.output_rows, 3);
    assert_eq!(summary.unresolved.get(&Unresolved::IrreducibleAmbiguity), Some(&1));
    assert_eq!(summary.unresolved.get(&Unresolved::NoNameQuantity), Some(&1));
    assert_eq!(summary.unresolved_rows(), 2);
}

#[test]
fn join_integrity() {
    let source = fixture();
    let config = default_config().unwrap();
    let result = compute_adqs(&source, &config).unwrap();

    let codes = |rows: Vec<&String>| rows.into_iter().cloned().collect::<HashSet<String>>();
    let products = codes(source.products.iter().map(|r| &r.drug_code).collect());
    let adqs = codes(
        source
            .adqs
            .iter()
            .filter(|r| r.adq_value.is_some())
            .map(|r| &r.drug_code)
            .collect(),
    );
    let squs = codes(source.squs.iter().map(|r| &r.drug_code).collect());

    let smallest = products.len().min(adqs.len()).min(squs.len());
    assert!(result.rows.len() <= smallest);
    for row in &result.rows {
        assert!(products.contains(&row.drug_code));
        assert!(adqs.contains(&row.drug_code));
        assert!(squs.contains(&row.drug_code));
    }
}

#[test]
fn hour_patch_never_resolves() {
    let config = default_config().unwrap();
    let mut source = fixture();
    // Even with an SQU in grams and a single ingredient in grams.
    source.squs = vec![squ("PATCH01", "6")];
    let result = compute_adqs(&source, &config).unwrap();
    assert!(result.rows.is_empty());
    assert_eq!(
        result.summary.unresolved.get(&Unresolved::IrreducibleAmbiguity),
        Some(&1)
    );
}

#[test]
fn latest_squ_observation_drives_classification() {
    let config = default_config().unwrap();
    let mut source = fixture();
    // EQ01 was first counted in units, later in ml.
    source.squs.insert(0, squ("EQ01", "1"));
    let result = compute_adqs(&source, &config).unwrap();
    assert_eq!(result.rows[0].drug_code, "EQ01");
    assert_eq!(result.rows[0].quantity_denominator, Some(Unit::Millilitre));
}

#[test]
fn unknown_squ_code_fails_the_run() {
    let config = default_config().unwrap();
    let mut source = fixture();
    source.squs.push(squ("EQ01", "7"));
    let err = compute_adqs(&source, &config).unwrap_err();
    assert!(matches!(err, AdqError::UnknownSquCode { ref code, .. } if code == "7"));
}

#[test]
fn malformed_numerator_only_affects_its_row() {
    let config = default_config().unwrap();
    let mut source = fixture();
    source.products[1].numerator = s("five grams");
    let result = compute_adqs(&source, &config).unwrap();

    let codes: Vec<&str> = result.rows.iter().map(|r| r.drug_code.as_str()).collect();
    assert_eq!(codes, vec!["EQ01", "MULTI01"]);
    assert_eq!(result.summary.malformed_numerics, 1);
    assert_eq!(
        result.summary.unresolved.get(&Unresolved::MalformedNumeric),
        Some(&1)
    );
}

#[test]
fn malformed_form_size_or_ingredient_count_excludes_the_row() {
    let config = default_config().unwrap();
    let source = MockSource {
        products: vec![
            product("FS01", "Tablet", "Discrete", Some("2 x"), ("5", "g"), ("1", "tablet"), "1"),
            product("IC01", "Tablet", "Discrete", Some("2"), ("5", "g"), ("1", "tablet"), "one"),
            product("OK01", "Tablet", "Discrete", Some("2"), ("5", "g"), ("1", "tablet"), "1"),
        ],
        adqs: vec![
            adq("FS01", "X 5g tablets", Some("10"), "g"),
            adq("IC01", "Y 3g", Some("10"), "g"),
            adq("OK01", "Z 5g tablets", Some("10"), "g"),
        ],
        squs: vec![squ("FS01", "1"), squ("IC01", "1"), squ("OK01", "1")],
    };

    let result = compute_adqs(&source, &config).unwrap();
    let resolved: Vec<(&str, f64)> = result
        .rows
        .iter()
        .map(|r| (r.drug_code.as_str(), r.adq_per_quantity))
        .collect();
    assert_eq!(resolved, vec![("OK01", 1.0)]);
    assert_eq!(result.summary.malformed_numerics, 2);
    assert_eq!(
        result.summary.unresolved.get(&Unresolved::MalformedNumeric),
        Some(&2)
    );
}

#[test]
fn inspect_reports_branch_and_reason() {
    let config = default_config().unwrap();
    let tables = load_tables(&fixture(), &config).unwrap();

    let rows = inspect_drug(&tables, &config, "UNIT01");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].numerator, Some(5.0));
    assert_eq!(rows[0].reconciled_adq_denominator, Some(Unit::Gram));
    assert!(matches!(rows[0].outcome, Reconciliation::Resolved { .. }));

    let rows = inspect_drug(&tables, &config, "MULTI02");
    assert_eq!(
        rows[0].outcome,
        Reconciliation::Unresolved {
            reason: Unresolved::NoNameQuantity
        }
    );

    assert_eq!(inspect_drug(&tables, &config, "EQ01").len(), 2);
    assert!(inspect_drug(&tables, &config, "ORPHAN").is_empty());
}

// ---------------------------------------------------------------------------
// CSV files
// ---------------------------------------------------------------------------

const PRODUCTS_CSV: &str = "\
drug_code,name,vpid,form,form_indicator,form_size,form_units,unit_of_measure,numerator,numerator_unit_of_measure,denominator,denominator_unit_of_measure,ingredient_count
0501013B0AAABAB,Amoxicillin 250mg/5ml oral suspension,321,Oral suspension,Continuous,,,,250,mg,5,ml,1
0906040G0AAAFAF,Calcium 1.25g chewable tablets,654,Chewable tablet,Discrete,2,,tablet,\"1,250\",mg,1,tablet,1
";

const ADQS_CSV: &str = "\
bnf_code,bnf_name,adq_value,adq_denominator
0501013B0AAABAB,Amoxicillin 250mg/5ml oral suspension,15,ml
0906040G0AAAFAF,Calcium 1.25g chewable tablets,\"2,500\",mg
";

const SQUS_CSV: &str = "\
drug_code,squ
0501013B0AAABAB,3
0906040G0AAAFAF,1
";

#[test]
fn csv_tables_with_original_column_names() {
    let dir = tempfile::tempdir().unwrap();
    let products = dir.path().join("products.csv");
    let adqs = dir.path().join("adqs.csv");
    let squs = dir.path().join("squs.csv");
    std::fs::write(&products, PRODUCTS_CSV).unwrap();
    std::fs::write(&adqs, ADQS_CSV).unwrap();
    std::fs::write(&squs, SQUS_CSV).unwrap();

    let config = default_config().unwrap();
    let result = compute_adqs(&CsvTables::new(&products, &adqs, &squs), &config).unwrap();

    assert_eq!(result.rows.len(), 2);
    assert_eq!(result.rows[0].vpid.as_deref(), Some("321"));
    assert_eq!(result.rows[0].adq_per_quantity, 1.0 / 15.0);
    // 2 tablets of 1.25 g against an ADQ of 2.5 g
    assert_eq!(result.rows[1].adq_per_quantity, 1.0);

    let out = dir.path().join("out.csv");
    write_csv_file(&out, &result.rows).unwrap();
    let written: Vec<AdqPerQuantity> = read_csv_file(&out).unwrap();
    assert_eq!(written.len(), 2);
    assert_eq!(written[0].drug_code, "0501013B0AAABAB");
    assert_eq!(written[0].quantity_denominator, Some(Unit::Millilitre));
}

#[test]
fn missing_table_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.csv");
    let source = CsvTables::new(&missing, &missing, &missing);
    let config = default_config().unwrap();
    assert!(matches!(
        compute_adqs(&source, &config),
        Err(AdqError::TableLoad { .. })
    ));
}
