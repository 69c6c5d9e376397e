use std::fs;
use tempfile::tempdir;
use usmap_rs::registry::STATES;
use usmap_rs::{MapError, MapPlotter, RawTable, RejectReason, ValidatedEntry};

#[test]
fn json_export_round_trips_entries() {
    let pairs: Vec<(&str, f64)> = STATES.iter().map(|s| (s.code, 1.5)).collect();
    let p = MapPlotter::from_table(&RawTable::from_pairs("state", "value", &pairs)).unwrap();
    let dir = tempdir().unwrap();
    let out = dir.path().join("clean.json");
    p.export_data(&out).unwrap();
    let back: Vec<ValidatedEntry> = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(back.as_slice(), p.entries());
}

#[test]
fn csv_export_has_fixed_header() {
    let t = RawTable::from_pairs("abbr", "amount", &[("ny", 3.0), ("NJ", 4.25)]);
    let p = MapPlotter::from_table(&t).unwrap();
    let dir = tempdir().unwrap();
    let out = dir.path().join("clean.csv");
    p.export_data(&out).unwrap();
    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "code,name,value\nNY,New York,3.0\nNJ,New Jersey,4.25\n"
    );
}

#[test]
fn load_from_csv_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.csv");
    fs::write(&input, "State,Sales,Region\nca,100,West\nTX,200,South\nZZ,5,None\n").unwrap();
    let p = MapPlotter::from_path(&input).unwrap();
    assert_eq!(p.columns().state_name, "State");
    assert_eq!(p.columns().value_name, "Sales");
    assert_eq!(p.entries().len(), 2);
    assert_eq!(p.report().unknown_codes(), 1);
}

#[test]
fn missing_file_is_invalid_input() {
    let err = MapPlotter::from_path("/definitely/not/here.csv").unwrap_err();
    assert!(matches!(err, MapError::InvalidInput { .. }));
}

#[test]
fn header_only_csv_is_invalid_input() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("empty.csv");
    fs::write(&input, "state,value\n").unwrap();
    let err = MapPlotter::from_path(&input).unwrap_err();
    match err {
        MapError::InvalidInput { reason } => assert_eq!(reason, "data is empty"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn sparse_value_column_is_detected() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("sparse.csv");
    fs::write(&input, "state,value\nCA,10\nTX,NA\nNY,null\nFL,N/A\nWA,20\n").unwrap();
    let p = MapPlotter::from_path(&input).unwrap();
    assert_eq!(p.columns().value_name, "value");
    assert_eq!(p.entries().len(), 2);
    assert_eq!(p.report().missing_data(), 3);
}

#[cfg(feature = "excel")]
#[test]
fn load_from_workbook_fixture() {
    let input = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/states.xlsx");
    let p = MapPlotter::from_path(&input).unwrap();
    assert_eq!(p.columns().state_name, "State");
    assert_eq!(p.columns().value_name, "Sales");
    let got: Vec<(&str, f64)> = p.entries().iter().map(|e| (e.code.as_str(), e.value)).collect();
    assert_eq!(got, vec![("CA", 100.0), ("TX", 250.5)]);
    assert_eq!(p.report().count(RejectReason::MissingValue), 1);
    assert_eq!(p.report().unknown_codes(), 1);
}
