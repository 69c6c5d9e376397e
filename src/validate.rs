//! Row validation: normalize codes, coerce values, drop and report bad rows.

use crate::columns::ResolvedColumns;
use crate::error::{MapError, Result};
use crate::models::{RejectReason, Rejection, ValidatedEntry, ValidationReport};
use crate::registry;
use crate::table::{Cell, RawTable};
use log::warn;
use std::collections::{BTreeSet, HashSet};

/// Validator output: accepted entries in input order plus the rejection report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Validated {
    pub entries: Vec<ValidatedEntry>,
    pub report: ValidationReport,
}

enum ValueCheck {
    Ok(f64),
    Missing,
    NonNumeric,
}

fn check_value(cell: &Cell) -> ValueCheck {
    if cell.is_missing() {
        return ValueCheck::Missing;
    }
    match cell {
        Cell::Number(v) if v.is_finite() => ValueCheck::Ok(*v),
        Cell::Text(s) => match s.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => ValueCheck::Ok(v),
            _ => ValueCheck::NonNumeric,
        },
        _ => ValueCheck::NonNumeric,
    }
}

/// Validate every data row of `table` using the resolved columns.
///
/// Never fails on bad data: unknown codes, duplicates and unusable values are dropped
/// and listed in the report. Only a structurally unusable table is an error.
pub fn validate(table: &RawTable, columns: &ResolvedColumns) -> Result<Validated> {
    if table.headers.is_empty() {
        return Err(MapError::invalid_input("table has no header row"));
    }
    if table.rows.is_empty() {
        return Err(MapError::invalid_input("data is empty"));
    }
    let width = table.headers.len();
    if columns.state >= width || columns.value >= width {
        return Err(MapError::invalid_input(format!(
            "resolved columns ({}, {}) out of range for {} columns",
            columns.state, columns.value, width
        )));
    }

    let mut entries = Vec::new();
    let mut rejected = Vec::new();
    let mut seen: HashSet<&'static str> = HashSet::new();

    for (i, row) in table.rows.iter().enumerate() {
        let code_cell = &row[columns.state];
        let value_cell = &row[columns.value];
        let reject = |reason| Rejection {
            row: i + 1,
            raw_code: code_cell.as_text(),
            raw_value: value_cell.as_text(),
            reason,
        };

        if code_cell.is_empty() {
            rejected.push(reject(RejectReason::MissingCode));
            continue;
        }
        let Some(record) = registry::lookup_normalized(&code_cell.as_text()) else {
            rejected.push(reject(RejectReason::UnknownCode));
            continue;
        };
        let value = match check_value(value_cell) {
            ValueCheck::Ok(v) => v,
            ValueCheck::Missing => {
                rejected.push(reject(RejectReason::MissingValue));
                continue;
            }
            ValueCheck::NonNumeric => {
                rejected.push(reject(RejectReason::NonNumericValue));
                continue;
            }
        };
        if !seen.insert(record.code) {
            rejected.push(reject(RejectReason::DuplicateCode));
            continue;
        }
        entries.push(ValidatedEntry {
            code: record.code.to_string(),
            name: record.name.to_string(),
            value,
        });
    }

    let unknown: BTreeSet<String> = rejected
        .iter()
        .filter(|r| r.reason == RejectReason::UnknownCode)
        .map(|r| registry::normalize_code(&r.raw_code))
        .collect();
    if !unknown.is_empty() {
        let shown: Vec<&str> = unknown.iter().take(10).map(String::as_str).collect();
        warn!(
            "invalid state codes found: {:?}{} ({} unique); these rows are ignored",
            shown,
            if unknown.len() > 10 { "..." } else { "" },
            unknown.len()
        );
    }

    Ok(Validated {
        entries,
        report: ValidationReport {
            total_rows: table.rows.len(),
            rejected,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols() -> ResolvedColumns {
        ResolvedColumns {
            state: 0,
            value: 1,
            state_name: "state".into(),
            value_name: "value".into(),
        }
    }

    #[test]
    fn codes_are_trimmed_and_uppercased() {
        let t = RawTable::from_pairs("state", "value", &[(" ca", "1.5"), ("tx ", "2")]);
        let got = validate(&t, &cols()).unwrap();
        let codes: Vec<&str> = got.entries.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, vec!["CA", "TX"]);
        assert!(got.report.is_clean());
    }

    #[test]
    fn invalid_first_occurrence_does_not_block_later_valid_row() {
        let t = RawTable::from_pairs("state", "value", &[("CA", "n/a"), ("CA", "7")]);
        let got = validate(&t, &cols()).unwrap();
        assert_eq!(got.entries.len(), 1);
        assert_eq!(got.entries[0].value, 7.0);
        assert_eq!(got.report.count(RejectReason::MissingValue), 1);
        assert_eq!(got.report.duplicates(), 0);
    }

    #[test]
    fn infinity_is_not_a_value() {
        let t = RawTable::from_pairs("state", "value", &[("CA", "inf"), ("TX", "abc")]);
        let got = validate(&t, &cols()).unwrap();
        assert!(got.entries.is_empty());
        assert_eq!(got.report.count(RejectReason::NonNumericValue), 2);
        assert_eq!(got.report.missing_data(), 2);
    }
}
