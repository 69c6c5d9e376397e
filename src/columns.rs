//! Column resolution: pick the state-code and value columns, explicitly or by content.

use crate::error::{ColumnRole, MapError, Result};
use crate::registry::normalize_code;
use crate::table::{Cell, RawTable};
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

static CODE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z]{2}$").expect("static regex")
});

/// Tunable detection thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionThresholds {
    /// Minimum fraction of non-empty cells shaped like a state code.
    pub state_match_ratio: f64,
    /// Minimum fraction of non-empty cells that are numeric.
    pub numeric_ratio: f64,
    /// How many non-empty cells per column are inspected.
    pub sample_size: usize,
}

impl Default for DetectionThresholds {
    fn default() -> Self {
        Self {
            state_match_ratio: 0.8,
            numeric_ratio: 0.8,
            sample_size: 100,
        }
    }
}

/// Optional explicit column names supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSpec {
    pub state: Option<String>,
    pub value: Option<String>,
}

impl ColumnSpec {
    pub fn new(state: Option<&str>, value: Option<&str>) -> Self {
        Self {
            state: state.map(str::to_string),
            value: value.map(str::to_string),
        }
    }
}

/// Resolved column indices (into `RawTable::headers`) and their header names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub state: usize,
    pub value: usize,
    pub state_name: String,
    pub value_name: String,
}

#[derive(Debug, Default, Clone, Copy)]
struct ColumnProfile {
    non_empty: usize,
    code_like: usize,
    numeric: usize,
}

impl ColumnProfile {
    fn code_ratio(self) -> f64 {
        if self.non_empty == 0 {
            0.0
        } else {
            self.code_like as f64 / self.non_empty as f64
        }
    }

    fn numeric_ratio(self) -> f64 {
        if self.non_empty == 0 {
            0.0
        } else {
            self.numeric as f64 / self.non_empty as f64
        }
    }
}

fn profile_column(table: &RawTable, idx: usize, sample_size: usize) -> ColumnProfile {
    let mut profile = ColumnProfile::default();
    for cell in table.column(idx).filter(|c| !c.is_missing()).take(sample_size) {
        profile.non_empty += 1;
        if cell.is_numeric() {
            profile.numeric += 1;
        }
        if matches!(cell, Cell::Text(s) if CODE_PATTERN.is_match(&normalize_code(s))) {
            profile.code_like += 1;
        }
    }
    profile
}

fn explicit_index(table: &RawTable, name: &str, role: ColumnRole) -> Result<usize> {
    table.column_index(name).ok_or_else(|| {
        MapError::invalid_input(format!(
            "{role} column '{name}' not found (columns: {})",
            table.headers.join(", ")
        ))
    })
}

fn single_candidate(table: &RawTable, candidates: Vec<usize>, role: ColumnRole) -> Result<usize> {
    match candidates.as_slice() {
        [only] => Ok(*only),
        _ => Err(MapError::AmbiguousColumns {
            role,
            candidates: candidates
                .iter()
                .map(|&i| table.headers[i].clone())
                .collect(),
        }),
    }
}

/// Resolve which columns hold state codes and values.
///
/// Explicit names win. Otherwise a column qualifies as the state column when enough of
/// its cells look like two-letter codes, and as the value column when enough of its
/// cells are numeric. Exactly one candidate per role is accepted.
pub fn resolve_columns(
    table: &RawTable,
    spec: &ColumnSpec,
    thresholds: &DetectionThresholds,
) -> Result<ResolvedColumns> {
    if table.headers.is_empty() {
        return Err(MapError::invalid_input("table has no columns"));
    }
    if table.rows.is_empty() {
        return Err(MapError::invalid_input("data is empty"));
    }
    let profiles: Vec<ColumnProfile> = (0..table.headers.len())
        .map(|idx| profile_column(table, idx, thresholds.sample_size))
        .collect();

    let state = match spec.state.as_deref() {
        Some(name) => explicit_index(table, name, ColumnRole::State)?,
        None => {
            let candidates = profiles
                .iter()
                .enumerate()
                .filter(|(_, p)| p.non_empty > 0 && p.code_ratio() >= thresholds.state_match_ratio)
                .map(|(i, _)| i)
                .collect();
            single_candidate(table, candidates, ColumnRole::State)?
        }
    };

    let value = match spec.value.as_deref() {
        Some(name) => explicit_index(table, name, ColumnRole::Value)?,
        None => {
            let candidates = profiles
                .iter()
                .enumerate()
                .filter(|(i, p)| {
                    *i != state && p.non_empty > 0 && p.numeric_ratio() >= thresholds.numeric_ratio
                })
                .map(|(i, _)| i)
                .collect();
            single_candidate(table, candidates, ColumnRole::Value)?
        }
    };

    if state == value {
        return Err(MapError::invalid_input(format!(
            "state and value columns are the same ('{}')",
            table.headers[state]
        )));
    }

    debug!(
        "resolved columns: state='{}' value='{}'",
        table.headers[state], table.headers[value]
    );
    Ok(ResolvedColumns {
        state,
        value,
        state_name: table.headers[state].clone(),
        value_name: table.headers[value].clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| Cell::from(*c)).collect())
                .collect(),
        )
    }

    #[test]
    fn explicit_value_column_skips_detection() {
        let t = table(
            &["abbr", "pop", "gdp"],
            &[&["CA", "1", "2"], &["TX", "3", "4"]],
        );
        let spec = ColumnSpec::new(None, Some("gdp"));
        let got = resolve_columns(&t, &spec, &DetectionThresholds::default()).unwrap();
        assert_eq!((got.state, got.value), (0, 2));
    }

    #[test]
    fn threshold_is_inclusive() {
        // 4 of 5 cells are code-shaped: exactly 0.8
        let t = table(
            &["s", "v"],
            &[&["CA", "1"], &["TX", "2"], &["NY", "3"], &["FL", "4"], &["Texas", "5"]],
        );
        let got = resolve_columns(&t, &ColumnSpec::default(), &DetectionThresholds::default());
        assert_eq!(got.unwrap().state, 0);

        let strict = DetectionThresholds {
            state_match_ratio: 0.81,
            ..DetectionThresholds::default()
        };
        let err = resolve_columns(&t, &ColumnSpec::default(), &strict).unwrap_err();
        assert!(matches!(
            err,
            MapError::AmbiguousColumns {
                role: ColumnRole::State,
                ..
            }
        ));
    }
}
