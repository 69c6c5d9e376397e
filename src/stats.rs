use crate::models::ValidatedEntry;
use crate::registry::{self, TOTAL_STATES};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Summary statistics over the value column of a validated dataset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryStats {
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    /// Sample standard deviation; 0 when fewer than two values exist.
    pub std: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Registry codes with no entry.
    pub missing_states: BTreeSet<String>,
    pub total_states: usize,
}

impl SummaryStats {
    /// Fraction of the registry present in the dataset.
    pub fn coverage(&self) -> f64 {
        (self.total_states - self.missing_states.len()) as f64 / self.total_states as f64
    }
}

/// Compute statistics from the current entries. Pure; call again after any reload.
pub fn summarize(entries: &[ValidatedEntry]) -> SummaryStats {
    let mut vals: Vec<f64> = entries.iter().map(|e| e.value).collect();
    vals.sort_by(|a, b| a.total_cmp(b));
    let count = vals.len();
    let min = vals.first().copied();
    let max = vals.last().copied();
    let mean = if count > 0 {
        Some(vals.iter().sum::<f64>() / count as f64)
    } else {
        None
    };
    let median = if count == 0 {
        None
    } else if count % 2 == 1 {
        Some(vals[count / 2])
    } else {
        Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
    };
    let std = match mean {
        Some(m) if count > 1 => {
            let ss: f64 = vals.iter().map(|v| (v - m).powi(2)).sum();
            (ss / (count - 1) as f64).sqrt()
        }
        _ => 0.0,
    };

    let present: BTreeSet<&str> = entries.iter().map(|e| e.code.as_str()).collect();
    let missing_states = registry::codes()
        .filter(|c| !present.contains(c))
        .map(str::to_string)
        .collect();

    SummaryStats {
        count,
        mean,
        median,
        std,
        min,
        max,
        missing_states,
        total_states: TOTAL_STATES,
    }
}
