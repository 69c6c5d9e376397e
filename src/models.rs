use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One accepted row: a registered code, its full name, and a finite value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidatedEntry {
    pub code: String,
    pub name: String,
    pub value: f64,
}

/// Why a row was dropped during validation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// The state cell is empty.
    MissingCode,
    /// The state cell is not one of the 51 registered codes.
    UnknownCode,
    /// The value cell is empty or an explicit missing marker (`NA`, `NaN`, ...).
    MissingValue,
    /// The value cell does not parse as a finite number.
    NonNumericValue,
    /// The code was already accepted from an earlier row.
    DuplicateCode,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::MissingCode => "missing code",
            RejectReason::UnknownCode => "unknown code",
            RejectReason::MissingValue => "missing value",
            RejectReason::NonNumericValue => "non-numeric value",
            RejectReason::DuplicateCode => "duplicate code",
        }
    }

    /// Missing and non-numeric values both count as missing-data rows.
    pub fn is_missing_data(&self) -> bool {
        matches!(
            self,
            RejectReason::MissingValue | RejectReason::NonNumericValue
        )
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dropped input row, kept verbatim for reporting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rejection {
    /// 1-based index among data rows (the header is not counted).
    pub row: usize,
    pub raw_code: String,
    pub raw_value: String,
    pub reason: RejectReason,
}

/// Everything the validator dropped, in input order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ValidationReport {
    /// Number of data rows examined.
    pub total_rows: usize,
    pub rejected: Vec<Rejection>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    pub fn count(&self, reason: RejectReason) -> usize {
        self.rejected.iter().filter(|r| r.reason == reason).count()
    }

    pub fn duplicates(&self) -> usize {
        self.count(RejectReason::DuplicateCode)
    }

    pub fn unknown_codes(&self) -> usize {
        self.count(RejectReason::UnknownCode) + self.count(RejectReason::MissingCode)
    }

    pub fn missing_data(&self) -> usize {
        self.rejected
            .iter()
            .filter(|r| r.reason.is_missing_data())
            .count()
    }

    /// Rejection counts grouped by reason.
    pub fn by_reason(&self) -> BTreeMap<RejectReason, usize> {
        let mut out = BTreeMap::new();
        for r in &self.rejected {
            *out.entry(r.reason).or_default() += 1;
        }
        out
    }
}
