//! Static registry of the 51 recognized region codes (50 states + DC).

use ahash::AHashMap;
use std::sync::LazyLock;

/// One registry row: two-letter uppercase code and full name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateRecord {
    pub code: &'static str,
    pub name: &'static str,
}

const fn rec(code: &'static str, name: &'static str) -> StateRecord {
    StateRecord { code, name }
}

/// Number of regions a complete dataset covers.
pub const TOTAL_STATES: usize = 51;

/// All records, ordered by code.
pub const STATES: [StateRecord; TOTAL_STATES] = [
    rec("AK", "Alaska"),
    rec("AL", "Alabama"),
    rec("AR", "Arkansas"),
    rec("AZ", "Arizona"),
    rec("CA", "California"),
    rec("CO", "Colorado"),
    rec("CT", "Connecticut"),
    rec("DC", "District of Columbia"),
    rec("DE", "Delaware"),
    rec("FL", "Florida"),
    rec("GA", "Georgia"),
    rec("HI", "Hawaii"),
    rec("IA", "Iowa"),
    rec("ID", "Idaho"),
    rec("IL", "Illinois"),
    rec("IN", "Indiana"),
    rec("KS", "Kansas"),
    rec("KY", "Kentucky"),
    rec("LA", "Louisiana"),
    rec("MA", "Massachusetts"),
    rec("MD", "Maryland"),
    rec("ME", "Maine"),
    rec("MI", "Michigan"),
    rec("MN", "Minnesota"),
    rec("MO", "Missouri"),
    rec("MS", "Mississippi"),
    rec("MT", "Montana"),
    rec("NC", "North Carolina"),
    rec("ND", "North Dakota"),
    rec("NE", "Nebraska"),
    rec("NH", "New Hampshire"),
    rec("NJ", "New Jersey"),
    rec("NM", "New Mexico"),
    rec("NV", "Nevada"),
    rec("NY", "New York"),
    rec("OH", "Ohio"),
    rec("OK", "Oklahoma"),
    rec("OR", "Oregon"),
    rec("PA", "Pennsylvania"),
    rec("RI", "Rhode Island"),
    rec("SC", "South Carolina"),
    rec("SD", "South Dakota"),
    rec("TN", "Tennessee"),
    rec("TX", "Texas"),
    rec("UT", "Utah"),
    rec("VA", "Virginia"),
    rec("VT", "Vermont"),
    rec("WA", "Washington"),
    rec("WI", "Wisconsin"),
    rec("WV", "West Virginia"),
    rec("WY", "Wyoming"),
];

static BY_CODE: LazyLock<AHashMap<&'static str, &'static StateRecord>> =
    LazyLock::new(|| STATES.iter().map(|s| (s.code, s)).collect());

/// Look up a record by its exact (uppercase) code.
pub fn lookup(code: &str) -> Option<&'static StateRecord> {
    BY_CODE.get(code).copied()
}

/// Trim and upper-case a raw cell, then look it up.
pub fn lookup_normalized(raw: &str) -> Option<&'static StateRecord> {
    lookup(&normalize_code(raw))
}

/// Canonical form of a raw code cell: trimmed, ASCII upper-case.
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

/// Full name for a code, if it is registered.
pub fn name_for(code: &str) -> Option<&'static str> {
    lookup(code).map(|s| s.name)
}

/// Iterate over all codes in registry order.
pub fn codes() -> impl Iterator<Item = &'static str> {
    STATES.iter().map(|s| s.code)
}
