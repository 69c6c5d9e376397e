//! Row-oriented tabular input: CSV files, spreadsheet workbooks, or tables built in memory.

use crate::error::{MapError, Result};
use csv::ReaderBuilder;
use log::debug;
use std::path::Path;

/// Markers treated as an explicitly missing value, compared case-insensitively.
const MISSING_MARKERS: [&str; 6] = ["na", "n/a", "nan", "null", "none", "-"];

/// One raw cell as read from the source.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// Cell content as text (numbers in their shortest form, empty cells as "").
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(v) => v.to_string(),
        }
    }

    /// Empty, NaN, or an explicit missing marker (`NA`, `N/A`, `null`...).
    pub fn is_missing(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Number(v) => v.is_nan(),
            Cell::Text(s) => {
                let t = s.trim();
                t.is_empty() || MISSING_MARKERS.contains(&t.to_ascii_lowercase().as_str())
            }
        }
    }

    /// True when the cell holds, or parses as, a finite number.
    pub fn is_numeric(&self) -> bool {
        match self {
            Cell::Empty => false,
            Cell::Text(s) => s.trim().parse::<f64>().is_ok_and(f64::is_finite),
            Cell::Number(v) => v.is_finite(),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Number(v)
    }
}

impl From<i64> for Cell {
    fn from(v: i64) -> Self {
        Cell::Number(v as f64)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Cell::Empty)
    }
}

/// Header row plus data rows. Rows are padded to the header width.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    /// Headers are normalized the same way the file readers do it.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let headers: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Empty);
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Two-column table from `(code, value)` pairs.
    pub fn from_pairs<C, V>(state_header: &str, value_header: &str, pairs: &[(C, V)]) -> Self
    where
        C: AsRef<str>,
        V: Clone + Into<Cell>,
    {
        let rows = pairs
            .iter()
            .map(|(code, value)| vec![Cell::from(code.as_ref()), value.clone().into()])
            .collect();
        Self::new(vec![state_header.to_string(), value_header.to_string()], rows)
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() || self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = normalize_header(name);
        self.headers.iter().position(|h| *h == wanted)
    }

    /// Iterate over one column's cells.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = &Cell> {
        self.rows.iter().filter_map(move |row| row.get(idx))
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_cell(raw: &str) -> Cell {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    if trimmed.is_empty() {
        Cell::Empty
    } else {
        Cell::Text(trimmed.to_string())
    }
}

/// Load a table, choosing the reader from the file extension.
///
/// `.csv`/`.txt` use the CSV reader; `.xlsx`/`.xlsm`/`.xls`/`.ods` need the `excel` feature.
pub fn load_path<P: AsRef<Path>>(path: P) -> Result<RawTable> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(MapError::invalid_input(format!(
            "file not found: {}",
            path.display()
        )));
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "csv" | "txt" => read_csv(path),
        "xlsx" | "xlsm" | "xls" | "ods" => read_workbook(path),
        other => Err(MapError::invalid_input(format!(
            "unsupported file format: .{other} ({})",
            path.display()
        ))),
    }
}

/// Read a delimited text table; the first non-blank row is the header.
pub fn read_csv(path: &Path) -> Result<RawTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|source| MapError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    let mut records = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| MapError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        records.push(record);
    }
    let mut iter = records.into_iter();
    let Some(header) = iter.next() else {
        return Err(MapError::invalid_input(format!(
            "no header row in {}",
            path.display()
        )));
    };
    let headers: Vec<String> = header.iter().map(str::to_string).collect();
    let rows: Vec<Vec<Cell>> = iter
        .map(|record| record.iter().map(normalize_cell).collect())
        .collect();
    debug!(
        "read {} data rows x {} columns from {}",
        rows.len(),
        headers.len(),
        path.display()
    );
    Ok(RawTable::new(headers, rows))
}

#[cfg(feature = "excel")]
fn read_workbook(path: &Path) -> Result<RawTable> {
    use calamine::{Data, Reader, open_workbook_auto};

    let workbook_err = |reason: String| MapError::Workbook {
        path: path.to_path_buf(),
        reason,
    };
    let mut workbook = open_workbook_auto(path).map_err(|e| workbook_err(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| workbook_err("workbook has no sheets".into()))?
        .map_err(|e| workbook_err(e.to_string()))?;

    let to_cell = |data: &Data| match data {
        Data::Empty => Cell::Empty,
        Data::Float(v) => Cell::Number(*v),
        Data::Int(v) => Cell::Number(*v as f64),
        Data::String(s) => normalize_cell(s),
        other => normalize_cell(&other.to_string()),
    };

    let mut rows = range
        .rows()
        .filter(|row| row.iter().any(|c| !matches!(c, Data::Empty)));
    let Some(header) = rows.next() else {
        return Err(MapError::invalid_input(format!(
            "no header row in {}",
            path.display()
        )));
    };
    let headers: Vec<String> = header.iter().map(|c| c.to_string()).collect();
    let rows: Vec<Vec<Cell>> = rows.map(|row| row.iter().map(to_cell).collect()).collect();
    Ok(RawTable::new(headers, rows))
}

#[cfg(not(feature = "excel"))]
fn read_workbook(path: &Path) -> Result<RawTable> {
    Err(MapError::invalid_input(format!(
        "reading {} needs spreadsheet support; rebuild usmap-rs with the `excel` feature",
        path.display()
    )))
}
