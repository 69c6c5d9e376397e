//! usmap_rs
//!
//! Validate US state-level data, summarize it, and render it as a tile-grid
//! choropleth map. Pairs with the `usmap` CLI.
//!
//! ### Features
//! - Load CSV files and `.xlsx`/`.xls`/`.ods` workbooks (default `excel` feature)
//! - Auto-detect the state-code and value columns, or name them explicitly
//! - Drop unknown codes, duplicates and non-numeric values, with a per-row report
//! - Summary statistics (count, mean, median, std, min, max, coverage)
//! - Interactive HTML, SVG and PNG maps; pluggable backends for other formats
//!
//! ### Example
//! ```no_run
//! use std::path::Path;
//! use usmap_rs::{MapPlotter, PlotConfigUpdate};
//!
//! let mut plotter = MapPlotter::from_path("state_data.csv")?;
//! plotter.customize(
//!     &PlotConfigUpdate::new()
//!         .color_scheme("Viridis")
//!         .title("Sales by State"),
//! )?;
//! print!("{}", plotter.summary());
//! plotter.plot(Some(Path::new("sales.html")))?;
//! plotter.export_data("clean.csv")?;
//! # Ok::<(), usmap_rs::MapError>(())
//! ```

pub mod columns;
pub mod config;
pub mod error;
pub mod models;
pub mod plotter;
pub mod registry;
pub mod stats;
pub mod storage;
pub mod table;
pub mod validate;
pub mod viz;
pub mod viz_plotters_adapter;

pub use columns::{ColumnSpec, DetectionThresholds, ResolvedColumns};
pub use config::{PlotConfig, PlotConfigUpdate, ScaleType, Style};
pub use error::{ColumnRole, ExportError, MapError, Result};
pub use models::{RejectReason, Rejection, ValidatedEntry, ValidationReport};
pub use plotter::{LoadOptions, MapPlotter, quick_plot};
pub use registry::StateRecord;
pub use stats::SummaryStats;
pub use table::{Cell, RawTable};
pub use viz::Figure;
