//! `MapPlotter`: one dataset, one configuration, any number of renders.

use crate::columns::{ColumnSpec, DetectionThresholds, ResolvedColumns, resolve_columns};
use crate::config::{PlotConfig, PlotConfigUpdate};
use crate::error::Result;
use crate::models::{ValidatedEntry, ValidationReport};
use crate::stats::{SummaryStats, summarize};
use crate::storage;
use crate::table::{RawTable, load_path};
use crate::validate::validate;
use crate::viz::text::format_value;
use crate::viz::{self, BackendRegistry, Figure, ScaleStrategy, StaticBackend};
use log::info;
use std::fmt::Write;
use std::path::{Path, PathBuf};

/// How to interpret the input when building a [`MapPlotter`].
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub columns: ColumnSpec,
    pub thresholds: DetectionThresholds,
    /// Applied on top of the defaults before the plotter is returned.
    pub config: PlotConfigUpdate,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state_column(mut self, name: impl Into<String>) -> Self {
        self.columns.state = Some(name.into());
        self
    }

    pub fn value_column(mut self, name: impl Into<String>) -> Self {
        self.columns.value = Some(name.into());
        self
    }

    pub fn thresholds(mut self, t: DetectionThresholds) -> Self {
        self.thresholds = t;
        self
    }

    pub fn config(mut self, update: PlotConfigUpdate) -> Self {
        self.config = update;
        self
    }
}

/// Validated state data plus the configuration used to draw it.
///
/// Rendering never mutates the plotter; `customize` only replaces the config
/// when the merged result validates.
#[derive(Debug)]
pub struct MapPlotter {
    columns: ResolvedColumns,
    entries: Vec<ValidatedEntry>,
    report: ValidationReport,
    config: PlotConfig,
    custom_scale: Option<Box<dyn ScaleStrategy>>,
    backends: BackendRegistry,
}

impl MapPlotter {
    /// Load a CSV (or workbook, with the `excel` feature) and auto-detect columns.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_path_with(path, &LoadOptions::default())
    }

    pub fn from_path_with<P: AsRef<Path>>(path: P, opts: &LoadOptions) -> Result<Self> {
        let path = path.as_ref();
        let table = load_path(path)?;
        info!(
            "loaded {} rows x {} columns from {}",
            table.rows.len(),
            table.headers.len(),
            path.display()
        );
        Self::from_table_with(&table, opts)
    }

    pub fn from_table(table: &RawTable) -> Result<Self> {
        Self::from_table_with(table, &LoadOptions::default())
    }

    pub fn from_table_with(table: &RawTable, opts: &LoadOptions) -> Result<Self> {
        let columns = resolve_columns(table, &opts.columns, &opts.thresholds)?;
        let validated = validate(table, &columns)?;
        let config = PlotConfig::default().merge(&opts.config)?;
        info!(
            "validated {} states ({} rows rejected); state column `{}`, value column `{}`",
            validated.entries.len(),
            validated.report.rejected.len(),
            columns.state_name,
            columns.value_name
        );
        Ok(Self {
            columns,
            entries: validated.entries,
            report: validated.report,
            config,
            custom_scale: None,
            backends: BackendRegistry::default(),
        })
    }

    pub fn entries(&self) -> &[ValidatedEntry] {
        &self.entries
    }

    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    pub fn columns(&self) -> &ResolvedColumns {
        &self.columns
    }

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    /// Apply a partial update. On error the current config is kept.
    pub fn customize(&mut self, update: &PlotConfigUpdate) -> Result<&mut Self> {
        self.config = self.config.merge(update)?;
        Ok(self)
    }

    /// Strategy used when `scale_type` is `custom`; overrides `custom_bins`.
    pub fn set_scale_strategy(&mut self, strategy: Box<dyn ScaleStrategy>) -> &mut Self {
        self.custom_scale = Some(strategy);
        self
    }

    /// Add a static export backend (PDF, JPEG...). Later registrations win.
    pub fn register_backend(&mut self, backend: Box<dyn StaticBackend>) -> &mut Self {
        self.backends.register(backend);
        self
    }

    pub fn statistics(&self) -> SummaryStats {
        summarize(&self.entries)
    }

    /// Human-readable summary block.
    pub fn summary(&self) -> String {
        let stats = self.statistics();
        let fmt = |v: Option<f64>| v.map(format_value).unwrap_or_else(|| "NA".to_string());
        let rule = "=".repeat(60);
        let mut s = String::new();
        let _ = writeln!(s, "{rule}");
        let _ = writeln!(s, "US MAP DATA SUMMARY");
        let _ = writeln!(s, "{rule}");
        let _ = writeln!(s, "States with data: {}/{}", stats.count, stats.total_states);
        let _ = writeln!(s, "Missing states: {}", stats.missing_states.len());
        let _ = writeln!(s, "Coverage: {:.1}%", stats.coverage() * 100.0);
        let _ = writeln!(s);
        let _ = writeln!(s, "{} Statistics:", self.config.value_label);
        let _ = writeln!(s, "  Mean:   {}", fmt(stats.mean));
        let _ = writeln!(s, "  Median: {}", fmt(stats.median));
        let _ = writeln!(s, "  Std:    {}", format_value(stats.std));
        let _ = writeln!(s, "  Min:    {}", fmt(stats.min));
        let _ = writeln!(s, "  Max:    {}", fmt(stats.max));
        let _ = writeln!(s, "{rule}");
        s
    }

    /// Lay out the figure for the current data and config.
    pub fn figure(&self) -> Result<Figure> {
        viz::render(&self.entries, &self.config, self.custom_scale.as_deref())
    }

    /// Render, and save when `save_as` is given. Returns the figure and the written path.
    pub fn plot(&self, save_as: Option<&Path>) -> Result<(Figure, Option<PathBuf>)> {
        let figure = self.figure()?;
        let written = match save_as {
            Some(p) => Some(viz::save(&figure, p, &self.backends)?),
            None => None,
        };
        Ok((figure, written))
    }

    /// Save an already rendered figure with this plotter's backends.
    pub fn save(&self, figure: &Figure, path: &Path) -> Result<PathBuf> {
        Ok(viz::save(figure, path, &self.backends)?)
    }

    /// Write the cleaned `{code, name, value}` table (`.json` or CSV).
    pub fn export_data<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        storage::save_entries(&self.entries, path)?;
        Ok(())
    }
}

/// One-shot helper: load, set title and scheme, render, optionally save.
pub fn quick_plot<P: AsRef<Path>>(
    path: P,
    title: &str,
    color_scheme: &str,
    save_as: Option<&Path>,
) -> Result<Figure> {
    let mut plotter = MapPlotter::from_path(path)?;
    plotter.customize(
        &PlotConfigUpdate::new()
            .title(title)
            .color_scheme(color_scheme),
    )?;
    let (figure, _) = plotter.plot(save_as)?;
    Ok(figure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MapError;

    fn table() -> RawTable {
        RawTable::from_pairs(
            "state",
            "sales",
            &[("CA", 100.0), ("TX", 200.0), ("NY", 300.0), ("ZZ", 5.0)],
        )
    }

    #[test]
    fn customize_is_copy_on_write() {
        let mut p = MapPlotter::from_table(&table()).unwrap();
        p.customize(&PlotConfigUpdate::new().color_scheme("Viridis"))
            .unwrap();
        p.customize(&PlotConfigUpdate::new().title("X")).unwrap();
        assert_eq!(p.config().color_scheme, "Viridis");
        assert_eq!(p.config().title, "X");

        let err = p
            .customize(&PlotConfigUpdate::new().size(5, 5))
            .unwrap_err();
        assert!(matches!(err, MapError::InvalidConfig { .. }));
        assert_eq!(p.config().width, 1200);
    }

    #[test]
    fn summary_block_lists_stats() {
        let p = MapPlotter::from_table(&table()).unwrap();
        assert_eq!(p.report().unknown_codes(), 1);
        let s = p.summary();
        assert!(s.contains("US MAP DATA SUMMARY"));
        assert!(s.contains("States with data: 3/51"));
        assert!(s.contains("Missing states: 48"));
        assert!(s.contains("  Mean:   200.00"));
    }

    #[test]
    fn load_options_apply_config() {
        let opts = LoadOptions::new()
            .state_column("state")
            .value_column("sales")
            .config(PlotConfigUpdate::new().value_label("Sales"));
        let p = MapPlotter::from_table_with(&table(), &opts).unwrap();
        assert_eq!(p.config().value_label, "Sales");
        assert_eq!(p.columns().value_name, "sales");
    }
}
