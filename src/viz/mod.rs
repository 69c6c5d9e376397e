//! Rendering: lay out the tile-grid choropleth and export it as **HTML**, **SVG** or **PNG**.
//!
//! - One square tile per state, placed on a fixed grid that approximates US geography
//! - Named color scales, optionally reversed; linear, log10 or custom scales
//! - Gradient color bar with compact tick labels (`1.5K`, `2M`)
//! - Static formats go through a [`BackendRegistry`]; HTML is always available

pub mod backend;
pub mod html;
pub mod layout;
pub mod palette;
pub mod scale;
pub mod text;
pub mod types;

pub use backend::{BackendRegistry, StaticBackend, SvgExporter};
#[cfg(feature = "png")]
pub use backend::PngExporter;
pub use palette::{ColorScale, Rgb8};
pub use scale::{Bins, Linear, Log, ScaleStrategy, ValueScale};
pub use types::{ColorBar, Figure, Theme, Tick, Tile};

use crate::config::{PlotConfig, ScaleType};
use crate::error::{ExportError, MapError, Result};
use crate::models::ValidatedEntry;
use crate::registry;
use crate::storage;

use log::{debug, info};
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Once;

use layout::{GRID_COLS, GRID_ROWS, grid_position};
use text::{format_value, truncate_to_width};

/// One-time registration for a fallback "sans-serif" font when using the `ab_glyph` text path.
/// Required because `ab_glyph` doesn't discover OS fonts.
static INIT_FONTS: Once = Once::new();

pub(crate) fn ensure_fonts_registered() {
    INIT_FONTS.call_once(|| {
        let _ = plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../../assets/DejaVuSans.ttf"),
        );
    });
}

/// Formats that need a static backend; anything else unknown falls back to HTML.
const STATIC_FORMATS: [&str; 6] = ["svg", "png", "pdf", "jpg", "jpeg", "webp"];

const MARGIN: i32 = 20;
const TITLE_BAND: i32 = 56;
const BAR_BAND: i32 = 90;
const BAR_MAX_WIDTH: i32 = 600;
const BAR_HEIGHT: i32 = 14;
const GRADIENT_SAMPLES: usize = 100;

/// Fit the configured scale to `values`.
///
/// `custom` is the caller-registered strategy; it only applies to `scale_type = custom`,
/// where it takes precedence over `custom_bins`.
pub fn fit_scale(
    config: &PlotConfig,
    custom: Option<&dyn ScaleStrategy>,
    values: &[f64],
) -> Result<Box<dyn ValueScale>> {
    match config.scale_type {
        ScaleType::Linear => Linear.fit(values),
        ScaleType::Log => Log.fit(values),
        ScaleType::Custom => match (custom, &config.custom_bins) {
            (Some(strategy), _) => strategy.fit(values),
            (None, Some(edges)) => Bins::new(edges.clone())?.fit(values),
            (None, None) => Err(MapError::invalid_config(
                "scale_type",
                "`custom` needs custom_bins or a registered scale strategy",
            )),
        },
    }
}

/// Lay out `entries` as a figure. Pure: nothing is written.
pub fn render(
    entries: &[ValidatedEntry],
    config: &PlotConfig,
    custom: Option<&dyn ScaleStrategy>,
) -> Result<Figure> {
    if entries.is_empty() {
        return Err(MapError::invalid_input("no valid rows to plot"));
    }
    let scheme_name = config.effective_scheme();
    let scheme = palette::scheme(scheme_name).ok_or_else(|| {
        MapError::invalid_config("color_scheme", format!("unknown color scheme `{scheme_name}`"))
    })?;
    let values: Vec<f64> = entries.iter().map(|e| e.value).collect();
    let scale = fit_scale(config, custom, &values)?;
    let missing = config.missing_rgb();
    debug!(
        "rendering {} entries with scheme {} ({} scale)",
        entries.len(),
        scheme.name,
        config.scale_type
    );

    // ----------------------------
    // 1) Grid geometry
    // ----------------------------
    let width = config.width as i32;
    let height = config.height as i32;
    let title_band = if config.title.is_empty() { 16 } else { TITLE_BAND };
    let area_w = (width - 2 * MARGIN).max(0);
    let area_h = (height - title_band - BAR_BAND - MARGIN).max(0);
    let pitch = (area_w / GRID_COLS).min(area_h / GRID_ROWS).max(4);
    let gap = (pitch / 12).max(2);
    let size = pitch - gap;
    let grid_w = pitch * GRID_COLS - gap;
    let grid_h = pitch * GRID_ROWS - gap;
    let x0 = ((width - grid_w) / 2).max(0);
    let y0 = title_band + ((area_h - grid_h) / 2).max(0);

    // ----------------------------
    // 2) Tiles in registry order
    // ----------------------------
    let by_code: HashMap<&str, &ValidatedEntry> =
        entries.iter().map(|e| (e.code.as_str(), e)).collect();
    let mut tiles = Vec::with_capacity(registry::TOTAL_STATES);
    for record in registry::STATES.iter() {
        let Some((row, col)) = grid_position(record.code) else {
            continue;
        };
        let (value, fill, tooltip) = match by_code.get(record.code) {
            Some(e) => {
                let fill = scale
                    .position(e.value)
                    .map(|t| scheme.color_at(t, config.reverse_scale))
                    .unwrap_or(missing);
                let tip = format!(
                    "{}\n{}: {}",
                    record.name,
                    config.value_label,
                    format_value(e.value)
                );
                (Some(e.value), fill, tip)
            }
            None if config.show_missing => (None, missing, format!("{}\nNo data", record.name)),
            None => continue,
        };
        tiles.push(Tile {
            code: record.code.to_string(),
            name: record.name.to_string(),
            value,
            fill,
            x: x0 + col * pitch,
            y: y0 + row * pitch,
            size,
            tooltip,
        });
    }

    // ----------------------------
    // 3) Color bar
    // ----------------------------
    let bar_w = grid_w.min(BAR_MAX_WIDTH).max(0);
    let gradient = (0..GRADIENT_SAMPLES)
        .map(|i| {
            let t = i as f64 / (GRADIENT_SAMPLES - 1) as f64;
            scheme.color_at(scale.quantize(t), config.reverse_scale)
        })
        .collect();
    let color_bar = ColorBar {
        x: (width - bar_w) / 2,
        y: title_band + area_h + 34,
        width: bar_w,
        height: BAR_HEIGHT,
        gradient,
        ticks: scale.ticks(),
        label: truncate_to_width(&config.value_label, 13, bar_w.max(0) as u32),
    };

    Ok(Figure {
        title: truncate_to_width(&config.title, 22, (width - 2 * MARGIN).max(0) as u32),
        value_label: config.value_label.clone(),
        width: config.width,
        height: config.height,
        theme: config.style.theme(),
        scheme: scheme.name.to_string(),
        scale_type: config.scale_type,
        tiles,
        color_bar,
    })
}

fn with_html_suffix(path: &Path) -> PathBuf {
    let mut s: OsString = path.as_os_str().to_owned();
    s.push(".html");
    PathBuf::from(s)
}

fn unavailable_hint(ext: &str) -> String {
    if ext == "png" && cfg!(not(feature = "png")) {
        return "PNG export needs the `png` cargo feature; rebuild with `--features png` or save as .svg/.html".to_string();
    }
    "no backend registered for this format; register one with `MapPlotter::register_backend` or save as .svg/.html".to_string()
}

/// Write `figure` to `path`, choosing the format from the extension.
///
/// Returns the path actually written: unknown or missing extensions produce HTML at
/// `<path>.html`. Failures never modify an existing file.
pub fn save(
    figure: &Figure,
    path: &Path,
    backends: &BackendRegistry,
) -> std::result::Result<PathBuf, ExportError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let html_target = match ext.as_deref() {
        Some("html" | "htm") => Some(path.to_path_buf()),
        Some(e) if STATIC_FORMATS.contains(&e) => None,
        Some(e) if backends.find(e).is_some() => None,
        _ => Some(with_html_suffix(path)),
    };
    if let Some(target) = html_target {
        storage::write_string(&target, &figure.to_html())?;
        info!("saved interactive map to {}", target.display());
        return Ok(target);
    }

    // Static format: ext is Some here.
    let ext = ext.unwrap_or_default();
    let Some(backend) = backends.find(&ext) else {
        return Err(ExportError::BackendUnavailable {
            hint: unavailable_hint(&ext),
            format: ext,
        });
    };
    storage::write_atomically(path, |tmp| backend.render(figure, tmp))?;
    info!("saved {} map to {} ({})", ext, path.display(), backend.name());
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlotConfigUpdate;

    fn entries() -> Vec<ValidatedEntry> {
        [("CA", 100.0), ("TX", 200.0), ("NY", 300.0)]
            .iter()
            .map(|(c, v)| ValidatedEntry {
                code: c.to_string(),
                name: registry::name_for(c).unwrap_or_default().to_string(),
                value: *v,
            })
            .collect()
    }

    #[test]
    fn tiles_only_for_present_states_by_default() {
        let fig = render(&entries(), &PlotConfig::default(), None).unwrap();
        assert_eq!(fig.tiles.len(), 3);
        let ca = fig.tile("CA").unwrap();
        assert_eq!(ca.tooltip, "California\nValue: 100.00");
        // min and max land on the scale ends
        let blues = palette::scheme("Blues").unwrap();
        assert_eq!(ca.fill, blues.color_at(0.0, false));
        assert_eq!(fig.tile("NY").unwrap().fill, blues.color_at(1.0, false));
    }

    #[test]
    fn show_missing_adds_grey_tiles() {
        let cfg = PlotConfig::default()
            .merge(&PlotConfigUpdate::new().show_missing(true))
            .unwrap();
        let fig = render(&entries(), &cfg, None).unwrap();
        assert_eq!(fig.tiles.len(), registry::TOTAL_STATES);
        let wy = fig.tile("WY").unwrap();
        assert_eq!(wy.value, None);
        assert_eq!(wy.fill.to_hex(), "#E5E5E5");
        assert!(wy.tooltip.ends_with("No data"));
    }

    #[test]
    fn tiles_stay_inside_the_canvas() {
        let cfg = PlotConfig::default()
            .merge(&PlotConfigUpdate::new().show_missing(true).size(300, 200))
            .unwrap();
        let fig = render(&entries(), &cfg, None).unwrap();
        for t in &fig.tiles {
            assert!(t.x >= 0 && t.x + t.size <= 300, "{} out of bounds", t.code);
        }
    }

    #[test]
    fn custom_without_bins_or_strategy_fails() {
        let cfg = PlotConfig::default()
            .merge(&PlotConfigUpdate::new().scale_type(ScaleType::Custom))
            .unwrap();
        assert!(matches!(
            render(&entries(), &cfg, None),
            Err(MapError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn out_of_bin_values_use_missing_color() {
        let cfg = PlotConfig::default()
            .merge(
                &PlotConfigUpdate::new()
                    .scale_type(ScaleType::Custom)
                    .custom_bins(vec![150.0, 250.0, 350.0]),
            )
            .unwrap();
        let fig = render(&entries(), &cfg, None).unwrap();
        assert_eq!(fig.tile("CA").unwrap().fill, cfg.missing_rgb());
        assert_ne!(fig.tile("TX").unwrap().fill, fig.tile("NY").unwrap().fill);
    }

    #[test]
    fn empty_entries_are_rejected() {
        assert!(matches!(
            render(&[], &PlotConfig::default(), None),
            Err(MapError::InvalidInput { .. })
        ));
    }

    #[test]
    fn unknown_extension_becomes_html() {
        assert_eq!(
            with_html_suffix(Path::new("out/map.foo")),
            PathBuf::from("out/map.foo.html")
        );
    }
}
