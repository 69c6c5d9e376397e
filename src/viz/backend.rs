//! Static export backends built on plotters.
//!
//! Every backend draws the same [`Figure`] through [`draw_figure`]; the registry
//! maps file extensions to backends so callers can plug in formats (PDF, JPEG...)
//! that plotters does not ship.

use super::ensure_fonts_registered;
use super::types::Figure;
use crate::error::ExportError;
use crate::viz_plotters_adapter::{border_style, fill_style, rgb_color};

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters_svg::SVGBackend;

use std::fmt;
use std::path::Path;

/// A writer for one or more static image formats.
pub trait StaticBackend: fmt::Debug {
    fn name(&self) -> &str;

    /// Lower-case extensions handled, without the dot.
    fn extensions(&self) -> &[&str];

    /// Draw `figure` into a new file at `path`.
    fn render(&self, figure: &Figure, path: &Path) -> Result<(), ExportError>;
}

fn render_err<E: fmt::Debug>(path: &Path) -> impl FnOnce(E) -> ExportError + '_ {
    move |e| ExportError::Render {
        path: path.to_path_buf(),
        message: format!("{:?}", e),
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SvgExporter;

impl StaticBackend for SvgExporter {
    fn name(&self) -> &str {
        "plotters-svg"
    }

    fn extensions(&self) -> &[&str] {
        &["svg"]
    }

    fn render(&self, figure: &Figure, path: &Path) -> Result<(), ExportError> {
        let mut buf = String::new();
        {
            let root =
                SVGBackend::with_string(&mut buf, (figure.width, figure.height)).into_drawing_area();
            draw_figure(&root, figure).map_err(render_err(path))?;
            root.present().map_err(render_err(path))?;
        }
        std::fs::write(path, buf).map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(feature = "png")]
#[derive(Debug, Default, Clone, Copy)]
pub struct PngExporter;

#[cfg(feature = "png")]
impl StaticBackend for PngExporter {
    fn name(&self) -> &str {
        "plotters-bitmap"
    }

    fn extensions(&self) -> &[&str] {
        &["png"]
    }

    fn render(&self, figure: &Figure, path: &Path) -> Result<(), ExportError> {
        use plotters_bitmap::BitMapBackend;

        let root = BitMapBackend::new(path, (figure.width, figure.height)).into_drawing_area();
        draw_figure(&root, figure).map_err(render_err(path))?;
        root.present().map_err(render_err(path))?;
        Ok(())
    }
}

/// Extension-to-backend lookup. Later registrations take precedence.
#[derive(Debug)]
pub struct BackendRegistry {
    backends: Vec<Box<dyn StaticBackend>>,
}

impl Default for BackendRegistry {
    /// SVG, plus PNG when the `png` feature is enabled.
    fn default() -> Self {
        let mut reg = Self::empty();
        reg.register(Box::new(SvgExporter));
        #[cfg(feature = "png")]
        reg.register(Box::new(PngExporter));
        reg
    }
}

impl BackendRegistry {
    pub fn empty() -> Self {
        Self {
            backends: Vec::new(),
        }
    }

    pub fn register(&mut self, backend: Box<dyn StaticBackend>) {
        self.backends.push(backend);
    }

    pub fn find(&self, ext: &str) -> Option<&dyn StaticBackend> {
        self.backends
            .iter()
            .rev()
            .find(|b| b.extensions().iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .map(|b| b.as_ref())
    }

    /// All extensions some backend can write.
    pub fn extensions(&self) -> Vec<String> {
        let mut out: Vec<String> = self
            .backends
            .iter()
            .flat_map(|b| b.extensions().iter().map(|e| e.to_ascii_lowercase()))
            .collect();
        out.sort();
        out.dedup();
        out
    }
}

/// Draw the figure onto any plotters drawing area.
pub fn draw_figure<DB>(
    root: &DrawingArea<DB, Shift>,
    fig: &Figure,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>>
where
    DB: DrawingBackend,
{
    ensure_fonts_registered();
    let theme = fig.theme;
    let text_color = rgb_color(theme.text);
    let centered = Pos::new(HPos::Center, VPos::Center);

    root.fill(&rgb_color(theme.background))?;

    if !fig.title.is_empty() {
        let style = TextStyle::from((FontFamily::SansSerif, 22))
            .color(&text_color)
            .pos(centered);
        root.draw(&Text::new(
            fig.title.as_str(),
            ((fig.width / 2) as i32, 30),
            style,
        ))?;
    }

    // 1) Tiles
    let code_px = |size: i32| ((size as f64 * 0.32).round() as u32).clamp(8, 18);
    for tile in &fig.tiles {
        let (x0, y0) = (tile.x, tile.y);
        let (x1, y1) = (tile.x + tile.size, tile.y + tile.size);
        root.draw(&Rectangle::new([(x0, y0), (x1, y1)], fill_style(tile.fill)))?;
        root.draw(&Rectangle::new([(x0, y0), (x1, y1)], border_style(theme.border)))?;

        let fg = rgb_color(tile.fill.contrast_text());
        let style = TextStyle::from((FontFamily::SansSerif, code_px(tile.size)))
            .color(&fg)
            .pos(centered);
        root.draw(&Text::new(tile.code.as_str(), tile.center(), style))?;
    }

    // 2) Color bar: one rectangle per gradient sample
    let bar = &fig.color_bar;
    let n = bar.gradient.len() as i32;
    if n > 0 && bar.width > 0 {
        for (i, c) in bar.gradient.iter().enumerate() {
            let i = i as i32;
            let sx0 = bar.x + bar.width * i / n;
            let sx1 = bar.x + bar.width * (i + 1) / n;
            root.draw(&Rectangle::new(
                [(sx0, bar.y), (sx1, bar.y + bar.height)],
                fill_style(*c),
            ))?;
        }
        root.draw(&Rectangle::new(
            [(bar.x, bar.y), (bar.x + bar.width, bar.y + bar.height)],
            border_style(theme.border),
        ))?;
    }

    let tick_style = TextStyle::from((FontFamily::SansSerif, 12))
        .color(&text_color)
        .pos(Pos::new(HPos::Center, VPos::Top));
    for tick in &bar.ticks {
        let tx = bar.x + (tick.position * bar.width as f64).round() as i32;
        let bottom = bar.y + bar.height;
        root.draw(&PathElement::new(
            vec![(tx, bottom), (tx, bottom + 5)],
            text_color.stroke_width(1),
        ))?;
        root.draw(&Text::new(tick.label.as_str(), (tx, bottom + 8), tick_style.clone()))?;
    }

    if !bar.label.is_empty() {
        let style = TextStyle::from((FontFamily::SansSerif, 13))
            .color(&text_color)
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        root.draw(&Text::new(
            bar.label.as_str(),
            (bar.x + bar.width / 2, bar.y - 6),
            style,
        ))?;
    }
    Ok(())
}
