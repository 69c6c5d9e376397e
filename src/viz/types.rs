//! Public types for the rendered figure.

use super::palette::Rgb8;
use crate::config::ScaleType;

/// A labelled position on the color bar (0 = left end, 1 = right end).
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub position: f64,
    pub label: String,
}

/// Background, text and tile-border colors of a style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: Rgb8,
    pub text: Rgb8,
    pub border: Rgb8,
}

/// One state square on the tile grid, in pixel coordinates of the figure.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub code: String,
    pub name: String,
    /// `None` for a state shown only because `show_missing` is on.
    pub value: Option<f64>,
    pub fill: Rgb8,
    pub x: i32,
    pub y: i32,
    pub size: i32,
    /// Hover text: the state name and its formatted value, or "No data".
    pub tooltip: String,
}

impl Tile {
    pub fn center(&self) -> (i32, i32) {
        (self.x + self.size / 2, self.y + self.size / 2)
    }
}

/// Horizontal gradient legend under the map.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorBar {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// Left-to-right color samples.
    pub gradient: Vec<Rgb8>,
    pub ticks: Vec<Tick>,
    pub label: String,
}

/// A fully laid-out choropleth, ready for any backend.
///
/// Rendering never touches the filesystem; the same figure can be saved
/// repeatedly to different formats.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: String,
    pub value_label: String,
    pub width: u32,
    pub height: u32,
    pub theme: Theme,
    /// Name of the color scale actually used.
    pub scheme: String,
    pub scale_type: ScaleType,
    pub tiles: Vec<Tile>,
    pub color_bar: ColorBar,
}

impl Figure {
    pub fn tile(&self, code: &str) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.code == code)
    }

    /// Self-contained HTML page with an inline SVG and hover tooltips.
    pub fn to_html(&self) -> String {
        super::html::render_html(self)
    }
}
