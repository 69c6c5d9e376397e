//! Plot configuration: defaults, partial updates, validation.
//!
//! [`PlotConfig`] is never mutated in place. [`PlotConfig::merge`] builds a new,
//! validated value from a [`PlotConfigUpdate`]; callers swap it in only on success.

use crate::error::{MapError, Result};
use crate::viz::palette::{self, Rgb8};
use crate::viz::scale::validate_bins;
use crate::viz::types::Theme;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub const DEFAULT_COLOR_SCHEME: &str = "Blues";
pub const DEFAULT_TITLE: &str = "US States Data Visualization";
pub const DEFAULT_VALUE_LABEL: &str = "Value";
pub const DEFAULT_MISSING_COLOR: &str = "#E5E5E5";

/// Allowed range for `width` and `height`, in pixels.
pub const SIZE_RANGE: std::ops::RangeInclusive<u32> = 100..=10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleType {
    #[default]
    Linear,
    Log,
    Custom,
}

impl ScaleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScaleType::Linear => "linear",
            ScaleType::Log => "log",
            ScaleType::Custom => "custom",
        }
    }
}

impl fmt::Display for ScaleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScaleType {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(ScaleType::Linear),
            "log" => Ok(ScaleType::Log),
            "custom" => Ok(ScaleType::Custom),
            other => Err(MapError::invalid_config(
                "scale_type",
                format!("unknown scale type `{other}` (expected linear, log or custom)"),
            )),
        }
    }
}

/// Overall look of the figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    #[default]
    Professional,
    Light,
    Dark,
    Colorblind,
}

impl Style {
    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Professional => "professional",
            Style::Light => "light",
            Style::Dark => "dark",
            Style::Colorblind => "colorblind",
        }
    }

    /// Color scale used when the configured scheme is left at the default.
    pub fn default_scheme(&self) -> &'static str {
        match self {
            Style::Professional => "Blues",
            Style::Light => "Teal",
            Style::Dark => "Viridis",
            Style::Colorblind => "Cividis",
        }
    }

    pub fn theme(&self) -> Theme {
        let rgb = |r, g, b| Rgb8 { r, g, b };
        match self {
            Style::Professional => Theme {
                background: Rgb8::WHITE,
                text: rgb(0x2a, 0x3f, 0x5f),
                border: Rgb8::WHITE,
            },
            Style::Light => Theme {
                background: rgb(0xfa, 0xfa, 0xfa),
                text: rgb(0x44, 0x44, 0x44),
                border: rgb(0xdd, 0xdd, 0xdd),
            },
            Style::Dark => Theme {
                background: rgb(0x11, 0x11, 0x11),
                text: rgb(0xf2, 0xf2, 0xf2),
                border: rgb(0x33, 0x33, 0x33),
            },
            Style::Colorblind => Theme {
                background: Rgb8::WHITE,
                text: rgb(0x1f, 0x1f, 0x1f),
                border: rgb(0x80, 0x80, 0x80),
            },
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Style {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "professional" => Ok(Style::Professional),
            "light" => Ok(Style::Light),
            "dark" => Ok(Style::Dark),
            "colorblind" => Ok(Style::Colorblind),
            other => Err(MapError::invalid_config(
                "style",
                format!(
                    "unknown style `{other}` (expected professional, light, dark or colorblind)"
                ),
            )),
        }
    }
}

/// Complete rendering configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotConfig {
    pub color_scheme: String,
    pub scale_type: ScaleType,
    pub style: Style,
    pub title: String,
    pub value_label: String,
    pub width: u32,
    pub height: u32,
    pub reverse_scale: bool,
    pub show_missing: bool,
    pub missing_color: String,
    pub custom_bins: Option<Vec<f64>>,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            color_scheme: DEFAULT_COLOR_SCHEME.to_string(),
            scale_type: ScaleType::Linear,
            style: Style::Professional,
            title: DEFAULT_TITLE.to_string(),
            value_label: DEFAULT_VALUE_LABEL.to_string(),
            width: 1200,
            height: 700,
            reverse_scale: false,
            show_missing: false,
            missing_color: DEFAULT_MISSING_COLOR.to_string(),
            custom_bins: None,
        }
    }
}

impl PlotConfig {
    /// New config with every key present in `update` replaced. `self` is untouched.
    pub fn merge(&self, update: &PlotConfigUpdate) -> Result<PlotConfig> {
        let mut next = self.clone();
        if let Some(v) = &update.color_scheme {
            next.color_scheme = v.clone();
        }
        if let Some(v) = update.scale_type {
            next.scale_type = v;
        }
        if let Some(v) = update.style {
            next.style = v;
        }
        if let Some(v) = &update.title {
            next.title = v.clone();
        }
        if let Some(v) = &update.value_label {
            next.value_label = v.clone();
        }
        if let Some(v) = update.width {
            next.width = v;
        }
        if let Some(v) = update.height {
            next.height = v;
        }
        if let Some(v) = update.reverse_scale {
            next.reverse_scale = v;
        }
        if let Some(v) = update.show_missing {
            next.show_missing = v;
        }
        if let Some(v) = &update.missing_color {
            next.missing_color = v.clone();
        }
        if let Some(v) = &update.custom_bins {
            next.custom_bins = Some(v.clone());
        }
        next.validate()?;
        Ok(next)
    }

    pub fn validate(&self) -> Result<()> {
        if palette::scheme(&self.color_scheme).is_none() {
            return Err(MapError::invalid_config(
                "color_scheme",
                format!(
                    "unknown color scheme `{}` (available: {})",
                    self.color_scheme,
                    palette::scheme_names().join(", ")
                ),
            ));
        }
        for (key, v) in [("width", self.width), ("height", self.height)] {
            if !SIZE_RANGE.contains(&v) {
                return Err(MapError::invalid_config(
                    key,
                    format!(
                        "{v} is outside {}..={}",
                        SIZE_RANGE.start(),
                        SIZE_RANGE.end()
                    ),
                ));
            }
        }
        if Rgb8::parse(&self.missing_color).is_none() {
            return Err(MapError::invalid_config(
                "missing_color",
                format!(
                    "`{}` is not a color (use #RRGGBB or rgb(r, g, b))",
                    self.missing_color
                ),
            ));
        }
        if let Some(bins) = &self.custom_bins {
            validate_bins(bins)?;
        }
        Ok(())
    }

    /// Scale name actually used for rendering; the style picks it when the
    /// configured scheme is still the default.
    pub fn effective_scheme(&self) -> &str {
        if self.color_scheme.eq_ignore_ascii_case(DEFAULT_COLOR_SCHEME) {
            self.style.default_scheme()
        } else {
            &self.color_scheme
        }
    }

    pub fn missing_rgb(&self) -> Rgb8 {
        Rgb8::parse(&self.missing_color).unwrap_or(Rgb8 {
            r: 0xe5,
            g: 0xe5,
            b: 0xe5,
        })
    }
}

/// Partial configuration: only `Some` keys change on merge.
///
/// Deserializes from JSON objects such as `{"color_scheme": "Viridis", "title": "X"}`;
/// unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlotConfigUpdate {
    pub color_scheme: Option<String>,
    pub scale_type: Option<ScaleType>,
    pub style: Option<Style>,
    pub title: Option<String>,
    pub value_label: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub reverse_scale: Option<bool>,
    pub show_missing: Option<bool>,
    pub missing_color: Option<String>,
    pub custom_bins: Option<Vec<f64>>,
}

impl PlotConfigUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color_scheme(mut self, v: impl Into<String>) -> Self {
        self.color_scheme = Some(v.into());
        self
    }

    pub fn scale_type(mut self, v: ScaleType) -> Self {
        self.scale_type = Some(v);
        self
    }

    pub fn style(mut self, v: Style) -> Self {
        self.style = Some(v);
        self
    }

    pub fn title(mut self, v: impl Into<String>) -> Self {
        self.title = Some(v.into());
        self
    }

    pub fn value_label(mut self, v: impl Into<String>) -> Self {
        self.value_label = Some(v.into());
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn reverse_scale(mut self, v: bool) -> Self {
        self.reverse_scale = Some(v);
        self
    }

    pub fn show_missing(mut self, v: bool) -> Self {
        self.show_missing = Some(v);
        self
    }

    pub fn missing_color(mut self, v: impl Into<String>) -> Self {
        self.missing_color = Some(v.into());
        self
    }

    pub fn custom_bins(mut self, edges: Vec<f64>) -> Self {
        self.custom_bins = Some(edges);
        self
    }

    /// Keys from `other` win over keys already set here.
    pub fn overlay(mut self, other: PlotConfigUpdate) -> Self {
        macro_rules! take {
            ($($f:ident),+) => { $( if other.$f.is_some() { self.$f = other.$f; } )+ };
        }
        take!(
            color_scheme,
            scale_type,
            style,
            title,
            value_label,
            width,
            height,
            reverse_scale,
            show_missing,
            missing_color,
            custom_bins
        );
        self
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| MapError::invalid_config("config", e.to_string()))
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            MapError::invalid_config("config", format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let c = PlotConfig::default();
        c.validate().unwrap();
        assert_eq!(c.effective_scheme(), "Blues");
        assert!(!c.show_missing);
    }

    #[test]
    fn style_picks_scheme_only_when_default() {
        let dark = PlotConfig::default()
            .merge(&PlotConfigUpdate::new().style(Style::Dark))
            .unwrap();
        assert_eq!(dark.effective_scheme(), "Viridis");
        assert_eq!(dark.style.theme().background, Rgb8 { r: 0x11, g: 0x11, b: 0x11 });

        let reds = dark.merge(&PlotConfigUpdate::new().color_scheme("Reds")).unwrap();
        assert_eq!(reds.effective_scheme(), "Reds");
    }

    #[test]
    fn rejected_merge_leaves_original() {
        let c = PlotConfig::default();
        let err = c
            .merge(&PlotConfigUpdate::new().color_scheme("Rainbow"))
            .unwrap_err();
        assert!(matches!(err, MapError::InvalidConfig { ref key, .. } if key == "color_scheme"));
        assert_eq!(c, PlotConfig::default());
    }

    #[test]
    fn enum_parsing_is_case_insensitive() {
        assert_eq!("LOG".parse::<ScaleType>().unwrap(), ScaleType::Log);
        assert_eq!("Colorblind".parse::<Style>().unwrap(), Style::Colorblind);
        assert!("cubic".parse::<ScaleType>().is_err());
    }

    #[test]
    fn json_update_rejects_unknown_keys() {
        let u = PlotConfigUpdate::from_json_str(r#"{"style":"light","width":800}"#).unwrap();
        assert_eq!(u.style, Some(Style::Light));
        assert_eq!(u.width, Some(800));
        assert!(PlotConfigUpdate::from_json_str(r#"{"colour":"red"}"#).is_err());
    }

    #[test]
    fn overlay_prefers_later_keys() {
        let base = PlotConfigUpdate::new().title("A").size(500, 400);
        let u = base.overlay(PlotConfigUpdate::new().title("B"));
        assert_eq!(u.title.as_deref(), Some("B"));
        assert_eq!(u.width, Some(500));
    }
}
