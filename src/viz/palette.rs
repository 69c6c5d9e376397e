//! Colors and named color scales.
//!
//! Scales are piecewise-linear ramps through fixed stops (ColorBrewer / matplotlib
//! colormaps). Lookups by name are case-insensitive.

use regex::Regex;
use std::sync::LazyLock;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

const fn hex(v: u32) -> Rgb8 {
    Rgb8 {
        r: ((v >> 16) & 0xff) as u8,
        g: ((v >> 8) & 0xff) as u8,
        b: (v & 0xff) as u8,
    }
}

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#?([0-9a-fA-F]{6})$").expect("static regex"));
static RGB_FUNC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^rgb\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*\)$").expect("static regex")
});

impl Rgb8 {
    pub const WHITE: Rgb8 = hex(0xffffff);

    /// Parse `#RRGGBB`, `RRGGBB` or `rgb(r, g, b)`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(caps) = HEX_COLOR.captures(s) {
            let v = u32::from_str_radix(&caps[1], 16).ok()?;
            return Some(hex(v));
        }
        let caps = RGB_FUNC.captures(s)?;
        let channel = |i: usize| caps[i].parse::<u8>().ok();
        Some(Rgb8 {
            r: channel(1)?,
            g: channel(2)?,
            b: channel(3)?,
        })
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Relative luminance in 0..1 (sRGB weights, no gamma).
    pub fn luminance(self) -> f64 {
        (0.2126 * self.r as f64 + 0.7152 * self.g as f64 + 0.0722 * self.b as f64) / 255.0
    }

    /// Text color readable on top of this fill.
    pub fn contrast_text(self) -> Rgb8 {
        if self.luminance() > 0.55 {
            hex(0x1f1f1f)
        } else {
            Rgb8::WHITE
        }
    }

    fn lerp(self, other: Rgb8, t: f64) -> Rgb8 {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round().clamp(0.0, 255.0) as u8;
        Rgb8 {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
        }
    }
}

/// A named sequential or diverging color scale.
#[derive(Debug, PartialEq, Eq)]
pub struct ColorScale {
    pub name: &'static str,
    stops: &'static [Rgb8],
}

impl ColorScale {
    /// Color at position `t` (clamped to 0..=1); `reverse` flips the ramp.
    pub fn color_at(&self, t: f64, reverse: bool) -> Rgb8 {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let t = if reverse { 1.0 - t } else { t };
        let last = self.stops.len() - 1;
        let scaled = t * last as f64;
        let lo = (scaled.floor() as usize).min(last);
        let hi = (lo + 1).min(last);
        self.stops[lo].lerp(self.stops[hi], scaled - lo as f64)
    }
}

macro_rules! scale {
    ($name:literal, [$($c:literal),+ $(,)?]) => {
        ColorScale { name: $name, stops: &[$(hex($c)),+] }
    };
}

pub const SCALES: &[ColorScale] = &[
    scale!("Blues", [0xf7fbff, 0xdeebf7, 0xc6dbef, 0x9ecae1, 0x6baed6, 0x4292c6, 0x2171b5, 0x08519c, 0x08306b]),
    scale!("Greens", [0xf7fcf5, 0xe5f5e0, 0xc7e9c0, 0xa1d99b, 0x74c476, 0x41ab5d, 0x238b45, 0x006d2c, 0x00441b]),
    scale!("Reds", [0xfff5f0, 0xfee0d2, 0xfcbba1, 0xfc9272, 0xfb6a4a, 0xef3b2c, 0xcb181d, 0xa50f15, 0x67000d]),
    scale!("Oranges", [0xfff5eb, 0xfee6ce, 0xfdd0a2, 0xfdae6b, 0xfd8d3c, 0xf16913, 0xd94801, 0xa63603, 0x7f2704]),
    scale!("Purples", [0xfcfbfd, 0xefedf5, 0xdadaeb, 0xbcbddc, 0x9e9ac8, 0x807dba, 0x6a51a3, 0x54278f, 0x3f007d]),
    scale!("Greys", [0xffffff, 0xf0f0f0, 0xd9d9d9, 0xbdbdbd, 0x969696, 0x737373, 0x525252, 0x252525, 0x000000]),
    scale!("YlOrRd", [0xffffcc, 0xffeda0, 0xfed976, 0xfeb24c, 0xfd8d3c, 0xfc4e2a, 0xe31a1c, 0xbd0026, 0x800026]),
    scale!("YlGnBu", [0xffffd9, 0xedf8b1, 0xc7e9b4, 0x7fcdbb, 0x41b6c4, 0x1d91c0, 0x225ea8, 0x253494, 0x081d58]),
    scale!("RdYlGn", [0xa50026, 0xd73027, 0xf46d43, 0xfdae61, 0xfee08b, 0xffffbf, 0xd9ef8b, 0xa6d96a, 0x66bd63, 0x1a9850, 0x006837]),
    scale!("RdBu", [0x67001f, 0xb2182b, 0xd6604d, 0xf4a582, 0xfddbc7, 0xf7f7f7, 0xd1e5f0, 0x92c5de, 0x4393c3, 0x2166ac, 0x053061]),
    scale!("Viridis", [0x440154, 0x482878, 0x3e4989, 0x31688e, 0x26828e, 0x1f9e89, 0x35b779, 0x6ece58, 0xb5de2b, 0xfde725]),
    scale!("Cividis", [0x00224e, 0x123570, 0x3b496c, 0x575d6d, 0x707173, 0x8a8678, 0xa59c74, 0xc3b369, 0xe1cc55, 0xfee838]),
    scale!("Plasma", [0x0d0887, 0x46039f, 0x7201a8, 0x9c179e, 0xbd3786, 0xd8576b, 0xed7953, 0xfb9f3a, 0xfdca26, 0xf0f921]),
    scale!("Inferno", [0x000004, 0x1b0c41, 0x4a0c6b, 0x781c6d, 0xa52c60, 0xcf4446, 0xed6925, 0xfb9b06, 0xf7d13d, 0xfcffa4]),
    scale!("Magma", [0x000004, 0x180f3d, 0x440f76, 0x721f81, 0x9e2f7f, 0xcd4071, 0xf1605d, 0xfd9668, 0xfeca8d, 0xfcfdbf]),
    scale!("Teal", [0xd1eeea, 0xa8dbd9, 0x85c4c9, 0x68abb8, 0x4f90a6, 0x3b738f, 0x2a5674]),
];

/// Find a scale by name, ignoring case.
pub fn scheme(name: &str) -> Option<&'static ColorScale> {
    SCALES
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(name.trim()))
}

pub fn scheme_names() -> Vec<&'static str> {
    SCALES.iter().map(|s| s.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_and_rgb() {
        assert_eq!(Rgb8::parse("#E5E5E5"), Some(hex(0xe5e5e5)));
        assert_eq!(Rgb8::parse("rgb(1, 2, 3)"), Some(Rgb8 { r: 1, g: 2, b: 3 }));
        assert_eq!(Rgb8::parse("rgb(300, 2, 3)"), None);
        assert_eq!(Rgb8::parse("gray"), None);
        assert_eq!(hex(0x08306b).to_hex(), "#08306B");
    }

    #[test]
    fn ramp_endpoints_and_reverse() {
        let blues = scheme("blues").unwrap();
        assert_eq!(blues.color_at(0.0, false), hex(0xf7fbff));
        assert_eq!(blues.color_at(1.0, false), hex(0x08306b));
        assert_eq!(blues.color_at(1.0, true), hex(0xf7fbff));
        assert_eq!(blues.color_at(f64::NAN, false), hex(0xf7fbff));
    }
}
