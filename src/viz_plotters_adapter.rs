//! Adapter helpers to use the crate's colors with the plotters crate.

use plotters::prelude::*;

use crate::viz::palette::Rgb8;

pub fn rgb_color(c: Rgb8) -> RGBColor {
    RGBColor(c.r, c.g, c.b)
}

/// Filled style for tiles and color-bar segments.
pub fn fill_style(c: Rgb8) -> ShapeStyle {
    rgb_color(c).filled()
}

/// Outline style for tile borders and the color-bar frame.
pub fn border_style(c: Rgb8) -> ShapeStyle {
    rgb_color(c).stroke_width(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn styles_keep_channels() {
        let c = Rgb8 { r: 8, g: 48, b: 107 };
        let RGBColor(r, g, b) = rgb_color(c);
        assert_eq!((r, g, b), (8, 48, 107));
        assert!(fill_style(c).filled);
        assert_eq!(border_style(c).stroke_width, 1);
    }
}
