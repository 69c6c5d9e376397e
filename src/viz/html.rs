//! Self-contained interactive HTML: inline SVG, CSS hover, native tooltips.

use super::types::Figure;
use std::fmt::Write;

pub(crate) fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Inline SVG markup of the figure (tiles carry `<title>` tooltips).
pub fn render_svg_markup(fig: &Figure) -> String {
    let theme = fig.theme;
    let mut s = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(
        s,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="img" aria-label="{title}">"#,
        w = fig.width,
        h = fig.height,
        title = escape_html(&fig.title),
    );
    let _ = writeln!(
        s,
        r#"<rect width="100%" height="100%" fill="{}"/>"#,
        theme.background.to_hex()
    );

    // Gradient definition for the color bar.
    let bar = &fig.color_bar;
    let _ = writeln!(s, r#"<defs><linearGradient id="usmap-bar" x1="0" x2="1" y1="0" y2="0">"#);
    let last = bar.gradient.len().saturating_sub(1).max(1) as f64;
    for (i, c) in bar.gradient.iter().enumerate() {
        let _ = writeln!(
            s,
            r#"<stop offset="{:.4}" stop-color="{}"/>"#,
            i as f64 / last,
            c.to_hex()
        );
    }
    let _ = writeln!(s, "</linearGradient></defs>");

    if !fig.title.is_empty() {
        let _ = writeln!(
            s,
            r#"<text class="title" x="{}" y="34" text-anchor="middle" fill="{}">{}</text>"#,
            fig.width / 2,
            theme.text.to_hex(),
            escape_html(&fig.title)
        );
    }

    for tile in &fig.tiles {
        let _ = writeln!(
            s,
            r#"<g class="state" data-code="{code}"><rect class="tile" x="{x}" y="{y}" width="{sz}" height="{sz}" rx="3" fill="{fill}" stroke="{border}"><title>{tip}</title></rect><text class="code" x="{cx}" y="{cy}" fill="{fg}">{code}</text></g>"#,
            code = escape_html(&tile.code),
            x = tile.x,
            y = tile.y,
            sz = tile.size,
            fill = tile.fill.to_hex(),
            border = theme.border.to_hex(),
            tip = escape_html(&tile.tooltip),
            cx = tile.center().0,
            cy = tile.center().1,
            fg = tile.fill.contrast_text().to_hex(),
        );
    }

    let _ = writeln!(
        s,
        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="url(#usmap-bar)" stroke="{}"/>"#,
        bar.x,
        bar.y,
        bar.width,
        bar.height,
        theme.border.to_hex()
    );
    for tick in &bar.ticks {
        let tx = bar.x + (tick.position * bar.width as f64).round() as i32;
        let _ = writeln!(
            s,
            r#"<line x1="{tx}" x2="{tx}" y1="{}" y2="{}" stroke="{}"/><text class="tick" x="{tx}" y="{}" fill="{}">{}</text>"#,
            bar.y + bar.height,
            bar.y + bar.height + 5,
            theme.text.to_hex(),
            bar.y + bar.height + 18,
            theme.text.to_hex(),
            escape_html(&tick.label)
        );
    }
    if !bar.label.is_empty() {
        let _ = writeln!(
            s,
            r#"<text class="bar-label" x="{}" y="{}" fill="{}">{}</text>"#,
            bar.x + bar.width / 2,
            bar.y - 8,
            theme.text.to_hex(),
            escape_html(&bar.label)
        );
    }
    s.push_str("</svg>\n");
    s
}

const STYLE: &str = r#"body { margin: 0; font-family: "DejaVu Sans", Arial, sans-serif; }
svg text { font-family: inherit; }
.title { font-size: 22px; font-weight: bold; }
.tile { transition: opacity .1s; cursor: default; }
.state:hover .tile { opacity: .8; stroke-width: 3; }
.code { font-size: 13px; text-anchor: middle; dominant-baseline: central; pointer-events: none; }
.tick { font-size: 12px; text-anchor: middle; }
.bar-label { font-size: 13px; text-anchor: middle; }
"#;

pub fn render_html(fig: &Figure) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>\n{STYLE}</style>\n</head>\n<body style=\"background:{bg}\">\n{svg}</body>\n</html>\n",
        title = escape_html(&fig.title),
        bg = fig.theme.background.to_hex(),
        svg = render_svg_markup(fig),
    )
}
