//! Text measurement, truncation, and number formatting.

use num_format::{Locale, ToFormattedString};

/// Heuristic: estimate pixel width of text (Plotters has no built-in text measuring).
pub fn estimate_text_width_px(text: &str, font_px: u32) -> u32 {
    ((text.chars().count() as f32) * (font_px as f32) * 0.60).ceil() as u32
}

/// Truncate to fit `max_px` and add a single ellipsis if needed.
pub fn truncate_to_width(text: &str, font_px: u32, max_px: u32) -> String {
    if estimate_text_width_px(text, font_px) <= max_px {
        return text.to_string();
    }
    let mut out = String::new();
    for ch in text.chars() {
        let next = format!("{out}{ch}…");
        if estimate_text_width_px(&next, font_px) > max_px {
            break;
        }
        out.push(ch);
    }
    if !out.is_empty() {
        out.push('…');
    }
    out
}

/// Hover/summary format: thousands separators and two decimals, e.g. `1,234.50`.
pub fn format_value(v: f64) -> String {
    if !v.is_finite() {
        return "NA".to_string();
    }
    let fixed = format!("{:.2}", v.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let grouped = match int_part.parse::<u64>() {
        Ok(n) => n.to_formatted_string(&Locale::en),
        Err(_) => int_part.to_string(),
    };
    let sign = if v < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{frac_part}")
}

/// Pick a single scale and its suffix based on the magnitude.
/// Returns (scale, suffix), e.g. (1e6, "M").
pub fn choose_scale(max_abs: f64) -> (f64, &'static str) {
    if max_abs >= 1.0e12 {
        (1.0e12, "T")
    } else if max_abs >= 1.0e9 {
        (1.0e9, "B")
    } else if max_abs >= 1.0e6 {
        (1.0e6, "M")
    } else if max_abs >= 1.0e3 {
        (1.0e3, "K")
    } else {
        (1.0, "")
    }
}

/// Short axis label: `1.5K`, `2M`, `12.35`.
pub fn compact_number(v: f64) -> String {
    if !v.is_finite() {
        return "NA".to_string();
    }
    let (scale, suffix) = choose_scale(v.abs());
    // Up to 2 decimals, then trim trailing zeros and trailing dot.
    let s = format!("{:.2}", v / scale);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    let s = if s == "-0" { "0" } else { s };
    format!("{s}{suffix}")
}
