//! Value-to-color-position scales.
//!
//! A [`ScaleStrategy`] is fitted to the dataset's values and yields a [`ValueScale`]
//! that places each value on the 0..=1 color axis. Linear, log10 and explicit bin
//! edges are built in; callers can plug their own strategy for `custom` scales.

use super::text::compact_number;
use super::types::Tick;
use crate::error::{MapError, Result};
use std::fmt;

pub trait ValueScale: fmt::Debug {
    /// Position of `value` on the color axis, or `None` when it cannot be placed.
    fn position(&self, value: f64) -> Option<f64>;

    /// Labelled positions for the color bar.
    fn ticks(&self) -> Vec<Tick>;

    /// Snap a color-bar position to what tiles can actually show (stepped scales).
    fn quantize(&self, t: f64) -> f64 {
        t
    }
}

pub trait ScaleStrategy: fmt::Debug {
    fn fit(&self, values: &[f64]) -> Result<Box<dyn ValueScale>>;
}

fn domain(values: &[f64]) -> (f64, f64) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    if (max - min).abs() < f64::EPSILON {
        (min - 1.0, max + 1.0)
    } else {
        (min, max)
    }
}

/// Evenly spaced values between `lo` and `hi`.
fn even_ticks(lo: f64, hi: f64, count: usize) -> Vec<Tick> {
    (0..count)
        .map(|i| {
            let t = i as f64 / (count - 1) as f64;
            Tick {
                position: t,
                label: compact_number(lo * (1.0 - t) + hi * t),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Linear;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub min: f64,
    pub max: f64,
}

impl ScaleStrategy for Linear {
    fn fit(&self, values: &[f64]) -> Result<Box<dyn ValueScale>> {
        let (min, max) = domain(values);
        Ok(Box::new(LinearScale { min, max }))
    }
}

impl ValueScale for LinearScale {
    fn position(&self, value: f64) -> Option<f64> {
        // Halved operands keep the span finite for domains near f64::MAX.
        let (v, lo, hi) = (value / 2.0, self.min / 2.0, self.max / 2.0);
        value
            .is_finite()
            .then(|| ((v - lo) / (hi - lo)).clamp(0.0, 1.0))
    }

    fn ticks(&self) -> Vec<Tick> {
        even_ticks(self.min, self.max, 5)
    }
}

/// log10 scale. Non-positive values are clamped to the smallest positive value
/// in the data (or 1 when there is none).
#[derive(Debug, Clone, Copy, Default)]
pub struct Log;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogScale {
    pub floor: f64,
    lo: f64,
    hi: f64,
}

impl ScaleStrategy for Log {
    fn fit(&self, values: &[f64]) -> Result<Box<dyn ValueScale>> {
        let floor = values
            .iter()
            .copied()
            .filter(|v| *v > 0.0 && v.is_finite())
            .fold(f64::INFINITY, f64::min);
        let floor = if floor.is_finite() { floor } else { 1.0 };
        let logs: Vec<f64> = values.iter().map(|v| v.max(floor).log10()).collect();
        let (lo, hi) = domain(&logs);
        Ok(Box::new(LogScale { floor, lo, hi }))
    }
}

impl ValueScale for LogScale {
    fn position(&self, value: f64) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }
        let l = value.max(self.floor).log10();
        Some(((l - self.lo) / (self.hi - self.lo)).clamp(0.0, 1.0))
    }

    fn ticks(&self) -> Vec<Tick> {
        let span = self.hi - self.lo;
        let decades: Vec<Tick> = ((self.lo.ceil() as i32)..=(self.hi.floor() as i32))
            .map(|k| Tick {
                position: (k as f64 - self.lo) / span,
                label: compact_number(10f64.powi(k)),
            })
            .collect();
        if decades.len() >= 2 {
            decades
        } else {
            even_ticks(self.lo, self.hi, 3)
                .into_iter()
                .map(|t| Tick {
                    label: compact_number(10f64.powf(self.lo + span * t.position)),
                    ..t
                })
                .collect()
        }
    }
}

/// Explicit bin edges. Bins are right-closed: `(e[i], e[i + 1]]`; values outside
/// every bin cannot be placed.
#[derive(Debug, Clone, PartialEq)]
pub struct Bins {
    edges: Vec<f64>,
}

impl Bins {
    pub fn new(edges: Vec<f64>) -> Result<Self> {
        validate_bins(&edges)?;
        Ok(Self { edges })
    }

    fn bin_count(&self) -> usize {
        self.edges.len() - 1
    }

    /// Index of the bin holding `value`.
    pub fn bin_of(&self, value: f64) -> Option<usize> {
        self.edges
            .windows(2)
            .position(|w| value > w[0] && value <= w[1])
    }
}

/// Bin edges must be finite, strictly increasing, and at least two.
pub fn validate_bins(edges: &[f64]) -> Result<()> {
    if edges.len() < 2 {
        return Err(MapError::invalid_config(
            "custom_bins",
            "at least two bin edges are required",
        ));
    }
    if edges.iter().any(|e| !e.is_finite()) {
        return Err(MapError::invalid_config(
            "custom_bins",
            "bin edges must be finite numbers",
        ));
    }
    if edges.windows(2).any(|w| w[0] >= w[1]) {
        return Err(MapError::invalid_config(
            "custom_bins",
            "bin edges must be strictly increasing",
        ));
    }
    Ok(())
}

impl ScaleStrategy for Bins {
    fn fit(&self, _values: &[f64]) -> Result<Box<dyn ValueScale>> {
        Ok(Box::new(self.clone()))
    }
}

impl ValueScale for Bins {
    fn position(&self, value: f64) -> Option<f64> {
        let n = self.bin_count();
        self.bin_of(value).map(|i| (i as f64 + 0.5) / n as f64)
    }

    fn ticks(&self) -> Vec<Tick> {
        let n = self.bin_count() as f64;
        self.edges
            .iter()
            .enumerate()
            .map(|(i, e)| Tick {
                position: i as f64 / n,
                label: compact_number(*e),
            })
            .collect()
    }

    fn quantize(&self, t: f64) -> f64 {
        let n = self.bin_count() as f64;
        let i = (t * n).floor().clamp(0.0, n - 1.0);
        (i + 0.5) / n
    }
}
