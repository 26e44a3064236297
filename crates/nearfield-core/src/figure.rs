//! Renderer-independent description of a figure: axes, curves and
//! annotations, all in data coordinates.
//!
//! Text fields use a small TeX-like markup (`$…$` for math, `\zeta`,
//! `_` / `^` for sub- and superscripts) that the renderer typesets.

use crate::grid::Grid;

/// Axis scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisScale {
    Linear,
    Log,
}

/// A labelled tick position.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub value: f64,
    pub label: String,
}

impl Tick {
    pub fn new(value: f64, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

/// One plot axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    /// Axis title (markup).
    pub label: String,
    pub scale: AxisScale,
    /// Visible range `(min, max)`.
    pub limits: (f64, f64),
    pub ticks: Vec<Tick>,
    /// Axis title size in points.
    pub label_pt: f64,
    /// Tick label size in points.
    pub tick_pt: f64,
}

impl Axis {
    /// Label for the tick closest to `value`, if any tick lies within a
    /// relative distance of 1e-6 (absolute for ticks at zero).
    pub fn tick_label(&self, value: f64) -> Option<&str> {
        self.ticks
            .iter()
            .find(|t| {
                let tol = 1e-6 * t.value.abs().max(1e-6);
                (t.value - value).abs() <= tol
            })
            .map(|t| t.label.as_str())
    }
}

/// One result curve: dB values for a single order over a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    /// Spherical-harmonic order l.
    pub order: u32,
    /// Grey level in [0, 1]; 0 is black.
    pub shade: f64,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl Curve {
    /// Wrap precomputed values (one per grid point), shading the curve by
    /// `(order − 1)/(max_order + 1)`.
    pub fn from_values(order: u32, max_order: u32, grid: &Grid, y: Vec<f64>) -> Self {
        debug_assert_eq!(y.len(), grid.len());
        Self {
            order,
            shade: shade(order, max_order),
            x: grid.values().to_vec(),
            y,
        }
    }

    /// `(x, y)` pairs in grid order.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    /// Number of samples that are NaN or infinite.
    pub fn non_finite_count(&self) -> usize {
        self.y.iter().filter(|v| !v.is_finite()).count()
    }

    /// Smallest and largest finite value, or `None` if there is none.
    pub fn finite_range(&self) -> Option<(f64, f64)> {
        self.y
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Grey level for order `l`: `(l − 1)/(l_max + 1)`.
pub fn shade(order: u32, max_order: u32) -> f64 {
    order.saturating_sub(1) as f64 / (max_order + 1) as f64
}

/// A free-standing text label, anchored at its left baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    /// Position in data coordinates.
    pub at: (f64, f64),
    pub font_pt: f64,
}

/// An annotation arrow with an open head at `head`.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrow {
    pub tail: (f64, f64),
    pub head: (f64, f64),
    /// Head scale in points.
    pub size_pt: f64,
}

/// Everything needed to draw and export one figure.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    /// Output file name without extension.
    pub file_stem: String,
    pub title: String,
    /// `(width, height)` in inches.
    pub size_inches: (f64, f64),
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub curves: Vec<Curve>,
    pub labels: Vec<TextLabel>,
    pub arrow: Option<Arrow>,
}
