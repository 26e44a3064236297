//! Process-wide rendering context.

use std::sync::OnceLock;

use log::{info, warn};

/// Output resolution, fonts and stroke sizes shared by every figure.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderStyle {
    /// Font family name ("Times New Roman", "Helvetica", "Courier", …).
    pub font_family: String,
    /// Device units per inch.
    pub dpi: f64,
    pub curve_width_pt: f64,
    pub axis_width_pt: f64,
    pub tick_length_pt: f64,
    /// Gap between ticks, tick labels, axis titles and the figure edge.
    pub pad_pt: f64,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            font_family: "Times New Roman".to_string(),
            dpi: 1200.0,
            curve_width_pt: 1.5,
            axis_width_pt: 0.8,
            tick_length_pt: 3.5,
            pad_pt: 3.5,
        }
    }
}

impl RenderStyle {
    /// Device units per typographic point.
    pub fn units_per_point(&self) -> f64 {
        self.dpi / 72.0
    }

    /// Convert points to device units.
    pub fn pt(&self, points: f64) -> f64 {
        points * self.units_per_point()
    }
}

/// Largest accepted device resolution.
pub const MAX_DPI: f64 = 100_000.0;

static STYLE: OnceLock<RenderStyle> = OnceLock::new();

/// Set the rendering context. Only the first call takes effect; returns
/// whether this call did.
pub fn configure(new_style: RenderStyle) -> bool {
    match STYLE.set(new_style) {
        Ok(()) => {
            info!("rendering context configured: {:?}", style());
            true
        }
        Err(rejected) => {
            if &rejected != style() {
                warn!("rendering context already configured, ignoring {:?}", rejected);
            }
            false
        }
    }
}

/// The configured rendering context, or the default one.
pub fn style() -> &'static RenderStyle {
    STYLE.get_or_init(RenderStyle::default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_units() {
        let style = RenderStyle::default();
        assert_eq!(style.units_per_point(), 1200.0 / 72.0);
        assert_eq!(style.pt(72.0), 1200.0);
        assert_eq!(style.font_family, "Times New Roman");
    }

    #[test]
    fn test_configure_returns_whether_it_took_effect() {
        let first = configure(style().clone());
        assert!(!first, "style() already initialised the context");
        assert!(!configure(RenderStyle::default()));
    }

    #[test]
    fn test_configure_after_first_use_is_ignored() {
        let current = style().clone();
        let other = RenderStyle {
            dpi: 300.0,
            ..current.clone()
        };
        assert!(!configure(other));
        assert_eq!(style(), &current);
    }
}
