pub mod constants;
pub mod error;
pub mod figure;
pub mod figures;
pub mod formulas;
pub mod grid;
pub mod spherical;

pub use error::NearfieldError;
pub use figure::{Arrow, Axis, AxisScale, Curve, Figure, TextLabel, Tick};

// ---------------------------------------------------------------------------
// Shared interface types
// ---------------------------------------------------------------------------

/// Physical and sampling parameters shared by all figures.
#[derive(Debug, Clone, PartialEq)]
pub struct NearfieldParams {
    /// Speed of sound in m/s.
    pub speed_of_sound: f64,
    /// Highest spherical-harmonic order; curves are drawn for 1..=max_order.
    pub max_order: u32,
    /// Number of ζ samples.
    pub num_zeta: usize,
    /// Number of frequency samples.
    pub num_freq: usize,
}

impl Default for NearfieldParams {
    fn default() -> Self {
        Self {
            speed_of_sound: constants::SPEED_OF_SOUND,
            max_order: constants::MAX_ORDER,
            num_zeta: constants::NUM_ZETA,
            num_freq: constants::NUM_FREQ,
        }
    }
}

impl NearfieldParams {
    /// Check the parameters before any grid is built.
    pub fn validate(&self) -> Result<(), NearfieldError> {
        if self.max_order == 0 {
            return Err(NearfieldError::InvalidOrder(self.max_order));
        }
        if !self.speed_of_sound.is_finite() || self.speed_of_sound <= 0.0 {
            return Err(NearfieldError::InvalidParameter {
                name: "speed_of_sound",
                value: self.speed_of_sound,
            });
        }
        // The visible x range starts at the second sample, so one point is
        // not enough.
        for (name, n) in [("num_zeta", self.num_zeta), ("num_freq", self.num_freq)] {
            if n < 2 {
                return Err(NearfieldError::InvalidParameter {
                    name,
                    value: n as f64,
                });
            }
        }
        Ok(())
    }
}

/// Evaluate every figure: build the grids, evaluate the formulas for each
/// order and return the figure descriptions ready for rendering.
pub fn compute(params: &NearfieldParams) -> Result<Vec<Figure>, NearfieldError> {
    params.validate()?;
    figures::all(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_match_published_figures() {
        let params = NearfieldParams::default();
        assert_eq!(params.speed_of_sound, 343.0);
        assert_eq!(params.max_order, 6);
        assert_eq!(params.num_zeta, 100);
        assert_eq!(params.num_freq, 100);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_speed_of_sound() {
        for c in [0.0, -343.0, f64::NAN, f64::INFINITY] {
            let params = NearfieldParams {
                speed_of_sound: c,
                ..NearfieldParams::default()
            };
            assert!(matches!(
                params.validate(),
                Err(NearfieldError::InvalidParameter { name: "speed_of_sound", .. })
            ));
        }
    }

    #[test]
    fn test_compute_produces_every_figure() {
        let figures = compute(&NearfieldParams::default()).unwrap();
        assert_eq!(figures.len(), 3);
        assert!(figures.iter().all(|f| f.curves.len() == 6));
    }
}
