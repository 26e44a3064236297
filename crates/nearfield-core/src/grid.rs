use crate::error::NearfieldError;

/// A log-spaced sampling grid.
///
/// Values are strictly increasing, finite and positive, which is what the
/// log-domain formulas and the log-scaled plot axes require.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    values: Vec<f64>,
}

impl Grid {
    /// `num` points from `10^start_exp` to `10^stop_exp`, evenly spaced in
    /// the exponent (both ends included).
    pub fn logspace(start_exp: f64, stop_exp: f64, num: usize) -> Result<Self, NearfieldError> {
        if num < 2 {
            return Err(NearfieldError::InvalidGrid(format!(
                "need at least 2 points, got {num}"
            )));
        }
        if !start_exp.is_finite() || !stop_exp.is_finite() {
            return Err(NearfieldError::InvalidGrid(format!(
                "exponents must be finite, got {start_exp}..{stop_exp}"
            )));
        }
        if stop_exp <= start_exp {
            return Err(NearfieldError::InvalidGrid(format!(
                "stop exponent {stop_exp} must exceed start exponent {start_exp}"
            )));
        }

        let step = (stop_exp - start_exp) / (num - 1) as f64;
        let values: Vec<f64> = (0..num)
            .map(|i| 10f64.powf(start_exp + step * i as f64))
            .collect();

        Self::from_values(values)
    }

    /// Wrap an existing sequence, checking the grid invariant.
    pub fn from_values(values: Vec<f64>) -> Result<Self, NearfieldError> {
        if values.len() < 2 {
            return Err(NearfieldError::InvalidGrid(format!(
                "need at least 2 points, got {}",
                values.len()
            )));
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite() || **v <= 0.0) {
            return Err(NearfieldError::InvalidGrid(format!(
                "values must be finite and positive, found {bad}"
            )));
        }
        if let Some(i) = values.windows(2).position(|w| w[1] <= w[0]) {
            return Err(NearfieldError::InvalidGrid(format!(
                "values must be strictly increasing (index {} -> {})",
                i,
                i + 1
            )));
        }
        Ok(Self { values })
    }

    /// Multiply every point by `factor` (e.g. `2·logspace(1, 4)` for 20 Hz – 20 kHz).
    pub fn scaled(&self, factor: f64) -> Result<Self, NearfieldError> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(NearfieldError::InvalidGrid(format!(
                "scale factor must be finite and positive, got {factor}"
            )));
        }
        Self::from_values(self.values.iter().map(|v| v * factor).collect())
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn first(&self) -> f64 {
        self.values[0]
    }

    pub fn last(&self) -> f64 {
        self.values[self.values.len() - 1]
    }

    /// Point at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_logspace_endpoints_and_length() {
        let grid = Grid::logspace(-1.0, 1.0, 100).unwrap();
        assert_eq!(grid.len(), 100);
        assert_relative_eq!(grid.first(), 0.1, max_relative = 1e-12);
        assert_relative_eq!(grid.last(), 10.0, max_relative = 1e-12);
    }

    #[test]
    fn test_logspace_constant_ratio() {
        let grid = Grid::logspace(1.0, 4.0, 100).unwrap();
        let ratio = grid.values()[1] / grid.values()[0];
        for w in grid.values().windows(2) {
            assert_relative_eq!(w[1] / w[0], ratio, max_relative = 1e-10);
        }
    }

    #[test]
    fn test_scaled_frequency_grid_spans_audio_band() {
        let freq = Grid::logspace(1.0, 4.0, 100).unwrap().scaled(2.0).unwrap();
        assert_relative_eq!(freq.first(), 20.0, max_relative = 1e-12);
        assert_relative_eq!(freq.last(), 20_000.0, max_relative = 1e-12);
    }

    #[test]
    fn test_rejects_degenerate_grids() {
        assert!(matches!(
            Grid::logspace(0.0, 1.0, 1),
            Err(NearfieldError::InvalidGrid(_))
        ));
        assert!(Grid::logspace(1.0, 1.0, 10).is_err());
        assert!(Grid::logspace(2.0, 1.0, 10).is_err());
        assert!(Grid::logspace(f64::NAN, 1.0, 10).is_err());
        assert!(Grid::from_values(vec![1.0, 1.0, 2.0]).is_err());
        assert!(Grid::from_values(vec![-1.0, 1.0]).is_err());
        assert!(Grid::from_values(vec![1.0, f64::INFINITY]).is_err());
    }

    #[test]
    fn test_scaled_rejects_non_positive_factor() {
        let grid = Grid::logspace(0.0, 1.0, 3).unwrap();
        assert!(grid.scaled(0.0).is_err());
        assert!(grid.scaled(-2.0).is_err());
    }

    #[test]
    fn test_get_second_point() {
        let grid = Grid::logspace(0.0, 2.0, 3).unwrap();
        assert_relative_eq!(grid.get(1).unwrap(), 10.0, max_relative = 1e-12);
        assert!(grid.get(3).is_none());
    }
}
