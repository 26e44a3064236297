use std::f64::consts::PI;

/// Speed of sound in air (m/s) used by all figures unless overridden.
pub const SPEED_OF_SOUND: f64 = 343.0;

/// Highest spherical-harmonic order drawn in each figure.
pub const MAX_ORDER: u32 = 6;

/// Number of samples in the ζ grid and in the frequency grid.
pub const NUM_ZETA: usize = 100;
pub const NUM_FREQ: usize = 100;

/// Centre of the `hlf` roll-off per unit order, in Hz.
pub const ROLL_OFF_HZ: f64 = 200.0;

/// Wavenumber k = 2πf / c in rad/m for frequency `f` (Hz) and speed of
/// sound `c` (m/s).
pub fn wavenumber(frequency: f64, c: f64) -> f64 {
    2.0 * PI * frequency / c
}

/// Wavenumber at the default speed of sound.
pub fn f2k(frequency: f64) -> f64 {
    wavenumber(frequency, SPEED_OF_SOUND)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_f2k_at_343_hz_is_two_pi() {
        assert_relative_eq!(f2k(343.0), 2.0 * PI, max_relative = 1e-15);
    }

    #[test]
    fn test_wavenumber_scales_with_speed_of_sound() {
        let k_air = wavenumber(1000.0, 343.0);
        let k_fast = wavenumber(1000.0, 686.0);
        assert_relative_eq!(k_air, 2.0 * k_fast, max_relative = 1e-15);
    }
}
