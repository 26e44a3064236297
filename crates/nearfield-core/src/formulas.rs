//! Closed-form near-field radiation quantities.
//!
//! All functions are pure. The `_curve` variants evaluate a whole [`Grid`]
//! with one `spherical_hn1_array` call per order.

use num_complex::Complex64;

use crate::constants::{wavenumber, ROLL_OFF_HZ};
use crate::grid::Grid;
use crate::spherical::{spherical_hn1, spherical_hn1_array};

/// Near-field amplification F_l(ζ) = ζ·l·h_l^(1)(ζ·l).
pub fn flz(l: u32, zeta: f64) -> Complex64 {
    let x = zeta * l as f64;
    x * spherical_hn1(l, x)
}

/// Radiation term A_l(k, s₀) = k·h_l^(1)(k·s₀).
pub fn alks0(l: u32, k: f64, s0: f64) -> Complex64 {
    k * spherical_hn1(l, k * s0)
}

/// Frequency weighting H_l(f) = |1 − 1/√(1 + (f / 200l)^l)|.
///
/// A smooth high-pass centred near 200·l Hz: → 0 as f → 0, → 1 as f → ∞.
pub fn hlf(l: u32, frequency: f64) -> f64 {
    let ratio = frequency / (ROLL_OFF_HZ * l as f64);
    (1.0 - 1.0 / (1.0 + ratio.powi(l as i32)).sqrt()).abs()
}

/// 20·log10(|z|).
pub fn magnitude_db(z: Complex64) -> f64 {
    20.0 * z.norm().log10()
}

/// |F_l(ζ)| in dB.
pub fn amplification_db(l: u32, zeta: f64) -> f64 {
    magnitude_db(flz(l, zeta))
}

/// Near-field compensation magnitude in dB at source distance `radius` (m):
///
/// ```text
/// 20·log10(s · H_l(f) · |A_l(k(f), s)|)
/// ```
pub fn compensation_db(l: u32, frequency: f64, radius: f64, speed_of_sound: f64) -> f64 {
    let k = wavenumber(frequency, speed_of_sound);
    let magnitude = radius * hlf(l, frequency) * alks0(l, k, radius).norm();
    20.0 * magnitude.log10()
}

/// `amplification_db` over every ζ in `grid`.
pub fn amplification_db_curve(l: u32, grid: &Grid) -> Vec<f64> {
    let args: Vec<f64> = grid.values().iter().map(|&zeta| zeta * l as f64).collect();
    args.iter()
        .zip(spherical_hn1_array(l, &args))
        .map(|(&x, h)| magnitude_db(x * h))
        .collect()
}

/// `compensation_db` over every frequency in `grid`.
pub fn compensation_db_curve(l: u32, grid: &Grid, radius: f64, speed_of_sound: f64) -> Vec<f64> {
    let ks: Vec<f64> = grid
        .values()
        .iter()
        .map(|&f| wavenumber(f, speed_of_sound))
        .collect();
    let args: Vec<f64> = ks.iter().map(|&k| k * radius).collect();
    grid.values()
        .iter()
        .zip(&ks)
        .zip(spherical_hn1_array(l, &args))
        .map(|((&f, &k), h)| {
            let magnitude = radius * hlf(l, f) * (k * h).norm();
            20.0 * magnitude.log10()
        })
        .collect()
}
