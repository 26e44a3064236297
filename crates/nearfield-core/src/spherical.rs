//! Spherical Bessel and Hankel functions of integer order.
//!
//! ```text
//! j_n(x) = √(π/2x) · J_{n+1/2}(x)
//! y_n(x) = √(π/2x) · Y_{n+1/2}(x)
//! h_n^(1)(x) = j_n(x) + i · y_n(x)
//! ```
//!
//! Only the orders and arguments used by the radiation formulas are
//! performance-relevant (n ≤ 6, 0.01 < x < 400), but every routine is valid
//! for any order. Non-finite or zero arguments are not rejected; they yield
//! non-finite results that propagate into the curves.

use num_complex::Complex64;

/// Spherical Bessel function of the first kind, j_n(x).
///
/// Picks the recurrence that is stable for the regime:
/// - |x| < 1: power series,
/// - |x| ≥ n: upward recurrence from j₀, j₁,
/// - otherwise: Miller's downward recurrence, normalised against whichever
///   of j₀(x), j₁(x) is larger in magnitude (so zeros of sin x are harmless).
pub fn spherical_jn(n: u32, x: f64) -> f64 {
    if !x.is_finite() {
        return f64::NAN;
    }
    if x == 0.0 {
        return if n == 0 { 1.0 } else { 0.0 };
    }
    if n == 0 {
        return x.sin() / x;
    }

    let ax = x.abs();
    if ax < 1.0 {
        return jn_series(n, x);
    }
    if ax >= n as f64 {
        return jn_upward(n, x);
    }
    jn_miller(n, x)
}

/// Spherical Bessel function of the second kind (Neumann), y_n(x).
///
/// Upward recurrence is stable for y_n at every argument:
/// ```text
/// y_{k+1}(x) = (2k+1)/x · y_k(x) − y_{k-1}(x)
/// ```
pub fn spherical_yn(n: u32, x: f64) -> f64 {
    if !x.is_finite() {
        return f64::NAN;
    }
    if x == 0.0 {
        // y_n → −∞ as x → 0
        return f64::NEG_INFINITY;
    }

    let (sin_x, cos_x) = x.sin_cos();
    let y0 = -cos_x / x;
    if n == 0 {
        return y0;
    }
    let y1 = -cos_x / (x * x) - sin_x / x;

    let mut prev = y0;
    let mut curr = y1;
    for k in 1..n {
        let next = (2 * k + 1) as f64 / x * curr - prev;
        prev = curr;
        curr = next;
    }
    curr
}

/// Spherical Hankel function of the first kind for a real argument,
/// computed as `j_n(x) + i·y_n(x)`.
pub fn spherical_hn1(n: u32, x: f64) -> Complex64 {
    Complex64::new(spherical_jn(n, x), spherical_yn(n, x))
}

/// Elementwise `spherical_hn1` over a slice of arguments.
pub fn spherical_hn1_array(n: u32, xs: &[f64]) -> Vec<Complex64> {
    xs.iter().map(|&x| spherical_hn1(n, x)).collect()
}

/// Spherical Hankel function of the first kind for a complex argument.
///
/// Uses the terminating series
/// ```text
/// h_n^(1)(z) = (−i)^{n+1} · e^{iz}/z · Σ_{k=0..n} (n+k)! / (k!·(n−k)!) · (i / 2z)^k
/// ```
/// which is exact for integer orders.
pub fn spherical_hn1_complex(n: u32, z: Complex64) -> Complex64 {
    let i = Complex64::new(0.0, 1.0);
    let ratio = i / (2.0 * z);

    let mut coeff = 1.0;
    let mut power = Complex64::new(1.0, 0.0);
    let mut sum = Complex64::new(1.0, 0.0);
    for k in 1..=n {
        // (n+k)!/(k!(n−k)!) from its predecessor
        coeff *= ((n + k) * (n - k + 1)) as f64 / k as f64;
        power *= ratio;
        sum += coeff * power;
    }

    let phase = match (n + 1) % 4 {
        0 => Complex64::new(1.0, 0.0),
        1 => Complex64::new(0.0, -1.0),
        2 => Complex64::new(-1.0, 0.0),
        _ => Complex64::new(0.0, 1.0),
    };

    phase * (i * z).exp() / z * sum
}

// ---------------------------------------------------------------------------
// j_n regimes
// ---------------------------------------------------------------------------

/// j_n(x) = x^n/(2n+1)!! · Σ_m (−x²/2)^m / (m!·(2n+3)(2n+5)…(2n+2m+1))
fn jn_series(n: u32, x: f64) -> f64 {
    let mut prefactor = 1.0;
    for k in 1..=n {
        prefactor *= x / (2 * k + 1) as f64;
    }

    let half_x2 = -0.5 * x * x;
    let mut term = 1.0;
    let mut sum = 1.0;
    for m in 1..60u32 {
        term *= half_x2 / (m as f64 * (2 * n + 2 * m + 1) as f64);
        sum += term;
        if term.abs() < 1e-17 * sum.abs() {
            break;
        }
    }
    prefactor * sum
}

fn jn_upward(n: u32, x: f64) -> f64 {
    let (sin_x, cos_x) = x.sin_cos();
    let mut prev = sin_x / x;
    let mut curr = sin_x / (x * x) - cos_x / x;
    for k in 1..n {
        let next = (2 * k + 1) as f64 / x * curr - prev;
        prev = curr;
        curr = next;
    }
    curr
}

fn jn_miller(n: u32, x: f64) -> f64 {
    let n = n as usize;
    let start = n + x.abs().ceil() as usize + 20;

    let mut values = vec![0.0; start + 2];
    values[start] = 1e-30;

    // j_{k} = (2k+3)/x · j_{k+1} − j_{k+2}
    for k in (0..start).rev() {
        values[k] = (2 * k + 3) as f64 / x * values[k + 1] - values[k + 2];
        if values[k].abs() > 1e250 {
            for v in values[k..].iter_mut() {
                *v *= 1e-250;
            }
        }
    }

    let (sin_x, cos_x) = x.sin_cos();
    let j0 = sin_x / x;
    let j1 = sin_x / (x * x) - cos_x / x;
    let scale = if j0.abs() >= j1.abs() {
        j0 / values[0]
    } else {
        j1 / values[1]
    };

    values[n] * scale
}
