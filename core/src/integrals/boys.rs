//! The Boys function F_n(x) = int_0^1 t^(2n) exp(-x t^2) dt.
//!
//! Evaluated through Tricomi's incomplete gamma function:
//!
//!   F_n(x) = 1/2 * Gamma(n + 1/2) * gamma*(n + 1/2, x)
//!
//! where gamma*(a, x) = x^(-a) P(a, x) and P is the regularized lower incomplete gamma
//! function. Close to zero the closed form suffers from cancellation, so a Taylor expansion
//! is used there instead.

/// Arguments at or below this value use the Taylor expansion around zero.
const TAYLOR_THRESHOLD: f64 = 1e-6;

const MAX_ITERATIONS: usize = 10_000;

/// Guards the continued fraction against division by zero
const TINY: f64 = 1e-300;

/// Evaluates the Boys function of the given order at `x >= 0`.
pub fn boys(order: u32, x: f64) -> f64 {
    let n = order as f64;

    if x <= TAYLOR_THRESHOLD {
        return (2.0 * n + 1.0).recip() - x / (2.0 * n + 3.0);
    }

    let a = n + 0.5;
    0.5 * libm::tgamma(a) * tricomi_gamma(a, x)
}

/// Fills `values[n]` with F_n(x) for every n in `0..values.len()`.
pub(crate) fn boys_table(x: f64, values: &mut [f64]) {
    for (order, value) in values.iter_mut().enumerate() {
        *value = boys(order as u32, x);
    }
}

/// Tricomi's incomplete gamma function x^(-a) P(a, x) for x > 0.
fn tricomi_gamma(a: f64, x: f64) -> f64 {
    if x < a + 1.0 {
        // P(a, x) = exp(-x) x^a / Gamma(a + 1) * series; the x^a cancels
        f64::exp(-x) * lower_gamma_series(a, x) / libm::tgamma(a + 1.0)
    } else {
        (1.0 - upper_gamma_fraction(a, x)) * x.powf(-a)
    }
}

/// sum_{k >= 0} x^k / ((a + 1)(a + 2)...(a + k))
fn lower_gamma_series(a: f64, x: f64) -> f64 {
    let mut denominator = a;
    let mut term = 1.0;
    let mut sum = 1.0;

    for _ in 0..MAX_ITERATIONS {
        denominator += 1.0;
        term *= x / denominator;
        sum += term;

        if term.abs() < sum.abs() * f64::EPSILON {
            break;
        }
    }
    sum
}

/// The regularized upper incomplete gamma function Q(a, x), evaluated with a continued
/// fraction (modified Lentz method). Converges quickly for x >= a + 1.
fn upper_gamma_fraction(a: f64, x: f64) -> f64 {
    let mut b = x + 1.0 - a;
    let mut c = TINY.recip();
    let mut d = b.recip();
    let mut fraction = d;

    for i in 1..MAX_ITERATIONS {
        let i = i as f64;
        let an = -i * (i - a);
        b += 2.0;

        d = an * d + b;
        if d.abs() < TINY {
            d = TINY;
        }
        c = b + an / c;
        if c.abs() < TINY {
            c = TINY;
        }

        d = d.recip();
        let delta = d * c;
        fraction *= delta;

        if (delta - 1.0).abs() < f64::EPSILON {
            break;
        }
    }

    f64::exp(-x + a * x.ln() - libm::lgamma(a)) * fraction
}
