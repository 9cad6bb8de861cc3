//! Gaussian product theorem and the binomial expansion of the polynomial prefactors
//! of a product of two cartesian gaussians.
use nalgebra::Vector3;

use crate::basis::Gaussian;

use super::factorial::binomial;

/// The product of two gaussians, which is again a gaussian centered between the two.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GaussianProduct {
    /// the combined exponent, a + b
    pub exponent: f64,
    /// the exponent-weighted center (a * A + b * B) / (a + b)
    pub center: Vector3<f64>,
    /// exp(-a * b / (a + b) * |A - B|^2)
    pub prefactor: f64,
}

impl GaussianProduct {
    pub fn new(gaussian_a: &Gaussian, gaussian_b: &Gaussian) -> Self {
        let (a, b) = (gaussian_a.exponent, gaussian_b.exponent);
        let exponent = a + b;
        let center = (a * gaussian_a.center + b * gaussian_b.center) / exponent;
        let distance_squared = (gaussian_a.center - gaussian_b.center).norm_squared();

        Self {
            exponent,
            center,
            prefactor: f64::exp(-a * b / exponent * distance_squared),
        }
    }
}

/// Coefficient of x^j in the expansion of (x + a)^l * (x + b)^m:
///
///   sum_{k = max(0, j - m)}^{min(j, l)} C(l, k) C(m, j - k) a^(l - k) b^(m + k - j)
///
/// `a` and `b` are the signed distances of the product center to the two gaussian centers
/// along one axis.
pub fn expansion_coefficient(j: u32, l: u32, m: u32, a: f64, b: f64) -> f64 {
    let (j, l, m) = (j as i64, l as i64, m as i64);
    let lower = (j - m).max(0);
    let upper = j.min(l);

    let mut sum = 0.0;
    for k in lower..=upper {
        // powi(0) is 1 even for a zero base, and both exponents are non-negative in this range
        sum += binomial(l, k)
            * binomial(m, j - k)
            * a.powi((l - k) as i32)
            * b.powi((m + k - j) as i32);
    }
    sum
}
