use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{
    error::IntegralError,
    integrals::{factorial::double_factorial, tho},
};

/// Function of the form x^i*y^j*z^k*exp(-alpha*r^2), centered at some point.
///
/// This is an un-normalized primitive; the normalization factor is available through
/// [`Gaussian::norm`] and is applied by the integral routines.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Gaussian {
    pub exponent: f64,
    pub center: Vector3<f64>,
    /// (i, j, k) exponents of polynomial terms
    pub angular: (u32, u32, u32),
}

impl Gaussian {
    pub fn new(exponent: f64, center: Vector3<f64>, angular: (u32, u32, u32)) -> Self {
        Self {
            exponent,
            center,
            angular,
        }
    }

    pub fn total_angular(&self) -> u32 {
        let (i, j, k) = self.angular;
        i + j + k
    }

    /// The normalization factor of a cartesian gaussian:
    ///
    ///   (2a/pi)^(3/4) (4a)^((i+j+k)/2) / sqrt((2i-1)!! (2j-1)!! (2k-1)!!)
    pub fn norm(&self) -> Result<f64, IntegralError> {
        let (i, j, k) = self.angular;
        let a = self.exponent;

        let double_factorials = double_factorial(2 * i as i64 - 1)?
            * double_factorial(2 * j as i64 - 1)?
            * double_factorial(2 * k as i64 - 1)?;

        Ok((2.0 * a / std::f64::consts::PI).powf(0.75)
            * (4.0 * a).powf(self.total_angular() as f64 / 2.0)
            / double_factorials.sqrt())
    }

    /// Returns this gaussian with the angular momentum along `axis` changed by `delta`, or
    /// `None` if that would make it negative.
    pub(crate) fn shifted(&self, axis: usize, delta: i32) -> Option<Self> {
        let (i, j, k) = self.angular;
        let mut angular = [i, j, k];
        angular[axis] = angular[axis].checked_add_signed(delta)?;

        Some(Self {
            angular: (angular[0], angular[1], angular[2]),
            ..*self
        })
    }
}

/// A single `(coefficient, exponent)` pair of a contraction.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    pub exponent: f64,
    pub coefficient: f64,
}

/// Linear combination of many primitive [`Gaussian`]s that share a center and an angular
/// momentum.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContractedGaussian {
    /// (i, j, k) exponents of polynomial terms
    pub(crate) angular: (u32, u32, u32),
    pub(crate) primitives: SmallVec<[Primitive; 6]>,
}

impl ContractedGaussian {
    pub fn new(angular: (u32, u32, u32), primitives: impl IntoIterator<Item = Primitive>) -> Self {
        Self {
            angular,
            primitives: primitives.into_iter().collect(),
        }
    }

    pub fn angular(&self) -> (u32, u32, u32) {
        self.angular
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BasisFunction {
    pub contracted_gaussian: ContractedGaussian,
    /// The position of this basis function, in bohr
    pub position: Vector3<f64>,
}

impl BasisFunction {
    /// Creates a basis function with the contraction coefficients taken as given.
    pub fn new(position: Vector3<f64>, contracted_gaussian: ContractedGaussian) -> Self {
        Self {
            contracted_gaussian,
            position,
        }
    }

    /// Creates a basis function and rescales its contraction coefficients so that the
    /// contracted function has unit norm. Fails with [`IntegralError::VanishingNorm`] if the
    /// coefficients make the contraction vanish.
    pub fn normalized(
        position: Vector3<f64>,
        contracted_gaussian: ContractedGaussian,
    ) -> Result<Self, IntegralError> {
        let mut function = Self::new(position, contracted_gaussian);

        let mut self_overlap = 0.0;
        for ((coefficient_a, gaussian_a), (coefficient_b, gaussian_b)) in
            itertools::iproduct!(function.primitives(), function.primitives())
        {
            self_overlap +=
                coefficient_a * coefficient_b * tho::primitive_overlap(&gaussian_a, &gaussian_b)?;
        }
        if !(self_overlap > 0.0 && self_overlap.is_finite()) {
            return Err(IntegralError::VanishingNorm);
        }

        let scale = self_overlap.sqrt().recip();
        for primitive in &mut function.contracted_gaussian.primitives {
            primitive.coefficient *= scale;
        }

        Ok(function)
    }

    pub fn angular(&self) -> (u32, u32, u32) {
        self.contracted_gaussian.angular
    }

    /// Iterates over the `(coefficient, primitive)` pairs of this function.
    pub fn primitives(&self) -> impl Iterator<Item = (f64, Gaussian)> + Clone + '_ {
        let angular = self.contracted_gaussian.angular;
        self.contracted_gaussian
            .primitives
            .iter()
            .map(move |&Primitive {
                      exponent,
                      coefficient,
                  }| {
                (coefficient, Gaussian::new(exponent, self.position, angular))
            })
    }
}
