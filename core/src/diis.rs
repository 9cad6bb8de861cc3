//! Direct inversion in the iterative subspace.
use std::collections::VecDeque;

use nalgebra::{DMatrix, DVector, SVD};

use crate::error::HartreeFockError;

/// The default number of fock/error pairs kept for extrapolation.
pub const DEFAULT_CAPACITY: usize = 12;

const MAX_SVD_ITERATIONS: usize = 1000;
const SINGULAR_VALUE_CUTOFF: f64 = 1e-12;
const RESIDUAL_TOLERANCE: f64 = 1e-8;

#[derive(Clone, Debug)]
struct Sample {
    error: DMatrix<f64>,
    fock: DMatrix<f64>,
}

/// A bounded history of fock matrices and their error matrices. The oldest sample is evicted
/// once the capacity is exceeded.
#[derive(Clone, Debug)]
pub struct Diis {
    samples: VecDeque<Sample>,
    capacity: usize,
    /// weights of the most recent extrapolation
    coefficients: Vec<f64>,
}

impl Default for Diis {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Diis {
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            coefficients: Vec::new(),
        }
    }

    /// The commutator F P S - S P F, transformed into the orthogonal basis. Zero at
    /// self-consistency. All three input matrices must be symmetric.
    pub fn error_matrix(
        fock: &DMatrix<f64>,
        density: &DMatrix<f64>,
        overlap: &DMatrix<f64>,
        transform: &DMatrix<f64>,
    ) -> DMatrix<f64> {
        let fps = fock * density * overlap;
        let commutator = &fps - fps.transpose();
        transform.transpose() * commutator * transform
    }

    /// Largest absolute element of an error matrix.
    pub fn max_error(error: &DMatrix<f64>) -> f64 {
        error.amax()
    }

    /// Records a new sample and returns the extrapolated fock matrix sum_p c_p F_p, where the
    /// weights minimize the norm of sum_p c_p e_p under sum_p c_p = 1.
    ///
    /// A rank deficient history, such as collinear error vectors, is solved in the minimum
    /// norm sense, so the weights are unique and still sum to one. Fails with
    /// [`HartreeFockError::SingularDiis`] only if the error products are not finite or the
    /// solution does not satisfy the DIIS equations.
    pub fn extrapolate(
        &mut self,
        error: DMatrix<f64>,
        fock: DMatrix<f64>,
    ) -> Result<DMatrix<f64>, HartreeFockError> {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(Sample { error, fock });

        let n = self.samples.len();
        let mut errors = DMatrix::from_fn(n, n, |i, j| {
            self.samples[i].error.dot(&self.samples[j].error)
        });
        if errors.iter().any(|value| !value.is_finite()) {
            return Err(HartreeFockError::SingularDiis);
        }

        // scaling B leaves the weights unchanged and keeps the singular value cutoff meaningful
        // when the errors become small
        let scale = errors.diagonal().max();
        if scale > 0.0 {
            errors /= scale;
        }

        let matrix = DMatrix::from_fn(n + 1, n + 1, |i, j| match (i, j) {
            (i, j) if i == n && j == n => 0.0,
            (i, j) if i == n || j == n => -1.0,
            _ => errors[(i, j)],
        });
        let rhs = DVector::from_fn(n + 1, |i, _| if i == n { -1.0 } else { 0.0 });

        // collinear error vectors make B rank deficient, the minimum norm solution still
        // satisfies the constraint
        let solution = SVD::try_new(matrix.clone(), true, true, f64::EPSILON, MAX_SVD_ITERATIONS)
            .and_then(|svd| svd.solve(&rhs, SINGULAR_VALUE_CUTOFF).ok())
            .filter(|solution| solution.iter().all(|c| c.is_finite()))
            .filter(|solution| (&matrix * solution - &rhs).amax() < RESIDUAL_TOLERANCE)
            .ok_or(HartreeFockError::SingularDiis)?;

        self.coefficients = solution.iter().take(n).copied().collect();
        log::trace!("DIIS coefficients: {:?}", self.coefficients);

        let (rows, cols) = self.samples[0].fock.shape();
        let mut extrapolated = DMatrix::zeros(rows, cols);
        for (c, Sample { fock, .. }) in self.coefficients.iter().zip(&self.samples) {
            extrapolated += *c * fock;
        }
        Ok(extrapolated)
    }

    /// The weights of the most recent extrapolation, oldest sample first.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
