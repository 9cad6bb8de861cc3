use thiserror::Error;

/// Errors that indicate an integral was requested outside of its valid index range, or a
/// contraction that cannot be normalized.
///
/// These are never recoverable: they point at a bug in the index bookkeeping, at a
/// basis set with more angular momentum than the precomputed tables support, or at
/// contraction coefficients that cancel out.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum IntegralError {
    #[error("factorial of negative argument {0} requested")]
    NegativeFactorial(i64),
    #[error("factorial of {argument} exceeds the precomputed table (maximum {max})")]
    FactorialOutOfRange { argument: i64, max: usize },
    #[error("double factorial of {argument} exceeds the precomputed table (maximum {max})")]
    DoubleFactorialOutOfRange { argument: i64, max: usize },
    #[error("contracted gaussian has zero or non-finite norm")]
    VanishingNorm,
}

/// Errors produced by a hartree fock calculation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum HartreeFockError {
    #[error(transparent)]
    Integral(#[from] IntegralError),
    #[error("DIIS extrapolation failed: the error matrix system is singular")]
    SingularDiis,
    #[error("overlap matrix is not positive definite (smallest eigenvalue {smallest_eigenvalue:e}), the basis is linearly dependent")]
    LinearDependence { smallest_eigenvalue: f64 },
    #[error("restricted hartree fock needs an even number of electrons that fits into {n_basis} basis functions, got {n_electrons}")]
    InvalidElectronCount { n_electrons: i64, n_basis: usize },
    #[error("matrix dimensions disagree: expected {expected}x{expected}, got {rows}x{cols}")]
    DimensionMismatch {
        expected: usize,
        rows: usize,
        cols: usize,
    },
    #[error("SCF did not converge within {iterations} iterations (last density change {last_delta:e})")]
    NotConverged { iterations: usize, last_delta: f64 },
}

impl HartreeFockError {
    /// Returns true if this error is a convergence failure rather than a defect in the input
    /// or in the numerics.
    pub fn is_convergence_failure(&self) -> bool {
        matches!(self, Self::NotConverged { .. })
    }
}

/// Errors produced when converting configuration input into a molecule or a basis.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("basis function could not be normalized")]
    Integral(#[from] IntegralError),
    #[error("atom {index} doesn't have x, y, z coordinates (got {len} values)")]
    BadCoordinates { index: usize, len: usize },
    #[error("atom {index} has a nuclear charge of zero")]
    ZeroCharge { index: usize },
    #[error("basis function {index} has no primitives")]
    EmptyContraction { index: usize },
    #[error("basis function {index} has zero or non-finite norm, check its coefficients")]
    VanishingNorm { index: usize },
    #[error("basis function {index} has a non-positive exponent {exponent}")]
    NonPositiveExponent { index: usize, exponent: f64 },
    #[error("basis function {index} refers to atom {atom}, but the molecule only has {n_atoms} atoms")]
    UnknownAtom {
        index: usize,
        atom: usize,
        n_atoms: usize,
    },
    #[error("basis function {index} must specify exactly one of `atom` and `center`")]
    AmbiguousCenter { index: usize },
    #[error("basis function {index} has angular momentum {angular} which exceeds the supported maximum {max}")]
    AngularMomentumTooHigh { index: usize, angular: u32, max: u32 },
}
