mod functions;
mod set;

pub use functions::{BasisFunction, ContractedGaussian, Gaussian, Primitive};
pub use set::BasisSet;

/// The highest total angular momentum of a single basis function the integral tables support.
pub const MAX_ANGULAR_MOMENTUM: u32 = 8;
