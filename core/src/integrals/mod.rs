use crate::{atom::Atom, error::IntegralError};

pub mod boys;
pub mod electron_tensor;
pub mod expansion;
pub(crate) mod factorial;
pub mod one_electron;
pub mod tho;

pub use electron_tensor::ElectronTensor;
pub use one_electron::{
    compute_core_hamiltonian, compute_kinetic_matrix, compute_nuclear_matrix,
    compute_overlap_matrix,
};

pub type DefaultIntegrator = tho::Tho;

pub trait Integrator {
    type Function;

    /// Calculate the overlap integral between two basis functions.
    fn overlap(
        &self,
        functions: (&Self::Function, &Self::Function),
    ) -> Result<f64, IntegralError>;

    /// Calculate the kinetic energy integral between two basis functions.
    fn kinetic(
        &self,
        functions: (&Self::Function, &Self::Function),
    ) -> Result<f64, IntegralError>;

    /// Calculate the nuclear attraction integral between two basis functions and the nuclei
    /// of a quantum system.
    fn nuclear(
        &self,
        functions: (&Self::Function, &Self::Function),
        nuclei: &[Atom],
    ) -> Result<f64, IntegralError>;

    /// Calculate the electron-electron repulsion integral between four basis functions.
    fn electron_repulsion(
        &self,
        functions: (
            &Self::Function,
            &Self::Function,
            &Self::Function,
            &Self::Function,
        ),
    ) -> Result<f64, IntegralError>;
}
