//! Assembly of the one-electron matrices in a basis.
use nalgebra::DMatrix;

use crate::{
    atom::Atom, basis::BasisFunction, error::IntegralError, hf::utils::try_symmetric_matrix,
};

use super::Integrator;

pub fn compute_overlap_matrix(
    basis: &[BasisFunction],
    integrator: &impl Integrator<Function = BasisFunction>,
) -> Result<DMatrix<f64>, IntegralError> {
    try_symmetric_matrix(basis.len(), |i, j| {
        let overlap_ij = integrator.overlap((&basis[i], &basis[j]))?;
        log::trace!("overlap ({i}{j}) = {overlap_ij}");
        Ok(overlap_ij)
    })
}

pub fn compute_kinetic_matrix(
    basis: &[BasisFunction],
    integrator: &impl Integrator<Function = BasisFunction>,
) -> Result<DMatrix<f64>, IntegralError> {
    try_symmetric_matrix(basis.len(), |i, j| {
        let kinetic_ij = integrator.kinetic((&basis[i], &basis[j]))?;
        log::trace!("kinetic ({i}{j}) = {kinetic_ij}");
        Ok(kinetic_ij)
    })
}

/// The nuclear attraction matrix, summed over all nuclei. Only the upper triangle is
/// integrated, the lower triangle is mirrored from it.
pub fn compute_nuclear_matrix(
    basis: &[BasisFunction],
    nuclei: &[Atom],
    integrator: &impl Integrator<Function = BasisFunction>,
) -> Result<DMatrix<f64>, IntegralError> {
    try_symmetric_matrix(basis.len(), |i, j| {
        let nuclear_ij = integrator.nuclear((&basis[i], &basis[j]), nuclei)?;
        log::trace!("nuclear ({i}{j}) = {nuclear_ij}");
        Ok(nuclear_ij)
    })
}

/// Kinetic energy plus nuclear attraction.
pub fn compute_core_hamiltonian(
    basis: &[BasisFunction],
    nuclei: &[Atom],
    integrator: &impl Integrator<Function = BasisFunction>,
) -> Result<DMatrix<f64>, IntegralError> {
    let kinetic = compute_kinetic_matrix(basis, integrator)?;
    log::debug!("kinetic matrix: {kinetic:0.4}");
    let nuclear = compute_nuclear_matrix(basis, nuclei, integrator)?;
    log::debug!("nuclear matrix: {nuclear:0.4}");

    Ok(kinetic + nuclear)
}
