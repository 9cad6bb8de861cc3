use nalgebra::{DMatrix, DVector, SymmetricEigen};

use crate::{error::HartreeFockError, integrals::ElectronTensor};

#[inline(always)]
/// Create a symmetric, square matrix. Function is only run for upper triangle of the matrix
pub(crate) fn symmetric_matrix(
    n: usize,
    mut func: impl FnMut(usize, usize) -> f64,
) -> DMatrix<f64> {
    let m = DMatrix::from_fn(n, n, |i, j| if i <= j { func(i, j) } else { 0.0 });
    DMatrix::from_fn(n, n, |i, j| if i <= j { m[(i, j)] } else { m[(j, i)] })
}

/// Like [`symmetric_matrix`], but stops at the first error.
pub(crate) fn try_symmetric_matrix<E>(
    n: usize,
    mut func: impl FnMut(usize, usize) -> Result<f64, E>,
) -> Result<DMatrix<f64>, E> {
    let mut m = DMatrix::zeros(n, n);
    for j in 0..n {
        for i in 0..=j {
            let value = func(i, j)?;
            m[(i, j)] = value;
            m[(j, i)] = value;
        }
    }
    Ok(m)
}

pub(crate) fn eigs(matrix: DMatrix<f64>) -> (DMatrix<f64>, DVector<f64>) {
    let eigs = SymmetricEigen::new(matrix);
    (eigs.eigenvectors, eigs.eigenvalues)
}

/// Eigenvectors (as columns) and eigenvalues, sorted by ascending eigenvalue.
pub(crate) fn sorted_eigs(matrix: DMatrix<f64>) -> (DMatrix<f64>, DVector<f64>) {
    let (eigenvectors, eigenvalues) = eigs(matrix);

    let mut val_vec_pairs = eigenvalues
        .into_iter()
        .zip(eigenvectors.column_iter())
        .collect::<Vec<_>>();

    val_vec_pairs.sort_unstable_by(|(a, _), (b, _)| a.total_cmp(b));

    let (values, vectors): (Vec<_>, Vec<_>) = val_vec_pairs.into_iter().unzip();

    (
        DMatrix::from_columns(&vectors),
        DVector::from_column_slice(&values),
    )
}

/// Overlap eigenvalues below this fraction of the largest one mark a linearly dependent basis.
const LINEAR_DEPENDENCE_THRESHOLD: f64 = 1e-10;

/// The symmetric orthogonalizer X = U s^(-1/2) U^T with X^T S X = 1.
pub(crate) fn orthogonalizer(overlap: &DMatrix<f64>) -> Result<DMatrix<f64>, HartreeFockError> {
    let (u, s) = eigs(overlap.clone());

    let smallest_eigenvalue = s.min();
    if !(smallest_eigenvalue > LINEAR_DEPENDENCE_THRESHOLD * s.max()) {
        return Err(HartreeFockError::LinearDependence {
            smallest_eigenvalue,
        });
    }

    let diagonal_inv_sqrt = DMatrix::from_diagonal(&s.map(|value| value.sqrt().recip()));
    Ok(&u * (diagonal_inv_sqrt * u.transpose()))
}

/// P(i, j) = 2 sum_{k < n_occupied} C(i, k) C(j, k)
pub(crate) fn density_matrix(coefficients: &DMatrix<f64>, n_occupied: usize) -> DMatrix<f64> {
    let occupied = coefficients.columns(0, n_occupied);
    2.0 * &occupied * occupied.transpose()
}

/// G(i, j) = sum_{kl} P(k, l) [(ij|kl) - 1/2 (ik|jl)]
pub(crate) fn two_electron_matrix(
    density: &DMatrix<f64>,
    electron: &ElectronTensor,
) -> DMatrix<f64> {
    let n_basis = density.nrows();
    symmetric_matrix(n_basis, |i, j| {
        let mut sum = 0.0;
        for (k, l) in itertools::iproduct!(0..n_basis, 0..n_basis) {
            sum += density[(k, l)] * (electron[(i, j, k, l)] - 0.5 * electron[(i, k, j, l)]);
        }
        sum
    })
}

/// 1/2 sum_{ij} P(i, j) (H(i, j) + F(i, j))
pub(crate) fn electronic_energy(
    density: &DMatrix<f64>,
    core_hamiltonian: &DMatrix<f64>,
    fock: &DMatrix<f64>,
) -> f64 {
    0.5 * density.dot(&(core_hamiltonian + fock))
}

/// Root mean square over all elements of `new - old`.
pub(crate) fn rms_difference(new: &DMatrix<f64>, old: &DMatrix<f64>) -> f64 {
    let n_elements = new.len().max(1) as f64;
    ((new - old).norm_squared() / n_elements).sqrt()
}
