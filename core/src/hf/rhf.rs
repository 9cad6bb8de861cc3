use nalgebra::{DMatrix, DVector};

use crate::{
    basis::BasisFunction,
    config::HartreeFockConfig,
    diis::Diis,
    error::HartreeFockError,
    integrals::{compute_core_hamiltonian, compute_overlap_matrix, ElectronTensor, Integrator},
};

use super::{utils, HartreeFockInput};

/// The matrices that stay fixed during an SCF run.
#[derive(Clone, Debug)]
pub struct ScfProblem {
    pub overlap: DMatrix<f64>,
    pub core_hamiltonian: DMatrix<f64>,
    pub electron: ElectronTensor,
    pub n_electrons: usize,
    pub nuclear_repulsion: f64,
}

impl ScfProblem {
    /// Checks that all matrices agree on the basis size and that the electrons fit into
    /// doubly occupied orbitals.
    pub fn new(
        overlap: DMatrix<f64>,
        core_hamiltonian: DMatrix<f64>,
        electron: ElectronTensor,
        n_electrons: i64,
        nuclear_repulsion: f64,
    ) -> Result<Self, HartreeFockError> {
        let n_basis = electron.size();
        for matrix in [&overlap, &core_hamiltonian] {
            let (rows, cols) = matrix.shape();
            if rows != n_basis || cols != n_basis {
                return Err(HartreeFockError::DimensionMismatch {
                    expected: n_basis,
                    rows,
                    cols,
                });
            }
        }

        let invalid = HartreeFockError::InvalidElectronCount {
            n_electrons,
            n_basis,
        };
        let n_electrons = usize::try_from(n_electrons).map_err(|_| invalid.clone())?;
        if n_electrons % 2 != 0 || n_electrons / 2 > n_basis {
            return Err(invalid);
        }

        Ok(Self {
            overlap,
            core_hamiltonian,
            electron,
            n_electrons,
            nuclear_repulsion,
        })
    }

    /// Computes all integrals of the input.
    pub fn from_input(
        input: &HartreeFockInput,
        integrator: &impl Integrator<Function = BasisFunction>,
    ) -> Result<Self, HartreeFockError> {
        let basis = input.basis.functions();
        let nuclei = input.molecule.atoms();

        log::debug!(
            "{} basis functions, highest angular momentum {}",
            input.basis.len(),
            input.basis.max_angular()
        );

        let nuclear_repulsion = input.molecule.nuclear_repulsion();
        log::debug!("nuclear repulsion energy: {nuclear_repulsion}");

        let overlap = compute_overlap_matrix(basis, integrator)?;
        log::debug!("overlap matrix: {overlap:0.4}");
        let core_hamiltonian = compute_core_hamiltonian(basis, nuclei, integrator)?;
        let electron = ElectronTensor::from_basis(basis, integrator)?;

        Self::new(
            overlap,
            core_hamiltonian,
            electron,
            input.molecule.n_electrons(),
            nuclear_repulsion,
        )
    }

    pub fn n_basis(&self) -> usize {
        self.electron.size()
    }

    pub fn n_occupied(&self) -> usize {
        self.n_electrons / 2
    }
}

/// The mutable state of one SCF run.
#[derive(Clone, Debug)]
pub struct ScfState {
    pub density: DMatrix<f64>,
    pub fock: DMatrix<f64>,
    pub coefficients: DMatrix<f64>,
    pub orbital_energies: DVector<f64>,
    /// the number of completed steps
    pub iteration: usize,
    pub converged: bool,
    pub diis_active: bool,
}

impl ScfState {
    fn new(n_basis: usize) -> Self {
        Self {
            density: DMatrix::zeros(n_basis, n_basis),
            fock: DMatrix::zeros(n_basis, n_basis),
            coefficients: DMatrix::zeros(n_basis, n_basis),
            orbital_energies: DVector::zeros(n_basis),
            iteration: 0,
            converged: false,
            diis_active: false,
        }
    }
}

/// Diagnostics of a single SCF step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IterationRecord {
    /// one based
    pub iteration: usize,
    /// The electronic energy of the density going into this step. Not available for the
    /// first step, whose fock matrix comes from the initial guess.
    pub electronic_energy: Option<f64>,
    /// rms change of the density matrix
    pub density_delta: f64,
    /// largest element of the DIIS error matrix
    pub diis_error: Option<f64>,
    pub diis_active: bool,
}

/// The output of a restricted hartree fock calculation
#[derive(Clone, Debug)]
pub struct RestrictedHartreeFockOutput {
    /// the orbital energies that were found in this hartree fock calculation, sorted in
    /// ascending order
    pub orbital_energies: Vec<f64>,
    /// molecular orbital coefficients, one orbital per column
    pub coefficients: DMatrix<f64>,
    pub density: DMatrix<f64>,
    /// The electronic energy of the system
    pub electronic_energy: f64,
    /// The nuclear repulsion energy
    pub nuclear_repulsion: f64,
    /// After how many iterations did the system converge
    pub iterations: usize,
    pub history: Vec<IterationRecord>,
}

impl RestrictedHartreeFockOutput {
    pub fn total_energy(&self) -> f64 {
        self.electronic_energy + self.nuclear_repulsion
    }
}

/// Drives the fixed point iteration of one SCF run. Every run starts from a fresh driver.
pub struct ScfDriver<'a> {
    problem: &'a ScfProblem,
    config: &'a HartreeFockConfig,
    transform: DMatrix<f64>,
    state: ScfState,
    diis: Option<Diis>,
    history: Vec<IterationRecord>,
}

impl<'a> ScfDriver<'a> {
    pub fn new(
        problem: &'a ScfProblem,
        config: &'a HartreeFockConfig,
    ) -> Result<Self, HartreeFockError> {
        let transform = utils::orthogonalizer(&problem.overlap)?;
        let diis = config
            .diis
            .enabled
            .then(|| Diis::new(config.diis.capacity));

        Ok(Self {
            problem,
            config,
            transform,
            state: ScfState::new(problem.n_basis()),
            diis,
            history: Vec::new(),
        })
    }

    pub fn state(&self) -> &ScfState {
        &self.state
    }

    pub fn history(&self) -> &[IterationRecord] {
        &self.history
    }

    /// Performs one SCF step. Returns the electronic energy once the density has converged.
    pub fn step(&mut self) -> Result<Option<f64>, HartreeFockError> {
        let problem = self.problem;
        let ScfProblem {
            overlap,
            core_hamiltonian,
            electron,
            ..
        } = problem;
        let first_step = self.state.iteration == 0;
        self.state.iteration += 1;

        let (fock, electronic_energy) = if first_step {
            let fock = self.config.initial_guess.fock(core_hamiltonian, overlap);
            (fock, None)
        } else {
            let two_electron = utils::two_electron_matrix(&self.state.density, electron);
            let fock = core_hamiltonian + two_electron;
            let energy = utils::electronic_energy(&self.state.density, core_hamiltonian, &fock);
            (fock, Some(energy))
        };
        self.state.fock = fock.clone();

        let mut diis_error = None;
        let fock = match self.diis.as_mut() {
            Some(diis) if !first_step => {
                let error =
                    Diis::error_matrix(&fock, &self.state.density, overlap, &self.transform);
                let max_error = Diis::max_error(&error);
                diis_error = Some(max_error);

                if !self.state.diis_active && max_error < self.config.diis.activation_threshold {
                    log::warn!(
                        "DIIS activated in iteration {} (max error {max_error:1.4e})",
                        self.state.iteration
                    );
                    self.state.diis_active = true;
                }

                if self.state.diis_active {
                    diis.extrapolate(error, fock)?
                } else {
                    fock
                }
            }
            _ => fock,
        };

        let transformed_fock = self.transform.transpose() * (&fock * &self.transform);
        let (transformed_coefficients, orbital_energies) = utils::sorted_eigs(transformed_fock);
        let coefficients = &self.transform * transformed_coefficients;

        let density = utils::density_matrix(&coefficients, problem.n_occupied());
        let density_delta = utils::rms_difference(&density, &self.state.density);

        log::info!(
            "iteration {:<4} - electronic energy {}. density rms {density_delta:1.4e}. DIIS error {}",
            self.state.iteration,
            electronic_energy.map_or_else(|| "-".to_string(), |energy| format!("{energy:1.8}")),
            diis_error.map_or_else(|| "-".to_string(), |error| format!("{error:1.4e}")),
        );
        self.history.push(IterationRecord {
            iteration: self.state.iteration,
            electronic_energy,
            density_delta,
            diis_error,
            diis_active: self.state.diis_active,
        });

        self.state.coefficients = coefficients;
        self.state.orbital_energies = orbital_energies;

        if density_delta < self.config.density_threshold {
            // the energy of the density that produced the converged orbitals
            let energy = electronic_energy.unwrap_or_else(|| {
                utils::electronic_energy(&self.state.density, core_hamiltonian, &self.state.fock)
            });
            self.state.density = density;
            self.state.converged = true;
            return Ok(Some(energy));
        }

        self.state.density = density;
        Ok(None)
    }

    /// Iterates until the density is converged or the iteration limit is reached.
    pub fn run(mut self) -> Result<RestrictedHartreeFockOutput, HartreeFockError> {
        let mut last_delta = f64::INFINITY;

        while self.state.iteration < self.config.max_iterations {
            if let Some(electronic_energy) = self.step()? {
                log::info!(
                    "converged after {} iterations: electronic energy {electronic_energy:1.10}",
                    self.state.iteration
                );
                let ScfState {
                    density,
                    coefficients,
                    orbital_energies,
                    iteration,
                    ..
                } = self.state;

                return Ok(RestrictedHartreeFockOutput {
                    orbital_energies: orbital_energies.as_slice().to_vec(),
                    coefficients,
                    density,
                    electronic_energy,
                    nuclear_repulsion: self.problem.nuclear_repulsion,
                    iterations: iteration,
                    history: self.history,
                });
            }
            if let Some(record) = self.history.last() {
                last_delta = record.density_delta;
            }
        }

        log::error!(
            "SCF did not converge within {} iterations",
            self.config.max_iterations
        );
        Err(HartreeFockError::NotConverged {
            iterations: self.state.iteration,
            last_delta,
        })
    }
}

/// Runs a restricted hartree fock calculation with the given integrator.
pub fn restricted_hartree_fock_with(
    input: &HartreeFockInput,
    integrator: &impl Integrator<Function = BasisFunction>,
) -> Result<RestrictedHartreeFockOutput, HartreeFockError> {
    let problem = ScfProblem::from_input(input, integrator)?;
    ScfDriver::new(&problem, input.config)?.run()
}

/// Runs a restricted hartree fock calculation with the default integrator.
pub fn restricted_hartree_fock(
    input: &HartreeFockInput,
) -> Result<RestrictedHartreeFockOutput, HartreeFockError> {
    restricted_hartree_fock_with(input, &crate::integrals::DefaultIntegrator::default())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::{hf::InitialGuess, molecule::Molecule, testing::TestInstance};

    fn problem(instance: &TestInstance) -> ScfProblem {
        let config = HartreeFockConfig::default();
        let input = HartreeFockInput {
            molecule: &instance.molecule,
            basis: &instance.basis,
            config: &config,
        };
        ScfProblem::from_input(&input, &crate::integrals::DefaultIntegrator::default()).unwrap()
    }

    #[test]
    fn odd_electron_counts_are_rejected() {
        let TestInstance {
            molecule, basis, ..
        } = TestInstance::hydrogen_sto3g();
        let cation = Molecule::new(molecule.atoms().to_vec(), 1);
        let config = HartreeFockConfig::default();
        let input = HartreeFockInput {
            molecule: &cation,
            basis: &basis,
            config: &config,
        };

        assert_eq!(
            restricted_hartree_fock(&input).unwrap_err(),
            HartreeFockError::InvalidElectronCount {
                n_electrons: 1,
                n_basis: 2
            }
        );
    }

    #[test]
    fn too_many_electrons_are_rejected() {
        let TestInstance {
            molecule, basis, ..
        } = TestInstance::hydrogen_sto3g();
        let anion = Molecule::new(molecule.atoms().to_vec(), -4);
        let config = HartreeFockConfig::default();
        let input = HartreeFockInput {
            molecule: &anion,
            basis: &basis,
            config: &config,
        };

        assert!(matches!(
            restricted_hartree_fock(&input),
            Err(HartreeFockError::InvalidElectronCount { n_electrons: 6, .. })
        ));
    }

    #[test]
    fn duplicated_basis_functions_are_rejected() {
        let instance = TestInstance::hydrogen_sto3g();
        let first = instance.basis_functions()[0].clone();
        let basis: crate::basis::BasisSet = instance
            .basis_functions()
            .iter()
            .cloned()
            .chain(std::iter::once(first))
            .collect();
        let config = HartreeFockConfig::default();
        let input = HartreeFockInput {
            molecule: &instance.molecule,
            basis: &basis,
            config: &config,
        };

        assert!(matches!(
            restricted_hartree_fock(&input),
            Err(HartreeFockError::LinearDependence { .. })
        ));
    }

    #[test]
    fn mismatched_matrices_are_rejected() {
        let electron = ElectronTensor::from_fn(2, |_, _, _, _| 0.0);
        let result = ScfProblem::new(
            DMatrix::identity(2, 2),
            DMatrix::zeros(3, 3),
            electron,
            2,
            0.0,
        );

        assert_eq!(
            result.unwrap_err(),
            HartreeFockError::DimensionMismatch {
                expected: 2,
                rows: 3,
                cols: 3
            }
        );
    }

    #[test]
    fn first_step_uses_the_initial_guess() {
        let problem = problem(&TestInstance::hydrogen_sto3g());
        let config = HartreeFockConfig::default();
        let mut driver = ScfDriver::new(&problem, &config).unwrap();

        assert_eq!(driver.step().unwrap(), None);
        assert_eq!(driver.state().fock, problem.core_hamiltonian);
        assert_eq!(driver.state().iteration, 1);

        let record = driver.history()[0];
        assert_eq!(record.electronic_energy, None);
        assert_eq!(record.diis_error, None);
        assert!(!record.diis_active);
    }

    #[test]
    fn density_has_the_electron_count() {
        let problem = problem(&TestInstance::water_sto3g());
        let config = HartreeFockConfig::default();
        let mut driver = ScfDriver::new(&problem, &config).unwrap();
        driver.step().unwrap();

        // tr(P S) = N
        let electrons = (&driver.state().density * &problem.overlap).trace();
        assert_relative_eq!(electrons, 10.0, epsilon = 1e-10);
        assert_relative_eq!(
            driver.state().density.clone(),
            driver.state().density.transpose(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn fresh_driver_repeats_the_run() {
        let problem = problem(&TestInstance::helium_hydride_sto3g());
        let config = HartreeFockConfig {
            initial_guess: InitialGuess::extended_huckel(),
            ..Default::default()
        };

        let first = ScfDriver::new(&problem, &config).unwrap().run().unwrap();
        let second = ScfDriver::new(&problem, &config).unwrap().run().unwrap();

        assert_eq!(first.iterations, second.iterations);
        assert_eq!(first.electronic_energy, second.electronic_energy);
        assert_eq!(first.history, second.history);
    }

    #[test]
    fn no_iterations_is_not_converged() {
        let problem = problem(&TestInstance::hydrogen_sto3g());
        let config = HartreeFockConfig {
            max_iterations: 0,
            ..Default::default()
        };

        let error = ScfDriver::new(&problem, &config).unwrap().run().unwrap_err();
        assert!(error.is_convergence_failure());
        assert_eq!(
            error,
            HartreeFockError::NotConverged {
                iterations: 0,
                last_delta: f64::INFINITY
            }
        );
    }
}
