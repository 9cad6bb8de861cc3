use approx::assert_relative_eq;
use scf_core::{
    config::HartreeFockConfig,
    error::HartreeFockError,
    hf::{restricted_hartree_fock, HartreeFockInput, InitialGuess, RestrictedHartreeFockOutput},
    testing::TestInstance,
};

fn run(
    instance: &TestInstance,
    config: &HartreeFockConfig,
) -> Result<RestrictedHartreeFockOutput, HartreeFockError> {
    restricted_hartree_fock(&HartreeFockInput {
        molecule: &instance.molecule,
        basis: &instance.basis,
        config,
    })
}

#[test]
fn hydrogen_sto3g() {
    let output = run(&TestInstance::hydrogen_sto3g(), &HartreeFockConfig::default()).unwrap();

    assert_relative_eq!(output.nuclear_repulsion, 1.0 / 1.4, epsilon = 1e-12);
    assert_relative_eq!(output.total_energy(), -1.11676, epsilon = 1e-4);
    // Szabo & Ostlund, eq. 3.272
    assert_relative_eq!(output.orbital_energies[0], -0.578, epsilon = 1e-3);
    assert_relative_eq!(output.orbital_energies[1], 0.670, epsilon = 1e-3);
}

#[test]
fn hydrogen_631g() {
    let output = run(&TestInstance::hydrogen_631g(), &HartreeFockConfig::default()).unwrap();

    assert_relative_eq!(output.electronic_energy, -1.8410539726907735, epsilon = 1e-5);
}

#[test]
fn helium_hydride_sto3g() {
    let output = run(
        &TestInstance::helium_hydride_sto3g(),
        &HartreeFockConfig::default(),
    )
    .unwrap();

    assert_relative_eq!(output.electronic_energy, -4.227529, epsilon = 1e-5);
    assert_relative_eq!(output.total_energy(), -2.860662, epsilon = 1e-5);
}

#[test]
fn water_sto3g() {
    let output = run(&TestInstance::water_sto3g(), &HartreeFockConfig::default()).unwrap();

    assert_relative_eq!(output.nuclear_repulsion, 8.002367061810450, epsilon = 1e-8);
    assert_relative_eq!(output.total_energy(), -74.942079928192, epsilon = 1e-5);
    assert!(output
        .orbital_energies
        .windows(2)
        .all(|pair| pair[0] <= pair[1]));
}

#[test]
fn water_without_diis() {
    let config = HartreeFockConfig {
        diis: scf_core::config::DiisConfig {
            enabled: false,
            ..Default::default()
        },
        ..Default::default()
    };
    let with_diis = run(&TestInstance::water_sto3g(), &HartreeFockConfig::default()).unwrap();
    let without_diis = run(&TestInstance::water_sto3g(), &config).unwrap();

    assert_relative_eq!(
        with_diis.total_energy(),
        without_diis.total_energy(),
        epsilon = 1e-5
    );
    assert!(without_diis.history.iter().all(|record| !record.diis_active));
    assert!(with_diis.iterations <= without_diis.iterations);
}

#[test]
fn huckel_guess_converges_to_the_same_energy() {
    let config = HartreeFockConfig {
        initial_guess: InitialGuess::extended_huckel(),
        ..Default::default()
    };
    let output = run(&TestInstance::water_sto3g(), &config).unwrap();

    assert_relative_eq!(output.total_energy(), -74.942079928192, epsilon = 1e-5);
}

#[test]
fn single_iteration_does_not_converge() {
    let config = HartreeFockConfig {
        max_iterations: 1,
        ..Default::default()
    };

    for instance in [
        TestInstance::hydrogen_sto3g(),
        TestInstance::helium_hydride_sto3g(),
        TestInstance::water_sto3g(),
    ] {
        let error = run(&instance, &config).unwrap_err();

        assert!(error.is_convergence_failure(), "{}: {error}", instance.name);
        assert!(matches!(
            error,
            HartreeFockError::NotConverged { iterations: 1, last_delta } if last_delta > 1e-6
        ));
    }
}

#[test]
fn density_change_shrinks_once_diis_is_active() {
    let output = run(
        &TestInstance::helium_hydride_sto3g(),
        &HartreeFockConfig::default(),
    )
    .unwrap();

    let active = output
        .history
        .iter()
        .skip_while(|record| !record.diis_active)
        .collect::<Vec<_>>();
    assert!(!active.is_empty(), "DIIS never activated");

    for pair in active.windows(2) {
        assert!(
            pair[1].density_delta <= pair[0].density_delta,
            "density change grew from {} to {} in iteration {}",
            pair[0].density_delta,
            pair[1].density_delta,
            pair[1].iteration
        );
    }
}

#[test]
fn converged_density_is_self_consistent() {
    let instance = TestInstance::water_sto3g();
    let output = run(&instance, &HartreeFockConfig::default()).unwrap();

    let last = output.history.last().unwrap();
    assert_eq!(last.iteration, output.iterations);
    assert!(last.density_delta < 1e-6);
    assert_eq!(output.orbital_energies.len(), instance.basis.len());
    assert_relative_eq!(
        output.density.clone(),
        output.density.transpose(),
        epsilon = 1e-12
    );
}
