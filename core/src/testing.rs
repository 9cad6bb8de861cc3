//! Reference systems shared by tests and benchmarks.
use std::{error::Error, fs::File, path::Path};

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{
    atom::Atom,
    basis::{BasisFunction, BasisSet, ContractedGaussian, Primitive},
    molecule::Molecule,
};

/// STO-3G contraction coefficients of an 1s shell.
const STO3G_1S_COEFFICIENTS: [f64; 3] = [0.15432897, 0.53532814, 0.44463454];
/// STO-3G exponents of an 1s shell for a slater exponent of 1.
const STO3G_1S_EXPONENTS: [f64; 3] = [2.227660584, 0.4057711562, 0.1098175104];

const HYDROGEN_STO3G_EXPONENTS: [f64; 3] = [3.42525091, 0.62391373, 0.16885540];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestInstance {
    pub name: String,
    pub molecule: Molecule,
    pub basis: BasisSet,
}

impl TestInstance {
    pub fn new(name: impl Into<String>, molecule: Molecule, basis: BasisSet) -> Self {
        Self {
            name: name.into(),
            molecule,
            basis,
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn Error>> {
        Ok(serde_json::to_writer(
            File::options()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)?,
            self,
        )?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        Ok(serde_json::from_reader(File::open(path)?)?)
    }

    pub fn basis_functions(&self) -> &[BasisFunction] {
        self.basis.functions()
    }

    /// H2 at 1.4 bohr in the STO-3G basis.
    pub fn hydrogen_sto3g() -> Self {
        let positions = [Vector3::zeros(), Vector3::new(0.0, 0.0, 1.4)];
        let molecule = Molecule::neutral(positions.map(|p| Atom::new(p, 1)).to_vec());
        let basis = positions
            .into_iter()
            .map(|position| {
                contracted(
                    position,
                    (0, 0, 0),
                    &HYDROGEN_STO3G_EXPONENTS,
                    &STO3G_1S_COEFFICIENTS,
                )
            })
            .collect();

        Self::new("hydrogen STO-3G", molecule, basis)
    }

    /// H2 at 1.4 bohr in the 6-31G basis.
    pub fn hydrogen_631g() -> Self {
        let positions = [Vector3::zeros(), Vector3::new(0.0, 0.0, 1.4)];
        let molecule = Molecule::neutral(positions.map(|p| Atom::new(p, 1)).to_vec());
        let basis = positions
            .into_iter()
            .flat_map(|position| {
                [
                    contracted(
                        position,
                        (0, 0, 0),
                        &[18.7311370, 2.8253937, 0.6401217],
                        &[0.03349460, 0.23472695, 0.81375733],
                    ),
                    contracted(position, (0, 0, 0), &[0.1612778], &[1.0]),
                ]
            })
            .collect();

        Self::new("hydrogen 6-31G", molecule, basis)
    }

    /// HeH+ at 1.4632 bohr in the STO-3G basis with slater exponents 2.0925 (He) and
    /// 1.24 (H).
    pub fn helium_hydride_sto3g() -> Self {
        const HELIUM_ZETA: f64 = 2.0925;

        let helium = Vector3::zeros();
        let hydrogen = Vector3::new(0.0, 0.0, 1.4632);
        let molecule = Molecule::new(vec![Atom::new(helium, 2), Atom::new(hydrogen, 1)], 1);

        let helium_exponents = STO3G_1S_EXPONENTS.map(|exponent| exponent * HELIUM_ZETA.powi(2));
        let basis = [
            contracted(helium, (0, 0, 0), &helium_exponents, &STO3G_1S_COEFFICIENTS),
            contracted(
                hydrogen,
                (0, 0, 0),
                &HYDROGEN_STO3G_EXPONENTS,
                &STO3G_1S_COEFFICIENTS,
            ),
        ]
        .into_iter()
        .collect();

        Self::new("helium hydride STO-3G", molecule, basis)
    }

    /// H2O in the STO-3G basis, basis order O1s O2s O2px O2py O2pz H1s H1s.
    pub fn water_sto3g() -> Self {
        let oxygen = Vector3::new(0.0, -0.143225816552, 0.0);
        let hydrogens = [
            Vector3::new(1.638036840407, 1.136548822547, 0.0),
            Vector3::new(-1.638036840407, 1.136548822547, 0.0),
        ];
        let molecule = Molecule::neutral(vec![
            Atom::new(oxygen, 8),
            Atom::new(hydrogens[0], 1),
            Atom::new(hydrogens[1], 1),
        ]);

        let valence_exponents = [5.0331513, 1.1695961, 0.3803890];
        let p_coefficients = [0.15591627, 0.60768372, 0.39195739];

        let mut basis = vec![
            contracted(
                oxygen,
                (0, 0, 0),
                &[130.7093200, 23.8088610, 6.4436083],
                &STO3G_1S_COEFFICIENTS,
            ),
            contracted(
                oxygen,
                (0, 0, 0),
                &valence_exponents,
                &[-0.09996723, 0.39951283, 0.70011547],
            ),
        ];
        for angular in [(1, 0, 0), (0, 1, 0), (0, 0, 1)] {
            basis.push(contracted(oxygen, angular, &valence_exponents, &p_coefficients));
        }
        for hydrogen in hydrogens {
            basis.push(contracted(
                hydrogen,
                (0, 0, 0),
                &HYDROGEN_STO3G_EXPONENTS,
                &STO3G_1S_COEFFICIENTS,
            ));
        }

        Self::new("water STO-3G", molecule, BasisSet::new(basis))
    }
}

fn contracted(
    position: Vector3<f64>,
    angular: (u32, u32, u32),
    exponents: &[f64],
    coefficients: &[f64],
) -> BasisFunction {
    let contraction = ContractedGaussian::new(
        angular,
        exponents
            .iter()
            .zip(coefficients)
            .map(|(&exponent, &coefficient)| Primitive {
                exponent,
                coefficient,
            }),
    );

    BasisFunction::normalized(position, contraction).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_round_trip() {
        let instance = TestInstance::water_sto3g();
        let path = std::env::temp_dir().join(format!("scf-core-{}.json", std::process::id()));

        instance.save(&path).unwrap();
        let loaded = TestInstance::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.name, instance.name);
        assert_eq!(loaded.molecule, instance.molecule);
        assert_eq!(loaded.basis.len(), 7);
        for (a, b) in loaded.basis_functions().iter().zip(instance.basis_functions()) {
            assert_eq!(a.angular(), b.angular());
            assert_eq!(a.position, b.position);
        }
    }

    #[test]
    fn fixture_sizes() {
        assert_eq!(TestInstance::hydrogen_sto3g().basis.len(), 2);
        assert_eq!(TestInstance::hydrogen_631g().basis.len(), 4);
        assert_eq!(TestInstance::helium_hydride_sto3g().molecule.n_electrons(), 2);
        assert_eq!(TestInstance::water_sto3g().molecule.n_electrons(), 10);
    }
}
