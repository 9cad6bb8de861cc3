use serde::{Deserialize, Serialize};

use crate::atom::Atom;

/// Represents a molecule: an ordered list of nuclei and the overall charge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Molecule {
    pub(crate) atoms: Vec<Atom>,
    pub(crate) charge: i32,
}

impl Molecule {
    pub fn new(atoms: Vec<Atom>, charge: i32) -> Self {
        Self { atoms, charge }
    }

    /// Creates a molecule without net charge.
    pub fn neutral(atoms: Vec<Atom>) -> Self {
        Self::new(atoms, 0)
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn charge(&self) -> i32 {
        self.charge
    }

    /// Returns the number of electrons, which may be negative for nonsensical charges.
    pub fn n_electrons(&self) -> i64 {
        let nuclear = self
            .atoms
            .iter()
            .map(|atom| atom.nuclear_charge as i64)
            .sum::<i64>();
        nuclear - self.charge as i64
    }

    /// Returns the classical repulsion energy between all pairs of nuclei.
    pub fn nuclear_repulsion(&self) -> f64 {
        let n_atoms = self.atoms.len();

        let mut potential = 0.0;
        for atom_a in 0..n_atoms {
            for atom_b in atom_a + 1..n_atoms {
                let (a, b) = (&self.atoms[atom_a], &self.atoms[atom_b]);
                potential += (a.nuclear_charge * b.nuclear_charge) as f64
                    / (b.position - a.position).norm()
            }
        }
        potential
    }
}
