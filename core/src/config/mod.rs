//! Input files and calculation settings.
mod basis;
mod molecule;
mod scf;

use serde::{Deserialize, Serialize};

pub use basis::ConfigBasisFunction;
pub use molecule::{ConfigAtom, ConfigMolecule};
pub use scf::{DiisConfig, HartreeFockConfig};

use crate::{basis::BasisSet, error::ConfigError, molecule::Molecule};

/// A complete calculation: the molecule, its basis and the SCF settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConfigSystem {
    pub molecule: ConfigMolecule,
    pub basis: Vec<ConfigBasisFunction>,
    #[serde(default)]
    pub scf: HartreeFockConfig,
}

impl ConfigSystem {
    /// Validates the input and builds the molecule and the normalized basis set.
    pub fn into_parts(self) -> Result<(Molecule, BasisSet, HartreeFockConfig), ConfigError> {
        let molecule = Molecule::try_from(self.molecule)?;
        let basis = basis::build_basis_set(&self.basis, &molecule)?;
        Ok((molecule, basis, self.scf))
    }
}
