use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{atom::Atom, error::ConfigError, molecule::Molecule};

/// Represents a full molecule in a config file.
/// A molecule is a list of positioned nuclei (in bohr) and an optional net charge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfigMolecule {
    pub atoms: Vec<ConfigAtom>,
    #[serde(default)]
    pub charge: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfigAtom {
    /// nuclear charge
    pub charge: u32,
    pub position: Vec<f64>,
}

impl TryFrom<ConfigMolecule> for Molecule {
    type Error = ConfigError;

    fn try_from(value: ConfigMolecule) -> Result<Self, Self::Error> {
        let ConfigMolecule {
            atoms: config_atoms,
            charge,
        } = value;

        let mut atoms = Vec::with_capacity(config_atoms.len());

        for (index, atom) in config_atoms.into_iter().enumerate() {
            let &[x, y, z] = atom.position.as_slice() else {
                return Err(ConfigError::BadCoordinates {
                    index,
                    len: atom.position.len(),
                });
            };
            if atom.charge == 0 {
                return Err(ConfigError::ZeroCharge { index });
            }

            atoms.push(Atom::new(Vector3::new(x, y, z), atom.charge));
        }

        Ok(Molecule::new(atoms, charge))
    }
}
