use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{
    basis::{BasisFunction, BasisSet, ContractedGaussian, Primitive, MAX_ANGULAR_MOMENTUM},
    error::{ConfigError, IntegralError},
    molecule::Molecule,
};

/// A contracted basis function in a config file. It is placed either on one of the molecule's
/// atoms (by index) or at an explicit center.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfigBasisFunction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atom: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<Vec<f64>>,
    pub angular: [u32; 3],
    pub primitives: Vec<Primitive>,
}

impl ConfigBasisFunction {
    fn position(&self, index: usize, molecule: &Molecule) -> Result<Vector3<f64>, ConfigError> {
        match (self.atom, self.center.as_deref()) {
            (Some(atom), None) => molecule
                .atoms()
                .get(atom)
                .map(|atom| *atom.position())
                .ok_or(ConfigError::UnknownAtom {
                    index,
                    atom,
                    n_atoms: molecule.atoms().len(),
                }),
            (None, Some(&[x, y, z])) => Ok(Vector3::new(x, y, z)),
            (None, Some(center)) => Err(ConfigError::BadCoordinates {
                index,
                len: center.len(),
            }),
            _ => Err(ConfigError::AmbiguousCenter { index }),
        }
    }

    fn validate(&self, index: usize) -> Result<(), ConfigError> {
        if self.primitives.is_empty() {
            return Err(ConfigError::EmptyContraction { index });
        }
        if let Some(primitive) = self
            .primitives
            .iter()
            .find(|primitive| !(primitive.exponent > 0.0))
        {
            return Err(ConfigError::NonPositiveExponent {
                index,
                exponent: primitive.exponent,
            });
        }
        let angular = self.angular.iter().sum::<u32>();
        if angular > MAX_ANGULAR_MOMENTUM {
            return Err(ConfigError::AngularMomentumTooHigh {
                index,
                angular,
                max: MAX_ANGULAR_MOMENTUM,
            });
        }
        Ok(())
    }
}

/// Builds the basis set in input order, normalizing every contraction.
pub(super) fn build_basis_set(
    functions: &[ConfigBasisFunction],
    molecule: &Molecule,
) -> Result<BasisSet, ConfigError> {
    functions
        .iter()
        .enumerate()
        .map(|(index, function)| {
            function.validate(index)?;
            let position = function.position(index, molecule)?;
            let [x, y, z] = function.angular;
            let contraction =
                ContractedGaussian::new((x, y, z), function.primitives.iter().copied());
            BasisFunction::normalized(position, contraction).map_err(|error| match error {
                IntegralError::VanishingNorm => ConfigError::VanishingNorm { index },
                error => error.into(),
            })
        })
        .collect()
}
