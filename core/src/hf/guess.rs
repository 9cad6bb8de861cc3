use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use super::utils;

/// The Wolfsberg-Helmholz constant of the extended hückel method.
pub const WOLFSBERG_HELMHOLZ: f64 = 1.75;

/// How the fock matrix of the first SCF step is obtained.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum InitialGuess {
    /// F = H_core
    #[default]
    Core,
    /// F(i, j) = k S(i, j) (H(i, i) + H(j, j)) / 2
    #[serde(alias = "huckel")]
    ExtendedHuckel {
        #[serde(default = "default_huckel_constant")]
        constant: f64,
    },
}

fn default_huckel_constant() -> f64 {
    WOLFSBERG_HELMHOLZ
}

impl InitialGuess {
    pub const fn extended_huckel() -> Self {
        Self::ExtendedHuckel {
            constant: WOLFSBERG_HELMHOLZ,
        }
    }

    /// The starting fock matrix.
    pub fn fock(&self, core_hamiltonian: &DMatrix<f64>, overlap: &DMatrix<f64>) -> DMatrix<f64> {
        match *self {
            Self::Core => core_hamiltonian.clone(),
            Self::ExtendedHuckel { constant } => {
                utils::symmetric_matrix(core_hamiltonian.nrows(), |i, j| {
                    constant
                        * overlap[(i, j)]
                        * 0.5
                        * (core_hamiltonian[(i, i)] + core_hamiltonian[(j, j)])
                })
            }
        }
    }
}
