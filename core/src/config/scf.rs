use serde::{Deserialize, Serialize};

use crate::{diis, hf::InitialGuess};

/// Settings of a hartree fock calculation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HartreeFockConfig {
    /// the maximum number of SCF steps before giving up
    pub max_iterations: usize,
    /// the calculation is converged once the rms change of the density matrix falls below this
    pub density_threshold: f64,
    pub initial_guess: InitialGuess,
    pub diis: DiisConfig,
}

impl Default for HartreeFockConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            density_threshold: 1e-6,
            initial_guess: InitialGuess::default(),
            diis: DiisConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiisConfig {
    pub enabled: bool,
    /// DIIS is switched on for good once the largest error element drops below this
    pub activation_threshold: f64,
    /// how many fock/error pairs are kept
    pub capacity: usize,
}

impl Default for DiisConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            activation_threshold: 0.1,
            capacity: diis::DEFAULT_CAPACITY,
        }
    }
}
