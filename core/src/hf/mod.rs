mod guess;
pub mod rhf;
pub(crate) mod utils;

pub use guess::{InitialGuess, WOLFSBERG_HELMHOLZ};
pub use rhf::{
    restricted_hartree_fock, restricted_hartree_fock_with, IterationRecord,
    RestrictedHartreeFockOutput, ScfDriver, ScfProblem, ScfState,
};

use crate::{basis::BasisSet, config::HartreeFockConfig, molecule::Molecule};

/// The input to a hartree fock calculation
#[derive(Clone, Copy, Debug)]
pub struct HartreeFockInput<'a> {
    /// the molecule to run hartree fock for
    pub molecule: &'a Molecule,
    /// the basis functions, in the order of the matrix rows and columns
    pub basis: &'a BasisSet,
    pub config: &'a HartreeFockConfig,
}
