use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Represents a nucleus in a molecule: a point charge at a fixed position.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    pub(crate) position: Vector3<f64>,
    pub(crate) nuclear_charge: u32,
}

impl Atom {
    /// Creates a nucleus with the given charge at the given position, in bohr.
    pub fn new(position: Vector3<f64>, nuclear_charge: u32) -> Self {
        Self {
            position,
            nuclear_charge,
        }
    }

    /// Returns the charge of this nucleus
    pub fn nuclear_charge(&self) -> u32 {
        self.nuclear_charge
    }

    pub fn position(&self) -> &Vector3<f64> {
        &self.position
    }
}
