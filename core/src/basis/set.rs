use serde::{Deserialize, Serialize};

use super::BasisFunction;

/// An ordered list of basis functions. The order defines the row and column indices of every
/// matrix computed in this basis.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BasisSet {
    functions: Vec<BasisFunction>,
}

impl BasisSet {
    pub fn new(functions: Vec<BasisFunction>) -> Self {
        Self { functions }
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn functions(&self) -> &[BasisFunction] {
        &self.functions
    }

    /// The highest total angular momentum of any function in this basis.
    pub fn max_angular(&self) -> u32 {
        self.functions
            .iter()
            .map(|function| {
                let (i, j, k) = function.angular();
                i + j + k
            })
            .max()
            .unwrap_or(0)
    }
}

impl FromIterator<BasisFunction> for BasisSet {
    fn from_iter<T: IntoIterator<Item = BasisFunction>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
