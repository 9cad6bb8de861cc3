use std::ops::Index;

use crate::{basis::BasisFunction, error::IntegralError};

use super::Integrator;

/// Compound index of an unordered pair, i(i+1)/2 + j for i >= j.
#[inline(always)]
const fn pair_index(i: usize, j: usize) -> usize {
    if i >= j {
        i * (i + 1) / 2 + j
    } else {
        j * (j + 1) / 2 + i
    }
}

/// An integral index used in the two-electron integrals of a basis set.
///
/// The index represents the four indices (x, y, z, w) used to calculate a two-electron integral:
///   int_{x,y,z,w} = int_{xy|zw} = <x y | z w>
///
/// Two-electron integrals are invariant under swapping x and y, swapping z and w, and swapping
/// the pairs (xy) and (zw). All eight permutations map onto the same compound index.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct IntegralIndex(usize, usize, usize, usize);

impl IntegralIndex {
    pub const fn new((i, j, k, l): (usize, usize, usize, usize)) -> Self {
        Self(i, j, k, l)
    }

    /// Position of this integral in the packed storage of unique quartets.
    pub const fn compound(&self) -> usize {
        let &Self(i, j, k, l) = self;
        pair_index(pair_index(i, j), pair_index(k, l))
    }
}

impl std::fmt::Display for IntegralIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let &Self(i, j, k, l) = self;
        write!(f, "({} {}|{} {})", i, j, k, l)
    }
}

/// Electron-electron repulsion integrals between four contracted gaussians of a basis set.
///
/// Only the unique quartets with ij >= kl (over compound pair indices) are stored.
#[derive(Clone, Debug)]
pub struct ElectronTensor {
    data: Vec<f64>,
    /// side length
    size: usize,
}

impl ElectronTensor {
    /// Builds the tensor by evaluating `func` once per unique quartet. `func` receives
    /// indices with i >= j, k >= l and ij >= kl.
    pub fn try_from_fn<E>(
        size: usize,
        mut func: impl FnMut(usize, usize, usize, usize) -> Result<f64, E>,
    ) -> Result<Self, E> {
        let n_pairs = size * (size + 1) / 2;
        let mut data = Vec::with_capacity(n_pairs * (n_pairs + 1) / 2);

        // the loop order matches the packed layout, so pushing keeps the data in order
        for i in 0..size {
            for j in 0..=i {
                let ij = pair_index(i, j);
                for k in 0..size {
                    for l in 0..=k {
                        if pair_index(k, l) > ij {
                            continue;
                        }
                        debug_assert_eq!(IntegralIndex(i, j, k, l).compound(), data.len());
                        data.push(func(i, j, k, l)?);
                    }
                }
            }
        }

        Ok(Self { data, size })
    }

    pub fn from_fn(size: usize, mut func: impl FnMut(usize, usize, usize, usize) -> f64) -> Self {
        match Self::try_from_fn::<std::convert::Infallible>(size, |i, j, k, l| {
            Ok(func(i, j, k, l))
        }) {
            Ok(tensor) => tensor,
            Err(never) => match never {},
        }
    }

    /// Computes every unique electron repulsion integral of the basis.
    pub fn from_basis(
        basis: &[BasisFunction],
        integrator: &impl Integrator<Function = BasisFunction>,
    ) -> Result<Self, IntegralError> {
        let tensor = Self::try_from_fn(basis.len(), |x, y, z, w| {
            let integral =
                integrator.electron_repulsion((&basis[x], &basis[y], &basis[z], &basis[w]))?;
            log::trace!("ERI {} = {integral:<1.8}", IntegralIndex(x, y, z, w));
            Ok(integral)
        })?;

        log::debug!(
            "computed {} unique electron repulsion integrals for {} basis functions",
            tensor.data.len(),
            tensor.size
        );
        Ok(tensor)
    }

    /// The number of basis functions along each of the four axes.
    pub fn size(&self) -> usize {
        self.size
    }
}

impl Index<(usize, usize, usize, usize)> for ElectronTensor {
    type Output = f64;

    fn index(&self, index: (usize, usize, usize, usize)) -> &Self::Output {
        &self[IntegralIndex::new(index)]
    }
}

impl Index<IntegralIndex> for ElectronTensor {
    type Output = f64;

    fn index(&self, index: IntegralIndex) -> &Self::Output {
        &self.data[index.compound()]
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::{integrals::DefaultIntegrator, testing::TestInstance};

    #[test]
    fn all_permutations_share_one_entry() {
        let tensor = ElectronTensor::from_fn(4, |i, j, k, l| {
            (1000 * i + 100 * j + 10 * k + l) as f64
        });

        for (i, j, k, l) in itertools::iproduct!(0..4, 0..4, 0..4, 0..4) {
            let value = tensor[(i, j, k, l)];
            assert_eq!(value, tensor[(j, i, k, l)]);
            assert_eq!(value, tensor[(i, j, l, k)]);
            assert_eq!(value, tensor[(k, l, i, j)]);
            assert_eq!(value, tensor[(l, k, j, i)]);
        }
        assert_eq!(tensor[(3, 1, 2, 0)], 3120.0);
        assert_eq!(tensor[(0, 2, 1, 3)], 3120.0);
    }

    #[test]
    fn stores_only_unique_quartets() {
        let mut calls = 0;
        let tensor = ElectronTensor::from_fn(5, |_, _, _, _| {
            calls += 1;
            1.0
        });
        // 15 pairs -> 15 * 16 / 2 quartets
        assert_eq!(calls, 120);
        assert_eq!(tensor.size(), 5);
    }

    #[test]
    fn errors_are_propagated() {
        let result = ElectronTensor::try_from_fn(3, |i, _, _, _| {
            if i == 2 {
                Err(IntegralError::NegativeFactorial(-1))
            } else {
                Ok(0.0)
            }
        });
        assert_eq!(result.unwrap_err(), IntegralError::NegativeFactorial(-1));
    }

    #[test]
    fn hydrogen_molecule_integrals() {
        let TestInstance { basis, .. } = TestInstance::hydrogen_sto3g();
        let tensor = ElectronTensor::from_basis(basis.functions(), &DefaultIntegrator::default())
            .unwrap();

        // Szabo & Ostlund, table 3.15 (R = 1.4 bohr)
        assert_relative_eq!(tensor[(0, 0, 0, 0)], 0.7746, epsilon = 1e-4);
        assert_relative_eq!(tensor[(0, 0, 1, 1)], 0.5697, epsilon = 1e-4);
        assert_relative_eq!(tensor[(1, 0, 0, 0)], 0.4441, epsilon = 1e-4);
        assert_relative_eq!(tensor[(1, 0, 1, 0)], 0.2970, epsilon = 1e-4);
    }
}
