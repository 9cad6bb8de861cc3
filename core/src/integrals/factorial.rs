//! Precomputed factorial tables shared by all integral routines.
use crate::error::IntegralError;

/// Largest argument covered by the factorial table. Large enough for electron repulsion
/// integrals over four functions of the highest supported angular momentum.
pub(crate) const MAX_FACTORIAL: usize = 40;

/// Largest argument covered by the double factorial table.
pub(crate) const MAX_DOUBLE_FACTORIAL: usize = 2 * MAX_FACTORIAL;

const FACTORIALS: [f64; MAX_FACTORIAL + 1] = {
    let mut table = [1.0; MAX_FACTORIAL + 1];
    let mut n = 1;
    while n <= MAX_FACTORIAL {
        table[n] = table[n - 1] * n as f64;
        n += 1;
    }
    table
};

// index n holds n!!; 0!! = 1!! = 1
const DOUBLE_FACTORIALS: [f64; MAX_DOUBLE_FACTORIAL + 1] = {
    let mut table = [1.0; MAX_DOUBLE_FACTORIAL + 1];
    let mut n = 2;
    while n <= MAX_DOUBLE_FACTORIAL {
        table[n] = table[n - 2] * n as f64;
        n += 1;
    }
    table
};

/// n! for 0 <= n <= [`MAX_FACTORIAL`].
#[inline]
pub(crate) fn factorial(n: i64) -> Result<f64, IntegralError> {
    if n < 0 {
        return Err(IntegralError::NegativeFactorial(n));
    }

    FACTORIALS
        .get(n as usize)
        .copied()
        .ok_or(IntegralError::FactorialOutOfRange {
            argument: n,
            max: MAX_FACTORIAL,
        })
}

/// n!! with the convention that the double factorial of a negative odd number is one,
/// so that (2l - 1)!! = 1 for l = 0.
#[inline]
pub(crate) fn double_factorial(n: i64) -> Result<f64, IntegralError> {
    match n {
        n if n < 0 && n % 2 != 0 => Ok(1.0),
        n if n < 0 => Err(IntegralError::NegativeFactorial(n)),
        n => DOUBLE_FACTORIALS.get(n as usize).copied().ok_or(
            IntegralError::DoubleFactorialOutOfRange {
                argument: n,
                max: MAX_DOUBLE_FACTORIAL,
            },
        ),
    }
}

/// Binomial coefficient C(n, k), zero whenever k lies outside 0..=n.
#[inline]
pub(crate) fn binomial(n: i64, k: i64) -> f64 {
    if k < 0 || k > n {
        return 0.0;
    }

    let k = k.min(n - k);
    (1..=k).fold(1.0, |acc, i| acc * (n - k + i) as f64 / i as f64)
}
