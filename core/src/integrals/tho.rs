//! Taketa, Huzinaga, O-ohata integration scheme.
//!
//! Every integral is expanded per cartesian axis with [`expansion_coefficient`], the
//! binomial expansion of the polynomial parts of a gaussian product, and combined with the
//! Boys function for the coulomb-type operators.
//!
//! Reference:
//!
//! [1] H. Taketa, S. Huzinaga, K. O-ohata. Gaussian-Expansion Methods for Molecular Integrals.
//!     J. Phys. Soc. Japan 21, 2313 (1966)
use std::f64::consts::PI;

use smallvec::{smallvec, SmallVec};

use crate::{
    atom::Atom,
    basis::{BasisFunction, Gaussian},
    error::IntegralError,
};

use super::{
    boys::boys_table,
    expansion::{expansion_coefficient, GaussianProduct},
    factorial::{double_factorial, factorial},
    Integrator,
};

/// Per-axis expansion coefficients, indexed by the order of the Boys function they multiply.
type AxisExpansion = SmallVec<[f64; 16]>;

#[derive(Copy, Clone, Debug, Default)]
pub struct Tho;

impl Integrator for Tho {
    type Function = BasisFunction;

    fn overlap(
        &self,
        functions: (&Self::Function, &Self::Function),
    ) -> Result<f64, IntegralError> {
        let (basis_a, basis_b) = functions;

        let mut output = 0.0;
        for ((coefficient_a, primitive_a), (coefficient_b, primitive_b)) in
            itertools::iproduct!(basis_a.primitives(), basis_b.primitives())
        {
            output +=
                coefficient_a * coefficient_b * primitive_overlap(&primitive_a, &primitive_b)?;
        }
        Ok(output)
    }

    fn kinetic(
        &self,
        functions: (&Self::Function, &Self::Function),
    ) -> Result<f64, IntegralError> {
        let (basis_a, basis_b) = functions;

        let mut output = 0.0;
        for ((coefficient_a, primitive_a), (coefficient_b, primitive_b)) in
            itertools::iproduct!(basis_a.primitives(), basis_b.primitives())
        {
            output +=
                coefficient_a * coefficient_b * primitive_kinetic(&primitive_a, &primitive_b)?;
        }
        Ok(output)
    }

    fn nuclear(
        &self,
        functions: (&Self::Function, &Self::Function),
        nuclei: &[Atom],
    ) -> Result<f64, IntegralError> {
        let (basis_a, basis_b) = functions;

        let mut output = 0.0;
        for (nucleus, (coefficient_a, primitive_a), (coefficient_b, primitive_b)) in
            itertools::iproduct!(nuclei, basis_a.primitives(), basis_b.primitives())
        {
            output += coefficient_a
                * coefficient_b
                * primitive_nuclear(&primitive_a, &primitive_b, nucleus)?;
        }
        Ok(output)
    }

    fn electron_repulsion(
        &self,
        functions: (
            &Self::Function,
            &Self::Function,
            &Self::Function,
            &Self::Function,
        ),
    ) -> Result<f64, IntegralError> {
        let (basis_a, basis_b, basis_c, basis_d) = functions;

        let mut output = 0.0;
        for (
            (coefficient_a, primitive_a),
            (coefficient_b, primitive_b),
            (coefficient_c, primitive_c),
            (coefficient_d, primitive_d),
        ) in itertools::iproduct!(
            basis_a.primitives(),
            basis_b.primitives(),
            basis_c.primitives(),
            basis_d.primitives()
        ) {
            output += coefficient_a
                * coefficient_b
                * coefficient_c
                * coefficient_d
                * primitive_electron(&primitive_a, &primitive_b, &primitive_c, &primitive_d)?;
        }
        Ok(output)
    }
}

/// Overlap between two normalized primitive gaussians.
pub fn primitive_overlap(
    primitive_a: &Gaussian,
    primitive_b: &Gaussian,
) -> Result<f64, IntegralError> {
    Ok(primitive_a.norm()? * primitive_b.norm()? * bare_overlap(primitive_a, primitive_b)?)
}

/// Overlap between two primitives, without normalization.
fn bare_overlap(primitive_a: &Gaussian, primitive_b: &Gaussian) -> Result<f64, IntegralError> {
    let product = GaussianProduct::new(primitive_a, primitive_b);
    let (l1, m1, n1) = primitive_a.angular;
    let (l2, m2, n2) = primitive_b.angular;
    let pa = product.center - primitive_a.center;
    let pb = product.center - primitive_b.center;

    let wx = overlap_1d(l1, l2, pa.x, pb.x, product.exponent)?;
    let wy = overlap_1d(m1, m2, pa.y, pb.y, product.exponent)?;
    let wz = overlap_1d(n1, n2, pa.z, pb.z, product.exponent)?;

    Ok((PI / product.exponent).powf(1.5) * product.prefactor * wx * wy * wz)
}

fn overlap_1d(l1: u32, l2: u32, pa: f64, pb: f64, exponent: f64) -> Result<f64, IntegralError> {
    let mut sum = 0.0;
    for i in 0..=(l1 + l2) / 2 {
        sum += expansion_coefficient(2 * i, l1, l2, pa, pb) * double_factorial(2 * i as i64 - 1)?
            / (2.0 * exponent).powi(i as i32);
    }
    Ok(sum)
}

/// Kinetic energy integral between two normalized primitive gaussians, written in terms of
/// overlaps where the angular momentum of the second gaussian is raised or lowered by two.
pub fn primitive_kinetic(
    primitive_a: &Gaussian,
    primitive_b: &Gaussian,
) -> Result<f64, IntegralError> {
    let b_exp = primitive_b.exponent;
    let (l, m, n) = primitive_b.angular;

    let mut raised = 0.0;
    let mut lowered = 0.0;
    for (axis, angular) in [l, m, n].into_iter().enumerate() {
        if let Some(shifted) = primitive_b.shifted(axis, 2) {
            raised += bare_overlap(primitive_a, &shifted)?;
        }
        // the prefactor l(l - 1) vanishes whenever the lowered gaussian doesn't exist
        if let Some(shifted) = primitive_b.shifted(axis, -2) {
            lowered += (angular * (angular - 1)) as f64 * bare_overlap(primitive_a, &shifted)?;
        }
    }

    let term_0 = b_exp * (2 * (l + m + n) + 3) as f64 * bare_overlap(primitive_a, primitive_b)?;
    let term_1 = -2.0 * b_exp.powi(2) * raised;
    let term_2 = -0.5 * lowered;

    Ok(primitive_a.norm()? * primitive_b.norm()? * (term_0 + term_1 + term_2))
}

/// A single term of the nuclear attraction expansion along one axis.
///
/// `ra`, `rb`, `rc` and `rp` are the coordinates of the two gaussian centers, the nucleus and
/// the gaussian product center along this axis, `epsilon` is 1 / (4 * combined exponent).
/// The indices must satisfy `l <= l1 + l2`, `2r <= l` and `2i <= l - 2r`; violating that is
/// reported as a negative factorial.
#[allow(clippy::too_many_arguments)]
pub fn nuclear_attraction_term(
    l: u32,
    r: u32,
    i: u32,
    l1: u32,
    l2: u32,
    ra: f64,
    rb: f64,
    rc: f64,
    rp: f64,
    epsilon: f64,
) -> Result<f64, IntegralError> {
    let remainder = l as i64 - 2 * r as i64 - 2 * i as i64;
    let denominator = factorial(r as i64)? * factorial(i as i64)? * factorial(remainder)?;

    Ok(parity(l + i)
        * expansion_coefficient(l, l1, l2, rp - ra, rp - rb)
        * factorial(l as i64)?
        * (rp - rc).powi(remainder as i32)
        * epsilon.powi((r + i) as i32)
        / denominator)
}

/// Sums the nuclear attraction terms of one axis by the Boys function order l - 2r - i they
/// contribute to.
fn nuclear_axis(
    l1: u32,
    l2: u32,
    ra: f64,
    rb: f64,
    rc: f64,
    rp: f64,
    epsilon: f64,
) -> Result<AxisExpansion, IntegralError> {
    let mut terms: AxisExpansion = smallvec![0.0; (l1 + l2 + 1) as usize];

    for l in 0..=l1 + l2 {
        for r in 0..=l / 2 {
            for i in 0..=(l - 2 * r) / 2 {
                terms[(l - 2 * r - i) as usize] +=
                    nuclear_attraction_term(l, r, i, l1, l2, ra, rb, rc, rp, epsilon)?;
            }
        }
    }

    Ok(terms)
}

/// Attraction between the product of two normalized primitive gaussians and a point charge.
pub fn primitive_nuclear(
    primitive_a: &Gaussian,
    primitive_b: &Gaussian,
    nucleus: &Atom,
) -> Result<f64, IntegralError> {
    let product = GaussianProduct::new(primitive_a, primitive_b);
    let epsilon = 0.25 / product.exponent;

    let (a, b, c, p) = (
        primitive_a.center,
        primitive_b.center,
        nucleus.position,
        product.center,
    );
    let (l1, m1, n1) = primitive_a.angular;
    let (l2, m2, n2) = primitive_b.angular;

    let ax = nuclear_axis(l1, l2, a.x, b.x, c.x, p.x, epsilon)?;
    let ay = nuclear_axis(m1, m2, a.y, b.y, c.y, p.y, epsilon)?;
    let az = nuclear_axis(n1, n2, a.z, b.z, c.z, p.z, epsilon)?;

    let mut boys: AxisExpansion = smallvec![0.0; ax.len() + ay.len() + az.len() - 2];
    boys_table(product.exponent * (p - c).norm_squared(), &mut boys);

    let mut sum = 0.0;
    for (i, x) in ax.iter().enumerate() {
        for (j, y) in ay.iter().enumerate() {
            for (k, z) in az.iter().enumerate() {
                sum += x * y * z * boys[i + j + k];
            }
        }
    }

    Ok(-(nucleus.nuclear_charge as f64)
        * primitive_a.norm()?
        * primitive_b.norm()?
        * product.prefactor
        * 2.0
        * PI
        / product.exponent
        * sum)
}

/// Electron repulsion integral (ab|cd) between four normalized primitive gaussians.
pub fn primitive_electron(
    primitive_a: &Gaussian,
    primitive_b: &Gaussian,
    primitive_c: &Gaussian,
    primitive_d: &Gaussian,
) -> Result<f64, IntegralError> {
    let product_ab = GaussianProduct::new(primitive_a, primitive_b);
    let product_cd = GaussianProduct::new(primitive_c, primitive_d);
    let (g1, g2) = (product_ab.exponent, product_cd.exponent);
    let delta = 0.25 * (g1.recip() + g2.recip());

    let centers = [
        primitive_a.center,
        primitive_b.center,
        primitive_c.center,
        primitive_d.center,
    ];
    let angulars = [
        primitive_a.angular,
        primitive_b.angular,
        primitive_c.angular,
        primitive_d.angular,
    ];
    let (p, q) = (product_ab.center, product_cd.center);

    let expand = |axis: usize| {
        let angular = angulars.map(|(l, m, n)| [l, m, n][axis]);
        electron_axis(
            angular,
            centers.map(|center| center[axis]),
            (p[axis], q[axis]),
            (g1, g2),
            delta,
        )
    };
    let bx = expand(0)?;
    let by = expand(1)?;
    let bz = expand(2)?;

    let mut boys: AxisExpansion = smallvec![0.0; bx.len() + by.len() + bz.len() - 2];
    boys_table(0.25 * (q - p).norm_squared() / delta, &mut boys);

    let mut sum = 0.0;
    for (i, x) in bx.iter().enumerate() {
        for (j, y) in by.iter().enumerate() {
            for (k, z) in bz.iter().enumerate() {
                sum += x * y * z * boys[i + j + k];
            }
        }
    }

    Ok(2.0 * PI.powf(2.5) / (g1 * g2 * (g1 + g2).sqrt())
        * product_ab.prefactor
        * product_cd.prefactor
        * primitive_a.norm()?
        * primitive_b.norm()?
        * primitive_c.norm()?
        * primitive_d.norm()?
        * sum)
}

/// Sums the electron repulsion terms of one axis by the Boys function order they contribute
/// to.
fn electron_axis(
    [l1, l2, l3, l4]: [u32; 4],
    [a, b, c, d]: [f64; 4],
    (p, q): (f64, f64),
    (g1, g2): (f64, f64),
    delta: f64,
) -> Result<AxisExpansion, IntegralError> {
    let mut terms: AxisExpansion = smallvec![0.0; (l1 + l2 + l3 + l4 + 1) as usize];

    for i1 in 0..=l1 + l2 {
        let bra = electron_half(i1, l1, l2, p - a, p - b, g1);
        for i2 in 0..=l3 + l4 {
            let ket = electron_half(i2, l3, l4, q - c, q - d, g2);
            for r1 in 0..=i1 / 2 {
                for r2 in 0..=i2 / 2 {
                    let reduced = i1 + i2 - 2 * (r1 + r2);
                    let prefactor = bra(r1)? * parity(i2) * ket(r2)?;

                    for u in 0..=reduced / 2 {
                        let order = reduced - u;
                        terms[order as usize] += prefactor
                            * parity(u)
                            * factorial_ratio(reduced, u)?
                            * (q - p).powi((reduced - 2 * u) as i32)
                            / delta.powi(order as i32);
                    }
                }
            }
        }
    }

    Ok(terms)
}

/// The factor one gaussian pair contributes to an electron repulsion term, as a function of
/// its r index.
fn electron_half(
    i: u32,
    l1: u32,
    l2: u32,
    pa: f64,
    pb: f64,
    exponent: f64,
) -> impl Fn(u32) -> Result<f64, IntegralError> {
    let expansion = expansion_coefficient(i, l1, l2, pa, pb);
    move |r| Ok(expansion * factorial_ratio(i, r)? * (4.0 * exponent).powi(r as i32 - i as i32))
}

/// a! / (b! (a - 2b)!)
fn factorial_ratio(a: u32, b: u32) -> Result<f64, IntegralError> {
    Ok(factorial(a as i64)?
        / (factorial(b as i64)? * factorial(a as i64 - 2 * b as i64)?))
}

/// (-1)^n
#[inline(always)]
fn parity(n: u32) -> f64 {
    if n % 2 == 0 {
        1.0
    } else {
        -1.0
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    use super::*;
    use crate::error::IntegralError;

    fn s(exponent: f64, center: Vector3<f64>) -> Gaussian {
        Gaussian::new(exponent, center, (0, 0, 0))
    }

    #[test]
    fn normalized_primitives_have_unit_overlap() {
        for angular in [(0, 0, 0), (1, 0, 0), (0, 2, 0), (1, 1, 1), (3, 0, 1)] {
            let gaussian = Gaussian::new(0.7, Vector3::new(0.1, 0.2, 0.3), angular);
            assert_relative_eq!(
                primitive_overlap(&gaussian, &gaussian).unwrap(),
                1.0,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn overlap_of_displaced_s_gaussians() {
        // closed form for normalized s gaussians: (4ab / (a + b)^2)^(3/4) exp(-ab/(a+b) R^2)
        let a = s(0.5, Vector3::zeros());
        let b = s(1.3, Vector3::new(0.0, 1.0, 0.5));
        let expected = (4.0 * 0.5 * 1.3 / 1.8f64.powi(2)).powf(0.75) * f64::exp(-0.65 / 1.8 * 1.25);

        assert_relative_eq!(primitive_overlap(&a, &b).unwrap(), expected, epsilon = 1e-14);
    }

    #[test]
    fn opposite_parity_functions_do_not_overlap() {
        let s_function = s(1.0, Vector3::zeros());
        let p_function = Gaussian::new(1.0, Vector3::zeros(), (0, 0, 1));
        assert_eq!(primitive_overlap(&s_function, &p_function).unwrap(), 0.0);
    }

    #[test]
    fn kinetic_energy_of_s_gaussian() {
        // <T> = 3a/2 for a normalized s gaussian
        let gaussian = s(0.8, Vector3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(
            primitive_kinetic(&gaussian, &gaussian).unwrap(),
            1.2,
            epsilon = 1e-12
        );
    }

    #[test]
    fn kinetic_energy_of_p_gaussian() {
        // <T> = 5a/2 for a normalized p gaussian
        let gaussian = Gaussian::new(0.8, Vector3::zeros(), (0, 1, 0));
        assert_relative_eq!(
            primitive_kinetic(&gaussian, &gaussian).unwrap(),
            2.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn kinetic_integral_is_symmetric() {
        let a = Gaussian::new(0.9, Vector3::new(0.0, 0.3, -0.2), (2, 0, 1));
        let b = Gaussian::new(0.4, Vector3::new(0.5, -0.1, 0.7), (1, 1, 0));
        assert_relative_eq!(
            primitive_kinetic(&a, &b).unwrap(),
            primitive_kinetic(&b, &a).unwrap(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn nuclear_attraction_of_s_gaussian_at_nucleus() {
        let gaussian = s(1.0, Vector3::zeros());
        let nucleus = Atom::new(Vector3::zeros(), 1);

        let norm = gaussian.norm().unwrap();
        // -2 pi / g * norm^2 * F_0(0) with g = 1 + 1
        let expected = -2.0 * PI / 2.0 * norm * norm * 1.0;

        let value = primitive_nuclear(&gaussian, &gaussian, &nucleus).unwrap();
        assert_relative_eq!(value, expected, epsilon = 1e-9);
        assert_relative_eq!(value, -2.0 * (2.0 / PI).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn nuclear_attraction_scales_with_charge() {
        let a = Gaussian::new(0.6, Vector3::new(0.0, 0.0, 0.4), (1, 0, 0));
        let b = Gaussian::new(1.1, Vector3::new(0.2, 0.0, 0.0), (1, 0, 1));
        let hydrogen = Atom::new(Vector3::new(0.3, 0.3, 0.3), 1);
        let oxygen = Atom::new(Vector3::new(0.3, 0.3, 0.3), 8);

        assert_relative_eq!(
            primitive_nuclear(&a, &b, &oxygen).unwrap(),
            8.0 * primitive_nuclear(&a, &b, &hydrogen).unwrap(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn nuclear_attraction_is_symmetric() {
        let a = Gaussian::new(0.6, Vector3::new(0.0, 0.0, 0.4), (2, 1, 0));
        let b = Gaussian::new(1.1, Vector3::new(0.2, -0.4, 0.0), (0, 1, 1));
        let nucleus = Atom::new(Vector3::new(-0.3, 0.5, 0.8), 3);

        let ab = primitive_nuclear(&a, &b, &nucleus).unwrap();
        let ba = primitive_nuclear(&b, &a, &nucleus).unwrap();
        assert_relative_eq!(ab, ba, max_relative = 1e-10);
    }

    #[test]
    fn nuclear_term_rejects_invalid_indices() {
        // l - 2r - 2i < 0
        let result = nuclear_attraction_term(1, 1, 0, 1, 0, 0.0, 0.0, 0.0, 0.0, 0.25);
        assert_eq!(result, Err(IntegralError::NegativeFactorial(-1)));
    }

    #[test]
    fn electron_repulsion_of_concentric_s_gaussians() {
        // (ss|ss) for four identical normalized s gaussians with exponent a: 2 sqrt(a / pi)
        let gaussian = s(1.5, Vector3::new(0.0, 0.5, 0.0));
        assert_relative_eq!(
            primitive_electron(&gaussian, &gaussian, &gaussian, &gaussian).unwrap(),
            2.0 * (1.5 / PI).sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn electron_repulsion_permutational_symmetry() {
        let a = Gaussian::new(0.9, Vector3::new(0.0, 0.3, -0.2), (1, 0, 0));
        let b = Gaussian::new(0.4, Vector3::new(0.5, -0.1, 0.7), (0, 0, 1));
        let c = Gaussian::new(1.3, Vector3::new(-0.4, 0.2, 0.1), (1, 1, 0));
        let d = Gaussian::new(0.7, Vector3::new(0.0, 0.0, 0.0), (0, 0, 0));

        let reference = primitive_electron(&a, &b, &c, &d).unwrap();
        for value in [
            primitive_electron(&b, &a, &c, &d),
            primitive_electron(&a, &b, &d, &c),
            primitive_electron(&c, &d, &a, &b),
            primitive_electron(&d, &c, &b, &a),
        ] {
            assert_relative_eq!(value.unwrap(), reference, max_relative = 1e-10);
        }
    }
}
