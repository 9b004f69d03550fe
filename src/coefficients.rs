//! Stroh-type crack-field coefficients from a rotated compliance tensor.
//!
//! The in-plane reduced compliance defines a quartic characteristic equation
//! whose two upper-half-plane roots (a1, a2) parameterize the near-tip
//! displacement field; p and q are the associated field coefficients.

use nalgebra::{Complex, ComplexField};

use crate::error::{KfieldError, Result};
use crate::voigt::Voigt6;

/// Inverts a rotated stiffness matrix into its compliance.
pub fn compliance(c_rotated: &Voigt6) -> Result<Voigt6> {
    c_rotated
        .try_inverse()
        .ok_or(KfieldError::SingularStiffness)
}

/// Plane-strain-reduced compliance: Sp_ij = S_ij - S_i3 * S_3j / S_33.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReducedCompliance {
    pub s11: f64,
    pub s12: f64,
    pub s22: f64,
    pub s16: f64,
    pub s26: f64,
    pub s66: f64,
}

impl ReducedCompliance {
    pub fn from_compliance(s: &Voigt6) -> Self {
        let elim = |i: usize, j: usize| s[(i, j)] - s[(i, 2)] * s[(2, j)] / s[(2, 2)];
        Self {
            s11: elim(0, 0),
            s12: elim(0, 1),
            s22: elim(1, 1),
            s16: elim(0, 5),
            s26: elim(1, 5),
            s66: elim(5, 5),
        }
    }

    /// Roots of Sp11*a^4 - 2*Sp16*a^3 + (2*Sp12 + Sp66)*a^2 - 2*Sp26*a + Sp22 = 0,
    /// solved in closed form through Ferrari's factorization into two
    /// quadratics. A direct solve terminates unconditionally, which an
    /// iterative eigenvalue route does not guarantee.
    pub fn characteristic_roots(&self) -> [Complex<f64>; 4] {
        let b = -2.0 * self.s16 / self.s11;
        let c = (2.0 * self.s12 + self.s66) / self.s11;
        let d = -2.0 * self.s26 / self.s11;
        let e = self.s22 / self.s11;
        quartic_roots(b, c, d, e)
    }
}

/// Roots of the monic quartic x^4 + b*x^3 + c*x^2 + d*x + e with real
/// coefficients.
///
/// The depressed quartic y^4 + p*y^2 + q*y + r either is biquadratic
/// (q = 0, the orthotropic crack frames) and splits over y^2 directly, or
/// factors into two quadratics through the positive real root of Ferrari's
/// resolvent cubic, which exists whenever q != 0.
fn quartic_roots(b: f64, c: f64, d: f64, e: f64) -> [Complex<f64>; 4] {
    let p = c - 3.0 * b * b / 8.0;
    let q = d - b * c / 2.0 + b * b * b / 8.0;
    let r = e - b * d / 4.0 + b * b * c / 16.0 - 3.0 * b * b * b * b / 256.0;
    let shift = Complex::new(-b / 4.0, 0.0);

    if q.abs() < 1.0e-12 * (1.0 + p.abs() + r.abs()) {
        let [z1, z2] = quadratic_roots(Complex::new(p, 0.0), Complex::new(r, 0.0));
        let (y1, y2) = (z1.sqrt(), z2.sqrt());
        return [shift + y1, shift - y1, shift + y2, shift - y2];
    }

    // 8m^3 + 8pm^2 + (2p^2 - 8r)m - q^2 = 0 is negative at m = 0, so its
    // largest real root is positive and the square roots below are real.
    let m = cubic_real_root(p, p * p / 4.0 - r, -q * q / 8.0);
    let s = (2.0 * m).sqrt();
    let half = p / 2.0 + m;
    let tq = q / (2.0 * s);
    let [y1, y2] = quadratic_roots(Complex::new(-s, 0.0), Complex::new(half + tq, 0.0));
    let [y3, y4] = quadratic_roots(Complex::new(s, 0.0), Complex::new(half - tq, 0.0));
    [shift + y1, shift + y2, shift + y3, shift + y4]
}

/// Both roots of y^2 + b*y + c over the complex numbers.
fn quadratic_roots(b: Complex<f64>, c: Complex<f64>) -> [Complex<f64>; 2] {
    let disc = (b * b - c * 4.0).sqrt();
    [(disc - b) * 0.5, (-disc - b) * 0.5]
}

/// The largest real root of t^3 + a*t^2 + b*t + c (Cardano).
fn cubic_real_root(a: f64, b: f64, c: f64) -> f64 {
    let p = b - a * a / 3.0;
    let q = 2.0 * a * a * a / 27.0 - a * b / 3.0 + c;
    let shift = -a / 3.0;
    let disc = q * q / 4.0 + p * p * p / 27.0;
    if disc >= 0.0 {
        let s = disc.sqrt();
        shift + (-q / 2.0 + s).cbrt() + (-q / 2.0 - s).cbrt()
    } else {
        // disc < 0 forces p < 0: three real roots, spread on a circle.
        let rho = (-p * p * p / 27.0).sqrt();
        let theta = (-q / (2.0 * rho)).clamp(-1.0, 1.0).acos();
        shift + 2.0 * (-p / 3.0).sqrt() * (theta / 3.0).cos()
    }
}

/// Selects the two roots with strictly positive imaginary part.
///
/// For a physically admissible elastic tensor the quartic always has exactly
/// two such roots (the other two are their conjugates); anything else means
/// the input was not a valid compliance and the run must stop. The pair is
/// ordered by ascending real part so that record files are deterministic; the
/// displacement formula is symmetric under swapping (a1, p1, q1) with
/// (a2, p2, q2), so the ordering carries no physical meaning.
fn upper_half_roots(roots: &[Complex<f64>]) -> Result<(Complex<f64>, Complex<f64>)> {
    let mut upper: Vec<Complex<f64>> = roots.iter().copied().filter(|r| r.im > 0.0).collect();
    if upper.len() != 2 {
        return Err(KfieldError::DegenerateRoots { found: upper.len() });
    }
    upper.sort_by(|x, y| x.re.total_cmp(&y.re));
    Ok((upper[0], upper[1]))
}

/// The (a1, a2, p1, p2, q1, q2) tuple of one crack system.
///
/// As derived, p and q carry the units of the compliance they came from
/// (1/GPa); see [`CrackFieldCoefficients::scaled_to_mpa`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrackFieldCoefficients {
    pub a1: Complex<f64>,
    pub a2: Complex<f64>,
    pub p1: Complex<f64>,
    pub p2: Complex<f64>,
    pub q1: Complex<f64>,
    pub q2: Complex<f64>,
}

impl CrackFieldCoefficients {
    /// Derives the coefficients from a rotated stiffness matrix.
    pub fn derive(c_rotated: &Voigt6) -> Result<Self> {
        Self::from_compliance(&compliance(c_rotated)?)
    }

    /// Derives the coefficients from an already-inverted compliance.
    pub fn from_compliance(s: &Voigt6) -> Result<Self> {
        let sp = ReducedCompliance::from_compliance(s);
        let (a1, a2) = upper_half_roots(&sp.characteristic_roots())?;
        let p = |a: Complex<f64>| a * a * sp.s11 - a * sp.s16 + sp.s12;
        let q = |a: Complex<f64>| Complex::new(sp.s22, 0.0) / a + a * sp.s12 - sp.s26;
        Ok(Self {
            a1,
            a2,
            p1: p(a1),
            p2: p(a2),
            q1: q(a1),
            q2: q(a2),
        })
    }

    /// Converts p and q from 1/GPa to 1/MPa for field evaluation against a
    /// stress intensity factor expressed in MPa units.
    pub fn scaled_to_mpa(&self) -> Self {
        let f = 1.0e-3;
        Self {
            a1: self.a1,
            a2: self.a2,
            p1: self.p1 * f,
            p2: self.p2 * f,
            q1: self.q1 * f,
            q2: self.q2 * f,
        }
    }
}

/// Griffith fracture-toughness estimate K_I in MPa*sqrt(m).
///
/// `s` is the rotated compliance in 1/GPa, `surface_energy` in J/m^2. The
/// b-coefficients eliminate the out-of-plane direction through S33; the
/// trailing 0.1 converts the mixed GPa / J/m^2 units to MPa*sqrt(m).
pub fn griffith_toughness(s: &Voigt6, surface_energy: f64) -> f64 {
    let s33 = s[(2, 2)];
    let b11 = (s[(0, 0)] * s33 - s[(0, 2)] * s[(0, 2)]) / s33;
    let b22 = (s[(1, 1)] * s33 - s[(1, 2)] * s[(1, 2)]) / s33;
    let b12 = (s[(0, 1)] * s33 - s[(0, 2)] * s[(1, 2)]) / s33;
    let b66 = (s[(5, 5)] * s33 - s[(1, 5)] * s[(1, 5)]) / s33;
    let b = (b11 * b22 / 2.0 * ((b22 / b11).sqrt() + (2.0 * b12 + b66) / (2.0 * b11))).sqrt();
    (2.0 * surface_energy / b).sqrt() * 0.1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::CubicElastic;
    use crate::voigt::{basis_from_directions, rotate_stiffness};
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn molybdenum() -> CubicElastic {
        CubicElastic {
            c11: 423.283,
            c12: 143.104,
            c44: 95.474,
        }
    }

    #[test]
    fn cubic_crystal_yields_two_conjugate_root_pairs() {
        let s = molybdenum().compliance();
        let sp = ReducedCompliance::from_compliance(&s);
        let roots = sp.characteristic_roots();

        let upper: Vec<_> = roots.iter().copied().filter(|r| r.im > 0.0).collect();
        assert_eq!(upper.len(), 2);
        for root in &upper {
            let conj = root.conj();
            let closest = roots
                .iter()
                .map(|r| (*r - conj).norm_sqr())
                .fold(f64::INFINITY, f64::min);
            assert!(closest < 1.0e-18, "missing conjugate partner for {root}");
        }
    }

    #[test]
    fn rotated_cubic_crystal_still_has_two_admissible_roots() {
        let r = basis_from_directions(
            Vector3::new(1.0, 1.0, 0.0),
            Vector3::new(-1.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        );
        let c_rot = rotate_stiffness(&molybdenum().stiffness(), &r);
        let coeff = CrackFieldCoefficients::derive(&c_rot).unwrap();
        assert!(coeff.a1.im > 0.0);
        assert!(coeff.a2.im > 0.0);
        assert!((coeff.a1 - coeff.a2).norm_sqr() > 1.0e-18);
    }

    #[test]
    fn crystal_frame_roots_are_purely_imaginary() {
        // On the cubic axes Sp16 = Sp26 = 0, so the quartic is biquadratic
        // and its admissible roots sit on the imaginary axis.
        let coeff =
            CrackFieldCoefficients::from_compliance(&molybdenum().compliance()).unwrap();
        assert_relative_eq!(coeff.a1.re, 0.0, epsilon = 1.0e-9);
        assert_relative_eq!(coeff.a2.re, 0.0, epsilon = 1.0e-9);
        assert_relative_eq!(coeff.a1.im, 0.586560, epsilon = 1.0e-5);
        assert_relative_eq!(coeff.a2.im, 1.704855, epsilon = 1.0e-5);
    }

    #[test]
    fn low_symmetry_frame_roots_satisfy_the_quartic() {
        // A frame off every cubic symmetry plane, so Sp16 and Sp26 are
        // nonzero and the solve goes through the full Ferrari split.
        let r = basis_from_directions(
            Vector3::new(2.0, 2.0, 1.0),
            Vector3::new(-1.0, 2.0, -2.0),
            Vector3::new(-2.0, 1.0, 2.0),
        );
        let c_rot = rotate_stiffness(&molybdenum().stiffness(), &r);
        let s = compliance(&c_rot).unwrap();
        let sp = ReducedCompliance::from_compliance(&s);
        assert!(sp.s16.abs() > 1.0e-6);

        for root in sp.characteristic_roots() {
            let residual = root.powi(4) * sp.s11 - root.powi(3) * (2.0 * sp.s16)
                + root.powi(2) * (2.0 * sp.s12 + sp.s66)
                - root * (2.0 * sp.s26)
                + sp.s22;
            assert!(residual.norm_sqr() < 1.0e-20, "residual {residual} at {root}");
        }
        let coeff = CrackFieldCoefficients::from_compliance(&s).unwrap();
        assert!(coeff.a1.im > 0.0 && coeff.a2.im > 0.0);
        assert!(coeff.a1.re.abs() > 1.0e-3);
    }

    #[test]
    fn pq_satisfy_their_defining_relations() {
        let s = molybdenum().compliance();
        let sp = ReducedCompliance::from_compliance(&s);
        let coeff = CrackFieldCoefficients::from_compliance(&s).unwrap();
        for (a, p, q) in [
            (coeff.a1, coeff.p1, coeff.q1),
            (coeff.a2, coeff.p2, coeff.q2),
        ] {
            let p_expect = a * a * sp.s11 - a * sp.s16 + sp.s12;
            let q_expect = Complex::new(sp.s22, 0.0) / a + a * sp.s12 - sp.s26;
            assert_relative_eq!(p.re, p_expect.re, epsilon = 1.0e-12);
            assert_relative_eq!(p.im, p_expect.im, epsilon = 1.0e-12);
            assert_relative_eq!(q.re, q_expect.re, epsilon = 1.0e-12);
            assert_relative_eq!(q.im, q_expect.im, epsilon = 1.0e-12);
        }
    }

    #[test]
    fn all_real_roots_are_rejected() {
        // Sp chosen so the quartic is (a^2 - 1)(a^2 - 4): four real roots,
        // which no physical compliance can produce.
        let sp = ReducedCompliance {
            s11: 1.0,
            s12: -2.5,
            s22: 4.0,
            s16: 0.0,
            s26: 0.0,
            s66: 0.0,
        };
        let err = upper_half_roots(&sp.characteristic_roots()).unwrap_err();
        assert!(matches!(err, KfieldError::DegenerateRoots { found: 0 }));
    }

    #[test]
    fn singular_stiffness_is_reported() {
        let err = compliance(&Voigt6::zeros()).unwrap_err();
        assert!(matches!(err, KfieldError::SingularStiffness));
    }

    #[test]
    fn griffith_toughness_is_positive_and_scales_with_surface_energy() {
        let s = molybdenum().compliance();
        let k1 = griffith_toughness(&s, 2.0);
        let k2 = griffith_toughness(&s, 8.0);
        assert!(k1 > 0.0);
        assert_relative_eq!(k2, 2.0 * k1, epsilon = 1.0e-12);
    }
}
