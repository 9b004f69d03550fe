//! Cubic elastic constants and crack-system definitions.

use nalgebra::{Matrix3, Vector3};

use crate::voigt::{basis_from_directions, Voigt6};

/// Elastic constants of a cubic crystal, in GPa.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicElastic {
    pub c11: f64,
    pub c12: f64,
    pub c44: f64,
}

impl CubicElastic {
    /// Stiffness matrix in the crystal frame.
    pub fn stiffness(&self) -> Voigt6 {
        let mut c = Voigt6::zeros();
        for i in 0..3 {
            for j in 0..3 {
                c[(i, j)] = if i == j { self.c11 } else { self.c12 };
            }
            c[(i + 3, i + 3)] = self.c44;
        }
        c
    }

    /// Closed-form compliance of the cubic stiffness, in 1/GPa.
    pub fn compliance(&self) -> Voigt6 {
        let det = (self.c11 - self.c12) * (self.c11 + 2.0 * self.c12);
        let s11 = (self.c11 + self.c12) / det;
        let s12 = -self.c12 / det;
        let s44 = 1.0 / self.c44;
        let mut s = Voigt6::zeros();
        for i in 0..3 {
            for j in 0..3 {
                s[(i, j)] = if i == j { s11 } else { s12 };
            }
            s[(i + 3, i + 3)] = s44;
        }
        s
    }
}

/// One row of the crack-system table: raw crystallographic directions of the
/// crack frame plus the surface energy of the cleavage plane (J/m^2).
#[derive(Debug, Clone, PartialEq)]
pub struct CrackSystem {
    pub id: u32,
    pub a: Vector3<f64>,
    pub b: Vector3<f64>,
    pub c: Vector3<f64>,
    pub surface_energy: f64,
}

impl CrackSystem {
    /// Orientation basis with the normalized a/b/c directions as columns.
    pub fn basis(&self) -> Matrix3<f64> {
        basis_from_directions(self.a, self.b, self.c)
    }
}
