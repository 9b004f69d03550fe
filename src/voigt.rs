//! Voigt contraction of elastic tensors and the rank-4 coordinate rotation.

use nalgebra::{Matrix3, SMatrix, Vector3};

/// Elastic stiffness or compliance in 6x6 Voigt form.
pub type Voigt6 = SMatrix<f64, 6, 6>;

/// Full 3x3x3x3 elastic tensor.
pub type Tensor4 = [[[[f64; 3]; 3]; 3]; 3];

/// Voigt index -> tensor index pair.
pub const VOIGT_PAIRS: [(usize, usize); 6] = [(0, 0), (1, 1), (2, 2), (1, 2), (0, 2), (0, 1)];

/// Expands a Voigt matrix to the full tensor, populating all minor-symmetry
/// copies (Cijkl = Cjikl = Cijlk).
pub fn voigt_to_tensor(c: &Voigt6) -> Tensor4 {
    let mut t = [[[[0.0; 3]; 3]; 3]; 3];
    for (bi, &(i, j)) in VOIGT_PAIRS.iter().enumerate() {
        for (bj, &(k, l)) in VOIGT_PAIRS.iter().enumerate() {
            let value = c[(bi, bj)];
            t[i][j][k][l] = value;
            t[j][i][k][l] = value;
            t[i][j][l][k] = value;
            t[j][i][l][k] = value;
        }
    }
    t
}

/// Contracts a full tensor back to Voigt form. The four symmetric index
/// permutations are averaged with weight 0.25; after an arbitrary rotation
/// the naive element-wise embedding is not automatically consistent and
/// skipping the average leaves small systematic asymmetries.
pub fn tensor_to_voigt(t: &Tensor4) -> Voigt6 {
    let mut c = Voigt6::zeros();
    for (bi, &(i, j)) in VOIGT_PAIRS.iter().enumerate() {
        for (bj, &(k, l)) in VOIGT_PAIRS.iter().enumerate() {
            c[(bi, bj)] =
                0.25 * (t[i][j][k][l] + t[j][i][k][l] + t[i][j][l][k] + t[j][i][l][k]);
        }
    }
    c
}

/// Rotates a stiffness matrix by the basis-change matrix `r`:
/// C'_ijkl = R_ia R_jb R_kc R_ld C_abcd.
pub fn rotate_stiffness(c: &Voigt6, r: &Matrix3<f64>) -> Voigt6 {
    let t = voigt_to_tensor(c);
    let mut rotated = [[[[0.0; 3]; 3]; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            for k in 0..3 {
                for l in 0..3 {
                    let mut sum = 0.0;
                    for a in 0..3 {
                        for b in 0..3 {
                            for p in 0..3 {
                                for q in 0..3 {
                                    sum += r[(i, a)]
                                        * r[(j, b)]
                                        * r[(k, p)]
                                        * r[(l, q)]
                                        * t[a][b][p][q];
                                }
                            }
                        }
                    }
                    rotated[i][j][k][l] = sum;
                }
            }
        }
    }
    tensor_to_voigt(&rotated)
}

/// Builds an orientation basis from raw crystallographic direction triples.
/// Each direction is unit-normalized and becomes one column of the basis.
/// Non-orthogonal input is accepted (the rotation stays numerically defined)
/// but logged, since the resulting elastic fields are unphysical.
pub fn basis_from_directions(a: Vector3<f64>, b: Vector3<f64>, c: Vector3<f64>) -> Matrix3<f64> {
    let basis = Matrix3::from_columns(&[a.normalize(), b.normalize(), c.normalize()]);
    let deviation = (basis.transpose() * basis - Matrix3::identity()).norm();
    if deviation > 1.0e-8 {
        log::warn!(
            "orientation basis deviates from orthogonality by {:.2e}",
            deviation
        );
    }
    basis
}
