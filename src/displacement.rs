//! Near-tip displacement field evaluation and its application to the
//! boundary atoms of a configuration.

use std::collections::HashMap;
use std::f64::consts::PI;

use nalgebra::{Complex, ComplexField};

use crate::coefficients::CrackFieldCoefficients;
use crate::error::{KfieldError, Result};
use crate::lammps::{AtomRecord, DataFile};

/// dK given in MPa*sqrt(m) becomes MPa*sqrt(Angstrom) for files in Angstrom.
pub const SQRT_M_TO_SQRT_ANGSTROM: f64 = 1.0e5;

/// In-plane displacement increment (dy, dz) at the material point offset
/// (`dy`, `dz`) from the crack tip, for a stress-intensity increment `dk`.
///
/// The principal branch of the complex square root fixes the sign of the
/// field across theta = +-pi; coefficients must already be in 1/MPa when dk
/// is in MPa units.
pub fn field_displacement(
    coeff: &CrackFieldCoefficients,
    dk: f64,
    dy: f64,
    dz: f64,
) -> (f64, f64) {
    let r = (dy * dy + dz * dz).sqrt();
    let theta = dz.atan2(dy);
    let (sin_t, cos_t) = theta.sin_cos();

    let w1 = (Complex::new(cos_t, 0.0) + coeff.a2 * sin_t).sqrt();
    let w2 = (Complex::new(cos_t, 0.0) + coeff.a1 * sin_t).sqrt();
    let denom = coeff.a1 - coeff.a2;
    let cplx1 = (coeff.a1 * coeff.p2 * w1 - coeff.a2 * coeff.p1 * w2) / denom;
    let cplx2 = (coeff.a1 * coeff.q2 * w1 - coeff.a2 * coeff.q1 * w2) / denom;

    let amplitude = dk * (2.0 * r / PI).sqrt();
    (amplitude * cplx1.re, amplitude * cplx2.re)
}

/// Applies one K-increment to the boundary atoms of a configuration.
#[derive(Debug, Clone)]
pub struct CrackLoading {
    /// Field coefficients with p, q in 1/MPa.
    pub coefficients: CrackFieldCoefficients,
    /// Stress-intensity increment in MPa*sqrt(Angstrom).
    pub delta_k: f64,
    /// Atom type marking the boundary shell.
    pub boundary_type: u32,
}

impl CrackLoading {
    /// Fresh-load variant: offsets are taken from each atom's current
    /// position relative to the box midpoint, the boundary tag from the atom
    /// line itself.
    pub fn displace(&self, current: &DataFile) -> Result<DataFile> {
        let (yhalf, zhalf) = current.box_midpoint();
        self.transformed(current, |_, atom| {
            Ok((atom.type_tag == self.boundary_type).then(|| (atom.y - yhalf, atom.z - zhalf)))
        })
    }

    /// Incremental variant: the field is a function of the material point,
    /// so offsets come from the atom's position in the undisplaced `origin`
    /// configuration, and the boundary tag is cross-referenced through the
    /// trailing metadata block (the coordinate-block tag may have been
    /// remapped between steps).
    pub fn displace_from(&self, origin: &DataFile, current: &DataFile) -> Result<DataFile> {
        if origin.natoms != current.natoms {
            return Err(KfieldError::AtomCountMismatch {
                expected: origin.natoms,
                found: current.natoms,
            });
        }
        let (yhalf, zhalf) = origin.box_midpoint();
        let origin_pos: HashMap<u64, (f64, f64)> = origin
            .atoms
            .iter()
            .map(|atom| (atom.id, (atom.y, atom.z)))
            .collect();

        self.transformed(current, |k, atom| {
            let tag = current.original_type(k).ok_or_else(|| {
                KfieldError::MalformedConfiguration(format!(
                    "no trailing type metadata for atom {}",
                    atom.id
                ))
            })?;
            if tag != self.boundary_type {
                return Ok(None);
            }
            let (y0, z0) = origin_pos.get(&atom.id).copied().ok_or_else(|| {
                KfieldError::MalformedConfiguration(format!(
                    "atom id {} absent from origin configuration",
                    atom.id
                ))
            })?;
            Ok(Some((y0 - yhalf, z0 - zhalf)))
        })
    }

    fn transformed<F>(&self, current: &DataFile, mut offsets: F) -> Result<DataFile>
    where
        F: FnMut(usize, &AtomRecord) -> Result<Option<(f64, f64)>>,
    {
        let mut out = current.clone();
        for (k, atom) in current.atoms.iter().enumerate() {
            if let Some((dy, dz)) = offsets(k, atom)? {
                let (du, dv) = field_displacement(&self.coefficients, self.delta_k, dy, dz);
                out.set_in_plane(k, atom.y + du, atom.z + dv);
            }
        }
        Ok(out)
    }
}
