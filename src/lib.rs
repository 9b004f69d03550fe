//! kfield - anisotropic crack-tip fields for K-controlled atomistic fracture.
//!
//! Given a crack system's crystallographic orientation and the cubic elastic
//! constants of the crystal, the crate:
//!
//! - rotates the stiffness tensor into the crack frame ([`voigt`]),
//! - derives the Stroh-type field coefficients (a1, a2, p1, p2, q1, q2) from
//!   the rotated compliance ([`coefficients`]), together with a Griffith
//!   toughness estimate from the surface energy,
//! - writes/parses the per-system coefficient records ([`report`], [`batch`]),
//! - and displaces the boundary atoms of a configuration file by a prescribed
//!   stress-intensity increment ([`displacement`], [`lammps`]),
//!
//! producing a new configuration that an MD engine can relax to progressively
//! load the crack.
//!
//! Units: stiffness in GPa, compliance in 1/GPa (1/MPa during field
//! evaluation), lengths in Angstrom, K in MPa*sqrt(m).

pub mod batch;
pub mod coefficients;
pub mod displacement;
pub mod error;
pub mod lammps;
pub mod material;
pub mod report;
pub mod voigt;

pub use batch::{process_systems, read_systems_csv, BatchOutput};
pub use coefficients::{compliance, griffith_toughness, CrackFieldCoefficients, ReducedCompliance};
pub use displacement::{field_displacement, CrackLoading, SQRT_M_TO_SQRT_ANGSTROM};
pub use error::{KfieldError, Result};
pub use lammps::{AtomRecord, DataFile};
pub use material::{CrackSystem, CubicElastic};
pub use report::{parse_coefficient_block, write_coefficient_block, write_tensor_block};
pub use voigt::{basis_from_directions, rotate_stiffness, tensor_to_voigt, voigt_to_tensor, Voigt6};
