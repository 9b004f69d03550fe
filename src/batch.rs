//! Batch derivation over a table of crack systems.

use std::io::Read;

use nalgebra::Vector3;

use crate::coefficients::{compliance, griffith_toughness, CrackFieldCoefficients};
use crate::error::{KfieldError, Result};
use crate::material::{CrackSystem, CubicElastic};
use crate::report::{write_coefficient_block, write_tensor_block};
use crate::voigt::{rotate_stiffness, Voigt6};

/// Reads the crack-system table from headered CSV with columns
/// `no, a1, a2, a3, b1, b2, b3, c1, c2, c3, surface_energy`.
/// System identifiers are taken verbatim from the `no` column.
pub fn read_systems_csv<R: Read>(reader: R) -> Result<Vec<CrackSystem>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| KfieldError::MissingColumn(name.to_owned()))
    };
    let no = column("no")?;
    let dirs = [
        [column("a1")?, column("a2")?, column("a3")?],
        [column("b1")?, column("b2")?, column("b3")?],
        [column("c1")?, column("c2")?, column("c3")?],
    ];
    let gamma = column("surface_energy")?;

    let mut systems = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let field = |i: usize| -> Result<&str> {
            record
                .get(i)
                .ok_or_else(|| KfieldError::MalformedRecord(format!("{record:?}")))
        };
        let number = |i: usize| -> Result<f64> {
            field(i)?
                .parse()
                .map_err(|_| KfieldError::MalformedRecord(format!("{record:?}")))
        };
        let direction = |cols: [usize; 3]| -> Result<Vector3<f64>> {
            Ok(Vector3::new(number(cols[0])?, number(cols[1])?, number(cols[2])?))
        };
        systems.push(CrackSystem {
            id: field(no)?
                .parse()
                .map_err(|_| KfieldError::MalformedRecord(format!("{record:?}")))?,
            a: direction(dirs[0])?,
            b: direction(dirs[1])?,
            c: direction(dirs[2])?,
            surface_energy: number(gamma)?,
        });
    }
    Ok(systems)
}

/// Everything the batch run produces: the two report files, plus the
/// per-system compliances and Griffith toughness estimates in table order.
#[derive(Debug, Clone)]
pub struct BatchOutput {
    pub tensor_report: String,
    pub coefficient_report: String,
    pub compliances: Vec<Voigt6>,
    pub toughness: Vec<f64>,
}

/// Processes the crack systems in table row order: rotate the shared cubic
/// stiffness into each crack frame, invert, derive the field coefficients,
/// and estimate the Griffith toughness from the surface energy.
pub fn process_systems(material: &CubicElastic, systems: &[CrackSystem]) -> Result<BatchOutput> {
    let c_cubic = material.stiffness();
    let mut out = BatchOutput {
        tensor_report: String::new(),
        coefficient_report: String::new(),
        compliances: Vec::with_capacity(systems.len()),
        toughness: Vec::with_capacity(systems.len()),
    };
    for system in systems {
        let c_rot = rotate_stiffness(&c_cubic, &system.basis());
        let s_rot = compliance(&c_rot)?;
        write_tensor_block(&mut out.tensor_report, system.id, &c_rot, &s_rot);

        let coeff = CrackFieldCoefficients::from_compliance(&s_rot)?;
        write_coefficient_block(&mut out.coefficient_report, system.id, &coeff);

        let k_ic = griffith_toughness(&s_rot, system.surface_energy);
        log::debug!("system {}: K_I = {:.4} MPa*sqrt(m)", system.id, k_ic);
        out.compliances.push(s_rot);
        out.toughness.push(k_ic);
    }
    Ok(out)
}
