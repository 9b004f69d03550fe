//! Text record formats for per-system tensors and field coefficients.
//!
//! The coefficient file is the hand-off between the batch derivation and the
//! displacement step: one `System <id>:` block per crack system, six
//! `name = <re> + <im>j` lines, a `-` separator. The tensor file mirrors the
//! rotated stiffness/compliance pairs for inspection.

use std::fmt::Write as _;

use nalgebra::Complex;
use regex::Regex;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use crate::coefficients::CrackFieldCoefficients;
use crate::error::{KfieldError, Result};
use crate::voigt::Voigt6;

/// Named coefficients of a system block, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum CoefficientName {
    A1,
    A2,
    P1,
    P2,
    Q1,
    Q2,
}

/// Appends one rotated-tensor block to a report.
pub fn write_tensor_block(out: &mut String, id: u32, c_rotated: &Voigt6, s_rotated: &Voigt6) {
    let _ = writeln!(out, "System {id}:");
    out.push_str("C_rotated (GPa):\n");
    for i in 0..6 {
        for j in 0..6 {
            let _ = write!(out, "  {:10.4}", c_rotated[(i, j)]);
        }
        out.push('\n');
    }
    out.push_str("S_rotated (1/GPa):\n");
    for i in 0..6 {
        for j in 0..6 {
            let _ = write!(out, "  {:10.6}", s_rotated[(i, j)]);
        }
        out.push('\n');
    }
    let _ = writeln!(out, "\n{}\n", "=".repeat(60));
}

/// Appends one coefficient block to a report.
pub fn write_coefficient_block(out: &mut String, id: u32, coeff: &CrackFieldCoefficients) {
    let _ = write!(out, "System {id}:");
    for (name, value) in named_values(coeff) {
        let _ = write!(out, "\n{} = {:.6} + {:.6}j", name, value.re, value.im);
    }
    let _ = write!(out, "\n{}\n", "-".repeat(50));
}

fn named_values(coeff: &CrackFieldCoefficients) -> [(CoefficientName, Complex<f64>); 6] {
    [
        (CoefficientName::A1, coeff.a1),
        (CoefficientName::A2, coeff.a2),
        (CoefficientName::P1, coeff.p1),
        (CoefficientName::P2, coeff.p2),
        (CoefficientName::Q1, coeff.q1),
        (CoefficientName::Q2, coeff.q2),
    ]
}

/// Extracts the coefficients of the `index`-th system (1-based) from a
/// coefficient report.
pub fn parse_coefficient_block(content: &str, index: usize) -> Result<CrackFieldCoefficients> {
    let separator = Regex::new(r"-{10,}").unwrap();
    let systems: Vec<&str> = separator.split(content.trim()).collect();
    if index < 1 || index > systems.len() {
        return Err(KfieldError::SystemIndexOutOfRange {
            index,
            count: systems.len(),
        });
    }
    let block = systems[index - 1];

    let mut values = Vec::with_capacity(6);
    for name in CoefficientName::iter() {
        values.push(extract_value(block, name, index)?);
    }
    Ok(CrackFieldCoefficients {
        a1: values[0],
        a2: values[1],
        p1: values[2],
        p2: values[3],
        q1: values[4],
        q2: values[5],
    })
}

fn extract_value(block: &str, name: CoefficientName, index: usize) -> Result<Complex<f64>> {
    let pattern =
        Regex::new(&format!(r"{name} = ([\d\.\+\-eE]+) \+ ([\d\.\+\-eE]+)j")).unwrap();
    let caps = pattern
        .captures(block)
        .ok_or_else(|| KfieldError::MissingCoefficient {
            name: name.to_string(),
            index,
        })?;
    let malformed = || KfieldError::MalformedCoefficient {
        name: name.to_string(),
        index,
    };
    let re: f64 = caps[1].parse().map_err(|_| malformed())?;
    let im: f64 = caps[2].parse().map_err(|_| malformed())?;
    Ok(Complex::new(re, im))
}
