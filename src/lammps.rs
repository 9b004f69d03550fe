//! Reader/writer for the LAMMPS-style data files the MD engine exchanges.
//!
//! The file is parsed into three explicit regions instead of the usual
//! blank-line sentinel scan: a verbatim header (line 3 holds the atom count,
//! lines 7 and 8 the y/z box bounds), the atom coordinate block following the
//! `Atoms` section marker, and a verbatim trailing region (velocities and
//! per-atom metadata). Only the coordinate block is ever rewritten.

use std::fs;
use std::path::Path;

use crate::error::{KfieldError, Result};

/// Token indices of the in-plane coordinates on an atom line
/// (`id type x y z ...`, crack plane spanned by y and z).
const Y_COL: usize = 3;
const Z_COL: usize = 4;

/// One line of the atom coordinate block, kept verbatim alongside the parsed
/// fields needed by the displacement step.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    raw: String,
    pub id: u64,
    pub type_tag: u32,
    pub y: f64,
    pub z: f64,
}

impl AtomRecord {
    fn parse(line: &str, line_number: usize) -> Result<Self> {
        let malformed = |what: &str| {
            KfieldError::MalformedConfiguration(format!("line {line_number}: {what}"))
        };
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() <= Z_COL {
            return Err(malformed("atom record has too few fields"));
        }
        let id = parts[0]
            .parse()
            .map_err(|_| malformed("unparsable atom id"))?;
        let type_tag = parts[1]
            .parse()
            .map_err(|_| malformed("unparsable atom type"))?;
        let y = parts[Y_COL]
            .parse()
            .map_err(|_| malformed("unparsable y coordinate"))?;
        let z = parts[Z_COL]
            .parse()
            .map_err(|_| malformed("unparsable z coordinate"))?;
        Ok(Self {
            raw: line.to_owned(),
            id,
            type_tag,
            y,
            z,
        })
    }

    /// The line as it will be written back out.
    pub fn line(&self) -> &str {
        &self.raw
    }

    fn set_in_plane(&mut self, y: f64, z: f64) {
        let mut parts: Vec<String> = self.raw.split_whitespace().map(str::to_owned).collect();
        parts[Y_COL] = y.to_string();
        parts[Z_COL] = z.to_string();
        self.raw = parts.join(" ");
        self.y = y;
        self.z = z;
    }
}

/// A parsed configuration file. Lines outside the atom coordinate block are
/// preserved byte-for-byte.
#[derive(Debug, Clone, PartialEq)]
pub struct DataFile {
    pub header: Vec<String>,
    pub natoms: usize,
    pub ylo: f64,
    pub yhi: f64,
    pub zlo: f64,
    pub zhi: f64,
    pub atoms: Vec<AtomRecord>,
    pub trailing: Vec<String>,
}

impl DataFile {
    pub fn parse(text: &str) -> Result<Self> {
        let malformed =
            |what: &str| KfieldError::MalformedConfiguration(what.to_owned());
        let lines: Vec<&str> = text.lines().collect();

        let natoms: usize = lines
            .get(2)
            .and_then(|l| l.split_whitespace().next())
            .and_then(|tok| tok.parse().ok())
            .ok_or_else(|| malformed("line 3 does not carry the atom count"))?;
        let (ylo, yhi) = parse_bounds(lines.get(6).copied())
            .ok_or_else(|| malformed("line 7 does not carry the y box bounds"))?;
        let (zlo, zhi) = parse_bounds(lines.get(7).copied())
            .ok_or_else(|| malformed("line 8 does not carry the z box bounds"))?;

        let marker = lines
            .iter()
            .position(|l| l.trim_start().starts_with("Atoms"))
            .ok_or_else(|| malformed("no Atoms section"))?;
        match lines.get(marker + 1) {
            Some(l) if l.trim().is_empty() => {}
            _ => return Err(malformed("Atoms marker not followed by a blank line")),
        }
        let body_start = marker + 2;
        let header = lines[..body_start].iter().map(|l| l.to_string()).collect();

        let mut atoms = Vec::with_capacity(natoms);
        let mut idx = body_start;
        while atoms.len() < natoms && idx < lines.len() {
            if lines[idx].trim().is_empty() {
                // Premature end of the coordinate block; whatever follows is
                // velocities or other sections and must stay untouched.
                break;
            }
            atoms.push(AtomRecord::parse(lines[idx], idx + 1)?);
            idx += 1;
        }
        let trailing = lines[idx..].iter().map(|l| l.to_string()).collect();

        Ok(Self {
            header,
            natoms,
            ylo,
            yhi,
            zlo,
            zhi,
            atoms,
            trailing,
        })
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::parse(&fs::read_to_string(path)?)
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for line in &self.header {
            out.push_str(line);
            out.push('\n');
        }
        for atom in &self.atoms {
            out.push_str(&atom.raw);
            out.push('\n');
        }
        for line in &self.trailing {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_text())?;
        Ok(())
    }

    /// Center of the simulation box in the crack plane.
    pub fn box_midpoint(&self) -> (f64, f64) {
        ((self.ylo + self.yhi) / 2.0, (self.zlo + self.zhi) / 2.0)
    }

    /// Atom type from the per-atom metadata block in the trailing region.
    ///
    /// For atom k of the coordinate block the metadata line sits 2*(natoms+3)
    /// lines below the atom line, i.e. at trailing offset k + natoms + 6
    /// (blank, `Velocities`, blank, natoms velocity lines, blank, section
    /// name, blank, then the metadata lines).
    pub fn original_type(&self, atom_index: usize) -> Option<u32> {
        let line = self.trailing.get(atom_index + self.natoms + 6)?;
        line.split_whitespace().nth(1)?.parse().ok()
    }

    pub(crate) fn set_in_plane(&mut self, atom_index: usize, y: f64, z: f64) {
        self.atoms[atom_index].set_in_plane(y, z);
    }
}

fn parse_bounds(line: Option<&str>) -> Option<(f64, f64)> {
    let mut it = line?.split_whitespace();
    let lo = it.next()?.parse().ok()?;
    let hi = it.next()?.parse().ok()?;
    Some((lo, hi))
}

/// Builds a minimal but structurally complete configuration for tests:
/// `natoms` atoms on a 10x20x30 box, the listed indices tagged as boundary
/// type 4, with velocity and per-atom type sections in the trailing region.
#[cfg(test)]
pub(crate) fn fixture(natoms: usize, boundary: &[usize]) -> String {
    let mut text = String::from("crack cell\n\n");
    text.push_str(&format!("{natoms} atoms\n4 atom types\n\n"));
    text.push_str("0.0 10.0 xlo xhi\n0.0 20.0 ylo yhi\n0.0 30.0 zlo zhi\n\n");
    text.push_str("Atoms # atomic\n\n");
    for k in 0..natoms {
        let tag = if boundary.contains(&k) { 4 } else { 1 };
        text.push_str(&format!(
            "{} {} {} {} {}\n",
            k + 1,
            tag,
            1.0,
            2.0 + k as f64,
            3.0 + k as f64
        ));
    }
    text.push_str("\nVelocities\n\n");
    for k in 0..natoms {
        text.push_str(&format!("{} 0.0 0.0 0.0\n", k + 1));
    }
    text.push_str("\nTypes\n\n");
    for k in 0..natoms {
        let tag = if boundary.contains(&k) { 4 } else { 1 };
        text.push_str(&format!("{} {}\n", k + 1, tag));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_atoms_and_trailing_regions() {
        let data = DataFile::parse(&fixture(10, &[2, 7])).unwrap();
        assert_eq!(data.natoms, 10);
        assert_eq!(data.atoms.len(), 10);
        assert_eq!((data.ylo, data.yhi), (0.0, 20.0));
        assert_eq!((data.zlo, data.zhi), (0.0, 30.0));
        assert_eq!(data.box_midpoint(), (10.0, 15.0));
        assert_eq!(data.atoms[2].type_tag, 4);
        assert_eq!(data.atoms[0].type_tag, 1);
        // blank + Velocities + blank + 10 + blank + Types + blank + 10
        assert_eq!(data.trailing.len(), 26);
    }

    #[test]
    fn round_trips_verbatim() {
        let text = fixture(6, &[0]);
        let data = DataFile::parse(&text).unwrap();
        assert_eq!(data.to_text(), text);
    }

    #[test]
    fn cross_references_original_type_through_trailing_block() {
        let data = DataFile::parse(&fixture(10, &[2, 7])).unwrap();
        assert_eq!(data.original_type(2), Some(4));
        assert_eq!(data.original_type(3), Some(1));
        assert_eq!(data.original_type(10), None);
    }

    #[test]
    fn premature_blank_line_ends_coordinate_block() {
        let full = fixture(10, &[]);
        // Declare 10 atoms but blank out the line after the sixth.
        let mut lines: Vec<&str> = full.lines().collect();
        lines[17] = "";
        let truncated = lines.join("\n");
        let data = DataFile::parse(&truncated).unwrap();
        assert_eq!(data.natoms, 10);
        assert_eq!(data.atoms.len(), 6);
        assert!(data.trailing[0].is_empty());
    }

    #[test]
    fn missing_atoms_section_is_an_error() {
        let err = DataFile::parse("a\n\n3 atoms\n\n\n0 1\n0 1\n0 1\n").unwrap_err();
        assert!(matches!(err, KfieldError::MalformedConfiguration(_)));
    }
}
