//! Applies one stress-intensity increment to the boundary atoms of an
//! equilibrated configuration.
//!
//! Usage: displace <index> <temperature> <dK_in_sqrt_m> <step>
//!
//! Reads the coefficients of crack system <index> from properties/apq.txt,
//! the undisplaced step-0 configuration and the current step's equilibrated
//! configuration from dump/<index>/<T>/, and writes the displaced input for
//! step+1. dK is given in MPa*sqrt(m) and converted to the file's Angstrom
//! length unit.

use std::{env, fs, process};

use kfield::{parse_coefficient_block, CrackLoading, DataFile, SQRT_M_TO_SQRT_ANGSTROM};

// Atom type marking the fixed boundary shell in the K-test cells.
const BOUNDARY_TYPE: u32 = 4;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 5 {
        eprintln!("Usage: displace <index> <temperature> <dK_in_sqrt_m> <step>");
        process::exit(1);
    }
    let index: usize = parse_arg(&args[1], "index");
    let temperature = args[2].clone();
    let dk_si: f64 = parse_arg(&args[3], "dK");
    let step: u64 = parse_arg(&args[4], "step");

    if let Err(error) = run(index, &temperature, dk_si * SQRT_M_TO_SQRT_ANGSTROM, step) {
        eprintln!("Error: {error}");
        process::exit(1);
    }
}

fn parse_arg<T: std::str::FromStr>(raw: &str, name: &str) -> T {
    raw.parse().unwrap_or_else(|_| {
        eprintln!("invalid value for {name}: {raw:?}");
        process::exit(1);
    })
}

fn run(index: usize, temperature: &str, delta_k: f64, step: u64) -> kfield::Result<()> {
    let records = fs::read_to_string("properties/apq.txt")?;
    let coefficients = parse_coefficient_block(&records, index)?.scaled_to_mpa();

    let origin = DataFile::read(format!(
        "dump/{index}/{temperature}/crack_{index}_{temperature}_0_eq.data"
    ))?;
    let current = DataFile::read(format!(
        "dump/{index}/{temperature}/crack_{index}_{temperature}_{step}_eq.data"
    ))?;

    let loading = CrackLoading {
        coefficients,
        delta_k,
        boundary_type: BOUNDARY_TYPE,
    };
    // The output is written only once the whole transform has succeeded.
    let displaced = loading.displace_from(&origin, &current)?;
    displaced.write(format!(
        "dump/{index}/{temperature}/crack_{index}_{temperature}_{next}.data",
        next = step + 1
    ))?;
    Ok(())
}
