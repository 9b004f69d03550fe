//! Derives per-system crack-field coefficients and Griffith toughness
//! estimates from a crack-system table and cubic elastic constants.
//!
//! Usage: apq <systems.csv> <tensor-out> <coeff-out> <C11> <C12> <C44>
//!
//! Stiffness constants are in GPa. The tensor file gets one rotated C/S block
//! per system, the coefficient file one a/p/q block per system; the Griffith
//! K_I table is printed to stdout.

use std::fs::File;
use std::{env, fs, process};

use kfield::{process_systems, read_systems_csv, CubicElastic};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 7 {
        eprintln!("Usage: apq <systems.csv> <tensor-out> <coeff-out> <C11> <C12> <C44>");
        process::exit(1);
    }
    let material = CubicElastic {
        c11: parse_constant(&args[4], "C11"),
        c12: parse_constant(&args[5], "C12"),
        c44: parse_constant(&args[6], "C44"),
    };
    if let Err(error) = run(&args[1], &args[2], &args[3], material) {
        eprintln!("Error: {error}");
        process::exit(1);
    }
}

fn parse_constant(raw: &str, name: &str) -> f64 {
    raw.parse().unwrap_or_else(|_| {
        eprintln!("{name} must be a number in GPa, got {raw:?}");
        process::exit(1);
    })
}

fn run(table: &str, tensor_out: &str, coeff_out: &str, material: CubicElastic) -> kfield::Result<()> {
    let systems = read_systems_csv(File::open(table)?)?;
    let output = process_systems(&material, &systems)?;
    fs::write(tensor_out, &output.tensor_report)?;
    fs::write(coeff_out, &output.coefficient_report)?;

    println!("system K_I (MPa*sqrt(m))");
    for (system, k_ic) in systems.iter().zip(&output.toughness) {
        println!("{} {:.4}", system.id, k_ic);
    }
    Ok(())
}
