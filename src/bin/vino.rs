// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Vino CLI
//!
//! Command-line tool for viability kernel files.
//!
//! ## Usage
//!
//! ```sh
//! # Show kernel information
//! vino inspect info kernel.txt kernel.dat
//!
//! # Show merged metadata as JSON
//! vino inspect metadata --json kernel.csv
//!
//! # Rasterize a kd-tree into bars
//! vino convert to-bars --ppa 100 --bar-axis 1 -o bars.csv tree.txt tree.dat
//!
//! # Resample a bar grid, cropping to the covered cells
//! vino convert resample --ppa 50 --autocrop -o small.csv bars.csv
//! ```

mod cmd;
mod common;

use std::process;

use clap::{Parser, Subcommand};
use cmd::{ConvertCmd, InspectCmd};
use common::Result;

/// Vino - Viability kernel toolkit
///
/// Read kernels from PSP, Viabilitree and RichCSV files and convert them
/// between regular grids, bar grids, kd-trees and polygons.
#[derive(Parser, Clone)]
#[command(name = "vino")]
#[command(about = "Viability kernel toolkit", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "ArcheBase")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Clone)]
enum Commands {
    /// Inspect kernel files (info, metadata, format)
    #[command(subcommand)]
    Inspect(InspectCmd),

    /// Convert kernels and write them as RichCSV (to-bars, to-grid, resample)
    #[command(subcommand)]
    Convert(ConvertCmd),
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect(cmd) => cmd.run(),
        Commands::Convert(cmd) => cmd.run(),
    }
}

fn main() {
    let result = run();

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
