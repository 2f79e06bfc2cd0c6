// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Inspect command - show kernel information, metadata and source formats.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::Subcommand;

use crate::common::{describe_inputs, format_vector, load_kernel, Result};
use vino::io::{detect_format, sniff};
use vino::{ConvertOptions, Metadata};

/// Inspect kernel files.
#[derive(Subcommand, Clone, Debug)]
pub enum InspectCmd {
    /// Show a summary of the kernel stored in the inputs
    Info {
        /// Input files, metadata first
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Also read companion metadata files (foo.dat -> foo.txt)
        #[arg(long)]
        companions: bool,
    },

    /// Show the merged metadata of the inputs
    Metadata {
        /// Input files
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Print JSON instead of metadata lines
        #[arg(long)]
        json: bool,
    },

    /// Show the detected source format of every input
    Format {
        /// Input files
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,
    },
}

impl InspectCmd {
    pub fn run(self) -> Result<()> {
        match self {
            InspectCmd::Info {
                inputs,
                json,
                companions,
            } => cmd_info(inputs, json, companions),
            InspectCmd::Metadata { inputs, json } => cmd_metadata(inputs, json),
            InspectCmd::Format { inputs } => cmd_format(inputs),
        }
    }
}

/// Cmd: Show kernel info
fn cmd_info(inputs: Vec<PathBuf>, json: bool, companions: bool) -> Result<()> {
    let options = ConvertOptions::default().with_companions(companions);
    let kernel = load_kernel(&inputs, &options)?;
    let info = kernel.info();

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("=== {} ===", describe_inputs(&inputs));
    println!("Format: {}", info.format);
    println!("Dimension: {}", info.dim);
    println!("Size: {}", info.size);
    println!("Min: {}", format_vector(&info.min));
    println!("Max: {}", format_vector(&info.max));

    if let Some(grid) = &info.grid {
        println!();
        println!("Grid:");
        println!("  Points per axis: {}", format_vector(&grid.ppa));
        println!("  Unit: {}", format_vector(&grid.unit));
        if let Some(axis) = grid.bar_axis {
            println!("  Bar axis: {axis}");
        }
    }

    println!();
    println!("Variables:");
    for var in &info.variables {
        let mut line = format!("  [{}] {}", var.order, var.name);
        if !var.desc.is_empty() {
            line.push_str(&format!(" | {}", var.desc));
        }
        if !var.unit.is_empty() {
            line.push_str(&format!(" | {}", var.unit));
        }
        println!("{line}");
    }

    Ok(())
}

/// Cmd: Show merged metadata
fn cmd_metadata(inputs: Vec<PathBuf>, json: bool) -> Result<()> {
    let mut metadata = Metadata::new();
    for input in &inputs {
        let mut reader = BufReader::new(File::open(input)?);
        let (_, output) = sniff(&mut reader)?;
        if let Some(md) = output.metadata() {
            metadata.merge(md);
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&metadata)?);
        return Ok(());
    }

    for key in metadata.keys() {
        println!("#{key}: {}", metadata.get_unparsed(key)?);
    }

    Ok(())
}

/// Cmd: Show source formats
fn cmd_format(inputs: Vec<PathBuf>) -> Result<()> {
    for input in &inputs {
        let format = detect_format(input)?;
        println!("{}: {format}", input.display());
    }
    Ok(())
}
