// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Convert command - change kernel representation and write RichCSV.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::common::{describe_inputs, load_kernel, read_options, Result};
use vino::{save_csv_path, ConvertOptions, Kernel};

/// Arguments shared by every conversion.
#[derive(Args, Clone, Debug)]
pub struct ConvertArgs {
    /// Input files, metadata first
    #[arg(value_name = "FILE", required = true)]
    inputs: Vec<PathBuf>,

    /// Output RichCSV file
    #[arg(short, long, value_name = "OUTPUT")]
    output: PathBuf,

    /// Points per axis of the generated grid (one value for every axis)
    #[arg(long, value_delimiter = ',')]
    ppa: Option<Vec<usize>>,

    /// TOML file with conversion defaults
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Also read companion metadata files (foo.dat -> foo.txt)
    #[arg(long)]
    companions: bool,
}

impl ConvertArgs {
    /// Conversion options: config file defaults overridden by flags.
    fn options(&self) -> Result<ConvertOptions> {
        let mut options = read_options(self.config.as_deref())?;
        if let Some(ppa) = &self.ppa {
            options = options.with_ppa(ppa.clone());
        }
        if self.companions {
            options = options.with_companions(true);
        }
        Ok(options)
    }
}

/// Convert kernels between representations.
#[derive(Subcommand, Clone, Debug)]
pub enum ConvertCmd {
    /// Convert to a bar grid
    ToBars {
        #[command(flatten)]
        args: ConvertArgs,

        /// Axis along which bars run
        #[arg(long)]
        bar_axis: Option<usize>,
    },

    /// Convert to a regular grid
    ToGrid {
        #[command(flatten)]
        args: ConvertArgs,
    },

    /// Resample a grid or bar grid
    Resample {
        #[command(flatten)]
        args: ConvertArgs,

        /// Axis along which bars run
        #[arg(long)]
        bar_axis: Option<usize>,

        /// Crop to the bounding box of the covered cells
        #[arg(long)]
        autocrop: bool,
    },
}

impl ConvertCmd {
    pub fn run(self) -> Result<()> {
        match self {
            ConvertCmd::ToBars { args, bar_axis } => cmd_to_bars(args, bar_axis),
            ConvertCmd::ToGrid { args } => cmd_to_grid(args),
            ConvertCmd::Resample {
                args,
                bar_axis,
                autocrop,
            } => cmd_resample(args, bar_axis, autocrop),
        }
    }
}

fn write(args: &ConvertArgs, kernel: &Kernel) -> Result<()> {
    save_csv_path(&args.output, kernel)?;
    println!(
        "Wrote {} ({} {} rows) from {}",
        args.output.display(),
        kernel.len(),
        kernel.dataformat(),
        describe_inputs(&args.inputs)
    );
    Ok(())
}

/// Cmd: Convert to bars
fn cmd_to_bars(args: ConvertArgs, bar_axis: Option<usize>) -> Result<()> {
    let options = args.options()?;
    let kernel = load_kernel(&args.inputs, &options)?;
    let bar_axis = match (bar_axis, &kernel) {
        (Some(axis), _) => axis,
        (None, Kernel::BarGrid(bars)) => bars.bar_axis(),
        (None, _) => options.bar_axis,
    };
    let bars = kernel.to_bargrid(&options.ppa, bar_axis)?;
    write(&args, &bars.into())
}

/// Cmd: Convert to a regular grid
fn cmd_to_grid(args: ConvertArgs) -> Result<()> {
    let options = args.options()?;
    let kernel = load_kernel(&args.inputs, &options)?;
    let grid = kernel.to_regulargrid(&options.ppa)?;
    write(&args, &grid.into())
}

/// Cmd: Resample
fn cmd_resample(args: ConvertArgs, bar_axis: Option<usize>, autocrop: bool) -> Result<()> {
    let options = args.options()?;
    let kernel = load_kernel(&args.inputs, &options)?;
    // explicit --ppa resamples; otherwise grids keep their size
    let ppa = match (&args.ppa, &kernel) {
        (Some(ppa), _) => Some(ppa.as_slice()),
        (None, Kernel::KdTree(_) | Kernel::Polygon(_)) => Some(options.ppa.as_slice()),
        (None, _) if args.config.is_some() => Some(options.ppa.as_slice()),
        (None, _) => None,
    };
    let resampled = kernel.resample(ppa, bar_axis, autocrop || options.autocrop)?;
    write(&args, &resampled)
}
