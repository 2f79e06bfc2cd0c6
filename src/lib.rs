// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Vino
//!
//! Reading, converting and writing viability kernels.
//!
//! A viability kernel is a subset of a state space, stored by the software
//! that computed it in one of several text formats. This library provides:
//! - **Metadata** schema and typed records in [`metadata`](crate::metadata)
//! - **Parsers** and format detection in [`io`](crate::io)
//! - **Kernel** representations in [`kernel`](crate::kernel): regular grids,
//!   bar grids, kd-tree cells and polygons
//! - **Conversions** between representations in [`transform`](crate::transform)
//!
//! ## Architecture
//!
//! - `metadata/` - Field schema, values and the ordered metadata record
//! - `io/` - Line scanning, format parsers, sniffing, loading and writing
//! - `kernel/` - The [`Kernel`] enum and its four representations
//! - `transform/` - Run-length encoding, resampling, rasterization, distances
//!
//! ## Example: Loading and converting
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use vino::{load, save_csv_path, Kernel};
//!
//! let kernel = load(&["kernel.txt", "kernel.dat"])?;
//! println!("{}-D {} with {} rows", kernel.dimension(), kernel.dataformat(), kernel.len());
//!
//! if let Kernel::BarGrid(bars) = &kernel {
//!     let grid = bars.to_regulargrid()?;
//!     save_csv_path("grid.csv", &Kernel::from(grid))?;
//! }
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

// Re-export core types for convenience
pub use core::{RawArray, Result, VinoError};

// Conversion defaults
pub mod config;
pub use config::ConvertOptions;

// Metadata schema and record
pub mod metadata;
pub use metadata::{Metadata, MetadataValue};

// Kernel representations
pub mod kernel;
pub use kernel::{
    Bar, BarGrid, Dataformat, GridGeometry, KdTree, Kernel, KernelInfo, Polygon, RegularGrid,
    Variable,
};

// Conversions
pub mod transform;
pub use transform::ResamplePlan;

// I/O: parsers, detection, loading and writing
pub mod io;
pub use io::{load, load_streams, save_csv, save_csv_path, Loader, SourceFormat};
