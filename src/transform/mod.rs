// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Conversions between kernel representations.
//!
//! - [`bars`] - Run-length encoding between grids and bars
//! - [`resample`] - Moving bar grids onto another grid
//! - [`raster`] - Painting kd-tree cells and polygons onto grids
//! - [`distance`] - Distance to the kernel boundary
//! - [`section`] - Two-dimensional slices of grids
//!
//! Conversions never mutate their input.
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> vino::Result<()> {
//! use vino::{load, Kernel};
//!
//! if let Kernel::KdTree(tree) = load(&["kernel.dat"])? {
//!     let bars = tree.to_bargrid(&[100], 1)?;
//!     let coarse = bars.resample(Some(&[50]), None, true)?;
//!     println!("{} bars", coarse.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod bars;
pub mod distance;
pub mod raster;
pub mod resample;
pub mod section;

pub use resample::ResamplePlan;
