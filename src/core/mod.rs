// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout vino.
//!
//! This module provides the foundational types for the library:
//! - [`VinoError`] - Comprehensive error handling
//! - [`RawArray`] - Numeric chunk produced by the format parsers

pub mod array;
pub mod error;

pub use array::RawArray;
pub use error::{Result, VinoError};
