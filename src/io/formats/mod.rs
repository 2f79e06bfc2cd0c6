// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Source format parsers.
//!
//! - [`metadata`]: pure metadata files
//! - [`psp`]: legacy block files with an `Initxx` sentinel
//! - [`viabilitree`]: plain tables without metadata
//! - [`richcsv`]: metadata header followed by a table

pub mod metadata;
pub mod psp;
pub mod richcsv;
pub mod viabilitree;

pub use metadata::MetadataFormat;
pub use psp::PspFormat;
pub use richcsv::RichCsvFormat;
pub use viabilitree::ViabilitreeFormat;
