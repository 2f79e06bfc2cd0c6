// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! I/O layer for viability kernel files.
//!
//! This module provides the line-oriented scanning primitives shared by the
//! format parsers, the parsers themselves, format detection, the loader
//! that assembles kernels from several files, and RichCSV output.

pub mod detection;
pub mod formats;
pub mod loader;
pub mod scan;
pub mod table;
pub mod writer;

// Traits and types for format parsers
pub mod traits;
pub use traits::{FormatParser, ParseOutput, SourceFormat};

// Re-exports
pub use detection::{detect_format, sniff, sourcefile_parse};
pub use loader::{load, load_streams, Loader};
pub use writer::{save_csv, save_csv_path};
