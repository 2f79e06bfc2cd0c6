// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

// ============================================================================
// Fixtures
// ============================================================================

/// Legacy lake kernel: companion metadata plus a PSP block file.
pub const LAKE_METADATA: &str = "lake.txt";
pub const LAKE_DATA: &str = "lake.dat";
/// Covered cells of the lake kernel.
pub const LAKE_CELLS: usize = 30;

/// Kd-tree: metadata plus a Viabilitree table.
pub const TREE_METADATA: &str = "tree.txt";
pub const TREE_DATA: &str = "tree.dat";

/// Regular grid in RichCSV.
pub const GRID: &str = "grid.csv";

/// Polygon in RichCSV.
pub const SQUARE: &str = "square.csv";

/// The polygon again, with `//` comments before its metadata header.
pub const COMMENTED_SQUARE: &str = "commented_square.csv";

/// The lake kernel as a single comment-led PSP file.
pub const COMMENTED_LAKE: &str = "commented_lake.dat";

/// Get the path to a test fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(manifest_dir)
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Paths of several fixtures, in order.
pub fn fixture_paths(names: &[&str]) -> Vec<PathBuf> {
    names.iter().map(|name| fixture_path(name)).collect()
}

// ============================================================================
// Temporary files
// ============================================================================

/// A path in the temp directory that is unique to this test process.
pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("vino_{}_{}", std::process::id(), name))
}

/// Write `contents` to a fresh temp file and return its path.
pub fn write_temp(name: &str, contents: &str) -> PathBuf {
    let path = temp_path(name);
    fs::write(&path, contents).expect("write temp file");
    path
}

/// Removes the file when dropped.
pub struct TempFile(pub PathBuf);

impl TempFile {
    pub fn new(name: &str) -> Self {
        Self(temp_path(name))
    }

    pub fn path(&self) -> &std::path::Path {
        &self.0
    }

    pub fn read(&self) -> String {
        fs::read_to_string(&self.0).expect("read temp file")
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.0);
    }
}
