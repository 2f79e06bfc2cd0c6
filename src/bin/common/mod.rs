// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for CLI commands.

use std::path::{Path, PathBuf};

use vino::{ConvertOptions, Kernel, Loader};

pub use anyhow::Result as CliResult;
pub type Result<T = ()> = CliResult<T>;

/// Read conversion options from an optional TOML file.
pub fn read_options(config: Option<&Path>) -> Result<ConvertOptions> {
    match config {
        Some(path) => ConvertOptions::from_file(path)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {e}", path.display())),
        None => Ok(ConvertOptions::default()),
    }
}

/// Load a kernel from input files.
pub fn load_kernel(inputs: &[PathBuf], options: &ConvertOptions) -> Result<Kernel> {
    Ok(Loader::from_options(options).load(inputs)?)
}

/// Format a vector of numbers as `(a, b, c)`.
pub fn format_vector<T: std::fmt::Display>(values: &[T]) -> String {
    let items: Vec<String> = values.iter().map(ToString::to_string).collect();
    format!("({})", items.join(", "))
}

/// Display name for a list of inputs.
pub fn describe_inputs(inputs: &[PathBuf]) -> String {
    inputs
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" + ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_vector() {
        assert_eq!(format_vector(&[1, 2, 3]), "(1, 2, 3)");
        assert_eq!(format_vector(&[0.5]), "(0.5)");
        assert_eq!(format_vector::<f64>(&[]), "()");
    }

    #[test]
    fn test_describe_inputs() {
        let inputs = [PathBuf::from("a.txt"), PathBuf::from("b.dat")];
        assert_eq!(describe_inputs(&inputs), "a.txt + b.dat");
    }

    #[test]
    fn test_read_options_default() {
        assert_eq!(read_options(None).unwrap(), ConvertOptions::default());
        assert!(read_options(Some(Path::new("/nonexistent/vino.toml"))).is_err());
    }
}
