// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Conversion defaults.
//!
//! [`ConvertOptions`] can be built in code or read from a TOML file:
//!
//! ```toml
//! ppa = [100, 100]
//! bar_axis = 1
//! autocrop = true
//! companion_extension = "txt"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Result, VinoError};

/// Extension of companion metadata files.
pub const DEFAULT_COMPANION_EXTENSION: &str = "txt";

/// Points per axis used when rasterizing without an explicit size.
pub const DEFAULT_PPA: usize = 101;

/// Options shared by loading and conversion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Points (or cells) per axis of generated grids; one value applies to
    /// every axis
    pub ppa: Vec<usize>,

    /// Axis along which bars run
    pub bar_axis: usize,

    /// Whether resampling crops to the covered cells
    pub autocrop: bool,

    /// Whether loading picks up companion metadata files
    pub companions: bool,

    /// Extension of companion metadata files
    pub companion_extension: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            ppa: vec![DEFAULT_PPA],
            bar_axis: 0,
            autocrop: false,
            companions: false,
            companion_extension: DEFAULT_COMPANION_EXTENSION.to_string(),
        }
    }
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ppa(mut self, ppa: impl Into<Vec<usize>>) -> Self {
        self.ppa = ppa.into();
        self
    }

    pub fn with_bar_axis(mut self, bar_axis: usize) -> Self {
        self.bar_axis = bar_axis;
        self
    }

    pub fn with_autocrop(mut self, autocrop: bool) -> Self {
        self.autocrop = autocrop;
        self
    }

    pub fn with_companions(mut self, companions: bool) -> Self {
        self.companions = companions;
        self
    }

    pub fn with_companion_extension(mut self, extension: impl Into<String>) -> Self {
        self.companion_extension = extension.into();
        self
    }

    /// Parse options from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text)
            .map_err(|e| VinoError::malformed(format!("invalid conversion options: {e}")))
    }

    /// Read options from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Render the options as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self)
            .map_err(|e| VinoError::malformed(format!("can't serialize conversion options: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = ConvertOptions::default();
        assert_eq!(opts.ppa, [DEFAULT_PPA]);
        assert_eq!(opts.companion_extension, "txt");
        assert!(!opts.autocrop);
    }

    #[test]
    fn test_partial_toml() {
        let opts = ConvertOptions::from_toml_str("ppa = [10, 20]\nautocrop = true\n").unwrap();
        assert_eq!(opts.ppa, [10, 20]);
        assert!(opts.autocrop);
        assert_eq!(opts.bar_axis, 0);
        assert_eq!(opts.companion_extension, "txt");
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            ConvertOptions::from_toml_str("ppa = 'many'").unwrap_err(),
            VinoError::MalformedInput { .. }
        ));
    }

    #[test]
    fn test_builder_round_trip() {
        let opts = ConvertOptions::new()
            .with_ppa([5])
            .with_bar_axis(2)
            .with_companions(true)
            .with_companion_extension("meta");
        let text = opts.to_toml_string().unwrap();
        assert_eq!(ConvertOptions::from_toml_str(&text).unwrap(), opts);
    }
}
