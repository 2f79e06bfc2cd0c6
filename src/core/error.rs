// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for vino.
//!
//! Provides error types for every stage of kernel handling:
//! - Source file sniffing and parsing
//! - Metadata schema parsing
//! - Kernel construction and conversion
//! - Multi-file loading

use thiserror::Error;

/// Errors that can occur while loading, building or converting kernels.
#[derive(Error, Debug)]
pub enum VinoError {
    /// The stream is not in the format a parser expects.
    ///
    /// This is the only recoverable error: the sniffer rewinds the stream
    /// and tries the next parser.
    #[error("Wrong format ({format}): {message}")]
    WrongFormat {
        /// Parser that rejected the stream
        format: String,
        /// Why the stream was rejected
        message: String,
    },

    /// The stream has the right shape but its content is inconsistent
    #[error("Malformed input{}: {message}", line.map(|l| format!(" at line {l}")).unwrap_or_default())]
    MalformedInput {
        /// Error message
        message: String,
        /// 1-based line number in the source stream, when known
        line: Option<usize>,
    },

    /// Metadata field not declared in the schema
    #[error("Unknown metadata field '{name}'")]
    UnknownField {
        /// Field name
        name: String,
    },

    /// Metadata text does not match the field grammar
    #[error("Failed to parse metadata field '{field}' from {value:?}: {reason}")]
    FieldParse {
        /// Field name
        field: String,
        /// Offending text (or value description)
        value: String,
        /// Why parsing failed
        reason: String,
    },

    /// A metadata field required to build a kernel is absent
    #[error("Missing required metadata '{field}'")]
    MissingMetadata {
        /// Field name
        field: String,
    },

    /// Vector lengths or array shapes disagree
    #[error("Dimension mismatch: {message}")]
    DimensionMismatch {
        /// Error message
        message: String,
    },

    /// Geometric precondition violated during rasterization
    #[error("Rasterization error: {message}")]
    Rasterization {
        /// Error message
        message: String,
    },

    /// `dataformat.name` has no matching kernel representation
    #[error("Unknown dataformat '{name}' (available formats: {available})")]
    UnknownDataformat {
        /// Declared dataformat
        name: String,
        /// Comma-separated list of known dataformats
        available: String,
    },

    /// No numerical data in any input
    #[error("No data found in input files")]
    NoData,

    /// No metadata in any input
    #[error("No metadata found in input files")]
    NoMetadata,

    /// Data chunks could not be stacked
    #[error("Can't concatenate data chunks: {message}")]
    Concatenation {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl VinoError {
    /// Create a wrong format error.
    pub fn wrong_format(format: impl Into<String>, message: impl Into<String>) -> Self {
        VinoError::WrongFormat {
            format: format.into(),
            message: message.into(),
        }
    }

    /// Create a malformed input error without line information.
    pub fn malformed(message: impl Into<String>) -> Self {
        VinoError::MalformedInput {
            message: message.into(),
            line: None,
        }
    }

    /// Create a malformed input error pointing at a 1-based line.
    pub fn malformed_at(line: usize, message: impl Into<String>) -> Self {
        VinoError::MalformedInput {
            message: message.into(),
            line: Some(line),
        }
    }

    /// Create an unknown field error.
    pub fn unknown_field(name: impl Into<String>) -> Self {
        VinoError::UnknownField { name: name.into() }
    }

    /// Create a field parse error.
    pub fn field_parse(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        VinoError::FieldParse {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing metadata error.
    pub fn missing_metadata(field: impl Into<String>) -> Self {
        VinoError::MissingMetadata {
            field: field.into(),
        }
    }

    /// Create a dimension mismatch error.
    pub fn dimension_mismatch(message: impl Into<String>) -> Self {
        VinoError::DimensionMismatch {
            message: message.into(),
        }
    }

    /// Create a rasterization error.
    pub fn rasterization(message: impl Into<String>) -> Self {
        VinoError::Rasterization {
            message: message.into(),
        }
    }

    /// Create a concatenation error.
    pub fn concatenation(message: impl Into<String>) -> Self {
        VinoError::Concatenation {
            message: message.into(),
        }
    }

    /// Whether the sniffer may rewind and try another parser.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, VinoError::WrongFormat { .. })
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            VinoError::WrongFormat { format, message } => {
                vec![("format", format.clone()), ("message", message.clone())]
            }
            VinoError::MalformedInput { message, line } => {
                let mut fields = vec![("message", message.clone())];
                if let Some(line) = line {
                    fields.push(("line", line.to_string()));
                }
                fields
            }
            VinoError::UnknownField { name } => vec![("field", name.clone())],
            VinoError::FieldParse {
                field,
                value,
                reason,
            } => vec![
                ("field", field.clone()),
                ("value", value.clone()),
                ("reason", reason.clone()),
            ],
            VinoError::MissingMetadata { field } => vec![("field", field.clone())],
            VinoError::DimensionMismatch { message }
            | VinoError::Rasterization { message }
            | VinoError::Concatenation { message } => vec![("message", message.clone())],
            VinoError::UnknownDataformat { name, available } => {
                vec![("dataformat", name.clone()), ("available", available.clone())]
            }
            VinoError::NoData | VinoError::NoMetadata => Vec::new(),
            VinoError::Io(err) => vec![("message", err.to_string())],
        }
    }
}

/// Result type for vino operations.
pub type Result<T> = std::result::Result<T, VinoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_format_is_recoverable() {
        let err = VinoError::wrong_format("psp", "Couldn't find PSP header");
        assert!(err.is_recoverable());
        assert_eq!(
            err.to_string(),
            "Wrong format (psp): Couldn't find PSP header"
        );
    }

    #[test]
    fn test_fatal_errors_are_not_recoverable() {
        assert!(!VinoError::NoData.is_recoverable());
        assert!(!VinoError::malformed("bad").is_recoverable());
        assert!(!VinoError::rasterization("bogus").is_recoverable());
    }

    #[test]
    fn test_malformed_display_with_line() {
        let err = VinoError::malformed_at(7, "expected 3 fields, saw 4");
        assert_eq!(
            err.to_string(),
            "Malformed input at line 7: expected 3 fields, saw 4"
        );
        let err = VinoError::malformed("binary stream");
        assert_eq!(err.to_string(), "Malformed input: binary stream");
    }

    #[test]
    fn test_field_parse_display() {
        let err = VinoError::field_parse("PointSize", "abc", "invalid digit");
        assert_eq!(
            err.to_string(),
            "Failed to parse metadata field 'PointSize' from \"abc\": invalid digit"
        );
    }

    #[test]
    fn test_log_fields_malformed() {
        let err = VinoError::malformed_at(3, "message");
        let fields = err.log_fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0], ("message", "message".to_string()));
        assert_eq!(fields[1], ("line", "3".to_string()));
    }

    #[test]
    fn test_log_fields_unknown_dataformat() {
        let err = VinoError::UnknownDataformat {
            name: "voxels".to_string(),
            available: "'bars', 'kdtree'".to_string(),
        };
        let fields = err.log_fields();
        assert_eq!(fields[0], ("dataformat", "voxels".to_string()));
        assert!(err.to_string().contains("'bars', 'kdtree'"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: VinoError = io_err.into();
        assert!(matches!(err, VinoError::Io(_)));
        assert_eq!(err.to_string(), "IO error: file not found");
    }
}
