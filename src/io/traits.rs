// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Shared parser types.
//!
//! Every source format implements [`FormatParser`]. A parser consumes a
//! seekable text stream and yields a [`ParseOutput`]: a metadata record, a
//! numeric chunk, or both.

use std::fmt;
use std::io::{BufRead, Seek};
use std::str::FromStr;

use crate::core::{RawArray, Result};
use crate::metadata::Metadata;

/// Supported source file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    /// Pure `# key : value` metadata file
    Metadata,
    /// Legacy block format with an `Initxx` sentinel
    Psp,
    /// Plain table with a header row and no metadata
    Viabilitree,
    /// Metadata header followed by a table with a header row
    RichCsv,
}

impl SourceFormat {
    /// Order in which the sniffer tries the parsers.
    pub const SNIFF_ORDER: [SourceFormat; 4] = [
        SourceFormat::Metadata,
        SourceFormat::Psp,
        SourceFormat::Viabilitree,
        SourceFormat::RichCsv,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::Metadata => "metadata",
            SourceFormat::Psp => "psp",
            SourceFormat::Viabilitree => "viabilitree",
            SourceFormat::RichCsv => "richcsv",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a `SourceFormat` from string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSourceFormatError(String);

impl fmt::Display for ParseSourceFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid source format {:?}, expected 'metadata', 'psp', 'viabilitree', or 'richcsv'",
            self.0
        )
    }
}

impl std::error::Error for ParseSourceFormatError {}

impl FromStr for SourceFormat {
    type Err = ParseSourceFormatError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        SourceFormat::SNIFF_ORDER
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseSourceFormatError(s.to_string()))
    }
}

/// What a parser extracted from a stream.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutput {
    Metadata(Metadata),
    Data(RawArray),
    Both(Metadata, RawArray),
}

impl ParseOutput {
    pub fn metadata(&self) -> Option<&Metadata> {
        match self {
            ParseOutput::Metadata(md) | ParseOutput::Both(md, _) => Some(md),
            ParseOutput::Data(_) => None,
        }
    }

    pub fn data(&self) -> Option<&RawArray> {
        match self {
            ParseOutput::Data(data) | ParseOutput::Both(_, data) => Some(data),
            ParseOutput::Metadata(_) => None,
        }
    }

    pub fn into_parts(self) -> (Option<Metadata>, Option<RawArray>) {
        match self {
            ParseOutput::Metadata(md) => (Some(md), None),
            ParseOutput::Data(data) => (None, Some(data)),
            ParseOutput::Both(md, data) => (Some(md), Some(data)),
        }
    }
}

/// A parser for one source format.
///
/// `parse` fails with [`VinoError::WrongFormat`](crate::VinoError::WrongFormat)
/// when the stream does not have the expected structure. The stream
/// position is then unspecified; callers that want to retry rewind it.
pub trait FormatParser {
    /// Format handled by this parser.
    fn format(&self) -> SourceFormat;

    /// Parse from the current stream position.
    fn parse<R: BufRead + Seek>(&self, stream: &mut R) -> Result<ParseOutput>;
}
