// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Pure metadata files.

use std::io::{BufRead, Seek};

use crate::core::{Result, VinoError};
use crate::io::scan::{scan_metadata, LineCursor};
use crate::io::traits::{FormatParser, ParseOutput, SourceFormat};

/// Parser for streams made only of metadata lines, comments and blanks.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataFormat;

impl FormatParser for MetadataFormat {
    fn format(&self) -> SourceFormat {
        SourceFormat::Metadata
    }

    fn parse<R: BufRead + Seek>(&self, stream: &mut R) -> Result<ParseOutput> {
        let mut cursor = LineCursor::new(stream)?;
        let scan = scan_metadata(&mut cursor)?;
        if scan.at_eof {
            return Ok(ParseOutput::Metadata(scan.metadata));
        }

        let line = cursor.next_line()?.map(|l| (l.number, l.text));
        let (number, text) = line.unwrap_or_default();
        Err(VinoError::wrong_format(
            SourceFormat::Metadata.as_str(),
            format!("Couldn't recognize metadata at line {number}: {text:?}"),
        ))
    }
}
