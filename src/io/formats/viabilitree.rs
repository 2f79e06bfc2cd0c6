// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Plain tables as written by Viabilitree.
//!
//! The first line that is neither blank nor a `//` comment is the header
//! row, everything after it is float data. Metadata for these files lives in a companion file.

use std::io::{BufRead, Seek};

use crate::core::{RawArray, Result, VinoError};
use crate::io::scan::LineCursor;
use crate::io::table::read_table;
use crate::io::traits::{FormatParser, ParseOutput, SourceFormat};

/// Parser for header-plus-table streams without metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViabilitreeFormat;

impl FormatParser for ViabilitreeFormat {
    fn format(&self) -> SourceFormat {
        SourceFormat::Viabilitree
    }

    fn parse<R: BufRead + Seek>(&self, stream: &mut R) -> Result<ParseOutput> {
        let mut cursor = LineCursor::new(stream)?;
        let mut first = cursor.next_content_line()?;
        while first.as_ref().is_some_and(|line| line.is_comment()) {
            first = cursor.next_content_line()?;
        }

        if let Some(line) = first {
            if line.text.trim_start().starts_with('#') {
                return Err(VinoError::wrong_format(
                    SourceFormat::Viabilitree.as_str(),
                    "stream has a metadata header",
                ));
            }
            cursor.unread(&line)?;
        }

        let table = read_table::<_, f64>(&mut cursor, true, None)?;
        Ok(ParseOutput::Data(RawArray::Float(table.data)))
    }
}
