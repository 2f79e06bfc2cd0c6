// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Rich CSV files: metadata header plus a space-delimited float table.

use std::io::{BufRead, Seek};

use crate::core::{RawArray, Result};
use crate::io::scan::{scan_metadata, LineCursor};
use crate::io::table::read_table;
use crate::io::traits::{FormatParser, ParseOutput, SourceFormat};
use crate::metadata::schema::DATAFORMAT_COLUMNS;

/// Parser for a metadata header followed by a labelled table.
#[derive(Debug, Clone, Copy, Default)]
pub struct RichCsvFormat;

impl FormatParser for RichCsvFormat {
    fn format(&self) -> SourceFormat {
        SourceFormat::RichCsv
    }

    fn parse<R: BufRead + Seek>(&self, stream: &mut R) -> Result<ParseOutput> {
        let mut cursor = LineCursor::new(stream)?;
        let mut metadata = scan_metadata(&mut cursor)?.metadata;
        let table = read_table::<_, f64>(&mut cursor, true, None)?;

        if let Some(header) = table.header {
            if !metadata.contains_key(DATAFORMAT_COLUMNS) {
                metadata.insert(DATAFORMAT_COLUMNS, header);
            }
        }

        Ok(ParseOutput::Both(metadata, RawArray::Float(table.data)))
    }
}
