// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Legacy block files.
//!
//! Layout: an optional metadata header, a line holding exactly `Initxx`,
//! then whitespace-delimited integer rows without a header row. Columns
//! are labelled by `ColumnDescription`; those labelled `empty` are dropped.

use std::io::{BufRead, Seek};

use tracing::debug;

use crate::core::{RawArray, Result, VinoError};
use crate::io::scan::{scan_metadata, LineCursor};
use crate::io::table::read_table;
use crate::io::traits::{FormatParser, ParseOutput, SourceFormat};
use crate::metadata::schema::{COLUMN_DESCRIPTION, DATAFORMAT_NAME};

/// Sentinel line separating the header from the data block.
pub const PSP_HEADER: &str = "Initxx";

/// Label of a column to drop.
pub const EMPTY_COLUMN: &str = "empty";

/// Parser for the legacy block format.
#[derive(Debug, Clone, Copy, Default)]
pub struct PspFormat;

impl FormatParser for PspFormat {
    fn format(&self) -> SourceFormat {
        SourceFormat::Psp
    }

    fn parse<R: BufRead + Seek>(&self, stream: &mut R) -> Result<ParseOutput> {
        let mut cursor = LineCursor::new(stream)?;
        let mut metadata = scan_metadata(&mut cursor)?.metadata;

        match cursor.next_line()? {
            Some(line) if line.text.trim() == PSP_HEADER => {}
            _ => {
                return Err(VinoError::wrong_format(
                    SourceFormat::Psp.as_str(),
                    "Couldn't find PSP header",
                ))
            }
        }

        let columns = metadata.string_list(COLUMN_DESCRIPTION).map(<[String]>::to_vec);
        let table = read_table::<_, i64>(&mut cursor, false, columns.as_ref().map(Vec::len))?;
        let mut data = RawArray::Integer(table.data);

        if let Some(columns) = columns {
            let keep: Vec<usize> = columns
                .iter()
                .enumerate()
                .filter(|(_, label)| label.as_str() != EMPTY_COLUMN)
                .map(|(i, _)| i)
                .collect();
            if keep.len() != columns.len() {
                debug!(
                    dropped = columns.len() - keep.len(),
                    "dropping empty columns"
                );
                data = data.select_columns(&keep)?;
            }
        }

        if !metadata.contains_key(DATAFORMAT_NAME) {
            metadata.insert(DATAFORMAT_NAME, "bars");
        }

        Ok(ParseOutput::Both(metadata, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::io::Cursor;

    const LEGACY: &str = "\
#ColumnDescription: empty,x1,x2,x1,x1
#PointSize: 1
Initxx
9 0 0 0 1
9 1 1 2 2
";

    #[test]
    fn test_parse_drops_empty_columns() {
        let out = PspFormat.parse(&mut Cursor::new(LEGACY)).unwrap();
        let (md, data) = out.into_parts();
        let md = md.unwrap();
        assert_eq!(md.string(DATAFORMAT_NAME), Some("bars"));
        assert_eq!(
            data.unwrap(),
            RawArray::Integer(array![[0, 0, 0, 1], [1, 1, 2, 2]])
        );
    }

    #[test]
    fn test_missing_sentinel_is_wrong_format() {
        let err = PspFormat
            .parse(&mut Cursor::new("#PointSize: 1\n0 0 0 1\n"))
            .unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_column_count_mismatch() {
        let text = "#ColumnDescription: x1,x1\nInitxx\n0 1\n0 1 2\n";
        let err = PspFormat.parse(&mut Cursor::new(text)).unwrap_err();
        assert!(matches!(
            err,
            VinoError::MalformedInput { line: Some(4), .. }
        ));
    }

    #[test]
    fn test_without_column_description_keeps_all_columns() {
        let out = PspFormat
            .parse(&mut Cursor::new("Initxx\n1 2 3\n"))
            .unwrap();
        assert_eq!(out.data().unwrap().ncols(), 3);
    }
}
