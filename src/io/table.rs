// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Whitespace-delimited numeric tables.

use std::fmt::Display;
use std::io::{BufRead, Seek};
use std::str::FromStr;

use ndarray::Array2;

use super::scan::LineCursor;
use crate::core::{Result, VinoError};

/// A parsed table body.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<T> {
    /// Column labels, when the table has a header row
    pub header: Option<Vec<String>>,
    pub data: Array2<T>,
}

/// Read the rest of the cursor as a table.
///
/// Blank lines are skipped. With `header`, the first non-blank line gives
/// the column labels and the table width. Otherwise the width comes from
/// `width`, or from the first row. Every row must have exactly that many
/// tokens and every token must parse as `T`.
pub fn read_table<R, T>(
    cursor: &mut LineCursor<'_, R>,
    header: bool,
    width: Option<usize>,
) -> Result<Table<T>>
where
    R: BufRead + Seek,
    T: FromStr + Clone,
    T::Err: Display,
{
    let mut labels = None;
    let mut width = width;

    if header {
        match cursor.next_content_line()? {
            Some(line) => {
                let names: Vec<String> = line.text.split_whitespace().map(String::from).collect();
                width = Some(names.len());
                labels = Some(names);
            }
            None => return Err(VinoError::malformed("no columns to parse from stream")),
        }
    }

    let mut values: Vec<T> = Vec::new();
    let mut nrows = 0;

    while let Some(line) = cursor.next_content_line()? {
        let tokens: Vec<&str> = line.text.split_whitespace().collect();
        let expected = *width.get_or_insert(tokens.len());
        if tokens.len() != expected {
            return Err(VinoError::malformed_at(
                line.number,
                format!("expected {expected} fields, saw {}", tokens.len()),
            ));
        }
        for token in tokens {
            let value = token.parse::<T>().map_err(|e| {
                VinoError::malformed_at(line.number, format!("invalid number {token:?}: {e}"))
            })?;
            values.push(value);
        }
        nrows += 1;
    }

    let ncols = width.unwrap_or(0);
    let data = Array2::from_shape_vec((nrows, ncols), values)
        .map_err(|e| VinoError::malformed(e.to_string()))?;

    Ok(Table {
        header: labels,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::io::Cursor;

    fn table<T>(text: &str, header: bool, width: Option<usize>) -> Result<Table<T>>
    where
        T: FromStr + Clone,
        T::Err: Display,
    {
        let mut stream = Cursor::new(text.as_bytes().to_vec());
        let mut cursor = LineCursor::new(&mut stream)?;
        read_table(&mut cursor, header, width)
    }

    #[test]
    fn test_header_and_floats() {
        let t = table::<f64>("x1  x2\n\n0 1.5\n-2 3e2\n", true, None).unwrap();
        assert_eq!(t.header.unwrap(), ["x1", "x2"]);
        assert_eq!(t.data, array![[0.0, 1.5], [-2.0, 300.0]]);
    }

    #[test]
    fn test_headerless_integers() {
        let t = table::<i64>("0 0 0 1\n1 1 2 2\n", false, None).unwrap();
        assert!(t.header.is_none());
        assert_eq!(t.data, array![[0, 0, 0, 1], [1, 1, 2, 2]]);
    }

    #[test]
    fn test_header_only() {
        let t = table::<f64>("a b c\n", true, None).unwrap();
        assert_eq!(t.data.dim(), (0, 3));
    }

    #[test]
    fn test_ragged_row_reports_line() {
        let err = table::<f64>("a b\n1 2\n3\n", true, None).unwrap_err();
        match err {
            VinoError::MalformedInput { line, .. } => assert_eq!(line, Some(3)),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_declared_width() {
        let err = table::<i64>("1 2 3\n", false, Some(2)).unwrap_err();
        assert!(matches!(err, VinoError::MalformedInput { line: Some(1), .. }));
    }

    #[test]
    fn test_bad_token() {
        let err = table::<i64>("1 x\n", false, None).unwrap_err();
        assert!(err.to_string().contains("invalid number \"x\""));
    }

    #[test]
    fn test_empty_stream() {
        assert!(table::<f64>("", true, None).is_err());
        assert_eq!(table::<f64>("", false, None).unwrap().data.dim(), (0, 0));
    }
}
