// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! RichCSV output.
//!
//! The written text is a metadata header (`#key: value` lines, in record
//! order), a header row of column labels, then one space-separated row per
//! raw record. Loading it back yields an equal kernel.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use ndarray::Array2;
use tracing::debug;

use crate::core::{RawArray, Result};
use crate::kernel::Kernel;

fn write_rows<W: Write, T: std::fmt::Display>(target: &mut W, rows: &Array2<T>) -> Result<()> {
    for row in rows.rows() {
        let mut first = true;
        for value in row {
            if !first {
                target.write_all(b" ")?;
            }
            write!(target, "{value}")?;
            first = false;
        }
        target.write_all(b"\n")?;
    }
    Ok(())
}

/// Write a kernel as RichCSV.
pub fn save_csv<W: Write>(mut target: W, kernel: &Kernel) -> Result<()> {
    let metadata = kernel.metadata();
    for key in metadata.keys() {
        writeln!(target, "#{key}: {}", metadata.get_unparsed(key)?)?;
    }
    writeln!(target, "{}", kernel.columns().join(" "))?;

    match kernel.to_raw() {
        RawArray::Integer(rows) => write_rows(&mut target, &rows)?,
        RawArray::Float(rows) => write_rows(&mut target, &rows)?,
    }
    target.flush()?;
    debug!(format = %kernel.dataformat(), rows = kernel.len(), "wrote RichCSV");
    Ok(())
}

/// Write a kernel as RichCSV to a file.
pub fn save_csv_path<P: AsRef<Path>>(path: P, kernel: &Kernel) -> Result<()> {
    save_csv(BufWriter::new(File::create(path)?), kernel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::loader::load_streams;
    use crate::metadata::Metadata;
    use std::io::Cursor;

    fn written(kernel: &Kernel) -> String {
        let mut out = Vec::new();
        save_csv(&mut out, kernel).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_layout() {
        let data = RawArray::Float(ndarray::array![[0.0, 0.5], [1.0, 0.0], [0.0, 1.0]]);
        let kernel = Kernel::from_raw(&data, Metadata::new().with("dataformat.name", "polygon")).unwrap();
        let text = written(&kernel);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "#dataformat.name: polygon",
                "#dataformat.columns: x1,x2",
                "x1 x2",
                "0 0.5",
                "1 0",
                "0 1",
            ]
        );
    }

    #[test]
    fn test_reload() {
        let data = RawArray::Float(ndarray::array![[0.25, 0.5], [1.0, 0.0], [0.0, 1.0e-3]]);
        let kernel = Kernel::from_raw(&data, Metadata::new().with("dataformat.name", "polygon")).unwrap();
        let back = load_streams([Cursor::new(written(&kernel).into_bytes())]).unwrap();
        assert_eq!(back, kernel);
    }
}
