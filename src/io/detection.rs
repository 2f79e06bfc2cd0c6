// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Source format detection by trial parsing.
//!
//! Text formats carry no magic numbers, so detection runs the parsers in a
//! fixed priority order against the same stream position:
//!
//! 1. **Metadata**: the whole stream is `# key : value` lines
//! 2. **PSP**: metadata header followed by the `Initxx` sentinel
//! 3. **Viabilitree**: plain table without metadata
//! 4. **RichCSV**: metadata header followed by a table
//!
//! A parser that reports a wrong format is not fatal: the stream is
//! rewound to where it was on entry and the next parser is tried.
//!
//! # Example
//!
//! ```rust,no_run
//! use vino::io::detection::detect_format;
//! use vino::io::SourceFormat;
//!
//! let format = detect_format("kernel.dat")?;
//! assert_eq!(format, SourceFormat::Psp);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

use tracing::debug;

use super::formats::{MetadataFormat, PspFormat, RichCsvFormat, ViabilitreeFormat};
use super::traits::{FormatParser, ParseOutput, SourceFormat};
use crate::core::{Result, VinoError};

impl SourceFormat {
    /// Run the parser for this format.
    pub fn parse<R: BufRead + Seek>(&self, stream: &mut R) -> Result<ParseOutput> {
        match self {
            SourceFormat::Metadata => MetadataFormat.parse(stream),
            SourceFormat::Psp => PspFormat.parse(stream),
            SourceFormat::Viabilitree => ViabilitreeFormat.parse(stream),
            SourceFormat::RichCsv => RichCsvFormat.parse(stream),
        }
    }
}

/// Detect the format of a stream and parse it.
///
/// Returns the first successful parse. Fatal errors propagate at once;
/// if every parser rejects the stream, the last rejection is returned.
pub fn sniff<R: BufRead + Seek>(stream: &mut R) -> Result<(SourceFormat, ParseOutput)> {
    let start = stream.stream_position()?;
    let mut last_error = None;

    for format in SourceFormat::SNIFF_ORDER {
        match format.parse(stream) {
            Ok(output) => {
                debug!(format = format.as_str(), "source format recognized");
                return Ok((format, output));
            }
            Err(err) if err.is_recoverable() => {
                debug!(format = format.as_str(), error = %err, "rewinding after format mismatch");
                stream.seek(SeekFrom::Start(start))?;
                last_error = Some(err);
            }
            Err(err) => return Err(err),
        }
    }

    Err(last_error.unwrap_or_else(|| VinoError::wrong_format("any", "no parser available")))
}

/// Parse a stream in whatever format it turns out to be.
pub fn sourcefile_parse<R: BufRead + Seek>(stream: &mut R) -> Result<ParseOutput> {
    sniff(stream).map(|(_, output)| output)
}

/// Detect the format of a file.
pub fn detect_format<P: AsRef<Path>>(path: P) -> Result<SourceFormat> {
    let mut reader = BufReader::new(File::open(path)?);
    sniff(&mut reader).map(|(format, _)| format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::schema::DATAFORMAT_NAME;
    use std::io::{Cursor, Write};

    fn create_temp_file(name: &str, data: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "vino_test_detect_{}_{}.txt",
            std::process::id(),
            name
        ));
        let mut file = File::create(&path).unwrap();
        file.write_all(data.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_pure_metadata_is_never_a_table() {
        let (format, out) = sniff(&mut Cursor::new("#results.title: t\n#PointSize: 1\n")).unwrap();
        assert_eq!(format, SourceFormat::Metadata);
        assert!(matches!(out, ParseOutput::Metadata(_)));
    }

    #[test]
    fn test_sniff_order() {
        let cases = [
            ("#PointSize: 1\nInitxx\n0 1\n", SourceFormat::Psp),
            ("x y\n0 1\n", SourceFormat::Viabilitree),
            ("#PointSize: 1\nx y\n0 1\n", SourceFormat::RichCsv),
        ];
        for (text, expected) in cases {
            let (format, _) = sniff(&mut Cursor::new(text)).unwrap();
            assert_eq!(format, expected, "{text:?}");
        }
    }

    #[test]
    fn test_comment_led_header_is_richcsv() {
        let text = "// exported kernel\n#dataformat.name: polygon\nx1 x2\n0 0\n1 0\n0 1\n";
        let (format, out) = sniff(&mut Cursor::new(text)).unwrap();
        assert_eq!(format, SourceFormat::RichCsv);
        assert_eq!(
            out.metadata().unwrap().string(DATAFORMAT_NAME),
            Some("polygon")
        );
        assert_eq!(out.data().unwrap().nrows(), 3);
    }

    #[test]
    fn test_comment_led_table_is_viabilitree() {
        let (format, out) = sniff(&mut Cursor::new("// c\nx y\n0 1\n")).unwrap();
        assert_eq!(format, SourceFormat::Viabilitree);
        assert_eq!(out.data().unwrap().ncols(), 2);
    }

    #[test]
    fn test_rewinds_to_entry_position() {
        let mut stream = Cursor::new("garbage line\n#PointSize: 1\nx y\n0 1\n");
        let mut skipped = String::new();
        stream.read_line(&mut skipped).unwrap();
        let (format, out) = sniff(&mut stream).unwrap();
        assert_eq!(format, SourceFormat::RichCsv);
        assert_eq!(out.metadata().unwrap().integer("PointSize"), Some(1));
    }

    #[test]
    fn test_fatal_error_stops_sniffing() {
        let err = sniff(&mut Cursor::new("#PointSize: x\n")).unwrap_err();
        assert!(matches!(err, VinoError::FieldParse { .. }));
    }

    #[test]
    fn test_binary_stream() {
        let mut stream = Cursor::new(vec![b'#', 0xff, 0xfe, b'\n']);
        let err = sourcefile_parse(&mut stream).unwrap_err();
        assert!(matches!(err, VinoError::MalformedInput { .. }));
    }

    #[test]
    fn test_detect_format_from_file() {
        let path = create_temp_file("psp", "#ColumnDescription: x1,x1\nInitxx\n0 1\n");
        assert_eq!(detect_format(&path).unwrap(), SourceFormat::Psp);
        let _ = std::fs::remove_file(&path);
    }
}
