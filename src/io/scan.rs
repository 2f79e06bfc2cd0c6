// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Line-oriented scanning shared by the text parsers.
//!
//! [`LineCursor`] reads a seekable stream one line at a time while keeping
//! track of 1-based line numbers and byte offsets, so a parser can put a
//! line back after peeking at it. [`scan_metadata`] consumes the
//! `# key : value` header that most formats start with.

use std::io::{BufRead, Seek, SeekFrom};
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::core::{Result, VinoError};
use crate::metadata::{schema, Metadata};

/// A decoded line with its position in the source stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Line content without the trailing newline
    pub text: String,
    /// 1-based line number
    pub number: usize,
    /// Byte offset of the first character of the line
    pub offset: u64,
}

impl Line {
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn is_comment(&self) -> bool {
        self.text.starts_with("//")
    }
}

/// Line reader over a seekable text stream.
pub struct LineCursor<'a, R> {
    stream: &'a mut R,
    lineno: usize,
    offset: u64,
    buf: Vec<u8>,
}

impl<'a, R: BufRead + Seek> LineCursor<'a, R> {
    /// Start reading at the current stream position.
    pub fn new(stream: &'a mut R) -> Result<Self> {
        let offset = stream.stream_position()?;
        Ok(Self {
            stream,
            lineno: 0,
            offset,
            buf: Vec::new(),
        })
    }

    /// Number of lines consumed so far.
    pub fn lineno(&self) -> usize {
        self.lineno
    }

    /// Read the next line, or `None` at end of stream.
    pub fn next_line(&mut self) -> Result<Option<Line>> {
        self.buf.clear();
        let n = self.stream.read_until(b'\n', &mut self.buf)?;
        if n == 0 {
            return Ok(None);
        }

        let offset = self.offset;
        self.offset += n as u64;
        self.lineno += 1;

        let mut text = String::from_utf8(std::mem::take(&mut self.buf)).map_err(|_| {
            VinoError::malformed_at(
                self.lineno,
                "input stream seems to be binary and cannot be read as text",
            )
        })?;
        while text.ends_with('\n') || text.ends_with('\r') {
            text.pop();
        }

        Ok(Some(Line {
            text,
            number: self.lineno,
            offset,
        }))
    }

    /// Read the next non-blank line.
    pub fn next_content_line(&mut self) -> Result<Option<Line>> {
        while let Some(line) = self.next_line()? {
            if !line.is_blank() {
                return Ok(Some(line));
            }
        }
        Ok(None)
    }

    /// Put a line back: the stream is repositioned at its first byte.
    pub fn unread(&mut self, line: &Line) -> Result<()> {
        self.stream.seek(SeekFrom::Start(line.offset))?;
        self.offset = line.offset;
        self.lineno = line.number - 1;
        Ok(())
    }
}

fn metadata_line() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^#\s*([^:]+?)\s*:\s*(.*?)\s*$").expect("valid metadata line pattern")
    })
}

/// Split a `# key : value` line into key and value.
pub fn parse_metadatum(line: &str) -> Option<(&str, &str)> {
    let caps = metadata_line().captures(line)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// Result of a metadata header scan.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataScan {
    pub metadata: Metadata,
    /// Whether the scan consumed the whole stream
    pub at_eof: bool,
}

/// Consume metadata lines from the cursor.
///
/// Blank lines and `//` comments are skipped. Keys outside the schema are
/// ignored; values of known keys are parsed with the schema and a parse
/// failure is fatal. The first line that is not a metadata line ends the
/// scan and is put back.
pub fn scan_metadata<R: BufRead + Seek>(cursor: &mut LineCursor<'_, R>) -> Result<MetadataScan> {
    let mut metadata = Metadata::new();

    while let Some(line) = cursor.next_line()? {
        if line.is_blank() || line.is_comment() {
            continue;
        }

        let Some((key, value)) = parse_metadatum(&line.text) else {
            cursor.unread(&line)?;
            return Ok(MetadataScan {
                metadata,
                at_eof: false,
            });
        };

        if schema::is_defined(key) {
            metadata.insert_parsed(key, value)?;
        } else {
            debug!(key, line = line.number, "skipping undefined metadata field");
        }
    }

    Ok(MetadataScan {
        metadata,
        at_eof: true,
    })
}
