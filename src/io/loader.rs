// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Loading kernels from one or more source files.
//!
//! Every input is sniffed independently. Data chunks are concatenated in
//! input order and metadata chunks are merged, later values winning. The
//! merged `dataformat.name` picks the kernel representation.
//!
//! # Example
//!
//! ```rust,no_run
//! use vino::io::Loader;
//!
//! // kernel.dat is a Viabilitree table, kernel.txt its metadata
//! let kernel = Loader::new()
//!     .with_companions(true)
//!     .load(&["kernel.dat"])?;
//! println!("{}-D {}", kernel.dimension(), kernel.dataformat());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, Seek};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::detection::sniff;
use super::traits::ParseOutput;
use crate::config::{ConvertOptions, DEFAULT_COMPANION_EXTENSION};
use crate::core::{RawArray, Result, VinoError};
use crate::kernel::Kernel;
use crate::metadata::Metadata;

/// Configurable kernel loader.
#[derive(Debug, Clone)]
pub struct Loader {
    companions: bool,
    companion_extension: String,
}

impl Default for Loader {
    fn default() -> Self {
        Self {
            companions: false,
            companion_extension: DEFAULT_COMPANION_EXTENSION.to_string(),
        }
    }
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader configured from conversion options.
    pub fn from_options(options: &ConvertOptions) -> Self {
        Self {
            companions: options.companions,
            companion_extension: options.companion_extension.clone(),
        }
    }

    /// Also load the companion metadata file of every input.
    ///
    /// The companion of `foo.dat` is `foo.txt`; it is loaded just before
    /// its data file when it exists and is not listed already.
    pub fn with_companions(mut self, companions: bool) -> Self {
        self.companions = companions;
        self
    }

    pub fn with_companion_extension(mut self, extension: impl Into<String>) -> Self {
        self.companion_extension = extension.into();
        self
    }

    /// Files that [`load`](Self::load) reads for `paths`, in order.
    pub fn sources<P: AsRef<Path>>(&self, paths: &[P]) -> Vec<PathBuf> {
        let listed: Vec<&Path> = paths.iter().map(AsRef::as_ref).collect();
        let mut sources = Vec::with_capacity(listed.len());
        for path in &listed {
            if self.companions {
                let companion = path.with_extension(&self.companion_extension);
                if companion != *path
                    && companion.is_file()
                    && !listed.contains(&companion.as_path())
                    && !sources.contains(&companion)
                {
                    debug!(companion = %companion.display(), "adding companion metadata");
                    sources.push(companion);
                }
            }
            sources.push(path.to_path_buf());
        }
        sources
    }

    /// Load a kernel from files.
    pub fn load<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Kernel> {
        let mut outputs = Vec::new();
        for path in self.sources(paths) {
            let mut reader = BufReader::new(File::open(&path)?);
            let (format, output) = sniff(&mut reader)?;
            debug!(path = %path.display(), format = format.as_str(), "loaded source");
            outputs.push(output);
        }
        assemble(outputs)
    }

    /// Load a kernel from already opened streams.
    pub fn load_streams<R, I>(&self, streams: I) -> Result<Kernel>
    where
        R: BufRead + Seek,
        I: IntoIterator<Item = R>,
    {
        let mut outputs = Vec::new();
        for (index, mut stream) in streams.into_iter().enumerate() {
            let (format, output) = sniff(&mut stream)?;
            debug!(index, format = format.as_str(), "loaded stream");
            outputs.push(output);
        }
        assemble(outputs)
    }
}

/// Combine parsed chunks into a kernel.
fn assemble(outputs: Vec<ParseOutput>) -> Result<Kernel> {
    let mut data: Vec<RawArray> = Vec::new();
    let mut metadata: Vec<Metadata> = Vec::new();
    for output in outputs {
        let (md, chunk) = output.into_parts();
        data.extend(chunk);
        metadata.extend(md);
    }

    let data = RawArray::concat(data)?;
    if metadata.is_empty() {
        return Err(VinoError::NoMetadata);
    }
    let metadata = Metadata::merged(&metadata);
    debug!(rows = data.nrows(), columns = data.ncols(), fields = metadata.len(), "assembled kernel");
    Kernel::from_raw(&data, metadata)
}

/// Load a kernel from files with the default loader.
pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Kernel> {
    Loader::new().load(paths)
}

/// Load a kernel from streams with the default loader.
pub fn load_streams<R, I>(streams: I) -> Result<Kernel>
where
    R: BufRead + Seek,
    I: IntoIterator<Item = R>,
{
    Loader::new().load_streams(streams)
}
