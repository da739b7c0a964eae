// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Writing the regions of an iNES file to their own files.

use std::fs;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use thiserror::Error;

use crate::ines::{InesFileError, InesHeader};
use crate::layout::Layout;
use crate::mirror::shrink_mirrored;
use crate::region::{Region, RegionError};

/// Destination of the extracted regions.
#[cfg_attr(test, mockall::automock)]
pub trait RegionSink {
    /// Whether something already exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Whether `path` is an existing directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Replace whatever is at `path` with `data`.
    ///
    /// A failed write must not leave a partial file behind, nor replace any file other than
    /// `path`.
    fn write(&mut self, path: &Path, data: &[u8]) -> io::Result<()>;
}

/// [RegionSink] backed by the real file system.
#[derive(Debug, Default)]
pub struct FileSink;

impl FileSink {
    /// The sibling file the data is written to before being moved to `path`.
    fn partial_path(path: &Path) -> PathBuf {
        let mut name = path.file_name().unwrap_or_default().to_os_string();
        name.push(".part");

        path.with_file_name(name)
    }
}

impl RegionSink for FileSink {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn write(&mut self, path: &Path, data: &[u8]) -> io::Result<()> {
        let partial_path = FileSink::partial_path(path);

        // Never take over a file that was already there
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&partial_path)?;

        let written = file.write_all(data);
        drop(file);

        let result = written.and_then(|_| fs::rename(&partial_path, path));

        if result.is_err() {
            // Keep the first error
            let _ = fs::remove_file(&partial_path);
        }

        result
    }
}

/// A region to extract and where to put it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionRequest {
    /// Which region.
    pub region: Region,

    /// Output file.
    pub path: PathBuf,
}

impl RegionRequest {
    /// Create a new [RegionRequest].
    pub fn new(region: Region, path: impl Into<PathBuf>) -> RegionRequest {
        RegionRequest {
            region,
            path: path.into(),
        }
    }
}

/// Knobs of an [Extractor], all disabled by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Warn and skip absent regions instead of failing.
    pub skip_missing: bool,

    /// Refuse to replace existing output files.
    pub no_clobber: bool,

    /// Drop repeated copies of the same chunk from PRG-ROM and CHR-ROM.
    pub shrink_mirrors: bool,
}

/// A region that made it to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenRegion {
    /// Which region.
    pub region: Region,

    /// Output file.
    pub path: PathBuf,

    /// Number of bytes written.
    pub length: usize,
}

/// Summary of an extraction.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtractReport {
    /// Regions written, in request order.
    pub written: Vec<WrittenRegion>,

    /// Regions not present in the ROM and skipped.
    pub skipped: Vec<Region>,
}

#[derive(Debug, Error)]
/// Errors that may happen while extracting regions.
pub enum ExtractError {
    #[error("Nothing to do, no output file was requested")]
    /// No [RegionRequest] was given.
    NothingToDo,

    #[error("File already exists: {}", .0.display())]
    /// An output file exists and overwriting is disabled.
    OutputExists(PathBuf),

    #[error("Directory does not exist: {}", .0.display())]
    /// The directory of an output file is missing.
    MissingDirectory(PathBuf),

    #[error("Invalid iNES file: {0}")]
    /// The input is not a well formed iNES file.
    Format(#[from] InesFileError),

    #[error("Cannot extract region: {0}")]
    /// A requested region cannot be extracted.
    Region(#[from] RegionError),

    #[error("File read/write error on {}: {source}", .path.display())]
    /// Reading the input or writing an output failed.
    Io {
        /// The offending file.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
}

/// Splits iNES files into the requested regions.
pub struct Extractor {
    /// Where the regions end up.
    sink: Box<dyn RegionSink>,

    /// Behaviour knobs.
    options: ExtractOptions,
}

impl Extractor {
    /// Create a new [Extractor] writing to `sink`.
    pub fn new(sink: Box<dyn RegionSink>, options: ExtractOptions) -> Extractor {
        Extractor { sink, options }
    }

    /// Create a new [Extractor] writing to the file system.
    pub fn with_file_sink(options: ExtractOptions) -> Extractor {
        Extractor::new(Box::new(FileSink), options)
    }

    /// Read the iNES file at `input` and write every requested region.
    pub fn run(
        &mut self,
        input: &Path,
        requests: &[RegionRequest],
    ) -> Result<ExtractReport, ExtractError> {
        self.check_outputs(requests)?;

        debug!("Reading {}", input.display());

        let rom = fs::read(input).map_err(|source| ExtractError::Io {
            path: input.to_path_buf(),
            source,
        })?;

        self.extract_checked(&rom, requests)
    }

    /// Write every requested region of the already loaded `rom`.
    ///
    /// Every region is located before anything is written, so a missing region leaves no new
    /// files behind. Files written before an I/O failure are kept.
    pub fn extract(
        &mut self,
        rom: &[u8],
        requests: &[RegionRequest],
    ) -> Result<ExtractReport, ExtractError> {
        self.check_outputs(requests)?;
        self.extract_checked(rom, requests)
    }

    /// [Extractor::extract] once the output paths are known to be fine.
    fn extract_checked(
        &mut self,
        rom: &[u8],
        requests: &[RegionRequest],
    ) -> Result<ExtractReport, ExtractError> {
        let header = InesHeader::parse(rom)?;
        let layout = Layout::compute(&header, rom.len())?;

        let mut report = ExtractReport::default();
        let mut pending = Vec::with_capacity(requests.len());

        for request in requests {
            match layout.slice(request.region, rom) {
                Ok(data) if self.options.shrink_mirrors && request.region.is_rom() => {
                    pending.push((request, shrink_mirrored(data)))
                }
                Ok(data) => pending.push((request, data)),
                Err(RegionError::Unavailable(region)) if self.options.skip_missing => {
                    warn!("No {region} in the ROM, skipping {}", request.path.display());
                    report.skipped.push(region);
                }
                Err(err) => return Err(err.into()),
            }
        }

        for (request, data) in pending {
            self.sink
                .write(&request.path, data)
                .map_err(|source| ExtractError::Io {
                    path: request.path.clone(),
                    source,
                })?;

            info!(
                "Wrote {} bytes of {} to {}",
                data.len(),
                request.region,
                request.path.display()
            );

            report.written.push(WrittenRegion {
                region: request.region,
                path: request.path.clone(),
                length: data.len(),
            });
        }

        Ok(report)
    }

    /// Make sure the output files can be created before touching the input.
    fn check_outputs(&self, requests: &[RegionRequest]) -> Result<(), ExtractError> {
        if requests.is_empty() {
            return Err(ExtractError::NothingToDo);
        }

        for request in requests {
            if self.options.no_clobber && self.sink.exists(&request.path) {
                return Err(ExtractError::OutputExists(request.path.clone()));
            }

            match request.path.parent() {
                Some(directory) if !directory.as_os_str().is_empty() => {
                    if !self.sink.is_dir(directory) {
                        return Err(ExtractError::MissingDirectory(directory.to_path_buf()));
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }
}
