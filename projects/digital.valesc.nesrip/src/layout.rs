// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Location of every region inside an iNES file.

use log::{debug, trace};

use crate::ines::{InesFileError, InesHeader};
use crate::region::{Region, RegionError};
use crate::{CHR_BANK_SIZE, HEADER_SIZE, PRG_BANK_SIZE, TRAINER_SIZE};

/// Offsets and lengths of the regions of one iNES file, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Always [HEADER_SIZE].
    pub header_length: usize,

    /// Whether a trainer follows the header.
    pub trainer_present: bool,

    /// Start of the trainer, only set when present.
    pub trainer_offset: Option<usize>,

    /// [TRAINER_SIZE] when present, zero otherwise.
    pub trainer_length: usize,

    /// Start of the PRG-ROM.
    pub prg_offset: usize,

    /// Length of the PRG-ROM.
    pub prg_length: usize,

    /// Start of the CHR-ROM, right after the PRG-ROM.
    pub chr_offset: usize,

    /// Length of the CHR-ROM, zero when absent.
    pub chr_length: usize,
}

impl Layout {
    /// Compute the layout declared by `header` and check it against the real file length.
    ///
    /// The file must be exactly as long as the header says, a shorter file is reported as
    /// [InesFileError::Truncated] and a longer one as [InesFileError::TrailingData].
    pub fn compute(header: &InesHeader, total_file_length: usize) -> Result<Layout, InesFileError> {
        let layout = Layout::from_header(header);
        let expected = layout.declared_length();

        debug!("Declared iNES file length: {expected}, real length: {total_file_length}");

        if total_file_length < expected {
            return Err(InesFileError::Truncated {
                actual: total_file_length,
                expected,
                trainer: layout.trainer_length,
                prg: layout.prg_length,
                chr: layout.chr_length,
            });
        }

        if total_file_length > expected {
            return Err(InesFileError::TrailingData {
                actual: total_file_length,
                expected,
                trainer: layout.trainer_length,
                prg: layout.prg_length,
                chr: layout.chr_length,
            });
        }

        Ok(layout)
    }

    /// The layout the header declares, without looking at the file length.
    fn from_header(header: &InesHeader) -> Layout {
        let trainer_present = header.has_trainer();
        let trainer_length = if trainer_present { TRAINER_SIZE } else { 0 };

        let prg_offset = HEADER_SIZE + trainer_length;
        let prg_length = header.prg_rom_banks as usize * PRG_BANK_SIZE;

        Layout {
            header_length: HEADER_SIZE,
            trainer_present,
            trainer_offset: trainer_present.then_some(HEADER_SIZE),
            trainer_length,
            prg_offset,
            prg_length,
            chr_offset: prg_offset + prg_length,
            chr_length: header.chr_rom_banks as usize * CHR_BANK_SIZE,
        }
    }

    /// The total file length the header declares.
    pub fn declared_length(&self) -> usize {
        self.header_length + self.trainer_length + self.prg_length + self.chr_length
    }

    /// Offset and length of a region, `None` for an absent trainer.
    pub fn span(&self, region: Region) -> Option<(usize, usize)> {
        match region {
            Region::Header => Some((0, self.header_length)),
            Region::Trainer => self
                .trainer_offset
                .map(|offset| (offset, self.trainer_length)),
            Region::Prg => Some((self.prg_offset, self.prg_length)),
            Region::Chr => Some((self.chr_offset, self.chr_length)),
        }
    }

    /// Take the bytes of `region` out of the whole file.
    ///
    /// Asking for a region of length zero is an error, an absent region never turns into an empty
    /// output.
    pub fn slice<'a>(&self, region: Region, file_bytes: &'a [u8]) -> Result<&'a [u8], RegionError> {
        let (offset, length) = match self.span(region) {
            Some((_, 0)) | None => return Err(RegionError::Unavailable(region)),
            Some(span) => span,
        };

        let end = offset + length;

        trace!("Slicing {region} at [{offset:#X}, {end:#X})");

        file_bytes
            .get(offset..end)
            .ok_or(RegionError::OutOfBounds {
                region,
                end,
                available: file_bytes.len(),
            })
    }
}
