// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Parsing of the 16 byte iNES header.

use bitflags::bitflags;
use log::{debug, warn};
use thiserror::Error;

use crate::HEADER_SIZE;

/// The magic bytes every iNES file starts with, `0x1A` is the `SUB` (substitute) character.
pub const INES_MAGIC_BYTES: [u8; 4] = *b"NES\x1A";

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Byte 6 of the header: mirroring, battery, trainer and the lower mapper nibble.
    pub struct Flags6: u8 {
        /// Vertical nametable arrangement.
        const Mirroring = 1 << 0;

        /// Battery backed PRG RAM is present.
        const Battery = 1 << 1;

        /// A 512 byte trainer sits between the header and the PRG-ROM.
        const Trainer = 1 << 2;

        /// Ignore the mirroring bit and provide four-screen VRAM.
        const FourScreen = 1 << 3;

        /// Lower nibble of the mapper number.
        const MapperLow = 0b1111_0000;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Byte 7 of the header. Only the upper nibble has a meaning on iNES 1.0.
    pub struct Flags7: u8 {
        /// Bits that must be zero on a well formed iNES 1.0 header.
        const Reserved = 0b0000_1111;

        /// Upper nibble of the mapper number.
        const MapperHigh = 0b1111_0000;
    }
}

/// The interpreted fields of an iNES header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InesHeader {
    /// Number of 16 KiB PRG-ROM banks.
    pub prg_rom_banks: u8,

    /// Number of 8 KiB CHR-ROM banks, zero when the board uses CHR RAM.
    pub chr_rom_banks: u8,

    /// Flags on byte 6.
    pub flags_6: Flags6,

    /// Flags on byte 7.
    pub flags_7: Flags7,

    /// Bytes 8 to 15, unused by iNES 1.0.
    pub reserved: [u8; 8],
}

#[derive(Debug, Error)]
/// Errors caused by a malformed iNES file.
pub enum InesFileError {
    #[error("The file is {length} bytes, smaller than the 16 bytes of an iNES header")]
    /// Not even the header fits in the input.
    TooShort {
        /// Available bytes.
        length: usize,
    },

    #[error("The iNES ROM is missing the magic bytes NES<SUB> at its start")]
    /// The signature at the start of the file does not match.
    MagicBytesMissing,

    #[error(
        "The file is {actual} bytes; according to the header, it should be {expected} bytes \
        (= header 16 + trainer {trainer} + PRG-ROM {prg} + CHR-ROM {chr} bytes)"
    )]
    /// The file ends before all the declared regions.
    Truncated {
        /// Real length of the file.
        actual: usize,
        /// Length declared by the header.
        expected: usize,
        /// Declared trainer length.
        trainer: usize,
        /// Declared PRG-ROM length.
        prg: usize,
        /// Declared CHR-ROM length.
        chr: usize,
    },

    #[error(
        "The file is {actual} bytes; according to the header, it should be {expected} bytes \
        (= header 16 + trainer {trainer} + PRG-ROM {prg} + CHR-ROM {chr} bytes), \
        trailing bytes are not allowed"
    )]
    /// The file holds bytes after the last declared region.
    TrailingData {
        /// Real length of the file.
        actual: usize,
        /// Length declared by the header.
        expected: usize,
        /// Declared trainer length.
        trainer: usize,
        /// Declared PRG-ROM length.
        prg: usize,
        /// Declared CHR-ROM length.
        chr: usize,
    },
}

impl InesHeader {
    /// Parse the header from the start of `bytes`, anything past the 16th byte is ignored.
    pub fn parse(bytes: &[u8]) -> Result<InesHeader, InesFileError> {
        debug!("Parsing iNES header");

        if bytes.len() < HEADER_SIZE {
            return Err(InesFileError::TooShort {
                length: bytes.len(),
            });
        }

        if bytes[..4] != INES_MAGIC_BYTES {
            return Err(InesFileError::MagicBytesMissing);
        }

        debug!("iNES magic characters are present");

        let mut reserved = [0; 8];
        reserved.copy_from_slice(&bytes[8..HEADER_SIZE]);

        let header = InesHeader {
            prg_rom_banks: bytes[4],
            chr_rom_banks: bytes[5],
            flags_6: Flags6::from_bits_retain(bytes[6]),
            flags_7: Flags7::from_bits_retain(bytes[7]),
            reserved,
        };

        debug!(
            "PRG ROM banks: {}, CHR ROM banks: {}, trainer: {}",
            header.prg_rom_banks,
            header.chr_rom_banks,
            header.has_trainer()
        );

        if header.has_reserved_bits_set() {
            warn!("Reserved iNES header bits are nonzero");
        }

        Ok(header)
    }

    /// Whether the 512 byte trainer is present.
    pub fn has_trainer(&self) -> bool {
        self.flags_6.contains(Flags6::Trainer)
    }

    /// Whether any bit iNES 1.0 leaves unused is set.
    ///
    /// Dumps touched by old tools often carry junk here (the "DiskDude!" signature is the classic
    /// one), so this is only a hint, never an error.
    pub fn has_reserved_bits_set(&self) -> bool {
        self.flags_7.intersects(Flags7::Reserved) || self.reserved.iter().any(|&byte| byte != 0)
    }
}
