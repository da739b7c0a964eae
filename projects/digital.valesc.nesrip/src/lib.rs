// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Split iNES ROM files into their header, trainer, PRG-ROM and CHR-ROM regions.
//!
//! The flow is always the same:
//! 1. [ines::InesHeader::parse] reads and validates the first 16 bytes.
//! 2. [layout::Layout::compute] derives where every region lives inside the file.
//! 3. [layout::Layout::slice] hands out the bytes of a single [region::Region].
//!
//! [extract::Extractor] glues those steps to the file system.

pub mod extract;
pub mod ines;
pub mod layout;
pub mod mirror;
pub mod region;

/// The number of bytes in a kibibyte (1 KiB).
pub const BYTES_ON_A_KIBIBYTE: usize = 1024;

/// Size of the fixed iNES header.
pub const HEADER_SIZE: usize = 16;

/// Size of the trainer block, when present.
pub const TRAINER_SIZE: usize = 512;

/// Size of a single PRG-ROM bank.
pub const PRG_BANK_SIZE: usize = 16 * BYTES_ON_A_KIBIBYTE;

/// Size of a single CHR-ROM bank.
pub const CHR_BANK_SIZE: usize = 8 * BYTES_ON_A_KIBIBYTE;

#[cfg(test)]
pub(crate) mod tests {
    use crate::{CHR_BANK_SIZE, HEADER_SIZE, PRG_BANK_SIZE, TRAINER_SIZE};

    /// Build a minimal header with the given bank counts and flags 6 byte.
    pub(crate) fn build_header(prg_banks: u8, chr_banks: u8, flags_6: u8) -> [u8; HEADER_SIZE] {
        let mut header = [0; HEADER_SIZE];
        header[..4].copy_from_slice(b"NES\x1A");
        header[4] = prg_banks;
        header[5] = chr_banks;
        header[6] = flags_6;

        header
    }

    /// Build a whole ROM image where every region is filled with a distinct byte.
    ///
    /// The trainer is filled with `0x77`, PRG-ROM with `0xAA` and CHR-ROM with `0xCC`.
    pub(crate) fn build_rom(prg_banks: u8, chr_banks: u8, flags_6: u8) -> Vec<u8> {
        let mut rom = build_header(prg_banks, chr_banks, flags_6).to_vec();

        if flags_6 & 0b0000_0100 != 0 {
            rom.extend(std::iter::repeat(0x77).take(TRAINER_SIZE));
        }

        rom.extend(std::iter::repeat(0xAA).take(prg_banks as usize * PRG_BANK_SIZE));
        rom.extend(std::iter::repeat(0xCC).take(chr_banks as usize * CHR_BANK_SIZE));

        rom
    }

    #[test]
    fn test_build_rom_length() {
        assert_eq!(build_rom(2, 1, 0).len(), 40976);
        assert_eq!(build_rom(2, 1, 0b100).len(), 41488);
    }
}
