// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! The regions an iNES file is split into.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// One of the consecutive blocks of an iNES file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// The 16 byte header.
    Header,

    /// The optional 512 byte trainer.
    Trainer,

    /// Program ROM.
    Prg,

    /// Graphics ROM.
    Chr,
}

impl Region {
    /// All the regions, in file order.
    pub const ALL: [Region; 4] = [Region::Header, Region::Trainer, Region::Prg, Region::Chr];

    /// Whether the region may contain copies of the same chunk that can be dropped.
    pub fn is_rom(&self) -> bool {
        matches!(self, Region::Prg | Region::Chr)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Region::Header => "header",
            Region::Trainer => "trainer",
            Region::Prg => "PRG-ROM",
            Region::Chr => "CHR-ROM",
        };

        f.write_str(name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown region '{0}', expected one of: h, t, p, c, header, trainer, prg, chr")]
/// A region name could not be recognized.
pub struct ParseRegionError(pub String);

impl FromStr for Region {
    type Err = ParseRegionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "h" | "header" => Ok(Region::Header),
            "t" | "trainer" => Ok(Region::Trainer),
            "p" | "prg" | "prg-rom" => Ok(Region::Prg),
            "c" | "chr" | "chr-rom" => Ok(Region::Chr),
            _ => Err(ParseRegionError(s.to_owned())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
/// Errors when taking a region out of a ROM image.
pub enum RegionError {
    #[error("The ROM has no {0}")]
    /// The region has zero length in this file.
    Unavailable(Region),

    #[error("The {region} spans up to byte {end} but only {available} bytes were given")]
    /// The given bytes are shorter than the layout they were described with.
    OutOfBounds {
        /// The requested region.
        region: Region,
        /// Exclusive end of the region.
        end: usize,
        /// Length of the given bytes.
        available: usize,
    },
}
