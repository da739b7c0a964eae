// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Detection of ROM data made of the same chunk repeated.
//!
//! Small programs are often dumped padded to a full bank by repeating themselves, the Game Genie
//! image for example has 16 KiB of PRG-ROM holding a single 4 KiB program four times.

use log::debug;

/// The smallest length worth halving, two CHR tiles.
const MIN_SPLITTABLE_LENGTH: usize = 1 << 5;

/// The largest length worth halving, the biggest PRG-ROM iNES 1.0 can address.
const MAX_SPLITTABLE_LENGTH: usize = 1 << 21;

/// Whether `data` is a power of two in the splittable range made of two identical halves.
fn is_splittable(data: &[u8]) -> bool {
    let length = data.len();

    let in_range = (MIN_SPLITTABLE_LENGTH..=MAX_SPLITTABLE_LENGTH).contains(&length);

    if !length.is_power_of_two() || !in_range {
        return false;
    }

    let (lower_half, upper_half) = data.split_at(length / 2);
    lower_half == upper_half
}

/// Halve `data` as many times as its halves are identical.
pub fn shrink_mirrored(data: &[u8]) -> &[u8] {
    let mut shrunk = data;

    while is_splittable(shrunk) {
        shrunk = &shrunk[..shrunk.len() / 2];
    }

    if shrunk.len() != data.len() {
        debug!("Dropped mirrored data, {} bytes left of {}", shrunk.len(), data.len());
    }

    shrunk
}
