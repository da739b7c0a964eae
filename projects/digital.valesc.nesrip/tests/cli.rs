// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Exit status and messages of the nesrip binary.

use std::ffi::OsStr;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

/// A scratch directory removed when dropped.
struct ScratchDir(PathBuf);

impl ScratchDir {
    /// Create an empty directory under the system temporary directory.
    fn new(name: &str) -> ScratchDir {
        let path = std::env::temp_dir().join(format!("nesrip-cli-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).unwrap();

        ScratchDir(path)
    }

    /// Path of `name` inside the directory.
    fn join(&self, name: &str) -> PathBuf {
        self.0.join(name)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

/// Store a ROM with one PRG bank, `chr_banks` CHR banks and no trainer as `game.nes`.
fn write_rom(dir: &ScratchDir, chr_banks: u8) -> PathBuf {
    let mut rom = vec![0u8; 16];
    rom[..4].copy_from_slice(b"NES\x1A");
    rom[4] = 1;
    rom[5] = chr_banks;
    rom.resize(16 + 16 * 1024 + chr_banks as usize * 8 * 1024, 0xEA);

    let path = dir.join("game.nes");
    fs::write(&path, rom).unwrap();

    path
}

/// Run the binary with `RUST_LOG` set to `rust_log`, or removed when `None`.
fn nesrip(args: &[&OsStr], rust_log: Option<&str>) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_nesrip"));
    command.args(args);

    match rust_log {
        Some(filter) => command.env("RUST_LOG", filter),
        None => command.env_remove("RUST_LOG"),
    };

    command.output().unwrap()
}

#[test]
fn test_success_exits_zero() {
    let dir = ScratchDir::new("success");
    let input = write_rom(&dir, 1);
    let output = dir.join("game.prg");

    let result = nesrip(
        &[OsStr::new("-p"), output.as_os_str(), input.as_os_str()],
        None,
    );

    assert_eq!(result.status.code(), Some(0));
    assert_eq!(fs::read(&output).unwrap().len(), 16 * 1024);
}

#[test]
fn test_missing_chr_names_region() {
    let dir = ScratchDir::new("missing-chr");
    let input = write_rom(&dir, 0);
    let output = dir.join("game.chr");

    let result = nesrip(
        &[OsStr::new("-c"), output.as_os_str(), input.as_os_str()],
        None,
    );

    assert_eq!(result.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&result.stderr).contains("CHR-ROM"));
    assert!(!output.exists());
}

#[test]
fn test_bad_magic_fails() {
    let dir = ScratchDir::new("bad-magic");
    let input = dir.join("game.nes");
    fs::write(&input, [0u8; 16 + 16 * 1024]).unwrap();

    let result = nesrip(
        &[OsStr::new("-p"), dir.join("game.prg").as_os_str(), input.as_os_str()],
        None,
    );

    assert_eq!(result.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&result.stderr).contains("magic bytes"));
}

#[test]
fn test_error_printed_whatever_the_log_filter() {
    let dir = ScratchDir::new("log-filter");
    let input = dir.join("game.nes");
    fs::write(&input, b"NES\x1A").unwrap();

    for filter in ["off", "other=info"] {
        let result = nesrip(
            &[OsStr::new("-p"), dir.join("game.prg").as_os_str(), input.as_os_str()],
            Some(filter),
        );

        assert_eq!(result.status.code(), Some(1), "{filter}");
        assert!(
            String::from_utf8_lossy(&result.stderr).contains("smaller than the 16 bytes"),
            "{filter}"
        );
    }
}

#[test]
fn test_usage_errors_exit_two() {
    let result = nesrip(&[], None);
    assert_eq!(result.status.code(), Some(2));

    let dir = ScratchDir::new("usage");
    let input = write_rom(&dir, 1);

    let result = nesrip(
        &[
            input.as_os_str(),
            OsStr::new("-o"),
            OsStr::new("z"),
            dir.join("game.bin").as_os_str(),
        ],
        None,
    );

    assert_eq!(result.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&result.stderr).contains("Unknown region"));
}
