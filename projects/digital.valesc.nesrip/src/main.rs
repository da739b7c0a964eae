// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Command line front end of nesrip.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use env_logger::Env;
use log::{debug, info};
use nesrip::extract::{ExtractOptions, Extractor, RegionRequest};
use nesrip::region::{ParseRegionError, Region};

/// Copies the header, trainer, PRG-ROM or CHR-ROM of an iNES ROM file (.nes) to new files.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, arg_required_else_help = true)]
struct Args {
    /// iNES ROM file to read
    input: PathBuf,

    /// Write the trainer (512 bytes)
    #[arg(short, long, value_name = "PATH")]
    trainer: Option<PathBuf>,

    /// Write the PRG-ROM
    #[arg(short, long, value_name = "PATH")]
    prg_rom: Option<PathBuf>,

    /// Write the CHR-ROM
    #[arg(short, long, value_name = "PATH")]
    chr_rom: Option<PathBuf>,

    /// Write the 16 byte header
    #[arg(long, value_name = "PATH")]
    header: Option<PathBuf>,

    /// Write any region (h, t, p or c) to a file, may be repeated
    #[arg(short, long, num_args = 2, value_names = ["REGION", "PATH"], action = ArgAction::Append)]
    output: Vec<OsString>,

    /// Warn and skip regions the ROM does not have instead of failing
    #[arg(long)]
    skip_missing: bool,

    /// Refuse to overwrite existing files
    #[arg(long)]
    no_clobber: bool,

    /// Only write one copy of PRG-ROM or CHR-ROM made of a repeated chunk
    #[arg(long)]
    shrink_mirrors: bool,

    /// Print more information (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Gather every requested region, named flags first.
    fn requests(&self) -> Result<Vec<RegionRequest>, ParseRegionError> {
        let mut requests: Vec<RegionRequest> = [
            (Region::Header, &self.header),
            (Region::Trainer, &self.trainer),
            (Region::Prg, &self.prg_rom),
            (Region::Chr, &self.chr_rom),
        ]
        .into_iter()
        .filter_map(|(region, path)| path.as_ref().map(|path| RegionRequest::new(region, path)))
        .collect();

        for pair in self.output.chunks(2) {
            if let [region, path] = pair {
                let region = region
                    .to_str()
                    .ok_or_else(|| ParseRegionError(region.to_string_lossy().into_owned()))?
                    .parse()?;

                requests.push(RegionRequest::new(region, path));
            }
        }

        Ok(requests)
    }

    /// Behaviour knobs of the extractor.
    fn options(&self) -> ExtractOptions {
        ExtractOptions {
            skip_missing: self.skip_missing,
            no_clobber: self.no_clobber,
            shrink_mirrors: self.shrink_mirrors,
        }
    }
}

/// Exit status of a bad command line, the same clap uses.
const USAGE_EXIT_CODE: u8 = 2;

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    let requests = match args.requests() {
        Ok(requests) => requests,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::from(USAGE_EXIT_CODE);
        }
    };

    let mut extractor = Extractor::with_file_sink(args.options());

    match extractor.run(&args.input, &requests) {
        Ok(report) => {
            info!(
                "{} region(s) written, {} skipped",
                report.written.len(),
                report.skipped.len()
            );

            ExitCode::SUCCESS
        }
        Err(err) => {
            // Must reach stderr whatever RUST_LOG says
            debug!("{err:?}");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
