// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line arguments

use clap::{ArgAction, Parser};
use pm_core::config::{DEFAULT_CHUNK_MIB, DEFAULT_COPY_CHUNK_MIB, DEFAULT_JOURNAL};
use pm_core::MigrateConfig;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "partmigrate",
    version,
    about = "Move a logical volume onto another while resizing both",
    long_about = "Move a logical volume onto another while resizing both.\n\n\
        The source shrinks and the destination grows one chunk at a time, so both \
        may live in the same volume group with little free space. Every step is \
        recorded in a journal; rerun the same command to resume after a crash."
)]
pub struct Cli {
    /// Source logical volume (e.g. vg0/old)
    pub source: String,

    /// Destination logical volume (e.g. vg0/new)
    pub destination: String,

    /// Resize step in MiB
    #[arg(long, value_name = "MIB", default_value_t = DEFAULT_CHUNK_MIB)]
    pub chunk: u64,

    /// Copy step in MiB; must divide --chunk
    #[arg(long, value_name = "MIB", default_value_t = DEFAULT_COPY_CHUNK_MIB)]
    pub copy_chunk: u64,

    /// Journal file used to resume an interrupted migration
    #[arg(long, value_name = "PATH", default_value = DEFAULT_JOURNAL)]
    pub log: PathBuf,

    /// Print the operations instead of performing them
    #[arg(short, long)]
    pub dry_run: bool,

    /// More log output (-vv for trace)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn config(&self) -> MigrateConfig {
        MigrateConfig {
            chunk_mib: self.chunk,
            copy_chunk_mib: self.copy_chunk,
            journal_path: self.log.clone(),
            dry_run: self.dry_run,
        }
    }

    /// Default log filter when `RUST_LOG` is unset
    pub fn log_directive(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "warn",
            (false, 0) => "info",
            (false, 1) => "debug",
            (false, _) => "trace",
        }
    }
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;
