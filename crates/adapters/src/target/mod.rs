// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Target adapters

mod lvm;

pub use lvm::{CommandRunner, LvmTarget, SystemRunner};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{MemTarget, TargetCall};

use thiserror::Error;

/// Errors from target operations
#[derive(Debug, Error)]
pub enum TargetError {
    #[error("{op} failed on {id}: {source}")]
    Io {
        id: String,
        op: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to run `{cmd}`: {source}")]
    Spawn {
        cmd: String,
        #[source]
        source: std::io::Error,
    },
    #[error("command `{cmd}` exited with {status}: {stderr}")]
    CommandFailed {
        cmd: String,
        status: String,
        stderr: String,
    },
    #[error("unexpected lvs report for {name}: {reason}")]
    Report { name: String, reason: String },
    #[error("target {0} is closed")]
    Closed(String),
}

/// A named, resizable, randomly addressable byte store.
///
/// All calls are synchronous: when `write`, `resize` or `sync` returns, the
/// effect is durable. Methods take `&self` so a single target can be both
/// the source and the destination of a copy.
pub trait Target {
    /// Stable identifier, reproducible across restarts for the same device
    fn id(&self) -> &str;

    /// Read up to `buf.len()` bytes at `offset`.
    ///
    /// Returns fewer bytes only at the end of the device.
    fn read(&self, offset: u64, buf: &mut [u8]) -> Result<usize, TargetError>;

    /// Write `buf` at `offset`, returning how many bytes were written
    fn write(&self, offset: u64, buf: &[u8]) -> Result<usize, TargetError>;

    /// Grow or shrink to exactly `new_size` bytes.
    ///
    /// Shrinking discards everything past `new_size`.
    fn resize(&self, new_size: u64) -> Result<(), TargetError>;

    /// Current size in bytes
    fn size(&self) -> Result<u64, TargetError>;

    /// Make previous writes durable
    fn sync(&self) -> Result<(), TargetError> {
        Ok(())
    }

    fn supports_source(&self) -> bool {
        false
    }

    fn supports_destination(&self) -> bool {
        false
    }

    /// Release adapter resources
    fn close(&mut self) -> Result<(), TargetError>;
}
