// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run configuration and the job context derived from it

use std::path::PathBuf;
use thiserror::Error;

/// Bytes per mebibyte; chunk sizes are configured in MiB
pub const MIB: u64 = 1024 * 1024;

/// Default resize step in MiB
pub const DEFAULT_CHUNK_MIB: u64 = 1024;
/// Default copy step in MiB
pub const DEFAULT_COPY_CHUNK_MIB: u64 = 64;
/// Default journal file name
pub const DEFAULT_JOURNAL: &str = "partmigrate.log";

/// Errors in run configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("chunk size must be greater than zero")]
    ZeroChunk,
    #[error("copy chunk size must be greater than zero")]
    ZeroCopyChunk,
    #[error("chunk size {chunk} is not divisible by copy chunk size {copy_chunk}")]
    NotDivisible { chunk: u64, copy_chunk: u64 },
    #[error("chunk size of {0} MiB overflows a byte count")]
    Overflow(u64),
}

/// Configuration for one migration run, built once by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrateConfig {
    /// Resize step in MiB
    pub chunk_mib: u64,
    /// Copy step in MiB
    pub copy_chunk_mib: u64,
    /// Path of the journal used for resuming
    pub journal_path: PathBuf,
    /// Print operations instead of performing them
    pub dry_run: bool,
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self {
            chunk_mib: DEFAULT_CHUNK_MIB,
            copy_chunk_mib: DEFAULT_COPY_CHUNK_MIB,
            journal_path: PathBuf::from(DEFAULT_JOURNAL),
            dry_run: false,
        }
    }
}

impl MigrateConfig {
    /// Derive and validate the byte-level job context
    pub fn job_context(&self) -> Result<JobContext, ConfigError> {
        let chunk = self
            .chunk_mib
            .checked_mul(MIB)
            .ok_or(ConfigError::Overflow(self.chunk_mib))?;
        let copy_chunk = self
            .copy_chunk_mib
            .checked_mul(MIB)
            .ok_or(ConfigError::Overflow(self.copy_chunk_mib))?;
        JobContext::new(chunk, copy_chunk)
    }
}

/// Derived run parameters, immutable once built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobContext {
    chunk_size: u64,
    copy_chunk_size: u64,
    copy_chunks: u64,
}

impl JobContext {
    /// Build a context from byte sizes.
    ///
    /// `copy_chunk_size` must evenly divide `chunk_size`.
    pub fn new(chunk_size: u64, copy_chunk_size: u64) -> Result<Self, ConfigError> {
        if chunk_size == 0 {
            return Err(ConfigError::ZeroChunk);
        }
        if copy_chunk_size == 0 {
            return Err(ConfigError::ZeroCopyChunk);
        }
        if chunk_size % copy_chunk_size != 0 {
            return Err(ConfigError::NotDivisible {
                chunk: chunk_size,
                copy_chunk: copy_chunk_size,
            });
        }
        Ok(Self {
            chunk_size,
            copy_chunk_size,
            copy_chunks: chunk_size / copy_chunk_size,
        })
    }

    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    pub fn copy_chunk_size(&self) -> u64 {
        self.copy_chunk_size
    }

    /// Number of copy steps per chunk
    pub fn copy_chunks(&self) -> u64 {
        self.copy_chunks
    }

    /// Number of chunk slots needed to hold `size` bytes (rounded up)
    pub fn chunks_for(&self, size: u64) -> u64 {
        size.div_ceil(self.chunk_size)
    }

    /// Byte offset of copy step `step` within chunk `chunk`
    pub fn offset(&self, chunk: u64, step: u64) -> u64 {
        chunk * self.chunk_size + step * self.copy_chunk_size
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
