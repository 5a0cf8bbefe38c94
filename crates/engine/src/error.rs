// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the migration engine

use pm_adapters::TargetError;
use pm_core::JobMismatch;
use pm_storage::JournalError;
use thiserror::Error;

/// Errors that abort a migration. None of them are retried.
#[derive(Debug, Error)]
pub enum MigrateError {
    #[error(transparent)]
    Mismatch(#[from] JobMismatch),
    #[error("journal error: {0}")]
    Journal(#[from] JournalError),
    #[error("target error: {0}")]
    Target(#[from] TargetError),
    #[error("target {id} cannot be used as {role}")]
    Unsupported { id: String, role: &'static str },
    #[error("source and destination are the same target: {0}")]
    SameTarget(String),
    #[error("source {0} is empty, nothing to migrate")]
    EmptySource(String),
    #[error("copy chunk size of {0} bytes does not fit in memory")]
    CopyChunkTooLarge(u64),
    #[error("failed to read {expected} bytes, only {got} read, dev={id}, offset={offset}")]
    ShortRead {
        id: String,
        offset: u64,
        expected: usize,
        got: usize,
    },
    #[error("failed to write {expected} bytes, only {got} written, dev={id}, offset={offset}")]
    ShortWrite {
        id: String,
        offset: u64,
        expected: usize,
        got: usize,
    },
    #[error("interrupted")]
    Interrupted,
}
