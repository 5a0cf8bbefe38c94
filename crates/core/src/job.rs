// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job descriptor: the identity of a single migration
//!
//! Exactly one descriptor is written per journal. On a resumed run the
//! freshly computed descriptor is compared against the persisted one, and
//! any disagreement means the journal belongs to a different job.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity of a single migration job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobDescriptor {
    /// Stable identifier of the source target
    pub source_id: String,
    /// Stable identifier of the destination target
    pub dest_id: String,
    /// Source length in bytes when the job was created
    pub source_size: u64,
    /// Resize granularity in bytes
    pub chunk: u64,
}

/// A resumed descriptor disagrees with the one stored in the journal
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("job mismatch, parameter {field} does not match: {current} != {stored}")]
pub struct JobMismatch {
    pub field: &'static str,
    pub current: String,
    pub stored: String,
}

impl JobDescriptor {
    pub fn new(
        source_id: impl Into<String>,
        dest_id: impl Into<String>,
        source_size: u64,
        chunk: u64,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            dest_id: dest_id.into(),
            source_size,
            chunk,
        }
    }

    /// Check that `stored` describes the same job as `self`.
    ///
    /// `source_size` is not compared: the source shrinks as the job runs.
    pub fn check_match(&self, stored: &JobDescriptor) -> Result<(), JobMismatch> {
        check_field("source", &self.source_id, &stored.source_id)?;
        check_field("dest", &self.dest_id, &stored.dest_id)?;
        check_field("chunk", &self.chunk, &stored.chunk)
    }

    /// Serialize to the single-line JSON payload of a `JOB` record
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a `JOB` payload; unknown or missing fields are rejected
    pub fn from_json(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }
}

fn check_field<T>(field: &'static str, current: &T, stored: &T) -> Result<(), JobMismatch>
where
    T: PartialEq + ToString + ?Sized,
{
    if current == stored {
        return Ok(());
    }
    Err(JobMismatch {
        field,
        current: current.to_string(),
        stored: stored.to_string(),
    })
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
