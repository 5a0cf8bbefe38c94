// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Journal record codec: one `<TYPE> <payload>` line per record

use pm_core::JobDescriptor;
use thiserror::Error;

const INFO: &str = "INFO";
const JOB: &str = "JOB";
const OP: &str = "OP";

/// Errors parsing a single journal line
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("unknown record type `{0}`")]
    UnknownType(String),
    #[error("{0} record has no payload")]
    MissingPayload(&'static str),
    #[error("invalid job descriptor: {0}")]
    InvalidJob(#[from] serde_json::Error),
}

/// One line of the journal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalRecord {
    /// Free-form note, ignored on replay
    Info(String),
    /// The job descriptor, at most one per journal
    Job(JobDescriptor),
    /// Token of a completed operation
    Op(String),
}

impl JournalRecord {
    /// Record type as written at the start of the line
    pub fn kind(&self) -> &'static str {
        match self {
            JournalRecord::Info(_) => INFO,
            JournalRecord::Job(_) => JOB,
            JournalRecord::Op(_) => OP,
        }
    }

    pub fn is_info(&self) -> bool {
        matches!(self, JournalRecord::Info(_))
    }

    /// Serialize to a single line, without the trailing newline
    pub fn to_line(&self) -> Result<String, RecordError> {
        Ok(match self {
            // Notes must not break the one-record-per-line framing
            JournalRecord::Info(text) => format!("{INFO} {}", text.replace(['\n', '\r'], " ")),
            JournalRecord::Job(job) => format!("{JOB} {}", job.to_json()?),
            JournalRecord::Op(token) => format!("{OP} {token}"),
        })
    }

    /// Parse one line (trailing whitespace is ignored)
    pub fn parse(line: &str) -> Result<Self, RecordError> {
        let line = line.trim_end();
        let (kind, payload) = match line.split_once(' ') {
            Some((kind, payload)) => (kind, Some(payload)),
            None => (line, None),
        };

        match kind {
            INFO => Ok(JournalRecord::Info(payload.unwrap_or_default().to_string())),
            JOB => {
                let payload = payload.ok_or(RecordError::MissingPayload(JOB))?;
                Ok(JournalRecord::Job(JobDescriptor::from_json(payload)?))
            }
            OP => match payload {
                Some(token) if !token.is_empty() => Ok(JournalRecord::Op(token.to_string())),
                _ => Err(RecordError::MissingPayload(OP)),
            },
            other => Err(RecordError::UnknownType(other.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
