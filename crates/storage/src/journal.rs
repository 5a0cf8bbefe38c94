// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Replayable operation journal
//!
//! The journal gives every operation at-most-once execution across process
//! restarts. On open, an existing job record switches the journal into
//! replay: each requested operation is then matched, in order, against the
//! next recorded `OP` line and skipped if it is already there. Once the
//! recorded operations run out the journal goes live and every operation is
//! executed and then appended.
//!
//! ## Durability
//!
//! - An `OP` line is appended only after its action returned successfully
//! - Every append is `fsync`ed before returning
//! - The file is never rewritten or truncated

use crate::record::{JournalRecord, RecordError};
use fs2::FileExt;
use pm_core::JobDescriptor;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur in journal operations
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("journal {} is locked, is another partmigrate running?", path.display())]
    Locked {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("corrupt journal record at line {line}: {source}")]
    Corrupt {
        line: u64,
        #[source]
        source: RecordError,
    },
    #[error("failed to encode journal record: {0}")]
    Encode(#[from] RecordError),
    #[error("did not expect {found} at line {line} of the journal, expecting either INFO or JOB")]
    UnexpectedRecord { line: u64, found: &'static str },
    #[error("mismatched operation at line {line} of the journal: OP {expected} != {found}")]
    Diverged {
        line: u64,
        expected: String,
        found: String,
    },
    #[error("incomplete record at line {line} of the journal, an append was interrupted")]
    TornRecord { line: u64 },
}

/// Journal mode, fixed at open and only ever moving from replay to live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Operations are executed and appended
    Live,
    /// Operations are matched against recorded ones
    Replaying,
    /// Operations are printed, never executed or persisted
    DryRun,
}

/// What `perform_once` did with an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Performed {
    /// The action ran and the operation was appended
    Executed,
    /// The operation was already recorded; the action did not run
    Replayed,
    /// Dry run: the operation was printed; the action did not run
    Printed,
}

enum Sink {
    File {
        path: PathBuf,
        writer: File,
        reader: Option<LineReader>,
    },
    DryRun(Box<dyn Write + Send>),
}

struct LineReader {
    inner: BufReader<File>,
    line: u64,
}

impl LineReader {
    /// Next record that is not `INFO`, with its line number
    fn next_structural(&mut self) -> Result<Option<(u64, JournalRecord)>, JournalError> {
        let mut buf = String::new();
        loop {
            buf.clear();
            if self.inner.read_line(&mut buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;

            if !buf.ends_with('\n') {
                return Err(JournalError::TornRecord { line: self.line });
            }
            if buf.trim().is_empty() {
                continue;
            }

            let record = JournalRecord::parse(&buf).map_err(|source| JournalError::Corrupt {
                line: self.line,
                source,
            })?;
            if !record.is_info() {
                return Ok(Some((self.line, record)));
            }
        }
    }
}

/// Append-only journal of a job descriptor, notes and completed operations
pub struct Journal {
    mode: Mode,
    sink: Sink,
    job: Option<JobDescriptor>,
    executed: u64,
    replayed: u64,
}

impl Journal {
    /// Open or create the journal at `path`.
    ///
    /// Holds an exclusive lock on the file until the journal is closed.
    pub fn open(path: &Path) -> Result<Self, JournalError> {
        let writer = OpenOptions::new().create(true).append(true).open(path)?;
        FileExt::try_lock_exclusive(&writer).map_err(|source| JournalError::Locked {
            path: path.to_path_buf(),
            source,
        })?;

        let mut reader = LineReader {
            inner: BufReader::new(File::open(path)?),
            line: 0,
        };

        let mut journal = match reader.next_structural()? {
            None => Self {
                mode: Mode::Live,
                sink: Sink::File {
                    path: path.to_path_buf(),
                    writer,
                    reader: None,
                },
                job: None,
                executed: 0,
                replayed: 0,
            },
            Some((_, JournalRecord::Job(job))) => Self {
                mode: Mode::Replaying,
                sink: Sink::File {
                    path: path.to_path_buf(),
                    writer,
                    reader: Some(reader),
                },
                job: Some(job),
                executed: 0,
                replayed: 0,
            },
            Some((line, record)) => {
                return Err(JournalError::UnexpectedRecord {
                    line,
                    found: record.kind(),
                })
            }
        };

        match journal.mode {
            Mode::Replaying => info!(path = %path.display(), "resuming from journal"),
            _ => {
                info!(path = %path.display(), "starting new journal");
                journal.note("Partmigrate starting")?;
            }
        }
        Ok(journal)
    }

    /// A journal that prints records to stdout instead of persisting them
    pub fn dry_run() -> Self {
        Self::dry_run_to(io::stdout())
    }

    /// A dry-run journal printing to `out`
    pub fn dry_run_to(out: impl Write + Send + 'static) -> Self {
        Self {
            mode: Mode::DryRun,
            sink: Sink::DryRun(Box::new(out)),
            job: None,
            executed: 0,
            replayed: 0,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The authoritative job descriptor, if one was loaded or recorded
    pub fn job(&self) -> Option<&JobDescriptor> {
        self.job.as_ref()
    }

    /// Operations executed by this process
    pub fn executed(&self) -> u64 {
        self.executed
    }

    /// Operations skipped because they were already recorded
    pub fn replayed(&self) -> u64 {
        self.replayed
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.sink {
            Sink::File { path, .. } => Some(path),
            Sink::DryRun(_) => None,
        }
    }

    /// Persist `job` unless a descriptor was already loaded from the journal.
    ///
    /// Returns the authoritative descriptor. Comparing a loaded descriptor
    /// against `job` is left to the caller.
    pub fn record_job(&mut self, job: JobDescriptor) -> Result<&JobDescriptor, JournalError> {
        let job = match self.job.take() {
            Some(loaded) => loaded,
            None => {
                self.emit(&JournalRecord::Job(job.clone()))?;
                job
            }
        };
        Ok(self.job.insert(job))
    }

    /// Append a note. Skipped while replaying; printed in dry run.
    pub fn note(&mut self, text: impl Into<String>) -> Result<(), JournalError> {
        if self.mode == Mode::Replaying {
            return Ok(());
        }
        self.emit(&JournalRecord::Info(text.into()))
    }

    /// Run `action` unless operation `token` is already recorded.
    ///
    /// While replaying, the next recorded operation must be exactly `token`;
    /// anything else means the journal and the requested sequence diverged.
    /// If `action` fails nothing is appended and the error is returned.
    pub fn perform_once<F, E>(&mut self, token: &str, action: F) -> Result<Performed, E>
    where
        F: FnOnce() -> Result<(), E>,
        E: From<JournalError>,
    {
        match self.mode {
            Mode::DryRun => {
                self.emit(&JournalRecord::Op(token.to_string()))?;
                return Ok(Performed::Printed);
            }
            Mode::Replaying => match self.next_recorded()? {
                Some((_, JournalRecord::Op(found))) if found == token => {
                    debug!(op = token, "already performed");
                    self.replayed += 1;
                    return Ok(Performed::Replayed);
                }
                Some((line, record)) => {
                    let found = match record {
                        JournalRecord::Op(found) => format!("OP {found}"),
                        other => other.kind().to_string(),
                    };
                    return Err(JournalError::Diverged {
                        line,
                        expected: token.to_string(),
                        found,
                    }
                    .into());
                }
                None => {
                    info!(replayed = self.replayed, "journal replay complete, continuing");
                    self.go_live();
                }
            },
            Mode::Live => {}
        }

        debug!(op = token, "performing");
        action()?;
        self.emit(&JournalRecord::Op(token.to_string()))?;
        self.executed += 1;
        Ok(Performed::Executed)
    }

    /// Flush and release the journal
    pub fn close(self) -> Result<(), JournalError> {
        match self.sink {
            // Dropping the handle releases the lock
            Sink::File { writer, .. } => writer.sync_all()?,
            Sink::DryRun(mut out) => out.flush()?,
        }
        Ok(())
    }

    fn next_recorded(&mut self) -> Result<Option<(u64, JournalRecord)>, JournalError> {
        match &mut self.sink {
            Sink::File {
                reader: Some(reader),
                ..
            } => reader.next_structural(),
            _ => Ok(None),
        }
    }

    fn go_live(&mut self) {
        self.mode = Mode::Live;
        if let Sink::File { reader, .. } = &mut self.sink {
            *reader = None;
        }
    }

    fn emit(&mut self, record: &JournalRecord) -> Result<(), JournalError> {
        let mut line = record.to_line()?;
        line.push('\n');
        match &mut self.sink {
            Sink::File { writer, .. } => {
                writer.write_all(line.as_bytes())?;
                writer.sync_all()?;
            }
            Sink::DryRun(out) => out.write_all(line.as_bytes())?,
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "journal_tests.rs"]
mod tests;
