// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fatal errors as the operator sees them: a one-line message, the facts
//! behind it, and numbered steps to recover.

use pm_adapters::TargetError;
use pm_core::ConfigError;
use pm_engine::MigrateError;
use pm_storage::JournalError;
use std::error::Error;
use std::fmt;
use std::path::Path;

const EXIT_FAILURE: u8 = 1;
/// Exit status after an interrupt, as a shell reports SIGINT
pub(crate) const EXIT_INTERRUPTED: u8 = 130;

type Cause = Box<dyn Error + Send + Sync + 'static>;

#[derive(Debug)]
pub struct CliError {
    message: String,
    context: Vec<String>,
    suggestions: Vec<String>,
    cause: Option<Cause>,
    interrupted: bool,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            cause: None,
            interrupted: false,
        }
    }

    /// A fact that explains the failure, shown as `-> ...`
    pub fn with_context(mut self, line: impl Into<String>) -> Self {
        self.context.push(line.into());
        self
    }

    /// A recovery step, numbered in the order added
    pub fn with_suggestion(mut self, step: impl Into<String>) -> Self {
        self.suggestions.push(step.into());
        self
    }

    pub fn with_source(mut self, cause: impl Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    pub fn exit_code(&self) -> u8 {
        if self.interrupted {
            EXIT_INTERRUPTED
        } else {
            EXIT_FAILURE
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;
        if !self.context.is_empty() {
            writeln!(f)?;
        }
        for line in &self.context {
            writeln!(f, "  -> {line}")?;
        }
        if !self.suggestions.is_empty() {
            writeln!(f, "\nsuggestions:")?;
        }
        for (n, step) in (1..).zip(&self.suggestions) {
            writeln!(f, "  {n}. {step}")?;
        }
        Ok(())
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_deref().map(|cause| cause as &(dyn Error + 'static))
    }
}

/// Builders for the failures an operator can act on.
impl CliError {
    pub fn config(err: ConfigError) -> Self {
        let hint = match err {
            ConfigError::NotDivisible { .. } => "Pick a --copy-chunk that evenly divides --chunk",
            _ => "Both --chunk and --copy-chunk take a positive size in MiB",
        };
        CliError::new(format!("invalid configuration: {err}"))
            .with_suggestion(hint)
            .with_source(err)
    }

    pub fn open_target(name: &str, err: TargetError) -> Self {
        let mut error = CliError::new(format!("cannot open logical volume '{name}'"));
        error = match &err {
            TargetError::Spawn { .. } => error
                .with_context("The LVM tools could not be started")
                .with_suggestion("Install lvm2 and make sure `lvs` is on PATH"),
            TargetError::CommandFailed { stderr, .. } => error
                .with_context(stderr.clone())
                .with_suggestion(format!("Check that the volume exists: lvs {name}")),
            TargetError::Io { .. } => error
                .with_context(err.to_string())
                .with_suggestion("Run as a user that can open the device read-write"),
            _ => error.with_context(err.to_string()),
        };
        error.with_source(err)
    }

    pub fn journal(path: &Path, err: JournalError) -> Self {
        let error = CliError::new(format!("cannot use journal {}", path.display()))
            .with_context(err.to_string());
        let error = match &err {
            JournalError::Locked { .. } => error
                .with_suggestion("Wait for the other partmigrate run to finish")
                .with_suggestion("Or pass a different --log for an unrelated migration"),
            JournalError::TornRecord { .. }
            | JournalError::Corrupt { .. }
            | JournalError::UnexpectedRecord { .. } => error
                .with_context("The journal was damaged or is not a partmigrate journal")
                .with_suggestion("Inspect the file before removing it; it records which chunks were moved"),
            _ => error,
        };
        error.with_source(err)
    }

    pub fn migration(journal: Option<&Path>, err: MigrateError) -> Self {
        let resume = match journal {
            Some(path) => format!("Completed operations are recorded in {}", path.display()),
            None => "Dry run: nothing was changed".to_string(),
        };
        let interrupted = matches!(err, MigrateError::Interrupted);
        let error = match &err {
            MigrateError::Interrupted => CliError::new("interrupted")
                .with_context(resume)
                .with_suggestion("Rerun the same command to resume"),
            MigrateError::Mismatch(mismatch) => CliError::new(mismatch.to_string())
                .with_context("The journal belongs to a different migration")
                .with_suggestion(format!(
                    "Rerun with the original {} to resume that migration",
                    match mismatch.field {
                        "chunk" => "--chunk",
                        "dest" => "destination",
                        _ => "source",
                    }
                ))
                .with_suggestion("Or pass a new --log to start a separate migration"),
            MigrateError::Journal(JournalError::Diverged { .. }) => {
                CliError::new("journal does not match this migration")
                    .with_context(err.to_string())
                    .with_suggestion("Check that --chunk and --copy-chunk match the original run")
            }
            MigrateError::EmptySource(id) => {
                CliError::new(format!("source {id} is empty, nothing to migrate"))
            }
            _ => CliError::new("migration failed")
                .with_context(err.to_string())
                .with_context(resume)
                .with_suggestion("Fix the cause and rerun the same command to resume"),
        };
        let mut error = error.with_source(err);
        error.interrupted = interrupted;
        error
    }
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"))
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
