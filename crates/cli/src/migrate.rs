// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wires the journal and the two volumes into a migration run

use crate::args::Cli;
use crate::error::CliError;
use pm_adapters::{LvmTarget, Target, TracedTarget};
use pm_engine::{Migration, MigrationReport};
use pm_storage::Journal;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::warn;

/// Run the migration described by `cli`.
///
/// Everything opened here is closed again whether or not the migration
/// succeeded; the migration's own error takes precedence over close errors.
pub fn migrate(cli: &Cli, interrupt: Arc<AtomicBool>) -> Result<MigrationReport, CliError> {
    let config = cli.config();
    // Reject bad sizes before any journal or device is touched
    let ctx = config.job_context().map_err(CliError::config)?;

    let journal_path = config.journal_path.clone();
    let mut journal = if config.dry_run {
        Journal::dry_run()
    } else {
        Journal::open(&journal_path).map_err(|e| CliError::journal(&journal_path, e))?
    };

    let mut source = match open_volume(&cli.source) {
        Ok(source) => source,
        Err(e) => {
            close_all(journal, &journal_path, &mut []);
            return Err(e);
        }
    };
    let mut dest = match open_volume(&cli.destination) {
        Ok(dest) => dest,
        Err(e) => {
            close_all(journal, &journal_path, &mut [&mut source]);
            return Err(e);
        }
    };

    let outcome = Migration::new(ctx, &mut journal, &source, &dest)
        .with_interrupt(interrupt)
        .run();
    let close_error = close_all(journal, &journal_path, &mut [&mut source, &mut dest]);

    let resume_from = (!config.dry_run).then_some(journal_path.as_path());
    let report = outcome.map_err(|e| CliError::migration(resume_from, e))?;
    match close_error {
        Some(err) => Err(err),
        None => Ok(report),
    }
}

/// Close every target, then the journal, logging each failure.
/// Returns the first failure.
fn close_all(
    journal: Journal,
    journal_path: &Path,
    targets: &mut [&mut dyn Target],
) -> Option<CliError> {
    let mut first = None;
    for target in targets.iter_mut() {
        if let Err(e) = target.close() {
            warn!(id = target.id(), error = %e, "failed to close volume");
            first.get_or_insert(CliError::new("failed to close volume").with_source(e));
        }
    }
    if let Err(e) = journal.close() {
        warn!(error = %e, "failed to close journal");
        first.get_or_insert(CliError::journal(journal_path, e));
    }
    first
}

fn open_volume(name: &str) -> Result<TracedTarget<LvmTarget>, CliError> {
    LvmTarget::open(name)
        .map(TracedTarget::new)
        .map_err(|e| {
            warn!(name, error = %e, "cannot open volume");
            CliError::open_target(name, e)
        })
}

#[cfg(test)]
#[path = "migrate_tests.rs"]
mod tests;
