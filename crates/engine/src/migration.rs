// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Executes the migration plan through the journal

use crate::error::MigrateError;
use crate::plan::{self, Side, Step};
use pm_adapters::Target;
use pm_core::{JobContext, JobDescriptor, Stage};
use pm_storage::{Journal, Performed};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, info_span};

/// Summary of a finished migration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Chunk slots the source occupied
    pub chunks: u64,
    /// Operations performed by this run
    pub executed: u64,
    /// Operations skipped because an earlier run recorded them
    pub replayed: u64,
    /// Operations printed by a dry run
    pub printed: u64,
    /// Final destination size in bytes
    pub dest_size: u64,
}

impl MigrationReport {
    fn count(&mut self, performed: Performed) {
        match performed {
            Performed::Executed => self.executed += 1,
            Performed::Replayed => self.replayed += 1,
            Performed::Printed => self.printed += 1,
        }
    }
}

/// A single migration of `source` onto `dest`.
///
/// The targets are borrowed, never closed: the caller opened them and
/// closes them whatever the outcome.
pub struct Migration<'a> {
    ctx: JobContext,
    journal: &'a mut Journal,
    source: &'a dyn Target,
    dest: &'a dyn Target,
    interrupt: Option<Arc<AtomicBool>>,
    buf: Vec<u8>,
}

impl<'a> Migration<'a> {
    pub fn new(
        ctx: JobContext,
        journal: &'a mut Journal,
        source: &'a dyn Target,
        dest: &'a dyn Target,
    ) -> Self {
        Self {
            ctx,
            journal,
            source,
            dest,
            interrupt: None,
            buf: Vec::new(),
        }
    }

    /// Stop before the next operation once `flag` is set
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(flag);
        self
    }

    /// Run (or resume) the migration to completion
    pub fn run(mut self) -> Result<MigrationReport, MigrateError> {
        let span = info_span!("migration", source = self.source.id(), dest = self.dest.id());
        let _guard = span.enter();

        self.check_targets()?;
        let job = self.resolve_job()?;
        let chunks = self.ctx.chunks_for(job.source_size);
        info!(
            source_size = job.source_size,
            chunk = self.ctx.chunk_size(),
            chunks,
            mode = ?self.journal.mode(),
            "migrating"
        );

        let mut report = MigrationReport {
            chunks,
            dest_size: chunks.saturating_mul(self.ctx.chunk_size()),
            ..MigrationReport::default()
        };

        self.journal.note(format!("Stage {}", Stage::Move))?;
        for step in plan::move_steps(chunks) {
            let performed = self.perform(&step)?;
            report.count(performed);
            if let (Step::Move { dst_chunk, .. }, Performed::Executed) = (step, performed) {
                info!(stage = %Stage::Move, chunk = dst_chunk + 1, of = chunks, "moved chunk");
            }
        }

        self.journal.note(format!("Stage {}", Stage::Reorder))?;
        for step in plan::reorder_steps(chunks) {
            let performed = self.perform(&step)?;
            report.count(performed);
            if let (Step::Move { stage: Stage::ReorderRestore, dst_chunk, .. }, Performed::Executed) =
                (step, performed)
            {
                info!(
                    stage = %Stage::Reorder,
                    chunk = chunks - dst_chunk,
                    of = chunks / 2,
                    "reordered chunk pair"
                );
            }
        }

        self.journal.note("Migration complete")?;
        info!(
            executed = report.executed,
            replayed = report.replayed,
            printed = report.printed,
            "migration complete"
        );
        Ok(report)
    }

    fn check_targets(&self) -> Result<(), MigrateError> {
        if !self.source.supports_source() {
            return Err(MigrateError::Unsupported {
                id: self.source.id().to_string(),
                role: "source",
            });
        }
        if !self.dest.supports_destination() {
            return Err(MigrateError::Unsupported {
                id: self.dest.id().to_string(),
                role: "destination",
            });
        }
        if self.source.id() == self.dest.id() {
            return Err(MigrateError::SameTarget(self.source.id().to_string()));
        }
        Ok(())
    }

    /// The authoritative job, either resumed from the journal or recorded now
    fn resolve_job(&mut self) -> Result<JobDescriptor, MigrateError> {
        let source_id = self.source.id().to_string();
        let dest_id = self.dest.id().to_string();
        let chunk = self.ctx.chunk_size();

        if let Some(stored) = self.journal.job() {
            // The source has been shrinking since the job was recorded, so
            // the stored size is the one the plan is derived from
            let current = JobDescriptor::new(source_id, dest_id, stored.source_size, chunk);
            current.check_match(stored)?;
            info!(source_size = stored.source_size, "resuming recorded job");
            return Ok(stored.clone());
        }

        let source_size = self.source.size()?;
        if source_size == 0 {
            return Err(MigrateError::EmptySource(source_id));
        }
        self.journal.note(format!("Opened source {source_id}"))?;
        self.journal.note(format!("Opened destination {dest_id}"))?;
        let job = JobDescriptor::new(source_id, dest_id, source_size, chunk);
        Ok(self.journal.record_job(job)?.clone())
    }

    fn perform(&mut self, step: &Step) -> Result<Performed, MigrateError> {
        if self
            .interrupt
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
        {
            info!("interrupt received, stopping before the next operation");
            return Err(MigrateError::Interrupted);
        }

        let token = step.op_id(self.source.id(), self.dest.id()).token();
        let ctx = self.ctx;
        let (source, dest) = (self.source, self.dest);
        let buf = &mut self.buf;
        self.journal
            .perform_once(&token, || apply(&ctx, source, dest, step, buf))
    }
}

fn apply(
    ctx: &JobContext,
    source: &dyn Target,
    dest: &dyn Target,
    step: &Step,
    buf: &mut Vec<u8>,
) -> Result<(), MigrateError> {
    let target = |side: Side| match side {
        Side::Source => source,
        Side::Dest => dest,
    };
    match *step {
        Step::Resize { side, chunks, .. } => {
            let size = chunks.saturating_mul(ctx.chunk_size());
            debug!(id = target(side).id(), size, "resizing");
            target(side).resize(size)?;
        }
        Step::Move {
            src,
            src_chunk,
            dst,
            dst_chunk,
            allow_partial,
            ..
        } => copy_chunk(
            ctx,
            target(src),
            src_chunk,
            target(dst),
            dst_chunk,
            allow_partial,
            buf,
        )?,
    }
    Ok(())
}

/// Copy one chunk in copy-chunk sized blocks.
///
/// A short read is only accepted with `allow_partial`: the rest of that
/// block is zero-filled, written in full, and copying stops. The
/// destination is synced before returning so the journal never records a
/// copy that is not on storage.
fn copy_chunk(
    ctx: &JobContext,
    src: &dyn Target,
    src_chunk: u64,
    dst: &dyn Target,
    dst_chunk: u64,
    allow_partial: bool,
    buf: &mut Vec<u8>,
) -> Result<(), MigrateError> {
    let block = usize::try_from(ctx.copy_chunk_size())
        .map_err(|_| MigrateError::CopyChunkTooLarge(ctx.copy_chunk_size()))?;
    buf.resize(block, 0);

    for step in 0..ctx.copy_chunks() {
        let src_offset = ctx.offset(src_chunk, step);
        let dst_offset = ctx.offset(dst_chunk, step);

        let read = src.read(src_offset, buf)?;
        let partial = read < block;
        if partial {
            if !allow_partial {
                return Err(MigrateError::ShortRead {
                    id: src.id().to_string(),
                    offset: src_offset,
                    expected: block,
                    got: read,
                });
            }
            buf[read..].fill(0);
        }

        let written = dst.write(dst_offset, buf)?;
        if written < block {
            return Err(MigrateError::ShortWrite {
                id: dst.id().to_string(),
                offset: dst_offset,
                expected: block,
                got: written,
            });
        }
        if partial {
            debug!(id = src.id(), offset = src_offset, read, "end of source reached");
            break;
        }
    }

    dst.sync()?;
    Ok(())
}

#[cfg(test)]
#[path = "migration_tests.rs"]
mod tests;
