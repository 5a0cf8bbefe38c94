// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The migration's operation sequence
//!
//! ```text
//! source [0 1 2 3]          dest []
//! move:     dest [3 2 1 0]          (source drained back to front)
//! reorder:  dest [3 2 1 0 E] -> [0 1 2 3 E] -> [0 1 2 3]
//! ```
//!
//! The move stage grows the destination by one chunk, copies the source's
//! last remaining chunk into it, then shrinks the source by that chunk. The
//! reorder stage swaps each mirrored pair through a spare slot `E`, so every
//! chunk always has a complete copy on storage.
//!
//! The sequence depends only on the chunk count, which is what lets a
//! resumed run line up with the journal.

use pm_core::{OpId, Stage};

/// Which of the two targets a step acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Dest,
}

/// One journaled step of the migration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Resize a target to a whole number of chunks
    Resize { stage: Stage, side: Side, chunks: u64 },
    /// Copy one chunk
    Move {
        stage: Stage,
        src: Side,
        src_chunk: u64,
        dst: Side,
        dst_chunk: u64,
        /// A short read is tolerated (the source's ragged last chunk)
        allow_partial: bool,
    },
}

impl Step {
    /// Journal identifier, given the ids of the two targets
    pub fn op_id(&self, source_id: &str, dest_id: &str) -> OpId {
        let id = |side: Side| match side {
            Side::Source => source_id,
            Side::Dest => dest_id,
        };
        match *self {
            Step::Resize {
                stage,
                side,
                chunks,
            } => OpId::resize(stage, id(side), chunks),
            Step::Move {
                stage,
                src,
                src_chunk,
                dst,
                dst_chunk,
                ..
            } => OpId::move_chunk(stage, id(src), src_chunk, id(dst), dst_chunk),
        }
    }
}

/// Index of the chunk mirroring `c` in a run of `chunks`
fn mirror(chunks: u64, c: u64) -> u64 {
    chunks - c - 1
}

/// Copy the source onto the destination in reverse chunk order
pub fn move_steps(chunks: u64) -> Vec<Step> {
    let mut steps = Vec::new();
    for c in 0..chunks {
        steps.push(Step::Resize {
            stage: Stage::Move,
            side: Side::Dest,
            chunks: c + 1,
        });
        steps.push(Step::Move {
            stage: Stage::Move,
            src: Side::Source,
            src_chunk: mirror(chunks, c),
            dst: Side::Dest,
            dst_chunk: c,
            allow_partial: c == 0,
        });
        // The source keeps its first chunk: a volume cannot shrink to nothing
        if c + 1 < chunks {
            steps.push(Step::Resize {
                stage: Stage::Move,
                side: Side::Source,
                chunks: chunks - c - 1,
            });
        }
    }
    steps
}

/// Restore the destination's chunk order in place using one spare chunk
pub fn reorder_steps(chunks: u64) -> Vec<Step> {
    let spare = chunks;
    let rotate = |stage, src_chunk, dst_chunk| Step::Move {
        stage,
        src: Side::Dest,
        src_chunk,
        dst: Side::Dest,
        dst_chunk,
        allow_partial: false,
    };

    let mut steps = vec![Step::Resize {
        stage: Stage::Reorder,
        side: Side::Dest,
        chunks: chunks + 1,
    }];
    // An odd middle chunk is already in place
    for c in 0..chunks / 2 {
        let r = mirror(chunks, c);
        steps.push(rotate(Stage::ReorderPark, c, spare));
        steps.push(rotate(Stage::ReorderFill, r, c));
        steps.push(rotate(Stage::ReorderRestore, spare, r));
    }
    steps.push(Step::Resize {
        stage: Stage::Reorder,
        side: Side::Dest,
        chunks,
    });
    steps
}

/// The full migration for `chunks` chunks
pub fn steps(chunks: u64) -> Vec<Step> {
    let mut steps = move_steps(chunks);
    steps.extend(reorder_steps(chunks));
    steps
}

#[cfg(test)]
#[path = "plan_tests.rs"]
mod tests;
