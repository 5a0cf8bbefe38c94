// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operation identifiers
//!
//! Every journaled operation is named by a token that is a pure function of
//! its stage, kind, target ids and chunk indices. A resumed run derives the
//! same tokens in the same order, which is what lets replay match them
//! positionally against the journal.

use std::fmt;

/// Algorithm stage an operation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Copy chunks off the source in reverse order
    Move,
    /// Resizes around the in-place reorder
    Reorder,
    /// Rotation step 1: chunk into the spare slot
    ReorderPark,
    /// Rotation step 2: mirror chunk into the freed slot
    ReorderFill,
    /// Rotation step 3: spare slot into the mirror slot
    ReorderRestore,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Move => "move",
            Stage::Reorder => "reorder",
            Stage::ReorderPark => "reorder-1",
            Stage::ReorderFill => "reorder-2",
            Stage::ReorderRestore => "reorder-3",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A journaled operation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OpId {
    /// Resize `target` to `chunks` whole chunks
    Resize {
        stage: Stage,
        target: String,
        chunks: u64,
    },
    /// Copy one chunk between (possibly identical) targets
    MoveChunk {
        stage: Stage,
        src: String,
        src_chunk: u64,
        dst: String,
        dst_chunk: u64,
    },
}

impl OpId {
    pub fn resize(stage: Stage, target: &str, chunks: u64) -> Self {
        OpId::Resize {
            stage,
            target: target.to_string(),
            chunks,
        }
    }

    pub fn move_chunk(stage: Stage, src: &str, src_chunk: u64, dst: &str, dst_chunk: u64) -> Self {
        OpId::MoveChunk {
            stage,
            src: src.to_string(),
            src_chunk,
            dst: dst.to_string(),
            dst_chunk,
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            OpId::Resize { stage, .. } | OpId::MoveChunk { stage, .. } => *stage,
        }
    }

    /// The token written after `OP ` in the journal
    pub fn token(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for OpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpId::Resize {
                stage,
                target,
                chunks,
            } => write!(f, "{stage} resize {target} {chunks}"),
            OpId::MoveChunk {
                stage,
                src,
                src_chunk,
                dst,
                dst_chunk,
            } => write!(f, "{stage} move_chunk {src} {src_chunk} {dst} {dst_chunk}"),
        }
    }
}

#[cfg(test)]
#[path = "op_tests.rs"]
mod tests;
