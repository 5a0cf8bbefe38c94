// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Durable operation journal
//!
//! ```text
//! JOB {...}     job identity, written once
//! INFO <text>   notes, skipped on replay
//! OP <token>    one line per completed operation
//! ```
//!
//! Lines are only ever appended. A resumed run replays the file from the
//! start and skips every operation already recorded as complete.

mod journal;
mod record;

pub use journal::{Journal, JournalError, Mode, Performed};
pub use record::{JournalRecord, RecordError};
