// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Chunked migration engine
//!
//! Moves every byte of a source target onto a destination target while both
//! are resized chunk by chunk, so the two may share underlying storage. Each
//! resize and chunk copy is a journaled operation, which makes the whole
//! migration resumable after a crash at any point.

mod error;
mod migration;
pub mod plan;

pub use error::MigrateError;
pub use migration::{Migration, MigrationReport};
pub use plan::{Side, Step};
