// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pm-core: shared types for the partmigrate tool
//!
//! This crate provides:
//! - The job descriptor persisted at the head of every journal
//! - Run configuration and the derived job context
//! - Deterministic operation identifiers used for journal replay

pub mod config;
pub mod job;
pub mod op;

pub use config::{ConfigError, JobContext, MigrateConfig, MIB};
pub use job::{JobDescriptor, JobMismatch};
pub use op::{OpId, Stage};
