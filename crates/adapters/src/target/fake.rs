// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory target for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{Target, TargetError};
use std::sync::{Arc, Mutex};

/// Recorded target call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetCall {
    Read { offset: u64, len: usize },
    Write { offset: u64, len: usize },
    Resize { size: u64 },
    Sync,
}

#[derive(Default)]
struct MemState {
    data: Vec<u8>,
    calls: Vec<TargetCall>,
    mutations: u64,
    fail_after: Option<u64>,
    fail_close: bool,
    closed: bool,
}

/// In-memory target for testing.
///
/// Clones share the same bytes, so a clone kept by the test observes what
/// the engine did and survives a simulated crash between runs.
#[derive(Clone)]
pub struct MemTarget {
    id: String,
    state: Arc<Mutex<MemState>>,
    source: bool,
    destination: bool,
}

impl MemTarget {
    pub fn new(id: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            id: id.into(),
            state: Arc::new(Mutex::new(MemState {
                data,
                ..MemState::default()
            })),
            source: true,
            destination: true,
        }
    }

    /// Restrict the roles this target reports it can play
    pub fn with_roles(mut self, source: bool, destination: bool) -> Self {
        self.source = source;
        self.destination = destination;
        self
    }

    /// Fail every write or resize after `n` more have succeeded
    pub fn fail_after(&self, n: u64) {
        let mut state = self.lock();
        state.fail_after = Some(state.mutations + n);
    }

    pub fn clear_fault(&self) {
        self.lock().fail_after = None;
    }

    /// Make `close` fail; the target is still marked closed
    pub fn fail_close(&self) {
        self.lock().fail_close = true;
    }

    /// Current contents
    pub fn contents(&self) -> Vec<u8> {
        self.lock().data.clone()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<TargetCall> {
        self.lock().calls.clone()
    }

    /// Number of successful writes and resizes
    pub fn mutations(&self) -> u64 {
        self.lock().mutations
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn injected(&self, op: &'static str) -> TargetError {
        TargetError::Io {
            id: self.id.clone(),
            op,
            source: std::io::Error::other("injected fault"),
        }
    }
}

impl MemState {
    fn begin_mutation(&mut self) -> bool {
        if self.fail_after.is_some_and(|limit| self.mutations >= limit) {
            return false;
        }
        self.mutations += 1;
        true
    }
}

impl Target for MemTarget {
    fn id(&self) -> &str {
        &self.id
    }

    fn read(&self, offset: u64, buf: &mut [u8]) -> Result<usize, TargetError> {
        let mut state = self.lock();
        state.calls.push(TargetCall::Read {
            offset,
            len: buf.len(),
        });

        let len = state.data.len();
        let start = usize::try_from(offset).unwrap_or(usize::MAX).min(len);
        let end = start.saturating_add(buf.len()).min(len);
        let n = end - start;
        buf[..n].copy_from_slice(&state.data[start..end]);
        Ok(n)
    }

    fn write(&self, offset: u64, buf: &[u8]) -> Result<usize, TargetError> {
        let mut state = self.lock();
        state.calls.push(TargetCall::Write {
            offset,
            len: buf.len(),
        });
        if !state.begin_mutation() {
            return Err(self.injected("write"));
        }

        // Like a block device, writes past the end are cut short
        let len = state.data.len();
        let start = usize::try_from(offset).unwrap_or(usize::MAX).min(len);
        let end = start.saturating_add(buf.len()).min(len);
        let n = end - start;
        state.data[start..end].copy_from_slice(&buf[..n]);
        Ok(n)
    }

    fn resize(&self, new_size: u64) -> Result<(), TargetError> {
        let mut state = self.lock();
        state.calls.push(TargetCall::Resize { size: new_size });
        if !state.begin_mutation() {
            return Err(self.injected("resize"));
        }
        let new_len = usize::try_from(new_size).map_err(|_| TargetError::Io {
            id: self.id.clone(),
            op: "resize",
            source: std::io::Error::other("size exceeds address space"),
        })?;
        state.data.resize(new_len, 0);
        Ok(())
    }

    fn size(&self) -> Result<u64, TargetError> {
        Ok(self.lock().data.len() as u64)
    }

    fn sync(&self) -> Result<(), TargetError> {
        self.lock().calls.push(TargetCall::Sync);
        Ok(())
    }

    fn supports_source(&self) -> bool {
        self.source
    }

    fn supports_destination(&self) -> bool {
        self.destination
    }

    fn close(&mut self) -> Result<(), TargetError> {
        let mut state = self.lock();
        state.closed = true;
        if state.fail_close {
            drop(state);
            return Err(self.injected("close"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
