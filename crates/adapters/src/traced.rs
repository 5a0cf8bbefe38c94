// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced target wrapper for consistent observability

use crate::target::{Target, TargetError};
use std::time::Instant;

/// Wrapper that adds tracing to any Target
pub struct TracedTarget<T> {
    inner: T,
}

impl<T> TracedTarget<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Target> Target for TracedTarget<T> {
    fn id(&self) -> &str {
        self.inner.id()
    }

    fn read(&self, offset: u64, buf: &mut [u8]) -> Result<usize, TargetError> {
        let span = tracing::trace_span!("target.read", id = self.inner.id(), offset);
        let _guard = span.enter();

        let result = self.inner.read(offset, buf);
        match &result {
            Ok(n) if *n < buf.len() => {
                tracing::debug!(requested = buf.len(), read = n, "short read")
            }
            Ok(_) => {}
            Err(e) => tracing::error!(error = %e, "read failed"),
        }
        result
    }

    fn write(&self, offset: u64, buf: &[u8]) -> Result<usize, TargetError> {
        let span = tracing::trace_span!("target.write", id = self.inner.id(), offset);
        let _guard = span.enter();

        let result = self.inner.write(offset, buf);
        match &result {
            Ok(n) if *n < buf.len() => {
                tracing::warn!(requested = buf.len(), written = n, "short write")
            }
            Ok(_) => {}
            Err(e) => tracing::error!(error = %e, "write failed"),
        }
        result
    }

    fn resize(&self, new_size: u64) -> Result<(), TargetError> {
        let span = tracing::info_span!("target.resize", id = self.inner.id(), new_size);
        let _guard = span.enter();

        let start = Instant::now();
        let result = self.inner.resize(new_size);
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(()) => tracing::debug!(elapsed_ms, "resized"),
            Err(e) => tracing::error!(elapsed_ms, error = %e, "resize failed"),
        }
        result
    }

    fn size(&self) -> Result<u64, TargetError> {
        let result = self.inner.size();
        tracing::trace!(id = self.inner.id(), size = ?result.as_ref().ok(), "queried size");
        result
    }

    fn sync(&self) -> Result<(), TargetError> {
        let span = tracing::debug_span!("target.sync", id = self.inner.id());
        let _guard = span.enter();

        let start = Instant::now();
        let result = self.inner.sync();
        match &result {
            Ok(()) => tracing::trace!(elapsed_ms = start.elapsed().as_millis() as u64, "synced"),
            Err(e) => tracing::error!(error = %e, "sync failed"),
        }
        result
    }

    fn supports_source(&self) -> bool {
        self.inner.supports_source()
    }

    fn supports_destination(&self) -> bool {
        self.inner.supports_destination()
    }

    fn close(&mut self) -> Result<(), TargetError> {
        let result = self.inner.close();
        match &result {
            Ok(()) => tracing::debug!(id = self.inner.id(), "closed"),
            Err(e) => tracing::warn!(id = self.inner.id(), error = %e, "close failed"),
        }
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
