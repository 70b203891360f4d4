// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrapper for consistent observability

use crate::lock_service::RemoteLockService;
use async_trait::async_trait;
use lb_core::{ClearOutcome, Locker, ObjectId, ServiceError, Watcher};
use std::time::Duration;
use tracing::Instrument;

/// Wrapper that adds tracing to any RemoteLockService
#[derive(Clone)]
pub struct TracedLockService<S> {
    inner: S,
}

impl<S> TracedLockService<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: RemoteLockService> RemoteLockService for TracedLockService<S> {
    async fn list_watchers(&self, object: &ObjectId) -> Result<Vec<Watcher>, ServiceError> {
        let span = tracing::info_span!("lock.list_watchers", object = %object);

        async {
            let start = std::time::Instant::now();
            let result = self.inner.list_watchers(object).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(watchers) => tracing::debug!(
                    count = watchers.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "listed watchers"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    code = e.code(),
                    error = %e,
                    "list watchers failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn blocklist_add(&self, address: &str, expire: Duration) -> Result<(), ServiceError> {
        let span = tracing::info_span!("lock.blocklist_add", address);

        async {
            tracing::info!(expire_secs = expire.as_secs(), "blocklisting");

            let start = std::time::Instant::now();
            let result = self.inner.blocklist_add(address, expire).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(()) => tracing::info!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    "address blocklisted"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    code = e.code(),
                    error = %e,
                    "blocklist failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn break_lock(
        &self,
        object: &ObjectId,
        locker: &Locker,
    ) -> Result<ClearOutcome, ServiceError> {
        let span = tracing::info_span!(
            "lock.break_lock",
            object = %object,
            entity = %locker.entity,
            cookie = %locker.cookie
        );

        async {
            let start = std::time::Instant::now();
            let result = self.inner.break_lock(object, locker).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(ClearOutcome::Cleared) => {
                    tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "lock cleared")
                }
                // Not an error: someone else already removed it
                Ok(ClearOutcome::NotFound) => tracing::info!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    "lock already gone"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    code = e.code(),
                    error = %e,
                    "break lock failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
