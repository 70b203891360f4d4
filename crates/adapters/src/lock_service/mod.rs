// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote lock service adapters

mod memory;

pub use memory::{
    ClusterState, LockRecord, MemoryLockService, ObjectState, SnapshotError,
    DEFAULT_BLOCKLIST_EXPIRE,
};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeLockService, LockServiceCall};

use async_trait::async_trait;
use lb_core::{ClearOutcome, Locker, ObjectId, ServiceError, Watcher};
use std::time::Duration;

/// Cluster operations needed to break a lock.
///
/// Every call is independent and may fail on its own; callers sequence them.
#[async_trait]
pub trait RemoteLockService: Clone + Send + Sync + 'static {
    /// List the liveness watchers registered on an object
    async fn list_watchers(&self, object: &ObjectId) -> Result<Vec<Watcher>, ServiceError>;

    /// Add an address to the cluster blocklist.
    ///
    /// Idempotent: adding an address already present succeeds. A zero
    /// `expire` uses the cluster's default expiry.
    async fn blocklist_add(&self, address: &str, expire: Duration) -> Result<(), ServiceError>;

    /// Clear the lock on `object` held by exactly `locker` (entity and cookie).
    ///
    /// Returns [`ClearOutcome::NotFound`] when no such lock is held.
    async fn break_lock(
        &self,
        object: &ObjectId,
        locker: &Locker,
    ) -> Result<ClearOutcome, ServiceError>;
}

/// The three remote operations, for failure injection and call accounting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockServiceOp {
    ListWatchers,
    BlocklistAdd,
    BreakLock,
}

impl LockServiceOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockServiceOp::ListWatchers => "list_watchers",
            LockServiceOp::BlocklistAdd => "blocklist_add",
            LockServiceOp::BreakLock => "break_lock",
        }
    }
}

impl std::fmt::Display for LockServiceOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LockServiceOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "list_watchers" => Ok(LockServiceOp::ListWatchers),
            "blocklist_add" => Ok(LockServiceOp::BlocklistAdd),
            "break_lock" => Ok(LockServiceOp::BreakLock),
            other => Err(format!(
                "unknown operation '{other}' (expected list_watchers, blocklist_add or break_lock)"
            )),
        }
    }
}
