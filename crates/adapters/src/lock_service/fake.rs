// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake lock service for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{LockServiceOp, RemoteLockService};
use async_trait::async_trait;
use lb_core::{ClearOutcome, Locker, ObjectId, ServiceError, Watcher};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Recorded lock service call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockServiceCall {
    ListWatchers { object: ObjectId },
    BlocklistAdd { address: String, expire: Duration },
    BreakLock { object: ObjectId, locker: Locker },
}

impl LockServiceCall {
    pub fn op(&self) -> LockServiceOp {
        match self {
            LockServiceCall::ListWatchers { .. } => LockServiceOp::ListWatchers,
            LockServiceCall::BlocklistAdd { .. } => LockServiceOp::BlocklistAdd,
            LockServiceCall::BreakLock { .. } => LockServiceOp::BreakLock,
        }
    }
}

struct FakeState {
    calls: Vec<LockServiceCall>,
    watchers: Result<Vec<Watcher>, ServiceError>,
    blocklist: Result<(), ServiceError>,
    clear: Result<ClearOutcome, ServiceError>,
    latency: Option<Duration>,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            watchers: Ok(Vec::new()),
            blocklist: Ok(()),
            clear: Ok(ClearOutcome::Cleared),
            latency: None,
        }
    }
}

/// Scripted lock service with call recording.
///
/// Every call succeeds by default: no watchers, blocklist accepted, lock cleared.
#[derive(Clone, Default)]
pub struct FakeLockService {
    state: Arc<Mutex<FakeState>>,
}

impl FakeLockService {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut FakeState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut state)
    }

    /// Watchers returned by `list_watchers`
    pub fn set_watchers(&self, watchers: Vec<Watcher>) {
        self.with_state(|s| s.watchers = Ok(watchers));
    }

    pub fn fail_list_watchers(&self, error: ServiceError) {
        self.with_state(|s| s.watchers = Err(error));
    }

    pub fn fail_blocklist(&self, error: ServiceError) {
        self.with_state(|s| s.blocklist = Err(error));
    }

    pub fn fail_break_lock(&self, error: ServiceError) {
        self.with_state(|s| s.clear = Err(error));
    }

    /// Make `break_lock` report that the lock was already gone
    pub fn set_lock_missing(&self) {
        self.with_state(|s| s.clear = Ok(ClearOutcome::NotFound));
    }

    /// Delay every response, so completions resume on a timer wakeup
    pub fn set_latency(&self, latency: Duration) {
        self.with_state(|s| s.latency = Some(latency));
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<LockServiceCall> {
        self.with_state(|s| s.calls.clone())
    }

    /// Operations called, in order
    pub fn ops(&self) -> Vec<LockServiceOp> {
        self.with_state(|s| s.calls.iter().map(LockServiceCall::op).collect())
    }

    async fn respond<T>(
        &self,
        call: LockServiceCall,
        pick: impl FnOnce(&FakeState) -> Result<T, ServiceError>,
    ) -> Result<T, ServiceError> {
        let (latency, response) = self.with_state(|s| {
            s.calls.push(call);
            (s.latency, pick(s))
        });
        match latency {
            Some(latency) => tokio::time::sleep(latency).await,
            None => tokio::task::yield_now().await,
        }
        response
    }
}

#[async_trait]
impl RemoteLockService for FakeLockService {
    async fn list_watchers(&self, object: &ObjectId) -> Result<Vec<Watcher>, ServiceError> {
        self.respond(
            LockServiceCall::ListWatchers {
                object: object.clone(),
            },
            |s| s.watchers.clone(),
        )
        .await
    }

    async fn blocklist_add(&self, address: &str, expire: Duration) -> Result<(), ServiceError> {
        self.respond(
            LockServiceCall::BlocklistAdd {
                address: address.to_string(),
                expire,
            },
            |s| s.blocklist.clone(),
        )
        .await
    }

    async fn break_lock(
        &self,
        object: &ObjectId,
        locker: &Locker,
    ) -> Result<ClearOutcome, ServiceError> {
        self.respond(
            LockServiceCall::BreakLock {
                object: object.clone(),
                locker: locker.clone(),
            },
            |s| s.clear.clone(),
        )
        .await
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
