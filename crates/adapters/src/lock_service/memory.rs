// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process model of the cluster's lock facilities
//!
//! Holds per-object lock records and watch registries plus the cluster-wide
//! blocklist. State is plain serde data so it can be snapshotted to JSON and
//! reloaded, which is how the CLI persists a cluster between invocations.

use super::{LockServiceOp, RemoteLockService};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lb_core::{Clock, ClearOutcome, EntityName, Locker, ObjectId, ServiceError, SystemClock, Watcher};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

/// Blocklist expiry used when a caller passes zero
pub const DEFAULT_BLOCKLIST_EXPIRE: Duration = Duration::from_secs(60 * 60);

/// Errors reading or writing a cluster snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to access snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Exclusive lock record on an object
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockRecord {
    pub entity: EntityName,
    pub cookie: String,
    pub address: String,
}

impl LockRecord {
    fn is_held_by(&self, locker: &Locker) -> bool {
        self.entity == locker.entity && self.cookie == locker.cookie
    }
}

/// Lock and watch state of one object
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock: Option<LockRecord>,
    #[serde(default)]
    pub watchers: Vec<Watcher>,
}

/// Whole-cluster state
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterState {
    #[serde(default)]
    pub objects: BTreeMap<ObjectId, ObjectState>,
    /// Blocklisted address -> expiry
    #[serde(default)]
    pub blocklist: BTreeMap<String, DateTime<Utc>>,
}

impl ClusterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a lock held by `locker`, with the holder watching the object
    pub fn with_lock(mut self, object: &ObjectId, locker: &Locker) -> Self {
        let entry = self.objects.entry(object.clone()).or_default();
        entry.lock = Some(LockRecord {
            entity: locker.entity.clone(),
            cookie: locker.cookie.clone(),
            address: locker.address.clone(),
        });
        let watcher = Watcher::new(locker.address.clone(), locker.handle);
        if !entry.watchers.contains(&watcher) {
            entry.watchers.push(watcher);
        }
        self
    }

    /// Register an additional watcher on an object
    pub fn with_watcher(mut self, object: &ObjectId, watcher: Watcher) -> Self {
        self.objects
            .entry(object.clone())
            .or_default()
            .watchers
            .push(watcher);
        self
    }

    /// Drop a watcher, as when its session ends
    pub fn remove_watcher(&mut self, object: &ObjectId, watcher: &Watcher) {
        if let Some(entry) = self.objects.get_mut(object) {
            entry.watchers.retain(|w| w != watcher);
        }
    }

    pub fn is_blocklisted(&self, address: &str, now: DateTime<Utc>) -> bool {
        self.blocklist
            .get(address)
            .is_some_and(|expires| *expires > now)
    }

    /// Remove blocklist entries that have expired
    pub fn prune_blocklist(&mut self, now: DateTime<Utc>) {
        self.blocklist.retain(|_, expires| *expires > now);
    }
}

/// In-memory [`RemoteLockService`] backed by a [`ClusterState`]
#[derive(Clone)]
pub struct MemoryLockService<C: Clock = SystemClock> {
    state: Arc<Mutex<ClusterState>>,
    failures: Arc<Mutex<HashMap<LockServiceOp, ServiceError>>>,
    clock: C,
    default_expire: Duration,
}

impl MemoryLockService<SystemClock> {
    pub fn new(state: ClusterState) -> Self {
        Self::with_clock(state, SystemClock)
    }

    /// Load a cluster snapshot from a JSON file
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let text = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let state: ClusterState = serde_json::from_str(&text)?;
        Ok(Self::new(state))
    }
}

impl<C: Clock> MemoryLockService<C> {
    pub fn with_clock(state: ClusterState, clock: C) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            failures: Arc::new(Mutex::new(HashMap::new())),
            clock,
            default_expire: DEFAULT_BLOCKLIST_EXPIRE,
        }
    }

    pub fn with_default_expire(mut self, expire: Duration) -> Self {
        self.default_expire = expire;
        self
    }

    /// Make the next call of `op` fail with `error`, once
    pub fn fail_next(&self, op: LockServiceOp, error: ServiceError) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(op, error);
    }

    /// Current state with expired blocklist entries removed
    pub fn snapshot(&self) -> ClusterState {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.prune_blocklist(self.clock.now());
        state.clone()
    }

    /// Write the current state to a JSON file
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        let json = serde_json::to_string_pretty(&self.snapshot())?;
        std::fs::write(path, json).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Mutate the state directly (test and CLI setup)
    pub fn update(&self, f: impl FnOnce(&mut ClusterState)) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut state);
    }

    /// Lock record currently held on `object`
    pub fn lock_record(&self, object: &ObjectId) -> Option<LockRecord> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.objects.get(object).and_then(|o| o.lock.clone())
    }

    pub fn is_blocklisted(&self, address: &str) -> bool {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.is_blocklisted(address, self.clock.now())
    }

    /// Register a liveness watch on `object` from `watcher.address`.
    ///
    /// A blocklisted client is refused, so a fenced holder cannot show up
    /// as alive again until its entry expires.
    pub fn watch(&self, object: &ObjectId, watcher: Watcher) -> Result<(), ServiceError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        authorize(&state, &watcher.address, self.clock.now())?;

        let entry = state
            .objects
            .get_mut(object)
            .ok_or_else(|| ServiceError::ObjectNotFound(object.to_string()))?;
        if !entry.watchers.contains(&watcher) {
            entry.watchers.push(watcher);
        }
        Ok(())
    }

    fn take_failure(&self, op: LockServiceOp) -> Result<(), ServiceError> {
        let failure = self
            .failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&op);
        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Reject operations from blocklisted addresses
fn authorize(state: &ClusterState, address: &str, now: DateTime<Utc>) -> Result<(), ServiceError> {
    if state.is_blocklisted(address, now) {
        return Err(ServiceError::PermissionDenied(format!(
            "{address} is blocklisted"
        )));
    }
    Ok(())
}

#[async_trait]
impl<C: Clock + 'static> RemoteLockService for MemoryLockService<C> {
    async fn list_watchers(&self, object: &ObjectId) -> Result<Vec<Watcher>, ServiceError> {
        self.take_failure(LockServiceOp::ListWatchers)?;

        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state
            .objects
            .get(object)
            .map(|o| o.watchers.clone())
            .ok_or_else(|| ServiceError::ObjectNotFound(object.to_string()))
    }

    async fn blocklist_add(&self, address: &str, expire: Duration) -> Result<(), ServiceError> {
        self.take_failure(LockServiceOp::BlocklistAdd)?;

        if address.is_empty() {
            return Err(ServiceError::InvalidArgument(
                "blocklist address is empty".to_string(),
            ));
        }

        let expire = if expire.is_zero() {
            self.default_expire
        } else {
            expire
        };
        let expires_at = self.clock.after(expire);

        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.blocklist.insert(address.to_string(), expires_at);
        // A blocklisted client loses its watches everywhere
        for entry in state.objects.values_mut() {
            entry.watchers.retain(|w| w.address != address);
        }
        Ok(())
    }

    async fn break_lock(
        &self,
        object: &ObjectId,
        locker: &Locker,
    ) -> Result<ClearOutcome, ServiceError> {
        self.take_failure(LockServiceOp::BreakLock)?;

        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let Some(entry) = state.objects.get_mut(object) else {
            return Ok(ClearOutcome::NotFound);
        };

        match &entry.lock {
            Some(record) if record.is_held_by(locker) => {
                entry.lock = None;
                Ok(ClearOutcome::Cleared)
            }
            _ => Ok(ClearOutcome::NotFound),
        }
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
