// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock holder identity and liveness watchers
//!
//! A [`Locker`] describes who holds a lock on an object. A [`Watcher`] is one
//! entry of the object's liveness watch registry. The holder is alive while a
//! watcher with the same address and handle is still registered.

use serde::{Deserialize, Serialize};

/// Name of the object that carries the lock record
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identity of the session that acquired a lock (e.g. `client.4121`)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityName(pub String);

impl EntityName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl std::fmt::Display for EntityName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The current holder of an exclusive lock
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locker {
    /// Session that acquired the lock
    pub entity: EntityName,
    /// Tag distinguishing this acquisition (e.g. `auto 123`)
    pub cookie: String,
    /// Network locator, used for liveness correlation and blocklisting
    pub address: String,
    /// Watch handle registered by the holder
    pub handle: u64,
}

impl Locker {
    pub fn new(
        entity: impl Into<String>,
        cookie: impl Into<String>,
        address: impl Into<String>,
        handle: u64,
    ) -> Self {
        Self {
            entity: EntityName::new(entity),
            cookie: cookie.into(),
            address: address.into(),
            handle,
        }
    }

    /// Whether `watcher` belongs to this holder.
    ///
    /// Several sessions can share an address, so both the address and the
    /// handle must match.
    pub fn is_watched_by(&self, watcher: &Watcher) -> bool {
        watcher.address == self.address && watcher.handle == self.handle
    }

    /// Whether any of `watchers` belongs to this holder
    pub fn is_alive_in(&self, watchers: &[Watcher]) -> bool {
        watchers.iter().any(|w| self.is_watched_by(w))
    }
}

impl std::fmt::Display for Locker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({:?}) at {} handle {}",
            self.entity, self.cookie, self.address, self.handle
        )
    }
}

/// One registered liveness watch on an object
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watcher {
    pub address: String,
    pub handle: u64,
}

impl Watcher {
    pub fn new(address: impl Into<String>, handle: u64) -> Self {
        Self {
            address: address.into(),
            handle,
        }
    }
}

impl std::fmt::Display for Watcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} handle {}", self.address, self.handle)
    }
}

#[cfg(test)]
#[path = "locker_tests.rs"]
mod tests;
