// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Break attempt identifiers
//!
//! Every attempt gets an id so its log lines can be correlated across the
//! three remote calls it makes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Hex digits kept from a random UUID
const ATTEMPT_ID_LEN: usize = 12;

/// Source of attempt ids
pub trait IdGen: Clone + Send + Sync {
    fn next(&self) -> String;
}

/// Random ids, short enough to read in a log line
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidIdGen;

impl IdGen for UuidIdGen {
    fn next(&self) -> String {
        let mut id = uuid::Uuid::new_v4().simple().to_string();
        id.truncate(ATTEMPT_ID_LEN);
        id
    }
}

/// `<prefix>-1`, `<prefix>-2`, ... shared by all clones
#[derive(Clone, Debug)]
pub struct SequentialIdGen {
    prefix: Arc<str>,
    issued: Arc<AtomicU64>,
}

impl SequentialIdGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Arc::from(prefix.into()),
            issued: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl Default for SequentialIdGen {
    fn default() -> Self {
        Self::new("break")
    }
}

impl IdGen for SequentialIdGen {
    fn next(&self) -> String {
        let n = self.issued.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{n}", self.prefix)
    }
}
