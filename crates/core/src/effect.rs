// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effects and events for break attempt orchestration

use crate::breaker::BreakPhase;
use crate::error::BreakError;
use crate::locker::{Locker, ObjectId};
use serde::Serialize;
use std::time::Duration;

/// Effects are side effects the break state machine requests.
///
/// The remote-call effects each produce exactly one [`crate::BreakInput`]
/// when performed; `Emit` and `Complete` produce none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Query the liveness watch registry on the lock object
    ListWatchers { object: ObjectId },
    /// Add the holder's address to the cluster blocklist
    BlocklistAdd { address: String, expire: Duration },
    /// Clear the lock record held by `locker`
    BreakLock { object: ObjectId, locker: Locker },
    /// Emit an event for observers (logs, CLI output)
    Emit(Event),
    /// Deliver the attempt's single terminal result
    Complete(Result<(), BreakError>),
}

impl Effect {
    /// Whether performing this effect involves a remote call
    pub fn is_remote_call(&self) -> bool {
        matches!(
            self,
            Effect::ListWatchers { .. } | Effect::BlocklistAdd { .. } | Effect::BreakLock { .. }
        )
    }
}

/// Events emitted while a break attempt progresses
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    BreakStarted {
        attempt: String,
        object: String,
        entity: String,
        force: bool,
        fencing_enabled: bool,
    },
    /// A watcher matching the holder was found
    HolderAlive {
        attempt: String,
        address: String,
        handle: u64,
        /// The break continues anyway because it was forced
        forced: bool,
    },
    FencingSkipped {
        attempt: String,
        address: String,
    },
    HolderFenced {
        attempt: String,
        address: String,
        expire_secs: u64,
    },
    LockBroken {
        attempt: String,
        object: String,
        /// The lock record was already gone
        already_cleared: bool,
    },
    BreakFailed {
        attempt: String,
        phase: BreakPhase,
        reason: String,
    },
}

impl Event {
    /// Get the event name for pattern matching and log output
    pub fn name(&self) -> &'static str {
        match self {
            Event::BreakStarted { .. } => "break:started",
            Event::HolderAlive { .. } => "holder:alive",
            Event::FencingSkipped { .. } => "fencing:skipped",
            Event::HolderFenced { .. } => "holder:fenced",
            Event::LockBroken { .. } => "lock:broken",
            Event::BreakFailed { .. } => "break:failed",
        }
    }
}

#[cfg(test)]
#[path = "effect_tests.rs"]
mod tests;
