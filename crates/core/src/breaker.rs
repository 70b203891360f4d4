// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Break attempt state machine
//!
//! Breaking a lock held by a possibly-dead holder takes three remote calls,
//! strictly in order:
//!
//! 1. list the object's liveness watchers and refuse to continue while the
//!    holder is still watching (unless forced);
//! 2. blocklist the holder's address so it can never write again (unless
//!    fencing is disabled);
//! 3. clear the lock record naming the exact holder and cookie.
//!
//! [`BreakAttempt::transition`] is pure: it consumes one [`BreakInput`] and
//! returns the next attempt plus the effects to perform. Each remote-call
//! effect yields exactly one input back, so at most one call is in flight.

use crate::effect::{Effect, Event};
use crate::error::BreakError;
use crate::locker::{Locker, ObjectId, Watcher};
use crate::service::{ClearOutcome, ServiceError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Caller-controlled policy for one break attempt
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakOptions {
    /// Blocklist the holder before clearing the lock
    pub fencing_enabled: bool,
    /// Break even if the holder still has a matching watcher
    pub force: bool,
    /// How long the blocklist entry lasts; zero means the cluster default
    #[serde(with = "humantime_serde")]
    pub blocklist_expire: Duration,
}

impl Default for BreakOptions {
    fn default() -> Self {
        Self {
            fencing_enabled: true,
            force: false,
            blocklist_expire: Duration::ZERO,
        }
    }
}

impl BreakOptions {
    pub fn with_fencing(mut self, enabled: bool) -> Self {
        self.fencing_enabled = enabled;
        self
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_blocklist_expire(mut self, expire: Duration) -> Self {
        self.blocklist_expire = expire;
        self
    }
}

/// Protocol phase of a break attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakPhase {
    Start,
    ListWatchers,
    Blocklist,
    ClearLock,
    Done,
    Failed,
}

impl BreakPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            BreakPhase::Start => "start",
            BreakPhase::ListWatchers => "list_watchers",
            BreakPhase::Blocklist => "blocklist",
            BreakPhase::ClearLock => "clear_lock",
            BreakPhase::Done => "done",
            BreakPhase::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BreakPhase::Done | BreakPhase::Failed)
    }
}

impl std::fmt::Display for BreakPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs that advance a break attempt
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BreakInput {
    /// Begin the attempt
    Start,
    /// Response to [`Effect::ListWatchers`]
    WatchersListed(Result<Vec<Watcher>, ServiceError>),
    /// Response to [`Effect::BlocklistAdd`]
    Blocklisted(Result<(), ServiceError>),
    /// Response to [`Effect::BreakLock`]
    LockCleared(Result<ClearOutcome, ServiceError>),
}

impl BreakInput {
    pub fn name(&self) -> &'static str {
        match self {
            BreakInput::Start => "start",
            BreakInput::WatchersListed(_) => "watchers_listed",
            BreakInput::Blocklisted(_) => "blocklisted",
            BreakInput::LockCleared(_) => "lock_cleared",
        }
    }
}

/// One invocation of the break protocol for a single lock holder
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BreakAttempt {
    pub id: String,
    pub object: ObjectId,
    pub locker: Locker,
    pub options: BreakOptions,
    pub phase: BreakPhase,
}

impl BreakAttempt {
    pub fn new(
        id: impl Into<String>,
        object: ObjectId,
        locker: Locker,
        options: BreakOptions,
    ) -> Self {
        Self {
            id: id.into(),
            object,
            locker,
            options,
            phase: BreakPhase::Start,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Pure state transition function.
    ///
    /// Inputs that do not answer the call issued by the current phase are
    /// ignored: the attempt comes back unchanged with no effects. Terminal
    /// phases ignore everything, so `Effect::Complete` is produced once.
    pub fn transition(&self, input: BreakInput) -> (BreakAttempt, Vec<Effect>) {
        let mut next = self.clone();
        let mut effects = Vec::new();

        match (self.phase, input) {
            (BreakPhase::Start, BreakInput::Start) => {
                effects.push(Effect::Emit(Event::BreakStarted {
                    attempt: self.id.clone(),
                    object: self.object.0.clone(),
                    entity: self.locker.entity.0.clone(),
                    force: self.options.force,
                    fencing_enabled: self.options.fencing_enabled,
                }));
                next.phase = BreakPhase::ListWatchers;
                effects.push(Effect::ListWatchers {
                    object: self.object.clone(),
                });
            }

            (BreakPhase::ListWatchers, BreakInput::WatchersListed(Err(source))) => {
                next.fail(BreakPhase::ListWatchers, source, &mut effects);
            }

            (BreakPhase::ListWatchers, BreakInput::WatchersListed(Ok(watchers))) => {
                if self.locker.is_alive_in(&watchers) {
                    effects.push(Effect::Emit(Event::HolderAlive {
                        attempt: self.id.clone(),
                        address: self.locker.address.clone(),
                        handle: self.locker.handle,
                        forced: self.options.force,
                    }));

                    if !self.options.force {
                        let err = BreakError::HolderStillActive {
                            entity: self.locker.entity.clone(),
                            address: self.locker.address.clone(),
                        };
                        next.phase = BreakPhase::Failed;
                        effects.push(Effect::Emit(Event::BreakFailed {
                            attempt: self.id.clone(),
                            phase: BreakPhase::ListWatchers,
                            reason: err.to_string(),
                        }));
                        effects.push(Effect::Complete(Err(err)));
                        return (next, effects);
                    }
                }

                if self.options.fencing_enabled {
                    next.phase = BreakPhase::Blocklist;
                    effects.push(Effect::BlocklistAdd {
                        address: self.locker.address.clone(),
                        expire: self.options.blocklist_expire,
                    });
                } else {
                    effects.push(Effect::Emit(Event::FencingSkipped {
                        attempt: self.id.clone(),
                        address: self.locker.address.clone(),
                    }));
                    next.clear_lock(&mut effects);
                }
            }

            (BreakPhase::Blocklist, BreakInput::Blocklisted(Err(source))) => {
                // The lock stays in place: a holder we failed to fence must
                // not be able to resurface against a cleared lock.
                next.fail(BreakPhase::Blocklist, source, &mut effects);
            }

            (BreakPhase::Blocklist, BreakInput::Blocklisted(Ok(()))) => {
                effects.push(Effect::Emit(Event::HolderFenced {
                    attempt: self.id.clone(),
                    address: self.locker.address.clone(),
                    expire_secs: self.options.blocklist_expire.as_secs(),
                }));
                next.clear_lock(&mut effects);
            }

            (BreakPhase::ClearLock, BreakInput::LockCleared(Ok(outcome))) => {
                next.lock_broken(outcome == ClearOutcome::NotFound, &mut effects);
            }

            // ENOENT from the clear means the lock is already gone
            (
                BreakPhase::ClearLock,
                BreakInput::LockCleared(Err(ServiceError::ObjectNotFound(_))),
            ) => {
                next.lock_broken(true, &mut effects);
            }

            (BreakPhase::ClearLock, BreakInput::LockCleared(Err(source))) => {
                next.fail(BreakPhase::ClearLock, source, &mut effects);
            }

            _ => {
                // Out of phase or after completion, ignore
            }
        }

        (next, effects)
    }

    fn clear_lock(&mut self, effects: &mut Vec<Effect>) {
        self.phase = BreakPhase::ClearLock;
        effects.push(Effect::BreakLock {
            object: self.object.clone(),
            locker: self.locker.clone(),
        });
    }

    fn lock_broken(&mut self, already_cleared: bool, effects: &mut Vec<Effect>) {
        self.phase = BreakPhase::Done;
        effects.push(Effect::Emit(Event::LockBroken {
            attempt: self.id.clone(),
            object: self.object.0.clone(),
            already_cleared,
        }));
        effects.push(Effect::Complete(Ok(())));
    }

    fn fail(&mut self, phase: BreakPhase, source: ServiceError, effects: &mut Vec<Effect>) {
        self.phase = BreakPhase::Failed;
        effects.push(Effect::Emit(Event::BreakFailed {
            attempt: self.id.clone(),
            phase,
            reason: source.to_string(),
        }));
        effects.push(Effect::Complete(Err(BreakError::Transport { phase, source })));
    }
}

#[cfg(test)]
#[path = "breaker_tests.rs"]
mod tests;
