// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effect executor

use lb_adapters::RemoteLockService;
use lb_core::{BreakError, BreakInput, Effect, Event, TracedEffect};

/// What performing one effect produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Executed {
    /// A remote call answered; feed this back into the attempt
    Input(BreakInput),
    /// The attempt delivered its terminal result
    Complete(Result<(), BreakError>),
    /// Nothing to feed back
    Nothing,
}

/// Executes break effects using the configured lock service
#[derive(Clone)]
pub struct Executor<S> {
    service: S,
}

impl<S: RemoteLockService> Executor<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Execute a single effect with tracing
    pub async fn execute(&self, effect: Effect) -> Executed {
        if effect.is_remote_call() {
            tracing::debug!(effect = effect.name(), fields = ?effect.fields(), "executing");
        }

        match effect {
            Effect::ListWatchers { object } => {
                Executed::Input(BreakInput::WatchersListed(
                    self.service.list_watchers(&object).await,
                ))
            }

            Effect::BlocklistAdd { address, expire } => Executed::Input(BreakInput::Blocklisted(
                self.service.blocklist_add(&address, expire).await,
            )),

            Effect::BreakLock { object, locker } => Executed::Input(BreakInput::LockCleared(
                self.service.break_lock(&object, &locker).await,
            )),

            Effect::Emit(event) => {
                log_event(&event);
                Executed::Nothing
            }

            Effect::Complete(result) => Executed::Complete(result),
        }
    }
}

fn log_event(event: &Event) {
    let name = event.name();
    match event {
        Event::BreakStarted {
            force,
            fencing_enabled,
            ..
        } => tracing::info!(event = name, force, fencing_enabled, "break started"),
        Event::HolderAlive {
            address,
            handle,
            forced,
            ..
        } => {
            if *forced {
                tracing::warn!(event = name, address = %address, handle, "holder alive, forcing break")
            } else {
                tracing::info!(event = name, address = %address, handle, "holder still alive")
            }
        }
        Event::FencingSkipped { address, .. } => {
            tracing::warn!(event = name, address = %address, "blocklisting disabled, not fencing holder")
        }
        Event::HolderFenced {
            address,
            expire_secs,
            ..
        } => tracing::info!(event = name, address = %address, expire_secs, "holder fenced"),
        Event::LockBroken {
            already_cleared, ..
        } => tracing::info!(event = name, already_cleared, "lock broken"),
        Event::BreakFailed { phase, reason, .. } => {
            tracing::warn!(event = name, phase = %phase, reason = %reason, "break failed")
        }
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
