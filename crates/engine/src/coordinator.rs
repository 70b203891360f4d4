// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock break coordinator
//!
//! Runs [`BreakAttempt`] state machines against a lock service. Each attempt
//! is driven by one async loop: apply an input, perform the effects it asks
//! for, feed the single remote response back in. Nothing is shared between
//! attempts except the service handle.

use crate::completion::Completion;
use crate::executor::{Executed, Executor};
use lb_adapters::RemoteLockService;
use lb_core::{
    BreakAttempt, BreakError, BreakInput, BreakOptions, BreakPhase, IdGen, Locker, ObjectId,
    UuidIdGen,
};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::Instrument;

/// Breaks locks held by dead or unreachable holders
#[derive(Clone)]
pub struct LockBreakCoordinator<S, G = UuidIdGen> {
    executor: Executor<S>,
    id_gen: G,
}

impl<S: RemoteLockService> LockBreakCoordinator<S, UuidIdGen> {
    pub fn new(service: S) -> Self {
        Self::with_id_gen(service, UuidIdGen)
    }
}

impl<S, G> LockBreakCoordinator<S, G>
where
    S: RemoteLockService,
    G: IdGen + 'static,
{
    pub fn with_id_gen(service: S, id_gen: G) -> Self {
        Self {
            executor: Executor::new(service),
            id_gen,
        }
    }

    pub fn service(&self) -> &S {
        self.executor.service()
    }

    fn new_attempt(&self, object: ObjectId, locker: Locker, options: BreakOptions) -> BreakAttempt {
        BreakAttempt::new(self.id_gen.next(), object, locker, options)
    }

    /// Break the lock on `object` held by `locker` and wait for the result.
    ///
    /// Dropping the returned future abandons the attempt; a remote call
    /// already in flight still completes on the cluster.
    pub async fn attempt_break(
        &self,
        object: ObjectId,
        locker: Locker,
        options: BreakOptions,
    ) -> Result<(), BreakError> {
        let attempt = self.new_attempt(object, locker, options);
        let (tx, rx) = oneshot::channel();
        let completion = Completion::new(attempt.id.clone(), move |result| {
            let _ = tx.send(result);
        });

        drive(&self.executor, attempt, completion).await;

        // The completion guard always delivers, even when dropped
        rx.await.unwrap_or(Err(BreakError::Interrupted {
            phase: BreakPhase::Start,
        }))
    }

    /// Break the lock in a background task.
    ///
    /// `on_complete` runs exactly once with the attempt's result, on whichever
    /// runtime worker finishes the attempt.
    pub fn spawn_break<F>(
        &self,
        object: ObjectId,
        locker: Locker,
        options: BreakOptions,
        on_complete: F,
    ) -> JoinHandle<()>
    where
        F: FnOnce(Result<(), BreakError>) + Send + 'static,
    {
        let attempt = self.new_attempt(object, locker, options);
        let completion = Completion::new(attempt.id.clone(), on_complete);
        let executor = self.executor.clone();

        tokio::spawn(async move { drive(&executor, attempt, completion).await })
    }
}

async fn drive<S: RemoteLockService>(
    executor: &Executor<S>,
    attempt: BreakAttempt,
    mut completion: Completion,
) {
    let span = tracing::info_span!(
        "attempt",
        id = %attempt.id,
        object = %attempt.object,
        entity = %attempt.locker.entity
    );

    async move {
        let mut attempt = attempt;
        let mut input = BreakInput::Start;

        loop {
            let (next, effects) = attempt.transition(input);
            attempt = next;
            completion.track(attempt.phase);

            let mut reply = None;
            for effect in effects {
                match executor.execute(effect).await {
                    Executed::Input(response) => reply = Some(response),
                    Executed::Complete(result) => {
                        completion.fire(result);
                    }
                    Executed::Nothing => {}
                }
            }

            if attempt.is_terminal() {
                break;
            }

            match reply {
                Some(response) => input = response,
                None => {
                    tracing::error!(phase = %attempt.phase, "no remote call issued");
                    completion.fire(Err(BreakError::Interrupted {
                        phase: attempt.phase,
                    }));
                    break;
                }
            }
        }
    }
    .instrument(span)
    .await
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
