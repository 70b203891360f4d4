// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exactly-once delivery of a break attempt's result

use lb_core::{BreakError, BreakPhase};

type Sink = Box<dyn FnOnce(Result<(), BreakError>) + Send + 'static>;

/// Guard around the caller's completion sink.
///
/// The sink runs at most once through [`Completion::fire`]; later calls are
/// dropped with a warning. If the guard is dropped before firing, the sink
/// receives [`BreakError::Interrupted`] naming the last phase reached, so the
/// caller always hears back exactly once.
pub struct Completion {
    attempt: String,
    phase: BreakPhase,
    sink: Option<Sink>,
}

impl Completion {
    pub fn new<F>(attempt: impl Into<String>, sink: F) -> Self
    where
        F: FnOnce(Result<(), BreakError>) + Send + 'static,
    {
        Self {
            attempt: attempt.into(),
            phase: BreakPhase::Start,
            sink: Some(Box::new(sink)),
        }
    }

    /// Record the phase the attempt has reached
    pub fn track(&mut self, phase: BreakPhase) {
        self.phase = phase;
    }

    pub fn is_fired(&self) -> bool {
        self.sink.is_none()
    }

    /// Deliver `result`. Returns false if a result was already delivered.
    pub fn fire(&mut self, result: Result<(), BreakError>) -> bool {
        match self.sink.take() {
            Some(sink) => {
                sink(result);
                true
            }
            None => {
                tracing::warn!(
                    attempt = %self.attempt,
                    phase = %self.phase,
                    ok = result.is_ok(),
                    "dropping duplicate completion"
                );
                false
            }
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if let Some(sink) = self.sink.take() {
            tracing::warn!(
                attempt = %self.attempt,
                phase = %self.phase,
                "break attempt ended without a result"
            );
            sink(Err(BreakError::Interrupted { phase: self.phase }));
        }
    }
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion")
            .field("attempt", &self.attempt)
            .field("phase", &self.phase)
            .field("fired", &self.is_fired())
            .finish()
    }
}
