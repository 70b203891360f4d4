// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Break attempt failure classification

use crate::breaker::BreakPhase;
use crate::locker::EntityName;
use crate::service::ServiceError;
use thiserror::Error;

/// `-EAGAIN`: the holder is alive, try again later
pub const HOLDER_ACTIVE_CODE: i32 = -11;

/// Terminal failure of a break attempt
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BreakError {
    /// The liveness check found the holder still watching the object.
    /// Expected outcome rather than a fault.
    #[error("lock holder {entity} at {address} is still active")]
    HolderStillActive { entity: EntityName, address: String },

    /// A remote call failed; `source` is exactly what the service reported
    #[error("{phase} failed: {source}")]
    Transport {
        phase: BreakPhase,
        #[source]
        source: ServiceError,
    },

    /// The attempt stopped before reaching a terminal phase (its driver
    /// was dropped, or produced no further call)
    #[error("break attempt interrupted in {phase}")]
    Interrupted { phase: BreakPhase },
}

impl BreakError {
    /// Whether the caller may reasonably retry the break later
    pub fn is_retryable(&self) -> bool {
        matches!(self, BreakError::HolderStillActive { .. })
    }

    /// Phase the attempt was in when it stopped
    pub fn phase(&self) -> BreakPhase {
        match self {
            BreakError::HolderStillActive { .. } => BreakPhase::ListWatchers,
            BreakError::Transport { phase, .. } | BreakError::Interrupted { phase } => *phase,
        }
    }

    /// Negative errno-style code; transport failures keep the service's code
    pub fn code(&self) -> i32 {
        match self {
            BreakError::HolderStillActive { .. } => HOLDER_ACTIVE_CODE,
            BreakError::Transport { source, .. } => source.code(),
            BreakError::Interrupted { .. } => -4,
        }
    }
}
