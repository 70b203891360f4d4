// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing infrastructure for break effects

use crate::effect::Effect;

/// Trait for operations that should be traced
///
/// Provides consistent naming and structured fields for logging.
pub trait TracedEffect {
    /// Effect name for log spans (e.g., "list_watchers", "blocklist_add")
    fn name(&self) -> &'static str;

    /// Key-value pairs for structured logging
    fn fields(&self) -> Vec<(&'static str, String)>;
}

impl TracedEffect for Effect {
    fn name(&self) -> &'static str {
        match self {
            Effect::ListWatchers { .. } => "list_watchers",
            Effect::BlocklistAdd { .. } => "blocklist_add",
            Effect::BreakLock { .. } => "break_lock",
            Effect::Emit(_) => "emit",
            Effect::Complete(_) => "complete",
        }
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Effect::ListWatchers { object } => vec![("object", object.to_string())],
            Effect::BlocklistAdd { address, expire } => vec![
                ("address", address.clone()),
                ("expire_secs", expire.as_secs().to_string()),
            ],
            Effect::BreakLock { object, locker } => vec![
                ("object", object.to_string()),
                ("entity", locker.entity.to_string()),
                ("cookie", locker.cookie.clone()),
            ],
            Effect::Emit(event) => vec![("event", event.name().to_string())],
            Effect::Complete(result) => match result {
                Ok(()) => vec![("result", "ok".to_string())],
                Err(e) => vec![("result", "err".to_string()), ("error", e.to_string())],
            },
        }
    }
}
