// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Types crossing the remote lock service boundary

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reported by the remote lock service.
///
/// These are carried through the break protocol unchanged; the coordinator
/// never retries or reinterprets them.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum ServiceError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("object not found: {0}")]
    ObjectNotFound(String),
    #[error("not connected: {0}")]
    NotConnected(String),
    #[error("timed out: {0}")]
    TimedOut(String),
    #[error("service error {code}: {message}")]
    Other { code: i32, message: String },
}

impl ServiceError {
    /// Negative errno-style code for this error
    pub fn code(&self) -> i32 {
        match self {
            ServiceError::InvalidArgument(_) => -22,
            ServiceError::PermissionDenied(_) => -13,
            ServiceError::ObjectNotFound(_) => -2,
            ServiceError::NotConnected(_) => -107,
            ServiceError::TimedOut(_) => -110,
            ServiceError::Other { code, .. } => *code,
        }
    }

    /// Build an error from a short kind name, as used on the command line
    /// (`einval`, `eacces`, `enoent`, `enotconn`, `etimedout`).
    pub fn from_kind(kind: &str, message: impl Into<String>) -> Option<Self> {
        let message = message.into();
        let err = match kind {
            "einval" | "invalid_argument" => ServiceError::InvalidArgument(message),
            "eacces" | "eperm" | "permission_denied" => ServiceError::PermissionDenied(message),
            "enoent" | "object_not_found" => ServiceError::ObjectNotFound(message),
            "enotconn" | "not_connected" => ServiceError::NotConnected(message),
            "etimedout" | "timed_out" => ServiceError::TimedOut(message),
            _ => return None,
        };
        Some(err)
    }
}

/// Result of asking the service to clear a lock record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearOutcome {
    /// The named holder's lock record was removed
    Cleared,
    /// No lock record is held by the named holder
    NotFound,
}
