// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! lb-core: Core library for the lockbreak fencing protocol
//!
//! This crate provides:
//! - Value types describing a lock object, its holder, and liveness watchers
//! - The pure break-attempt state machine and the effects it requests
//! - Error taxonomy shared by the engine and adapters
//! - TOML-backed break configuration

pub mod clock;
pub mod id;

pub mod breaker;
pub mod config;
pub mod effect;
pub mod error;
pub mod locker;
pub mod service;
pub mod traced;

// Re-exports
pub use breaker::{BreakAttempt, BreakInput, BreakOptions, BreakPhase};
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{BreakConfig, ConfigError, LogConfig, LockbreakConfig};
pub use effect::{Effect, Event};
pub use error::BreakError;
pub use id::{IdGen, SequentialIdGen, UuidIdGen};
pub use locker::{EntityName, Locker, ObjectId, Watcher};
pub use service::{ClearOutcome, ServiceError};
pub use traced::TracedEffect;
