// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Lockbreak execution engine
//!
//! Drives break attempts against a [`lb_adapters::RemoteLockService`].

mod completion;
mod coordinator;
mod executor;

pub use completion::Completion;
pub use coordinator::LockBreakCoordinator;
pub use executor::{Executed, Executor};
