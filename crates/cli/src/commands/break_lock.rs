// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `lockbreak break`

use crate::output::{self, OutputFormat};
use anyhow::Context;
use clap::Args;
use lb_adapters::{LockServiceOp, MemoryLockService, TracedLockService};
use lb_core::{BreakConfig, BreakError, BreakOptions, BreakPhase, Locker, ObjectId, ServiceError};
use lb_engine::LockBreakCoordinator;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

/// `EX_TEMPFAIL`: the holder is alive, try again later
pub const EXIT_HOLDER_ACTIVE: u8 = 75;

#[derive(Args)]
pub struct BreakArgs {
    /// Lock object name
    pub object: String,

    /// Entity holding the lock (e.g. client.4125)
    #[arg(long)]
    pub entity: String,

    /// Lock cookie naming the holder's lock instance
    #[arg(long)]
    pub cookie: String,

    /// Holder's network address (e.g. 1.2.3.4:0/0)
    #[arg(long)]
    pub address: String,

    /// Holder's watch handle
    #[arg(long)]
    pub handle: u64,

    /// Break even if the holder still has a live watch
    #[arg(long)]
    pub force: bool,

    /// Clear the lock without blocklisting the holder
    #[arg(long)]
    pub no_blocklist: bool,

    /// Blocklist entry lifetime, e.g. "30m" (0 = cluster default)
    #[arg(long, value_parser = humantime::parse_duration)]
    pub blocklist_expire: Option<Duration>,

    /// Cluster snapshot (JSON), updated in place
    #[arg(long)]
    pub cluster: PathBuf,

    /// Fail the next call of an operation, e.g. blocklist_add=eacces
    #[arg(long = "fail-next", value_name = "OP=ERR", value_parser = parse_fail_next)]
    pub fail_next: Vec<FailNext>,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

/// Injected failure for one operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailNext {
    pub op: LockServiceOp,
    pub error: ServiceError,
}

fn parse_fail_next(s: &str) -> Result<FailNext, String> {
    let (op, kind) = s
        .split_once('=')
        .ok_or_else(|| format!("expected OP=ERR, got '{s}'"))?;
    let op: LockServiceOp = op.trim().parse()?;
    let kind = kind.trim();
    let error = ServiceError::from_kind(kind, format!("injected {kind} on {op}"))
        .ok_or_else(|| format!("unknown error kind '{kind}'"))?;
    Ok(FailNext { op, error })
}

#[derive(Debug, Serialize)]
struct BreakReport {
    object: String,
    entity: String,
    address: String,
    outcome: &'static str,
    /// This attempt blocklisted the holder
    fenced: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    phase: Option<BreakPhase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    code: i32,
}

impl BreakReport {
    fn new(args: &BreakArgs, result: &Result<(), BreakError>, options: &BreakOptions) -> Self {
        let (outcome, phase, error, code) = match result {
            Ok(()) => ("broken", None, None, 0),
            Err(e) if e.is_retryable() => {
                ("holder_active", Some(e.phase()), Some(e.to_string()), e.code())
            }
            Err(e) => ("failed", Some(e.phase()), Some(e.to_string()), e.code()),
        };
        // The clear is only reached once fencing has succeeded
        let fenced = options.fencing_enabled
            && phase.map_or(true, |p| p == BreakPhase::ClearLock);
        Self {
            object: args.object.clone(),
            entity: args.entity.clone(),
            address: args.address.clone(),
            outcome,
            fenced,
            phase,
            error,
            code,
        }
    }

    fn exit_status(&self) -> u8 {
        match self.outcome {
            "broken" => 0,
            "holder_active" => EXIT_HOLDER_ACTIVE,
            _ => 1,
        }
    }
}

impl fmt::Display for BreakReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            None => writeln!(
                f,
                "broke lock on {} held by {}",
                self.object, self.entity
            )?,
            Some(error) => writeln!(f, "lock on {} not broken: {}", self.object, error)?,
        }
        if self.fenced {
            writeln!(f, "{} is blocklisted", self.address)?;
        }
        Ok(())
    }
}

/// Merge command-line overrides into the configured policy
fn break_policy(args: &BreakArgs, config: &BreakConfig) -> BreakConfig {
    let mut policy = config.clone();
    if args.no_blocklist {
        policy = policy.with_blocklist_on_break(false);
    }
    if let Some(expire) = args.blocklist_expire {
        policy = policy.with_blocklist_expire(expire);
    }
    policy
}

pub async fn handle(args: BreakArgs, config: &BreakConfig) -> anyhow::Result<ExitCode> {
    let service = MemoryLockService::load(&args.cluster)
        .with_context(|| format!("loading cluster {}", args.cluster.display()))?;
    for fail in &args.fail_next {
        tracing::debug!(op = %fail.op, code = fail.error.code(), "injecting failure");
        service.fail_next(fail.op, fail.error.clone());
    }

    let options = break_policy(&args, config).options(args.force);
    let locker = Locker::new(
        args.entity.as_str(),
        args.cookie.as_str(),
        args.address.as_str(),
        args.handle,
    );
    let coordinator = LockBreakCoordinator::new(TracedLockService::new(service.clone()));
    let result = coordinator
        .attempt_break(ObjectId::new(args.object.as_str()), locker, options.clone())
        .await;

    // Fencing may have landed even when the attempt failed afterwards
    service
        .save(&args.cluster)
        .with_context(|| format!("saving cluster {}", args.cluster.display()))?;

    let report = BreakReport::new(&args, &result, &options);
    output::print(&report, args.format);
    Ok(ExitCode::from(report.exit_status()))
}

#[cfg(test)]
#[path = "break_lock_tests.rs"]
mod tests;
