// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `lockbreak status`

use crate::output::{self, OutputFormat};
use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use clap::Args;
use lb_adapters::{ClusterState, LockRecord, MemoryLockService};
use lb_core::{ObjectId, Watcher};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

#[derive(Args)]
pub struct StatusArgs {
    /// Only show this object
    pub object: Option<String>,

    /// Cluster snapshot (JSON)
    #[arg(long)]
    pub cluster: PathBuf,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct ObjectStatus {
    object: ObjectId,
    lock: Option<LockRecord>,
    watchers: Vec<Watcher>,
}

#[derive(Debug, Serialize)]
struct BlocklistEntry {
    address: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct StatusReport {
    objects: Vec<ObjectStatus>,
    blocklist: Vec<BlocklistEntry>,
}

impl StatusReport {
    fn new(state: ClusterState, only: Option<&ObjectId>) -> Self {
        let objects = state
            .objects
            .into_iter()
            .filter(|(id, _)| only.map_or(true, |o| o == id))
            .map(|(object, entry)| ObjectStatus {
                object,
                lock: entry.lock,
                watchers: entry.watchers,
            })
            .collect();
        let blocklist = state
            .blocklist
            .into_iter()
            .map(|(address, expires_at)| BlocklistEntry {
                address,
                expires_at,
            })
            .collect();
        Self { objects, blocklist }
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for status in &self.objects {
            writeln!(f, "{}", status.object)?;
            match &status.lock {
                Some(lock) => writeln!(
                    f,
                    "  lock: {} {:?} at {}",
                    lock.entity, lock.cookie, lock.address
                )?,
                None => writeln!(f, "  lock: none")?,
            }
            for watcher in &status.watchers {
                writeln!(f, "  watcher: {watcher}")?;
            }
        }
        if self.blocklist.is_empty() {
            writeln!(f, "blocklist: empty")?;
        } else {
            writeln!(f, "blocklist:")?;
            for entry in &self.blocklist {
                writeln!(
                    f,
                    "  {} until {}",
                    entry.address,
                    entry.expires_at.format("%Y-%m-%dT%H:%M:%SZ")
                )?;
            }
        }
        Ok(())
    }
}

pub fn handle(args: StatusArgs) -> anyhow::Result<()> {
    let service = MemoryLockService::load(&args.cluster)
        .with_context(|| format!("loading cluster {}", args.cluster.display()))?;
    let state = service.snapshot();

    let only = args.object.map(ObjectId::new);
    if let Some(object) = &only {
        if !state.objects.contains_key(object) {
            bail!("object not found: {object}");
        }
    }

    output::print(&StatusReport::new(state, only.as_ref()), args.format);
    Ok(())
}
