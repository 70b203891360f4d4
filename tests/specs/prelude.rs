//! Shared helpers for CLI specs

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const OBJECT: &str = "rbd_header.abc";
pub const ENTITY: &str = "client.4125";
pub const COOKIE: &str = "auto 4125";
pub const ADDRESS: &str = "1.2.3.4:0/0";
pub const HANDLE: u64 = 123;

/// Exit status when the holder is still alive
pub const EXIT_HOLDER_ACTIVE: i32 = 75;

/// Snapshot with a lock whose holder has stopped watching the object
pub fn dead_holder_cluster() -> String {
    cluster(&[("5.6.7.8:0/0", 9)])
}

/// Snapshot with a lock whose holder still watches the object
pub fn live_holder_cluster() -> String {
    cluster(&[(ADDRESS, HANDLE), ("5.6.7.8:0/0", 9)])
}

/// Snapshot with the object present but no lock on it
pub fn unlocked_cluster() -> String {
    format!(r#"{{ "objects": {{ "{OBJECT}": {{ "watchers": [] }} }} }}"#)
}

fn cluster(watchers: &[(&str, u64)]) -> String {
    let watchers: Vec<String> = watchers
        .iter()
        .map(|(address, handle)| format!(r#"{{ "address": "{address}", "handle": {handle} }}"#))
        .collect();
    format!(
        r#"{{
  "objects": {{
    "{OBJECT}": {{
      "lock": {{ "entity": "{ENTITY}", "cookie": "{COOKIE}", "address": "{ADDRESS}" }},
      "watchers": [{}]
    }}
  }}
}}"#,
        watchers.join(", ")
    )
}

/// Temp directory holding a cluster snapshot and an isolated config home
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn with_cluster(snapshot: &str) -> Self {
        let project = Self {
            dir: TempDir::new().unwrap(),
        };
        project.file("cluster.json", snapshot);
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn cluster_path(&self) -> PathBuf {
        self.path().join("cluster.json")
    }

    pub fn file(&self, rel: &str, contents: &str) {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
    }

    /// Snapshot as currently saved
    pub fn cluster_json(&self) -> serde_json::Value {
        let text = std::fs::read_to_string(self.cluster_path()).unwrap();
        serde_json::from_str(&text).unwrap()
    }

    pub fn lock_present(&self) -> bool {
        !self.cluster_json()["objects"][OBJECT]["lock"].is_null()
    }

    pub fn blocklisted(&self, address: &str) -> bool {
        !self.cluster_json()["blocklist"][address].is_null()
    }

    /// `lockbreak` with config lookup confined to this project
    pub fn lockbreak(&self) -> Cli {
        let mut cmd = Command::cargo_bin("lockbreak").unwrap();
        cmd.current_dir(self.path())
            .env("XDG_CONFIG_HOME", self.path().join("config"))
            .env("RUST_LOG", "warn");
        Cli { cmd }
    }

    /// `lockbreak break` for the standard holder against this snapshot
    pub fn break_lock(&self) -> Cli {
        let cluster = self.cluster_path();
        let handle = HANDLE.to_string();
        self.lockbreak().args(&[
            "break",
            OBJECT,
            "--entity",
            ENTITY,
            "--cookie",
            COOKIE,
            "--address",
            ADDRESS,
            "--handle",
            handle.as_str(),
            "--cluster",
            cluster.to_str().unwrap(),
        ])
    }

    /// `lockbreak status` against this snapshot
    pub fn status(&self) -> Cli {
        let cluster = self.cluster_path();
        self.lockbreak()
            .args(&["status", "--cluster", cluster.to_str().unwrap()])
    }
}

pub struct Cli {
    cmd: Command,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    fn run(mut self) -> Run {
        let output = self.cmd.output().unwrap();
        Run {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }

    /// Run and require exit status 0
    pub fn passes(self) -> Run {
        self.exits(0)
    }

    /// Run and require exit status 1
    pub fn fails(self) -> Run {
        self.exits(1)
    }

    pub fn exits(self, code: i32) -> Run {
        let run = self.run();
        assert_eq!(
            run.code,
            Some(code),
            "unexpected exit status\nstdout:\n{}\nstderr:\n{}",
            run.stdout,
            run.stderr
        );
        run
    }
}

pub struct Run {
    code: Option<i32>,
    stdout: String,
    stderr: String,
}

impl Run {
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stdout_json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout).unwrap()
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout, expected);
        self
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(
            self.stdout.contains(needle),
            "stdout missing {needle:?}:\n{}",
            self.stdout
        );
        self
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        assert!(
            !self.stdout.contains(needle),
            "stdout should not contain {needle:?}:\n{}",
            self.stdout
        );
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(
            self.stderr.contains(needle),
            "stderr missing {needle:?}:\n{}",
            self.stderr
        );
        self
    }
}
