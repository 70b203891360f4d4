//! Break specs: remote call failures
//!
//! Errors from the cluster are reported unchanged, and a failed fence never
//! lets the lock be cleared.

use crate::prelude::*;

#[test]
fn blocklist_failure_keeps_lock() {
    let project = Project::with_cluster(&dead_holder_cluster());

    project
        .break_lock()
        .args(&["--fail-next", "blocklist_add=eacces"])
        .fails()
        .stdout_eq(
            "lock on rbd_header.abc not broken: blocklist failed: permission denied: injected eacces on blocklist_add\n",
        );

    assert!(project.lock_present());
    assert!(!project.blocklisted(ADDRESS));
}

#[test]
fn list_watchers_failure_is_reported_with_code() {
    let project = Project::with_cluster(&dead_holder_cluster());

    let run = project
        .break_lock()
        .args(&["--fail-next", "list_watchers=etimedout", "--format", "json"])
        .fails();
    let report = run.stdout_json();

    assert_eq!(report["outcome"], "failed");
    assert_eq!(report["code"], -110);
    assert!(project.lock_present());
}

#[test]
fn clear_failure_after_fencing_leaves_holder_blocklisted() {
    let project = Project::with_cluster(&dead_holder_cluster());

    project
        .break_lock()
        .args(&["--fail-next", "break_lock=enotconn"])
        .fails()
        .stdout_has("clear_lock failed: not connected")
        .stdout_has("1.2.3.4:0/0 is blocklisted");

    assert!(project.lock_present());
    assert!(project.blocklisted(ADDRESS));
}

#[test]
fn enoent_from_clear_is_success() {
    let project = Project::with_cluster(&dead_holder_cluster());

    let run = project
        .break_lock()
        .args(&["--fail-next", "break_lock=enoent", "--format", "json"])
        .passes();
    let report = run.stdout_json();

    assert_eq!(report["outcome"], "broken");
    assert_eq!(report["code"], 0);
}

#[test]
fn missing_object_is_a_failure() {
    let project = Project::with_cluster(r#"{ "objects": {} }"#);

    project
        .break_lock()
        .fails()
        .stdout_has("list_watchers failed: object not found: rbd_header.abc");
}

#[test]
fn malformed_fail_next_is_rejected() {
    let project = Project::with_cluster(&dead_holder_cluster());

    project
        .break_lock()
        .args(&["--fail-next", "blocklist_add=ebusy"])
        .exits(2)
        .stderr_has("unknown error kind 'ebusy'");

    assert!(project.lock_present());
}
