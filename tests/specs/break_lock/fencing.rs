//! Break specs: the fencing decision
//!
//! A dead holder is blocklisted before its lock is cleared; a live holder is
//! left alone unless the break is forced.

use crate::prelude::*;

#[test]
fn dead_holder_is_fenced_and_lock_cleared() {
    let project = Project::with_cluster(&dead_holder_cluster());

    project
        .break_lock()
        .passes()
        .stdout_eq("broke lock on rbd_header.abc held by client.4125\n1.2.3.4:0/0 is blocklisted\n");

    assert!(!project.lock_present());
    assert!(project.blocklisted(ADDRESS));
}

#[test]
fn live_holder_is_not_touched() {
    let project = Project::with_cluster(&live_holder_cluster());

    project
        .break_lock()
        .exits(EXIT_HOLDER_ACTIVE)
        .stdout_eq(
            "lock on rbd_header.abc not broken: lock holder client.4125 at 1.2.3.4:0/0 is still active\n",
        );

    assert!(project.lock_present());
    assert!(!project.blocklisted(ADDRESS));
}

#[test]
fn forced_break_fences_live_holder() {
    let project = Project::with_cluster(&live_holder_cluster());

    project
        .break_lock()
        .args(&["--force"])
        .passes()
        .stdout_has("is blocklisted");

    assert!(!project.lock_present());
    assert!(project.blocklisted(ADDRESS));
    // Fencing drops every watch the holder had
    let watchers = &project.cluster_json()["objects"][OBJECT]["watchers"];
    assert_eq!(watchers.as_array().unwrap().len(), 1);
}

#[test]
fn no_blocklist_clears_without_fencing() {
    let project = Project::with_cluster(&dead_holder_cluster());

    project
        .break_lock()
        .args(&["--no-blocklist"])
        .passes()
        .stdout_eq("broke lock on rbd_header.abc held by client.4125\n");

    assert!(!project.lock_present());
    assert!(!project.blocklisted(ADDRESS));
}

#[test]
fn lock_already_gone_is_success() {
    let project = Project::with_cluster(&unlocked_cluster());

    project
        .break_lock()
        .passes()
        .stdout_has("broke lock on rbd_header.abc");
}

#[test]
fn second_break_is_idempotent() {
    let project = Project::with_cluster(&dead_holder_cluster());

    project.break_lock().passes();
    project.break_lock().passes();

    assert!(!project.lock_present());
}

#[test]
fn blocklist_expire_sets_entry_lifetime() {
    let short = Project::with_cluster(&dead_holder_cluster());
    let long = Project::with_cluster(&dead_holder_cluster());

    short.break_lock().args(&["--blocklist-expire", "10m"]).passes();
    long.break_lock().args(&["--blocklist-expire", "2h"]).passes();

    // RFC 3339 UTC timestamps order lexically
    let expiry = |project: &Project| {
        project.cluster_json()["blocklist"][ADDRESS]
            .as_str()
            .unwrap()
            .to_string()
    };
    assert!(expiry(&short) < expiry(&long));
}

#[test]
fn json_report_describes_outcome() {
    let project = Project::with_cluster(&live_holder_cluster());

    let run = project
        .break_lock()
        .args(&["--format", "json"])
        .exits(EXIT_HOLDER_ACTIVE);
    let report = run.stdout_json();

    assert_eq!(report["outcome"], "holder_active");
    assert_eq!(report["code"], -11);
    assert_eq!(report["fenced"], false);
    assert_eq!(report["phase"], "list_watchers");
    assert_eq!(report["object"], OBJECT);
}

#[test]
fn earlier_blocklist_entry_is_not_reported_as_fencing() {
    let mut snapshot: serde_json::Value = serde_json::from_str(&live_holder_cluster()).unwrap();
    snapshot["blocklist"][ADDRESS] = "2999-01-01T00:00:00Z".into();
    let project = Project::with_cluster(&snapshot.to_string());

    project
        .break_lock()
        .exits(EXIT_HOLDER_ACTIVE)
        .stdout_lacks("is blocklisted");
}
