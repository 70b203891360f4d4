//! Status specs

use crate::prelude::*;

#[test]
fn status_shows_lock_and_watchers() {
    let project = Project::with_cluster(&live_holder_cluster());

    project.status().passes().stdout_eq(
        "rbd_header.abc
  lock: client.4125 \"auto 4125\" at 1.2.3.4:0/0
  watcher: 1.2.3.4:0/0 handle 123
  watcher: 5.6.7.8:0/0 handle 9
blocklist: empty
",
    );
}

#[test]
fn status_after_break_shows_blocklist() {
    let project = Project::with_cluster(&dead_holder_cluster());
    project.break_lock().passes();

    project
        .status()
        .passes()
        .stdout_has("  lock: none\n")
        .stdout_has("blocklist:\n  1.2.3.4:0/0 until ")
        .stdout_lacks("blocklist: empty");
}

#[test]
fn status_filters_by_object() {
    let snapshot = r#"{
  "objects": {
    "rbd_header.abc": { "watchers": [] },
    "rbd_header.def": { "watchers": [] }
  }
}"#;
    let project = Project::with_cluster(snapshot);

    let run = project.status().args(&["rbd_header.def"]).passes();

    assert!(run.stdout().starts_with("rbd_header.def\n"));
    assert!(!run.stdout().contains("rbd_header.abc"));
}

#[test]
fn status_unknown_object_fails() {
    let project = Project::with_cluster(&dead_holder_cluster());

    project
        .status()
        .args(&["rbd_header.zzz"])
        .fails()
        .stderr_has("object not found: rbd_header.zzz");
}

#[test]
fn expired_blocklist_entries_are_hidden() {
    let snapshot = r#"{
  "objects": {},
  "blocklist": { "9.9.9.9:0/0": "2000-01-01T00:00:00Z" }
}"#;
    let project = Project::with_cluster(snapshot);

    project.status().passes().stdout_eq("blocklist: empty\n");
}

#[test]
fn status_json_lists_objects() {
    let project = Project::with_cluster(&live_holder_cluster());

    let status = project.status().args(&["--format", "json"]).passes().stdout_json();

    assert_eq!(status["objects"][0]["object"], OBJECT);
    assert_eq!(status["objects"][0]["lock"]["entity"], ENTITY);
    assert_eq!(status["objects"][0]["watchers"][0]["handle"], HANDLE);
}
