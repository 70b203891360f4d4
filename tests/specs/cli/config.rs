//! Configuration file specs

use crate::prelude::*;

#[test]
fn config_can_disable_blocklisting() {
    let project = Project::with_cluster(&dead_holder_cluster());
    project.file(
        "config/lockbreak/config.toml",
        "[break]\nblocklist_on_break = false\n",
    );

    project.break_lock().passes();

    assert!(!project.lock_present());
    assert!(!project.blocklisted(ADDRESS));
}

#[test]
fn explicit_config_path_is_used() {
    let project = Project::with_cluster(&dead_holder_cluster());
    project.file("custom.toml", "[break]\nblocklist_on_break = false\n");
    let config = project.path().join("custom.toml");

    project
        .break_lock()
        .args(&["--config", config.to_str().unwrap()])
        .passes();

    assert!(!project.blocklisted(ADDRESS));
}

#[test]
fn missing_explicit_config_fails() {
    let project = Project::with_cluster(&dead_holder_cluster());

    project
        .break_lock()
        .args(&["--config", "nope.toml"])
        .fails()
        .stderr_has("nope.toml");

    assert!(project.lock_present());
}

#[test]
fn unknown_config_key_fails() {
    let project = Project::with_cluster(&dead_holder_cluster());
    project.file("config/lockbreak/config.toml", "[break]\nblocklist = true\n");

    project.break_lock().fails().stderr_has("error:");
}
