//! CLI error specs

use crate::prelude::*;

#[test]
fn missing_cluster_file_fails() {
    let project = Project::with_cluster("{}");
    std::fs::remove_file(project.cluster_path()).unwrap();

    project
        .break_lock()
        .fails()
        .stderr_has("error: loading cluster");
}

#[test]
fn corrupt_cluster_file_fails() {
    let project = Project::with_cluster("not json");

    project.status().fails().stderr_has("error: loading cluster");
}

#[test]
fn missing_required_flag_is_usage_error() {
    let project = Project::with_cluster(&dead_holder_cluster());

    project
        .lockbreak()
        .args(&["break", OBJECT, "--entity", ENTITY])
        .exits(2)
        .stderr_has("--cookie");
}
