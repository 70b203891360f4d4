//! Help output specs

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    let project = Project::with_cluster("{}");

    project
        .lockbreak()
        .args(&["--help"])
        .passes()
        .stdout_has("break")
        .stdout_has("status");
}

#[test]
fn break_help_lists_fencing_flags() {
    let project = Project::with_cluster("{}");

    project
        .lockbreak()
        .args(&["break", "--help"])
        .passes()
        .stdout_has("--force")
        .stdout_has("--no-blocklist")
        .stdout_has("--blocklist-expire")
        .stdout_has("--fail-next");
}
