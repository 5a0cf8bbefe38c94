//! Help and argument parsing specs

use crate::prelude::*;

#[test]
fn help_lists_options_and_defaults() {
    let project = Project::empty();

    project
        .pm()
        .args(&["--help"])
        .passes()
        .stdout_has("<SOURCE>")
        .stdout_has("<DESTINATION>")
        .stdout_has("--chunk <MIB>")
        .stdout_has("[default: 1024]")
        .stdout_has("--copy-chunk <MIB>")
        .stdout_has("[default: 64]")
        .stdout_has("--log <PATH>")
        .stdout_has("[default: partmigrate.log]")
        .stdout_has("--dry-run");
}

#[test]
fn version_is_printed() {
    Project::empty()
        .pm()
        .args(&["--version"])
        .passes()
        .stdout_has("partmigrate 0.1.0");
}

#[test]
fn both_volumes_are_required() {
    let project = Project::empty();

    project
        .pm()
        .args(&["vg0/old"])
        .exits(2)
        .stderr_has("<DESTINATION>");
    assert!(!project.exists(JOURNAL));
}

#[test]
fn quiet_and_verbose_conflict() {
    Project::empty()
        .pm()
        .args(&["-q", "-v", "vg0/old", "vg0/new"])
        .exits(2)
        .stderr_has("cannot be used with");
}
