//! Error reporting specs

use crate::prelude::*;

#[test]
fn indivisible_chunk_is_rejected_before_anything_is_opened() {
    let project = Project::empty();

    project
        .pm()
        .args(&["--chunk", "100", "--copy-chunk", "30", "vg0/old", "vg0/new"])
        .fails()
        .stderr_has("not divisible")
        .stderr_has("evenly divides --chunk");
    assert!(!project.exists(JOURNAL));
}

#[test]
fn zero_copy_chunk_is_rejected() {
    let project = Project::empty();

    project
        .pm()
        .args(&["--copy-chunk", "0", "vg0/old", "vg0/new"])
        .fails()
        .stderr_has("copy chunk size must be greater than zero");
    assert!(!project.exists(JOURNAL));
}

#[test]
fn missing_lvm_tools_are_reported() {
    let project = Project::empty();

    project
        .pm()
        .args(&["vg0/old", "vg0/new"])
        .fails()
        .stderr_has("cannot open logical volume 'vg0/old'")
        .stderr_has("Install lvm2");

    // The journal was opened but no job was recorded
    assert_eq!(project.read(JOURNAL), "INFO Partmigrate starting\n");
}

#[test]
fn dry_run_never_creates_a_journal() {
    let project = Project::empty();

    project
        .pm()
        .args(&["--dry-run", "vg0/old", "vg0/new"])
        .fails()
        .stdout_is_empty()
        .stderr_has("cannot open logical volume");
    assert!(!project.exists(JOURNAL));
}
