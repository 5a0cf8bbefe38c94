//! Journal handling on startup
//!
//! A journal that cannot be trusted stops the run before any volume is
//! opened, and is left exactly as it was found.

use crate::prelude::*;
use fs2::FileExt;

const JOB: &str = r#"JOB {"source_id":"/dev/vg0/old","dest_id":"/dev/vg0/new","source_size":4096,"chunk":1048576}"#;

#[test]
fn torn_record_is_fatal() {
    let project = Project::empty();
    let contents = format!("INFO Partmigrate starting\n{JOB}");
    project.file(JOURNAL, &contents);

    project
        .pm()
        .args(&["vg0/old", "vg0/new"])
        .fails()
        .stderr_has("cannot use journal partmigrate.log")
        .stderr_has("incomplete record at line 2")
        .stderr_has("Inspect the file");
    assert_eq!(project.read(JOURNAL), contents);
}

#[test]
fn operation_before_job_is_rejected() {
    let project = Project::empty();
    project.file(JOURNAL, "INFO Partmigrate starting\nOP move resize /dev/vg0/new 1\n");

    project
        .pm()
        .args(&["vg0/old", "vg0/new"])
        .fails()
        .stderr_has("did not expect OP at line 2");
}

#[test]
fn unknown_record_is_corrupt() {
    let project = Project::empty();
    project.file(JOURNAL, "CHECKPOINT 12\n");

    project
        .pm()
        .args(&["vg0/old", "vg0/new"])
        .fails()
        .stderr_has("corrupt journal record at line 1");
}

#[test]
fn locked_journal_is_refused() {
    let project = Project::empty();
    let path = project.file(JOURNAL, "");
    let holder = std::fs::File::open(&path).unwrap();
    FileExt::lock_exclusive(&holder).unwrap();

    project
        .pm()
        .args(&["vg0/old", "vg0/new"])
        .fails()
        .stderr_has("is locked")
        .stderr_has("Wait for the other partmigrate run to finish");

    drop(holder);
}

#[test]
fn custom_journal_path_is_used() {
    let project = Project::empty();
    project.file(
        "state/pm.log",
        &format!("{JOB}\nOP move resize /dev/vg0/new 1\n"),
    );

    // A valid journal is resumed, so the failure comes from opening volumes
    project
        .pm()
        .args(&["--log", "state/pm.log", "vg0/old", "vg0/new"])
        .fails()
        .stderr_has("cannot open logical volume");
    assert!(!project.exists(JOURNAL));
}

#[test]
fn journal_directory_must_exist() {
    let project = Project::empty();

    project
        .pm()
        .args(&["--log", "missing/pm.log", "vg0/old", "vg0/new"])
        .fails()
        .stderr_has("cannot use journal missing/pm.log");
}
