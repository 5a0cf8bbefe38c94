//! Shared fixtures for CLI specs

use assert_cmd::assert::Assert;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const JOURNAL: &str = "partmigrate.log";

/// A scratch working directory for one partmigrate invocation
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("bin")).unwrap();
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        path
    }

    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(rel)).unwrap()
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.dir.path().join(rel).exists()
    }

    /// partmigrate running in the project, with a PATH that has no LVM tools
    pub fn pm(&self) -> CliRun {
        let mut cmd = Command::cargo_bin("partmigrate").unwrap();
        cmd.current_dir(self.dir.path())
            .env("PATH", self.dir.path().join("bin"))
            .env_remove("RUST_LOG");
        CliRun { cmd }
    }
}

pub struct CliRun {
    cmd: Command,
}

impl CliRun {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn passes(mut self) -> Assert {
        self.cmd.assert().success()
    }

    /// Fails with the generic error status
    pub fn fails(mut self) -> Assert {
        self.cmd.assert().failure().code(1)
    }

    pub fn exits(mut self, code: i32) -> Assert {
        self.cmd.assert().code(code)
    }
}

pub trait AssertExt {
    fn stdout_has(self, needle: &str) -> Self;
    fn stderr_has(self, needle: &str) -> Self;
    fn stdout_is_empty(self) -> Self;
}

impl AssertExt for Assert {
    fn stdout_has(self, needle: &str) -> Self {
        self.stdout(predicate::str::contains(needle))
    }

    fn stderr_has(self, needle: &str) -> Self {
        self.stderr(predicate::str::contains(needle))
    }

    fn stdout_is_empty(self) -> Self {
        self.stdout(predicate::str::is_empty())
    }
}
