// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! LVM logical volume target
//!
//! The volume is resolved to its device node with `lvs`, read and written
//! with positional I/O, and resized with `lvreduce`/`lvextend`.

use super::{Target, TargetError};
use serde::Deserialize;
use std::fs::{File, OpenOptions};
use std::io::{self, Seek, SeekFrom};
use std::os::unix::fs::FileExt;
use std::process::Command;

/// Runs external commands, returning stdout on success
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<String, TargetError>;
}

/// Runs commands on the host
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<String, TargetError> {
        let cmd = command_line(program, args);
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| TargetError::Spawn {
                cmd: cmd.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(TargetError::CommandFailed {
                cmd,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// A logical volume opened for migration
pub struct LvmTarget<R: CommandRunner = SystemRunner> {
    name: String,
    path: String,
    file: Option<File>,
    runner: R,
}

impl LvmTarget {
    /// Resolve and open the logical volume `name` (e.g. `vg0/data`)
    pub fn open(name: &str) -> Result<Self, TargetError> {
        Self::open_with(name, SystemRunner)
    }
}

impl<R: CommandRunner> LvmTarget<R> {
    pub fn open_with(name: &str, runner: R) -> Result<Self, TargetError> {
        let args = lvs_args(name);
        let report = runner.run("lvs", &args)?;
        let path = parse_lv_path(name, &report)?;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|source| TargetError::Io {
                id: path.clone(),
                op: "open",
                source,
            })?;
        tracing::info!(name, path = %path, "opened logical volume");

        Ok(Self {
            name: name.to_string(),
            path,
            file: Some(file),
            runner,
        })
    }

    /// Volume name as given by the operator
    pub fn name(&self) -> &str {
        &self.name
    }

    fn file(&self) -> Result<&File, TargetError> {
        self.file
            .as_ref()
            .ok_or_else(|| TargetError::Closed(self.path.clone()))
    }

    fn io_error(&self, op: &'static str, source: io::Error) -> TargetError {
        TargetError::Io {
            id: self.path.clone(),
            op,
            source,
        }
    }
}

impl<R: CommandRunner> Target for LvmTarget<R> {
    fn id(&self) -> &str {
        &self.path
    }

    fn read(&self, offset: u64, buf: &mut [u8]) -> Result<usize, TargetError> {
        let file = self.file()?;
        let mut filled = 0;
        while filled < buf.len() {
            match file.read_at(&mut buf[filled..], offset + filled as u64) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(self.io_error("read", e)),
            }
        }
        Ok(filled)
    }

    fn write(&self, offset: u64, buf: &[u8]) -> Result<usize, TargetError> {
        let file = self.file()?;
        let mut written = 0;
        while written < buf.len() {
            match file.write_at(&buf[written..], offset + written as u64) {
                Ok(0) => break,
                Ok(n) => written += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(self.io_error("write", e)),
            }
        }
        Ok(written)
    }

    fn resize(&self, new_size: u64) -> Result<(), TargetError> {
        let current = self.size()?;
        let Some(args) = resize_args(&self.name, current, new_size) else {
            return Ok(());
        };
        tracing::info!(cmd = %command_line(&args.0, &args.1), "running");
        self.runner.run(&args.0, &args.1)?;
        Ok(())
    }

    fn size(&self) -> Result<u64, TargetError> {
        let mut file = self.file()?;
        file.seek(SeekFrom::End(0))
            .map_err(|e| self.io_error("size", e))
    }

    fn sync(&self) -> Result<(), TargetError> {
        self.file()?
            .sync_data()
            .map_err(|e| self.io_error("sync", e))
    }

    fn supports_source(&self) -> bool {
        true
    }

    fn supports_destination(&self) -> bool {
        true
    }

    fn close(&mut self) -> Result<(), TargetError> {
        self.file.take();
        Ok(())
    }
}

#[derive(Deserialize)]
struct LvsReport {
    report: Vec<LvsSection>,
}

#[derive(Deserialize)]
struct LvsSection {
    lv: Vec<LvsRow>,
}

#[derive(Deserialize)]
struct LvsRow {
    lv_path: String,
}

fn lvs_args(name: &str) -> Vec<String> {
    ["--reportformat=json", "-o", "path", name]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Extract the device path of the single volume in an `lvs` JSON report
fn parse_lv_path(name: &str, report: &str) -> Result<String, TargetError> {
    let report_error = |reason: String| TargetError::Report {
        name: name.to_string(),
        reason,
    };
    let parsed: LvsReport = serde_json::from_str(report).map_err(|e| report_error(e.to_string()))?;
    let row = parsed
        .report
        .into_iter()
        .next()
        .and_then(|section| section.lv.into_iter().next())
        .ok_or_else(|| report_error("no logical volume listed".to_string()))?;
    if row.lv_path.is_empty() {
        return Err(report_error("volume has no device path".to_string()));
    }
    Ok(row.lv_path)
}

/// Command that moves a volume from `current` to `target` bytes, if any
fn resize_args(name: &str, current: u64, target: u64) -> Option<(String, Vec<String>)> {
    let program = match current.cmp(&target) {
        std::cmp::Ordering::Equal => return None,
        std::cmp::Ordering::Greater => "lvreduce",
        std::cmp::Ordering::Less => "lvextend",
    };
    let args = vec![
        "-q".to_string(),
        "-f".to_string(),
        "-L".to_string(),
        format!("{target}b"),
        name.to_string(),
    ];
    Some((program.to_string(), args))
}

fn command_line(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "lvm_tests.rs"]
mod tests;
