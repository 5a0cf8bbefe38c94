// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! partmigrate - move a logical volume while resizing both ends

mod args;
mod error;
mod migrate;

use anyhow::Context;
use args::Cli;
use clap::Parser;
use error::CliError;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprint!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let interrupt = Arc::new(AtomicBool::new(false));
    let flag = interrupt.clone();
    ctrlc::set_handler(move || {
        if on_interrupt(&flag) {
            eprintln!("\nSecond interrupt, exiting now");
            std::process::exit(i32::from(error::EXIT_INTERRUPTED));
        }
        eprintln!("\nInterrupt received, stopping after the current operation...");
        eprintln!("Press Ctrl-C again to exit immediately");
    })
    .context("failed to install interrupt handler")?;

    let report = migrate::migrate(cli, interrupt)?;

    // Dry-run stdout carries only the printed journal
    if !cli.dry_run {
        println!(
            "Migrated {} onto {}: {} chunks, {} operations performed, {} resumed from {}",
            cli.source,
            cli.destination,
            report.chunks,
            report.executed,
            report.replayed,
            cli.log.display()
        );
    }
    Ok(())
}

/// Raise the interrupt flag. True when it was already raised.
fn on_interrupt(flag: &AtomicBool) -> bool {
    flag.swap(true, Ordering::SeqCst)
}

fn setup_logging(cli: &Cli) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_directive()));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
