//! The Rollcall command-line entry point.
//!
//! `rollcall::harness!()` expands to a `main` that calls [`main`] here: parse
//! flags, collect the linked units, run them and print the report.

use std::process;

use crate::cli::args::Cli;
use crate::config::Options;
use crate::engine::TestEngine;
use crate::registry::Registry;

pub mod args;
pub mod output;

/// Exit status for a run that could not start.
pub const REGISTRY_ERROR_EXIT: i32 = 2;

/// Runs every linked test unit and exits with the run's status.
pub fn main() -> ! {
    crate::init_tracing();
    let cli = Cli::from_env();
    if cli.help {
        println!("{}", Cli::usage());
        process::exit(0);
    }

    let registry = match Registry::linked() {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("{:?}", miette::Report::new(e));
            process::exit(REGISTRY_ERROR_EXIT);
        }
    };

    let engine = TestEngine::new(registry, Options::from_args(&cli));
    let summary = match engine.run() {
        Ok(summary) => summary,
        Err(e) => {
            engine.print_report();
            eprintln!("{:?}", miette::Report::new(e));
            process::exit(REGISTRY_ERROR_EXIT);
        }
    };
    engine.print_report();

    match summary.halt {
        Some(halt) => process::exit(halt.exit_code()),
        None => process::exit(0),
    }
}
