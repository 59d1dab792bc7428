//! # Rollcall Engine
//!
//! `TestEngine` owns the registry, the recorder and the run options. Nothing
//! about a run lives in globals: the CLI builds one engine, runs it once and
//! prints its report, and embedders and tests do the same with their own
//! console and abort policy.

use crate::assertion::AssertionRecord;
use crate::cli::output::{self, Console};
use crate::config::Options;
use crate::errors::HarnessResult;
use crate::recorder::Recorder;
use crate::registry::Registry;
use crate::report::{Report, RunTally};
use crate::runtime::scheduler::{self, RunSummary};

pub struct TestEngine {
    registry: Registry,
    recorder: Recorder,
    options: Options,
}

impl TestEngine {
    /// An engine printing to standard output.
    pub fn new(registry: Registry, options: Options) -> Self {
        let console = output::stdout_console(options.color);
        Self::with_console(registry, options, console)
    }

    pub fn with_console(registry: Registry, options: Options, console: Console) -> Self {
        Self {
            registry,
            recorder: Recorder::new(options.verbosity, console),
            options,
        }
    }

    /// Runs every registered unit once.
    ///
    /// Under [`AbortPolicy::Exit`](crate::AbortPolicy::Exit) a fatal failure
    /// ends the process from inside this call.
    pub fn run(&self) -> HarnessResult<RunSummary> {
        let units = self.registry.enumerate();
        tracing::debug!(
            units = units.len(),
            workers = self.options.workers,
            abort = ?self.options.abort,
            "starting run"
        );
        let summary = scheduler::run_all(
            units,
            self.options.workers,
            &self.recorder,
            self.options.abort,
        )?;
        tracing::debug!(
            executed = summary.executed,
            halted = summary.halted(),
            "run finished"
        );
        Ok(summary)
    }

    /// Prints the summary and failure listing. May be called more than once.
    pub fn print_report(&self) {
        self.recorder.print_report();
    }

    pub fn records(&self) -> Vec<AssertionRecord> {
        self.recorder.records()
    }

    pub fn report(&self) -> Report {
        self.recorder.report()
    }

    pub fn tally(&self) -> RunTally {
        self.recorder.tally()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn options(&self) -> &Options {
        &self.options
    }
}
