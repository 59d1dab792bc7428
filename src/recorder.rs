//! Thread-safe assertion sink.
//!
//! One coarse lock guards the sequence counter, the flat record list, the
//! nested report and the console. Taking the next sequence number, appending
//! to both structures and printing the live line happen as a single step, so
//! sequence numbers are unique and strictly increasing across all workers and
//! console lines never interleave.

use std::io::Write;

use parking_lot::Mutex;

use crate::assertion::{AssertionRecord, Check, Outcome};
use crate::cli::output::{self, Console};
use crate::report::{Entry, Report, RunTally};
use crate::runtime::context::ExecutionContext;
use crate::runtime::scheduler::Halt;

/// Result of recording one check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recorded {
    pub sequence_number: u64,
    pub passed: bool,
    pub outcome: Outcome,
}

struct RecorderState {
    next_sequence: u64,
    records: Vec<AssertionRecord>,
    report: Report,
    console: Console,
}

pub struct Recorder {
    verbosity: u8,
    state: Mutex<RecorderState>,
}

impl Recorder {
    pub fn new(verbosity: u8, console: Console) -> Self {
        Self {
            verbosity,
            state: Mutex::new(RecorderState {
                next_sequence: 0,
                records: Vec::new(),
                report: Report::new(),
                console,
            }),
        }
    }

    pub fn verbosity(&self) -> u8 {
        self.verbosity
    }

    /// Opens the report entry for a unit that is about to run.
    pub fn begin_unit(&self, exec: &ExecutionContext) {
        let mut state = self.state.lock();
        state.report.begin(exec.suite(), exec.case());
        if self.verbosity > 1 {
            if let Err(e) = output::print_unit_banner(&mut *state.console, exec) {
                tracing::warn!(error = %e, "failed to write unit banner");
            }
        }
    }

    pub fn record(&self, exec: &ExecutionContext, check: Check) -> Recorded {
        let Check {
            kind,
            passed,
            site,
            values,
            diff,
            error,
        } = check;

        let mut state = self.state.lock();
        let sequence_number = state.next_sequence;
        state.next_sequence += 1;

        let record = AssertionRecord {
            sequence_number,
            passed,
            suite_name: exec.suite(),
            case_name: exec.case(),
            location: site.location,
            lhs_text: site.lhs_text,
            rhs_text: site.rhs_text,
            kind,
            message: site.message,
            values,
            error,
        };

        if self.verbosity > 0 {
            let console = &mut *state.console;
            let printed =
                output::print_assertion(console, self.verbosity, &record, diff.as_ref(), exec.worker());
            if let Err(e) = printed {
                tracing::warn!(error = %e, "failed to write assertion line");
            }
        }

        state.report.push(
            exec.suite(),
            exec.case(),
            Entry {
                passed,
                kind,
                lhs_text: record.lhs_text,
                rhs_text: record.rhs_text,
            },
        );
        state.records.push(record);

        Recorded {
            sequence_number,
            passed,
            outcome: Outcome::for_check(kind, passed),
        }
    }

    /// Prints the fatal-stop notice for a halted run.
    pub fn note_halt(&self, halt: &Halt) {
        let mut state = self.state.lock();
        if let Err(e) = output::print_halt(&mut *state.console, halt) {
            tracing::warn!(error = %e, "failed to write halt notice");
        }
    }

    /// Prints the full summary to the console and flushes it.
    pub fn print_report(&self) {
        let mut state = self.state.lock();
        let RecorderState {
            records,
            report,
            console,
            ..
        } = &mut *state;
        let written = output::print_report(&mut **console, report, records, self.verbosity);
        if let Err(e) = written {
            tracing::warn!(error = %e, "failed to write report");
        }
        if let Err(e) = console.flush() {
            tracing::warn!(error = %e, "failed to flush console");
        }
    }

    /// Snapshot of the flat chronological sequence.
    pub fn records(&self) -> Vec<AssertionRecord> {
        self.state.lock().records.clone()
    }

    /// Snapshot of the nested report.
    pub fn report(&self) -> Report {
        self.state.lock().report.clone()
    }

    pub fn tally(&self) -> RunTally {
        RunTally::from_report(&self.state.lock().report)
    }
}
