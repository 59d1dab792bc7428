//! Handles all user-facing output for the harness.
//!
//! This module is responsible for the live per-assertion lines, the unit
//! banners, the fatal-stop notice and the final summary. Everything writes to a
//! `WriteColor` so the same code drives a colored terminal and a plain capture
//! buffer.

use std::io::{self, Write};
use std::sync::Arc;

use difference::{Changeset, Difference};
use parking_lot::Mutex;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::assertion::{AssertionRecord, Comparison};
use crate::report::{Report, RunTally};
use crate::runtime::context::ExecutionContext;
use crate::runtime::scheduler::{Halt, HaltReason};

// ============================================================================
// CONSOLES: terminal and capture sinks
// ============================================================================

/// Destination for everything the recorder and reporter print.
pub type Console = Box<dyn WriteColor + Send>;

/// Standard output, colored according to `choice`.
pub fn stdout_console(choice: ColorChoice) -> Console {
    Box::new(StandardStream::stdout(choice))
}

/// CaptureConsole: collects output into a shared buffer for tests or programmatic capture.
#[derive(Clone, Default)]
pub struct CaptureConsole {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CaptureConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// A console handle writing into this buffer.
    pub fn boxed(&self) -> Console {
        Box::new(self.clone())
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }
}

impl Write for CaptureConsole {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl WriteColor for CaptureConsole {
    fn supports_color(&self) -> bool {
        false
    }

    fn set_color(&mut self, _spec: &ColorSpec) -> io::Result<()> {
        Ok(())
    }

    fn reset(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ============================================================================
// LIVE OUTPUT: emitted while units run
// ============================================================================

/// Prints one assertion line. Called with verbosity >= 1.
pub fn print_assertion(
    out: &mut dyn WriteColor,
    verbosity: u8,
    record: &AssertionRecord,
    diff: Option<&(String, String)>,
    worker: &str,
) -> io::Result<()> {
    write!(out, "#{} ", record.sequence_number)?;
    print_status(out, record.passed)?;
    let op = record.kind.comparison().operator(record.passed);
    write!(
        out,
        " ({} {} {}) at {}",
        record.lhs_text, op, record.rhs_text, record.location
    )?;
    if verbosity > 1 {
        write!(out, ", in thread {worker}")?;
    }
    writeln!(out)?;

    if record.passed {
        return Ok(());
    }
    if let Some(message) = &record.message {
        writeln!(out, "    {message}")?;
    }
    if let Some(error) = &record.error {
        write!(out, "    ")?;
        paint(out, Color::Red, "evaluation panicked")?;
        writeln!(out, ": {error}")?;
    }
    if verbosity > 1 {
        if let Some((lhs, rhs)) = &record.values {
            writeln!(out, "    ( {lhs}, {rhs} )")?;
        }
        if let Some((lhs, rhs)) = diff {
            let changeset = Changeset::new(lhs, rhs, "\n");
            print_diff(out, &changeset.diffs)?;
        }
    }
    Ok(())
}

pub fn print_unit_banner(out: &mut dyn WriteColor, exec: &ExecutionContext) -> io::Result<()> {
    writeln!(
        out,
        "\nRunning {} : {} ... (in thread {})\n",
        exec.suite(),
        exec.case(),
        exec.worker()
    )
}

pub fn print_halt(out: &mut dyn WriteColor, halt: &Halt) -> io::Result<()> {
    paint(out, Color::Red, "[FATAL]")?;
    match &halt.reason {
        HaltReason::FatalAssertion { sequence_number } => writeln!(
            out,
            " assertion #{sequence_number} failed in {}::{}, stopping run",
            halt.suite, halt.case
        ),
        HaltReason::Panicked { message } => writeln!(
            out,
            " {}::{} panicked: {message}, stopping run",
            halt.suite, halt.case
        ),
    }
}

// ============================================================================
// SUMMARY: printed once after the run
// ============================================================================

/// Prints per-case, per-suite and global tallies followed by every failure.
///
/// Reads `report` and `records` only; calling it twice prints the same numbers.
pub fn print_report(
    out: &mut dyn WriteColor,
    report: &Report,
    records: &[AssertionRecord],
    verbosity: u8,
) -> io::Result<()> {
    let tally = RunTally::from_report(report);

    writeln!(out)?;
    paint(out, Color::Yellow, "[SUMMARY]")?;
    writeln!(out, " :")?;

    for suite in &tally.suites {
        write!(out, "    In testsuite [")?;
        paint(out, Color::Yellow, suite.name)?;
        writeln!(out, "] :")?;

        for case in &suite.cases {
            write!(out, "        In testcase [")?;
            paint(out, Color::Yellow, case.name)?;
            writeln!(out, "] :")?;

            if verbosity > 0 {
                for entry in report.case(suite.name, case.name).unwrap_or_default() {
                    write!(out, "            ")?;
                    print_status(out, entry.passed)?;
                    writeln!(out, " ({}), ( {}, {} )", entry.kind, entry.lhs_text, entry.rhs_text)?;
                }
            }

            write!(out, "            ")?;
            print_totals(out, case.counts.passed, case.counts.failed)?;
            writeln!(out, " in \"{}\" testcase", case.name)?;
        }

        write!(out, "        ")?;
        print_totals(out, suite.counts.passed, suite.counts.failed)?;
        writeln!(out, " in \"{}\" testsuite", suite.name)?;
        writeln!(out)?;
    }

    let mut failures = records.iter().filter(|r| !r.passed).peekable();
    if failures.peek().is_some() {
        paint(out, Color::Red, "[FAILURES]")?;
        writeln!(out, " :")?;
        for record in failures {
            let op = Comparison::operator(record.kind.comparison(), false);
            write!(
                out,
                "    #{} {} at {} in {}::{} ({} {} {})",
                record.sequence_number,
                record.kind,
                record.location,
                record.suite_name,
                record.case_name,
                record.lhs_text,
                op,
                record.rhs_text
            )?;
            if let Some(message) = &record.message {
                write!(out, " - {message}")?;
            }
            if let Some(error) = &record.error {
                write!(out, " [panicked: {error}]")?;
            }
            writeln!(out)?;
        }
        writeln!(out)?;
    }

    write!(out, "Total ")?;
    print_totals(out, tally.counts.passed, tally.counts.failed)?;
    writeln!(
        out,
        " across {} testsuite(s), {} testcase(s)",
        tally.suites.len(),
        report.case_count()
    )
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn paint(out: &mut dyn WriteColor, color: Color, text: &str) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(color)))?;
    write!(out, "{text}")?;
    out.reset()
}

fn print_status(out: &mut dyn WriteColor, passed: bool) -> io::Result<()> {
    write!(out, "[")?;
    if passed {
        paint(out, Color::Green, "OK")?;
    } else {
        paint(out, Color::Red, "FAIL")?;
    }
    write!(out, "]")
}

fn print_totals(out: &mut dyn WriteColor, passed: u64, failed: u64) -> io::Result<()> {
    write!(out, "passed - ")?;
    paint(out, Color::Green, &passed.to_string())?;
    write!(out, ", failed - ")?;
    paint(out, Color::Red, &failed.to_string())
}

fn print_diff(out: &mut dyn WriteColor, diffs: &[Difference]) -> io::Result<()> {
    for diff in diffs {
        match diff {
            Difference::Same(x) => {
                out.reset()?;
                writeln!(out, "     {x}")?;
            }
            Difference::Add(x) => {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
                writeln!(out, "    +{x}")?;
            }
            Difference::Rem(x) => {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
                writeln!(out, "    -{x}")?;
            }
        }
    }
    out.reset()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assertion::AssertionKind;
    use crate::report::Entry;

    fn record(sequence_number: u64, passed: bool) -> AssertionRecord {
        AssertionRecord {
            sequence_number,
            passed,
            suite_name: "S",
            case_name: "A",
            location: "lib.rs:7",
            lhs_text: "x",
            rhs_text: "y",
            kind: AssertionKind::ExpectEq,
            message: None,
            values: Some(("1".into(), "2".into())),
            error: None,
        }
    }

    #[test]
    fn thread_and_values_appear_only_at_high_verbosity() {
        let console = CaptureConsole::new();
        let mut out = console.boxed();
        print_assertion(&mut *out, 1, &record(4, false), None, "rollcall-worker-0").unwrap();
        let low = console.contents();
        assert!(low.contains("#4 [FAIL] (x != y) at lib.rs:7"));
        assert!(!low.contains("rollcall-worker-0"));
        assert!(!low.contains("( 1, 2 )"));

        let console = CaptureConsole::new();
        let mut out = console.boxed();
        print_assertion(&mut *out, 2, &record(4, false), None, "rollcall-worker-0").unwrap();
        let high = console.contents();
        assert!(high.contains(", in thread rollcall-worker-0"));
        assert!(high.contains("( 1, 2 )"));
    }

    #[test]
    fn multiline_diff_marks_changed_lines() {
        let console = CaptureConsole::new();
        let mut out = console.boxed();
        let diff = ("a\nb".to_string(), "a\nc".to_string());
        print_assertion(&mut *out, 2, &record(0, false), Some(&diff), "main").unwrap();
        let text = console.contents();
        assert!(text.contains("-b"), "{text}");
        assert!(text.contains("+c"), "{text}");
    }

    #[test]
    fn report_lists_tallies_and_failures() {
        let mut report = Report::new();
        let ok = Entry {
            passed: true,
            kind: AssertionKind::ExpectEq,
            lhs_text: "x",
            rhs_text: "y",
        };
        report.push("S", "A", ok.clone());
        report.push("S", "B", Entry { passed: false, ..ok });
        let mut failed = record(1, false);
        failed.case_name = "B";
        let records = vec![record(0, true), failed];

        let console = CaptureConsole::new();
        let mut out = console.boxed();
        print_report(&mut *out, &report, &records, 0).unwrap();
        let text = console.contents();

        assert!(text.contains("passed - 1, failed - 0 in \"A\" testcase"), "{text}");
        assert!(text.contains("passed - 0, failed - 1 in \"B\" testcase"), "{text}");
        assert!(text.contains("passed - 1, failed - 1 in \"S\" testsuite"), "{text}");
        assert!(text.contains("#1 EXPECT_EQ at lib.rs:7 in S::B (x != y)"), "{text}");
        assert!(text.contains("Total passed - 1, failed - 1 across 1 testsuite(s), 2 testcase(s)"));
    }

    #[test]
    fn printing_the_report_twice_is_identical() {
        let mut report = Report::new();
        report.begin("S", "A");
        let first = CaptureConsole::new();
        let second = CaptureConsole::new();
        print_report(&mut *first.boxed(), &report, &[], 1).unwrap();
        print_report(&mut *second.boxed(), &report, &[], 1).unwrap();
        assert_eq!(first.contents(), second.contents());
    }
}
