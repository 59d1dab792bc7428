// Shared helpers for rollcall integration tests.
#![allow(dead_code)]

use rollcall::cli::output::CaptureConsole;
use rollcall::{AbortPolicy, Options, Registry, TestBody, TestEngine, TestUnit};

/// Leaks a name so it can serve as a `&'static str` unit key.
pub fn name(s: String) -> &'static str {
    Box::leak(s.into_boxed_str())
}

/// `count` units in suite `suite`, named `case000`, `case001`, .. sharing one body.
pub fn numbered_units(suite: &'static str, count: usize, body: TestBody) -> Vec<TestUnit> {
    (0..count)
        .map(|i| TestUnit::new(suite, name(format!("case{i:03}")), body))
        .collect()
}

/// An engine that halts in-process instead of exiting, writing into a capture buffer.
pub fn engine(units: Vec<TestUnit>, workers: usize, verbosity: u8) -> (TestEngine, CaptureConsole) {
    let registry = Registry::from_units(units).expect("unique unit keys");
    let options = Options::default()
        .with_workers(workers)
        .with_verbosity(verbosity)
        .with_abort(AbortPolicy::Halt);
    let console = CaptureConsole::new();
    let engine = TestEngine::with_console(registry, options, console.boxed());
    (engine, console)
}
