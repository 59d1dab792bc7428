use std::any::Any;
use std::cell::Cell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Once};
use std::thread;

use crate::assertion::{
    compare_strs, compare_values, AssertionKind, Check, Evaluation, Outcome, Site, StrOperand,
};
use crate::config::AbortPolicy;
use crate::recorder::Recorder;
use crate::runtime::scheduler::{self, Halt};

/// Identity of the unit currently running on a worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
    suite: &'static str,
    case: &'static str,
    worker: Arc<str>,
}

impl ExecutionContext {
    pub fn new(suite: &'static str, case: &'static str, worker: Arc<str>) -> Self {
        Self {
            suite,
            case,
            worker,
        }
    }

    pub fn suite(&self) -> &'static str {
        self.suite
    }

    pub fn case(&self) -> &'static str {
        self.case
    }

    /// Name of the worker thread running the unit.
    pub fn worker(&self) -> &str {
        &self.worker
    }
}

/// Unwind payload carrying a fatal assertion back to the scheduler.
pub(crate) struct FatalAssertion {
    pub(crate) halt: Halt,
}

/// Handle passed to every unit body.
///
/// All assertion entry points take `&self`, so operand expressions are free to
/// borrow the context too.
pub struct TestContext<'a> {
    exec: ExecutionContext,
    recorder: &'a Recorder,
    abort: AbortPolicy,
}

impl<'a> TestContext<'a> {
    pub fn new(exec: ExecutionContext, recorder: &'a Recorder, abort: AbortPolicy) -> Self {
        Self {
            exec,
            recorder,
            abort,
        }
    }

    pub fn suite(&self) -> &'static str {
        self.exec.suite()
    }

    pub fn case(&self) -> &'static str {
        self.exec.case()
    }

    pub fn execution(&self) -> &ExecutionContext {
        &self.exec
    }

    /// Compares two already evaluated values.
    pub fn check_values<L, R>(&self, kind: AssertionKind, site: Site, lhs: &L, rhs: &R) -> bool
    where
        L: PartialEq<R> + fmt::Debug + ?Sized,
        R: fmt::Debug + ?Sized,
    {
        let evaluation = compare_values(kind.comparison(), lhs, rhs);
        self.submit(Check::evaluated(kind, site, evaluation))
    }

    /// Compares two already evaluated string operands by content.
    pub fn check_strings<L, R>(&self, kind: AssertionKind, site: Site, lhs: &L, rhs: &R) -> bool
    where
        L: StrOperand + ?Sized,
        R: StrOperand + ?Sized,
    {
        let evaluation = compare_strs(kind.comparison(), lhs, rhs);
        self.submit(Check::evaluated(kind, site, evaluation))
    }

    /// Evaluates operands and comparison together, recording a panic during
    /// evaluation as a failure of the same kind.
    ///
    /// This is what the assertion macros expand to.
    pub fn evaluate<F>(&self, kind: AssertionKind, site: Site, evaluation: F) -> bool
    where
        F: FnOnce() -> Evaluation,
    {
        let check = match catch_quietly(evaluation) {
            Ok(evaluation) => Check::evaluated(kind, site, evaluation),
            // A fatal assertion nested inside the operands keeps unwinding.
            Err(payload) if payload.is::<FatalAssertion>() => panic::resume_unwind(payload),
            Err(payload) => Check::panicked(kind, site, panic_message(payload.as_ref())),
        };
        self.submit(check)
    }

    fn submit(&self, check: Check) -> bool {
        let recorded = self.recorder.record(&self.exec, check);
        if recorded.outcome == Outcome::Abort {
            self.abort(recorded.sequence_number);
        }
        recorded.passed
    }

    fn abort(&self, sequence_number: u64) -> ! {
        let halt = Halt::fatal_assertion(&self.exec, sequence_number);
        match self.abort {
            AbortPolicy::Exit => scheduler::terminate(self.recorder, &halt),
            AbortPolicy::Halt => panic::resume_unwind(Box::new(FatalAssertion { halt })),
        }
    }
}

thread_local! {
    static QUIET_PANICS: Cell<bool> = const { Cell::new(false) };
}

static QUIET_HOOK: Once = Once::new();

/// Wraps the current panic hook so it stays silent while this thread is
/// evaluating assertion operands. The panic is reported through the record.
fn install_quiet_hook() {
    QUIET_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !QUIET_PANICS.with(Cell::get) {
                previous(info);
            }
        }));
    });
}

fn catch_quietly<F, R>(f: F) -> thread::Result<R>
where
    F: FnOnce() -> R,
{
    install_quiet_hook();
    let was_quiet = QUIET_PANICS.with(|quiet| quiet.replace(true));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    QUIET_PANICS.with(|quiet| quiet.set(was_quiet));
    result
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
