//! Partitions the registry across worker threads and runs every unit once.
//!
//! With `workers == 0` all units run on the calling thread in registration
//! order. Otherwise the first `w = min(workers, T)` threads each take a
//! contiguous block of `T / w` units and one extra thread takes the remaining
//! `T % w`. Each thread walks its block in order; there is no ordering between
//! threads. Threads are scoped to the run and joined before it returns.

use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};
use std::process;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;

use crate::config::AbortPolicy;
use crate::errors::{HarnessError, HarnessResult};
use crate::recorder::Recorder;
use crate::registry::TestUnit;
use crate::runtime::context::{panic_message, ExecutionContext, FatalAssertion, TestContext};

/// Worker label used when units run on the calling thread.
pub const MAIN_WORKER: &str = "main";

/// Contiguous, disjoint index ranges into the registry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Partition {
    pub blocks: Vec<Range<usize>>,
    pub leftover: Option<Range<usize>>,
}

impl Partition {
    /// Every range in spawn order: the equal blocks, then the leftover.
    pub fn ranges(&self) -> impl Iterator<Item = &Range<usize>> {
        self.blocks.iter().chain(self.leftover.iter())
    }

    pub fn thread_count(&self) -> usize {
        self.blocks.len() + usize::from(self.leftover.is_some())
    }
}

/// Splits `total` units over `workers` threads. `workers` is clamped to `total`.
pub fn partition(total: usize, workers: usize) -> Partition {
    let workers = workers.min(total);
    if workers == 0 {
        return Partition::default();
    }

    let base = total / workers;
    let remainder = total % workers;
    let blocks = (0..workers).map(|i| i * base..(i + 1) * base).collect();
    let leftover = (remainder > 0).then(|| workers * base..total);
    Partition { blocks, leftover }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HaltReason {
    /// An ASSERT-family check failed.
    FatalAssertion { sequence_number: u64 },
    /// The unit body panicked outside any assertion.
    Panicked { message: String },
}

/// Why and where a run stopped early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Halt {
    pub suite: &'static str,
    pub case: &'static str,
    pub reason: HaltReason,
}

impl Halt {
    pub fn fatal_assertion(exec: &ExecutionContext, sequence_number: u64) -> Self {
        Self {
            suite: exec.suite(),
            case: exec.case(),
            reason: HaltReason::FatalAssertion { sequence_number },
        }
    }

    pub fn panicked(exec: &ExecutionContext, message: String) -> Self {
        Self {
            suite: exec.suite(),
            case: exec.case(),
            reason: HaltReason::Panicked { message },
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.reason {
            HaltReason::FatalAssertion { .. } => 1,
            HaltReason::Panicked { .. } => 101,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Units whose body was started.
    pub executed: usize,
    pub halt: Option<Halt>,
}

impl RunSummary {
    pub fn halted(&self) -> bool {
        self.halt.is_some()
    }
}

/// Flushes the report and ends the process with the halt's exit code.
pub(crate) fn terminate(recorder: &Recorder, halt: &Halt) -> ! {
    tracing::error!(suite = halt.suite, case = halt.case, reason = ?halt.reason, "terminating run");
    recorder.note_halt(halt);
    recorder.print_report();
    process::exit(halt.exit_code())
}

struct Runner<'r> {
    recorder: &'r Recorder,
    abort: AbortPolicy,
    halted: AtomicBool,
    halt: Mutex<Option<Halt>>,
    executed: AtomicUsize,
}

impl<'r> Runner<'r> {
    fn new(recorder: &'r Recorder, abort: AbortPolicy) -> Self {
        Self {
            recorder,
            abort,
            halted: AtomicBool::new(false),
            halt: Mutex::new(None),
            executed: AtomicUsize::new(0),
        }
    }

    fn run_block(&self, units: &[TestUnit], worker: Arc<str>) {
        tracing::debug!(worker = &*worker, units = units.len(), "worker started");
        for unit in units {
            if self.halted.load(Ordering::Acquire) {
                tracing::debug!(worker = &*worker, "run halted, worker stopping");
                break;
            }
            if let Err(halt) = self.run_unit(unit, &worker) {
                self.raise(halt);
                break;
            }
        }
        tracing::debug!(worker = &*worker, "worker finished");
    }

    fn run_unit(&self, unit: &TestUnit, worker: &Arc<str>) -> Result<(), Halt> {
        let exec = ExecutionContext::new(unit.suite(), unit.case(), Arc::clone(worker));
        tracing::trace!(suite = unit.suite(), case = unit.case(), worker = &**worker, "running unit");
        self.recorder.begin_unit(&exec);
        self.executed.fetch_add(1, Ordering::Relaxed);

        let cx = TestContext::new(exec.clone(), self.recorder, self.abort);
        let payload = match panic::catch_unwind(AssertUnwindSafe(|| unit.invoke(&cx))) {
            Ok(()) => return Ok(()),
            Err(payload) => payload,
        };

        match payload.downcast::<FatalAssertion>() {
            Ok(fatal) => Err(fatal.halt),
            Err(payload) => {
                let halt = Halt::panicked(&exec, panic_message(payload.as_ref()));
                if self.abort == AbortPolicy::Exit {
                    terminate(self.recorder, &halt);
                }
                Err(halt)
            }
        }
    }

    fn raise(&self, halt: Halt) {
        tracing::debug!(suite = halt.suite, case = halt.case, "halting run");
        self.halted.store(true, Ordering::Release);
        let mut slot = self.halt.lock();
        if slot.is_none() {
            self.recorder.note_halt(&halt);
            *slot = Some(halt);
        }
    }

    fn finish(self) -> RunSummary {
        RunSummary {
            executed: self.executed.into_inner(),
            halt: self.halt.into_inner(),
        }
    }
}

/// Runs every unit exactly once, either on the calling thread or spread over
/// `workers` scoped threads, and returns once all of them are done.
pub fn run_all(
    units: &[TestUnit],
    workers: usize,
    recorder: &Recorder,
    abort: AbortPolicy,
) -> HarnessResult<RunSummary> {
    let runner = Runner::new(recorder, abort);
    if units.is_empty() {
        return Ok(runner.finish());
    }

    if workers == 0 {
        runner.run_block(units, Arc::from(MAIN_WORKER));
        return Ok(runner.finish());
    }

    let partition = partition(units.len(), workers);
    tracing::debug!(
        total = units.len(),
        threads = partition.thread_count(),
        leftover = partition.leftover.as_ref().map_or(0, |r| r.len()),
        "partitioned test units"
    );

    let spawned: HarnessResult<()> = thread::scope(|scope| {
        let runner = &runner;
        for (index, range) in partition.ranges().enumerate() {
            let name = if index < partition.blocks.len() {
                format!("rollcall-worker-{index}")
            } else {
                "rollcall-leftover".to_string()
            };
            let block = &units[range.clone()];
            let worker: Arc<str> = Arc::from(name.as_str());
            let spawned = thread::Builder::new()
                .name(name.clone())
                .spawn_scoped(scope, move || runner.run_block(block, worker));
            if let Err(e) = spawned {
                runner.halted.store(true, Ordering::Release);
                return Err(HarnessError::WorkerSpawn {
                    name,
                    message: e.to_string(),
                });
            }
        }
        Ok(())
    });
    spawned?;

    Ok(runner.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_units_or_zero_workers_yield_no_blocks() {
        assert_eq!(partition(0, 4), Partition::default());
        assert_eq!(partition(5, 0), Partition::default());
    }

    #[test]
    fn blocks_are_equal_and_leftover_takes_the_rest() {
        let p = partition(10, 3);
        assert_eq!(p.blocks, vec![0..3, 3..6, 6..9]);
        assert_eq!(p.leftover, Some(9..10));
        assert_eq!(p.thread_count(), 4);
    }

    #[test]
    fn workers_are_clamped_to_unit_count() {
        let p = partition(3, 8);
        assert_eq!(p.blocks, vec![0..1, 1..2, 2..3]);
        assert_eq!(p.leftover, None);
    }

    #[test]
    fn partition_covers_every_index_exactly_once() {
        for total in 0..40 {
            for workers in 0..=total {
                let p = partition(total, workers);
                let mut seen = vec![0u8; total];
                for range in p.ranges() {
                    for i in range.clone() {
                        seen[i] += 1;
                    }
                }
                if workers == 0 {
                    assert!(p.ranges().next().is_none());
                    continue;
                }
                assert!(seen.iter().all(|&n| n == 1), "total={total} workers={workers}");
                assert!(p.blocks.iter().all(|b| b.len() == total / workers));
                assert_eq!(p.leftover.as_ref().map_or(0, |r| r.len()), total % workers);
            }
        }
    }

    #[test]
    fn exit_codes_distinguish_assertions_from_panics() {
        let exec = ExecutionContext::new("s", "c", Arc::from(MAIN_WORKER));
        assert_eq!(Halt::fatal_assertion(&exec, 3).exit_code(), 1);
        assert_eq!(Halt::panicked(&exec, "boom".into()).exit_code(), 101);
    }
}
