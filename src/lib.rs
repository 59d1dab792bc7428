//! # Rollcall
//!
//! A small unit-test harness. Units declared with [`testcase!`] register
//! themselves at link time, run once each on the calling thread or across
//! worker threads, and feed a suite/case report that is printed at the end.
//!
//! ```ignore
//! rollcall::testcase!(strings, concat, |cx| {
//!     let s = format!("{}{}", "ab", "c");
//!     rollcall::require_str_eq!(cx, s, "abc");
//!     rollcall::expect_ne!(cx, s.len(), 0, "empty result");
//! });
//!
//! rollcall::harness!();
//! ```

use std::sync::Once;

pub mod assertion;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
mod macros;
pub mod recorder;
pub mod registry;
pub mod report;
pub mod runtime;

pub use crate::assertion::{AssertionKind, AssertionRecord, Comparison, Family, Outcome, Site};
pub use crate::config::{AbortPolicy, Options};
pub use crate::engine::TestEngine;
pub use crate::errors::{HarnessError, HarnessResult};
pub use crate::recorder::Recorder;
pub use crate::registry::{Registry, TestBody, TestUnit};
pub use crate::report::{Report, RunTally};
pub use crate::runtime::context::{ExecutionContext, TestContext};
pub use crate::runtime::scheduler::{Halt, HaltReason, RunSummary};

#[doc(hidden)]
pub mod __private {
    pub use linkme;
    pub use linkme::distributed_slice;

    pub use crate::assertion::{compare_strs, compare_values};
    pub use crate::registry::TEST_UNITS;
}

static TRACING_INIT: Once = Once::new();

/// Installs a `tracing` subscriber writing to stderr, only if `RUST_LOG` is set.
///
/// Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            let _ = tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .try_init();
        }
    });
}
