//! Rollcall error handling.
//!
//! Assertion failures are not errors in this sense: they are recorded outcomes
//! and flow through the recorder. `HarnessError` covers misuse of the harness
//! itself, which is surfaced to the caller as a `Result` and rendered with
//! miette by the CLI.

use miette::Diagnostic;
use thiserror::Error;

/// Failure modes of the harness itself.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum HarnessError {
    /// Two units were declared with the same suite and case name.
    #[error("duplicate test unit: {suite}::{case} is registered more than once")]
    #[diagnostic(
        code(rollcall::registry::duplicate),
        help("rename one of the `testcase!({suite}, {case}, ..)` declarations")
    )]
    DuplicateUnit { suite: String, case: String },

    /// A worker thread could not be spawned.
    #[error("failed to spawn worker thread `{name}`: {message}")]
    #[diagnostic(code(rollcall::runner::spawn))]
    WorkerSpawn { name: String, message: String },
}

impl HarnessError {
    pub fn duplicate(suite: &str, case: &str) -> Self {
        HarnessError::DuplicateUnit {
            suite: suite.to_string(),
            case: case.to_string(),
        }
    }
}

pub type HarnessResult<T> = Result<T, HarnessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_error_names_the_unit() {
        let err = HarnessError::duplicate("math", "addition");
        assert_eq!(
            err.to_string(),
            "duplicate test unit: math::addition is registered more than once"
        );
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("rollcall::registry::duplicate"));
    }
}
