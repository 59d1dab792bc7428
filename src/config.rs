//! Run configuration.
//!
//! `Options` carries everything the engine needs from the outside world: how
//! chatty the console should be, how many workers to spread units over, whether
//! to color output, and what a fatal assertion does to the process.

use termcolor::ColorChoice;

/// What happens when an ASSERT-family check fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AbortPolicy {
    /// Flush the full report and terminate the process immediately.
    #[default]
    Exit,
    /// Stop starting new units and return from the run with the halt recorded.
    Halt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// 0 = summary only, 1 = per-assertion lines, 2+ = values and thread ids.
    pub verbosity: u8,
    /// 0 runs everything on the calling thread.
    pub workers: usize,
    pub color: ColorChoice,
    pub abort: AbortPolicy,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            verbosity: 0,
            workers: 0,
            color: default_color_choice(),
            abort: AbortPolicy::default(),
        }
    }
}

impl Options {
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    pub fn with_abort(mut self, abort: AbortPolicy) -> Self {
        self.abort = abort;
        self
    }
}

/// Colors only when stdout is a terminal and `NO_COLOR` is unset.
pub fn default_color_choice() -> ColorChoice {
    if atty::is(atty::Stream::Stdout) && std::env::var_os("NO_COLOR").is_none() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_run_quietly_on_the_calling_thread() {
        let options = Options::default();
        assert_eq!(options.verbosity, 0);
        assert_eq!(options.workers, 0);
        assert_eq!(options.abort, AbortPolicy::Exit);
    }

    #[test]
    fn builders_override_fields() {
        let options = Options::default()
            .with_verbosity(2)
            .with_workers(4)
            .with_color(ColorChoice::Never)
            .with_abort(AbortPolicy::Halt);
        assert_eq!(options.verbosity, 2);
        assert_eq!(options.workers, 4);
        assert_eq!(options.color, ColorChoice::Never);
        assert_eq!(options.abort, AbortPolicy::Halt);
    }
}
