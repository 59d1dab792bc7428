//! Defines the command-line flags understood by a harness binary.
//!
//! This module uses the `clap` crate with its "derive" feature. Parsing is
//! error-tolerant: tokens that are not one of the harness flags are dropped
//! before clap sees them, and a worker count that is not a number means 0.

use std::ffi::OsString;

use clap::{ArgAction, CommandFactory, Parser};

use crate::config::Options;

/// Flags accepted by every binary built with `rollcall::harness!()`.
#[derive(Debug, Default, Parser)]
#[command(
    name = "rollcall",
    about = "Runs every test unit linked into this binary.",
    disable_help_flag = true,
    ignore_errors = true
)]
pub struct Cli {
    /// Verbosity level; repeat for more detail (-v, -vv).
    #[arg(short = 'v', action = ArgAction::Count)]
    pub verbose: u8,

    /// Number of worker threads (default is 0, the calling thread).
    #[arg(short = 't', value_name = "N")]
    pub threads: Option<String>,

    /// Print this usage text and exit.
    #[arg(short = 'h', visible_short_alias = '?', action = ArgAction::SetTrue)]
    pub help: bool,
}

impl Cli {
    pub fn from_env() -> Self {
        Self::from_iter_lossy(std::env::args_os())
    }

    /// Parses `args` (program name first), skipping unknown tokens and
    /// falling back to defaults on error.
    pub fn from_iter_lossy<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args = retain_known_flags(args.into_iter().map(Into::into));
        Self::try_parse_from(args).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "ignoring unparsable command line");
            Self::default()
        })
    }

    pub fn workers(&self) -> usize {
        self.threads
            .as_deref()
            .and_then(|t| t.trim().parse().ok())
            .unwrap_or(0)
    }

    pub fn usage() -> String {
        Self::command().render_help().to_string()
    }
}

/// Keeps the program name, `-v..`, `-t N`/`-tN`, `-h` and `-?`.
fn retain_known_flags(args: impl Iterator<Item = OsString>) -> Vec<OsString> {
    let mut args = args.peekable();
    let mut kept: Vec<OsString> = args.next().into_iter().collect();
    while let Some(arg) = args.next() {
        let text = arg.to_string_lossy();
        let known = match text.as_ref() {
            "-h" | "-?" => true,
            "-t" => match args.next_if(|v| !v.to_string_lossy().starts_with('-')) {
                Some(value) => {
                    kept.push(arg.clone());
                    kept.push(value);
                    continue;
                }
                None => false,
            },
            flag if flag.starts_with("-t") => true,
            flag => flag
                .strip_prefix('-')
                .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c == 'v')),
        };
        if known {
            kept.push(arg.clone());
        } else {
            tracing::debug!(arg = %text, "ignoring unrecognized argument");
        }
    }
    kept
}

impl Options {
    /// Options for a CLI run. Color and abort policy keep their defaults.
    pub fn from_args(cli: &Cli) -> Self {
        Options::default()
            .with_verbosity(cli.verbose)
            .with_workers(cli.workers())
    }
}
