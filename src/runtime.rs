//! Runtime module for rollcall.
//!
//! `context` is what a running unit sees: its identity and the assertion entry
//! points. `scheduler` partitions the registry over worker threads and drives
//! the units to completion or to a halt.

pub mod context;
pub mod scheduler;
