//! # Rollcall: Test Unit Registry
//!
//! Every `testcase!` declaration places one [`TestUnit`] into a linker-assembled
//! distributed slice. Nothing has to list the tests by hand: the slice is
//! complete as soon as the binary is loaded, and [`Registry::linked`] turns it
//! into an ordered, duplicate-checked registry before any scheduling begins.
//!
//! Registry Invariant: the registry is read-only once a run starts. It is built
//! once at the entrypoint, handed to the [`TestEngine`](crate::TestEngine) and
//! only ever read by the scheduler afterwards.

use std::collections::HashSet;
use std::fmt;

use linkme::distributed_slice;

use crate::errors::{HarnessError, HarnessResult};
use crate::runtime::context::TestContext;

/// The body of a test unit.
pub type TestBody = fn(&TestContext<'_>);

/// Every unit declared with `testcase!` in the final binary.
#[doc(hidden)]
#[distributed_slice]
pub static TEST_UNITS: [TestUnit] = [..];

/// One declared check routine identified by suite and case name.
#[derive(Clone, Copy)]
pub struct TestUnit {
    suite: &'static str,
    case: &'static str,
    body: TestBody,
}

impl TestUnit {
    pub const fn new(suite: &'static str, case: &'static str, body: TestBody) -> Self {
        Self { suite, case, body }
    }

    pub fn suite(&self) -> &'static str {
        self.suite
    }

    pub fn case(&self) -> &'static str {
        self.case
    }

    pub fn key(&self) -> (&'static str, &'static str) {
        (self.suite, self.case)
    }

    /// Invokes the unit's body with its execution context.
    pub fn invoke(&self, cx: &TestContext<'_>) {
        (self.body)(cx)
    }
}

impl fmt::Debug for TestUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestUnit")
            .field("suite", &self.suite)
            .field("case", &self.case)
            .finish_non_exhaustive()
    }
}

/// Append-only, ordered collection of test units.
#[derive(Debug, Default)]
pub struct Registry {
    units: Vec<TestUnit>,
    keys: HashSet<(&'static str, &'static str)>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from every `testcase!` linked into this binary.
    ///
    /// The order is the order the linker laid the slice out in, which is
    /// stable for a given build.
    pub fn linked() -> HarnessResult<Self> {
        Self::from_units(TEST_UNITS.iter().copied())
    }

    pub fn from_units<I>(units: I) -> HarnessResult<Self>
    where
        I: IntoIterator<Item = TestUnit>,
    {
        let mut registry = Self::new();
        for unit in units {
            registry.register(unit)?;
        }
        Ok(registry)
    }

    /// Appends a unit, rejecting a `(suite, case)` pair that is already present.
    pub fn register(&mut self, unit: TestUnit) -> HarnessResult<()> {
        if !self.keys.insert(unit.key()) {
            return Err(HarnessError::duplicate(unit.suite, unit.case));
        }
        tracing::trace!(suite = unit.suite, case = unit.case, "registered test unit");
        self.units.push(unit);
        Ok(())
    }

    /// All units in registration order.
    pub fn enumerate(&self) -> &[TestUnit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &TestContext<'_>) {}

    #[test]
    fn enumerate_preserves_registration_order() {
        let registry = Registry::from_units([
            TestUnit::new("b", "one", noop),
            TestUnit::new("a", "two", noop),
            TestUnit::new("a", "one", noop),
        ])
        .unwrap();
        let keys: Vec<_> = registry.enumerate().iter().map(TestUnit::key).collect();
        assert_eq!(keys, vec![("b", "one"), ("a", "two"), ("a", "one")]);
    }

    #[test]
    fn duplicate_key_is_rejected() {
        let mut registry = Registry::new();
        registry.register(TestUnit::new("s", "c", noop)).unwrap();
        let err = registry.register(TestUnit::new("s", "c", noop)).unwrap_err();
        assert_eq!(err, HarnessError::duplicate("s", "c"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn same_case_name_in_different_suites_is_allowed() {
        let registry = Registry::from_units([
            TestUnit::new("left", "case", noop),
            TestUnit::new("right", "case", noop),
        ])
        .unwrap();
        assert_eq!(registry.len(), 2);
    }
}
