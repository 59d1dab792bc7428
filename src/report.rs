//! The nested suite → case → outcomes report and its tallies.
//!
//! `Report` is the accumulation target the recorder appends to; `RunTally` is
//! the read-only summary computed from it. Tallying is a pure function of the
//! report, so computing it twice over the same state yields identical numbers.

use std::collections::BTreeMap;

use crate::assertion::AssertionKind;

/// One outcome inside a case list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub passed: bool,
    pub kind: AssertionKind,
    pub lhs_text: &'static str,
    pub rhs_text: &'static str,
}

pub type CaseEntries = Vec<Entry>;

/// Suite name → case name → ordered outcomes, iterated lexicographically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    suites: BTreeMap<&'static str, BTreeMap<&'static str, CaseEntries>>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the entry for a unit that is starting. Existing outcomes are kept.
    pub fn begin(&mut self, suite: &'static str, case: &'static str) {
        self.suites.entry(suite).or_default().entry(case).or_default();
    }

    pub fn push(&mut self, suite: &'static str, case: &'static str, entry: Entry) {
        self.suites
            .entry(suite)
            .or_default()
            .entry(case)
            .or_default()
            .push(entry);
    }

    pub fn suites(&self) -> impl Iterator<Item = (&'static str, &BTreeMap<&'static str, CaseEntries>)> {
        self.suites.iter().map(|(name, cases)| (*name, cases))
    }

    pub fn case(&self, suite: &str, case: &str) -> Option<&[Entry]> {
        self.suites
            .get(suite)
            .and_then(|cases| cases.get(case))
            .map(Vec::as_slice)
    }

    pub fn contains(&self, suite: &str, case: &str) -> bool {
        self.case(suite, case).is_some()
    }

    /// Number of distinct suite/case keys.
    pub fn case_count(&self) -> usize {
        self.suites.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.suites.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub passed: u64,
    pub failed: u64,
}

impl Counts {
    fn add(&mut self, other: Counts) {
        self.passed += other.passed;
        self.failed += other.failed;
    }

    pub fn total(&self) -> u64 {
        self.passed + self.failed
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseTally {
    pub name: &'static str,
    pub counts: Counts,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteTally {
    pub name: &'static str,
    pub cases: Vec<CaseTally>,
    pub counts: Counts,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunTally {
    pub suites: Vec<SuiteTally>,
    pub counts: Counts,
}

impl RunTally {
    pub fn from_report(report: &Report) -> Self {
        let mut tally = RunTally::default();
        for (suite_name, cases) in report.suites() {
            let mut suite = SuiteTally {
                name: suite_name,
                cases: Vec::with_capacity(cases.len()),
                counts: Counts::default(),
            };
            for (case_name, entries) in cases {
                let passed = entries.iter().filter(|e| e.passed).count() as u64;
                let counts = Counts {
                    passed,
                    failed: entries.len() as u64 - passed,
                };
                suite.counts.add(counts);
                suite.cases.push(CaseTally {
                    name: case_name,
                    counts,
                });
            }
            tally.counts.add(suite.counts);
            tally.suites.push(suite);
        }
        tally
    }

    pub fn suite(&self, name: &str) -> Option<&SuiteTally> {
        self.suites.iter().find(|s| s.name == name)
    }
}
