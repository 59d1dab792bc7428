//! Assertion data model: kinds, call sites, outcomes and records.

use std::fmt;

/// Whether a failed assertion stops the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// Failure is fatal to the whole run.
    Assert,
    /// Failure is recorded and the unit continues.
    Expect,
}

/// What an assertion compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Equal,
    NotEqual,
    StrEqual,
    StrNotEqual,
}

impl Comparison {
    /// The operator relating the two operands given the check's result.
    pub fn operator(self, passed: bool) -> &'static str {
        if self.wants_equal() == passed {
            "=="
        } else {
            "!="
        }
    }

    pub fn wants_equal(self) -> bool {
        matches!(self, Comparison::Equal | Comparison::StrEqual)
    }

    pub fn is_string(self) -> bool {
        matches!(self, Comparison::StrEqual | Comparison::StrNotEqual)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssertionKind {
    AssertEq,
    AssertNotEq,
    AssertStrEq,
    AssertNotStrEq,
    ExpectEq,
    ExpectNotEq,
    ExpectStrEq,
    ExpectNotStrEq,
}

impl AssertionKind {
    pub const ALL: [AssertionKind; 8] = [
        AssertionKind::AssertEq,
        AssertionKind::AssertNotEq,
        AssertionKind::AssertStrEq,
        AssertionKind::AssertNotStrEq,
        AssertionKind::ExpectEq,
        AssertionKind::ExpectNotEq,
        AssertionKind::ExpectStrEq,
        AssertionKind::ExpectNotStrEq,
    ];

    pub fn family(self) -> Family {
        match self {
            AssertionKind::AssertEq
            | AssertionKind::AssertNotEq
            | AssertionKind::AssertStrEq
            | AssertionKind::AssertNotStrEq => Family::Assert,
            AssertionKind::ExpectEq
            | AssertionKind::ExpectNotEq
            | AssertionKind::ExpectStrEq
            | AssertionKind::ExpectNotStrEq => Family::Expect,
        }
    }

    pub fn comparison(self) -> Comparison {
        match self {
            AssertionKind::AssertEq | AssertionKind::ExpectEq => Comparison::Equal,
            AssertionKind::AssertNotEq | AssertionKind::ExpectNotEq => Comparison::NotEqual,
            AssertionKind::AssertStrEq | AssertionKind::ExpectStrEq => Comparison::StrEqual,
            AssertionKind::AssertNotStrEq | AssertionKind::ExpectNotStrEq => {
                Comparison::StrNotEqual
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AssertionKind::AssertEq => "ASSERT_EQ",
            AssertionKind::AssertNotEq => "ASSERT_NOT_EQ",
            AssertionKind::AssertStrEq => "ASSERT_STREQ",
            AssertionKind::AssertNotStrEq => "ASSERT_NOT_STREQ",
            AssertionKind::ExpectEq => "EXPECT_EQ",
            AssertionKind::ExpectNotEq => "EXPECT_NOT_EQ",
            AssertionKind::ExpectStrEq => "EXPECT_STREQ",
            AssertionKind::ExpectNotStrEq => "EXPECT_NOT_STREQ",
        }
    }
}

impl fmt::Display for AssertionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the caller must do after an assertion has been recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Abort,
}

impl Outcome {
    /// ASSERT failures abort; everything else continues.
    pub fn for_check(kind: AssertionKind, passed: bool) -> Self {
        match (kind.family(), passed) {
            (Family::Assert, false) => Outcome::Abort,
            _ => Outcome::Continue,
        }
    }
}

/// Textual call-site information captured by the assertion macros.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    pub lhs_text: &'static str,
    pub rhs_text: &'static str,
    /// `"file:line"`
    pub location: &'static str,
    pub message: Option<String>,
}

impl Site {
    pub fn new(lhs_text: &'static str, rhs_text: &'static str, location: &'static str) -> Self {
        Self {
            lhs_text,
            rhs_text,
            location,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// The result of comparing two operands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evaluation {
    pub passed: bool,
    /// Rendered operand values, kept only for failures.
    pub values: Option<(String, String)>,
    /// Raw multi-line string operands of a failed string equality, for a line diff.
    pub diff: Option<(String, String)>,
}

/// Compares two values with `==` and renders them with `Debug` on failure.
pub fn compare_values<L, R>(comparison: Comparison, lhs: &L, rhs: &R) -> Evaluation
where
    L: PartialEq<R> + fmt::Debug + ?Sized,
    R: fmt::Debug + ?Sized,
{
    let passed = (lhs == rhs) == comparison.wants_equal();
    Evaluation {
        passed,
        values: (!passed).then(|| (format!("{lhs:?}"), format!("{rhs:?}"))),
        diff: None,
    }
}

/// Compares two string operands by content; absent operands render as `null`.
pub fn compare_strs<L, R>(comparison: Comparison, lhs: &L, rhs: &R) -> Evaluation
where
    L: StrOperand + ?Sized,
    R: StrOperand + ?Sized,
{
    let (lhs, rhs) = (lhs.as_operand(), rhs.as_operand());
    let passed = str_equal(lhs, rhs) == comparison.wants_equal();
    if passed {
        return Evaluation {
            passed,
            ..Evaluation::default()
        };
    }

    let multiline = |s: &str| s.contains('\n');
    let diff = match (lhs, rhs) {
        (Some(l), Some(r)) if comparison.wants_equal() && (multiline(l) || multiline(r)) => {
            Some((l.to_string(), r.to_string()))
        }
        _ => None,
    };
    Evaluation {
        passed,
        values: Some((render_str_operand(lhs), render_str_operand(rhs))),
        diff,
    }
}

/// A fully evaluated check, ready to be recorded.
#[derive(Debug, Clone)]
pub struct Check {
    pub kind: AssertionKind,
    pub passed: bool,
    pub site: Site,
    /// Rendered operand values, kept only for failures.
    pub values: Option<(String, String)>,
    pub diff: Option<(String, String)>,
    /// Panic message when evaluating the operands failed.
    pub error: Option<String>,
}

impl Check {
    pub fn evaluated(kind: AssertionKind, site: Site, evaluation: Evaluation) -> Self {
        Self {
            kind,
            passed: evaluation.passed,
            site,
            values: evaluation.values,
            diff: evaluation.diff,
            error: None,
        }
    }

    /// A check whose operands panicked while being evaluated.
    pub fn panicked(kind: AssertionKind, site: Site, message: String) -> Self {
        Self {
            kind,
            passed: false,
            site,
            values: None,
            diff: None,
            error: Some(message),
        }
    }
}

/// One recorded assertion outcome. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionRecord {
    pub sequence_number: u64,
    pub passed: bool,
    pub suite_name: &'static str,
    pub case_name: &'static str,
    pub location: &'static str,
    pub lhs_text: &'static str,
    pub rhs_text: &'static str,
    pub kind: AssertionKind,
    pub message: Option<String>,
    pub values: Option<(String, String)>,
    pub error: Option<String>,
}

/// String operands may be absent, standing in for a null C string.
pub trait StrOperand {
    fn as_operand(&self) -> Option<&str>;
}

impl StrOperand for str {
    fn as_operand(&self) -> Option<&str> {
        Some(self)
    }
}

impl StrOperand for String {
    fn as_operand(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl<T: StrOperand + ?Sized> StrOperand for &T {
    fn as_operand(&self) -> Option<&str> {
        (**self).as_operand()
    }
}

impl<T: StrOperand> StrOperand for Option<T> {
    fn as_operand(&self) -> Option<&str> {
        self.as_ref().and_then(StrOperand::as_operand)
    }
}

/// Placeholder printed for an absent string operand.
pub const NULL_OPERAND: &str = "null";

/// Compares two string operands by content. Two absent operands are equal.
pub fn str_equal(lhs: Option<&str>, rhs: Option<&str>) -> bool {
    lhs == rhs
}

pub fn render_str_operand(operand: Option<&str>) -> String {
    match operand {
        Some(s) => format!("{s:?}"),
        None => NULL_OPERAND.to_string(),
    }
}
