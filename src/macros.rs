//! Declaration and assertion macros.
//!
//! `testcase!` places a unit in the linked registry. The `require_*` macros are
//! the ASSERT family: a failure stops the whole run. The `expect_*` macros are
//! the EXPECT family: a failure is recorded and the unit carries on. Every
//! assertion macro captures the source text of both operands and the call site,
//! accepts an optional trailing format message, and evaluates to `bool`.

/// Declares a test unit.
///
/// ```ignore
/// rollcall::testcase!(math, addition, |cx| {
///     rollcall::expect_eq!(cx, 2 + 2, 4);
/// });
/// ```
#[macro_export]
macro_rules! testcase {
    ($suite:ident, $case:ident, |$cx:ident| $body:block) => {
        const _: () = {
            #[$crate::__private::distributed_slice($crate::__private::TEST_UNITS)]
            #[linkme(crate = $crate::__private::linkme)]
            static UNIT: $crate::TestUnit = $crate::TestUnit::new(
                ::core::stringify!($suite),
                ::core::stringify!($case),
                {
                    fn body($cx: &$crate::TestContext<'_>) $body
                    body
                },
            );
        };
    };
}

/// Generates `fn main()` running every linked unit with the CLI flags.
#[macro_export]
macro_rules! harness {
    () => {
        fn main() {
            $crate::cli::main()
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __rollcall_site {
    ($lhs:expr, $rhs:expr) => {
        $crate::Site::new(
            ::core::stringify!($lhs),
            ::core::stringify!($rhs),
            ::core::concat!(::core::file!(), ":", ::core::line!()),
        )
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __rollcall_assert {
    ($kind:ident, $compare:ident, $cx:expr, $lhs:expr, $rhs:expr $(,)?) => {
        $crate::__rollcall_assert!(@site $kind, $compare, $cx, $lhs, $rhs,
            $crate::__rollcall_site!($lhs, $rhs))
    };
    ($kind:ident, $compare:ident, $cx:expr, $lhs:expr, $rhs:expr, $($msg:tt)+) => {
        $crate::__rollcall_assert!(@site $kind, $compare, $cx, $lhs, $rhs,
            $crate::__rollcall_site!($lhs, $rhs).with_message(::std::format!($($msg)+)))
    };
    (@site $kind:ident, $compare:ident, $cx:expr, $lhs:expr, $rhs:expr, $site:expr) => {{
        let kind = $crate::AssertionKind::$kind;
        $cx.evaluate(kind, $site, || match (&$lhs, &$rhs) {
            (lhs, rhs) => $crate::__private::$compare(kind.comparison(), lhs, rhs),
        })
    }};
}

/// Fatal `lhs == rhs`.
#[macro_export]
macro_rules! require_eq {
    ($($args:tt)*) => { $crate::__rollcall_assert!(AssertEq, compare_values, $($args)*) };
}

/// Fatal `lhs != rhs`.
#[macro_export]
macro_rules! require_ne {
    ($($args:tt)*) => { $crate::__rollcall_assert!(AssertNotEq, compare_values, $($args)*) };
}

/// Fatal string content equality. Either side may be an absent `Option`.
#[macro_export]
macro_rules! require_str_eq {
    ($($args:tt)*) => { $crate::__rollcall_assert!(AssertStrEq, compare_strs, $($args)*) };
}

/// Fatal string content inequality.
#[macro_export]
macro_rules! require_str_ne {
    ($($args:tt)*) => { $crate::__rollcall_assert!(AssertNotStrEq, compare_strs, $($args)*) };
}

/// Non-fatal `lhs == rhs`.
#[macro_export]
macro_rules! expect_eq {
    ($($args:tt)*) => { $crate::__rollcall_assert!(ExpectEq, compare_values, $($args)*) };
}

/// Non-fatal `lhs != rhs`.
#[macro_export]
macro_rules! expect_ne {
    ($($args:tt)*) => { $crate::__rollcall_assert!(ExpectNotEq, compare_values, $($args)*) };
}

/// Non-fatal string content equality.
#[macro_export]
macro_rules! expect_str_eq {
    ($($args:tt)*) => { $crate::__rollcall_assert!(ExpectStrEq, compare_strs, $($args)*) };
}

/// Non-fatal string content inequality.
#[macro_export]
macro_rules! expect_str_ne {
    ($($args:tt)*) => { $crate::__rollcall_assert!(ExpectNotStrEq, compare_strs, $($args)*) };
}

#[cfg(test)]
mod tests {
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::Arc;

    use crate::cli::output::CaptureConsole;
    use crate::{AbortPolicy, AssertionKind, ExecutionContext, Recorder, TestContext};

    fn with_context(f: impl FnOnce(&TestContext<'_>)) -> Recorder {
        let recorder = Recorder::new(0, CaptureConsole::new().boxed());
        {
            let exec = ExecutionContext::new("macros", "case", Arc::from("main"));
            let cx = TestContext::new(exec, &recorder, AbortPolicy::Halt);
            f(&cx);
        }
        recorder
    }

    #[test]
    fn operand_text_and_location_are_captured() {
        let recorder = with_context(|cx| {
            let x = 3;
            assert!(crate::expect_eq!(cx, x + 1, 4));
        });
        let record = &recorder.records()[0];
        assert_eq!(record.lhs_text, "x + 1");
        assert_eq!(record.rhs_text, "4");
        assert!(record.location.starts_with("src/macros.rs:"), "{}", record.location);
        assert_eq!(record.kind, AssertionKind::ExpectEq);
    }

    #[test]
    fn trailing_message_is_formatted() {
        let recorder = with_context(|cx| {
            let n = 7;
            assert!(!crate::expect_ne!(cx, n, 7, "n was {}", n));
        });
        assert_eq!(recorder.records()[0].message.as_deref(), Some("n was 7"));
    }

    #[test]
    fn string_macros_compare_content_and_absence() {
        let recorder = with_context(|cx| {
            let owned = String::from("abc");
            let none: Option<&str> = None;
            assert!(crate::expect_str_eq!(cx, owned, "abc"));
            assert!(crate::expect_str_ne!(cx, "abc", "abd"));
            assert!(crate::expect_str_eq!(cx, none, None::<&str>));
            assert!(!crate::expect_str_eq!(cx, none, "abc"));
        });
        let records = recorder.records();
        assert_eq!(records.len(), 4);
        assert_eq!(
            records[3].values,
            Some(("null".to_string(), "\"abc\"".to_string()))
        );
    }

    #[test]
    fn operands_are_borrowed_not_moved() {
        with_context(|cx| {
            let v = vec![1, 2, 3];
            crate::expect_eq!(cx, v, vec![1, 2, 3]);
            assert_eq!(v.len(), 3);
        });
    }

    #[test]
    fn failing_require_unwinds_under_halt() {
        let recorder = Recorder::new(0, CaptureConsole::new().boxed());
        let exec = ExecutionContext::new("macros", "fatal", Arc::from("main"));
        let cx = TestContext::new(exec, &recorder, AbortPolicy::Halt);
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            crate::require_eq!(cx, 1, 2);
            crate::expect_eq!(cx, 1, 1);
        }));
        assert!(result.is_err());
        assert_eq!(recorder.records().len(), 1);
    }
}
