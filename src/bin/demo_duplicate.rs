//! A harness binary declaring the same unit twice.

use rollcall::expect_eq;

rollcall::testcase!(twice, declared, |cx| {
    expect_eq!(cx, 1, 1);
});

rollcall::testcase!(twice, declared, |cx| {
    expect_eq!(cx, 2, 2);
});

rollcall::harness!();
