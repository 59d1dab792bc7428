//! A harness binary whose only unit fails an ASSERT.

use rollcall::{expect_eq, require_eq};

rollcall::testcase!(fatal, stops_here, |cx| {
    expect_eq!(cx, 1, 1);
    require_eq!(cx, 40 + 2, 43, "the answer drifted");
    expect_eq!(cx, "never", "recorded");
});

rollcall::harness!();
