//! A passing harness binary: every ASSERT holds, a few EXPECTs fail.

use rollcall::{expect_eq, expect_ne, expect_str_eq, expect_str_ne, require_eq, require_str_eq};

rollcall::testcase!(arithmetic, addition, |cx| {
    require_eq!(cx, 2 + 2, 4);
    expect_eq!(cx, 10 - 3, 7);
    expect_ne!(cx, 1, 2);
});

rollcall::testcase!(arithmetic, rounding, |cx| {
    let half = 5 / 2;
    expect_eq!(cx, half, 3, "integer division truncates");
    require_eq!(cx, half, 2);
});

rollcall::testcase!(strings, concat, |cx| {
    let joined = ["ab", "c"].concat();
    require_str_eq!(cx, joined, "abc");
    expect_str_ne!(cx, joined, "abd");
});

rollcall::testcase!(strings, multiline, |cx| {
    let text = "first\nsecond\nthird";
    expect_str_eq!(cx, text, "first\nsecnd\nthird");
});

rollcall::testcase!(strings, absent, |cx| {
    let missing: Option<&str> = None;
    expect_str_eq!(cx, missing, None::<&str>);
});

rollcall::testcase!(strings, unparsable, |cx| {
    let port = "http";
    expect_eq!(cx, port.parse::<u16>().expect("port is numeric"), 80);
    expect_str_ne!(cx, port, "");
});

rollcall::testcase!(empty, nothing_checked, |_cx| {});

rollcall::harness!();
