// Regression tests driving the demo harness binaries end to end.
// Requires: assert_cmd, predicates crates in [dev-dependencies]

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

fn demo() -> Command {
    let mut cmd = Command::cargo_bin("rollcall-demo").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

#[test]
fn passing_run_exits_zero_despite_expect_failures() {
    demo().assert().success().stdout(
        contains("[SUMMARY]")
            .and(contains("In testsuite [arithmetic]"))
            .and(contains("[FAILURES]"))
            .and(contains("integer division truncates")),
    );
}

#[test]
fn panicking_expect_operand_is_reported_without_panic_noise() {
    demo()
        .assert()
        .success()
        .stdout(contains("[panicked: port is numeric"))
        .stderr(contains("panicked at").not());
}

#[test]
fn unknown_flags_are_skipped() {
    demo()
        .args(["--color", "-vv", "-x", "-t", "2"])
        .assert()
        .success()
        .stdout(contains(", in thread rollcall-worker-"));
}

#[test]
fn threaded_run_reports_every_suite() {
    demo().args(["-t", "3"]).assert().success().stdout(
        contains("in \"arithmetic\" testsuite")
            .and(contains("in \"strings\" testsuite"))
            .and(contains("passed - 0, failed - 0 in \"nothing_checked\" testcase")),
    );
}

#[test]
fn verbose_flags_add_live_lines_and_thread_names() {
    demo()
        .arg("-v")
        .assert()
        .success()
        .stdout(contains("[OK] (2 + 2 == 4)").and(contains("in thread").not()));
    demo()
        .arg("-vv")
        .assert()
        .success()
        .stdout(contains(", in thread main").and(contains("Running strings : multiline")));
}

#[test]
fn unparsable_thread_count_runs_on_the_calling_thread() {
    demo()
        .args(["-vv", "-t", "lots"])
        .assert()
        .success()
        .stdout(contains(", in thread main"));
}

#[test]
fn help_prints_usage_and_runs_nothing() {
    for flag in ["-h", "-?"] {
        demo()
            .arg(flag)
            .assert()
            .success()
            .stdout(contains("Usage").and(contains("[SUMMARY]").not()));
    }
}

#[test]
fn failing_require_exits_one_after_the_report() {
    Command::cargo_bin("rollcall-demo-fatal")
        .unwrap()
        .env("NO_COLOR", "1")
        .assert()
        .code(1)
        .stdout(
            contains("[FATAL]")
                .and(contains("[SUMMARY]"))
                .and(contains("the answer drifted"))
                .and(contains("\"recorded\"").not()),
        );
}

#[test]
fn failing_require_on_a_worker_thread_exits_one_after_the_report() {
    Command::cargo_bin("rollcall-demo-fatal")
        .unwrap()
        .env("NO_COLOR", "1")
        .args(["-t", "2"])
        .assert()
        .code(1)
        .stdout(
            contains("[FATAL] assertion #1 failed in fatal::stops_here")
                .and(contains("[SUMMARY]"))
                .and(contains("passed - 1, failed - 1 in \"fatal\" testsuite")),
        );
}

#[test]
fn duplicate_units_exit_two_with_a_diagnostic() {
    Command::cargo_bin("rollcall-demo-duplicate")
        .unwrap()
        .env("NO_COLOR", "1")
        .assert()
        .code(2)
        .stdout(contains("[SUMMARY]").not())
        .stderr(
            contains("rollcall::registry::duplicate")
                .and(contains("twice::declared is registered more than once")),
        );
}
