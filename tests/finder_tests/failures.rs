//! A failing test fails the whole sweep.

use std::time::{Duration, Instant};

use testcover::error::Error;

use super::{all_finders, find};
use crate::fixtures::{names, ScriptedRunner};

#[test]
fn test_failing_test_fails_sweep() {
    for finder in all_finders() {
        let runner = ScriptedRunner::new()
            .covering("TestA")
            .failing("TestB", "    sum_test.go:12: unexpected sum\n")
            .covering("TestC");
        let err = find(
            finder.as_ref(),
            &runner,
            &names(&["TestA", "TestB", "TestC"]),
            false,
        )
        .unwrap_err();

        assert!(
            matches!(err, Error::TestFailure(ref f) if f.test_name == "TestB"),
            "finder={} err={err}",
            finder.name()
        );
        assert_eq!(err.to_string(), "FAIL: TestB - sum_test.go:12: unexpected sum");
    }
}

#[test]
fn test_cancellation_never_reported_instead_of_failure() {
    for finder in all_finders() {
        let mut runner = ScriptedRunner::new().failing("TestFail", "boom");
        let mut tests = vec!["TestFail".to_string()];
        for i in 0..8 {
            let name = format!("TestSlow{i}");
            runner = runner
                .covering(&name)
                .with_delay(&name, Duration::from_millis(30));
            tests.push(name);
        }

        let err = find(finder.as_ref(), &runner, &tests, false).unwrap_err();
        assert!(!err.is_cancelled(), "finder={}", finder.name());
        assert_eq!(err.to_string(), "FAIL: TestFail - boom");
    }
}

#[test]
fn test_failure_does_not_wait_for_runs_in_flight() {
    for finder in all_finders() {
        let runner = ScriptedRunner::new()
            .failing("TestFail", "boom")
            .covering("TestSlow")
            .with_delay("TestSlow", Duration::from_secs(30));

        let started = Instant::now();
        let err = find(
            finder.as_ref(),
            &runner,
            &names(&["TestFail", "TestSlow"]),
            false,
        )
        .unwrap_err();

        assert_eq!(err.to_string(), "FAIL: TestFail - boom");
        assert!(
            started.elapsed() < Duration::from_secs(10),
            "finder={} took {:?}",
            finder.name(),
            started.elapsed()
        );
    }
}

#[test]
fn test_sequential_stops_at_first_failure() {
    let runner = ScriptedRunner::new()
        .failing("TestA", "boom")
        .covering("TestB");
    let finder = testcover::finder::SequentialFinder;
    assert!(super::find(&finder, &runner, &names(&["TestA", "TestB"]), false).is_err());
    assert_eq!(runner.calls(), names(&["TestA"]));
}

#[test]
fn test_failing_subtest_fails_sweep() {
    for finder in all_finders() {
        let runner = ScriptedRunner::new()
            .covering_with_subtests("TestA", &["TestA/x", "TestA/y"])
            .covering("TestA/x")
            .failing("TestA/y", "flaky")
            .covering("TestB");
        let err = find(finder.as_ref(), &runner, &names(&["TestA", "TestB"]), true).unwrap_err();
        assert_eq!(err.to_string(), "FAIL: TestA/y - flaky", "finder={}", finder.name());
    }
}

#[test]
fn test_runner_error_propagates() {
    for finder in all_finders() {
        let runner = ScriptedRunner::new().covering("TestA");
        let err = find(
            finder.as_ref(),
            &runner,
            &names(&["TestA", "TestUnscripted"]),
            false,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Command(_)), "finder={} err={err}", finder.name());
        assert!(err.to_string().contains("no script for TestUnscripted"));
    }
}
