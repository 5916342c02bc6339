//! Sub-test expansion.

use pretty_assertions::assert_eq;

use super::{all_finders, find};
use crate::fixtures::{names, ScriptedRunner};

fn subtest_runner() -> ScriptedRunner {
    ScriptedRunner::new()
        .covering_with_subtests("TestA", &["TestA/x", "TestA/y", "TestA/z"])
        .covering("TestA/x")
        .covering("TestA/y")
        .not_covering("TestA/z")
        .covering("TestB")
        .not_covering("TestC")
}

fn candidates() -> Vec<String> {
    names(&["TestC", "TestB", "TestA"])
}

#[test]
fn test_covering_subtests_follow_their_parent() {
    for finder in all_finders() {
        let covered = find(finder.as_ref(), &subtest_runner(), &candidates(), true).unwrap();
        assert_eq!(
            covered,
            names(&["TestA", "TestA/x", "TestA/y", "TestB"]),
            "finder={}",
            finder.name()
        );
    }
}

#[test]
fn test_subtests_not_run_unless_requested() {
    for finder in all_finders() {
        let runner = subtest_runner();
        let covered = find(finder.as_ref(), &runner, &candidates(), false).unwrap();
        assert_eq!(covered, names(&["TestA", "TestB"]), "finder={}", finder.name());
        assert!(
            runner.calls().iter().all(|c| !c.contains('/')),
            "finder={} ran {:?}",
            finder.name(),
            runner.calls()
        );
    }
}

#[test]
fn test_single_subtest_accepted_without_a_run() {
    for finder in all_finders() {
        let runner = ScriptedRunner::new()
            .covering_with_subtests("TestA", &["TestA/only"])
            .not_covering("TestB");
        let covered = find(finder.as_ref(), &runner, &names(&["TestA", "TestB"]), true).unwrap();

        assert_eq!(covered, names(&["TestA", "TestA/only"]), "finder={}", finder.name());
        assert_eq!(runner.call_count("TestA/only"), 0, "finder={}", finder.name());
    }
}

#[test]
fn test_subtests_of_uncovering_test_ignored() {
    for finder in all_finders() {
        let runner = ScriptedRunner::new()
            .not_covering("TestA")
            .covering("TestB");
        let covered = find(finder.as_ref(), &runner, &names(&["TestA", "TestB"]), true).unwrap();
        assert_eq!(covered, names(&["TestB"]), "finder={}", finder.name());
        assert_eq!(runner.calls().len(), 2);
    }
}

#[test]
fn test_recursion_stops_after_one_level() {
    for finder in all_finders() {
        let runner = ScriptedRunner::new()
            .covering_with_subtests("TestA", &["TestA/x", "TestA/y"])
            .covering_with_subtests("TestA/x", &["TestA/x/1", "TestA/x/2"])
            .covering("TestA/y");
        let covered = find(finder.as_ref(), &runner, &names(&["TestA"]), true).unwrap();

        assert_eq!(
            covered,
            names(&["TestA", "TestA/x", "TestA/y"]),
            "finder={}",
            finder.name()
        );
        assert_eq!(runner.call_count("TestA/x/1"), 0);
    }
}

#[test]
fn test_every_covering_subtest_checked_once() {
    for finder in all_finders() {
        let runner = subtest_runner();
        find(finder.as_ref(), &runner, &candidates(), true).unwrap();
        for sub in ["TestA/x", "TestA/y", "TestA/z"] {
            assert_eq!(runner.call_count(sub), 1, "finder={} sub={sub}", finder.name());
        }
    }
}
