//! Every strategy agrees, whatever order the runs complete in.

use std::time::Duration;

use pretty_assertions::assert_eq;
use testcover::cli::Strategy;
use testcover::finder;

use super::{all_finders, find};
use crate::fixtures::{names, ScriptedRunner};

fn size_runner() -> ScriptedRunner {
    ScriptedRunner::new()
        .covering("TestSize")
        .covering("TestNegativeSize")
        .covering("TestIsNegative")
        .not_covering("TestIsEnormous")
}

fn size_tests() -> Vec<String> {
    names(&["TestSize", "TestNegativeSize", "TestIsNegative", "TestIsEnormous"])
}

#[test]
fn test_strategies_agree_on_covering_tests() {
    for finder in all_finders() {
        let runner = size_runner();
        let covered = find(finder.as_ref(), &runner, &size_tests(), false).unwrap();
        assert_eq!(
            covered,
            names(&["TestIsNegative", "TestNegativeSize", "TestSize"]),
            "finder={}",
            finder.name()
        );
    }
}

#[test]
fn test_result_sorted_regardless_of_completion_order() {
    for finder in all_finders() {
        let runner = size_runner()
            .with_delay("TestSize", Duration::from_millis(40))
            .with_delay("TestNegativeSize", Duration::from_millis(20));
        let covered = find(finder.as_ref(), &runner, &size_tests(), false).unwrap();
        assert_eq!(
            covered,
            names(&["TestIsNegative", "TestNegativeSize", "TestSize"]),
            "finder={}",
            finder.name()
        );
    }
}

#[test]
fn test_each_candidate_runs_once() {
    for finder in all_finders() {
        let runner = size_runner();
        find(finder.as_ref(), &runner, &size_tests(), false).unwrap();

        let mut calls = runner.calls();
        calls.sort();
        let mut expected = size_tests();
        expected.sort();
        assert_eq!(calls, expected, "finder={}", finder.name());
    }
}

#[test]
fn test_repeated_sweeps_are_identical() {
    for finder in all_finders() {
        let first = find(finder.as_ref(), &size_runner(), &size_tests(), true).unwrap();
        let second = find(finder.as_ref(), &size_runner(), &size_tests(), true).unwrap();
        assert_eq!(first, second, "finder={}", finder.name());
    }
}

#[test]
fn test_no_candidates() {
    for finder in all_finders() {
        let runner = ScriptedRunner::new();
        assert!(find(finder.as_ref(), &runner, &[], true).unwrap().is_empty());
        assert!(runner.calls().is_empty());
    }
}

#[test]
fn test_nothing_covers() {
    for finder in all_finders() {
        let runner = ScriptedRunner::new()
            .not_covering("TestSize")
            .not_covering("TestIsEnormous");
        let covered = find(
            finder.as_ref(),
            &runner,
            &names(&["TestSize", "TestIsEnormous"]),
            true,
        )
        .unwrap();
        assert!(covered.is_empty(), "finder={}", finder.name());
    }
}

#[test]
fn test_built_finders_agree() {
    let strategies = [Strategy::Sequential, Strategy::FanOut, Strategy::Pipeline];
    let results: Vec<_> = strategies
        .iter()
        .map(|s| {
            let finder = finder::build(*s, Some(3));
            find(finder.as_ref(), &size_runner(), &size_tests(), false).unwrap()
        })
        .collect();
    assert_eq!(results[0], results[1]);
    assert_eq!(results[1], results[2]);
}
