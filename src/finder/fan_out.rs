use std::thread;

use super::{check_test, collect_slots, expand_subtests, fail_fast, CoverFinder, Outcome, Sweep};
use crate::error::Result;

/// Runs every candidate on its own thread at once, then does the same for
/// the sub-tests of every matched parent.
#[derive(Debug, Clone, Copy, Default)]
pub struct FanOutFinder;

impl CoverFinder for FanOutFinder {
    fn name(&self) -> &'static str {
        "fan-out"
    }

    fn covering_tests(
        &self,
        sweep: &Sweep<'_>,
        tests: &[String],
        include_subtests: bool,
    ) -> Result<Vec<String>> {
        let mut slots = empty_slots(tests.len());
        thread::scope(|scope| {
            for (test, slot) in tests.iter().zip(slots.iter_mut()) {
                scope.spawn(move || {
                    let result = check_test(sweep, test, include_subtests);
                    if let Err(e) = &result {
                        fail_fast(sweep, e);
                    }
                    *slot = Some(result);
                });
            }
        });
        let outcomes = collect_slots(slots)?;

        let mut sub_slots = empty_slots(tests.len());
        thread::scope(|scope| {
            for (outcome, slot) in outcomes.into_iter().zip(sub_slots.iter_mut()) {
                let Some(Outcome::Covered(subtests)) = outcome else {
                    continue;
                };
                scope.spawn(move || {
                    let result =
                        expand_subtests(subtests, |subs| self.covering_tests(sweep, subs, false));
                    if let Err(e) = &result {
                        fail_fast(sweep, e);
                    }
                    *slot = Some(result);
                });
            }
        });
        let matched = collect_slots(sub_slots)?;

        let mut covered = Vec::new();
        for (test, subtests) in tests.iter().zip(matched) {
            if let Some(subtests) = subtests {
                covered.push(test.clone());
                covered.extend(subtests);
            }
        }
        Ok(covered)
    }
}

fn empty_slots<T>(len: usize) -> Vec<Option<T>> {
    std::iter::repeat_with(|| None).take(len).collect()
}
