use super::{check_test, expand_subtests, CoverFinder, Outcome, Sweep};
use crate::error::Result;

/// Runs one test at a time.
///
/// Slowest, but the only safe choice for integration tests that share
/// external state, and the baseline the concurrent finders are held to.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialFinder;

impl CoverFinder for SequentialFinder {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn covering_tests(
        &self,
        sweep: &Sweep<'_>,
        tests: &[String],
        include_subtests: bool,
    ) -> Result<Vec<String>> {
        let mut covered = Vec::new();

        for test in tests {
            let Outcome::Covered(subtests) = check_test(sweep, test, include_subtests)? else {
                continue;
            };
            covered.push(test.clone());
            covered.extend(expand_subtests(subtests, |subs| {
                self.covering_tests(sweep, subs, false)
            })?);
        }

        Ok(covered)
    }
}
