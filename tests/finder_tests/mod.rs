//! Scheduler tests
//!
//! ## Structure
//! - `equivalence` - Every strategy returns the same sorted result
//! - `subtests` - Sub-test expansion and its single sub-test shortcut
//! - `failures` - Fail-fast behaviour and error reporting

pub mod equivalence;
pub mod failures;
pub mod subtests;

use tempfile::TempDir;
use testcover::error::Result;
use testcover::finder::{CoverFinder, FanOutFinder, PipelineFinder, SequentialFinder, Sweep};
use testcover::toolchain::TestRunner;

use crate::fixtures::{target, PACKAGE};

/// One of each strategy, with the pipeline squeezed down so its queues
/// actually fill up.
pub fn all_finders() -> Vec<Box<dyn CoverFinder>> {
    vec![
        Box::new(SequentialFinder),
        Box::new(FanOutFinder),
        Box::new(PipelineFinder::with_workers(2)),
        Box::new(
            PipelineFinder::with_workers(1)
                .with_check_workers(1)
                .with_queue_capacity(1),
        ),
        Box::new(PipelineFinder::new()),
    ]
}

pub fn find(
    finder: &dyn CoverFinder,
    runner: &dyn TestRunner,
    tests: &[String],
    include_subtests: bool,
) -> Result<Vec<String>> {
    let scratch = TempDir::new().expect("Failed to create scratch directory");
    let binary = runner.compile(PACKAGE, scratch.path(), None)?;
    let position = target();
    let sweep = Sweep::new(runner, &binary, scratch.path(), &position);
    finder.find(&sweep, tests, include_subtests)
}
