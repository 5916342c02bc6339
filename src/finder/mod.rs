//! Scheduling strategies that decide which candidate tests cover a position.
//!
//! Every strategy runs the same per-test check (run, read coverage, test the
//! target, optionally list sub-tests) and differs only in how the checks are
//! spread over threads. All of them return the same sorted result, and none
//! of them returns a partial result: the first failing test fails the sweep.

mod cancel;
mod fan_out;
mod pipeline;
mod sequential;

pub use cancel::Cancellation;
pub use fan_out::FanOutFinder;
pub use pipeline::PipelineFinder;
pub use sequential::SequentialFinder;

use std::path::Path;

use tracing::{info, trace, warn};

use crate::cli::Strategy;
use crate::cover::Profile;
use crate::error::{Error, Result};
use crate::toolchain::{passing_subtests, Position, TestBinary, TestRun, TestRunner};

/// Everything one sweep shares between its units of work.
pub struct Sweep<'a> {
    pub runner: &'a dyn TestRunner,
    pub binary: &'a TestBinary,
    pub scratch: &'a Path,
    pub target: &'a Position,
    cancel: Cancellation,
}

impl<'a> Sweep<'a> {
    pub fn new(
        runner: &'a dyn TestRunner,
        binary: &'a TestBinary,
        scratch: &'a Path,
        target: &'a Position,
    ) -> Self {
        Self {
            runner,
            binary,
            scratch,
            target,
            cancel: Cancellation::new(),
        }
    }

    pub fn cancellation(&self) -> &Cancellation {
        &self.cancel
    }
}

pub trait CoverFinder: Send + Sync {
    fn name(&self) -> &'static str;

    /// Covering tests among `tests`, each matched test immediately followed
    /// by its matched sub-tests, in candidate order.
    fn covering_tests(
        &self,
        sweep: &Sweep<'_>,
        tests: &[String],
        include_subtests: bool,
    ) -> Result<Vec<String>>;

    /// Covering tests among `tests`, sorted.
    fn find(
        &self,
        sweep: &Sweep<'_>,
        tests: &[String],
        include_subtests: bool,
    ) -> Result<Vec<String>> {
        info!(
            finder = self.name(),
            candidates = tests.len(),
            include_subtests,
            "searching for covering tests"
        );
        let mut covered = self.covering_tests(sweep, tests, include_subtests)?;
        covered.sort();
        Ok(covered)
    }
}

pub fn build(strategy: Strategy, workers: Option<usize>) -> Box<dyn CoverFinder> {
    match strategy {
        Strategy::Sequential => Box::new(SequentialFinder),
        Strategy::FanOut => Box::new(FanOutFinder),
        Strategy::Pipeline => Box::new(
            workers.map_or_else(PipelineFinder::new, PipelineFinder::with_workers),
        ),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Outcome {
    Uncovered,
    /// Covered; carries the passing sub-tests when they were asked for.
    Covered(Vec<String>),
}

pub(crate) fn run_test(sweep: &Sweep<'_>, test: &str, include_subtests: bool) -> Result<TestRun> {
    if sweep.cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }
    sweep
        .runner
        .run_test(sweep.binary, sweep.scratch, test, include_subtests, &sweep.cancel)
}

pub(crate) fn check_run(sweep: &Sweep<'_>, run: &TestRun, include_subtests: bool) -> Result<Outcome> {
    if sweep.cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }

    let target = sweep.target;
    let profile = Profile::from_path(&run.cover_profile)?;
    if !profile.covers(&target.file, target.line, target.col) {
        trace!(test = %run.test_name, "does not cover target");
        return Ok(Outcome::Uncovered);
    }

    let subtests = if include_subtests {
        passing_subtests(&run.events)?
    } else {
        Vec::new()
    };
    trace!(test = %run.test_name, subtests = subtests.len(), "covers target");
    Ok(Outcome::Covered(subtests))
}

pub(crate) fn check_test(sweep: &Sweep<'_>, test: &str, include_subtests: bool) -> Result<Outcome> {
    let run = run_test(sweep, test, include_subtests)?;
    check_run(sweep, &run, include_subtests)
}

/// Resolves the sub-tests of a covering test into the covering ones.
///
/// A lone sub-test covers whatever its parent covers, so it is accepted
/// without another run. Recursion never asks for sub-tests again, which
/// bounds the depth at one level of sub-tests.
pub(crate) fn expand_subtests<F>(subtests: Vec<String>, recurse: F) -> Result<Vec<String>>
where
    F: FnOnce(&[String]) -> Result<Vec<String>>,
{
    match subtests.len() {
        0 | 1 => Ok(subtests),
        _ => recurse(&subtests),
    }
}

pub(crate) fn fail_fast(sweep: &Sweep<'_>, error: &Error) {
    if !error.is_cancelled() {
        warn!(error = %error, "test check failed, cancelling remaining work");
        sweep.cancel.cancel();
    }
}

/// Unwraps per-candidate result slots.
///
/// The first real error in candidate order wins over cancellations, which
/// only ever follow some other failure.
pub(crate) fn collect_slots<T>(slots: Vec<Option<Result<T>>>) -> Result<Vec<Option<T>>> {
    let mut cancelled = false;
    let mut values = Vec::with_capacity(slots.len());

    for slot in slots {
        match slot {
            Some(Ok(value)) => values.push(Some(value)),
            Some(Err(Error::Cancelled)) => {
                cancelled = true;
                values.push(None);
            }
            Some(Err(e)) => return Err(e),
            None => values.push(None),
        }
    }

    if cancelled {
        return Err(Error::Cancelled);
    }
    Ok(values)
}
