use std::thread;

use crossbeam_channel::{bounded, select, unbounded, Receiver, Sender};
use tracing::{debug, trace};

use super::{
    check_run, collect_slots, expand_subtests, fail_fast, run_test, CoverFinder, Outcome, Sweep,
};
use crate::error::Result;
use crate::toolchain::TestRun;

const RUN_WORKERS_PER_CPU: usize = 2;

type Job<'t> = (usize, &'t String);
type Matched = Result<Option<Vec<String>>>;

/// A two stage worker pool.
///
/// A generator feeds candidates into a bounded queue drained by
/// `run_workers` threads that execute tests; their runs go through a second
/// bounded queue to `check_workers` threads that read the coverage, check
/// the target and recurse into sub-tests. A single collector on the calling
/// thread stores every result in the slot of its candidate.
#[derive(Debug, Clone, Copy)]
pub struct PipelineFinder {
    run_workers: usize,
    check_workers: usize,
    queue_capacity: usize,
}

impl PipelineFinder {
    pub fn new() -> Self {
        Self::with_workers(num_cpus::get() * RUN_WORKERS_PER_CPU)
    }

    pub fn with_workers(run_workers: usize) -> Self {
        let run_workers = run_workers.max(1);
        Self {
            run_workers,
            check_workers: (run_workers / RUN_WORKERS_PER_CPU).max(1),
            queue_capacity: run_workers,
        }
    }

    pub fn with_check_workers(mut self, check_workers: usize) -> Self {
        self.check_workers = check_workers.max(1);
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    pub fn run_workers(&self) -> usize {
        self.run_workers
    }

    pub fn check_workers(&self) -> usize {
        self.check_workers
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    fn run_stage<'t>(
        &self,
        sweep: &Sweep<'_>,
        jobs: Receiver<Job<'t>>,
        runs: Sender<(usize, TestRun)>,
        results: Sender<(usize, Matched)>,
        include_subtests: bool,
    ) {
        let cancel = sweep.cancellation().signal().clone();
        loop {
            let (index, test) = select! {
                recv(jobs) -> job => match job {
                    Ok(job) => job,
                    Err(_) => return,
                },
                recv(cancel) -> _ => return,
            };

            match run_test(sweep, test, include_subtests) {
                Ok(run) => select! {
                    send(runs, (index, run)) -> sent => if sent.is_err() { return },
                    recv(cancel) -> _ => return,
                },
                Err(e) => {
                    let _ = results.send((index, Err(e)));
                }
            }
        }
    }

    fn check_stage(
        &self,
        sweep: &Sweep<'_>,
        runs: Receiver<(usize, TestRun)>,
        results: Sender<(usize, Matched)>,
        include_subtests: bool,
    ) {
        let cancel = sweep.cancellation().signal().clone();
        loop {
            let (index, run) = select! {
                recv(runs) -> run => match run {
                    Ok(run) => run,
                    Err(_) => return,
                },
                recv(cancel) -> _ => return,
            };

            let matched = check_run(sweep, &run, include_subtests).and_then(|outcome| {
                let Outcome::Covered(subtests) = outcome else {
                    return Ok(None);
                };
                let mut covered = vec![run.test_name.clone()];
                covered.extend(expand_subtests(subtests, |subs| {
                    self.covering_tests(sweep, subs, false)
                })?);
                Ok(Some(covered))
            });

            if results.send((index, matched)).is_err() {
                return;
            }
        }
    }
}

impl Default for PipelineFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl CoverFinder for PipelineFinder {
    fn name(&self) -> &'static str {
        "pipeline"
    }

    fn covering_tests(
        &self,
        sweep: &Sweep<'_>,
        tests: &[String],
        include_subtests: bool,
    ) -> Result<Vec<String>> {
        if tests.is_empty() {
            return Ok(Vec::new());
        }
        debug!(
            candidates = tests.len(),
            run_workers = self.run_workers,
            check_workers = self.check_workers,
            "starting pipeline"
        );

        let (job_tx, job_rx) = bounded(self.queue_capacity);
        let (run_tx, run_rx) = bounded::<(usize, TestRun)>(self.queue_capacity);
        let (result_tx, result_rx) = unbounded::<(usize, Matched)>();
        let mut slots: Vec<Option<Matched>> =
            std::iter::repeat_with(|| None).take(tests.len()).collect();

        thread::scope(|scope| {
            let cancel = sweep.cancellation().signal().clone();
            scope.spawn(move || {
                for job in tests.iter().enumerate() {
                    select! {
                        send(job_tx, job) -> sent => if sent.is_err() { break },
                        recv(cancel) -> _ => {
                            trace!("generator stopped");
                            break;
                        }
                    }
                }
            });

            for _ in 0..self.run_workers {
                let (jobs, runs, results) = (job_rx.clone(), run_tx.clone(), result_tx.clone());
                scope.spawn(move || self.run_stage(sweep, jobs, runs, results, include_subtests));
            }
            for _ in 0..self.check_workers {
                let (runs, results) = (run_rx.clone(), result_tx.clone());
                scope.spawn(move || self.check_stage(sweep, runs, results, include_subtests));
            }
            drop((job_rx, run_tx, run_rx, result_tx));

            for (index, matched) in result_rx.iter() {
                if let Err(e) = &matched {
                    fail_fast(sweep, e);
                }
                slots[index] = Some(matched);
            }
        });

        Ok(collect_slots(slots)?
            .into_iter()
            .flatten()
            .flatten()
            .flatten()
            .collect())
    }
}
