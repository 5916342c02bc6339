use crate::cli::{Args, Strategy};
use crate::toolchain::config::{DEFAULT_RUN_PATTERN, GO_COMMAND};

/// How a [`Tester`](crate::tester::Tester) searches for covering tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub include_subtests: bool,
    pub short: bool,
    /// Regular expression selecting the candidate tests.
    pub run: String,
    pub strategy: Strategy,
    /// Runner threads for [`Strategy::Pipeline`].
    pub workers: Option<usize>,
    pub go_command: String,
}

impl Config {
    pub fn new() -> Self {
        Self {
            include_subtests: false,
            short: false,
            run: DEFAULT_RUN_PATTERN.to_string(),
            strategy: Strategy::default(),
            workers: None,
            go_command: GO_COMMAND.to_string(),
        }
    }

    pub fn with_include_subtests(mut self, include_subtests: bool) -> Self {
        self.include_subtests = include_subtests;
        self
    }

    pub fn with_short(mut self, short: bool) -> Self {
        self.short = short;
        self
    }

    pub fn with_run(mut self, run: impl Into<String>) -> Self {
        self.run = run.into();
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn with_go_command(mut self, go_command: impl Into<String>) -> Self {
        self.go_command = go_command.into();
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        Self {
            include_subtests: args.include_subs,
            short: args.short,
            run: args.run.clone(),
            strategy: args.strategy(),
            workers: args.workers,
            ..Self::new()
        }
    }
}
