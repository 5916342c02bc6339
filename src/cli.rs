use std::path::PathBuf;
use std::sync::OnceLock;

use anyhow::{Context as AnyhowContext, Result};
use clap::{Parser, ValueEnum};
use regex::Regex;

use crate::error::ParseError;

pub const DEFAULT_LINE_FMT: &str = "%t:%f:%l:%c:%s";

const POSITION_PATTERN: &str = r"^(.+\.go):([0-9]+)(?:\.([0-9]+))?$";

static POSITION_REGEX: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Strategy {
    /// One test at a time
    Sequential,
    /// One thread per candidate test
    #[default]
    FanOut,
    /// Bounded pools of runner and checker threads
    Pipeline,
}

#[derive(Parser, Debug)]
#[command(name = "testcover")]
#[command(about = "Prints the tests (and optionally sub-tests) which cover a specified block of Go code", long_about = None)]
pub struct Args {
    /// Position to check, formatted as file.go:line[.column]
    #[arg(value_name = "POSITION")]
    pub position: String,

    /// Find specific sub-tests which cover the specified block
    #[arg(long)]
    pub include_subs: bool,

    /// Set '-test.short' when running tests for coverage
    #[arg(long)]
    pub short: bool,

    /// Check only tests matching the regular expression
    #[arg(long, value_name = "REGEXP", default_value = ".")]
    pub run: String,

    /// Run all tests sequentially; slow, but may be necessary for integration tests
    #[arg(long, conflicts_with = "strategy")]
    pub seq: bool,

    /// How candidate tests are scheduled
    #[arg(long, value_enum, default_value_t = Strategy::FanOut)]
    pub strategy: Strategy,

    /// Runner threads for the pipeline strategy (defaults to twice the CPU count)
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    /// Print the output in JSON format
    #[arg(long)]
    pub json: bool,

    /// Print the positions of the found tests
    #[arg(long)]
    pub print_positions: bool,

    /// With --print-positions: template for each line. %t test name, %f file,
    /// %l line, %c column, %o offset, %s sub-tests (comma separated)
    #[arg(long, value_name = "FMT", default_value = DEFAULT_LINE_FMT)]
    pub line_fmt: String,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// A position argument as the user spelled it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionArg {
    pub file: PathBuf,
    pub line: usize,
    pub col: usize,
}

impl Args {
    pub fn validate(&self) -> Result<()> {
        parse_position(&self.position).context("Invalid position argument")?;
        Regex::new(&self.run)
            .with_context(|| format!("Invalid --run expression: {}", self.run))?;
        if self.workers == Some(0) {
            anyhow::bail!("--workers must be at least 1");
        }
        if self.print_positions && self.line_fmt.is_empty() {
            anyhow::bail!("--line-fmt must not be empty");
        }
        Ok(())
    }

    pub fn strategy(&self) -> Strategy {
        if self.seq {
            Strategy::Sequential
        } else {
            self.strategy
        }
    }
}

pub fn parse_position(arg: &str) -> Result<PositionArg, ParseError> {
    let regex = POSITION_REGEX
        .get_or_init(|| Regex::new(POSITION_PATTERN).expect("position pattern is valid"));
    let caps = regex.captures(arg).ok_or_else(|| ParseError::position(arg))?;

    let number = |value: &str| value.parse::<usize>().map_err(|_| ParseError::position(arg));
    let line = number(&caps[2])?;
    let col = match caps.get(3) {
        Some(col) => number(col.as_str())?,
        None => 0,
    };

    Ok(PositionArg {
        file: PathBuf::from(&caps[1]),
        line,
        col,
    })
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Sequential => "sequential",
            Strategy::FanOut => "fan-out",
            Strategy::Pipeline => "pipeline",
        }
    }
}
