use std::io::Write;
use std::path::Path;

use anyhow::{Context as AnyhowContext, Result};
use tracing::debug;

use crate::cli::{parse_position, Args};
use crate::config::Config;
use crate::output::{group_positions, print_positions, print_tests};
use crate::positions::package_tests;
use crate::tester::Tester;

/// Runs one search described by `args`, writing the result to `dst`.
pub fn run(args: &Args, dst: &mut impl Write) -> Result<()> {
    let position = parse_position(&args.position).context("Error parsing position arg")?;
    let config = Config::from(args);
    debug!(strategy = config.strategy.as_str(), "starting search");

    let tester = Tester::new(&position.file, position.line, position.col, config)
        .context("Error constructing tester")?;
    let covered_by = tester
        .covered_by()
        .context("Error determining covering tests")?;

    if !args.print_positions {
        return print_tests(dst, &covered_by, args.json).context("Error writing output");
    }

    let dir = position.file.parent().unwrap_or(Path::new(""));
    let all_positions = package_tests(dir)
        .with_context(|| format!("Error finding tests in {}", dir.display()))?;
    let grouped = group_positions(&all_positions, &covered_by, args.include_subs);
    print_positions(dst, &grouped, args.json, &args.line_fmt).context("Error writing output")
}
