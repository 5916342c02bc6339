use std::io;

use anyhow::{Context as AnyhowContext, Result};
use clap::Parser;
use testcover::{app, cli, logging};

fn main() -> Result<()> {
    let args = cli::Args::parse();
    args.validate().context("Invalid arguments")?;

    logging::init(logging::Verbosity::from_flags(args.verbose, args.quiet));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    app::run(&args, &mut out)
}
