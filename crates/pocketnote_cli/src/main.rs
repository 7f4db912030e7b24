//! PocketNote command-line entry point.

use anyhow::Result;
use clap::Parser;
use pocketnote_cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    pocketnote_core::init_stderr_logging(level).map_err(anyhow::Error::msg)?;

    pocketnote_cli::run(args, &mut std::io::stdout().lock())
}
