mod cli;
mod platform;

use std::process::ExitCode;

use clap::Parser;

fn main() -> anyhow::Result<ExitCode> {
    let config = cli::Args::parse().into_config();
    platform::run_app(config)
}
