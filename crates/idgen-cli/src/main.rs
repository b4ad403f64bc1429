#![doc = include_str!("../README.md")]

mod command;
mod config;
mod telemetry;

use clap::Parser;
use config::{CliArgs, CliConfig};
use telemetry::init_telemetry;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = CliConfig::try_from(args)?;

    init_telemetry()?;

    let mut out = std::io::stdout().lock();
    command::run(&config, &mut out)
}
