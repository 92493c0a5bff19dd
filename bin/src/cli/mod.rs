use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use simplelog::LevelFilter;

mod bind;
mod describe;

/// Validates process descriptions and the arguments supplied to them.
#[derive(Parser)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Logging level.
    #[arg(long, default_value = "Warn")]
    log_level: LevelFilter,
}

#[derive(Subcommand)]
enum Command {
    Describe(describe::Command),
    Bind(bind::Command),
}

pub fn run() -> Result<()> {
    let args = Args::parse();

    simplelog::SimpleLogger::init(args.log_level, simplelog::Config::default())
        .with_context(|| "configuring logging")?;

    use Command::*;
    match &args.command {
        Describe(cmd) => describe::run(cmd),
        Bind(cmd) => bind::run(cmd),
    }
}

/// Reads and parses a YAML document.
fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
    serde_yaml_ng::from_str(&content).with_context(|| format!("parsing {:?}", path))
}

/// Writes a value to stdout as pretty-printed JSON.
fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).with_context(|| "encoding output as JSON")?;
    println!("{json}");
    Ok(())
}
