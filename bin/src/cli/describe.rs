use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use wpsdesc::ProcessDescription;

/// Checks a process description, and prints it in normalised form.
#[derive(Args, Debug)]
pub struct Command {
    /// Path to the YAML process description.
    description: PathBuf,
}

/// Runs the subcommand.
pub fn run(cmd: &Command) -> Result<()> {
    let description: ProcessDescription = super::read_yaml(&cmd.description)?;
    log::info!(
        "Process {} has {} input(s) and {} output(s).",
        description.identifier(),
        description.inputs().len(),
        description.outputs().len(),
    );
    super::print_json(&description)
}
