use std::{collections::BTreeMap, path::PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde_derive::Deserialize;
use wpsdesc::{InputBindings, ProcessDescription, RawValue};

/// Validates arguments against a process description, and prints the bound input values with
/// defaults applied.
#[derive(Args, Debug)]
pub struct Command {
    /// Path to the YAML process description.
    description: PathBuf,

    /// Path to a YAML mapping from input identifier to a value, or to a list of values for inputs
    /// that accept more than one.
    arguments: PathBuf,
}

/// Value(s) supplied for one input.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ArgValue {
    One(RawValue),
    Many(Vec<RawValue>),
}

/// Runs the subcommand.
pub fn run(cmd: &Command) -> Result<()> {
    let description: ProcessDescription = super::read_yaml(&cmd.description)?;
    let args: BTreeMap<String, ArgValue> = super::read_yaml(&cmd.arguments)?;

    let inputs = bind_args(&description, args)?;

    super::print_json(&inputs)
}

fn bind_args(
    description: &ProcessDescription,
    args: BTreeMap<String, ArgValue>,
) -> Result<InputBindings<'_>> {
    let mut inputs = description.bind_inputs();
    for (param_id, arg) in args {
        let bound = match arg {
            ArgValue::One(raw) => inputs.set(&param_id, raw),
            ArgValue::Many(raws) => raws
                .into_iter()
                .try_for_each(|raw| inputs.push(&param_id, raw)),
        };
        bound.with_context(|| format!("binding argument {param_id:?}"))?;
    }
    inputs
        .check_occurs()
        .with_context(|| "checking the number of values of each input")?;
    Ok(inputs)
}
