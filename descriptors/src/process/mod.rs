//! Descriptions of processes, and the harness that runs a process body against one invocation's
//! bindings.


use serde::{Deserialize, Serialize};

use crate::{
    binding::{InputBindings, OutputBindings, Parameter},
    descriptor::{Direction, InputDescriptor, OutputDescriptor},
    error::{BindingError, ConfigurationError, ExecutionError},
    ident::{ParamId, ProcessId},
    literal::LiteralValue,
    metadata::Metadata,
    value::{RawValue, Value},
};

/// Describes a process and the parameters it takes and produces.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(try_from = "ProcessDescriptionConfig")]
pub struct ProcessDescription {
    identifier: ProcessId,
    title: String,
    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    abstract_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    metadata: Vec<Metadata>,
    store_supported: bool,
    status_supported: bool,
    inputs: Vec<InputDescriptor>,
    outputs: Vec<OutputDescriptor>,
}

impl ProcessDescription {
    pub fn new(identifier: ProcessId, title: impl Into<String>) -> Self {
        Self {
            identifier,
            title: title.into(),
            abstract_text: None,
            version: None,
            metadata: Vec::new(),
            store_supported: false,
            status_supported: false,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn with_abstract(mut self, abstract_text: impl Into<String>) -> Self {
        self.abstract_text = Some(abstract_text.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_metadata(mut self, metadata: impl IntoIterator<Item = Metadata>) -> Self {
        self.metadata.extend(metadata);
        self
    }

    pub fn with_store_supported(mut self, store_supported: bool) -> Self {
        self.store_supported = store_supported;
        self
    }

    pub fn with_status_supported(mut self, status_supported: bool) -> Self {
        self.status_supported = status_supported;
        self
    }

    /// Adds an input. Fails if an input with the same identifier was already added.
    pub fn add_input(&mut self, input: InputDescriptor) -> Result<(), ConfigurationError> {
        check_unique(Direction::Input, &self.inputs, input.identifier())?;
        log::debug!(
            "Process {} gains input {} ({}).",
            self.identifier,
            input.identifier(),
            input.value_kind(),
        );
        self.inputs.push(input);
        Ok(())
    }

    /// Adds an output. Fails if an output with the same identifier was already added. Outputs may
    /// share identifiers with inputs.
    pub fn add_output(&mut self, output: OutputDescriptor) -> Result<(), ConfigurationError> {
        check_unique(Direction::Output, &self.outputs, output.identifier())?;
        log::debug!(
            "Process {} gains output {} ({}).",
            self.identifier,
            output.identifier(),
            output.value_kind(),
        );
        self.outputs.push(output);
        Ok(())
    }

    pub fn identifier(&self) -> &ProcessId {
        &self.identifier
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn abstract_text(&self) -> Option<&str> {
        self.abstract_text.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn metadata(&self) -> &[Metadata] {
        &self.metadata
    }

    pub fn store_supported(&self) -> bool {
        self.store_supported
    }

    pub fn status_supported(&self) -> bool {
        self.status_supported
    }

    pub fn inputs(&self) -> &[InputDescriptor] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[OutputDescriptor] {
        &self.outputs
    }

    pub fn input(&self, param_id: &str) -> Option<&InputDescriptor> {
        self.inputs
            .iter()
            .find(|input| input.identifier().as_ref() == param_id)
    }

    pub fn output(&self, param_id: &str) -> Option<&OutputDescriptor> {
        self.outputs
            .iter()
            .find(|output| output.identifier().as_ref() == param_id)
    }

    /// Creates empty input bindings for one invocation of this process.
    pub fn bind_inputs(&self) -> InputBindings<'_> {
        InputBindings::for_inputs(self)
    }
}

fn check_unique<P: Parameter>(
    direction: Direction,
    existing: &[P],
    identifier: &ParamId,
) -> Result<(), ConfigurationError> {
    if existing.iter().any(|param| param.identifier() == identifier) {
        return Err(ConfigurationError::DuplicateIdentifier {
            direction,
            identifier: identifier.clone(),
        });
    }
    Ok(())
}

/// Unvalidated fields of a [ProcessDescription], as written in a process definition.
#[derive(Deserialize)]
struct ProcessDescriptionConfig {
    identifier: ProcessId,
    title: String,
    #[serde(default, rename = "abstract")]
    abstract_text: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    metadata: Vec<Metadata>,
    #[serde(default)]
    store_supported: bool,
    #[serde(default)]
    status_supported: bool,
    #[serde(default)]
    inputs: Vec<InputDescriptor>,
    #[serde(default)]
    outputs: Vec<OutputDescriptor>,
}

impl TryFrom<ProcessDescriptionConfig> for ProcessDescription {
    type Error = ConfigurationError;

    fn try_from(value: ProcessDescriptionConfig) -> Result<Self, Self::Error> {
        let mut description = Self {
            abstract_text: value.abstract_text,
            version: value.version,
            metadata: value.metadata,
            store_supported: value.store_supported,
            status_supported: value.status_supported,
            ..Self::new(value.identifier, value.title)
        };
        for input in value.inputs {
            description.add_input(input)?;
        }
        for output in value.outputs {
            description.add_output(output)?;
        }
        Ok(description)
    }
}

/// Per-invocation view given to a process body: resolved inputs to read, and raw outputs to write.
#[derive(Debug, Default)]
pub struct ExecutionContext {
    inputs: hashbrown::HashMap<ParamId, Vec<Value>>,
    outputs: Vec<(String, RawValue)>,
}

impl ExecutionContext {
    /// Snapshots the resolved values of the inputs, with defaults applied.
    pub fn new(inputs: &InputBindings<'_>) -> Result<Self, BindingError> {
        let mut resolved = hashbrown::HashMap::new();
        for param in inputs.params() {
            let values = inputs.get_all(param.identifier().as_ref())?;
            if !values.is_empty() {
                resolved.insert(param.identifier().clone(), values);
            }
        }
        Ok(Self {
            inputs: resolved,
            outputs: Vec::new(),
        })
    }

    /// Returns the first value of the input, if it has any.
    pub fn input(&self, param_id: &str) -> Option<&Value> {
        self.inputs.get(param_id).and_then(|values| values.first())
    }

    /// Returns all values of the input.
    pub fn input_all(&self, param_id: &str) -> &[Value] {
        self.inputs.get(param_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn literal_input(&self, param_id: &str) -> Option<&LiteralValue> {
        self.input(param_id).and_then(Value::as_literal)
    }

    /// Records a value for an output. Outputs are validated after the body returns.
    pub fn set_output(&mut self, param_id: impl Into<String>, raw: impl Into<RawValue>) {
        self.outputs.push((param_id.into(), raw.into()));
    }
}

/// Body of a process, run against the values of one invocation.
///
/// Implementations are expected to be stateless with regards to invocations: everything specific
/// to an invocation arrives through the [ExecutionContext].
pub trait Process {
    fn description(&self) -> &ProcessDescription;

    fn execute(&self, ctx: &mut ExecutionContext) -> anyhow::Result<()>;
}

/// Runs one invocation of `process` with the given inputs, returning its validated outputs.
pub fn execute<'a>(
    process: &'a dyn Process,
    inputs: &InputBindings<'_>,
) -> Result<OutputBindings<'a>, ExecutionError> {
    let description = process.description();
    let process_id = description.identifier();

    let mut ctx = inputs
        .check_occurs()
        .and_then(|()| ExecutionContext::new(inputs))
        .map_err(|source| {
            log::error!("Inputs rejected for process {process_id}: {source}");
            ExecutionError::Inputs {
                process_id: process_id.clone(),
                source,
            }
        })?;

    log::info!("Executing process {process_id}.");
    if let Err(error) = process.execute(&mut ctx) {
        log::error!("Process {process_id} failed: {error:?}");
        return Err(ExecutionError::Process {
            process_id: process_id.clone(),
            error,
        });
    }

    let mut outputs = OutputBindings::for_outputs(description);
    for (param_id, raw) in ctx.outputs {
        outputs.set(&param_id, raw).map_err(|source| {
            log::error!("Process {process_id} produced an invalid output: {source}");
            ExecutionError::Outputs {
                process_id: process_id.clone(),
                source,
            }
        })?;
    }
    log::info!("Process {process_id} completed.");

    Ok(outputs)
}
