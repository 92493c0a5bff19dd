use anyhow::Context;
use mockall::mock;

use crate::{
    bbox::{BoundingBoxSpec, Dimensions},
    descriptor::{ComplexSpec, InputDescriptor, Occurs, OutputDescriptor, ParamInfo},
    format::Format,
    ident::{ParamId, ProcessId},
    literal::{AllowedValues, DataType, LiteralSpec, LiteralSpecConfig, LiteralValue},
    metadata::Metadata,
    process::{ExecutionContext, Process, ProcessDescription},
    value::{ComplexData, Value},
};

pub fn param_id(s: &str) -> ParamId {
    ParamId::new_unchecked(s.to_string())
}

pub fn process_id(s: &str) -> ProcessId {
    ProcessId::new_unchecked(s.to_string())
}

pub fn info(id: &str, title: &str) -> ParamInfo {
    ParamInfo::new(param_id(id), title)
}

pub fn literal_spec(config: LiteralSpecConfig) -> LiteralSpec {
    LiteralSpec::try_from(config).expect("valid literal spec")
}

mock! {
    pub Process {}

    impl Process for Process {
        fn description(&self) -> &ProcessDescription;

        fn execute(&self, ctx: &mut ExecutionContext) -> anyhow::Result<()>;
    }
}

fn add_inputs(description: &mut ProcessDescription, inputs: Vec<InputDescriptor>) {
    for input in inputs {
        description.add_input(input).expect("unique input");
    }
}

fn add_outputs(description: &mut ProcessDescription, outputs: Vec<OutputDescriptor>) {
    for output in outputs {
        description.add_output(output).expect("unique output");
    }
}

/// Copies each named input through to the output of the same identifier.
fn copy_through(ctx: &mut ExecutionContext, param_ids: &[(&str, &str)]) -> anyhow::Result<()> {
    for &(input_id, output_id) in param_ids {
        let value = ctx
            .input(input_id)
            .cloned()
            .with_context(|| format!("input {input_id:?} has no value"))?;
        ctx.set_output(output_id, value.into_raw());
    }
    Ok(())
}

/// Takes and echoes literal values of each data type.
pub struct LiteralProcess {
    description: ProcessDescription,
}

impl LiteralProcess {
    pub fn new() -> Self {
        let mut description = ProcessDescription::new(process_id("literalprocess"), "Literal process")
            .with_metadata([
                Metadata::new(Some("Foobar"), Some("http://foo/bar")),
                Metadata::new(Some("Barfoo"), Some("http://bar/foo")),
                Metadata::new(Some("Literal process"), None),
                Metadata::new(None, Some("http://foobar/")),
            ]);
        add_inputs(
            &mut description,
            vec![
                InputDescriptor::literal(
                    info("int", "Integer data in"),
                    Occurs::ONE,
                    LiteralSpec::new(DataType::Integer),
                ),
                InputDescriptor::literal(
                    info("string", "String data in"),
                    Occurs::ONE,
                    LiteralSpec::new(DataType::String),
                ),
                InputDescriptor::literal(
                    info("float", "Float data in"),
                    Occurs::ONE,
                    LiteralSpec::new(DataType::Float),
                ),
                InputDescriptor::literal(
                    info("zerodefault", "Zero data input"),
                    Occurs::ONE,
                    literal_spec(LiteralSpecConfig {
                        data_type: DataType::Float,
                        default: Some(LiteralValue::Float(0.0)),
                        ..Default::default()
                    }),
                ),
                InputDescriptor::literal(
                    info("zeroset", "Zero data input"),
                    Occurs::OPTIONAL,
                    LiteralSpec::new(DataType::Float),
                ),
                InputDescriptor::literal(
                    info("bool", "Boolean input"),
                    Occurs::ONE,
                    literal_spec(LiteralSpecConfig {
                        data_type: DataType::Boolean,
                        allowed_values: AllowedValues::entries([true, false]),
                        ..Default::default()
                    }),
                ),
            ],
        );
        add_outputs(
            &mut description,
            vec![
                OutputDescriptor::literal(
                    info("int", "Integer data out"),
                    LiteralSpec::new(DataType::Integer),
                ),
                OutputDescriptor::literal(
                    info("string", "String data out"),
                    LiteralSpec::new(DataType::String),
                ),
                OutputDescriptor::literal(
                    info("float", "Float data out"),
                    LiteralSpec::new(DataType::Float),
                ),
                OutputDescriptor::literal(
                    info("bool", "Boolean data out"),
                    LiteralSpec::new(DataType::Boolean),
                ),
            ],
        );
        Self { description }
    }
}

impl Process for LiteralProcess {
    fn description(&self) -> &ProcessDescription {
        &self.description
    }

    fn execute(&self, ctx: &mut ExecutionContext) -> anyhow::Result<()> {
        copy_through(
            ctx,
            &[
                ("int", "int"),
                ("string", "string"),
                ("float", "float"),
                ("bool", "bool"),
            ],
        )
    }
}

pub const RASTER_MIMETYPES: [&str; 10] = [
    "image/tiff",
    "image/geotiff",
    "application/geotiff",
    "application/x-geotiff",
    "image/png",
    "image/gif",
    "image/jpeg",
    "application/x-erdas-hfa",
    "application/netcdf",
    "application/x-netcdf",
];

/// Takes vector and raster payloads, and returns them in its own output formats.
pub struct ComplexProcess {
    description: ProcessDescription,
}

impl ComplexProcess {
    pub fn new() -> Self {
        let mut description = ProcessDescription::new(process_id("complexprocess"), "Complex process")
            .with_store_supported(true);
        add_inputs(
            &mut description,
            vec![
                InputDescriptor::complex(
                    info("vectorin", "Vector file"),
                    Occurs::ONE,
                    ComplexSpec::new(Format::new("application/xml"), None).expect("valid formats"),
                ),
                InputDescriptor::complex(
                    info("rasterin", "Raster file"),
                    Occurs::ONE,
                    ComplexSpec::new(&RASTER_MIMETYPES[..], Some(1.0)).expect("valid formats"),
                ),
                InputDescriptor::literal(
                    info("pause", "Pause the process").with_abstract(
                        "Pause the process for several seconds, so that status=true can be tested",
                    ),
                    Occurs::ONE,
                    literal_spec(LiteralSpecConfig {
                        data_type: DataType::Boolean,
                        default: Some(LiteralValue::Boolean(false)),
                        ..Default::default()
                    }),
                ),
            ],
        );
        add_outputs(
            &mut description,
            vec![
                OutputDescriptor::complex(
                    info("vectorout", "Vector file"),
                    ComplexSpec::new("text/xml", None).expect("valid formats"),
                ),
                OutputDescriptor::complex(
                    info("rasterout", "Raster file"),
                    ComplexSpec::new("image/tiff", None).expect("valid formats"),
                ),
            ],
        );
        Self { description }
    }
}

impl Process for ComplexProcess {
    fn description(&self) -> &ProcessDescription {
        &self.description
    }

    fn execute(&self, ctx: &mut ExecutionContext) -> anyhow::Result<()> {
        for (input_id, output_id) in [("vectorin", "vectorout"), ("rasterin", "rasterout")] {
            let payload = match ctx.input(input_id) {
                Some(Value::Complex(value)) => value.payload.clone(),
                _ => anyhow::bail!("input {input_id:?} has no complex value"),
            };
            // Re-negotiated against the output's own formats.
            ctx.set_output(
                output_id,
                ComplexData {
                    payload,
                    format: Default::default(),
                },
            );
        }
        Ok(())
    }
}

/// Echoes a bounding box.
pub struct BBoxProcess {
    description: ProcessDescription,
}

impl BBoxProcess {
    pub fn new() -> Self {
        let spec = BoundingBoxSpec::new(["EPSG:4326", "EPSG:3857"], Dimensions::Two)
            .expect("valid bounding box spec");
        let mut description = ProcessDescription::new(process_id("bboxprocess"), "BBox process");
        add_inputs(
            &mut description,
            vec![InputDescriptor::bounding_box(
                info("bboxin", "BBox in"),
                Occurs::ONE,
                spec.clone(),
            )],
        );
        add_outputs(
            &mut description,
            vec![OutputDescriptor::bounding_box(info("bboxout", "BBox out"), spec)],
        );
        Self { description }
    }
}

impl Process for BBoxProcess {
    fn description(&self) -> &ProcessDescription {
        &self.description
    }

    fn execute(&self, ctx: &mut ExecutionContext) -> anyhow::Result<()> {
        copy_through(ctx, &[("bboxin", "bboxout")])
    }
}

/// Has parameters whose identifiers look like command line flags.
pub struct FlagsProcess {
    description: ProcessDescription,
}

impl FlagsProcess {
    pub fn new() -> Self {
        let mut description = ProcessDescription::new(
            process_id("flagsprocess"),
            "Dummy process with flags as InputOutput",
        )
        .with_store_supported(true)
        .with_status_supported(true);
        add_inputs(
            &mut description,
            vec![
                InputDescriptor::literal(
                    info("-flag1In", "Literal input flag1"),
                    Occurs::ONE,
                    LiteralSpec::new(DataType::String),
                ),
                InputDescriptor::literal(
                    info("--flag2In", "Literal input flag2"),
                    Occurs::ONE,
                    LiteralSpec::new(DataType::String),
                ),
            ],
        );
        add_outputs(
            &mut description,
            vec![
                OutputDescriptor::literal(
                    info("-flag1Out", "Literal output flag1"),
                    LiteralSpec::new(DataType::String),
                ),
                OutputDescriptor::literal(
                    info("--flag2Out", "Literal output flag2"),
                    LiteralSpec::new(DataType::String),
                ),
            ],
        );
        Self { description }
    }
}

impl Process for FlagsProcess {
    fn description(&self) -> &ProcessDescription {
        &self.description
    }

    fn execute(&self, ctx: &mut ExecutionContext) -> anyhow::Result<()> {
        copy_through(ctx, &[("-flag1In", "-flag1Out"), ("--flag2In", "--flag2Out")])
    }
}
