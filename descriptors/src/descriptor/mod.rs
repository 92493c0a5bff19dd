//! Descriptors of the inputs and outputs of a process.
//!
//! A descriptor describes the shape of a parameter only. It is immutable once built and holds no
//! value; values for a single invocation are held by [crate::binding].


use serde::{Deserialize, Serialize};

use crate::{
    bbox::BoundingBoxSpec,
    error::{ConfigurationError, InvalidParameterValue, InvalidValueCause},
    format::{FormatSpec, Formats},
    ident::ParamId,
    literal::LiteralSpec,
    metadata::Metadata,
    value::{ComplexData, ComplexValue, RawValue, Value},
};

const BYTES_PER_MEGABYTE: f64 = 1024.0 * 1024.0;

/// Format of a complex parameter whose definition names none.
pub const DEFAULT_MIMETYPE: &str = "text/xml";

/// Kind of value a parameter takes.
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize, strum_macros::Display,
)]
pub enum ValueKind {
    LiteralValue,
    ComplexValue,
    BoundingBoxValue,
}

/// Whether a parameter is an input or an output of a process.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    Input,
    Output,
}

/// Identification and human-readable metadata shared by inputs and outputs.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ParamInfo {
    pub identifier: ParamId,
    pub title: String,
    #[serde(default, rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metadata: Vec<Metadata>,
}

impl ParamInfo {
    pub fn new(identifier: ParamId, title: impl Into<String>) -> Self {
        Self {
            identifier,
            title: title.into(),
            abstract_text: None,
            metadata: Vec::new(),
        }
    }

    pub fn with_abstract(mut self, abstract_text: impl Into<String>) -> Self {
        self.abstract_text = Some(abstract_text.into());
        self
    }

    pub fn with_metadata(mut self, metadata: impl IntoIterator<Item = Metadata>) -> Self {
        self.metadata.extend(metadata);
        self
    }
}

/// Bounds on how many values an input accepts.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Occurs {
    min_occurs: u32,
    max_occurs: u32,
}

impl Occurs {
    /// Exactly one value.
    pub const ONE: Occurs = Occurs {
        min_occurs: 1,
        max_occurs: 1,
    };

    /// Zero or one value.
    pub const OPTIONAL: Occurs = Occurs {
        min_occurs: 0,
        max_occurs: 1,
    };

    pub fn new(min_occurs: u32, max_occurs: u32) -> Result<Self, ConfigurationError> {
        if min_occurs > max_occurs || max_occurs == 0 {
            return Err(ConfigurationError::InvalidOccurs {
                min: min_occurs,
                max: max_occurs,
            });
        }
        Ok(Self {
            min_occurs,
            max_occurs,
        })
    }

    pub fn min(&self) -> u32 {
        self.min_occurs
    }

    pub fn max(&self) -> u32 {
        self.max_occurs
    }
}

impl Default for Occurs {
    fn default() -> Self {
        Self::ONE
    }
}

/// Supported formats and size limit of a complex parameter.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(try_from = "ComplexSpecConfig")]
pub struct ComplexSpec {
    formats: Formats,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_size_megabytes: Option<f64>,
}

impl ComplexSpec {
    pub fn new(
        formats: impl Into<FormatSpec>,
        max_size_megabytes: Option<f64>,
    ) -> Result<Self, ConfigurationError> {
        if let Some(max) = max_size_megabytes {
            if !max.is_finite() || max <= 0.0 {
                return Err(ConfigurationError::InvalidMaxSize(max));
            }
        }
        Ok(Self {
            formats: Formats::normalize(formats)?,
            max_size_megabytes,
        })
    }

    pub fn formats(&self) -> &Formats {
        &self.formats
    }

    pub fn max_size_megabytes(&self) -> Option<f64> {
        self.max_size_megabytes
    }

    /// Negotiates the requested format, and checks the size of inline content.
    pub fn validate(&self, data: &ComplexData) -> Result<ComplexValue, InvalidValueCause> {
        let format =
            self.formats
                .negotiate(&data.format)
                .ok_or_else(|| InvalidValueCause::UnsupportedFormat {
                    requested: data.format.to_string(),
                })?;

        if let (Some(max_megabytes), Some(size_bytes)) =
            (self.max_size_megabytes, data.payload.inline_size())
        {
            if size_bytes as f64 > max_megabytes * BYTES_PER_MEGABYTE {
                return Err(InvalidValueCause::TooLarge {
                    size_bytes,
                    max_megabytes,
                });
            }
        }

        Ok(ComplexValue {
            payload: data.payload.clone(),
            format: format.clone(),
        })
    }
}

#[derive(Deserialize)]
struct ComplexSpecConfig {
    #[serde(default = "default_formats")]
    formats: FormatSpec,
    #[serde(default)]
    max_size_megabytes: Option<f64>,
}

fn default_formats() -> FormatSpec {
    FormatSpec::from(DEFAULT_MIMETYPE)
}

impl TryFrom<ComplexSpecConfig> for ComplexSpec {
    type Error = ConfigurationError;

    fn try_from(value: ComplexSpecConfig) -> Result<Self, Self::Error> {
        Self::new(value.formats, value.max_size_megabytes)
    }
}

/// Kind-specific rules of a parameter. Fixed when the descriptor is built.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "type", content = "spec")]
pub enum DescriptorKind {
    Literal(LiteralSpec),
    Complex(ComplexSpec),
    BoundingBox(BoundingBoxSpec),
}

impl DescriptorKind {
    pub fn value_kind(&self) -> ValueKind {
        match self {
            DescriptorKind::Literal(_) => ValueKind::LiteralValue,
            DescriptorKind::Complex(_) => ValueKind::ComplexValue,
            DescriptorKind::BoundingBox(_) => ValueKind::BoundingBoxValue,
        }
    }

    /// Validates a raw value. Bounding boxes are passed through unmodified.
    pub fn validate(&self, raw: &RawValue) -> Result<Value, InvalidParameterValue> {
        match (self, raw) {
            (DescriptorKind::Literal(spec), RawValue::Literal(value)) => {
                spec.validate(value).map(Value::Literal)
            }
            (DescriptorKind::Complex(spec), RawValue::Complex(data)) => spec
                .validate(data)
                .map(Value::Complex)
                .map_err(|cause| InvalidParameterValue::new(raw, cause)),
            (DescriptorKind::BoundingBox(_), RawValue::BoundingBox(bbox)) => {
                Ok(Value::BoundingBox(bbox.clone()))
            }
            (kind, raw) => Err(InvalidParameterValue::new(
                raw,
                InvalidValueCause::KindMismatch {
                    expected: kind.value_kind(),
                    got: raw.kind(),
                },
            )),
        }
    }

    /// Returns the value used when none is bound. Only literals have defaults.
    pub fn default_value(&self) -> Option<Value> {
        match self {
            DescriptorKind::Literal(spec) => spec.default_value().cloned().map(Value::Literal),
            DescriptorKind::Complex(_) | DescriptorKind::BoundingBox(_) => None,
        }
    }
}

/// Describes an input parameter of a process.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(try_from = "InputDescriptorConfig")]
pub struct InputDescriptor {
    #[serde(flatten)]
    info: ParamInfo,
    #[serde(flatten)]
    occurs: Occurs,
    #[serde(flatten)]
    kind: DescriptorKind,
}

impl InputDescriptor {
    pub fn new(info: ParamInfo, occurs: Occurs, kind: DescriptorKind) -> Self {
        Self { info, occurs, kind }
    }

    pub fn literal(info: ParamInfo, occurs: Occurs, spec: LiteralSpec) -> Self {
        Self::new(info, occurs, DescriptorKind::Literal(spec))
    }

    pub fn complex(info: ParamInfo, occurs: Occurs, spec: ComplexSpec) -> Self {
        Self::new(info, occurs, DescriptorKind::Complex(spec))
    }

    pub fn bounding_box(info: ParamInfo, occurs: Occurs, spec: BoundingBoxSpec) -> Self {
        Self::new(info, occurs, DescriptorKind::BoundingBox(spec))
    }

    pub fn identifier(&self) -> &ParamId {
        &self.info.identifier
    }

    pub fn info(&self) -> &ParamInfo {
        &self.info
    }

    pub fn occurs(&self) -> Occurs {
        self.occurs
    }

    pub fn kind(&self) -> &DescriptorKind {
        &self.kind
    }

    pub fn value_kind(&self) -> ValueKind {
        self.kind.value_kind()
    }

    pub fn validate(&self, raw: &RawValue) -> Result<Value, InvalidParameterValue> {
        self.kind.validate(raw)
    }

    pub fn default_value(&self) -> Option<Value> {
        self.kind.default_value()
    }
}

#[derive(Deserialize)]
struct InputDescriptorConfig {
    #[serde(flatten)]
    info: ParamInfo,
    #[serde(default = "default_occurs")]
    min_occurs: u32,
    #[serde(default = "default_occurs")]
    max_occurs: u32,
    #[serde(flatten)]
    kind: DescriptorKind,
}

fn default_occurs() -> u32 {
    1
}

impl TryFrom<InputDescriptorConfig> for InputDescriptor {
    type Error = ConfigurationError;

    fn try_from(value: InputDescriptorConfig) -> Result<Self, Self::Error> {
        let occurs = Occurs::new(value.min_occurs, value.max_occurs)?;
        Ok(Self::new(value.info, occurs, value.kind))
    }
}

/// Describes an output parameter of a process.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct OutputDescriptor {
    #[serde(flatten)]
    info: ParamInfo,
    #[serde(flatten)]
    kind: DescriptorKind,
}

impl OutputDescriptor {
    pub fn new(info: ParamInfo, kind: DescriptorKind) -> Self {
        Self { info, kind }
    }

    pub fn literal(info: ParamInfo, spec: LiteralSpec) -> Self {
        Self::new(info, DescriptorKind::Literal(spec))
    }

    pub fn complex(info: ParamInfo, spec: ComplexSpec) -> Self {
        Self::new(info, DescriptorKind::Complex(spec))
    }

    pub fn bounding_box(info: ParamInfo, spec: BoundingBoxSpec) -> Self {
        Self::new(info, DescriptorKind::BoundingBox(spec))
    }

    pub fn identifier(&self) -> &ParamId {
        &self.info.identifier
    }

    pub fn info(&self) -> &ParamInfo {
        &self.info
    }

    pub fn kind(&self) -> &DescriptorKind {
        &self.kind
    }

    pub fn value_kind(&self) -> ValueKind {
        self.kind.value_kind()
    }

    pub fn validate(&self, raw: &RawValue) -> Result<Value, InvalidParameterValue> {
        self.kind.validate(raw)
    }

    pub fn default_value(&self) -> Option<Value> {
        self.kind.default_value()
    }
}
