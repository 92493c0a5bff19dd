//! Values supplied for parameters, before ([RawValue]) and after ([Value]) validation by a
//! descriptor.

use serde::{Deserialize, Serialize};

use crate::{
    bbox::BoundingBox,
    descriptor::ValueKind,
    format::{Format, FormatRequest},
    literal::LiteralValue,
};

/// Content of a complex value: either carried inline, or referenced for later retrieval by the
/// data transport.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexPayload {
    Inline(String),
    Reference(String),
}

impl ComplexPayload {
    /// Returns the size in bytes of inline content.
    pub fn inline_size(&self) -> Option<usize> {
        match self {
            ComplexPayload::Inline(content) => Some(content.len()),
            ComplexPayload::Reference(_) => None,
        }
    }
}

/// A complex value as supplied, with the format its supplier asked for.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ComplexData {
    #[serde(flatten)]
    pub payload: ComplexPayload,
    #[serde(flatten)]
    pub format: FormatRequest,
}

impl ComplexData {
    pub fn inline(content: impl Into<String>) -> Self {
        Self {
            payload: ComplexPayload::Inline(content.into()),
            format: FormatRequest::default(),
        }
    }

    pub fn reference(href: impl Into<String>) -> Self {
        Self {
            payload: ComplexPayload::Reference(href.into()),
            format: FormatRequest::default(),
        }
    }

    pub fn with_format(mut self, format: FormatRequest) -> Self {
        self.format = format;
        self
    }
}

/// A complex value whose format has been negotiated against a descriptor's supported formats.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ComplexValue {
    #[serde(flatten)]
    pub payload: ComplexPayload,
    pub format: Format,
}

/// An unvalidated value, as supplied by the caller of a process or by a process body.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    Literal(LiteralValue),
    BoundingBox(BoundingBox),
    Complex(ComplexData),
}

impl RawValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            RawValue::Literal(_) => ValueKind::LiteralValue,
            RawValue::Complex(_) => ValueKind::ComplexValue,
            RawValue::BoundingBox(_) => ValueKind::BoundingBoxValue,
        }
    }
}

impl std::fmt::Display for RawValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawValue::Literal(value) => write!(f, "{value}"),
            RawValue::Complex(data) => match &data.payload {
                ComplexPayload::Inline(content) => {
                    write!(f, "inline payload of {} bytes {}", content.len(), data.format)
                }
                ComplexPayload::Reference(href) => {
                    write!(f, "reference to {href:?} {}", data.format)
                }
            },
            RawValue::BoundingBox(bbox) => write!(
                f,
                "bounding box {:?} {:?} in {}",
                bbox.lower_corner,
                bbox.upper_corner,
                bbox.crs.as_deref().unwrap_or("the default CRS"),
            ),
        }
    }
}

macro_rules! raw_value_from_literal {
    ($($value_type:ty),*) => {
        $(
            impl From<$value_type> for RawValue {
                fn from(value: $value_type) -> Self {
                    Self::Literal(value.into())
                }
            }
        )*
    };
}

raw_value_from_literal!(LiteralValue, &str, String, i64, f64, bool);

impl From<ComplexData> for RawValue {
    fn from(value: ComplexData) -> Self {
        Self::Complex(value)
    }
}

impl From<BoundingBox> for RawValue {
    fn from(value: BoundingBox) -> Self {
        Self::BoundingBox(value)
    }
}

/// A value that has been validated by a descriptor.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Literal(LiteralValue),
    Complex(ComplexValue),
    BoundingBox(BoundingBox),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Literal(_) => ValueKind::LiteralValue,
            Value::Complex(_) => ValueKind::ComplexValue,
            Value::BoundingBox(_) => ValueKind::BoundingBoxValue,
        }
    }

    pub fn as_literal(&self) -> Option<&LiteralValue> {
        match self {
            Value::Literal(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_complex(&self) -> Option<&ComplexValue> {
        match self {
            Value::Complex(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bounding_box(&self) -> Option<&BoundingBox> {
        match self {
            Value::BoundingBox(value) => Some(value),
            _ => None,
        }
    }

    /// Converts back into a [RawValue], for passing a validated input through to an output.
    pub fn into_raw(self) -> RawValue {
        match self {
            Value::Literal(value) => RawValue::Literal(value),
            Value::Complex(value) => RawValue::Complex(ComplexData {
                payload: value.payload,
                format: FormatRequest {
                    mimetype: Some(value.format.mimetype),
                    encoding: value.format.encoding,
                    schema: value.format.schema,
                },
            }),
            Value::BoundingBox(value) => RawValue::BoundingBox(value),
        }
    }
}
