//! Errors raised while building descriptors and while validating and binding values.

use crate::{
    descriptor::{Direction, ValueKind},
    ident::{ParamId, ProcessId, ValueError},
    literal::{DataType, LiteralValue},
};

/// Failure to convert a raw literal value to a [DataType].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("cannot convert to {data_type}: {reason}")]
pub struct CoercionError {
    pub data_type: DataType,
    pub reason: String,
}

/// Why a value was rejected.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum InvalidValueCause {
    #[error(transparent)]
    Coercion(#[from] CoercionError),
    #[error("no allowed value accepts the value")]
    NoMatchingDomainEntry,
    #[error("format {requested} is not supported")]
    UnsupportedFormat { requested: String },
    #[error("inline payload of {size_bytes} bytes exceeds the limit of {max_megabytes} megabytes")]
    TooLarge {
        size_bytes: usize,
        max_megabytes: f64,
    },
    #[error("expected a {expected} but got a {got}")]
    KindMismatch { expected: ValueKind, got: ValueKind },
}

/// A value rejected by a descriptor. Carries a rendering of the offending raw value.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("invalid parameter value {value}: {cause}")]
pub struct InvalidParameterValue {
    pub value: String,
    #[source]
    pub cause: InvalidValueCause,
}

impl InvalidParameterValue {
    pub fn new(value: impl std::fmt::Display, cause: impl Into<InvalidValueCause>) -> Self {
        Self {
            value: value.to_string(),
            cause: cause.into(),
        }
    }
}

/// Construction-time violation in a descriptor or process description.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("format list must not be empty")]
    EmptyFormats,
    #[error("format mimetype must not be empty")]
    EmptyMimetype,
    #[error("supported CRS list must not be empty")]
    EmptySupportedCrs,
    #[error("bounding box dimensions must be 2 or 3, got {0}")]
    InvalidDimensions(u8),
    #[error("invalid occurrence bounds min_occurs={min} max_occurs={max}")]
    InvalidOccurs { min: u32, max: u32 },
    #[error("range bounds must be numeric, got [{low}, {high}]")]
    NonNumericRange {
        low: LiteralValue,
        high: LiteralValue,
    },
    #[error("spacing must be a positive finite number, got {0}")]
    InvalidSpacing(f64),
    #[error("maximum size must be a positive finite number of megabytes, got {0}")]
    InvalidMaxSize(f64),
    #[error("default value is not valid for the parameter")]
    InvalidDefault(#[source] InvalidParameterValue),
    #[error("duplicate {direction} identifier {identifier:?}")]
    DuplicateIdentifier {
        direction: Direction,
        identifier: ParamId,
    },
    #[error(transparent)]
    InvalidIdentifier(#[from] ValueError<String>),
}

/// Failure to bind a value to a parameter for one invocation.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum BindingError {
    #[error("unknown parameter {0:?}")]
    UnknownParameter(String),
    #[error("invalid value for parameter {param_id:?}")]
    InvalidParameterValue {
        param_id: ParamId,
        #[source]
        source: InvalidParameterValue,
    },
    #[error("parameter {param_id:?} accepts at most {max_occurs} value(s)")]
    TooManyValues { param_id: ParamId, max_occurs: u32 },
    #[error("parameter {param_id:?} requires at least {min_occurs} value(s), got {got}")]
    MissingParameterValue {
        param_id: ParamId,
        min_occurs: u32,
        got: usize,
    },
}

/// Failure of a single process execution.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    #[error("invalid inputs for process {process_id}")]
    Inputs {
        process_id: ProcessId,
        #[source]
        source: BindingError,
    },
    #[error("process {process_id} failed: {error:#}")]
    Process {
        process_id: ProcessId,
        error: anyhow::Error,
    },
    #[error("process {process_id} produced invalid outputs")]
    Outputs {
        process_id: ProcessId,
        #[source]
        source: BindingError,
    },
}
