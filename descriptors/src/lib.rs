//! Descriptors for the inputs and outputs of geoprocessing processes, the validation of values
//! supplied for them, and per-invocation binding of those values.

pub mod bbox;
pub mod binding;
pub mod descriptor;
pub mod error;
pub mod format;
pub mod ident;
pub mod literal;
pub mod metadata;
pub mod process;
#[cfg(test)]
mod testutil;
pub mod value;

pub use bbox::{BoundingBox, BoundingBoxSpec, Dimensions};
pub use binding::{Bindings, InputBindings, OutputBindings, Parameter};
pub use descriptor::{
    ComplexSpec, DescriptorKind, InputDescriptor, Occurs, OutputDescriptor, ParamInfo, ValueKind,
};
pub use error::{
    BindingError, CoercionError, ConfigurationError, ExecutionError, InvalidParameterValue,
    InvalidValueCause,
};
pub use format::{Format, FormatRequest, FormatSpec, Formats};
pub use ident::{ParamId, ProcessId};
pub use literal::{AllowedValue, AllowedValues, DataType, LiteralSpec, LiteralValue};
pub use metadata::Metadata;
pub use process::{ExecutionContext, Process, ProcessDescription};
pub use value::{ComplexData, ComplexPayload, ComplexValue, RawValue, Value};
