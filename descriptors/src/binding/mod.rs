//! Values bound to the parameters of a process for a single invocation.
//!
//! Bindings are created fresh per invocation from a [ProcessDescription], so that values never
//! leak between invocations that share a description.


use serde::ser::SerializeMap;

use crate::{
    descriptor::{InputDescriptor, Occurs, OutputDescriptor},
    error::{BindingError, InvalidParameterValue},
    ident::ParamId,
    literal::LiteralValue,
    process::ProcessDescription,
    value::{RawValue, Value},
};

/// A descriptor that values can be bound against.
pub trait Parameter {
    fn identifier(&self) -> &ParamId;

    fn occurs(&self) -> Occurs;

    fn validate(&self, raw: &RawValue) -> Result<Value, InvalidParameterValue>;

    fn default_value(&self) -> Option<Value>;
}

impl Parameter for InputDescriptor {
    fn identifier(&self) -> &ParamId {
        InputDescriptor::identifier(self)
    }

    fn occurs(&self) -> Occurs {
        InputDescriptor::occurs(self)
    }

    fn validate(&self, raw: &RawValue) -> Result<Value, InvalidParameterValue> {
        InputDescriptor::validate(self, raw)
    }

    fn default_value(&self) -> Option<Value> {
        InputDescriptor::default_value(self)
    }
}

impl Parameter for OutputDescriptor {
    fn identifier(&self) -> &ParamId {
        OutputDescriptor::identifier(self)
    }

    /// Outputs take at most one value, and may be left unset.
    fn occurs(&self) -> Occurs {
        Occurs::OPTIONAL
    }

    fn validate(&self, raw: &RawValue) -> Result<Value, InvalidParameterValue> {
        OutputDescriptor::validate(self, raw)
    }

    fn default_value(&self) -> Option<Value> {
        OutputDescriptor::default_value(self)
    }
}

/// Validated values bound to a set of parameters, keyed by [ParamId].
#[derive(Debug)]
pub struct Bindings<'a, P> {
    params: &'a [P],
    values: hashbrown::HashMap<ParamId, Vec<Value>>,
}

pub type InputBindings<'a> = Bindings<'a, InputDescriptor>;
pub type OutputBindings<'a> = Bindings<'a, OutputDescriptor>;

impl<'a> InputBindings<'a> {
    /// Creates empty input bindings for one invocation of the described process.
    pub fn for_inputs(description: &'a ProcessDescription) -> Self {
        Self::new(description.inputs())
    }
}

impl<'a> OutputBindings<'a> {
    /// Creates empty output bindings for one invocation of the described process.
    pub fn for_outputs(description: &'a ProcessDescription) -> Self {
        Self::new(description.outputs())
    }
}

impl<'a, P: Parameter> Bindings<'a, P> {
    pub fn new(params: &'a [P]) -> Self {
        Self {
            params,
            values: Default::default(),
        }
    }

    /// Returns the parameters values are bound against.
    pub fn params(&self) -> &'a [P] {
        self.params
    }

    fn param(&self, param_id: &str) -> Result<&'a P, BindingError> {
        self.params
            .iter()
            .find(|param| param.identifier().as_ref() == param_id)
            .ok_or_else(|| BindingError::UnknownParameter(param_id.to_string()))
    }

    fn validate(param: &P, raw: &RawValue) -> Result<Value, BindingError> {
        param
            .validate(raw)
            .map_err(|source| BindingError::InvalidParameterValue {
                param_id: param.identifier().clone(),
                source,
            })
    }

    /// Validates `raw` and binds it as the only value of the parameter, replacing any values bound
    /// before.
    pub fn set(&mut self, param_id: &str, raw: impl Into<RawValue>) -> Result<(), BindingError> {
        let param = self.param(param_id)?;
        let value = Self::validate(param, &raw.into())?;
        log::debug!("Set {} = {value:?}.", param.identifier());
        self.values.insert(param.identifier().clone(), vec![value]);
        Ok(())
    }

    /// Validates `raw` and binds it as a further value of the parameter.
    pub fn push(&mut self, param_id: &str, raw: impl Into<RawValue>) -> Result<(), BindingError> {
        let param = self.param(param_id)?;
        let max_occurs = param.occurs().max();
        let bound = self.values.get(param_id).map_or(0, Vec::len);
        if bound >= max_occurs as usize {
            return Err(BindingError::TooManyValues {
                param_id: param.identifier().clone(),
                max_occurs,
            });
        }

        let value = Self::validate(param, &raw.into())?;
        log::debug!("Pushed {} += {value:?}.", param.identifier());
        self.values
            .entry(param.identifier().clone())
            .or_default()
            .push(value);
        Ok(())
    }

    /// Removes any values bound to the parameter.
    pub fn unset(&mut self, param_id: &str) -> Result<(), BindingError> {
        self.param(param_id)?;
        self.values.remove(param_id);
        Ok(())
    }

    /// Returns whether a value was explicitly bound to the parameter.
    pub fn is_set(&self, param_id: &str) -> bool {
        self.values
            .get(param_id)
            .is_some_and(|values| !values.is_empty())
    }

    /// Returns the first value bound to the parameter. If none was bound, returns the parameter's
    /// default, if it has one.
    ///
    /// A bound value always wins over the default, including values such as `0`, `false` or the
    /// empty string.
    pub fn get(&self, param_id: &str) -> Result<Option<Value>, BindingError> {
        let param = self.param(param_id)?;
        match self.values.get(param_id).and_then(|values| values.first()) {
            Some(value) => Ok(Some(value.clone())),
            None => Ok(param.default_value()),
        }
    }

    /// Returns all values bound to the parameter, or its default as a single value if none were
    /// bound.
    pub fn get_all(&self, param_id: &str) -> Result<Vec<Value>, BindingError> {
        let param = self.param(param_id)?;
        match self.values.get(param_id) {
            Some(values) if !values.is_empty() => Ok(values.clone()),
            _ => Ok(param.default_value().into_iter().collect()),
        }
    }

    /// Returns the literal value of the parameter, as resolved by [Bindings::get]. Parameters that
    /// are not literals resolve to `None`.
    pub fn literal(&self, param_id: &str) -> Result<Option<LiteralValue>, BindingError> {
        Ok(match self.get(param_id)? {
            Some(Value::Literal(value)) => Some(value),
            _ => None,
        })
    }

    /// Checks that every parameter has at least its minimum number of values, counting a default
    /// as one value.
    pub fn check_occurs(&self) -> Result<(), BindingError> {
        for param in self.params {
            let min_occurs = param.occurs().min();
            let got = self.get_all(param.identifier().as_ref())?.len();
            if got < min_occurs as usize {
                return Err(BindingError::MissingParameterValue {
                    param_id: param.identifier().clone(),
                    min_occurs,
                    got,
                });
            }
        }
        Ok(())
    }
}

/// Serialises as a mapping from identifier to value, or to a list of values for parameters that
/// accept more than one.
impl<P: Parameter> serde::Serialize for Bindings<'_, P> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        for param in self.params {
            let values = self
                .get_all(param.identifier().as_ref())
                .map_err(serde::ser::Error::custom)?;
            match values.as_slice() {
                [] => {}
                [value] if param.occurs().max() == 1 => {
                    map.serialize_entry(param.identifier(), value)?
                }
                values => map.serialize_entry(param.identifier(), values)?,
            }
        }
        map.end()
    }
}
