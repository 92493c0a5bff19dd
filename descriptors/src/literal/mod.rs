//! Literal (scalar) values: type coercion and allowed-value domain checks.

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

use crate::error::{CoercionError, ConfigurationError, InvalidParameterValue, InvalidValueCause};

/// Relative tolerance used when checking that a value falls on a range's spacing.
const SPACING_TOLERANCE: f64 = 1e-9;

/// Token that accepts any value when used as the allowed values of a literal.
pub const WILDCARD: &str = "*";

/// 2^63, the exclusive upper bound of i64 as an f64 (i64::MAX itself is not representable).
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Declared data type of a literal parameter.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Eq,
    Hash,
    PartialEq,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DataType {
    #[serde(alias = "int")]
    Integer,
    #[serde(alias = "double")]
    Float,
    #[default]
    String,
    #[serde(alias = "bool")]
    Boolean,
}

/// Converts a raw literal into a value of a specific [DataType].
pub type Coercer = fn(&LiteralValue) -> Result<LiteralValue, CoercionError>;

impl DataType {
    /// Returns the coercion function for this data type.
    pub fn coercer(self) -> Coercer {
        match self {
            DataType::Integer => coerce_integer,
            DataType::Float => coerce_float,
            DataType::String => coerce_string,
            DataType::Boolean => coerce_boolean,
        }
    }

    pub fn coerce(self, raw: &LiteralValue) -> Result<LiteralValue, CoercionError> {
        (self.coercer())(raw)
    }

    fn error(self, reason: String) -> CoercionError {
        CoercionError {
            data_type: self,
            reason,
        }
    }
}

fn coerce_integer(raw: &LiteralValue) -> Result<LiteralValue, CoercionError> {
    match raw {
        LiteralValue::Integer(v) => Ok(LiteralValue::Integer(*v)),
        LiteralValue::Boolean(v) => Ok(LiteralValue::Integer(i64::from(*v))),
        LiteralValue::Float(v) => {
            let truncated = v.trunc();
            if !truncated.is_finite() || truncated < i64::MIN as f64 || truncated >= I64_BOUND {
                return Err(DataType::Integer.error(format!("{v} is out of integer range")));
            }
            Ok(LiteralValue::Integer(truncated as i64))
        }
        LiteralValue::String(s) => s
            .trim()
            .parse::<i64>()
            .map(LiteralValue::Integer)
            .map_err(|err| DataType::Integer.error(format!("{s:?}: {err}"))),
    }
}

fn coerce_float(raw: &LiteralValue) -> Result<LiteralValue, CoercionError> {
    match raw {
        LiteralValue::Float(v) => Ok(LiteralValue::Float(*v)),
        LiteralValue::Integer(v) => Ok(LiteralValue::Float(*v as f64)),
        LiteralValue::Boolean(v) => Ok(LiteralValue::Float(if *v { 1.0 } else { 0.0 })),
        LiteralValue::String(s) => s
            .trim()
            .parse::<f64>()
            .map(LiteralValue::Float)
            .map_err(|err| DataType::Float.error(format!("{s:?}: {err}"))),
    }
}

fn coerce_string(raw: &LiteralValue) -> Result<LiteralValue, CoercionError> {
    match raw {
        LiteralValue::String(s) => Ok(LiteralValue::String(s.clone())),
        other => Ok(LiteralValue::String(other.to_string())),
    }
}

fn coerce_boolean(raw: &LiteralValue) -> Result<LiteralValue, CoercionError> {
    match raw {
        LiteralValue::Boolean(v) => Ok(LiteralValue::Boolean(*v)),
        LiteralValue::Integer(0) => Ok(LiteralValue::Boolean(false)),
        LiteralValue::Integer(1) => Ok(LiteralValue::Boolean(true)),
        LiteralValue::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(LiteralValue::Boolean(true)),
            "false" | "0" | "no" => Ok(LiteralValue::Boolean(false)),
            _ => Err(DataType::Boolean.error(format!("{s:?} is not a boolean"))),
        },
        other => Err(DataType::Boolean.error(format!("{other} is not a boolean"))),
    }
}

/// A scalar value, either raw as supplied by a caller or coerced to a [DataType].
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl LiteralValue {
    /// Returns the numeric value, if this is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            LiteralValue::Integer(v) => Some(*v as f64),
            LiteralValue::Float(v) => Some(*v),
            LiteralValue::Boolean(_) | LiteralValue::String(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            LiteralValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            LiteralValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            LiteralValue::String(v) => Some(v),
            _ => None,
        }
    }
}

/// Canonical textual form, used for discrete allowed value comparison. Floats with an integral
/// value keep a trailing `.0`, so that `1.0` and `1` are different tokens.
impl std::fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LiteralValue::Boolean(v) => write!(f, "{v}"),
            LiteralValue::Integer(v) => write!(f, "{v}"),
            LiteralValue::Float(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 => {
                write!(f, "{v:.1}")
            }
            LiteralValue::Float(v) => write!(f, "{v}"),
            LiteralValue::String(v) => f.write_str(v),
        }
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for LiteralValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// A single rule of an allowed-value domain.
#[derive(Clone, Debug, PartialEq)]
pub enum AllowedValue {
    /// Accepts a value whose textual form equals this one's.
    Value(LiteralValue),
    /// Accepts a numeric value within `low..=high`, and on the spacing when one is set.
    Range { low: f64, high: f64 },
}

impl AllowedValue {
    pub fn range(low: f64, high: f64) -> Self {
        Self::Range { low, high }
    }

    fn accepts(&self, value: &LiteralValue, spacing: Option<f64>) -> bool {
        match self {
            AllowedValue::Value(allowed) => allowed.to_string() == value.to_string(),
            AllowedValue::Range { low, high } => match value.as_f64() {
                Some(v) if *low <= v && v <= *high => {
                    spacing.is_none_or(|spacing| on_spacing(v - low, spacing))
                }
                _ => false,
            },
        }
    }
}

/// Tolerance is relative to the larger of the offset and the spacing.
fn on_spacing(offset: f64, spacing: f64) -> bool {
    let nearest = (offset / spacing).round() * spacing;
    let tolerance = offset.abs().max(spacing) * SPACING_TOLERANCE;
    (offset - nearest).abs() <= tolerance
}

macro_rules! allowed_value_from {
    ($($value_type:ty),*) => {
        $(
            impl From<$value_type> for AllowedValue {
                fn from(value: $value_type) -> Self {
                    Self::Value(value.into())
                }
            }
        )*
    };
}

allowed_value_from!(LiteralValue, &str, String, i64, f64, bool);

/// Allowed-value domain of a literal parameter.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(try_from = "AllowedValuesShape", into = "AllowedValuesShape")]
pub enum AllowedValues {
    /// Any value that coerces to the data type is accepted.
    #[default]
    Any,
    /// Accepted when any entry accepts, checked in order.
    Entries(Vec<AllowedValue>),
}

impl AllowedValues {
    pub fn entries(entries: impl IntoIterator<Item = impl Into<AllowedValue>>) -> Self {
        Self::Entries(entries.into_iter().map(Into::into).collect())
    }

    pub fn accepts(&self, value: &LiteralValue, spacing: Option<f64>) -> bool {
        match self {
            AllowedValues::Any => true,
            AllowedValues::Entries(entries) => {
                entries.iter().any(|entry| entry.accepts(value, spacing))
            }
        }
    }

    fn ranges(&self) -> impl Iterator<Item = (f64, f64)> {
        let entries = match self {
            AllowedValues::Any => &[][..],
            AllowedValues::Entries(entries) => entries.as_slice(),
        };
        entries.iter().filter_map(|entry| match entry {
            AllowedValue::Range { low, high } => Some((*low, *high)),
            AllowedValue::Value(_) => None,
        })
    }
}

#[derive(Deserialize, Serialize)]
#[serde(untagged)]
enum AllowedValueShape {
    Range([LiteralValue; 2]),
    Value(LiteralValue),
}

#[derive(Deserialize, Serialize)]
#[serde(untagged)]
enum AllowedValuesShape {
    Entries(Vec<AllowedValueShape>),
    Single(LiteralValue),
}

impl TryFrom<AllowedValuesShape> for AllowedValues {
    type Error = ConfigurationError;

    fn try_from(value: AllowedValuesShape) -> Result<Self, Self::Error> {
        let shapes = match value {
            AllowedValuesShape::Single(LiteralValue::String(s)) if s == WILDCARD => {
                return Ok(Self::Any);
            }
            AllowedValuesShape::Single(value) => vec![AllowedValueShape::Value(value)],
            AllowedValuesShape::Entries(shapes) => shapes,
        };

        let mut entries = Vec::with_capacity(shapes.len());
        for shape in shapes {
            match shape {
                AllowedValueShape::Value(LiteralValue::String(s)) if s == WILDCARD => {
                    return Ok(Self::Any);
                }
                AllowedValueShape::Value(value) => entries.push(AllowedValue::Value(value)),
                AllowedValueShape::Range([low, high]) => match (low.as_f64(), high.as_f64()) {
                    (Some(low), Some(high)) => entries.push(AllowedValue::Range { low, high }),
                    _ => return Err(ConfigurationError::NonNumericRange { low, high }),
                },
            }
        }
        Ok(Self::Entries(entries))
    }
}

impl From<AllowedValues> for AllowedValuesShape {
    fn from(value: AllowedValues) -> Self {
        match value {
            AllowedValues::Any => AllowedValuesShape::Single(WILDCARD.into()),
            AllowedValues::Entries(entries) => AllowedValuesShape::Entries(
                entries
                    .into_iter()
                    .map(|entry| match entry {
                        AllowedValue::Value(value) => AllowedValueShape::Value(value),
                        AllowedValue::Range { low, high } => {
                            AllowedValueShape::Range([low.into(), high.into()])
                        }
                    })
                    .collect(),
            ),
        }
    }
}

/// Coerces `raw` to `data_type` and checks it against the allowed values.
///
/// Ranges are assumed to be given low-to-high; a reversed range accepts nothing. `spacing` only
/// applies to values that fall within a range's bounds.
pub fn validate(
    raw: &LiteralValue,
    data_type: DataType,
    allowed_values: &AllowedValues,
    spacing: Option<f64>,
) -> Result<LiteralValue, InvalidParameterValue> {
    let value = data_type
        .coerce(raw)
        .map_err(|err| InvalidParameterValue::new(raw, err))?;

    if allowed_values.accepts(&value, spacing) {
        Ok(value)
    } else {
        Err(InvalidParameterValue::new(
            &value,
            InvalidValueCause::NoMatchingDomainEntry,
        ))
    }
}

/// Type and domain rules of a literal parameter.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(try_from = "LiteralSpecConfig")]
pub struct LiteralSpec {
    data_type: DataType,
    allowed_values: AllowedValues,
    #[serde(skip_serializing_if = "Option::is_none")]
    spacing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    default: Option<LiteralValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    uoms: Vec<String>,
}

impl LiteralSpec {
    /// Creates a [LiteralSpec] that accepts any value of the data type, with no default.
    pub fn new(data_type: DataType) -> Self {
        Self {
            data_type,
            allowed_values: AllowedValues::Any,
            spacing: None,
            default: None,
            uoms: Vec::new(),
        }
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn allowed_values(&self) -> &AllowedValues {
        &self.allowed_values
    }

    pub fn spacing(&self) -> Option<f64> {
        self.spacing
    }

    /// Returns the default value, already coerced to the data type.
    pub fn default_value(&self) -> Option<&LiteralValue> {
        self.default.as_ref()
    }

    pub fn uoms(&self) -> &[String] {
        &self.uoms
    }

    /// Returns the selected unit of measure, which is the first declared.
    pub fn selected_uom(&self) -> Option<&str> {
        self.uoms.first().map(String::as_str)
    }

    /// Validates a raw value against this spec.
    pub fn validate(&self, raw: &LiteralValue) -> Result<LiteralValue, InvalidParameterValue> {
        validate(raw, self.data_type, &self.allowed_values, self.spacing)
    }
}

/// Unvalidated fields of a [LiteralSpec], as written in a process definition.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct LiteralSpecConfig {
    pub data_type: DataType,
    pub allowed_values: AllowedValues,
    pub spacing: Option<f64>,
    pub default: Option<LiteralValue>,
    pub uoms: Vec<String>,
}

impl TryFrom<LiteralSpecConfig> for LiteralSpec {
    type Error = ConfigurationError;

    fn try_from(value: LiteralSpecConfig) -> Result<Self, Self::Error> {
        if let Some(spacing) = value.spacing {
            if !spacing.is_finite() || spacing <= 0.0 {
                return Err(ConfigurationError::InvalidSpacing(spacing));
            }
        }

        for (low, high) in value.allowed_values.ranges() {
            if low > high {
                log::warn!("Allowed range [{low}, {high}] is reversed and will never match.");
            }
        }

        let mut spec = Self {
            data_type: value.data_type,
            allowed_values: value.allowed_values,
            spacing: value.spacing,
            default: None,
            uoms: value.uoms,
        };

        spec.default = value
            .default
            .map(|default| spec.validate(&default))
            .transpose()
            .map_err(ConfigurationError::InvalidDefault)?;

        Ok(spec)
    }
}
