//! Payload formats of complex values, and negotiation of a requested format against the formats a
//! descriptor supports.


use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// A supported (mimetype, encoding, schema) combination for a complex value.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(from = "FormatShape")]
pub struct Format {
    pub mimetype: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
}

impl Format {
    /// Creates a [Format] with only a mimetype.
    pub fn new(mimetype: impl Into<String>) -> Self {
        Self {
            mimetype: mimetype.into(),
            encoding: None,
            schema: None,
        }
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }
}

/// Accepted serialised shapes of a single [Format]: a bare mimetype, or a mapping where
/// `encoding` and `schema` may be omitted.
#[derive(Deserialize)]
#[serde(untagged)]
enum FormatShape {
    Mimetype(String),
    Record {
        #[serde(alias = "mimeType")]
        mimetype: String,
        #[serde(default)]
        encoding: Option<String>,
        #[serde(default)]
        schema: Option<String>,
    },
}

impl From<FormatShape> for Format {
    fn from(value: FormatShape) -> Self {
        match value {
            FormatShape::Mimetype(mimetype) => Self::new(mimetype),
            FormatShape::Record {
                mimetype,
                encoding,
                schema,
            } => Self {
                mimetype,
                encoding,
                schema,
            },
        }
    }
}

/// Heterogeneous specification of the formats of a complex value, as supplied by a process
/// definition.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FormatSpec {
    Mimetype(String),
    Single(Format),
    List(Vec<Format>),
}

impl From<&str> for FormatSpec {
    fn from(value: &str) -> Self {
        Self::Mimetype(value.to_string())
    }
}

impl From<Format> for FormatSpec {
    fn from(value: Format) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<Format>> for FormatSpec {
    fn from(value: Vec<Format>) -> Self {
        Self::List(value)
    }
}

impl From<&[&str]> for FormatSpec {
    fn from(value: &[&str]) -> Self {
        Self::List(value.iter().map(|&mimetype| Format::new(mimetype)).collect())
    }
}

/// Canonical, non-empty, ordered list of [Format]s. The first is the default format.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(try_from = "FormatSpec", into = "Vec<Format>")]
pub struct Formats(Vec<Format>);

impl Formats {
    /// Normalises any [FormatSpec] into an owned canonical list.
    pub fn normalize(spec: impl Into<FormatSpec>) -> Result<Self, ConfigurationError> {
        let formats = match spec.into() {
            FormatSpec::Mimetype(mimetype) => vec![Format::new(mimetype)],
            FormatSpec::Single(format) => vec![format],
            FormatSpec::List(formats) => formats,
        };

        if formats.is_empty() {
            return Err(ConfigurationError::EmptyFormats);
        }
        if formats.iter().any(|format| format.mimetype.is_empty()) {
            return Err(ConfigurationError::EmptyMimetype);
        }

        Ok(Self(formats))
    }

    /// Returns the default format.
    pub fn default_format(&self) -> &Format {
        // Non-empty by construction.
        &self.0[0]
    }

    pub fn as_slice(&self) -> &[Format] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Format> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the first supported [Format] that satisfies the request, or `None` if no supported
    /// format does.
    pub fn negotiate(&self, request: &FormatRequest) -> Option<&Format> {
        if request.is_unspecified() {
            return Some(self.default_format());
        }
        self.0.iter().find(|format| request.accepts(format))
    }
}

impl TryFrom<FormatSpec> for Formats {
    type Error = ConfigurationError;

    fn try_from(value: FormatSpec) -> Result<Self, Self::Error> {
        Self::normalize(value)
    }
}

impl From<Formats> for Vec<Format> {
    fn from(value: Formats) -> Self {
        value.0
    }
}

/// Format requested by the supplier of a complex value. Absent fields match anything.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct FormatRequest {
    #[serde(default, alias = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
}

impl FormatRequest {
    pub fn mimetype(mimetype: impl Into<String>) -> Self {
        Self {
            mimetype: Some(mimetype.into()),
            ..Default::default()
        }
    }

    pub fn is_unspecified(&self) -> bool {
        self.mimetype.is_none() && self.encoding.is_none() && self.schema.is_none()
    }

    fn accepts(&self, format: &Format) -> bool {
        let mimetype_matches = self
            .mimetype
            .as_ref()
            .is_none_or(|mimetype| mimetype.eq_ignore_ascii_case(&format.mimetype));
        let encoding_matches = match (&self.encoding, &format.encoding) {
            (None, _) => true,
            (Some(requested), Some(supported)) => requested.eq_ignore_ascii_case(supported),
            (Some(_), None) => false,
        };
        let schema_matches = match &self.schema {
            None => true,
            Some(requested) => format.schema.as_deref() == Some(requested.as_str()),
        };
        mimetype_matches && encoding_matches && schema_matches
    }
}

impl std::fmt::Display for FormatRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(mimetype={}, encoding={}, schema={})",
            self.mimetype.as_deref().unwrap_or("*"),
            self.encoding.as_deref().unwrap_or("*"),
            self.schema.as_deref().unwrap_or("*"),
        )
    }
}
