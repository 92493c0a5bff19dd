//! Bounding box values and the coordinate reference systems a bounding box parameter supports.

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Number of dimensions of a bounding box.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Dimensions {
    #[default]
    Two,
    Three,
}

impl Dimensions {
    pub fn count(self) -> u8 {
        match self {
            Dimensions::Two => 2,
            Dimensions::Three => 3,
        }
    }
}

impl TryFrom<u8> for Dimensions {
    type Error = ConfigurationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            other => Err(ConfigurationError::InvalidDimensions(other)),
        }
    }
}

impl From<Dimensions> for u8 {
    fn from(value: Dimensions) -> Self {
        value.count()
    }
}

impl Serialize for Dimensions {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.count())
    }
}

impl<'de> Deserialize<'de> for Dimensions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let count = u8::deserialize(deserializer)?;
        Self::try_from(count).map_err(|_| {
            serde::de::Error::invalid_value(
                serde::de::Unexpected::Unsigned(count.into()),
                &"2 or 3 dimensions",
            )
        })
    }
}

/// A coordinate-reference-qualified spatial extent. Coordinates are carried as supplied, without
/// geometric validation.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct BoundingBox {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crs: Option<String>,
    pub lower_corner: Vec<f64>,
    pub upper_corner: Vec<f64>,
}

/// Supported coordinate reference systems and dimensionality of a bounding box parameter.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(try_from = "BoundingBoxSpecConfig")]
pub struct BoundingBoxSpec {
    supported_crs: Vec<String>,
    dimensions: Dimensions,
}

impl BoundingBoxSpec {
    pub fn new<I, S>(supported_crs: I, dimensions: Dimensions) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let supported_crs: Vec<String> = supported_crs.into_iter().map(Into::into).collect();
        if supported_crs.is_empty() {
            return Err(ConfigurationError::EmptySupportedCrs);
        }
        Ok(Self {
            supported_crs,
            dimensions,
        })
    }

    pub fn supported_crs(&self) -> &[String] {
        &self.supported_crs
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Returns the selected CRS, which is the first supported.
    pub fn selected_crs(&self) -> &str {
        // Non-empty by construction.
        &self.supported_crs[0]
    }
}

/// Unvalidated fields of a [BoundingBoxSpec], as written in a process definition.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct BoundingBoxSpecConfig {
    #[serde(default)]
    pub supported_crs: Vec<String>,
    #[serde(default)]
    pub dimensions: Dimensions,
}

impl TryFrom<BoundingBoxSpecConfig> for BoundingBoxSpec {
    type Error = ConfigurationError;

    fn try_from(value: BoundingBoxSpecConfig) -> Result<Self, Self::Error> {
        Self::new(value.supported_crs, value.dimensions)
    }
}
