//! Identifiers of processes and of their input and output parameters.
//!
//! These have value validation, so their inner value is private.


use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("got {value:?} which is not {expected}")]
pub struct ValueError<V> {
    pub value: V,
    pub expected: &'static str,
}

fn valid_regex() -> &'static lazy_regex::Regex {
    lazy_regex::regex!(r#"^[^\s\p{Cc}]+$"#)
}

macro_rules! identifier_type {
    ($(#[$meta:meta])* $name:ident, $expected:literal) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
        pub struct $name(String);

        impl $name {
            const EXPECTED: &str = $expected;

            #[cfg(test)]
            pub fn new_unchecked(value: String) -> Self {
                Self(value)
            }

            fn try_from_string<S>(value: S) -> std::result::Result<Self, S>
            where
                S: Into<String> + AsRef<str>,
            {
                if valid_regex().is_match(value.as_ref()) {
                    std::result::Result::Ok(Self(value.into()))
                } else {
                    std::result::Result::Err(value)
                }
            }
        }

        impl TryFrom<&str> for $name {
            type Error = ValueError<String>;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::try_from_string(value).map_err(|value| ValueError {
                    value: value.to_string(),
                    expected: Self::EXPECTED,
                })
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValueError<String>;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::try_from_string(value).map_err(|value| ValueError {
                    value,
                    expected: Self::EXPECTED,
                })
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;

                Self::try_from_string(s).map_err(|s| {
                    serde::de::Error::invalid_value(
                        serde::de::Unexpected::Str(&s),
                        &Self::EXPECTED,
                    )
                })
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

identifier_type!(
    /// Identifier of an input or output parameter. Unique among the inputs of a
    /// [crate::process::ProcessDescription], and separately unique among its outputs.
    ParamId,
    "a non-empty parameter identifier without whitespace or control characters"
);

identifier_type!(
    /// Identifier of a [crate::process::ProcessDescription].
    ProcessId,
    "a non-empty process identifier without whitespace or control characters"
);
