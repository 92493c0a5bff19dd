use serde::{Deserialize, Serialize};

/// Auxiliary metadata record attached to a process or parameter. Either field may be absent.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl Metadata {
    pub fn new(title: Option<&str>, href: Option<&str>) -> Self {
        Self {
            title: title.map(str::to_string),
            href: href.map(str::to_string),
        }
    }
}
