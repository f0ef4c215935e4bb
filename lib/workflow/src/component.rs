//! Component types and settings values.
//!
//! A component is one stage of a processing workflow. Its type comes from a
//! closed set, and its settings (when present) map string keys to scalar
//! values. An absent settings mapping is distinct from a present-but-empty
//! one; the validator relies on that distinction.

use crate::error::ParseComponentTypeError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The closed set of component types a workflow may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    /// Brings source material into the workflow. Must be first when present.
    Import,
    /// Applies a shadow effect.
    Shadow,
    /// Crops to a region.
    Crop,
    /// Writes the result out of the workflow. Must be last when present.
    Export,
}

impl ComponentType {
    /// All component types, in canonical order.
    pub const ALL: [Self; 4] = [Self::Import, Self::Shadow, Self::Crop, Self::Export];

    /// Returns the lowercase wire name of this type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Import => "import",
            Self::Shadow => "shadow",
            Self::Crop => "crop",
            Self::Export => "export",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentType {
    type Err = ParseComponentTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "import" => Ok(Self::Import),
            "shadow" => Ok(Self::Shadow),
            "crop" => Ok(Self::Crop),
            "export" => Ok(Self::Export),
            _ => Err(ParseComponentTypeError {
                value: s.to_string(),
            }),
        }
    }
}

/// A scalar settings value.
///
/// Settings values are restricted to the four scalar kinds; nested arrays
/// and objects are rejected by the validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    /// A whole number.
    Integer(i64),
    /// A floating point number.
    Float(f64),
    /// A boolean flag.
    Bool(bool),
    /// A string.
    String(String),
}

impl SettingValue {
    /// Converts a raw JSON value into a settings scalar.
    ///
    /// Returns `None` for nulls, arrays, objects, and numbers that fit
    /// neither `i64` nor `f64`.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Bool(b) => Some(Self::Bool(*b)),
            serde_json::Value::String(s) => Some(Self::String(s.clone())),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Self::Integer(i))
                } else {
                    n.as_f64().map(Self::Float)
                }
            }
            _ => None,
        }
    }
}

/// Per-component settings: string keys mapped to scalar values.
pub type Settings = BTreeMap<String, SettingValue>;

/// One stage of a workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// The component's type.
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    /// Settings for this component. `None` means the mapping was omitted,
    /// which is not the same as an empty mapping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
}

impl Component {
    /// Creates a component without settings.
    #[must_use]
    pub fn new(component_type: ComponentType) -> Self {
        Self {
            component_type,
            settings: None,
        }
    }

    /// Creates a component with settings.
    #[must_use]
    pub fn with_settings(component_type: ComponentType, settings: Settings) -> Self {
        Self {
            component_type,
            settings: Some(settings),
        }
    }

    /// Returns whether this component carries a settings mapping, empty or not.
    #[must_use]
    pub fn has_settings(&self) -> bool {
        self.settings.is_some()
    }
}
