//! # Bounded, display-ready values.
//!
//! [`SafeValue`] is the output of the serializer: a plain tree with no shared
//! references, no cycles and bounded size. Values that could not or should
//! not be cloned are replaced by sentinel strings:
//!
//! | Sentinel                        | Meaning                                   |
//! |---------------------------------|-------------------------------------------|
//! | [`CIRCULAR_REFERENCE`]          | reference already visited in this argument|
//! | [`MAX_DEPTH_REACHED`]           | nesting deeper than the configured limit  |
//! | [`ERROR_ACCESSING_PROPERTY`]    | reading one property failed               |
//! | [`OMITTED_KEY`] → `[N more properties]` | mapping keys beyond the limit     |

use std::fmt;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use super::inspect::format_number;

/// Substituted for a reference that was already visited.
pub const CIRCULAR_REFERENCE: &str = "[Circular Reference]";
/// Substituted for a value nested beyond the depth limit.
pub const MAX_DEPTH_REACHED: &str = "[Max Depth Reached]";
/// Substituted for a property whose read or serialization failed.
pub const ERROR_ACCESSING_PROPERTY: &str = "[Error accessing property]";
/// Key of the synthetic entry that summarizes omitted mapping keys.
pub const OMITTED_KEY: &str = "...";

/// Value of the synthetic summary entry.
pub fn omitted_summary(count: usize) -> String {
    format!("[{count} more properties]")
}

/// Plain, bounded clone of one logging argument.
#[derive(Clone, Debug, PartialEq)]
pub enum SafeValue {
    /// Absent value.
    Undefined,
    /// Explicit null.
    Null,
    /// Boolean.
    Bool(bool),
    /// Number.
    Number(f64),
    /// Text (sanitized, or a sentinel).
    String(String),
    /// Truncated sequence.
    List(Vec<SafeValue>),
    /// Truncated mapping in source key order.
    Map(Vec<(String, SafeValue)>),
}

impl SafeValue {
    /// Shorthand for a string value.
    pub fn string(s: impl Into<String>) -> Self {
        SafeValue::String(s.into())
    }

    /// Returns the text of a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SafeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number of a numeric value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SafeValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the items of a list value.
    pub fn as_list(&self) -> Option<&[SafeValue]> {
        match self {
            SafeValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entries of a map value.
    pub fn as_map(&self) -> Option<&[(String, SafeValue)]> {
        match self {
            SafeValue::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Looks up `key` in a map value.
    pub fn get(&self, key: &str) -> Option<&SafeValue> {
        self.as_map()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// True if this is one of the fixed sentinel strings.
    pub fn is_sentinel(&self) -> bool {
        matches!(
            self.as_str(),
            Some(CIRCULAR_REFERENCE | MAX_DEPTH_REACHED | ERROR_ACCESSING_PROPERTY)
        )
    }

    /// Converts into a JSON value; undefined and non-finite numbers become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;
        match self {
            SafeValue::Undefined | SafeValue::Null => Json::Null,
            SafeValue::Bool(b) => Json::Bool(*b),
            SafeValue::Number(n) => serde_json::Number::from_f64(*n).map_or(Json::Null, Json::Number),
            SafeValue::String(s) => Json::String(s.clone()),
            SafeValue::List(items) => Json::Array(items.iter().map(Self::to_json).collect()),
            SafeValue::Map(entries) => Json::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl Serialize for SafeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SafeValue::Undefined | SafeValue::Null => serializer.serialize_unit(),
            SafeValue::Bool(b) => serializer.serialize_bool(*b),
            SafeValue::Number(n) if n.is_finite() => serializer.serialize_f64(*n),
            SafeValue::Number(_) => serializer.serialize_unit(),
            SafeValue::String(s) => serializer.serialize_str(s),
            SafeValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            SafeValue::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

/// Compact JSON-like rendering (`undefined` and numbers print as a host would).
impl fmt::Display for SafeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SafeValue::Undefined => f.write_str("undefined"),
            SafeValue::Null => f.write_str("null"),
            SafeValue::Bool(b) => write!(f, "{b}"),
            SafeValue::Number(n) => f.write_str(&format_number(*n)),
            SafeValue::String(s) => write!(f, "{}", serde_json::Value::String(s.clone())),
            SafeValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            SafeValue::Map(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}:{v}", serde_json::Value::String(k.clone()))?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<&str> for SafeValue {
    fn from(v: &str) -> Self {
        SafeValue::String(v.to_string())
    }
}

impl From<f64> for SafeValue {
    fn from(v: f64) -> Self {
        SafeValue::Number(v)
    }
}
