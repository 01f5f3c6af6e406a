use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The possible types of a field in a JSON payload.
///
/// Displayed capitalised (`Array`, `Varies`, ...), the way it appears in a
/// documentation table.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JsonFieldType {
    /// An array.
    Array,
    /// A boolean value.
    Boolean,
    /// An object.
    Object,
    /// A number.
    Number,
    /// `null`.
    Null,
    /// A string.
    String,
    /// The field holds different types at different locations.
    ///
    /// Only ever reported for a path, never the type of a single value.
    Varies,
}

impl JsonFieldType {
    /// The type of a single JSON value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }
}
