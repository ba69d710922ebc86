//! Face attribute system for game-specific card fields.
//!
//! A face carries attributes like "type_code", "cost", "traits" or
//! "skill_willpower". The merge engine never interprets them; they only
//! take part in taboo-equality checks and are passed through to exports.
//!
//! ## AttributeValue Types
//!
//! - `Int`: Numbers (cost, xp, health)
//! - `Bool`: Flags (is_unique, permanent)
//! - `Text`: Strings (type code, traits line)
//! - `IntList`: Number lists
//! - `TextList`: String lists (tags, restrictions)

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key for accessing face attributes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeKey(pub String);

impl AttributeKey {
    /// Create a new attribute key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Borrow the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AttributeKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AttributeKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Value for a face attribute.
///
/// Serialized untagged so feed documents and override patches can use
/// plain JSON scalars and arrays.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Integer value (cost, xp, health).
    Int(i64),
    /// Boolean flag (is_unique, exceptional).
    Bool(bool),
    /// Text value (type code, traits).
    Text(String),
    /// List of integers.
    IntList(Vec<i64>),
    /// List of strings (tags, restrictions).
    TextList(Vec<String>),
}

impl AttributeValue {
    /// Get as integer if this is an Int value.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttributeValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as bool if this is a Bool value.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as string reference if this is a Text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get as text list reference if this is a TextList value.
    #[must_use]
    pub fn as_text_list(&self) -> Option<&[String]> {
        match self {
            AttributeValue::TextList(v) => Some(v),
            _ => None,
        }
    }

    /// Convert a raw feed value.
    ///
    /// Returns `None` for `null`. Arrays that are neither all-integer nor
    /// all-string, and nested objects, are kept as their JSON text.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(AttributeValue::Bool(*b)),
            Value::Number(n) => Some(match n.as_i64() {
                Some(i) => AttributeValue::Int(i),
                None => AttributeValue::Text(n.to_string()),
            }),
            Value::String(s) => Some(AttributeValue::Text(s.clone())),
            Value::Array(items) => {
                if let Some(ints) = items.iter().map(Value::as_i64).collect::<Option<Vec<_>>>() {
                    Some(AttributeValue::IntList(ints))
                } else if let Some(texts) = items
                    .iter()
                    .map(|v| v.as_str().map(str::to_string))
                    .collect::<Option<Vec<_>>>()
                {
                    Some(AttributeValue::TextList(texts))
                } else {
                    Some(AttributeValue::Text(value.to_string()))
                }
            }
            Value::Object(_) => Some(AttributeValue::Text(value.to_string())),
        }
    }
}

impl std::fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeValue::Int(v) => write!(f, "{v}"),
            AttributeValue::Bool(v) => write!(f, "{v}"),
            AttributeValue::Text(v) => f.write_str(v),
            AttributeValue::IntList(v) => {
                let parts: Vec<String> = v.iter().map(i64::to_string).collect();
                f.write_str(&parts.join(","))
            }
            AttributeValue::TextList(v) => f.write_str(&v.join(",")),
        }
    }
}

// Convenient From implementations
impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        AttributeValue::Int(v)
    }
}

impl From<i32> for AttributeValue {
    fn from(v: i32) -> Self {
        AttributeValue::Int(i64::from(v))
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        AttributeValue::Bool(v)
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        AttributeValue::Text(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::Text(v.to_string())
    }
}

impl From<Vec<String>> for AttributeValue {
    fn from(v: Vec<String>) -> Self {
        AttributeValue::TextList(v)
    }
}

/// Collection of attributes.
pub type Attributes = FxHashMap<AttributeKey, AttributeValue>;
