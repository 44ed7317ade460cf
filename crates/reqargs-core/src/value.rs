//! # Coerced Values
//!
//! [`Value`] is what a field adapter produces; [`Args`] is the ordered
//! mapping of field name to value handed to a wrapped handler.

use indexmap::IndexMap;
use serde::Serialize;

use crate::range::RangeInfo;

/// Validated arguments, in schema declaration order followed by any
/// call-time keyword arguments merged in by the [`Validator`](crate::Validator).
pub type Args = IndexMap<String, Value>;

/// A coerced argument value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent optional argument.
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<Value>),
    /// Decoded JSON list elements are kept as raw JSON.
    Json(serde_json::Value),
    Range(RangeInfo),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_range(&self) -> Option<RangeInfo> {
        match self {
            Self::Range(r) => Some(*r),
            _ => None,
        }
    }

    /// Render as plain JSON. Used when keyword arguments are fed back into
    /// a validation pass as raw input.
    pub fn to_json(&self) -> serde_json::Value {
        // Values hold no non-string map keys, so serialization cannot fail.
        serde_json::to_value(self).unwrap_or_default()
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<RangeInfo> for Value {
    fn from(r: RangeInfo) -> Self {
        Self::Range(r)
    }
}
