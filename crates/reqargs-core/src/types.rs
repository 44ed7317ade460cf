//! # Field Type Adapters
//!
//! [`FieldType`] is the closed set of coercions a field can apply to its
//! raw value. Every variant honours the same contract: turn one raw JSON
//! value into a [`Value`], or fail with an [`Invalid`] naming the node.
//!
//! Raw values from query strings, forms and route parameters are JSON
//! strings; JSON bodies supply arbitrary JSON.

use serde_json::Value as JsonValue;

use crate::error::Invalid;
use crate::range::{RangeInfo, RangeKeys};
use crate::value::Value;

/// Raw strings that coerce to `false`; everything else is `true`.
const FALSE_CHOICES: [&str; 2] = ["false", "0"];

/// Coercion adapter for one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    /// Text. Non-string raw values are rendered to their textual form.
    Str,
    /// Signed integer.
    Int,
    /// Boolean: `false`/`0` (any case) are false, anything else true.
    Bool,
    /// Comma-separated list; each non-empty trimmed segment is coerced with
    /// the inner adapter.
    CsvList(Box<FieldType>),
    /// JSON-encoded list.
    JsonList,
    /// One of a fixed set of strings.
    ///
    /// Only string input matches: a JSON body sending `1` against the
    /// choices `["1", "2"]` is rejected. Use `Str` plus a check in the
    /// handler, or `IntRange`, for numeric codes.
    Enum(Vec<String>),
    /// Integer within inclusive bounds.
    IntRange { min: Option<i64>, max: Option<i64> },
    /// Pagination range read from several raw keys; see [`crate::range`].
    Range(RangeKeys),
}

impl FieldType {
    pub fn csv(inner: FieldType) -> Self {
        Self::CsvList(Box::new(inner))
    }

    pub fn one_of<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum(choices.into_iter().map(Into::into).collect())
    }

    pub fn int_range(min: Option<i64>, max: Option<i64>) -> Self {
        Self::IntRange { min, max }
    }

    pub fn range() -> Self {
        Self::Range(RangeKeys::default())
    }

    /// Whether fields of this type consume the whole input mapping by default.
    pub fn is_top_level(&self) -> bool {
        matches!(self, Self::Range(_))
    }

    /// Whether `raw` counts as an absent value for this adapter.
    ///
    /// Integer adapters treat the empty string as missing so that a blank
    /// query parameter falls through to the field's missing policy.
    pub fn is_missing(&self, raw: &JsonValue) -> bool {
        match (self, raw) {
            (_, JsonValue::Null) => true,
            (Self::Int | Self::IntRange { .. }, JsonValue::String(s)) => s.is_empty(),
            _ => false,
        }
    }

    /// Coerce a present raw value for the node called `name`.
    pub fn coerce(&self, name: &str, raw: &JsonValue) -> Result<Value, Invalid> {
        match self {
            Self::Str => Ok(Value::Str(coerce_str(raw))),
            Self::Int => coerce_int(name, raw).map(Value::Int),
            Self::Bool => Ok(Value::Bool(coerce_bool(raw))),
            Self::CsvList(inner) => coerce_csv(name, inner, raw),
            Self::JsonList => coerce_json_list(name, raw),
            Self::Enum(choices) => coerce_enum(name, choices, raw),
            Self::IntRange { min, max } => {
                let n = coerce_int(name, raw)?;
                check_bounds(name, n, *min, *max)?;
                Ok(Value::Int(n))
            }
            Self::Range(keys) => match raw {
                JsonValue::Object(map) => Ok(Value::Range(RangeInfo::from_mapping(keys, map))),
                other => Err(Invalid::new(
                    name,
                    format!("{} is not a mapping type", quoted(other)),
                )),
            },
        }
    }

    /// Render a coerced value back to its wire form.
    ///
    /// Lists serialise to the representation their adapter parses
    /// (comma-joined or JSON text); scalars use their textual form.
    pub fn serialize(&self, value: &Value) -> Option<String> {
        match (self, value) {
            (_, Value::Null) => None,
            (Self::CsvList(inner), Value::List(items)) => Some(
                items
                    .iter()
                    .filter_map(|item| inner.serialize(item))
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            (Self::JsonList, list @ (Value::List(_) | Value::Json(_))) => {
                Some(list.to_json().to_string())
            }
            (_, Value::Str(s)) => Some(s.clone()),
            (_, Value::Int(n)) => Some(n.to_string()),
            (_, Value::Bool(b)) => Some(b.to_string()),
            (_, other) => Some(other.to_json().to_string()),
        }
    }
}

/// Raw value as it appears in error messages: strings quoted verbatim,
/// anything else as JSON text.
fn quoted(raw: &JsonValue) -> String {
    match raw {
        JsonValue::String(s) => format!("\"{s}\""),
        other => format!("\"{other}\""),
    }
}

fn coerce_str(raw: &JsonValue) -> String {
    match raw {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Read a raw value as an integer: trimmed decimal strings, JSON integers,
/// JSON floats truncated toward zero, and booleans as 0/1.
pub(crate) fn int_from_json(raw: &JsonValue) -> Option<i64> {
    match raw {
        JsonValue::String(s) => s.trim().parse::<i64>().ok(),
        JsonValue::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        JsonValue::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn coerce_int(name: &str, raw: &JsonValue) -> Result<i64, Invalid> {
    int_from_json(raw)
        .ok_or_else(|| Invalid::new(name, format!("{} is not a number", quoted(raw))))
}

fn coerce_bool(raw: &JsonValue) -> bool {
    match raw {
        JsonValue::Bool(b) => *b,
        JsonValue::String(s) => {
            let lowered = s.to_lowercase();
            !FALSE_CHOICES.contains(&lowered.as_str())
        }
        other => !FALSE_CHOICES.contains(&other.to_string().as_str()),
    }
}

fn coerce_csv(name: &str, inner: &FieldType, raw: &JsonValue) -> Result<Value, Invalid> {
    let JsonValue::String(text) = raw else {
        return Err(Invalid::new(name, format!("{} is not a string", quoted(raw))));
    };

    let mut error: Option<Invalid> = None;
    let mut items = Vec::new();
    let segments = text.split(',').map(str::trim).filter(|s| !s.is_empty());
    for (index, segment) in segments.enumerate() {
        let element = index.to_string();
        match inner.coerce(&element, &JsonValue::String(segment.to_string())) {
            Ok(v) => items.push(v),
            Err(e) => error.get_or_insert_with(|| Invalid::node(name)).add(e, index),
        }
    }

    match error {
        Some(e) => Err(e),
        None => Ok(Value::List(items)),
    }
}

fn coerce_json_list(name: &str, raw: &JsonValue) -> Result<Value, Invalid> {
    let parsed = match raw {
        JsonValue::Array(_) => raw.clone(),
        JsonValue::String(text) => serde_json::from_str::<JsonValue>(text)
            .map_err(|_| Invalid::new(name, format!("{} is not valid JSON", quoted(raw))))?,
        other => {
            return Err(Invalid::new(name, format!("{} is not a string", quoted(other))));
        }
    };

    match parsed {
        JsonValue::Array(items) => Ok(Value::List(items.into_iter().map(Value::Json).collect())),
        _ => Err(Invalid::new(name, format!("{} is not a list", quoted(raw)))),
    }
}

fn coerce_enum(name: &str, choices: &[String], raw: &JsonValue) -> Result<Value, Invalid> {
    if let JsonValue::String(s) = raw {
        if choices.iter().any(|c| c == s) {
            return Ok(Value::Str(s.clone()));
        }
    }
    Err(Invalid::new(
        name,
        format!("{} is not one of {}", quoted(raw), choices.join(", ")),
    ))
}

fn check_bounds(name: &str, n: i64, min: Option<i64>, max: Option<i64>) -> Result<(), Invalid> {
    if let Some(min) = min.filter(|m| n < *m) {
        return Err(Invalid::new(
            name,
            format!("{n} is less than minimum value {min}"),
        ));
    }
    if let Some(max) = max.filter(|m| n > *m) {
        return Err(Invalid::new(
            name,
            format!("{n} is greater than maximum value {max}"),
        ));
    }
    Ok(())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Joining integers with arbitrary padding and stray commas always
        /// coerces back to the same integers.
        #[test]
        fn csv_ints_survive_padding(
            nums in prop::collection::vec(any::<i64>(), 0..16),
            pad in "[ ]{0,3}",
        ) {
            let text = nums
                .iter()
                .map(|n| format!("{pad}{n}{pad}"))
                .collect::<Vec<_>>()
                .join(",,");
            let got = FieldType::csv(FieldType::Int)
                .coerce("ids", &JsonValue::String(text))
                .unwrap();
            let expected = Value::List(nums.into_iter().map(Value::Int).collect());
            prop_assert_eq!(got, expected);
        }

        /// A bounded integer accepts exactly the values inside its bounds.
        #[test]
        fn int_range_membership(n in -50i64..50, lo in -20i64..0, hi in 0i64..20) {
            let t = FieldType::int_range(Some(lo), Some(hi));
            let ok = t.coerce("n", &JsonValue::String(n.to_string())).is_ok();
            prop_assert_eq!(ok, lo <= n && n <= hi);
        }
    }
}
