//! # Field Declarations
//!
//! A [`Field`] is one expected argument: its name, a [`FieldType`]
//! adapter, what to do when the argument is absent, and an optional
//! transform applied to the coerced value.

use std::fmt;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::error::Invalid;
use crate::types::FieldType;
use crate::value::Value;

/// Post-processing applied to a coerced value or a missing-field default.
pub type Transform = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Policy for an absent argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Missing {
    /// Absence is a validation failure (`Required`).
    Required,
    /// Absence yields this value; it skips coercion but not the transform.
    Default(Value),
}

/// Message reported for an absent required argument.
pub const REQUIRED: &str = "Required";

/// One declared argument.
#[derive(Clone)]
pub struct Field {
    name: String,
    title: String,
    typ: FieldType,
    missing: Missing,
    transform: Option<Transform>,
    top_level: bool,
}

impl Field {
    /// A required argument.
    pub fn new(name: impl Into<String>, typ: FieldType) -> Self {
        let name = name.into();
        Self {
            title: default_title(&name),
            top_level: typ.is_top_level(),
            name,
            typ,
            missing: Missing::Required,
            transform: None,
        }
    }

    /// An optional argument; absent values become [`Value::Null`].
    pub fn optional(name: impl Into<String>, typ: FieldType) -> Self {
        Self::new(name, typ).with_default(Value::Null)
    }

    /// A top-level pagination field reading `_page`/`_offset`/`_skip`/`_limit`.
    pub fn range(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::range())
    }

    /// Make the argument optional with the given default.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.missing = Missing::Default(value.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Apply `f` to every coerced value and to the missing-field default.
    pub fn with_transform<F>(mut self, f: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.transform = Some(Arc::new(f));
        self
    }

    /// Feed the whole input mapping to this field instead of one key.
    pub fn top_level(mut self) -> Self {
        self.top_level = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn field_type(&self) -> &FieldType {
        &self.typ
    }

    pub fn missing(&self) -> &Missing {
        &self.missing
    }

    pub fn is_required(&self) -> bool {
        matches!(self.missing, Missing::Required)
    }

    pub fn is_top_level(&self) -> bool {
        self.top_level
    }

    /// Deserialize this field's raw value (`None` when the key is absent).
    pub fn deserialize(&self, raw: Option<&JsonValue>) -> Result<Value, Invalid> {
        let value = match raw {
            Some(v) if !self.typ.is_missing(v) => self.typ.coerce(&self.name, v)?,
            _ => match &self.missing {
                Missing::Required => return Err(Invalid::new(&self.name, REQUIRED)),
                Missing::Default(value) => value.clone(),
            },
        };

        Ok(match &self.transform {
            Some(f) => f(value),
            None => value,
        })
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("title", &self.title)
            .field("typ", &self.typ)
            .field("missing", &self.missing)
            .field("transform", &self.transform.as_ref().map(|_| "<fn>"))
            .field("top_level", &self.top_level)
            .finish()
    }
}

/// `page_size` → `Page Size`.
fn default_title(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_alpha = false;
    for ch in name.chars() {
        let ch = if ch == '_' { ' ' } else { ch };
        if prev_alpha {
            out.extend(ch.to_lowercase());
        } else {
            out.extend(ch.to_uppercase());
        }
        prev_alpha = ch.is_alphabetic();
    }
    out
}
