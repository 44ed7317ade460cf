//! # Schemas
//!
//! A [`Schema`] is an ordered, immutable list of [`Field`]s. Schemas are
//! declared with a [`SchemaBuilder`] and composed explicitly: a derived
//! schema extends one or more base schemas, whose fields keep their order
//! ahead of the newly declared ones.
//!
//! ## Redeclared Names
//!
//! Names are unique within a schema. Declaring a field whose name already
//! exists is a [`SchemaError::DuplicateField`]; replacing a base field is
//! done explicitly with [`SchemaBuilder::override_field`], which keeps the
//! base field's position.
//!
//! ## Validation Pass
//!
//! [`Schema::deserialize`] walks the fields in declaration order. Each
//! field takes its key out of a working copy of the input (top-level fields
//! see the whole remaining mapping), and every failure is collected into a
//! single [`Invalid`] tagged with the failing field's index. Keys that no
//! field consumes are ignored.

use serde_json::{Map, Value as JsonValue};

use crate::error::{Invalid, SchemaError};
use crate::field::Field;
use crate::value::Args;

/// Ordered field declarations.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Declaration index of `name`; this is the position reported in errors.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name() == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(Field::name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validate and coerce a raw input mapping.
    pub fn deserialize(&self, input: &JsonValue) -> Result<Args, Invalid> {
        let JsonValue::Object(map) = input else {
            return Err(Invalid::new("", format!("\"{input}\" is not a mapping type")));
        };

        let mut working: Map<String, JsonValue> = map.clone();
        let mut result = Args::with_capacity(self.fields.len());
        let mut error: Option<Invalid> = None;

        for (num, field) in self.fields.iter().enumerate() {
            let outcome = if field.is_top_level() {
                field.deserialize(Some(&JsonValue::Object(working.clone())))
            } else {
                field.deserialize(working.remove(field.name()).as_ref())
            };

            match outcome {
                Ok(value) => {
                    result.insert(field.name().to_string(), value);
                }
                Err(e) => error.get_or_insert_with(|| Invalid::node("")).add(e, num),
            }
        }

        tracing::debug!(
            fields = self.fields.len(),
            failures = error.as_ref().map_or(0, |e| e.children().len()),
            ignored = working.len(),
            "validated request arguments"
        );

        match error {
            Some(e) => Err(e),
            None => Ok(result),
        }
    }
}

/// Builder for [`Schema`].
///
/// Declaration errors are deferred to [`build`](Self::build) so that
/// declarations can be chained.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<Field>,
    error: Option<SchemaError>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every field of `base`, in its order. Chain several calls to
    /// compose multiple bases, most distant ancestor first.
    pub fn extend(mut self, base: &Schema) -> Self {
        for field in base.fields() {
            self.push(field.clone());
        }
        self
    }

    /// Declare a new field after all fields declared so far.
    pub fn field(mut self, field: Field) -> Self {
        self.push(field);
        self
    }

    /// Declare several fields in order.
    pub fn fields<I>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = Field>,
    {
        for field in fields {
            self.push(field);
        }
        self
    }

    /// Replace the previously declared field with the same name, keeping
    /// its position.
    pub fn override_field(mut self, field: Field) -> Self {
        match self.fields.iter_mut().find(|f| f.name() == field.name()) {
            Some(slot) => *slot = field,
            None => self.fail(SchemaError::UnknownField(field.name().to_string())),
        }
        self
    }

    pub fn build(self) -> Result<Schema, SchemaError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(Schema {
                fields: self.fields,
            }),
        }
    }

    fn push(&mut self, field: Field) {
        if field.name().is_empty() {
            self.fail(SchemaError::EmptyName);
        } else if self.fields.iter().any(|f| f.name() == field.name()) {
            self.fail(SchemaError::DuplicateField(field.name().to_string()));
        } else {
            self.fields.push(field);
        }
    }

    fn fail(&mut self, err: SchemaError) {
        self.error.get_or_insert(err);
    }
}

/// Build a schema from base schemas followed by newly declared fields.
pub fn make_schema<I>(bases: &[&Schema], fields: I) -> Result<Schema, SchemaError>
where
    I: IntoIterator<Item = Field>,
{
    bases
        .iter()
        .fold(Schema::builder(), |builder, base| builder.extend(base))
        .fields(fields)
        .build()
}
