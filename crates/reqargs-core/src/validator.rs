//! # Handler Decorator
//!
//! A [`Validator`] binds a [`Schema`] to an input [`Source`]. It is built
//! once, when a handler is declared, and then applied on every call: raw
//! input is pulled from the request, validated, and merged into the
//! handler's keyword arguments.
//!
//! ## Merge Rules
//!
//! | Source | Raw input | On conflict with call-time kwargs |
//! |--------|-----------|-----------------------------------|
//! | `QueryString`, `Form`, `Params`, `JsonBody` | the request | kwargs win |
//! | `RouteArgs` | the kwargs themselves | cleaned values win |
//!
//! The web framework is reached only through the [`RequestSource`] trait.

use std::sync::Arc;

use serde_json::{Map, Value as JsonValue};

use crate::error::{BadParams, SchemaError};
use crate::field::Field;
use crate::schema::{make_schema, Schema};
use crate::value::Args;

/// Raw key/value input as read from a request.
pub type RawInput = Map<String, JsonValue>;

/// Message for a JSON body that could not be decoded.
pub const JSON_REQUIRED: &str = "Json required";

/// Where a validator reads its raw input from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// URL query parameters.
    QueryString,
    /// URL-encoded form body.
    Form,
    /// Query parameters and form body together; the query wins on conflict.
    Params,
    /// JSON request body.
    JsonBody,
    /// The handler's own call-time keyword arguments (route parameters).
    RouteArgs,
}

/// A web framework's view of one request.
pub trait RequestSource {
    /// Query-string parameters. Repeated keys keep the last value.
    fn query(&self) -> RawInput;

    /// URL-encoded form body; empty when the request has none.
    fn form(&self) -> RawInput;

    /// Decoded JSON body.
    fn json(&self) -> Result<JsonValue, serde_json::Error>;
}

/// A schema bound to an input source.
#[derive(Debug, Clone)]
pub struct Validator {
    source: Source,
    schema: Arc<Schema>,
}

impl Validator {
    pub fn new(source: Source, schema: Schema) -> Self {
        Self::shared(source, Arc::new(schema))
    }

    /// Bind an already shared schema, e.g. one cached in a static.
    pub fn shared(source: Source, schema: Arc<Schema>) -> Self {
        Self { source, schema }
    }

    /// Validate query-string arguments.
    pub fn query_string<I>(bases: &[&Schema], fields: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = Field>,
    {
        Ok(Self::new(Source::QueryString, make_schema(bases, fields)?))
    }

    /// Validate form-body arguments.
    pub fn form<I>(bases: &[&Schema], fields: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = Field>,
    {
        Ok(Self::new(Source::Form, make_schema(bases, fields)?))
    }

    /// Validate query-string and form arguments together.
    pub fn params<I>(bases: &[&Schema], fields: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = Field>,
    {
        Ok(Self::new(Source::Params, make_schema(bases, fields)?))
    }

    /// Validate the JSON request body.
    pub fn jsonbody<I>(bases: &[&Schema], fields: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = Field>,
    {
        Ok(Self::new(Source::JsonBody, make_schema(bases, fields)?))
    }

    /// Validate the handler's own keyword arguments.
    pub fn rparams<I>(bases: &[&Schema], fields: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = Field>,
    {
        Ok(Self::new(Source::RouteArgs, make_schema(bases, fields)?))
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Read this validator's raw input.
    pub fn raw_input<R>(&self, req: &R, kwargs: &Args) -> Result<JsonValue, BadParams>
    where
        R: RequestSource + ?Sized,
    {
        Ok(match self.source {
            Source::QueryString => JsonValue::Object(req.query()),
            Source::Form => JsonValue::Object(req.form()),
            Source::Params => {
                let mut merged = req.form();
                merged.extend(req.query());
                JsonValue::Object(merged)
            }
            Source::JsonBody => req.json().map_err(|e| {
                tracing::debug!(error = %e, "request body is not JSON");
                BadParams::message(JSON_REQUIRED)
            })?,
            Source::RouteArgs => JsonValue::Object(
                kwargs
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        })
    }

    /// Validate a request and return the handler's merged arguments.
    pub fn validate<R>(&self, req: &R, kwargs: Args) -> Result<Args, BadParams>
    where
        R: RequestSource + ?Sized,
    {
        let raw = self.raw_input(req, &kwargs)?;
        let clean = validate(&self.schema, &raw)?;

        Ok(match self.source {
            Source::RouteArgs => {
                let mut merged = kwargs;
                merged.extend(clean);
                merged
            }
            _ => {
                let mut merged = clean;
                merged.extend(kwargs);
                merged
            }
        })
    }

    /// Wrap `handler` so each call is validated first.
    ///
    /// The returned function takes the request and the call-time keyword
    /// arguments; the handler receives the merged arguments.
    pub fn wrap<R, T, F>(&self, handler: F) -> impl Fn(&R, Args) -> Result<T, BadParams>
    where
        R: RequestSource + ?Sized,
        F: Fn(Args) -> T,
    {
        let validator = self.clone();
        move |req: &R, kwargs: Args| validator.validate(req, kwargs).map(&handler)
    }
}

/// Run `schema` over `data`, converting failures to [`BadParams`].
pub fn validate(schema: &Schema, data: &JsonValue) -> Result<Args, BadParams> {
    schema.deserialize(data).map_err(|err| {
        let err = BadParams::from(err);
        tracing::warn!(error = %err, "rejected request arguments");
        err
    })
}
