//! # Validated Extractor
//!
//! [`Validated<A>`] validates a request against the schema that `A`
//! declares through [`ArgSchema`]. The schema is built once per type and
//! cached in a [`SchemaCell`].
//!
//! ```ignore
//! struct Listing;
//!
//! impl ArgSchema for Listing {
//!     const SOURCE: Source = Source::QueryString;
//!
//!     fn schema() -> Result<Arc<Schema>, SchemaError> {
//!         static CELL: SchemaCell = SchemaCell::new();
//!         CELL.get_or_build(|| Schema::builder().field(Field::range("range")).build())
//!     }
//! }
//!
//! async fn list(args: Validated<Listing>) -> impl IntoResponse { /* ... */ }
//! ```

use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::{Arc, OnceLock};

use axum::extract::{FromRequest, Request};
use reqargs_core::{Args, Schema, SchemaError, Source, Validator};

use crate::error::ApiError;
use crate::request::validate_request;

/// A type naming a schema and the request source it validates.
pub trait ArgSchema: Send + Sync + 'static {
    const SOURCE: Source;

    /// The schema, typically cached in a `static` [`SchemaCell`].
    fn schema() -> Result<Arc<Schema>, SchemaError>;
}

/// Lazily built, shared schema.
#[derive(Debug)]
pub struct SchemaCell(OnceLock<Result<Arc<Schema>, SchemaError>>);

impl SchemaCell {
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Build on first use; later calls return the cached outcome.
    pub fn get_or_build<F>(&self, build: F) -> Result<Arc<Schema>, SchemaError>
    where
        F: FnOnce() -> Result<Schema, SchemaError>,
    {
        self.0.get_or_init(|| build().map(Arc::new)).clone()
    }
}

impl Default for SchemaCell {
    fn default() -> Self {
        Self::new()
    }
}

/// Handler arguments that passed `A`'s schema, merged with route parameters.
#[derive(Debug, Clone)]
pub struct Validated<A> {
    args: Args,
    _schema: PhantomData<fn() -> A>,
}

impl<A> Validated<A> {
    pub fn into_inner(self) -> Args {
        self.args
    }
}

impl<A> Deref for Validated<A> {
    type Target = Args;

    fn deref(&self) -> &Args {
        &self.args
    }
}

impl<S, A> FromRequest<S> for Validated<A>
where
    S: Send + Sync,
    A: ArgSchema,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let validator = Validator::shared(A::SOURCE, A::schema()?);
        let args = validate_request(&validator, req).await?;
        Ok(Self {
            args,
            _schema: PhantomData,
        })
    }
}
