//! # reqargs-axum: Axum Integration
//!
//! Connects `reqargs-core` validators to Axum requests.
//!
//! ## Two Ways to Guard a Handler
//!
//! - **Decorator**: [`validated`] wraps an `async fn(Args)` with a
//!   [`Validator`](reqargs_core::Validator) built at router assembly time.
//! - **Extractor**: [`Validated<A>`] reads the schema and source from a
//!   type implementing [`ArgSchema`], for handlers that also take other
//!   extractors.
//!
//! Both read route parameters as the call-time keyword arguments and both
//! reject bad input with [`ApiError`], rendered as `400 Bad Request` (a
//! body over the configured limit keeps its `413`):
//!
//! ```text
//! {"error": {"code": "BAD_PARAMS", "message": "...", "details": {"field": "message"}}}
//! ```
//!
//! ## Crate Policy
//!
//! - Only request plumbing lives here; coercion and aggregation belong to
//!   `reqargs-core`.
//! - Internal failures (a schema that cannot be built) are logged and
//!   never described to the client.

pub mod error;
pub mod extract;
pub mod handler;
pub mod request;

pub use error::{ApiError, ErrorBody, ErrorDetail};
pub use extract::{ArgSchema, SchemaCell, Validated};
pub use handler::validated;
pub use request::AxumRequest;
