//! # reqargs-core: Request Argument Schemas
//!
//! Declarative validation of incoming request arguments. A handler states
//! which arguments it expects; this crate pulls the raw values out of a
//! request source, coerces them against an ordered [`Schema`], and hands the
//! cleaned values to the handler. Every field failure of one pass is
//! reported together as a single [`BadParams`] error.
//!
//! ## Building Blocks
//!
//! - [`Field`]: one declared argument with its name, [`FieldType`] adapter,
//!   missing-value policy, optional post-processing transform.
//! - [`FieldType`]: closed set of coercion adapters (scalars, CSV lists,
//!   JSON lists, enumerated choices, bounded integers, pagination ranges).
//! - [`Schema`] / [`SchemaBuilder`]: ordered field list. Composition is
//!   explicit; base schemas are extended, never mutated.
//! - [`Validator`]: the decorator factory. Binds a schema to a [`Source`]
//!   and wraps handlers so they receive validated [`Args`].
//!
//! ## Example
//!
//! ```
//! use reqargs_core::{Field, FieldType, Schema};
//! use serde_json::json;
//!
//! let schema = Schema::builder()
//!     .field(Field::new("ids", FieldType::csv(FieldType::Int)))
//!     .field(Field::optional("sort", FieldType::one_of(["asc", "desc"])))
//!     .field(Field::range("range"))
//!     .build()
//!     .unwrap();
//!
//! let args = schema
//!     .deserialize(&json!({"ids": "1, 2,3", "_page": "2"}))
//!     .unwrap();
//! assert_eq!(args["ids"].as_list().map(|l| l.len()), Some(3));
//! assert!(args["sort"].is_null());
//! ```
//!
//! ## Crate Policy
//!
//! - No dependency on any web framework; framework glue lives in
//!   `reqargs-axum`, which implements [`RequestSource`].
//! - Schemas are immutable once built and safe to share across threads.
//! - No `.unwrap()` outside tests.

pub mod error;
pub mod field;
pub mod range;
pub mod schema;
pub mod types;
pub mod validator;
pub mod value;

pub use error::{BadParams, Invalid, SchemaError};
pub use field::{Field, Missing, Transform};
pub use range::{RangeInfo, RangeKeys};
pub use schema::{make_schema, Schema, SchemaBuilder};
pub use types::FieldType;
pub use validator::{validate, RawInput, RequestSource, Source, Validator};
pub use value::{Args, Value};
