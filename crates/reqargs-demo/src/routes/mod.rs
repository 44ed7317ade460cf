//! # API Route Modules
//!
//! - `items`: the item catalog, one route per request argument source.

pub mod items;
