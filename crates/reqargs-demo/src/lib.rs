//! # reqargs-demo: Catalog Service
//!
//! A small in-memory item catalog whose handlers take only validated
//! arguments. It exercises every request source end to end.
//!
//! ## API Surface
//!
//! | Prefix | Module | Domain |
//! |--------|--------|--------|
//! | `/v1/items*` | [`routes::items`] | catalog |
//! | `/v1/search` | [`routes::items`] | catalog search |
//! | `/health/*` | this module | probes |
//!
//! ## Middleware Stack
//!
//! ```text
//! TraceLayer → Handler
//! ```

pub mod config;
pub mod routes;
pub mod state;

use axum::routing::get;
use axum::Router;
use reqargs_core::SchemaError;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the application router.
///
/// Fails only if one of the route argument schemas cannot be built.
pub fn app(state: AppState) -> Result<Router, SchemaError> {
    let api = routes::items::router(state.clone())?
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    Ok(Router::new().merge(health).merge(api))
}

/// Liveness probe.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe.
async fn readiness() -> &'static str {
    "ready"
}
