//! # Validated Handlers
//!
//! [`validated`] is the decorator form: it wraps an `async fn(Args)` so the
//! wrapped handler runs only on arguments that passed the validator. Bad
//! input is answered with a `400` before the handler is reached.

use std::future::Future;
use std::pin::Pin;

use axum::extract::Request;
use axum::response::{IntoResponse, Response};
use reqargs_core::{Args, Validator};

use crate::request::validate_request;

/// Boxed response future returned by [`validated`] handlers.
pub type ResponseFuture = Pin<Box<dyn Future<Output = Response> + Send>>;

/// Wrap `handler` with `validator`.
///
/// The result is an axum handler taking the whole request; route
/// parameters become the call-time keyword arguments.
///
/// ```ignore
/// let get_item = Validator::rparams(&[], [Field::new("id", FieldType::Int)])?;
/// Router::new().route("/items/{id}", get(validated(get_item, show_item)))
/// ```
pub fn validated<F, Fut, Res>(
    validator: Validator,
    handler: F,
) -> impl Fn(Request) -> ResponseFuture + Clone + Send + Sync + 'static
where
    F: Fn(Args) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Res> + Send + 'static,
    Res: IntoResponse,
{
    move |req: Request| -> ResponseFuture {
        let validator = validator.clone();
        let handler = handler.clone();
        let fut: ResponseFuture = Box::pin(async move {
            match validate_request(&validator, req).await {
                Ok(args) => handler(args).await.into_response(),
                Err(err) => err.into_response(),
            }
        });
        fut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use http_body_util::BodyExt;
    use reqargs_core::{Field, FieldType};

    async fn double(args: Args) -> String {
        let n = args["n"].as_i64().unwrap_or_default();
        (n * 2).to_string()
    }

    async fn unreachable_handler(_args: Args) -> StatusCode {
        panic!("handler must not run")
    }

    fn query(uri: &str) -> Request {
        axum::http::Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn valid_request_reaches_handler() {
        let v = Validator::query_string(&[], [Field::new("n", FieldType::Int)]).unwrap();
        let handler = validated(v, double);

        let response = handler(query("/double?n=21")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"42");
    }

    #[tokio::test]
    async fn invalid_request_is_rejected() {
        let v = Validator::query_string(&[], [Field::new("n", FieldType::Int)]).unwrap();
        let handler = validated(v, unreachable_handler);

        let response = handler(query("/double?n=x")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
