//! # Request Adapter
//!
//! [`AxumRequest`] is the [`RequestSource`] over one axum request. Only the
//! parts a validator's [`Source`] needs are read: the body is consumed for
//! `Form`, `Params` and `JsonBody` and left alone otherwise.

use axum::body::Bytes;
use axum::extract::rejection::RawPathParamsRejection;
use axum::extract::{FromRequest, FromRequestParts, RawPathParams, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::request::Parts;
use reqargs_core::{Args, BadParams, RawInput, RequestSource, Source, Validator, Value};
use serde_json::Value as JsonValue;

use crate::error::ApiError;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Query, form and body of one request, decoded up front.
#[derive(Debug, Default, Clone)]
pub struct AxumRequest {
    query: RawInput,
    form: RawInput,
    body: Bytes,
}

impl AxumRequest {
    /// Read what `source` needs from `req`.
    ///
    /// Malformed url-encoded data is a bad-parameter failure; a body that
    /// cannot be read at all keeps the rejection's status.
    pub async fn read(req: Request, source: Source) -> Result<Self, ApiError> {
        let (parts, body) = req.into_parts();
        let query = parse_urlencoded(parts.uri.query().unwrap_or_default().as_bytes())?;

        if !matches!(source, Source::Form | Source::Params | Source::JsonBody) {
            return Ok(Self {
                query,
                ..Self::default()
            });
        }

        let is_form = is_form_content(&parts);
        let body = Bytes::from_request(Request::from_parts(parts, body), &()).await?;
        let form = if is_form {
            parse_urlencoded(&body)?
        } else {
            RawInput::new()
        };

        Ok(Self { query, form, body })
    }
}

impl RequestSource for AxumRequest {
    fn query(&self) -> RawInput {
        self.query.clone()
    }

    fn form(&self) -> RawInput {
        self.form.clone()
    }

    fn json(&self) -> Result<JsonValue, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Validate `req` with `validator`, passing route parameters as kwargs.
pub async fn validate_request(validator: &Validator, req: Request) -> Result<Args, ApiError> {
    let (mut parts, body) = req.into_parts();
    let kwargs = route_args(&mut parts).await?;

    tracing::debug!(
        source = ?validator.source(),
        path = %parts.uri.path(),
        "validating request arguments"
    );

    let request = AxumRequest::read(Request::from_parts(parts, body), validator.source()).await?;
    Ok(validator.validate(&request, kwargs)?)
}

/// Matched route parameters in path order, as string values.
async fn route_args(parts: &mut Parts) -> Result<Args, BadParams> {
    match RawPathParams::from_request_parts(parts, &()).await {
        Ok(params) => Ok(params
            .iter()
            .map(|(key, value)| (key.to_string(), Value::from(value)))
            .collect()),
        Err(RawPathParamsRejection::MissingPathParams(_)) => Ok(Args::new()),
        Err(rejection) => Err(BadParams::message(rejection.body_text())),
    }
}

fn is_form_content(parts: &Parts) -> bool {
    parts
        .headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with(FORM_CONTENT_TYPE))
}

/// Decode `a=1&b=2`; a repeated key keeps its last value.
fn parse_urlencoded(input: &[u8]) -> Result<RawInput, BadParams> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(input)
        .map_err(|e| BadParams::message(format!("malformed url-encoded data: {e}")))?;
    Ok(pairs
        .into_iter()
        .map(|(key, value)| (key, JsonValue::String(value)))
        .collect())
}
