//! Request extraction.
//!
//! # Responsibilities
//! - Extract the path within the mount point for the routed request,
//!   percent-decoded
//! - Extract the optional caller identity
//! - Stamp every request with an `x-request-id` for tracing
//! - Open the per-request span with that ID recorded
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The path comes from the router's own mount bookkeeping, not the raw URL

use std::convert::Infallible;

use axum::{
    body::Body,
    extract::FromRequestParts,
    http::{request::Parts, Request, StatusCode},
};
use percent_encoding::percent_decode_str;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tracing::Span;

use crate::engine::Identity;
use crate::http::server::AppState;

pub use tower_http::request_id::RequestId;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Layer assigning a UUID request ID when the client sent none.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::x_request_id(MakeRequestUuid)
}

/// Layer copying the request ID onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}

/// Span for one request. Runs inside the set-request-id layer, so the ID is
/// always present on routed traffic.
pub fn request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}

/// Path of the request past the mount prefix, percent-decoded.
///
/// Slicing happens on the raw path, decoding after; a path that does not
/// decode to UTF-8 is a 400.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithinMount(pub String);

impl FromRequestParts<AppState> for WithinMount {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = state
            .mount
            .path_within(parts.uri.path())
            .ok_or(StatusCode::NOT_FOUND)?;
        let path = percent_decode_str(raw)
            .decode_utf8()
            .map_err(|_| StatusCode::BAD_REQUEST)?;
        Ok(Self(path.into_owned()))
    }
}

/// The caller identity, if any layer attached one.
#[derive(Debug, Clone)]
pub struct MaybeIdentity(pub Option<Identity>);

impl<S> FromRequestParts<S> for MaybeIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<Identity>().cloned()))
    }
}
