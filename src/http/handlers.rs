//! Verb handlers.
//!
//! Each handler turns its request into a [`RoutedRequest`], makes the one
//! engine call and returns the engine's answer. Content-type and accept
//! checks have already run in extractors and middleware by the time a
//! handler body executes.

use std::time::Instant;

use axum::extract::{RawQuery, State};

use crate::engine::{EngineError, EngineResponse};
use crate::http::media::{JsonApiBody, OptionalJsonApiBody};
use crate::http::request::{MaybeIdentity, WithinMount};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::{QueryParams, RoutedRequest};

type EngineResult = Result<EngineResponse, EngineError>;

/// `GET <mount>/**`
pub async fn handle_fetch(
    State(state): State<AppState>,
    WithinMount(path): WithinMount,
    RawQuery(query): RawQuery,
    MaybeIdentity(identity): MaybeIdentity,
) -> EngineResult {
    let query = query.as_deref().map(QueryParams::parse).unwrap_or_default();
    process(&state, RoutedRequest::fetch(path, query, identity)).await
}

/// `POST <mount>/**` with a JSON:API body.
pub async fn handle_create(
    State(state): State<AppState>,
    WithinMount(path): WithinMount,
    MaybeIdentity(identity): MaybeIdentity,
    JsonApiBody(body): JsonApiBody,
) -> EngineResult {
    process(&state, RoutedRequest::create(path, body, identity)).await
}

/// `PATCH <mount>/**` with a JSON:API body.
pub async fn handle_update(
    State(state): State<AppState>,
    WithinMount(path): WithinMount,
    MaybeIdentity(identity): MaybeIdentity,
    JsonApiBody(body): JsonApiBody,
) -> EngineResult {
    process(&state, RoutedRequest::update(path, body, identity)).await
}

/// `DELETE <mount>/**`, with a relationship payload or without a body.
pub async fn handle_delete(
    State(state): State<AppState>,
    WithinMount(path): WithinMount,
    MaybeIdentity(identity): MaybeIdentity,
    OptionalJsonApiBody(body): OptionalJsonApiBody,
) -> EngineResult {
    process(&state, RoutedRequest::delete(path, body, identity)).await
}

async fn process(state: &AppState, request: RoutedRequest) -> EngineResult {
    let start = Instant::now();
    tracing::debug!(
        operation = %request.operation,
        path = %request.path,
        query_params = request.query.len(),
        has_body = request.body.is_some(),
        "Dispatching to engine"
    );

    let result = request.dispatch(state.engine.as_ref()).await;

    let status = match &result {
        Ok(response) => response.status,
        Err(_) => 500,
    };
    metrics::record_request(request.operation, status, start);
    result
}
