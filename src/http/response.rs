//! Response mapping.
//!
//! # Responsibilities
//! - Copy the engine's status and body onto the client response
//! - Declare the JSON:API content type, nothing else
//! - Render engine failures through one generic error response
//!
//! # Design Decisions
//! - Engine status codes and bodies are never interpreted
//! - Failures become 500 with a JSON:API `errors` document

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::engine::{EngineError, EngineResponse};
use crate::http::media::JSON_API_MEDIA_TYPE;

fn json_api(status: StatusCode, body: String) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, HeaderValue::from_static(JSON_API_MEDIA_TYPE))],
        body,
    )
        .into_response()
}

/// Generic error document for failures outside the engine's own responses.
pub fn error_response(status: StatusCode, detail: &str) -> Response {
    let document = json!({
        "errors": [{
            "status": status.as_str(),
            "detail": detail,
        }]
    });
    json_api(status, document.to_string())
}

impl IntoResponse for EngineResponse {
    fn into_response(self) -> Response {
        match StatusCode::from_u16(self.status) {
            Ok(status) => json_api(status, self.body),
            Err(_) => {
                tracing::error!(status = self.status, "Engine returned an invalid status code");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "engine returned an invalid status code",
                )
            }
        }
    }
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Engine call failed");
        error_response(StatusCode::INTERNAL_SERVER_ERROR, &self.to_string())
    }
}
