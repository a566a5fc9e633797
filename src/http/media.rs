//! JSON:API media type negotiation.
//!
//! # Responsibilities
//! - Gate request bodies on `Content-Type: application/vnd.api+json` (415)
//! - Reject requests whose `Accept` excludes the JSON:API type (406)
//! - Reject declared JSON:API bodies that are empty (400)
//!
//! # Design Decisions
//! - Media type parameters are ignored when matching, never rewritten
//! - Content type is checked before `Accept`, so 415 wins over 406
//! - Rejections happen before the engine is called

use axum::{
    extract::{FromRequest, Request},
    http::{header, HeaderMap, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

pub use crate::engine::JSON_API_MEDIA_TYPE;

/// Type/subtype of a media type, lowercased, without parameters.
fn essence(media_type: &str) -> String {
    media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// True when the request declares a JSON:API body.
pub fn has_json_api_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| essence(value) == JSON_API_MEDIA_TYPE)
        .unwrap_or(false)
}

/// True when the client will take a JSON:API response. No `Accept` header
/// means anything goes.
pub fn accepts_json_api(headers: &HeaderMap) -> bool {
    let mut values = headers.get_all(header::ACCEPT).into_iter().peekable();
    if values.peek().is_none() {
        return true;
    }

    values
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(media_range_admits_json_api)
}

fn media_range_admits_json_api(range: &str) -> bool {
    let mut parts = range.split(';');
    let kind = essence(parts.next().unwrap_or_default());
    if !matches!(kind.as_str(), "*/*" | "application/*" | JSON_API_MEDIA_TYPE) {
        return false;
    }

    // q=0 explicitly refuses the range.
    !parts.any(|param| {
        let mut kv = param.splitn(2, '=');
        let name = kv.next().unwrap_or_default().trim();
        let value = kv.next().unwrap_or_default().trim();
        name.eq_ignore_ascii_case("q") && value.parse::<f32>().map(|q| q <= 0.0).unwrap_or(false)
    })
}

/// True for methods whose body must be JSON:API. DELETE bodies are optional.
fn requires_json_api_body(method: &Method) -> bool {
    *method == Method::POST || *method == Method::PATCH
}

/// Middleware answering 415 for an undeclared body, then 406 when the
/// response type is unacceptable.
pub async fn negotiate(request: Request, next: Next) -> Response {
    if requires_json_api_body(request.method()) && !has_json_api_content_type(request.headers()) {
        return StatusCode::UNSUPPORTED_MEDIA_TYPE.into_response();
    }
    if !accepts_json_api(request.headers()) {
        return StatusCode::NOT_ACCEPTABLE.into_response();
    }
    next.run(request).await
}

async fn read_non_empty<S>(request: Request, state: &S) -> Result<String, Response>
where
    S: Send + Sync,
{
    let body = String::from_request(request, state)
        .await
        .map_err(IntoResponse::into_response)?;
    if body.is_empty() {
        return Err(StatusCode::BAD_REQUEST.into_response());
    }
    Ok(body)
}

/// A non-empty request body that must be declared as JSON:API.
#[derive(Debug)]
pub struct JsonApiBody(pub String);

impl<S> FromRequest<S> for JsonApiBody
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !has_json_api_content_type(request.headers()) {
            return Err(StatusCode::UNSUPPORTED_MEDIA_TYPE.into_response());
        }
        read_non_empty(request, state).await.map(Self)
    }
}

/// A body that is taken only when declared as JSON:API.
///
/// Used by DELETE, where a body means relationship removal and its absence
/// means resource deletion. A declared but empty body is a 400.
#[derive(Debug)]
pub struct OptionalJsonApiBody(pub Option<String>);

impl<S> FromRequest<S> for OptionalJsonApiBody
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !has_json_api_content_type(request.headers()) {
            return Ok(Self(None));
        }
        read_non_empty(request, state).await.map(|body| Self(Some(body)))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(name: header::HeaderName, value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_content_type_ignores_case_and_parameters() {
        assert!(has_json_api_content_type(&headers(
            header::CONTENT_TYPE,
            "application/vnd.api+json"
        )));
        assert!(has_json_api_content_type(&headers(
            header::CONTENT_TYPE,
            "Application/VND.API+JSON; charset=utf-8"
        )));
        assert!(!has_json_api_content_type(&headers(
            header::CONTENT_TYPE,
            "application/json"
        )));
        assert!(!has_json_api_content_type(&HeaderMap::new()));
    }

    async fn extract<T>(
        content_type: Option<&'static str>,
        body: &'static str,
    ) -> Result<T, StatusCode>
    where
        T: FromRequest<()>,
        T::Rejection: IntoResponse,
    {
        let mut request = axum::http::Request::builder();
        if let Some(content_type) = content_type {
            request = request.header(header::CONTENT_TYPE, content_type);
        }
        let request = request.body(axum::body::Body::from(body)).unwrap();
        T::from_request(request, &())
            .await
            .map_err(|rejection| rejection.into_response().status())
    }

    #[tokio::test]
    async fn test_json_api_body_rejections() {
        let JsonApiBody(body) = extract(Some(JSON_API_MEDIA_TYPE), "{}").await.unwrap();
        assert_eq!(body, "{}");

        let err = extract::<JsonApiBody>(Some("application/json"), "{}").await.unwrap_err();
        assert_eq!(err, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let err = extract::<JsonApiBody>(Some(JSON_API_MEDIA_TYPE), "").await.unwrap_err();
        assert_eq!(err, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_optional_body_only_when_declared() {
        let OptionalJsonApiBody(body) = extract(None, "ignored").await.unwrap();
        assert_eq!(body, None);
        let OptionalJsonApiBody(body) = extract(Some(JSON_API_MEDIA_TYPE), "{}").await.unwrap();
        assert_eq!(body.as_deref(), Some("{}"));

        let err = extract::<OptionalJsonApiBody>(Some(JSON_API_MEDIA_TYPE), "").await.unwrap_err();
        assert_eq!(err, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_accept_negotiation() {
        assert!(accepts_json_api(&HeaderMap::new()));
        assert!(accepts_json_api(&headers(header::ACCEPT, "*/*")));
        assert!(accepts_json_api(&headers(header::ACCEPT, "application/*")));
        assert!(accepts_json_api(&headers(
            header::ACCEPT,
            "text/html, application/vnd.api+json;q=0.5"
        )));
        assert!(!accepts_json_api(&headers(header::ACCEPT, "text/html")));
        assert!(!accepts_json_api(&headers(header::ACCEPT, "application/json")));
        assert!(!accepts_json_api(&headers(
            header::ACCEPT,
            "application/vnd.api+json; q=0"
        )));
    }
}
