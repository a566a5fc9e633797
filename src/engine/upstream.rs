//! Engine that forwards to a remote JSON:API backend over HTTP.
//!
//! # Responsibilities
//! - Rebuild the routed request against the configured base URL,
//!   re-encoding the decoded path
//! - Hand the caller identity over in a configurable header
//! - Return the backend's status and body verbatim
//!
//! # Design Decisions
//! - The timeout and the response size cap live here, not in the router
//! - No retries: one routed request is one upstream exchange

use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, HeaderName, Method, Request, Uri};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::config::UpstreamConfig;
use crate::engine::{Engine, EngineError, EngineResponse, Identity, JSON_API_MEDIA_TYPE};
use crate::routing::QueryParams;

/// Escaped when a decoded path goes back on the wire. '/' stays a separator.
const PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// HTTP client wrapper implementing [`Engine`].
#[derive(Clone)]
pub struct UpstreamEngine {
    client: Client<HttpConnector, Body>,
    base: String,
    identity_header: HeaderName,
    timeout: Duration,
    max_response_size: usize,
}

/// Everything needed to issue one upstream request.
struct Exchange<'a> {
    method: Method,
    path: &'a str,
    query: Option<&'a QueryParams>,
    content_type: Option<&'a str>,
    accept: &'a str,
    body: Option<&'a str>,
    identity: Option<&'a Identity>,
}

impl UpstreamEngine {
    /// Build an engine from validated configuration.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, EngineError> {
        let identity_header = HeaderName::from_bytes(config.identity_header.as_bytes())
            .map_err(|e| EngineError::InvalidTarget(format!("identity header: {}", e)))?;

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        Ok(Self {
            client,
            base: config.url.trim_end_matches('/').to_string(),
            identity_header,
            timeout: Duration::from_secs(config.request_timeout_secs),
            max_response_size: config.max_response_size,
        })
    }

    /// Base URL requests are issued against, without a trailing slash.
    pub fn base(&self) -> &str {
        &self.base
    }

    fn target(&self, path: &str, query: Option<&QueryParams>) -> Result<Uri, EngineError> {
        let mut target = format!("{}{}", self.base, utf8_percent_encode(path, PATH));
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            target.push('?');
            target.push_str(&query.to_query_string());
        }
        target
            .parse()
            .map_err(|e| EngineError::InvalidTarget(format!("{}: {}", target, e)))
    }

    async fn send(&self, exchange: Exchange<'_>) -> Result<EngineResponse, EngineError> {
        let uri = self.target(exchange.path, exchange.query)?;
        let method = exchange.method.clone();

        let mut builder = Request::builder()
            .method(exchange.method)
            .uri(uri)
            .header(header::ACCEPT, exchange.accept);
        if let Some(content_type) = exchange.content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        if let Some(identity) = exchange.identity {
            builder = builder.header(&self.identity_header, identity.as_str());
        }
        let body = match exchange.body {
            Some(body) => Body::from(body.to_owned()),
            None => Body::empty(),
        };
        let request = builder
            .body(body)
            .map_err(|e| EngineError::InvalidTarget(e.to_string()))?;

        tracing::debug!(method = %method, path = %exchange.path, "Forwarding to upstream engine");

        let round_trip = async {
            let response = self
                .client
                .request(request)
                .await
                .map_err(|e| EngineError::Unavailable(e.to_string()))?;
            let status = response.status().as_u16();
            let body = Body::new(response.into_body());
            let bytes = axum::body::to_bytes(body, self.max_response_size)
                .await
                .map_err(|e| EngineError::Unavailable(e.to_string()))?;
            let body = String::from_utf8(bytes.to_vec()).map_err(|_| EngineError::InvalidBody)?;
            Ok(EngineResponse::new(status, body))
        };

        tokio::time::timeout(self.timeout, round_trip)
            .await
            .map_err(|_| EngineError::Timeout(self.timeout))?
    }
}

#[async_trait]
impl Engine for UpstreamEngine {
    async fn fetch(
        &self,
        path: &str,
        query: &QueryParams,
        identity: Option<&Identity>,
    ) -> Result<EngineResponse, EngineError> {
        self.send(Exchange {
            method: Method::GET,
            path,
            query: Some(query),
            content_type: None,
            accept: JSON_API_MEDIA_TYPE,
            body: None,
            identity,
        })
        .await
    }

    async fn create(
        &self,
        path: &str,
        body: &str,
        identity: Option<&Identity>,
    ) -> Result<EngineResponse, EngineError> {
        self.send(Exchange {
            method: Method::POST,
            path,
            query: None,
            content_type: Some(JSON_API_MEDIA_TYPE),
            accept: JSON_API_MEDIA_TYPE,
            body: Some(body),
            identity,
        })
        .await
    }

    async fn update(
        &self,
        content_type: &str,
        accept: &str,
        path: &str,
        body: &str,
        identity: Option<&Identity>,
    ) -> Result<EngineResponse, EngineError> {
        self.send(Exchange {
            method: Method::PATCH,
            path,
            query: None,
            content_type: Some(content_type),
            accept,
            body: Some(body),
            identity,
        })
        .await
    }

    async fn delete(
        &self,
        path: &str,
        body: Option<&str>,
        identity: Option<&Identity>,
    ) -> Result<EngineResponse, EngineError> {
        self.send(Exchange {
            method: Method::DELETE,
            path,
            query: None,
            content_type: body.map(|_| JSON_API_MEDIA_TYPE),
            accept: JSON_API_MEDIA_TYPE,
            body,
            identity,
        })
        .await
    }
}
