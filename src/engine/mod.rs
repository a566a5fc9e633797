//! Engine contract.
//!
//! The engine is the external JSON:API document processor. The router never
//! interprets what it returns; it only picks which of the four calls to make.
//!
//! # Data Flow
//! ```text
//! RoutedRequest (routing/request.rs)
//!     → dispatch() picks fetch/create/update/delete
//!     → Engine implementation (upstream.rs in the binary, mocks in tests)
//!     → EngineResponse { status, body } copied to the client unchanged
//! ```

pub mod upstream;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::routing::QueryParams;

pub use upstream::UpstreamEngine;

/// The canonical media type for JSON:API request and response documents.
pub const JSON_API_MEDIA_TYPE: &str = "application/vnd.api+json";

/// Opaque caller identity.
///
/// Supplied by whatever authentication sits in front of the router and handed
/// to the engine untouched.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity(Arc<str>);

impl Identity {
    pub fn new(token: impl Into<Arc<str>>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens end up in request spans; never print them.
impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Identity(..)")
    }
}

/// Status and body produced by the engine for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineResponse {
    pub status: u16,
    pub body: String,
}

impl EngineResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Failure to obtain any response from the engine.
///
/// Engine-level rejections (404 for a missing resource, 422 for a bad
/// document...) are not errors; they arrive as an [`EngineResponse`].
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("engine unavailable: {0}")]
    Unavailable(String),

    #[error("engine did not answer within {0:?}")]
    Timeout(Duration),

    #[error("invalid engine target: {0}")]
    InvalidTarget(String),

    #[error("engine returned a body that is not valid UTF-8")]
    InvalidBody,

    #[error("engine failure: {0}")]
    Internal(String),
}

/// The four JSON:API entry points the router forwards to.
#[async_trait]
pub trait Engine: Send + Sync {
    async fn fetch(
        &self,
        path: &str,
        query: &QueryParams,
        identity: Option<&Identity>,
    ) -> Result<EngineResponse, EngineError>;

    async fn create(
        &self,
        path: &str,
        body: &str,
        identity: Option<&Identity>,
    ) -> Result<EngineResponse, EngineError>;

    /// `content_type` and `accept` are always passed explicitly so the engine
    /// can tell a JSON:API partial update from other patch dialects.
    async fn update(
        &self,
        content_type: &str,
        accept: &str,
        path: &str,
        body: &str,
        identity: Option<&Identity>,
    ) -> Result<EngineResponse, EngineError>;

    /// `body` is present for relationship removal, absent for resource deletion.
    async fn delete(
        &self,
        path: &str,
        body: Option<&str>,
        identity: Option<&Identity>,
    ) -> Result<EngineResponse, EngineError>;
}
