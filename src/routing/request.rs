//! The per-request value handed to the engine.

use crate::engine::{Engine, EngineError, EngineResponse, Identity, JSON_API_MEDIA_TYPE};
use crate::routing::{OperationKind, QueryParams};

/// One inbound request reduced to what the engine needs.
///
/// Built once per request by a handler and dropped when the response is
/// written; nothing here outlives the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedRequest {
    pub operation: OperationKind,
    /// Path past the mount prefix, slashes preserved.
    pub path: String,
    pub query: QueryParams,
    pub body: Option<String>,
    pub identity: Option<Identity>,
}

impl RoutedRequest {
    pub fn fetch(path: impl Into<String>, query: QueryParams, identity: Option<Identity>) -> Self {
        Self {
            operation: OperationKind::Fetch,
            path: path.into(),
            query,
            body: None,
            identity,
        }
    }

    pub fn create(path: impl Into<String>, body: String, identity: Option<Identity>) -> Self {
        Self {
            operation: OperationKind::Create,
            path: path.into(),
            query: QueryParams::new(),
            body: Some(body),
            identity,
        }
    }

    pub fn update(path: impl Into<String>, body: String, identity: Option<Identity>) -> Self {
        Self {
            operation: OperationKind::Update,
            path: path.into(),
            query: QueryParams::new(),
            body: Some(body),
            identity,
        }
    }

    pub fn delete(
        path: impl Into<String>,
        body: Option<String>,
        identity: Option<Identity>,
    ) -> Self {
        Self {
            operation: OperationKind::Delete,
            path: path.into(),
            query: QueryParams::new(),
            body,
            identity,
        }
    }

    /// Make the single engine call this request maps to.
    pub async fn dispatch(&self, engine: &dyn Engine) -> Result<EngineResponse, EngineError> {
        let identity = self.identity.as_ref();
        let body = self.body.as_deref();
        match self.operation {
            OperationKind::Fetch => engine.fetch(&self.path, &self.query, identity).await,
            OperationKind::Create => {
                engine.create(&self.path, body.unwrap_or_default(), identity).await
            }
            OperationKind::Update => {
                engine
                    .update(
                        JSON_API_MEDIA_TYPE,
                        JSON_API_MEDIA_TYPE,
                        &self.path,
                        body.unwrap_or_default(),
                        identity,
                    )
                    .await
            }
            OperationKind::Delete => engine.delete(&self.path, body, identity).await,
        }
    }
}
