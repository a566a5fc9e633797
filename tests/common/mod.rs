//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceExt;

use jsonapi_router::config::RouterConfig;
use jsonapi_router::http::build_router;
use jsonapi_router::routing::QueryParams;
use jsonapi_router::{Engine, EngineError, EngineResponse, Identity};

/// One engine call as the engine saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Fetch {
        path: String,
        query: Vec<(String, String)>,
        identity: Option<String>,
    },
    Create {
        path: String,
        body: String,
        identity: Option<String>,
    },
    Update {
        content_type: String,
        accept: String,
        path: String,
        body: String,
        identity: Option<String>,
    },
    Delete {
        path: String,
        body: Option<String>,
        identity: Option<String>,
    },
}

/// Engine that records every call and answers with a fixed response.
pub struct RecordingEngine {
    calls: Mutex<Vec<Call>>,
    response: EngineResponse,
}

impl RecordingEngine {
    pub fn replying(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            response: EngineResponse::new(status, body),
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> Result<EngineResponse, EngineError> {
        self.calls.lock().unwrap().push(call);
        Ok(self.response.clone())
    }
}

fn owned(identity: Option<&Identity>) -> Option<String> {
    identity.map(|i| i.as_str().to_string())
}

#[async_trait]
impl Engine for RecordingEngine {
    async fn fetch(
        &self,
        path: &str,
        query: &QueryParams,
        identity: Option<&Identity>,
    ) -> Result<EngineResponse, EngineError> {
        self.record(Call::Fetch {
            path: path.into(),
            query: query.iter().map(|(k, v)| (k.into(), v.into())).collect(),
            identity: owned(identity),
        })
    }

    async fn create(
        &self,
        path: &str,
        body: &str,
        identity: Option<&Identity>,
    ) -> Result<EngineResponse, EngineError> {
        self.record(Call::Create {
            path: path.into(),
            body: body.into(),
            identity: owned(identity),
        })
    }

    async fn update(
        &self,
        content_type: &str,
        accept: &str,
        path: &str,
        body: &str,
        identity: Option<&Identity>,
    ) -> Result<EngineResponse, EngineError> {
        self.record(Call::Update {
            content_type: content_type.into(),
            accept: accept.into(),
            path: path.into(),
            body: body.into(),
            identity: owned(identity),
        })
    }

    async fn delete(
        &self,
        path: &str,
        body: Option<&str>,
        identity: Option<&Identity>,
    ) -> Result<EngineResponse, EngineError> {
        self.record(Call::Delete {
            path: path.into(),
            body: body.map(Into::into),
            identity: owned(identity),
        })
    }
}

/// Engine whose every call fails.
pub struct FailingEngine;

#[async_trait]
impl Engine for FailingEngine {
    async fn fetch(
        &self,
        _path: &str,
        _query: &QueryParams,
        _identity: Option<&Identity>,
    ) -> Result<EngineResponse, EngineError> {
        Err(EngineError::Internal("datastore offline".into()))
    }

    async fn create(
        &self,
        _path: &str,
        _body: &str,
        _identity: Option<&Identity>,
    ) -> Result<EngineResponse, EngineError> {
        Err(EngineError::Internal("datastore offline".into()))
    }

    async fn update(
        &self,
        _content_type: &str,
        _accept: &str,
        _path: &str,
        _body: &str,
        _identity: Option<&Identity>,
    ) -> Result<EngineResponse, EngineError> {
        Err(EngineError::Internal("datastore offline".into()))
    }

    async fn delete(
        &self,
        _path: &str,
        _body: Option<&str>,
        _identity: Option<&Identity>,
    ) -> Result<EngineResponse, EngineError> {
        Err(EngineError::Internal("datastore offline".into()))
    }
}

pub fn router(config: &RouterConfig, engine: Arc<dyn Engine>) -> Router {
    build_router(config, engine)
}

/// Drive one request through the router in-process.
pub async fn send(router: Router, request: Request) -> (StatusCode, HeaderMap, String) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}

/// A request as received by a mock backend.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: String,
    pub uri: String,
    pub headers: HeaderMap,
    pub body: String,
}

/// Start a programmable mock backend on an ephemeral port.
///
/// Every request is recorded, then answered with whatever `f` returns.
pub async fn start_programmable_backend<F>(f: F) -> (SocketAddr, Arc<Mutex<Vec<SeenRequest>>>)
where
    F: Fn(&SeenRequest) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let recorder = seen.clone();
    let app = Router::new().fallback(move |request: Request| {
        let recorder = recorder.clone();
        let f = f.clone();
        async move {
            let (parts, body) = request.into_parts();
            let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
            let seen = SeenRequest {
                method: parts.method.to_string(),
                uri: parts.uri.to_string(),
                headers: parts.headers,
                body: String::from_utf8(bytes.to_vec()).unwrap(),
            };
            let (status, reply) = f(&seen);
            recorder.lock().unwrap().push(seen);
            (StatusCode::from_u16(status).unwrap(), Body::from(reply)).into_response()
        }
    });

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, seen)
}
