//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router from the startup route table
//! - Wire up middleware (tracing, request ID, identity, body limit)
//! - Bind server to listener and drain on shutdown

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderName,
    middleware,
    routing::{delete, get, patch, post, MethodRouter},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::RouterConfig;
use crate::engine::Engine;
use crate::http::handlers::{handle_create, handle_delete, handle_fetch, handle_update};
use crate::http::identity::attach_identity;
use crate::http::media::negotiate;
use crate::http::request::{propagate_request_id_layer, request_span, set_request_id_layer};
use crate::routing::{MountPoint, OperationKind, RouteTable};

/// Application state injected into handlers.
///
/// Read-only: the engine is shared by every request as a call target.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<dyn Engine>,
    pub mount: MountPoint,
}

/// HTTP server for the JSON:API router.
pub struct HttpServer {
    router: Router,
    config: RouterConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and engine.
    pub fn new(config: RouterConfig, engine: Arc<dyn Engine>) -> Self {
        let router = build_router(&config, engine);
        Self { router, config }
    }

    /// The assembled router, e.g. for nesting into a larger application.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            base_path = %self.config.mount.base_path,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(config: &RouterConfig, engine: Arc<dyn Engine>) -> Router {
    let table = RouteTable::from_config(&config.mount, &config.endpoints);
    let state = AppState {
        engine,
        mount: table.mount().clone(),
    };

    let mut router = Router::new();
    match method_router(&table) {
        Some(methods) => {
            for pattern in table.mount().patterns() {
                router = router.route(&pattern, methods.clone());
            }
            tracing::info!(
                base_path = %table.mount().base_path(),
                operations = ?table.enabled().collect::<Vec<_>>(),
                "JSON:API endpoints registered"
            );
        }
        None => tracing::warn!("All JSON:API endpoints disabled"),
    }

    let mut router = router
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.security.max_body_size));

    if !config.identity.header.is_empty() {
        match HeaderName::from_bytes(config.identity.header.as_bytes()) {
            Ok(header) => {
                router = router.layer(middleware::from_fn_with_state(header, attach_identity));
            }
            Err(e) => tracing::error!(
                header = %config.identity.header,
                error = %e,
                "Invalid identity header, identity extraction disabled"
            ),
        }
    }

    router
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(set_request_id_layer())
}

/// One method router carrying every enabled operation, or `None` when the
/// table enables nothing.
fn method_router(table: &RouteTable) -> Option<MethodRouter<AppState>> {
    let methods = table
        .enabled()
        .map(|operation| match operation {
            OperationKind::Fetch => get(handle_fetch),
            OperationKind::Create => post(handle_create),
            OperationKind::Update => patch(handle_update),
            OperationKind::Delete => delete(handle_delete),
        })
        .reduce(MethodRouter::merge)?;

    Some(methods.route_layer(middleware::from_fn(negotiate)))
}
