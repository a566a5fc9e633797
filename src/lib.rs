//! JSON:API verb router.
//!
//! Binds GET/POST/PATCH/DELETE under a mount point and forwards every request
//! to a JSON:API [`Engine`](engine::Engine), echoing its status and body back.

pub mod config;
pub mod engine;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::RouterConfig;
pub use engine::{Engine, EngineError, EngineResponse, Identity};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
