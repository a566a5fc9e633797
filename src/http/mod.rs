//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, path within mount, identity)
//!     → media.rs (406 / 415 negotiation)
//!     → handlers.rs (RoutedRequest → engine)
//!     → response.rs (status + body copied, content type declared)
//!     → Send to client
//! ```

pub mod handlers;
pub mod identity;
pub mod media;
pub mod request;
pub mod response;
pub mod server;

pub use media::JSON_API_MEDIA_TYPE;
pub use request::{RequestId, X_REQUEST_ID};
pub use server::{build_router, AppState, HttpServer};
