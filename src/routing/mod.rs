//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     EndpointsConfig + MountConfig
//!     → table.rs ({operation, enabled} rows, mount point)
//!     → http/server.rs registers one wildcard route set per mount
//!
//! Incoming Request (method, path, query, body, identity):
//!     → mount.rs (slice path past the mount prefix)
//!     → query.rs (ordered multi-valued query)
//!     → request.rs (RoutedRequest → single engine call)
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Path extraction uses the stored prefix length, never URL substring search
//! - No state shared between requests

pub mod mount;
pub mod operation;
pub mod query;
pub mod request;
pub mod table;

pub use mount::MountPoint;
pub use operation::OperationKind;
pub use query::QueryParams;
pub use request::RoutedRequest;
pub use table::{RouteEntry, RouteTable};
