//! Operation kinds and their HTTP verbs.

use std::fmt;

use axum::http::Method;

use crate::config::EndpointsConfig;

/// The four JSON:API operations the router can forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Fetch,
    Create,
    Update,
    Delete,
}

impl OperationKind {
    /// Registration order.
    pub const ALL: [OperationKind; 4] = [
        OperationKind::Fetch,
        OperationKind::Create,
        OperationKind::Update,
        OperationKind::Delete,
    ];

    /// HTTP method the operation is bound to.
    pub fn method(self) -> Method {
        match self {
            OperationKind::Fetch => Method::GET,
            OperationKind::Create => Method::POST,
            OperationKind::Update => Method::PATCH,
            OperationKind::Delete => Method::DELETE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::Fetch => "fetch",
            OperationKind::Create => "create",
            OperationKind::Update => "update",
            OperationKind::Delete => "delete",
        }
    }

    /// Whether the configuration registers this operation. The master
    /// switch overrides every per-operation flag.
    pub fn enabled_in(self, endpoints: &EndpointsConfig) -> bool {
        endpoints.enable
            && match self {
                OperationKind::Fetch => endpoints.enable_fetch,
                OperationKind::Create => endpoints.enable_create,
                OperationKind::Update => endpoints.enable_update,
                OperationKind::Delete => endpoints.enable_delete,
            }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
