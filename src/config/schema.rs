//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the JSON:API router.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Where the wildcard endpoints are mounted.
    pub mount: MountConfig,

    /// Per-verb endpoint registration flags.
    pub endpoints: EndpointsConfig,

    /// How the opaque caller identity is lifted off the request.
    pub identity: IdentityConfig,

    /// Upstream JSON:API engine the binary forwards to.
    pub upstream: UpstreamConfig,

    /// Request size limits.
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Mount point for the JSON:API endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MountConfig {
    /// Base path, e.g. "/" or "/api". A trailing slash is ignored.
    pub base_path: String,
}

impl Default for MountConfig {
    fn default() -> Self {
        Self {
            base_path: "/".to_string(),
        }
    }
}

/// Endpoint registration flags, resolved once at startup.
///
/// Every flag defaults to enabled when unset.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EndpointsConfig {
    /// Master switch. When false no endpoint is registered at all.
    pub enable: bool,
    pub enable_fetch: bool,
    pub enable_create: bool,
    pub enable_update: bool,
    pub enable_delete: bool,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            enable: true,
            enable_fetch: true,
            enable_create: true,
            enable_update: true,
            enable_delete: true,
        }
    }
}

/// Identity extraction configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Request header whose raw value becomes the caller identity.
    /// An empty string disables extraction.
    pub header: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            header: "authorization".to_string(),
        }
    }
}

/// Upstream engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the JSON:API backend, e.g. "http://127.0.0.1:9000/".
    pub url: String,

    /// Total time allowed for one upstream exchange, in seconds.
    pub request_timeout_secs: u64,

    /// Header used to hand the caller identity to the backend.
    pub identity_header: String,

    /// Largest backend response body read before the exchange fails, in bytes.
    pub max_response_size: usize,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:9000/".to_string(),
            request_timeout_secs: 30,
            identity_header: "authorization".to_string(),
            max_response_size: 1024 * 1024,
        }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
