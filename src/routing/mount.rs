//! Mount point and path-within-mount extraction.
//!
//! The router registers its wildcard routes under a fixed prefix and keeps
//! that prefix's length. Each request path is sliced by it instead of
//! searching the full URL for the prefix, so a mount at a non-root path or a
//! prefix repeated further down the path cannot confuse extraction.
//!
//! When the router is nested into a host application with `Router::nest`,
//! axum already strips the host's prefix from the URI the handlers see; the
//! slice then applies to what remains.

/// Normalized mount prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPoint {
    /// Empty for the root mount, otherwise "/segment[/segment...]" without a
    /// trailing slash.
    prefix: String,
}

impl MountPoint {
    pub fn new(base_path: &str) -> Self {
        let trimmed = base_path.trim_end_matches('/');
        let prefix = if trimmed.is_empty() || trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{}", trimmed)
        };
        Self { prefix }
    }

    pub fn root() -> Self {
        Self::new("/")
    }

    /// The mount as a path, "/" for the root mount.
    pub fn base_path(&self) -> &str {
        if self.prefix.is_empty() {
            "/"
        } else {
            &self.prefix
        }
    }

    /// Number of leading bytes removed from every routed path.
    pub fn prefix_len(&self) -> usize {
        self.prefix.len()
    }

    /// Route patterns covering the mount itself and everything below it.
    pub fn patterns(&self) -> Vec<String> {
        if self.prefix.is_empty() {
            vec!["/".to_string(), "/{*path}".to_string()]
        } else {
            vec![
                self.prefix.clone(),
                format!("{}/", self.prefix),
                format!("{}/{{*path}}", self.prefix),
            ]
        }
    }

    /// Slice the routed path past the mount prefix.
    ///
    /// Returns `None` when the path does not lie under this mount, which only
    /// happens if the caller hands in a path the routes would not match.
    pub fn path_within<'a>(&self, routed_path: &'a str) -> Option<&'a str> {
        if !routed_path.starts_with(&self.prefix) {
            return None;
        }
        let rest = &routed_path[self.prefix_len()..];
        if rest.is_empty() || rest.starts_with('/') {
            Some(rest)
        } else {
            None
        }
    }
}

impl Default for MountPoint {
    fn default() -> Self {
        Self::root()
    }
}
