//! Startup-time route table.
//!
//! # Responsibilities
//! - Resolve every endpoint flag exactly once
//! - Record the mount point the routes are registered under
//!
//! # Design Decisions
//! - Immutable after construction (shared without locks)
//! - A disabled operation is absent, not rejected: the HTTP framework answers
//!   404/405 for it

use crate::config::{EndpointsConfig, MountConfig};
use crate::routing::{MountPoint, OperationKind};

/// One row of the table: an operation and whether it gets registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteEntry {
    pub operation: OperationKind,
    pub enabled: bool,
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    mount: MountPoint,
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn from_config(mount: &MountConfig, endpoints: &EndpointsConfig) -> Self {
        let entries = OperationKind::ALL
            .iter()
            .map(|&operation| RouteEntry {
                operation,
                enabled: operation.enabled_in(endpoints),
            })
            .collect();

        Self {
            mount: MountPoint::new(&mount.base_path),
            entries,
        }
    }

    pub fn mount(&self) -> &MountPoint {
        &self.mount
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// Operations to register, in table order.
    pub fn enabled(&self) -> impl Iterator<Item = OperationKind> + '_ {
        self.entries
            .iter()
            .filter(|entry| entry.enabled)
            .map(|entry| entry.operation)
    }

    pub fn is_enabled(&self, operation: OperationKind) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.operation == operation && entry.enabled)
    }
}
