//! Router configuration, outcomes and cancellation

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::types::PixelPoint;

/// A* parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Pixels per search node along each axis (1 = full resolution)
    ///
    /// Coarser strides search much faster on large plans but can miss
    /// passages narrower than one node.
    pub stride: u32,

    /// Node expansions before the search gives up
    pub max_expanded_nodes: usize,

    /// 8-connected moves instead of 4-connected
    pub allow_diagonal: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            stride: 4,
            max_expanded_nodes: 2_000_000,
            allow_diagonal: true,
        }
    }
}

/// How a search ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    Found,
    /// Start pixel out of bounds or not walkable
    StartBlocked,
    /// End pixel out of bounds or not walkable
    EndBlocked,
    /// Frontier exhausted without reaching the end
    Unreachable,
    /// Expansion cap hit before reaching the end
    ExpansionLimit,
    Cancelled,
}

/// Result of a route search with statistics
#[derive(Debug, Clone, PartialEq)]
pub struct RouteOutcome {
    /// Waypoints from start to end inclusive; `None` unless `status == Found`
    pub path: Option<Vec<PixelPoint>>,
    pub nodes_expanded: usize,
    pub status: SearchStatus,
}

impl RouteOutcome {
    pub(crate) fn failed(status: SearchStatus, nodes_expanded: usize) -> Self {
        Self {
            path: None,
            nodes_expanded,
            status,
        }
    }

    pub(crate) fn found(path: Vec<PixelPoint>, nodes_expanded: usize) -> Self {
        Self {
            path: Some(path),
            nodes_expanded,
            status: SearchStatus::Found,
        }
    }

    pub fn is_found(&self) -> bool {
        self.status == SearchStatus::Found
    }

    pub fn into_path(self) -> Option<Vec<PixelPoint>> {
        self.path
    }
}

/// Shared flag a caller sets to abandon a running search
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_is_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_router_defaults() {
        let config = RouterConfig::default();
        assert_eq!(config.stride, 4);
        assert_eq!(config.max_expanded_nodes, 2_000_000);
        assert!(config.allow_diagonal);
    }
}
