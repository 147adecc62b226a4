// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Grid Network Visualizer - Errors

use crate::types::{ConnectionId, NodeId};

/// Validation failures surfaced to the caller. A request that fails leaves
/// every piece of simulator state untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NetworkError {
    #[error("node {0} already exists")]
    DuplicateNode(NodeId),
    #[error("coordinates ({x}, {y}) must be integers in [0, {size})")]
    OutOfBounds { x: f64, y: f64, size: u32 },
    #[error("node {0} not found")]
    NodeNotFound(NodeId),
    #[error("connection {0} not found")]
    ConnectionNotFound(ConnectionId),
    #[error("connection index {index} out of range ({len} connections)")]
    ConnectionIndexOutOfRange { index: usize, len: usize },
    #[error("cannot connect node {0} to itself")]
    SelfLoop(NodeId),
    #[error("latency must be a positive number, got {0}")]
    InvalidWeight(f64),
    #[error("processing delay must be a non-negative number, got {0}")]
    InvalidDelay(f64),
    #[error("path of length {len} has nothing to simulate")]
    EmptyPath { len: usize },
    #[error("no path found between {from} and {to}")]
    NoPathFound { from: NodeId, to: NodeId },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl NetworkError {
    /// Node, connection-id and connection-index lookups all count as "not found".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NodeNotFound(_)
                | Self::ConnectionNotFound(_)
                | Self::ConnectionIndexOutOfRange { .. }
        )
    }
}
