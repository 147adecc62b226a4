// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Grid Network Visualizer - Type Definitions

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::NetworkError;

// ─── NodeId ─────────────────────────────────────────────────────────────────

/// Unique node identifier chosen by the user.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self { NodeId(s) }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self { NodeId(s.to_string()) }
}

// ─── Grid / Pixel Positions ─────────────────────────────────────────────────

/// Cell of the placement grid. Only constructed through [`GridPosition::new`],
/// so both coordinates are always inside `[0, size)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GridPosition {
    x: u32,
    y: u32,
}

impl GridPosition {
    pub fn new(x: i64, y: i64, size: u32) -> Result<Self, NetworkError> {
        let limit = i64::from(size);
        if !(0..limit).contains(&x) || !(0..limit).contains(&y) {
            return Err(NetworkError::OutOfBounds { x: x as f64, y: y as f64, size });
        }
        Ok(Self { x: x as u32, y: y as u32 })
    }

    /// Accepts coordinates coming from an untyped caller (form input, JS).
    /// Fractional or non-finite values are out of bounds.
    pub fn from_f64(x: f64, y: f64, size: u32) -> Result<Self, NetworkError> {
        let integral = |v: f64| v.is_finite() && v.fract() == 0.0;
        if !integral(x) || !integral(y) {
            return Err(NetworkError::OutOfBounds { x, y, size });
        }
        Self::new(x as i64, y as i64, size)
    }

    pub fn x(&self) -> u32 { self.x }
    pub fn y(&self) -> u32 { self.y }

    /// `pixel = index * spacing + spacing / 2` on both axes.
    pub fn to_pixel(&self, spacing: f64) -> PixelPosition {
        PixelPosition {
            x: self.x as f64 * spacing + spacing / 2.0,
            y: self.y as f64 * spacing + spacing / 2.0,
        }
    }
}

/// Rendering coordinate derived from a [`GridPosition`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PixelPosition {
    pub x: f64,
    pub y: f64,
}

// ─── Node ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: NodeId,
    pub grid: GridPosition,
    pub pixel: PixelPosition,
    /// Time a packet spends at this node before leaving on the next hop.
    pub processing_delay: f64,
}

// ─── Connection ─────────────────────────────────────────────────────────────

/// Stable identity of a connection. Never reused within one store, so
/// removing one connection does not shift the handle of any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(pub u32);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Undirected weighted link. `source`/`target` only record the order the
/// user picked them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub source: NodeId,
    pub target: NodeId,
    pub latency: f64,
}

impl Connection {
    pub fn touches(&self, node: &NodeId) -> bool {
        &self.source == node || &self.target == node
    }

    /// The endpoint opposite `node`, if `node` is an endpoint at all.
    pub fn other_end(&self, node: &NodeId) -> Option<&NodeId> {
        if &self.source == node {
            Some(&self.target)
        } else if &self.target == node {
            Some(&self.source)
        } else {
            None
        }
    }
}

// ─── Path ───────────────────────────────────────────────────────────────────

/// Result of a shortest-path query.
///
/// `arrivals[i]` is the cumulative link latency to reach `nodes[i]`, so the
/// first entry is always 0 and the last is the total cost. `times[i]` adds the
/// processing delay of every node the packet has already left.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Path {
    pub nodes: Vec<NodeId>,
    pub arrivals: Vec<f64>,
    pub times: Vec<f64>,
}

impl Path {
    pub fn len(&self) -> usize { self.nodes.len() }

    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    pub fn cost(&self) -> f64 {
        self.arrivals.last().copied().unwrap_or(0.0)
    }

    /// A single-node path is valid but there is nothing to animate.
    pub fn is_degenerate(&self) -> bool { self.nodes.len() < 2 }
}

// ─── Packet ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Packet {
    pub id: u64,
    pub source: NodeId,
    pub destination: NodeId,
    pub message: String,
    /// Hops taken so far; equals the index into the animated path.
    pub hops: usize,
}

// ─── Animation ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorState {
    Idle,
    Running,
    Done,
}

/// Identifies one `start` of the animator; ticks carrying an older run are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RunId(pub u32);

/// What the renderer should show after a start or tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Emission {
    At {
        packet_id: u64,
        node: NodeId,
        message: String,
        hops: usize,
        elapsed_latency: f64,
        /// Simulated time since departure: latency plus processing delays.
        elapsed_time: f64,
    },
    Cleared { packet_id: u64 },
}

impl Emission {
    pub fn node(&self) -> Option<&NodeId> {
        match self {
            Emission::At { node, .. } => Some(node),
            Emission::Cleared { .. } => None,
        }
    }

    pub fn is_cleared(&self) -> bool {
        matches!(self, Emission::Cleared { .. })
    }
}

/// One line of the hop trace kept by the simulator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HopRecord {
    /// Ticks since the packet started; the start emission is tick 0.
    pub tick: u64,
    pub packet_id: u64,
    pub node: NodeId,
    pub hops: usize,
    pub elapsed_latency: f64,
    pub time: f64,
}
