// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Grid Network Visualizer - Graph Store

use std::collections::{BTreeMap, HashMap};

use log::debug;

use crate::config::{valid_delay, SimulatorConfig};
use crate::error::NetworkError;
use crate::types::{Connection, ConnectionId, GridPosition, Node, NodeId};

/// Nodes on the placement grid plus the undirected weighted connections
/// between them. Source of truth for every path query.
///
/// Nodes are keyed by id in a `BTreeMap`, so iteration order (and with it
/// tie-breaking in the path finder) is by id. Connections keep insertion
/// order and are addressed by a [`ConnectionId`] that is never reused.
#[derive(Debug, Clone)]
pub struct GraphStore {
    grid_size: u32,
    spacing: f64,
    default_delay: f64,
    nodes: BTreeMap<NodeId, Node>,
    connections: Vec<Connection>,
    next_connection_id: u32,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new(&SimulatorConfig::default())
    }
}

impl GraphStore {
    pub fn new(config: &SimulatorConfig) -> Self {
        Self {
            grid_size: config.grid_size,
            spacing: config.spacing,
            default_delay: config.processing_delay,
            nodes: BTreeMap::new(),
            connections: Vec::new(),
            next_connection_id: 0,
        }
    }

    // ─── Nodes ──────────────────────────────────────────────────────────────

    /// Adds a node with the configured default processing delay.
    pub fn add_node(&mut self, id: impl Into<NodeId>, x: i64, y: i64) -> Result<&Node, NetworkError> {
        let id = id.into();
        let grid = GridPosition::new(x, y, self.grid_size)?;
        self.insert_node(id, grid, self.default_delay)
    }

    /// Same as [`add_node`](Self::add_node) for untyped (possibly fractional) coordinates.
    pub fn add_node_f64(&mut self, id: impl Into<NodeId>, x: f64, y: f64) -> Result<&Node, NetworkError> {
        let id = id.into();
        let grid = GridPosition::from_f64(x, y, self.grid_size)?;
        self.insert_node(id, grid, self.default_delay)
    }

    /// Adds a node that holds packets for `delay` instead of the default.
    pub fn add_node_with_delay(
        &mut self,
        id: impl Into<NodeId>,
        x: f64,
        y: f64,
        delay: f64,
    ) -> Result<&Node, NetworkError> {
        let id = id.into();
        let grid = GridPosition::from_f64(x, y, self.grid_size)?;
        self.insert_node(id, grid, delay)
    }

    fn insert_node(&mut self, id: NodeId, grid: GridPosition, delay: f64) -> Result<&Node, NetworkError> {
        if self.nodes.contains_key(&id) {
            return Err(NetworkError::DuplicateNode(id));
        }
        if !valid_delay(delay) {
            return Err(NetworkError::InvalidDelay(delay));
        }
        let node = Node {
            id: id.clone(),
            grid,
            pixel: grid.to_pixel(self.spacing),
            processing_delay: delay,
        };
        debug!("add node {} at ({}, {}) delay {}", id, grid.x(), grid.y(), delay);
        Ok(self.nodes.entry(id).or_insert(node))
    }

    /// Removes the node together with every connection that touches it.
    /// Returns the removed node and the removed connections.
    pub fn remove_node(&mut self, id: &NodeId) -> Result<(Node, Vec<Connection>), NetworkError> {
        let node = self
            .nodes
            .remove(id)
            .ok_or_else(|| NetworkError::NodeNotFound(id.clone()))?;
        let (dropped, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.connections)
            .into_iter()
            .partition(|c| c.touches(id));
        self.connections = kept;
        debug!("remove node {} ({} incident connections)", id, dropped.len());
        Ok((node, dropped))
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }

    // ─── Connections ────────────────────────────────────────────────────────

    /// Parallel connections between the same pair are kept as separate entries.
    pub fn add_connection(
        &mut self,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        latency: f64,
    ) -> Result<ConnectionId, NetworkError> {
        let source = source.into();
        let target = target.into();
        for end in [&source, &target] {
            if !self.nodes.contains_key(end) {
                return Err(NetworkError::NodeNotFound(end.clone()));
            }
        }
        if source == target {
            return Err(NetworkError::SelfLoop(source));
        }
        // NaN fails the comparison, so test for the accepted range.
        if !(latency > 0.0 && latency.is_finite()) {
            return Err(NetworkError::InvalidWeight(latency));
        }

        let id = ConnectionId(self.next_connection_id);
        self.next_connection_id += 1;
        debug!("add connection {} {} <-> {} latency {}", id, source, target, latency);
        self.connections.push(Connection { id, source, target, latency });
        Ok(id)
    }

    pub fn remove_connection(&mut self, id: ConnectionId) -> Result<Connection, NetworkError> {
        let index = self
            .connections
            .iter()
            .position(|c| c.id == id)
            .ok_or(NetworkError::ConnectionNotFound(id))?;
        debug!("remove connection {}", id);
        Ok(self.connections.remove(index))
    }

    /// Positional removal, matching a list view of [`connections`](Self::connections).
    pub fn remove_connection_at(&mut self, index: usize) -> Result<Connection, NetworkError> {
        if index >= self.connections.len() {
            return Err(NetworkError::ConnectionIndexOutOfRange {
                index,
                len: self.connections.len(),
            });
        }
        let removed = self.connections.remove(index);
        debug!("remove connection {} at index {}", removed.id, index);
        Ok(removed)
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == id)
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Every (neighbor, latency) pair visible from `id`; one entry per
    /// connection, so parallel connections show up more than once.
    pub fn neighbors(&self, id: &NodeId) -> Result<Vec<(NodeId, f64)>, NetworkError> {
        if !self.nodes.contains_key(id) {
            return Err(NetworkError::NodeNotFound(id.clone()));
        }
        Ok(self
            .connections
            .iter()
            .filter_map(|c| c.other_end(id).map(|n| (n.clone(), c.latency)))
            .collect())
    }

    /// Adjacency list for every node, built in a single pass over the connections.
    pub fn adjacency(&self) -> HashMap<&NodeId, Vec<(&NodeId, f64)>> {
        let mut adj: HashMap<&NodeId, Vec<(&NodeId, f64)>> =
            self.nodes.keys().map(|id| (id, Vec::new())).collect();
        for c in &self.connections {
            if let Some(list) = adj.get_mut(&c.source) {
                list.push((&c.target, c.latency));
            }
            if let Some(list) = adj.get_mut(&c.target) {
                list.push((&c.source, c.latency));
            }
        }
        adj
    }

    /// Total latency along `hops`, taking the cheapest parallel connection for
    /// each consecutive pair.
    pub fn path_cost(&self, hops: &[NodeId]) -> Result<f64, NetworkError> {
        for id in hops {
            if !self.nodes.contains_key(id) {
                return Err(NetworkError::NodeNotFound(id.clone()));
            }
        }
        let mut total = 0.0;
        for pair in hops.windows(2) {
            let cheapest = self
                .connections
                .iter()
                .filter(|c| c.other_end(&pair[0]) == Some(&pair[1]))
                .map(|c| c.latency)
                .fold(f64::INFINITY, f64::min);
            if cheapest.is_infinite() {
                return Err(NetworkError::NoPathFound {
                    from: pair[0].clone(),
                    to: pair[1].clone(),
                });
            }
            total += cheapest;
        }
        Ok(total)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
