// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Grid Network Visualizer - Simulator Core

use log::{debug, warn};
use wasm_bindgen::prelude::*;

use crate::animator::PacketAnimator;
use crate::config::SimulatorConfig;
use crate::error::NetworkError;
use crate::graph::GraphStore;
use crate::pathfinder;
use crate::types::*;

// ─── NetworkSimulator struct ─────────────────────────────────────────────────

/// Everything the renderer talks to: the graph, the last computed path, the
/// packet animator and the hop trace.
///
/// Any successful graph mutation drops the current path; the caller has to
/// run [`find_path`](Self::find_path) again before simulating. A removal that
/// breaks the route of a running packet also cancels the animation.
///
/// The trace holds the hops of the most recent packet only.
#[wasm_bindgen]
pub struct NetworkSimulator {
    pub(crate) config: SimulatorConfig,
    pub(crate) graph: GraphStore,
    pub(crate) current_path: Option<Path>,
    pub(crate) animator: PacketAnimator,
    pub(crate) trace: Vec<HopRecord>,
    pub(crate) tick_count: u64,
}

impl Default for NetworkSimulator {
    fn default() -> Self {
        Self::build(SimulatorConfig::default())
    }
}

// ─── Internal Logic (Testable, pure Rust) ────────────────────────────────────

impl NetworkSimulator {
    pub fn with_config(config: SimulatorConfig) -> Result<Self, NetworkError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: SimulatorConfig) -> Self {
        Self {
            graph: GraphStore::new(&config),
            animator: PacketAnimator::new(config.tick_period_ms),
            config,
            current_path: None,
            trace: Vec::new(),
            tick_count: 0,
        }
    }

    pub fn config(&self) -> &SimulatorConfig { &self.config }

    pub fn graph(&self) -> &GraphStore { &self.graph }

    // ─── Graph edits ────────────────────────────────────────────────────────

    pub fn add_node(&mut self, id: impl Into<NodeId>, x: i64, y: i64) -> Result<Node, NetworkError> {
        let node = self.graph.add_node(id, x, y)?.clone();
        self.invalidate_path();
        Ok(node)
    }

    pub fn add_node_f64(&mut self, id: impl Into<NodeId>, x: f64, y: f64) -> Result<Node, NetworkError> {
        let node = self.graph.add_node_f64(id, x, y)?.clone();
        self.invalidate_path();
        Ok(node)
    }

    pub fn add_node_with_delay(
        &mut self,
        id: impl Into<NodeId>,
        x: f64,
        y: f64,
        delay: f64,
    ) -> Result<Node, NetworkError> {
        let node = self.graph.add_node_with_delay(id, x, y, delay)?.clone();
        self.invalidate_path();
        Ok(node)
    }

    pub fn remove_node(&mut self, id: &NodeId) -> Result<Node, NetworkError> {
        let (node, _) = self.graph.remove_node(id)?;
        self.invalidate_path();
        self.drop_stranded_packet();
        Ok(node)
    }

    pub fn add_connection(
        &mut self,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        latency: f64,
    ) -> Result<ConnectionId, NetworkError> {
        let id = self.graph.add_connection(source, target, latency)?;
        self.invalidate_path();
        Ok(id)
    }

    pub fn remove_connection(&mut self, id: ConnectionId) -> Result<Connection, NetworkError> {
        let removed = self.graph.remove_connection(id)?;
        self.invalidate_path();
        self.drop_stranded_packet();
        Ok(removed)
    }

    pub fn remove_connection_at(&mut self, index: usize) -> Result<Connection, NetworkError> {
        let removed = self.graph.remove_connection_at(index)?;
        self.invalidate_path();
        self.drop_stranded_packet();
        Ok(removed)
    }

    /// Cancel the running packet if its route no longer exists in the graph,
    /// so no tick ever emits a removed node.
    fn drop_stranded_packet(&mut self) {
        if self.animator.state() != AnimatorState::Running {
            return;
        }
        if let Err(err) = self.graph.path_cost(self.animator.route()) {
            warn!("cancelling running packet: {}", err);
            self.animator.cancel();
        }
    }

    // ─── Queries ────────────────────────────────────────────────────────────

    pub fn nodes(&self) -> Vec<Node> {
        self.graph.nodes().cloned().collect()
    }

    pub fn connections(&self) -> &[Connection] {
        self.graph.connections()
    }

    pub fn neighbors(&self, id: &NodeId) -> Result<Vec<(NodeId, f64)>, NetworkError> {
        self.graph.neighbors(id)
    }

    /// Compute and remember the shortest path. A failed query also forgets
    /// the previous path.
    pub fn find_path(&mut self, start: &NodeId, end: &NodeId) -> Result<Path, NetworkError> {
        self.current_path = None;
        let path = pathfinder::shortest_path(&self.graph, start, end)?;
        self.current_path = Some(path.clone());
        Ok(path)
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_ref()
    }

    pub fn invalidate_path(&mut self) {
        if self.current_path.take().is_some() {
            debug!("graph changed, current path dropped");
        }
    }

    // ─── Animation ──────────────────────────────────────────────────────────

    /// Animate a packet along the current path. Without a path, or with a
    /// single-node one, this fails with `EmptyPath`. The trace restarts with
    /// the new packet at tick 0.
    pub fn simulate(&mut self, message: impl Into<String>) -> Result<(RunId, Emission), NetworkError> {
        let path = self
            .current_path
            .as_ref()
            .ok_or(NetworkError::EmptyPath { len: 0 })?;
        let (run, emission) = self.animator.start(path, message)?;
        self.trace.clear();
        self.tick_count = 0;
        self.record(&emission);
        Ok((run, emission))
    }

    pub fn tick(&mut self) -> Option<Emission> {
        let emission = self.animator.tick()?;
        self.tick_count += 1;
        self.record(&emission);
        Some(emission)
    }

    pub fn tick_run(&mut self, run: RunId) -> Option<Emission> {
        let emission = self.animator.tick_run(run)?;
        self.tick_count += 1;
        self.record(&emission);
        Some(emission)
    }

    pub fn cancel(&mut self) {
        self.animator.cancel();
    }

    pub fn animator(&self) -> &PacketAnimator { &self.animator }

    pub fn trace(&self) -> &[HopRecord] { &self.trace }

    pub fn clear_trace(&mut self) {
        self.trace.clear();
    }

    /// Empty graph, no path, idle animator, empty trace; config is kept.
    pub fn reset(&mut self) {
        *self = Self::build(self.config.clone());
    }

    fn record(&mut self, emission: &Emission) {
        if let Emission::At { packet_id, node, hops, elapsed_latency, elapsed_time, .. } = emission {
            self.trace.push(HopRecord {
                tick: self.tick_count,
                packet_id: *packet_id,
                node: node.clone(),
                hops: *hops,
                elapsed_latency: *elapsed_latency,
                time: *elapsed_time,
            });
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    fn triangle() -> NetworkSimulator {
        let mut sim = NetworkSimulator::default();
        sim.add_node("A", 0, 0).unwrap();
        sim.add_node("B", 1, 0).unwrap();
        sim.add_node("C", 2, 0).unwrap();
        sim.add_connection("A", "B", 2.0).unwrap();
        sim.add_connection("B", "C", 3.0).unwrap();
        sim.add_connection("A", "C", 10.0).unwrap();
        sim
    }

    #[test]
    fn mutation_drops_current_path() {
        let mut sim = triangle();
        sim.find_path(&id("A"), &id("C")).unwrap();
        assert!(sim.current_path().is_some());
        sim.add_node("D", 4, 4).unwrap();
        assert!(sim.current_path().is_none());
    }

    #[test]
    fn failed_mutation_keeps_current_path() {
        let mut sim = triangle();
        sim.find_path(&id("A"), &id("C")).unwrap();
        assert!(sim.add_node("A", 4, 4).is_err());
        assert!(sim.current_path().is_some());
    }

    #[test]
    fn simulate_requires_a_path() {
        let mut sim = triangle();
        assert_eq!(sim.simulate("hi").unwrap_err(), NetworkError::EmptyPath { len: 0 });
        sim.find_path(&id("B"), &id("B")).unwrap();
        assert_eq!(sim.simulate("hi").unwrap_err(), NetworkError::EmptyPath { len: 1 });
    }

    #[test]
    fn trace_records_every_position() {
        let mut sim = triangle();
        sim.find_path(&id("A"), &id("C")).unwrap();
        sim.simulate("ping").unwrap();
        while sim.tick().is_some() {}

        let nodes: Vec<_> = sim.trace().iter().map(|r| r.node.clone()).collect();
        assert_eq!(nodes, vec![id("A"), id("B"), id("C")]);
        let ticks: Vec<_> = sim.trace().iter().map(|r| r.tick).collect();
        assert_eq!(ticks, vec![0, 1, 2]);
        assert_eq!(sim.trace()[2].elapsed_latency, 5.0);
        assert!((sim.trace()[2].time - 5.2).abs() < 1e-9);
    }

    #[test]
    fn restart_begins_a_fresh_trace() {
        let mut sim = triangle();
        sim.find_path(&id("A"), &id("C")).unwrap();
        sim.simulate("first").unwrap();
        sim.tick();
        let (_, emission) = sim.simulate("second").unwrap();
        sim.tick();

        let ticks: Vec<_> = sim.trace().iter().map(|r| (r.tick, r.hops)).collect();
        assert_eq!(ticks, vec![(0, 0), (1, 1)]);
        if let Emission::At { packet_id, .. } = emission {
            assert!(sim.trace().iter().all(|r| r.packet_id == packet_id));
        }
    }

    #[test]
    fn removing_an_unrelated_node_keeps_the_packet_moving() {
        let mut sim = triangle();
        sim.add_node("D", 5, 5).unwrap();
        sim.find_path(&id("A"), &id("C")).unwrap();
        sim.simulate("m").unwrap();
        sim.remove_node(&id("D")).unwrap();
        assert_eq!(sim.animator().state(), AnimatorState::Running);
        assert_eq!(sim.tick().and_then(|e| e.node().cloned()), Some(id("B")));
    }

    #[test]
    fn removing_a_used_connection_cancels_the_packet() {
        let mut sim = triangle();
        sim.find_path(&id("A"), &id("C")).unwrap();
        sim.simulate("m").unwrap();
        let bc = sim.connections()[1].id;
        sim.remove_connection(bc).unwrap();
        assert_eq!(sim.animator().state(), AnimatorState::Idle);
        assert_eq!(sim.tick(), None);
    }

    #[test]
    fn with_config_validates() {
        let bad = SimulatorConfig { grid_size: 0, ..Default::default() };
        assert!(matches!(NetworkSimulator::with_config(bad), Err(NetworkError::InvalidConfig(_))));
        let bad = SimulatorConfig { processing_delay: -1.0, ..Default::default() };
        assert!(NetworkSimulator::with_config(bad).is_err());
    }

    #[test]
    fn reset_keeps_config() {
        let config = SimulatorConfig { grid_size: 4, ..Default::default() };
        let mut sim = NetworkSimulator::with_config(config.clone()).expect("test: valid config");
        sim.add_node("A", 3, 3).unwrap();
        sim.reset();
        assert!(sim.nodes().is_empty());
        assert_eq!(sim.config(), &config);
        assert!(sim.add_node("A", 4, 0).is_err());
    }
}
