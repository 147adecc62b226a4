// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Grid Network Visualizer - Packet Animation
//
// Discrete-step state machine. The caller owns the timer and calls `tick`
// once per period; nothing in here blocks or schedules work.

use log::{info, warn};

use crate::error::NetworkError;
use crate::types::{AnimatorState, Emission, NodeId, Packet, Path, RunId};

/// Drives a single packet along a path, one hop per tick.
#[derive(Debug, Clone)]
pub struct PacketAnimator {
    state: AnimatorState,
    period_ms: u32,
    path: Vec<NodeId>,
    arrivals: Vec<f64>,
    times: Vec<f64>,
    index: usize,
    packet: Option<Packet>,
    run: RunId,
    packet_id_counter: u64,
}

impl PacketAnimator {
    pub fn new(period_ms: u32) -> Self {
        Self {
            state: AnimatorState::Idle,
            period_ms,
            path: Vec::new(),
            arrivals: Vec::new(),
            times: Vec::new(),
            index: 0,
            packet: None,
            run: RunId(0),
            packet_id_counter: 0,
        }
    }

    pub fn state(&self) -> AnimatorState { self.state }

    pub fn packet(&self) -> Option<&Packet> { self.packet.as_ref() }

    /// Nodes of the run in progress; empty when idle.
    pub fn route(&self) -> &[NodeId] { &self.path }

    pub fn period_ms(&self) -> u32 { self.period_ms }

    /// Each tick is due one period after the previous one, not after a fixed
    /// origin, so lateness carries forward.
    pub fn next_deadline(&self, previous_ms: f64) -> f64 {
        previous_ms + f64::from(self.period_ms)
    }

    /// Begin animating `path`, emitting the packet at its first node.
    ///
    /// A run already in progress is cancelled first; its pending ticks become
    /// stale. Paths shorter than two nodes are rejected and leave the current
    /// run untouched.
    pub fn start(&mut self, path: &Path, message: impl Into<String>) -> Result<(RunId, Emission), NetworkError> {
        if path.is_degenerate() {
            return Err(NetworkError::EmptyPath { len: path.len() });
        }
        if self.state == AnimatorState::Running {
            warn!("starting a new packet while run {} is active; cancelling it", self.run.0);
            self.cancel();
        }

        self.run = RunId(self.run.0 + 1);
        let packet = Packet {
            id: self.packet_id_counter,
            source: path.nodes[0].clone(),
            destination: path.nodes[path.len() - 1].clone(),
            message: message.into(),
            hops: 0,
        };
        self.packet_id_counter += 1;

        info!(
            "packet {} started {} -> {} ({} hops)",
            packet.id,
            packet.source,
            packet.destination,
            path.len() - 1
        );

        self.path = path.nodes.clone();
        self.arrivals = path.arrivals.clone();
        self.times = path.times.clone();
        self.index = 0;
        self.state = AnimatorState::Running;
        self.packet = Some(packet);

        let emission = self.emit_current().ok_or(NetworkError::EmptyPath { len: path.len() })?;
        Ok((self.run, emission))
    }

    /// Advance one hop. Returns `None` unless a run is active.
    pub fn tick(&mut self) -> Option<Emission> {
        if self.state != AnimatorState::Running {
            return None;
        }
        self.index += 1;
        if self.index < self.path.len() {
            if let Some(packet) = self.packet.as_mut() {
                packet.hops = self.index;
            }
            return self.emit_current();
        }

        let packet_id = self.packet.take().map(|p| p.id).unwrap_or_default();
        self.state = AnimatorState::Done;
        info!("packet {} delivered", packet_id);
        Some(Emission::Cleared { packet_id })
    }

    /// Like [`tick`](Self::tick), but ignores ticks scheduled for an earlier run.
    pub fn tick_run(&mut self, run: RunId) -> Option<Emission> {
        if run != self.run {
            warn!("ignoring stale tick for run {} (current run {})", run.0, self.run.0);
            return None;
        }
        self.tick()
    }

    /// Stop immediately from any state. Pending ticks for the cancelled run
    /// produce nothing afterwards.
    pub fn cancel(&mut self) {
        if let Some(packet) = self.packet.take() {
            info!("packet {} cancelled at hop {}", packet.id, packet.hops);
        }
        self.state = AnimatorState::Idle;
        self.path.clear();
        self.arrivals.clear();
        self.times.clear();
        self.index = 0;
        // Ticks still scheduled for the cancelled run must never match again.
        self.run = RunId(self.run.0 + 1);
    }

    fn emit_current(&self) -> Option<Emission> {
        let packet = self.packet.as_ref()?;
        Some(Emission::At {
            packet_id: packet.id,
            node: self.path.get(self.index)?.clone(),
            message: packet.message.clone(),
            hops: self.index,
            elapsed_latency: self.arrivals.get(self.index).copied().unwrap_or(0.0),
            elapsed_time: self.times.get(self.index).copied().unwrap_or(0.0),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
