// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Grid Network Visualizer - shortest-path routing and packet animation core

pub mod types;
pub mod config;
pub mod error;
pub mod graph;
pub mod pathfinder;
pub mod animator;
pub mod simulator;

pub use types::*;
pub use config::SimulatorConfig;
pub use error::NetworkError;
pub use graph::GraphStore;
pub use animator::PacketAnimator;
pub use simulator::NetworkSimulator;

use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Route `log` output to the browser console and surface panics there.
/// Does nothing on native targets.
pub fn init_logging() {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Debug);
        log::info!("logging initialized");
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsError::new(&e.to_string()))
}

// ─── WASM Interface ──────────────────────────────────────────────────────────

#[wasm_bindgen]
impl NetworkSimulator {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        init_logging();
        Self::default()
    }

    /// Build from a JSON config; unspecified fields keep their defaults.
    #[wasm_bindgen(js_name = withConfigJson)]
    pub fn with_config_json(json: &str) -> Result<NetworkSimulator, JsError> {
        init_logging();
        Ok(Self::with_config(SimulatorConfig::from_json(json)?)?)
    }

    #[wasm_bindgen(js_name = addNode)]
    pub fn js_add_node(&mut self, id: &str, x: f64, y: f64) -> Result<JsValue, JsError> {
        let node = self.add_node_f64(id, x, y)?;
        to_js(&node)
    }

    /// Like `addNode`, with a per-node processing delay instead of the default.
    #[wasm_bindgen(js_name = addNodeWithDelay)]
    pub fn js_add_node_with_delay(&mut self, id: &str, x: f64, y: f64, delay: f64) -> Result<JsValue, JsError> {
        let node = self.add_node_with_delay(id, x, y, delay)?;
        to_js(&node)
    }

    #[wasm_bindgen(js_name = removeNode)]
    pub fn js_remove_node(&mut self, id: &str) -> Result<(), JsError> {
        self.remove_node(&NodeId::from(id))?;
        Ok(())
    }

    /// Returns the new connection's id, the same number `getConnections` reports.
    #[wasm_bindgen(js_name = addConnection)]
    pub fn js_add_connection(&mut self, source: &str, target: &str, latency: f64) -> Result<u32, JsError> {
        Ok(self.add_connection(source, target, latency)?.0)
    }

    #[wasm_bindgen(js_name = removeConnection)]
    pub fn js_remove_connection(&mut self, id: u32) -> Result<(), JsError> {
        self.remove_connection(ConnectionId(id))?;
        Ok(())
    }

    #[wasm_bindgen(js_name = removeConnectionAt)]
    pub fn js_remove_connection_at(&mut self, index: usize) -> Result<(), JsError> {
        self.remove_connection_at(index)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = getNodes)]
    pub fn js_nodes(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.nodes()).unwrap_or(JsValue::NULL)
    }

    #[wasm_bindgen(js_name = getConnections)]
    pub fn js_connections(&self) -> JsValue {
        serde_wasm_bindgen::to_value(self.connections()).unwrap_or(JsValue::NULL)
    }

    #[wasm_bindgen(js_name = findPath)]
    pub fn js_find_path(&mut self, start: &str, end: &str) -> Result<JsValue, JsError> {
        let path = self.find_path(&NodeId::from(start), &NodeId::from(end))?;
        to_js(&path)
    }

    #[wasm_bindgen(js_name = routingTable)]
    pub fn js_routing_table(&self, source: &str) -> Result<JsValue, JsError> {
        let table = pathfinder::routing_table(&self.graph, &NodeId::from(source))?;
        to_js(&table)
    }

    /// Starts the packet and returns `{ run, emission }`. Pass `run` back to
    /// `tickRun` from the timer callback.
    #[wasm_bindgen(js_name = simulate)]
    pub fn js_simulate(&mut self, message: &str) -> Result<JsValue, JsError> {
        #[derive(Serialize)]
        struct Started {
            run: RunId,
            emission: Emission,
        }
        let (run, emission) = self.simulate(message)?;
        to_js(&Started { run, emission })
    }

    /// `null` when nothing is running.
    #[wasm_bindgen(js_name = tick)]
    pub fn js_tick(&mut self) -> JsValue {
        match self.tick() {
            Some(emission) => serde_wasm_bindgen::to_value(&emission).unwrap_or(JsValue::NULL),
            None => JsValue::NULL,
        }
    }

    #[wasm_bindgen(js_name = tickRun)]
    pub fn js_tick_run(&mut self, run: u32) -> JsValue {
        match self.tick_run(RunId(run)) {
            Some(emission) => serde_wasm_bindgen::to_value(&emission).unwrap_or(JsValue::NULL),
            None => JsValue::NULL,
        }
    }

    #[wasm_bindgen(js_name = cancel)]
    pub fn js_cancel(&mut self) {
        self.cancel();
    }

    #[wasm_bindgen(js_name = tickPeriodMs)]
    pub fn js_tick_period_ms(&self) -> u32 {
        self.animator.period_ms()
    }

    #[wasm_bindgen(js_name = getTrace)]
    pub fn js_trace(&self) -> JsValue {
        serde_wasm_bindgen::to_value(self.trace()).unwrap_or(JsValue::NULL)
    }

    #[wasm_bindgen(js_name = reset)]
    pub fn js_reset(&mut self) {
        self.reset();
    }
}
