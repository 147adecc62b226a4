// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Grid Network Visualizer - Configuration

use serde::{Deserialize, Serialize};

use crate::error::NetworkError;

/// Cells per side of the placement grid.
pub const DEFAULT_GRID_SIZE: u32 = 10;

/// Rendering units between adjacent cell centers.
pub const DEFAULT_SPACING: f64 = 40.0;

/// One hop per second.
pub const DEFAULT_TICK_PERIOD_MS: u32 = 1000;

/// Time a packet waits at a node before leaving, unless the node sets its own.
pub const DEFAULT_PROCESSING_DELAY: f64 = 0.1;

/// Fixed external configuration for a simulator instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub grid_size: u32,
    pub spacing: f64,
    pub tick_period_ms: u32,
    pub processing_delay: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            spacing: DEFAULT_SPACING,
            tick_period_ms: DEFAULT_TICK_PERIOD_MS,
            processing_delay: DEFAULT_PROCESSING_DELAY,
        }
    }
}

impl SimulatorConfig {
    /// Parse and validate. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, NetworkError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| NetworkError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), NetworkError> {
        if self.grid_size == 0 {
            return Err(NetworkError::InvalidConfig("grid_size must be at least 1".into()));
        }
        if !self.spacing.is_finite() || self.spacing <= 0.0 {
            return Err(NetworkError::InvalidConfig(format!(
                "spacing must be positive, got {}",
                self.spacing
            )));
        }
        if self.tick_period_ms == 0 {
            return Err(NetworkError::InvalidConfig("tick_period_ms must be at least 1".into()));
        }
        if !valid_delay(self.processing_delay) {
            return Err(NetworkError::InvalidConfig(format!(
                "processing_delay must be non-negative, got {}",
                self.processing_delay
            )));
        }
        Ok(())
    }
}

/// Processing delays may be zero but never negative or non-finite.
pub(crate) fn valid_delay(delay: f64) -> bool {
    delay >= 0.0 && delay.is_finite()
}
