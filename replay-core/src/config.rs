//! Replay configuration

use crate::{Error, Result};

/// Configuration consumed by the frame sampler and builder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayConfig {
    /// Interval between query instants in milliseconds
    pub step_ms: i64,
    /// Maximum distance between a query instant and a relay event, exclusive
    pub relay_window_ms: i64,
}

impl ReplayConfig {
    /// Fails if either interval is not positive
    pub fn validate(&self) -> Result<()> {
        if self.step_ms <= 0 {
            return Err(Error::InvalidConfig(format!(
                "step_ms must be positive, got {}",
                self.step_ms
            )));
        }
        if self.relay_window_ms <= 0 {
            return Err(Error::InvalidConfig(format!(
                "relay_window_ms must be positive, got {}",
                self.relay_window_ms
            )));
        }
        Ok(())
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            step_ms: 10_000,
            relay_window_ms: 30_000,
        }
    }
}
