//! Configuration for the inventory client and the sync controller.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Inventory service connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Base URL of the service, e.g. `http://192.168.1.10:5000`.
    pub base_url: String,
    /// Per-request timeout (seconds).
    pub request_timeout_secs: u64,
    /// User-Agent header sent with each request.
    pub user_agent: String,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            request_timeout_secs: 30,
            user_agent: format!("plantlux/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl InventoryConfig {
    /// Returns the request timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Controller settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Capacity of the operation queue.
    pub queue_depth: usize,
    /// Upper bound for one remote call (ms). `0` disables the bound.
    pub operation_timeout_ms: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            queue_depth: 32,
            operation_timeout_ms: 30_000,
        }
    }
}

impl ControllerConfig {
    /// Returns the operation timeout, if one is set.
    pub fn operation_timeout(&self) -> Option<Duration> {
        (self.operation_timeout_ms > 0).then(|| Duration::from_millis(self.operation_timeout_ms))
    }
}
