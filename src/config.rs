//! Client timing configuration.

use std::time::Duration;

/// Timeouts and cadences governing the connection dialogue.
///
/// The defaults are the ISO 11783-6 values; deviating from them is only
/// useful in test rigs and simulators.
#[derive(Clone, Copy, Debug)]
pub struct ClientConfig {
    /// Longest tolerated gap between VT status broadcasts before the
    /// server is presumed offline.
    pub status_timeout: Duration,
    /// Deadline for the server's reply to a bring-up capability query.
    pub response_timeout: Duration,
    /// Interval between working set maintenance heartbeats while
    /// connected.
    pub maintenance_interval: Duration,
    /// Cadence of the spawned worker's update loop.
    pub worker_tick: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            status_timeout: Duration::from_millis(3000),
            response_timeout: Duration::from_millis(6000),
            maintenance_interval: Duration::from_millis(1000),
            worker_tick: Duration::from_millis(10),
        }
    }
}
