//! Metric helpers for `vtlink`.
//!
//! Metric names and helper functions wrapping the
//! [`metrics`](https://docs.rs/metrics) crate. All functions become
//! no-ops if the optional `metrics` Cargo feature is disabled.

#[cfg(feature = "metrics")]
use metrics::counter;

/// Name of the counter tracking processed inbound deliveries.
pub const FRAMES_PROCESSED: &str = "vtlink_frames_processed_total";
/// Name of the counter tracking commands admitted to the send path.
pub const COMMANDS_SENT: &str = "vtlink_commands_sent_total";
/// Name of the counter tracking commands rejected before the wire.
pub const COMMANDS_REJECTED: &str = "vtlink_commands_rejected_total";
/// Name of the counter tracking events fanned out to subscribers.
pub const EVENTS_DISPATCHED: &str = "vtlink_events_dispatched_total";

/// Record a processed inbound delivery.
#[cfg(feature = "metrics")]
pub fn inc_frames() { counter!(FRAMES_PROCESSED).increment(1); }

#[cfg(not(feature = "metrics"))]
#[allow(missing_docs)]
pub fn inc_frames() {}

/// Record a command admitted to the send path.
#[cfg(feature = "metrics")]
pub fn inc_commands_sent() { counter!(COMMANDS_SENT).increment(1); }

#[cfg(not(feature = "metrics"))]
#[allow(missing_docs)]
pub fn inc_commands_sent() {}

/// Record a command rejected before reaching the wire.
///
/// `reason` is `"not_connected"` or `"queue_full"`.
#[cfg(feature = "metrics")]
pub fn inc_commands_rejected(reason: &'static str) {
    counter!(COMMANDS_REJECTED, "reason" => reason).increment(1);
}

#[cfg(not(feature = "metrics"))]
#[allow(missing_docs)]
pub fn inc_commands_rejected(_reason: &'static str) {}

/// Record events fanned out to subscribers.
#[cfg(feature = "metrics")]
pub fn inc_events_dispatched(count: u64) { counter!(EVENTS_DISPATCHED).increment(count); }

#[cfg(not(feature = "metrics"))]
#[allow(missing_docs)]
pub fn inc_events_dispatched(_count: u64) {}
