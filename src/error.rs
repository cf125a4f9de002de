//! Error types for the VT client.
//!
//! The taxonomy distinguishes admission failures on the send path,
//! object-pool registration problems, and inbound frame decode errors.
//! Connection-level failures (insufficient memory, response timeouts,
//! upload failures) are not errors returned to the caller; they drive the
//! state machine to `Failed` as described in the connection design.

use thiserror::Error;

/// Failures admitting a command to the send path.
///
/// Admission failures never change client state; the caller may retry
/// once the condition clears.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SendError {
    /// The command was attempted while the state machine was not in the
    /// `Connected` state.
    #[error("client is not connected to a VT server")]
    NotConnected,

    /// The network stack refused to queue the frame.
    #[error("transport queue rejected the frame")]
    Rejected,

    /// A variable-length field exceeded what its wire layout can carry.
    #[error("field of {len} bytes exceeds the {max} byte wire limit")]
    FieldTooLong {
        /// Length the caller supplied.
        len: usize,
        /// Maximum the layout permits.
        max: usize,
    },
}

/// Failures registering an object pool.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum PoolError {
    /// A pool's declared version differs from a previously registered pool.
    ///
    /// Every pool registered to one client must declare the same VT
    /// version.
    #[error("pool version differs from previously registered pools")]
    VersionMismatch,

    /// The pool declared a zero total size.
    #[error("pool declared an empty payload")]
    Empty,
}

/// Failures decoding an inbound frame.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// Byte 0 carried a multiplexor outside the taxonomy.
    #[error("unknown function multiplexor {code:#04x}")]
    UnknownFunction {
        /// The unrecognised code.
        code: u8,
    },

    /// The payload was shorter than the function's fixed layout.
    #[error("truncated payload: have {have} bytes, need {need}")]
    Truncated {
        /// Bytes available.
        have: usize,
        /// Bytes the layout requires.
        need: usize,
    },

    /// A field carried a value outside its defined set.
    #[error("invalid value {value:#04x} for field {field}")]
    InvalidField {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: u8,
    },
}
