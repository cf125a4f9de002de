//! Connection state machine states.

use derive_more::Display;

/// The states of the client connection state machine.
///
/// Bring-up walks the states in declaration order: each `Send*` state
/// transmits one request and its `Wait*Response` partner consumes the
/// server's reply. `Connected` is the steady state; `Failed` is terminal
/// until the client is re-initialized.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not connected and not attempting to connect.
    Disconnected,
    /// Initialized, waiting for a VT server status broadcast.
    WaitForPartnerVtStatus,
    /// Announcing the working set master.
    SendWorkingSetMaster,
    /// Waiting for at least one object pool before continuing.
    ReadyForObjectPool,
    /// Sending the get-memory query.
    SendGetMemory,
    /// Awaiting the get-memory response.
    WaitGetMemoryResponse,
    /// Sending the get-number-of-softkeys query.
    SendGetNumberSoftkeys,
    /// Awaiting the softkey geometry response.
    WaitGetNumberSoftkeysResponse,
    /// Sending the get-text-font-data query.
    SendGetTextFontData,
    /// Awaiting the font capability response.
    WaitGetTextFontDataResponse,
    /// Sending the get-hardware query.
    SendGetHardware,
    /// Awaiting the hardware capability response.
    WaitGetHardwareResponse,
    /// Streaming registered object pools to the server.
    UploadObjectPool,
    /// Sending the end-of-object-pool sentinel.
    SendEndOfObjectPool,
    /// Awaiting the end-of-object-pool response.
    WaitEndOfObjectPoolResponse,
    /// Connected; the application layer is in control.
    Connected,
    /// The connection attempt failed.
    Failed,
}

impl ConnectionState {
    /// Whether this is a `Wait*Response` state with a response deadline.
    #[must_use]
    pub const fn awaits_response(self) -> bool {
        matches!(
            self,
            Self::WaitGetMemoryResponse
                | Self::WaitGetNumberSoftkeysResponse
                | Self::WaitGetTextFontDataResponse
                | Self::WaitGetHardwareResponse
                | Self::WaitEndOfObjectPoolResponse
        )
    }

    /// The `Send*` state a timed-out wait state falls back to.
    #[must_use]
    pub const fn retry_target(self) -> Option<Self> {
        match self {
            Self::WaitGetMemoryResponse => Some(Self::SendGetMemory),
            Self::WaitGetNumberSoftkeysResponse => Some(Self::SendGetNumberSoftkeys),
            Self::WaitGetTextFontDataResponse => Some(Self::SendGetTextFontData),
            Self::WaitGetHardwareResponse => Some(Self::SendGetHardware),
            Self::WaitEndOfObjectPoolResponse => Some(Self::SendEndOfObjectPool),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wait_states_have_retry_targets() {
        assert_eq!(
            ConnectionState::WaitGetMemoryResponse.retry_target(),
            Some(ConnectionState::SendGetMemory)
        );
        assert!(ConnectionState::Connected.retry_target().is_none());
        assert!(ConnectionState::WaitEndOfObjectPoolResponse.awaits_response());
        assert!(!ConnectionState::UploadObjectPool.awaits_response());
    }
}
