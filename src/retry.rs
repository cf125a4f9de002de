//! Deferred-transmit retry flags.
//!
//! A set flag records the intent to send a message whose transmission the
//! network stack has not yet accepted. The scheduler re-attempts every
//! set flag on each tick and clears it only once the stack admits the
//! frame.

/// The messages the scheduler retries on the client's behalf.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub(crate) enum TransmitFlag {
    /// The working set maintenance heartbeat.
    SendWorkingSetMaintenance = 0,
}

/// A small bit-vector of deferred transmit intents.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct RetryFlags(u32);

impl RetryFlags {
    pub(crate) fn set(&mut self, flag: TransmitFlag) { self.0 |= 1 << flag as u32; }

    pub(crate) fn clear(&mut self, flag: TransmitFlag) { self.0 &= !(1 << flag as u32); }

    pub(crate) const fn is_set(self, flag: TransmitFlag) -> bool {
        self.0 & (1 << flag as u32) != 0
    }

    pub(crate) fn clear_all(&mut self) { self.0 = 0; }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_set_clear_and_query() {
        let mut flags = RetryFlags::default();
        assert!(!flags.is_set(TransmitFlag::SendWorkingSetMaintenance));

        flags.set(TransmitFlag::SendWorkingSetMaintenance);
        assert!(flags.is_set(TransmitFlag::SendWorkingSetMaintenance));

        flags.clear(TransmitFlag::SendWorkingSetMaintenance);
        assert!(!flags.is_set(TransmitFlag::SendWorkingSetMaintenance));

        flags.set(TransmitFlag::SendWorkingSetMaintenance);
        flags.clear_all();
        assert!(!flags.is_set(TransmitFlag::SendWorkingSetMaintenance));
    }
}
