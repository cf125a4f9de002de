//! Seam to the CAN network stack.
//!
//! The ISO 11783-3 stack (address claim, parameter-group routing,
//! transport segmentation) is an external collaborator. Outbound traffic
//! leaves through the [`NetworkLink`] trait; inbound frames, segmented
//! transfer confirmations, and partner-liveness changes come back through
//! a cloneable [`DeliveryHandle`] feeding the queue the client drains on
//! each `update()` tick.

use std::sync::mpsc;

use bytes::Bytes;

use crate::frame::Frame;

/// Pulls payload bytes for a segmented send on demand.
///
/// The transport sublayer calls [`read`](Self::read) once per frame it
/// assembles, so large payloads are never materialised contiguously on
/// the client side.
pub trait ChunkSource: Send {
    /// Total payload length in bytes, multiplexor included.
    fn total_len(&self) -> u32;

    /// Fill `buf` with payload bytes starting at `offset`.
    ///
    /// `call_index` counts invocations from zero. Returns `false` when
    /// the source cannot produce the requested range; the transport must
    /// then abort the transfer and confirm it as failed.
    fn read(&mut self, call_index: u32, offset: u32, buf: &mut [u8]) -> bool;
}

impl ChunkSource for Bytes {
    fn total_len(&self) -> u32 { u32::try_from(self.len()).unwrap_or(u32::MAX) }

    fn read(&mut self, _call_index: u32, offset: u32, buf: &mut [u8]) -> bool {
        let offset = offset as usize;
        let end = offset + buf.len();
        match self.get(offset..end) {
            Some(chunk) => {
                buf.copy_from_slice(chunk);
                true
            }
            None => false,
        }
    }
}

/// Outbound interface the client drives.
///
/// Both methods report queue admission only; delivery on the bus is
/// asynchronous. Segmented sends additionally confirm completion through
/// the delivery queue once the transport finishes or aborts.
pub trait NetworkLink: Send + Sync {
    /// Queue a single 8-byte frame.
    fn send_frame(&self, frame: &Frame) -> bool;

    /// Submit a payload longer than one frame to the transport sublayer.
    fn send_segmented(
        &self,
        pgn: u32,
        source: u8,
        destination: u8,
        payload: Box<dyn ChunkSource>,
    ) -> bool;
}

/// Completion report for a segmented send.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SendConfirmation {
    /// Parameter group number of the finished transfer.
    pub pgn: u32,
    /// Whether every byte reached the bus.
    pub success: bool,
}

/// One item on the client's inbound queue.
#[derive(Debug)]
pub enum Delivery {
    /// A frame addressed to the client (or a relevant broadcast).
    Frame(Frame),
    /// A segmented send finished or aborted.
    Confirmation(SendConfirmation),
    /// The partner's address claim was lost.
    PartnerOffline,
}

/// Cloneable producer side of the client's inbound queue.
///
/// The application's network glue holds one of these and forwards
/// VT-to-ECU traffic, transport completions, and address-claim changes.
#[derive(Clone)]
pub struct DeliveryHandle(mpsc::Sender<Delivery>);

impl DeliveryHandle {
    /// Queue an inbound frame. Returns `false` if the client is gone.
    pub fn deliver_frame(&self, frame: Frame) -> bool {
        self.0.send(Delivery::Frame(frame)).is_ok()
    }

    /// Queue a segmented send confirmation.
    pub fn confirm(&self, confirmation: SendConfirmation) -> bool {
        self.0.send(Delivery::Confirmation(confirmation)).is_ok()
    }

    /// Report that the partner's address claim was lost.
    pub fn partner_offline(&self) -> bool { self.0.send(Delivery::PartnerOffline).is_ok() }
}

/// Create the inbound queue pair.
pub(crate) fn delivery_channel() -> (DeliveryHandle, mpsc::Receiver<Delivery>) {
    let (tx, rx) = mpsc::channel();
    (DeliveryHandle(tx), rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_chunk_source_reads_in_range() {
        let mut source = Bytes::from_static(&[1, 2, 3, 4, 5]);
        assert_eq!(source.total_len(), 5);

        let mut buf = [0u8; 3];
        assert!(source.read(0, 1, &mut buf));
        assert_eq!(buf, [2, 3, 4]);
    }

    #[test]
    fn bytes_chunk_source_rejects_overrun() {
        let mut source = Bytes::from_static(&[1, 2, 3]);
        let mut buf = [0u8; 3];
        assert!(!source.read(0, 2, &mut buf));
    }

    #[test]
    fn delivery_handle_feeds_the_queue() {
        let (handle, rx) = delivery_channel();
        assert!(handle.partner_offline());
        assert!(matches!(rx.try_recv(), Ok(Delivery::PartnerOffline)));

        drop(rx);
        assert!(!handle.partner_offline());
    }
}
