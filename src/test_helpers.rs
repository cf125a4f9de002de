#![cfg(any(test, feature = "test-helpers"))]
//! Test-only helpers: a recording network link, a manually driven clock,
//! and builders for the server side of the bring-up dialogue.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
    time::{Duration, Instant},
};

use crate::{
    clock::Clock,
    frame::{Frame, CAN_DATA_LENGTH, PGN_VT_TO_ECU, RESERVED},
    network::{ChunkSource, NetworkLink},
};

/// A clock whose time only moves when the test advances it.
pub struct ManualClock {
    base: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    /// A clock starting at an arbitrary fixed instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    /// Move time forward by `step`.
    pub fn advance(&self, step: Duration) {
        let mut offset = self.offset.lock().expect("clock lock");
        *offset += step;
    }
}

impl Default for ManualClock {
    fn default() -> Self { Self::new() }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant { self.base + *self.offset.lock().expect("clock lock") }
}

/// A segmented send captured by the [`MockLink`].
pub struct CapturedSegmented {
    /// Parameter group number of the transfer.
    pub pgn: u32,
    /// Source address.
    pub source: u8,
    /// Destination address.
    pub destination: u8,
    chunk_source: Box<dyn ChunkSource>,
}

impl CapturedSegmented {
    /// Declared payload length, multiplexor included.
    #[must_use]
    pub fn total_len(&self) -> u32 { self.chunk_source.total_len() }

    /// Pull the whole payload in `chunk_size` steps, the way the
    /// transport sublayer would.
    ///
    /// # Errors
    ///
    /// Returns the failing offset if the source refuses a read.
    pub fn drain(mut self, chunk_size: usize) -> Result<Vec<u8>, u32> {
        let total = self.total_len() as usize;
        let mut payload = Vec::with_capacity(total);
        let mut offset = 0usize;
        let mut call_index = 0u32;
        while offset < total {
            let len = chunk_size.min(total - offset);
            let mut buf = vec![0u8; len];
            #[allow(clippy::cast_possible_truncation)]
            let at = offset as u32;
            if !self.chunk_source.read(call_index, at, &mut buf) {
                return Err(at);
            }
            payload.extend_from_slice(&buf);
            offset += len;
            call_index += 1;
        }
        Ok(payload)
    }
}

/// A network link that records everything the client submits.
#[derive(Default)]
pub struct MockLink {
    frames: Mutex<Vec<Frame>>,
    segmented: Mutex<Vec<CapturedSegmented>>,
    reject_sends: AtomicBool,
}

impl MockLink {
    /// A link that admits everything.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Make subsequent sends fail admission (or succeed again).
    pub fn set_reject_sends(&self, reject: bool) {
        self.reject_sends.store(reject, Ordering::SeqCst);
    }

    /// All single frames sent so far, in order.
    #[must_use]
    pub fn sent_frames(&self) -> Vec<Frame> { self.frames.lock().expect("link lock").clone() }

    /// Frames whose byte 0 carries `function_code`.
    #[must_use]
    pub fn frames_with_function(&self, function_code: u8) -> Vec<Frame> {
        self.sent_frames()
            .into_iter()
            .filter(|frame| frame.function_code() == function_code)
            .collect()
    }

    /// Forget recorded frames.
    pub fn clear_frames(&self) { self.frames.lock().expect("link lock").clear(); }

    /// Number of captured segmented sends still pending.
    #[must_use]
    pub fn segmented_pending(&self) -> usize { self.segmented.lock().expect("link lock").len() }

    /// Take the oldest captured segmented send, if any.
    #[must_use]
    pub fn take_segmented(&self) -> Option<CapturedSegmented> {
        let mut pending = self.segmented.lock().expect("link lock");
        if pending.is_empty() {
            None
        } else {
            Some(pending.remove(0))
        }
    }
}

impl NetworkLink for MockLink {
    fn send_frame(&self, frame: &Frame) -> bool {
        if self.reject_sends.load(Ordering::SeqCst) {
            return false;
        }
        self.frames.lock().expect("link lock").push(*frame);
        true
    }

    fn send_segmented(
        &self,
        pgn: u32,
        source: u8,
        destination: u8,
        payload: Box<dyn ChunkSource>,
    ) -> bool {
        if self.reject_sends.load(Ordering::SeqCst) {
            return false;
        }
        self.segmented.lock().expect("link lock").push(CapturedSegmented {
            pgn,
            source,
            destination,
            chunk_source: payload,
        });
        true
    }
}

/// Wrap a server payload into a VT-to-ECU frame from `server_address`.
#[must_use]
pub fn server_frame(server_address: u8, local_address: u8, body: [u8; CAN_DATA_LENGTH]) -> Frame {
    Frame::new(PGN_VT_TO_ECU, server_address, local_address, body)
}

/// A VT status broadcast body.
#[must_use]
pub fn vt_status_body(active_master: u8) -> [u8; CAN_DATA_LENGTH] {
    [0xFE, active_master, 0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00]
}

/// A get-memory response body.
#[must_use]
pub fn get_memory_response_body(version: u8, enough_memory: bool) -> [u8; CAN_DATA_LENGTH] {
    let mut body = [RESERVED; CAN_DATA_LENGTH];
    body[0] = 0xC0;
    body[2] = version;
    body[3] = u8::from(!enough_memory);
    body
}

/// A get-number-of-softkeys response body.
#[must_use]
pub fn softkeys_response_body(
    x_pixels: u8,
    y_pixels: u8,
    virtual_per_mask: u8,
    physical: u8,
) -> [u8; CAN_DATA_LENGTH] {
    let mut body = [RESERVED; CAN_DATA_LENGTH];
    body[0] = 0xC2;
    body[1] = x_pixels;
    body[2] = y_pixels;
    body[4] = virtual_per_mask;
    body[5] = physical;
    body
}

/// A get-text-font-data response body.
#[must_use]
pub fn font_data_response_body(
    small_sizes: u8,
    large_sizes: u8,
    styles: u8,
) -> [u8; CAN_DATA_LENGTH] {
    let mut body = [RESERVED; CAN_DATA_LENGTH];
    body[0] = 0xC3;
    body[5] = small_sizes;
    body[6] = large_sizes;
    body[7] = styles;
    body
}

/// A get-hardware response body.
#[must_use]
pub fn hardware_response_body(
    features: u8,
    graphic_mode: u8,
    x_pixels: u16,
    y_pixels: u16,
) -> [u8; CAN_DATA_LENGTH] {
    let [x_lo, x_hi] = x_pixels.to_le_bytes();
    let [y_lo, y_hi] = y_pixels.to_le_bytes();
    let mut body = [RESERVED; CAN_DATA_LENGTH];
    body[0] = 0xC7;
    body[2] = features;
    body[3] = graphic_mode;
    body[4] = x_lo;
    body[5] = x_hi;
    body[6] = y_lo;
    body[7] = y_hi;
    body
}

/// An end-of-object-pool response body.
#[must_use]
pub fn end_of_pool_response_body(error_bits: u8) -> [u8; CAN_DATA_LENGTH] {
    let mut body = [RESERVED; CAN_DATA_LENGTH];
    body[0] = 0x12;
    body[1] = error_bits;
    body
}
