//! Object pool descriptors and the upload pipeline.
//!
//! A pool is registered under an index with one of three source
//! variants and streamed to the server as a single logical transport
//! message whose first byte is the object-pool-transfer multiplexor. The
//! multiplexor is prepended on the fly so the pool is never copied into a
//! staging buffer.

use std::sync::{Arc, Mutex};

use bytes::Bytes;

use crate::{capability::VtVersion, function::Function, network::ChunkSource};

/// Application callback producing pool bytes page by page.
///
/// Invoked as `(call_index, offset, out_buffer)`; returns `false` when
/// the requested range cannot be produced.
pub type ChunkProvider = Box<dyn FnMut(u32, u32, &mut [u8]) -> bool + Send>;

/// The source variants a pool can be registered with.
pub enum PoolData {
    /// A contiguous buffer held for the duration of the upload.
    Contiguous(Bytes),
    /// A dynamically built byte sequence.
    Dynamic(Vec<u8>),
    /// A pull callback with a declared total size, for pools too large to
    /// keep resident or stored on external media.
    Paged {
        /// Declared pool size in bytes.
        total_size: u32,
        /// The application's page provider.
        provider: Mutex<ChunkProvider>,
    },
}

impl PoolData {
    /// The pool's payload size in bytes, multiplexor excluded.
    #[must_use]
    pub fn len(&self) -> u32 {
        match self {
            Self::Contiguous(bytes) => u32::try_from(bytes.len()).unwrap_or(u32::MAX),
            Self::Dynamic(bytes) => u32::try_from(bytes.len()).unwrap_or(u32::MAX),
            Self::Paged { total_size, .. } => *total_size,
        }
    }

    /// Whether the pool holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Produce pool bytes at `offset` into `buf`.
    pub(crate) fn pull(&self, call_index: u32, offset: u32, buf: &mut [u8]) -> bool {
        match self {
            Self::Contiguous(bytes) => copy_range(bytes, offset, buf),
            Self::Dynamic(bytes) => copy_range(bytes, offset, buf),
            Self::Paged { provider, .. } => match provider.lock() {
                Ok(mut provider) => provider(call_index, offset, buf),
                Err(_) => false,
            },
        }
    }
}

impl std::fmt::Debug for PoolData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Contiguous(bytes) => f.debug_tuple("Contiguous").field(&bytes.len()).finish(),
            Self::Dynamic(bytes) => f.debug_tuple("Dynamic").field(&bytes.len()).finish(),
            Self::Paged { total_size, .. } => {
                f.debug_struct("Paged").field("total_size", total_size).finish()
            }
        }
    }
}

fn copy_range(source: &[u8], offset: u32, buf: &mut [u8]) -> bool {
    let offset = offset as usize;
    let end = offset + buf.len();
    match source.get(offset..end) {
        Some(chunk) => {
            buf.copy_from_slice(chunk);
            true
        }
        None => false,
    }
}

/// A registered pool and its upload bookkeeping.
#[derive(Debug)]
pub(crate) struct PoolSlot {
    pub(crate) data: Arc<PoolData>,
    pub(crate) version: VtVersion,
    pub(crate) uploaded: bool,
}

/// Substates of the single in-flight pool upload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum UploadState {
    /// No transfer started.
    #[default]
    Uninitialized,
    /// A transfer was handed to the transport sublayer.
    InProgress,
    /// The transport confirmed the transfer.
    Success,
    /// The transport aborted or the source failed.
    Failed,
}

/// Progress of the upload pipeline across all registered pools.
#[derive(Debug, Default)]
pub(crate) struct UploadPipeline {
    pub(crate) current_index: Option<u8>,
    pub(crate) bytes_sent: u64,
    pub(crate) state: UploadState,
}

impl UploadPipeline {
    pub(crate) fn reset(&mut self) {
        self.current_index = None;
        self.bytes_sent = 0;
        self.state = UploadState::Uninitialized;
    }
}

/// Chunk source streaming one pool with the transfer multiplexor
/// prepended.
pub(crate) struct PoolTransfer {
    pool: Arc<PoolData>,
}

impl PoolTransfer {
    pub(crate) fn new(pool: Arc<PoolData>) -> Self { Self { pool } }
}

impl ChunkSource for PoolTransfer {
    fn total_len(&self) -> u32 { self.pool.len().saturating_add(1) }

    fn read(&mut self, call_index: u32, offset: u32, buf: &mut [u8]) -> bool {
        if buf.is_empty() {
            return true;
        }
        if offset == 0 {
            buf[0] = Function::ObjectPoolTransfer.code();
            let rest = &mut buf[1..];
            rest.is_empty() || self.pool.pull(call_index, 0, rest)
        } else {
            self.pool.pull(call_index, offset - 1, buf)
        }
    }
}
