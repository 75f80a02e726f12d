//! Grow-only per-port byte buffers.

use crate::error::TransportError;
use rankhop_core::Face;

/// Six byte buffers, one per port, with a shared size limit.
///
/// Buffers are reused across calls and only ever grow. Sizing past
/// `limit` fails instead of allocating.
#[derive(Clone, Debug)]
pub struct PortBuffers {
    buffers: [Vec<u8>; 6],
    limit: usize,
}

impl PortBuffers {
    /// Empty buffers that may each grow to `limit` bytes.
    pub fn new(limit: usize) -> Self {
        Self {
            buffers: Default::default(),
            limit,
        }
    }

    /// Per-buffer size limit in bytes.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Grow `port`'s buffer to at least `bytes`.
    pub fn size(&mut self, port: Face, bytes: usize) -> Result<(), TransportError> {
        if bytes > self.limit {
            return Err(TransportError::BufferTooLarge {
                port,
                requested: bytes,
                limit: self.limit,
            });
        }
        let buf = &mut self.buffers[port.index()];
        if buf.len() < bytes {
            buf.resize(bytes, 0);
        }
        Ok(())
    }

    /// `port`'s buffer.
    pub fn get(&self, port: Face) -> &[u8] {
        &self.buffers[port.index()]
    }

    /// `port`'s buffer, mutably.
    pub fn get_mut(&mut self, port: Face) -> &mut [u8] {
        &mut self.buffers[port.index()]
    }

    /// Total bytes held across all ports.
    pub fn memory_bytes(&self) -> usize {
        self.buffers.iter().map(Vec::len).sum()
    }
}
