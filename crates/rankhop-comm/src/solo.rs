//! Single-rank transport.

use crate::buffers::PortBuffers;
use crate::error::TransportError;
use crate::transport::Transport;
use rankhop_core::Face;

/// Transport for a lone rank with no peers.
///
/// Buffers work normally so the exchange can size them, but every
/// attempt to post a message fails with [`TransportError::NoPeers`]. A
/// grid whose faces are all external or self-wrapping never posts one.
#[derive(Clone, Debug)]
pub struct SoloTransport {
    send: PortBuffers,
    recv: PortBuffers,
}

impl SoloTransport {
    /// Rank 0 of 1, with buffers limited to `max_buffer_bytes`.
    pub fn new(max_buffer_bytes: usize) -> Self {
        Self {
            send: PortBuffers::new(max_buffer_bytes),
            recv: PortBuffers::new(max_buffer_bytes),
        }
    }
}

impl Default for SoloTransport {
    fn default() -> Self {
        Self::new(usize::MAX)
    }
}

impl Transport for SoloTransport {
    fn rank(&self) -> usize {
        0
    }

    fn nproc(&self) -> usize {
        1
    }

    fn size_send_buffer(&mut self, port: Face, bytes: usize) -> Result<(), TransportError> {
        self.send.size(port, bytes)
    }

    fn size_recv_buffer(&mut self, port: Face, bytes: usize) -> Result<(), TransportError> {
        self.recv.size(port, bytes)
    }

    fn send_buffer(&mut self, port: Face) -> &mut [u8] {
        self.send.get_mut(port)
    }

    fn recv_buffer(&self, port: Face) -> &[u8] {
        self.recv.get(port)
    }

    fn begin_send(&mut self, _: Face, _: usize, _: usize, _: Face) -> Result<(), TransportError> {
        Err(TransportError::NoPeers)
    }

    fn begin_recv(&mut self, _: Face, _: usize, _: usize, _: Face) -> Result<(), TransportError> {
        Err(TransportError::NoPeers)
    }

    fn end_send(&mut self, port: Face) -> Result<(), TransportError> {
        Err(TransportError::NotPosted {
            port,
            direction: "send",
        })
    }

    fn end_recv(&mut self, port: Face) -> Result<(), TransportError> {
        Err(TransportError::NotPosted {
            port,
            direction: "recv",
        })
    }
}
