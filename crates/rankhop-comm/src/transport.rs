//! The [`Transport`] trait.

use crate::error::TransportError;
use rankhop_core::Face;

/// Asynchronous point-to-point messaging between ranks.
///
/// Each rank has one send and one receive buffer per port, where ports
/// are the six [`Face`]s. A message is described by the port whose
/// buffer holds it, the peer rank, and a tag face. The exchange sends
/// through outbound face `k` with tag `k` and receives on port
/// `k.opposite()` with tag `k`.
///
/// # Contract
///
/// - Buffers grow on `size_*` and keep their contents otherwise; they
///   never shrink across calls.
/// - `begin_send` must not block on the peer posting its receive.
/// - `end_recv` blocks until the matching message arrives and fails with
///   [`TransportError::Truncated`] rather than dropping bytes.
/// - At most one send and one receive may be in flight per port.
pub trait Transport {
    /// This rank.
    fn rank(&self) -> usize;

    /// Total number of ranks.
    fn nproc(&self) -> usize;

    /// Grow the send buffer of `port` to at least `bytes`.
    fn size_send_buffer(&mut self, port: Face, bytes: usize) -> Result<(), TransportError>;

    /// Grow the receive buffer of `port` to at least `bytes`.
    fn size_recv_buffer(&mut self, port: Face, bytes: usize) -> Result<(), TransportError>;

    /// The send buffer of `port`.
    fn send_buffer(&mut self, port: Face) -> &mut [u8];

    /// The receive buffer of `port`. Valid after `end_recv`.
    fn recv_buffer(&self, port: Face) -> &[u8];

    /// Post a send of the first `len` bytes of `port`'s send buffer.
    fn begin_send(
        &mut self,
        port: Face,
        len: usize,
        dst: usize,
        tag: Face,
    ) -> Result<(), TransportError>;

    /// Post a receive of at most `len` bytes into `port`'s receive buffer.
    fn begin_recv(
        &mut self,
        port: Face,
        len: usize,
        src: usize,
        tag: Face,
    ) -> Result<(), TransportError>;

    /// Wait for the send on `port` to complete.
    fn end_send(&mut self, port: Face) -> Result<(), TransportError>;

    /// Wait for the receive on `port` to complete.
    fn end_recv(&mut self, port: Face) -> Result<(), TransportError>;
}
