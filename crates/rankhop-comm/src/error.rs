//! Transport error types.

use rankhop_core::Face;
use std::fmt;

/// Errors from buffer sizing, message posting, or message completion.
///
/// Every variant is fatal to the exchange call that hit it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportError {
    /// A buffer cannot be grown to the requested size.
    BufferTooLarge {
        /// The port being sized.
        port: Face,
        /// Requested size in bytes.
        requested: usize,
        /// Configured per-buffer limit in bytes.
        limit: usize,
    },
    /// A posted length is larger than the buffer backing it.
    LengthExceedsBuffer {
        /// The port.
        port: Face,
        /// Posted length in bytes.
        len: usize,
        /// Current buffer size in bytes.
        buffer: usize,
    },
    /// A peer rank outside `0..nproc`.
    InvalidPeer {
        /// The named peer.
        peer: usize,
        /// Total rank count.
        nproc: usize,
    },
    /// An operation was posted on a port that already has one in flight.
    AlreadyPosted {
        /// The port.
        port: Face,
        /// `"send"` or `"recv"`.
        direction: &'static str,
    },
    /// A completion was awaited on a port with nothing in flight.
    NotPosted {
        /// The port.
        port: Face,
        /// `"send"` or `"recv"`.
        direction: &'static str,
    },
    /// An arriving message is longer than the posted receive.
    Truncated {
        /// The receiving port.
        port: Face,
        /// Posted receive length.
        posted: usize,
        /// Actual message length.
        received: usize,
    },
    /// The peer's end of the connection has gone away.
    Disconnected {
        /// The unreachable rank.
        peer: usize,
    },
    /// The transport has no peers to talk to.
    NoPeers,
    /// An envelope's header and body disagree.
    MalformedEnvelope {
        /// What went wrong.
        detail: String,
    },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferTooLarge {
                port,
                requested,
                limit,
            } => write!(
                f,
                "cannot size {port} buffer to {requested} bytes (limit {limit})"
            ),
            Self::LengthExceedsBuffer { port, len, buffer } => write!(
                f,
                "posted {len} bytes on {port} but the buffer holds {buffer}"
            ),
            Self::InvalidPeer { peer, nproc } => {
                write!(f, "peer {peer} is out of range for {nproc} ranks")
            }
            Self::AlreadyPosted { port, direction } => {
                write!(f, "{direction} already in flight on {port}")
            }
            Self::NotPosted { port, direction } => {
                write!(f, "no {direction} in flight on {port}")
            }
            Self::Truncated {
                port,
                posted,
                received,
            } => write!(
                f,
                "message of {received} bytes on {port} exceeds posted receive of {posted}"
            ),
            Self::Disconnected { peer } => write!(f, "rank {peer} disconnected"),
            Self::NoPeers => write!(f, "transport has no peers"),
            Self::MalformedEnvelope { detail } => write!(f, "malformed envelope: {detail}"),
        }
    }
}

impl std::error::Error for TransportError {}
