//! Point-to-point transport for rankhop.
//!
//! The exchange talks to its neighbors only through the [`Transport`]
//! trait: per-port growable send and receive buffers plus asynchronous
//! post/await operations keyed by (port face, peer rank, tag face).
//! Implementations must never truncate silently.
//!
//! # Implementations
//!
//! - [`ChannelTransport`]: ranks as threads of one process, connected
//!   by `crossbeam-channel` queues built with [`ChannelMesh`].
//! - [`SoloTransport`]: a single rank with no peers.
//!
//! # Wire format
//!
//! Injector batches travel as an envelope of a little-endian `u32`
//! record count followed by fixed-size records; see [`wire`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod buffers;
pub mod channel;
pub mod error;
pub mod solo;
pub mod transport;
pub mod wire;

pub use buffers::PortBuffers;
pub use channel::{ChannelMesh, ChannelTransport};
pub use error::TransportError;
pub use solo::SoloTransport;
pub use transport::Transport;
pub use wire::{EnvelopeReader, EnvelopeWriter, COUNT_BYTES, RECORD_BYTES};
