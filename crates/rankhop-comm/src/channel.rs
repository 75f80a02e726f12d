//! In-process transport: ranks as threads joined by channels.
//!
//! [`ChannelMesh::build`] wires a fully connected mesh of unbounded
//! `crossbeam-channel` queues, one inbox per rank. A send copies the
//! posted bytes into a packet and enqueues it immediately, so
//! `begin_send` never blocks. Packets that arrive before their receive
//! is awaited, or for a different (source, tag) pair, are stashed and
//! matched later. A rank's messages to itself go straight to the stash.
//!
//! Each transport also holds the only sender of a hangup channel that
//! never carries a message. When a transport is dropped its hangup
//! channel disconnects, and peers blocked on a receive from it fail
//! with [`TransportError::Disconnected`] once its queued packets run out.

use crate::buffers::PortBuffers;
use crate::error::TransportError;
use crate::transport::Transport;
use crossbeam_channel::{select, unbounded, Receiver, Sender};
use rankhop_core::Face;
use std::collections::{HashMap, VecDeque};

struct Packet {
    src: usize,
    tag: Face,
    bytes: Vec<u8>,
}

#[derive(Clone, Copy, Debug)]
struct PendingRecv {
    src: usize,
    tag: Face,
    len: usize,
}

/// Builder for a set of connected [`ChannelTransport`]s.
pub struct ChannelMesh;

impl ChannelMesh {
    /// Create `nproc` transports, indexed by rank, that can all reach
    /// each other. Each per-port buffer may grow to `max_buffer_bytes`.
    ///
    /// Move each transport to its own thread.
    pub fn build(nproc: usize, max_buffer_bytes: usize) -> Vec<ChannelTransport> {
        let (senders, inboxes): (Vec<Sender<Packet>>, Vec<Receiver<Packet>>) =
            (0..nproc).map(|_| unbounded()).unzip();
        let (alive, hangups): (Vec<Sender<()>>, Vec<Receiver<()>>) =
            (0..nproc).map(|_| unbounded()).unzip();
        inboxes
            .into_iter()
            .zip(alive)
            .enumerate()
            .map(|(rank, (inbox, alive))| ChannelTransport {
                rank,
                peers: senders
                    .iter()
                    .enumerate()
                    .map(|(peer, tx)| (peer != rank).then(|| tx.clone()))
                    .collect(),
                inbox,
                hangups: hangups.clone(),
                _alive: alive,
                stash: HashMap::new(),
                send: PortBuffers::new(max_buffer_bytes),
                recv: PortBuffers::new(max_buffer_bytes),
                pending_send: [None; 6],
                pending_recv: [None; 6],
            })
            .collect()
    }
}

/// One rank's endpoint in a [`ChannelMesh`].
pub struct ChannelTransport {
    rank: usize,
    /// Inbox senders by rank; `None` in this rank's own slot.
    peers: Vec<Option<Sender<Packet>>>,
    inbox: Receiver<Packet>,
    hangups: Vec<Receiver<()>>,
    _alive: Sender<()>,
    stash: HashMap<(usize, Face), VecDeque<Vec<u8>>>,
    send: PortBuffers,
    recv: PortBuffers,
    pending_send: [Option<usize>; 6],
    pending_recv: [Option<PendingRecv>; 6],
}

impl ChannelTransport {
    fn check_peer(&self, peer: usize) -> Result<(), TransportError> {
        if peer >= self.peers.len() {
            return Err(TransportError::InvalidPeer {
                peer,
                nproc: self.peers.len(),
            });
        }
        Ok(())
    }

    /// Next packet from `src` with `tag`, from the stash or the inbox.
    fn take_matching(&mut self, src: usize, tag: Face) -> Result<Vec<u8>, TransportError> {
        if let Some(bytes) = self
            .stash
            .get_mut(&(src, tag))
            .and_then(VecDeque::pop_front)
        {
            return Ok(bytes);
        }
        if src == self.rank {
            // Self-sends are stashed when posted; nothing else will come.
            return Err(TransportError::Disconnected { peer: src });
        }
        loop {
            let event = select! {
                recv(self.inbox) -> packet => Some(packet),
                recv(self.hangups[src]) -> _ => None,
            };
            let packet = match event {
                Some(packet) => packet.map_err(|_| TransportError::Disconnected { peer: src })?,
                None => {
                    return self
                        .drain_matching(src, tag)
                        .ok_or(TransportError::Disconnected { peer: src });
                }
            };
            if let Some(bytes) = self.stash_unless_matching(packet, src, tag) {
                return Ok(bytes);
            }
        }
    }

    /// Packets already queued, searched after `src` hung up.
    fn drain_matching(&mut self, src: usize, tag: Face) -> Option<Vec<u8>> {
        while let Ok(packet) = self.inbox.try_recv() {
            if let Some(bytes) = self.stash_unless_matching(packet, src, tag) {
                return Some(bytes);
            }
        }
        None
    }

    fn stash_unless_matching(&mut self, packet: Packet, src: usize, tag: Face) -> Option<Vec<u8>> {
        if packet.src == src && packet.tag == tag {
            return Some(packet.bytes);
        }
        self.stash
            .entry((packet.src, packet.tag))
            .or_default()
            .push_back(packet.bytes);
        None
    }
}

impl Transport for ChannelTransport {
    fn rank(&self) -> usize {
        self.rank
    }

    fn nproc(&self) -> usize {
        self.peers.len()
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

    fn begin_send(
        &mut self,
        port: Face,
        len: usize,
        dst: usize,
        tag: Face,
    ) -> Result<(), TransportError> {
        self.check_peer(dst)?;
        if self.pending_send[port.index()].is_some() {
            return Err(TransportError::AlreadyPosted {
                port,
                direction: "send",
            });
        }
        let buf = self.send.get(port);
        if len > buf.len() {
            return Err(TransportError::LengthExceedsBuffer {
                port,
                len,
                buffer: buf.len(),
            });
        }
        let bytes = buf[..len].to_vec();
        match &self.peers[dst] {
            Some(peer) => peer
                .send(Packet {
                    src: self.rank,
                    tag,
                    bytes,
                })
                .map_err(|_| TransportError::Disconnected { peer: dst })?,
            None => self.stash.entry((dst, tag)).or_default().push_back(bytes),
        }
        self.pending_send[port.index()] = Some(dst);
        Ok(())
    }

    fn begin_recv(
        &mut self,
        port: Face,
        len: usize,
        src: usize,
        tag: Face,
    ) -> Result<(), TransportError> {
        self.check_peer(src)?;
        if self.pending_recv[port.index()].is_some() {
            return Err(TransportError::AlreadyPosted {
                port,
                direction: "recv",
            });
        }
        let buffer = self.recv.get(port).len();
        if len > buffer {
            return Err(TransportError::LengthExceedsBuffer { port, len, buffer });
        }
        self.pending_recv[port.index()] = Some(PendingRecv { src, tag, len });
        Ok(())
    }

    fn end_send(&mut self, port: Face) -> Result<(), TransportError> {
        // Packets are owned by the channel once enqueued.
        match self.pending_send[port.index()].take() {
            Some(_) => Ok(()),
            None => Err(TransportError::NotPosted {
                port,
                direction: "send",
            }),
        }
    }

    fn end_recv(&mut self, port: Face) -> Result<(), TransportError> {
        let pending = self.pending_recv[port.index()]
            .take()
            .ok_or(TransportError::NotPosted {
                port,
                direction: "recv",
            })?;
        let bytes = self.take_matching(pending.src, pending.tag)?;
        if bytes.len() > pending.len {
            return Err(TransportError::Truncated {
                port,
                posted: pending.len,
                received: bytes.len(),
            });
        }
        self.recv.get_mut(port)[..bytes.len()].copy_from_slice(&bytes);
        Ok(())
    }
}

impl std::fmt::Debug for ChannelTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelTransport")
            .field("rank", &self.rank)
            .field("nproc", &self.peers.len())
            .field("stashed", &self.stash.values().map(VecDeque::len).sum::<usize>())
            .finish()
    }
}
