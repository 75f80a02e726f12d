//! Per-rank grid topology.

use crate::error::GridError;
use rankhop_core::Face;
use smallvec::SmallVec;

/// What lies beyond one face of the local box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FacePeer {
    /// Another rank's box, or this rank's own box under periodic wrap.
    Rank(usize),
    /// The edge of the global domain.
    External,
}

/// Static description of the cells one rank owns and their neighbors.
///
/// Global cell ids are contiguous per rank: rank `r` owns
/// `range[r]..range[r + 1]`, and its local cell `i` has global id
/// `range[r] + i`. Each local cell has six neighbor entries in
/// [`Face::ALL`] order.
#[derive(Clone, Debug, PartialEq)]
pub struct GridTopology {
    rank: usize,
    nproc: usize,
    range: Vec<i64>,
    neighbors: Vec<i64>,
    face_peers: [FacePeer; 6],
}

impl GridTopology {
    /// Build and validate a topology.
    ///
    /// `range` must have `nproc + 1` non-decreasing entries starting at
    /// zero, and `neighbors` must hold six entries per local cell.
    pub fn new(
        rank: usize,
        nproc: usize,
        range: Vec<i64>,
        neighbors: Vec<i64>,
        face_peers: [FacePeer; 6],
    ) -> Result<Self, GridError> {
        if nproc == 0 || rank >= nproc {
            return Err(GridError::InvalidRank { rank, nproc });
        }
        if range.len() != nproc + 1 {
            return Err(GridError::BadRange {
                reason: format!("expected {} entries, got {}", nproc + 1, range.len()),
            });
        }
        if range[0] != 0 {
            return Err(GridError::BadRange {
                reason: format!("first entry must be 0, got {}", range[0]),
            });
        }
        if let Some(w) = range.windows(2).position(|w| w[1] < w[0]) {
            return Err(GridError::BadRange {
                reason: format!("entry {} decreases", w + 1),
            });
        }
        let cells = range[nproc];
        if cells > i64::from(i32::MAX) {
            return Err(GridError::TooManyCells {
                cells: cells as u64,
            });
        }
        let local = (range[rank + 1] - range[rank]) as usize;
        if neighbors.len() != 6 * local {
            return Err(GridError::NeighborTableSize {
                expected: 6 * local,
                found: neighbors.len(),
            });
        }
        for face in Face::ALL {
            if let FacePeer::Rank(peer) = face_peers[face.index()] {
                if peer >= nproc {
                    return Err(GridError::PeerOutOfRange { face, peer, nproc });
                }
            }
        }
        Ok(Self {
            rank,
            nproc,
            range,
            neighbors,
            face_peers,
        })
    }

    /// This rank.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Total number of ranks.
    pub fn nproc(&self) -> usize {
        self.nproc
    }

    /// Number of cells this rank owns.
    pub fn local_cell_count(&self) -> usize {
        (self.range[self.rank + 1] - self.range[self.rank]) as usize
    }

    /// Total number of cells across all ranks.
    pub fn global_cell_count(&self) -> i64 {
        self.range[self.nproc]
    }

    /// First global cell id owned by `rank`.
    pub fn base_offset(&self, rank: usize) -> Option<i64> {
        if rank < self.nproc {
            Some(self.range[rank])
        } else {
            None
        }
    }

    /// Rank owning global cell `global`, or `None` if out of the domain.
    pub fn owner_of(&self, global: i64) -> Option<usize> {
        if global < 0 || global >= self.global_cell_count() {
            return None;
        }
        // Number of ranks whose range ends at or before `global`.
        Some(self.range[1..].partition_point(|&end| end <= global))
    }

    /// Local index of `global` if this rank owns it.
    pub fn local_index(&self, global: i64) -> Option<u32> {
        let lo = self.range[self.rank];
        let hi = self.range[self.rank + 1];
        if global >= lo && global < hi {
            u32::try_from(global - lo).ok()
        } else {
            None
        }
    }

    /// Raw neighbor entry of local cell `cell` across `face`.
    pub fn neighbor(&self, cell: u32, face: Face) -> Option<i64> {
        self.neighbors.get(6 * cell as usize + face.index()).copied()
    }

    /// What lies beyond `face` of the local box.
    pub fn face_peer(&self, face: Face) -> FacePeer {
        self.face_peers[face.index()]
    }

    /// Peer rank across `face` if it is a *different* rank.
    ///
    /// Faces that wrap onto this rank or end the domain return `None`;
    /// only faces returning `Some` take part in message exchange.
    pub fn remote_peer(&self, face: Face) -> Option<usize> {
        match self.face_peers[face.index()] {
            FacePeer::Rank(r) if r != self.rank && r < self.nproc => Some(r),
            _ => None,
        }
    }

    /// All faces shared with other ranks, with their peers.
    pub fn remote_faces(&self) -> SmallVec<[(Face, usize); 6]> {
        Face::ALL
            .iter()
            .filter_map(|&f| self.remote_peer(f).map(|r| (f, r)))
            .collect()
    }

    /// `true` if any face is shared with another rank.
    pub fn has_remote_faces(&self) -> bool {
        Face::ALL.iter().any(|&f| self.remote_peer(f).is_some())
    }
}
