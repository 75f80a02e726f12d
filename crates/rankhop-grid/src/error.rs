//! Error types for grid construction.

use rankhop_core::{Axis, Face};
use std::fmt;

/// Errors arising from topology construction or decomposition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridError {
    /// `rank` is not below `nproc`, or `nproc` is zero.
    InvalidRank {
        /// The requested rank.
        rank: usize,
        /// Total rank count.
        nproc: usize,
    },
    /// The cell range table is malformed.
    BadRange {
        /// What went wrong.
        reason: String,
    },
    /// The neighbor table does not have six entries per local cell.
    NeighborTableSize {
        /// Expected number of entries.
        expected: usize,
        /// Number of entries supplied.
        found: usize,
    },
    /// A face peer names a rank that does not exist.
    PeerOutOfRange {
        /// The face whose peer is invalid.
        face: Face,
        /// The named peer.
        peer: usize,
        /// Total rank count.
        nproc: usize,
    },
    /// A global dimension does not split evenly over the ranks on that axis.
    Indivisible {
        /// The axis being split.
        axis: Axis,
        /// Global cells along the axis.
        cells: u32,
        /// Ranks along the axis.
        ranks: u32,
    },
    /// A dimension (cells or ranks) is zero.
    EmptyDimension {
        /// The offending axis.
        axis: Axis,
    },
    /// Only one face of an axis is periodic.
    AsymmetricPeriodic {
        /// The offending axis.
        axis: Axis,
    },
    /// The global cell count does not fit in the neighbor-table integer type.
    TooManyCells {
        /// Requested global cell count.
        cells: u64,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRank { rank, nproc } => {
                write!(f, "rank {rank} is invalid for {nproc} ranks")
            }
            Self::BadRange { reason } => write!(f, "bad range table: {reason}"),
            Self::NeighborTableSize { expected, found } => {
                write!(f, "neighbor table has {found} entries, expected {expected}")
            }
            Self::PeerOutOfRange { face, peer, nproc } => {
                write!(f, "face {face} peer {peer} is out of range for {nproc} ranks")
            }
            Self::Indivisible { axis, cells, ranks } => write!(
                f,
                "{cells} cells along {axis} do not split evenly over {ranks} ranks"
            ),
            Self::EmptyDimension { axis } => write!(f, "zero-sized dimension along {axis}"),
            Self::AsymmetricPeriodic { axis } => {
                write!(f, "periodic boundary along {axis} must apply to both faces")
            }
            Self::TooManyCells { cells } => write!(f, "{cells} global cells is too many"),
        }
    }
}

impl std::error::Error for GridError {}
