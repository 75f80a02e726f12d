//! Input validation errors.
//!
//! These describe malformed arguments handed to the exchange by its
//! callers. All of them are fatal: the exchange refuses to start.

use std::error::Error;
use std::fmt;

/// A caller-supplied argument violates the exchange's preconditions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputError {
    /// A container already holds more entries than its capacity.
    OverCapacity {
        /// Which container (`"particles"` or `"movers"`).
        what: &'static str,
        /// Entries currently held.
        len: usize,
        /// Declared capacity.
        capacity: usize,
    },
    /// A mover points past the end of the live particle array.
    MoverIndexOutOfRange {
        /// Position of the mover in the list.
        position: usize,
        /// The particle index it carries.
        index: u32,
        /// Number of live particles.
        live: usize,
    },
    /// Mover indices are not strictly increasing.
    UnorderedMovers {
        /// Position of the first offending mover.
        position: usize,
        /// Index of the mover before it.
        previous: u32,
        /// Its own index.
        index: u32,
    },
    /// A mover's particle sits in a cell this rank does not own.
    ParticleCellOutOfRange {
        /// The particle index.
        index: u32,
        /// The cell it claims.
        cell: u32,
        /// Number of local cells.
        cells: usize,
    },
    /// The grid and the transport disagree about which rank this is.
    RankMismatch {
        /// Rank according to the grid topology.
        grid: usize,
        /// Rank according to the transport.
        transport: usize,
    },
    /// The grid's rank count disagrees with the transport's.
    ProcessCountMismatch {
        /// Rank count according to the grid topology.
        grid: usize,
        /// Rank count according to the transport.
        transport: usize,
    },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OverCapacity {
                what,
                len,
                capacity,
            } => write!(f, "{what}: {len} entries exceed capacity {capacity}"),
            Self::MoverIndexOutOfRange {
                position,
                index,
                live,
            } => write!(
                f,
                "mover {position} points at particle {index}, but only {live} are live"
            ),
            Self::UnorderedMovers {
                position,
                previous,
                index,
            } => write!(
                f,
                "mover {position} has index {index}, not above previous index {previous}"
            ),
            Self::ParticleCellOutOfRange { index, cell, cells } => write!(
                f,
                "particle {index} is in cell {cell}, but the rank owns {cells} cells"
            ),
            Self::RankMismatch { grid, transport } => {
                write!(f, "grid is for rank {grid}, transport is rank {transport}")
            }
            Self::ProcessCountMismatch { grid, transport } => {
                write!(f, "grid spans {grid} ranks, transport spans {transport}")
            }
        }
    }
}

impl Error for InputError {}
