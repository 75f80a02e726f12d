//! Recoverable anomalies raised during an exchange.
//!
//! None of these abort the call. Each is logged through `tracing` at
//! `WARN` when raised and collected in the
//! [`ExchangeReport`](crate::ExchangeReport).

use rankhop_core::Face;
use std::fmt;

/// A non-fatal anomaly. The affected particle is absorbed or dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExchangeWarning {
    /// No face test fired for a mover; its particle was absorbed.
    UnresolvedMover {
        /// Zero-based pass.
        pass: usize,
        /// Species id.
        species: u32,
        /// This rank.
        rank: usize,
        /// Particle index the mover referred to.
        index: u32,
    },
    /// A face's neighbor entry decodes to nothing usable; the particle
    /// was absorbed.
    UnknownBoundaryCode {
        /// Zero-based pass.
        pass: usize,
        /// This rank.
        rank: usize,
        /// Face the particle left through.
        face: Face,
        /// The raw neighbor entry.
        code: i64,
    },
    /// A neighbor cell is owned by a rank other than the one across the
    /// face; the particle was absorbed.
    PeerMismatch {
        /// Zero-based pass.
        pass: usize,
        /// This rank.
        rank: usize,
        /// Face the particle left through.
        face: Face,
        /// Global neighbor cell id.
        cell: i64,
        /// Rank owning `cell`.
        owner: usize,
    },
    /// Records arrived from a neighbor with no room left to inject them.
    RemoteInjectionOverflow {
        /// This rank.
        rank: usize,
        /// Port the records arrived on.
        face: Face,
        /// Records dropped.
        left: usize,
        /// Live particles at the time.
        np: usize,
        /// Particle capacity.
        max_np: usize,
        /// Movers at the time.
        nm: usize,
        /// Mover capacity.
        max_nm: usize,
    },
    /// Locally produced records found no room.
    CustomInjectionOverflow {
        /// This rank.
        rank: usize,
        /// Records dropped.
        left: usize,
    },
    /// A boundary handler emitted a record for a cell this rank does not
    /// own; the record was dropped.
    InvalidEmission {
        /// This rank.
        rank: usize,
        /// Index of the emitting handler.
        handler: usize,
        /// The offending cell.
        cell: i32,
    },
    /// The mover list was not strictly increasing and was repaired.
    UnorderedMovers {
        /// This rank.
        rank: usize,
        /// Duplicate entries removed while repairing.
        removed: usize,
    },
    /// Movers remained after the last pass; their particles stay put.
    UnprocessedMovers {
        /// This rank.
        rank: usize,
        /// Movers left over.
        count: usize,
    },
}

impl ExchangeWarning {
    /// Log at `WARN` and hand the warning back.
    pub(crate) fn emit(self) -> Self {
        tracing::warn!(kind = self.kind(), "{self}");
        self
    }

    /// Short machine-readable name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnresolvedMover { .. } => "unresolved_mover",
            Self::UnknownBoundaryCode { .. } => "unknown_boundary_code",
            Self::PeerMismatch { .. } => "peer_mismatch",
            Self::RemoteInjectionOverflow { .. } => "remote_injection_overflow",
            Self::CustomInjectionOverflow { .. } => "custom_injection_overflow",
            Self::InvalidEmission { .. } => "invalid_emission",
            Self::UnorderedMovers { .. } => "unordered_movers",
            Self::UnprocessedMovers { .. } => "unprocessed_movers",
        }
    }
}

impl fmt::Display for ExchangeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedMover {
                pass,
                species,
                rank,
                index,
            } => write!(
                f,
                "unknown boundary interaction for particle {index}, using absorption \
                 (pass={pass}, species={species}, rank={rank})"
            ),
            Self::UnknownBoundaryCode {
                pass,
                rank,
                face,
                code,
            } => write!(
                f,
                "unknown boundary code {code} on {face}, using absorption (pass={pass}, rank={rank})"
            ),
            Self::PeerMismatch {
                pass,
                rank,
                face,
                cell,
                owner,
            } => write!(
                f,
                "cell {cell} across {face} belongs to rank {owner}, not the face peer, \
                 using absorption (pass={pass}, rank={rank})"
            ),
            Self::RemoteInjectionOverflow {
                rank,
                face,
                left,
                np,
                max_np,
                nm,
                max_nm,
            } => write!(
                f,
                "ran out of room for remote injection on {face} of rank {rank} \
                 ({left} left, np={np}, max_np={max_np}, nm={nm}, max_nm={max_nm})"
            ),
            Self::CustomInjectionOverflow { rank, left } => write!(
                f,
                "ran out of room for custom boundary injection on rank {rank} ({left} left)"
            ),
            Self::InvalidEmission {
                rank,
                handler,
                cell,
            } => write!(
                f,
                "boundary handler {handler} emitted into cell {cell} not owned by rank {rank}"
            ),
            Self::UnorderedMovers { rank, removed } => write!(
                f,
                "mover list on rank {rank} was not strictly increasing, \
                 sorted and removed {removed} duplicates"
            ),
            Self::UnprocessedMovers { rank, count } => {
                write!(f, "ignoring {count} unprocessed movers on rank {rank}")
            }
        }
    }
}
