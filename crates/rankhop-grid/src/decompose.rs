//! Regular box decomposition of a rectangular domain.
//!
//! The global domain of `nx × ny × nz` cells is split into a
//! `px × py × pz` grid of equal rank boxes. Rank `r` sits at box
//! coordinate `(r % px, (r / px) % py, r / (px * py))`, owns
//! `cells_per_rank()` consecutive global ids, and numbers its cells
//! x-fastest.

use crate::code::NeighborCode;
use crate::error::GridError;
use crate::topology::{FacePeer, GridTopology};
use rankhop_core::{Axis, Face};

/// How particles behave at a face of the global domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlobalBoundary {
    /// Wrap to the opposite face of the domain.
    Periodic,
    /// Destroy particles.
    Absorb,
    /// Reflect particles in the advance step.
    Reflect,
    /// Hand particles to custom boundary handler `h`.
    Custom(usize),
}

impl GlobalBoundary {
    fn code(self) -> Option<i64> {
        match self {
            Self::Periodic => None,
            Self::Absorb => Some(NeighborCode::Absorb.encode()),
            Self::Reflect => Some(NeighborCode::Reflect.encode()),
            Self::Custom(h) => Some(NeighborCode::Custom(h).encode()),
        }
    }
}

/// Validated description of a box-decomposed domain.
///
/// # Examples
///
/// ```
/// use rankhop_core::Face;
/// use rankhop_grid::{BoxDecomposition, GlobalBoundary};
///
/// let decomp = BoxDecomposition::new([8, 4, 4], [2, 1, 1], [GlobalBoundary::Periodic; 6]).unwrap();
/// let rank0 = decomp.topology(0).unwrap();
/// assert_eq!(rank0.local_cell_count(), 64);
/// assert_eq!(rank0.remote_peer(Face::PosX), Some(1));
/// assert_eq!(rank0.remote_peer(Face::NegX), Some(1));
/// assert_eq!(rank0.remote_peer(Face::PosY), None); // wraps onto itself
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct BoxDecomposition {
    global: [u32; 3],
    ranks: [u32; 3],
    local: [u32; 3],
    boundary: [GlobalBoundary; 6],
}

impl BoxDecomposition {
    /// Split `global` cells over `ranks` boxes with the given domain faces.
    ///
    /// `boundary` is indexed by [`Face::index`].
    pub fn new(
        global: [u32; 3],
        ranks: [u32; 3],
        boundary: [GlobalBoundary; 6],
    ) -> Result<Self, GridError> {
        let mut local = [0u32; 3];
        for axis in Axis::ALL {
            let a = axis.index();
            if global[a] == 0 || ranks[a] == 0 {
                return Err(GridError::EmptyDimension { axis });
            }
            if global[a] % ranks[a] != 0 {
                return Err(GridError::Indivisible {
                    axis,
                    cells: global[a],
                    ranks: ranks[a],
                });
            }
            local[a] = global[a] / ranks[a];
            let lo = boundary[Face::from_axis(axis, false).index()];
            let hi = boundary[Face::from_axis(axis, true).index()];
            if (lo == GlobalBoundary::Periodic) != (hi == GlobalBoundary::Periodic) {
                return Err(GridError::AsymmetricPeriodic { axis });
            }
        }
        let cells = global.iter().map(|&g| g as u64).product::<u64>();
        if cells > i32::MAX as u64 {
            return Err(GridError::TooManyCells { cells });
        }
        Ok(Self {
            global,
            ranks,
            local,
            boundary,
        })
    }

    /// Total number of ranks.
    pub fn nproc(&self) -> usize {
        self.ranks.iter().map(|&p| p as usize).product()
    }

    /// Cells owned by every rank.
    pub fn cells_per_rank(&self) -> usize {
        self.local.iter().map(|&l| l as usize).product()
    }

    /// Cell dimensions of one rank box.
    pub fn local_dims(&self) -> [u32; 3] {
        self.local
    }

    /// Global cell dimensions.
    pub fn global_dims(&self) -> [u32; 3] {
        self.global
    }

    /// Box coordinate of `rank`.
    pub fn rank_coords(&self, rank: usize) -> [u32; 3] {
        let [px, py, _] = self.ranks.map(|p| p as usize);
        [
            (rank % px) as u32,
            ((rank / px) % py) as u32,
            (rank / (px * py)) as u32,
        ]
    }

    /// Rank at box coordinate `coords`.
    pub fn rank_at(&self, coords: [u32; 3]) -> usize {
        let [px, py, _] = self.ranks.map(|p| p as usize);
        coords[0] as usize + px * (coords[1] as usize + py * coords[2] as usize)
    }

    /// Local index of the cell at local coordinate `xyz`.
    pub fn local_cell(&self, xyz: [u32; 3]) -> u32 {
        let [lx, ly, _] = self.local;
        xyz[0] + lx * (xyz[1] + ly * xyz[2])
    }

    /// Local coordinate of local cell `cell`.
    pub fn local_coords(&self, cell: u32) -> [u32; 3] {
        let [lx, ly, _] = self.local;
        [cell % lx, (cell / lx) % ly, cell / (lx * ly)]
    }

    /// Rank across `face` of `rank`'s box, wrapping periodic axes.
    fn face_neighbor_rank(&self, rank: usize, face: Face) -> Option<usize> {
        let a = face.axis().index();
        let mut coords = self.rank_coords(rank);
        let p = self.ranks[a];
        if face.is_negative() {
            if coords[a] == 0 {
                if self.boundary[face.index()] != GlobalBoundary::Periodic {
                    return None;
                }
                coords[a] = p - 1;
            } else {
                coords[a] -= 1;
            }
        } else if coords[a] + 1 == p {
            if self.boundary[face.index()] != GlobalBoundary::Periodic {
                return None;
            }
            coords[a] = 0;
        } else {
            coords[a] += 1;
        }
        Some(self.rank_at(coords))
    }

    /// Build the topology seen by `rank`.
    pub fn topology(&self, rank: usize) -> Result<GridTopology, GridError> {
        let nproc = self.nproc();
        if rank >= nproc {
            return Err(GridError::InvalidRank { rank, nproc });
        }
        let per_rank = self.cells_per_rank() as i64;
        let range: Vec<i64> = (0..=nproc as i64).map(|r| r * per_rank).collect();

        let mut face_peers = [FacePeer::External; 6];
        for face in Face::ALL {
            if let Some(peer) = self.face_neighbor_rank(rank, face) {
                face_peers[face.index()] = FacePeer::Rank(peer);
            }
        }

        let cells = self.cells_per_rank();
        let mut neighbors = Vec::with_capacity(6 * cells);
        for cell in 0..cells as u32 {
            let xyz = self.local_coords(cell);
            for face in Face::ALL {
                neighbors.push(self.neighbor_entry(rank, xyz, face, &range));
            }
        }

        GridTopology::new(rank, nproc, range, neighbors, face_peers)
    }

    fn neighbor_entry(&self, rank: usize, xyz: [u32; 3], face: Face, range: &[i64]) -> i64 {
        let a = face.axis().index();
        let l = self.local[a];
        let mut next = xyz;
        let leaves_box = if face.is_negative() {
            xyz[a] == 0
        } else {
            xyz[a] + 1 == l
        };
        if !leaves_box {
            if face.is_negative() {
                next[a] -= 1;
            } else {
                next[a] += 1;
            }
            return range[rank] + self.local_cell(next) as i64;
        }
        match self.face_neighbor_rank(rank, face) {
            Some(peer) => {
                next[a] = if face.is_negative() { l - 1 } else { 0 };
                range[peer] + self.local_cell(next) as i64
            }
            // Non-periodic domain face: the code is always present.
            None => self.boundary[face.index()]
                .code()
                .unwrap_or(NeighborCode::Absorb.encode()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{ABSORB_PARTICLES, REFLECT_PARTICLES};

    fn all(b: GlobalBoundary) -> [GlobalBoundary; 6] {
        [b; 6]
    }

    #[test]
    fn rejects_indivisible_split() {
        let err = BoxDecomposition::new([5, 4, 4], [2, 1, 1], all(GlobalBoundary::Absorb));
        assert_eq!(
            err,
            Err(GridError::Indivisible {
                axis: Axis::X,
                cells: 5,
                ranks: 2
            })
        );
    }

    #[test]
    fn rejects_half_periodic_axis() {
        let mut b = all(GlobalBoundary::Absorb);
        b[Face::NegY.index()] = GlobalBoundary::Periodic;
        let err = BoxDecomposition::new([4, 4, 4], [1, 1, 1], b);
        assert_eq!(err, Err(GridError::AsymmetricPeriodic { axis: Axis::Y }));
    }

    #[test]
    fn single_rank_periodic_wraps_locally() {
        let d = BoxDecomposition::new([2, 2, 2], [1, 1, 1], all(GlobalBoundary::Periodic)).unwrap();
        let g = d.topology(0).unwrap();
        assert!(!g.has_remote_faces());
        // Cell (0,0,0) across -x wraps to (1,0,0) = local 1.
        assert_eq!(g.neighbor(0, Face::NegX), Some(1));
        assert_eq!(g.neighbor(0, Face::PosX), Some(1));
        assert_eq!(g.neighbor(0, Face::NegZ), Some(4));
    }

    #[test]
    fn absorbing_domain_uses_codes() {
        let mut b = all(GlobalBoundary::Absorb);
        b[Face::PosZ.index()] = GlobalBoundary::Reflect;
        b[Face::NegZ.index()] = GlobalBoundary::Custom(2);
        let d = BoxDecomposition::new([1, 1, 1], [1, 1, 1], b).unwrap();
        let g = d.topology(0).unwrap();
        assert_eq!(g.neighbor(0, Face::NegX), Some(ABSORB_PARTICLES));
        assert_eq!(g.neighbor(0, Face::PosZ), Some(REFLECT_PARTICLES));
        assert_eq!(g.neighbor(0, Face::NegZ), Some(-5));
        assert_eq!(g.face_peer(Face::NegX), FacePeer::External);
    }

    #[test]
    fn neighbors_cross_into_adjacent_rank() {
        let d = BoxDecomposition::new([4, 1, 1], [2, 1, 1], all(GlobalBoundary::Periodic)).unwrap();
        let g0 = d.topology(0).unwrap();
        let g1 = d.topology(1).unwrap();
        // Rank 0 owns globals 0,1; rank 1 owns 2,3.
        assert_eq!(g0.neighbor(1, Face::PosX), Some(2));
        assert_eq!(g0.neighbor(0, Face::NegX), Some(3));
        assert_eq!(g1.neighbor(0, Face::NegX), Some(1));
        assert_eq!(g1.neighbor(1, Face::PosX), Some(0));
        assert_eq!(g0.owner_of(3), Some(1));
    }

    #[test]
    fn neighbor_tables_are_mutually_consistent() {
        // Every cross-rank link must be mirrored by the far cell's opposite face.
        let d = BoxDecomposition::new([4, 6, 2], [2, 3, 1], all(GlobalBoundary::Periodic)).unwrap();
        let topos: Vec<_> = (0..d.nproc()).map(|r| d.topology(r).unwrap()).collect();
        for g in &topos {
            for cell in 0..g.local_cell_count() as u32 {
                let me = g.base_offset(g.rank()).unwrap() + cell as i64;
                for face in Face::ALL {
                    let nn = g.neighbor(cell, face).unwrap();
                    let owner = g.owner_of(nn).unwrap();
                    let far = &topos[owner];
                    let far_cell = far.local_index(nn).unwrap();
                    assert_eq!(far.neighbor(far_cell, face.opposite()), Some(me));
                }
            }
        }
    }

    #[test]
    fn rank_coords_round_trip() {
        let d = BoxDecomposition::new([6, 6, 6], [3, 2, 1], all(GlobalBoundary::Absorb)).unwrap();
        for r in 0..d.nproc() {
            assert_eq!(d.rank_at(d.rank_coords(r)), r);
        }
    }
}
