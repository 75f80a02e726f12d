//! Face classification: where does a departing particle go?

use rankhop_core::{Face, InjectorRecord, Mover, Particle};
use rankhop_grid::{GridTopology, NeighborCode};

/// Destination of one mover's particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Route {
    /// Destroyed at an absorbing face.
    Absorb,
    /// Shipped to `peer` through `face`.
    Send {
        /// Face crossed.
        face: Face,
        /// Destination rank.
        peer: usize,
        /// Record with the cell already local to `peer`.
        record: InjectorRecord,
    },
    /// Reinjected on this rank after wrapping onto one of its own cells.
    Wrap {
        /// Record with a local cell index.
        record: InjectorRecord,
    },
    /// Handed to custom handler `handler`.
    Custom {
        /// Face crossed.
        face: Face,
        /// Handler index.
        handler: usize,
    },
    /// The neighbor entry is unusable. Absorbed with a warning.
    UnknownCode {
        /// Face crossed.
        face: Face,
        /// Raw neighbor entry.
        code: i64,
    },
    /// The neighbor cell's owner is not the rank across the face.
    /// Absorbed with a warning.
    PeerMismatch {
        /// Face crossed.
        face: Face,
        /// Global neighbor cell.
        cell: i64,
        /// Its owner.
        owner: usize,
    },
    /// No face test fired, or the particle's cell is not on this grid.
    /// Absorbed with a warning.
    Unresolved,
}

/// First face, in `-x, -y, -z, +x, +y, +z` order, that `particle` sits
/// on while moving outward.
pub fn exit_face(particle: &Particle) -> Option<Face> {
    Face::ALL
        .into_iter()
        .find(|&face| particle.is_leaving_through(face))
}

/// Injector recreating `particle` just inside the cell across `face`.
///
/// The offset on the crossed axis is negated; perpendicular offsets,
/// momentum, weight and the mover's residual displacement carry over.
pub fn crossing_record(particle: &Particle, mover: &Mover, face: Face, cell: i32) -> InjectorRecord {
    let mut record = InjectorRecord::from_particle(particle, mover);
    let a = face.axis().index();
    record.offset[a] = -record.offset[a];
    record.cell = cell;
    record
}

/// Resolve where the particle referenced by `mover` goes.
///
/// `handlers` is the number of registered custom handlers. A particle in
/// a cell the grid does not know is [`Route::Unresolved`]; the exchange
/// rejects such movers before the first pass.
pub fn classify(particle: &Particle, mover: &Mover, grid: &GridTopology, handlers: usize) -> Route {
    let Some(face) = exit_face(particle) else {
        return Route::Unresolved;
    };
    let Some(raw) = grid.neighbor(particle.cell, face) else {
        return Route::Unresolved;
    };
    match NeighborCode::decode(raw) {
        NeighborCode::Absorb => Route::Absorb,
        NeighborCode::Custom(handler) if handler < handlers => Route::Custom { face, handler },
        NeighborCode::Custom(_) | NeighborCode::Reflect => Route::UnknownCode { face, code: raw },
        NeighborCode::Cell(global) => resolve_cell(particle, mover, grid, face, global),
    }
}

fn resolve_cell(
    particle: &Particle,
    mover: &Mover,
    grid: &GridTopology,
    face: Face,
    global: i64,
) -> Route {
    let unknown = Route::UnknownCode { face, code: global };
    let Some(owner) = grid.owner_of(global) else {
        return unknown;
    };
    let Some(local) = grid
        .base_offset(owner)
        .and_then(|base| i32::try_from(global - base).ok())
    else {
        return unknown;
    };
    if owner == grid.rank() {
        return Route::Wrap {
            record: crossing_record(particle, mover, face, local),
        };
    }
    match grid.remote_peer(face) {
        Some(peer) if peer == owner => Route::Send {
            face,
            peer,
            record: crossing_record(particle, mover, face, local),
        },
        _ => Route::PeerMismatch {
            face,
            cell: global,
            owner,
        },
    }
}
