//! Test utilities and mock handlers for rankhop development.
//!
//! Provides a [`RankWorld`] bundle holding everything one rank passes to
//! an exchange, particle builders, mock boundary handlers in
//! [`fixtures`], and [`spawn_ranks`] for running a channel mesh on
//! scoped threads.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{CallCounter, CountingHandler, FixedEmitter, StrayEmitter};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rankhop_boundary::HandlerTable;
use rankhop_comm::{ChannelMesh, ChannelTransport};
use rankhop_core::{CellBuffer, Face, Mover, MoverList, Particle, ParticleStore, Species};
use rankhop_grid::GridTopology;

/// Field components per cell in test worlds.
pub const FIELD_STRIDE: usize = 6;

/// Accumulator components per cell in test worlds.
pub const ACCUMULATOR_STRIDE: usize = 4;

/// One rank's particle state, buffers and handlers.
///
/// Fields are public so tests can borrow them piecewise into an
/// exchange context.
pub struct RankWorld {
    pub particles: ParticleStore,
    pub movers: MoverList,
    pub fields: CellBuffer,
    pub accumulators: CellBuffer,
    pub grid: GridTopology,
    pub species: Species,
    pub handlers: HandlerTable,
    pub rng: ChaCha8Rng,
}

impl RankWorld {
    /// Empty world on `grid` with room for `capacity` particles and movers.
    pub fn new(grid: GridTopology, capacity: usize) -> Self {
        Self::with_capacities(grid, capacity, capacity)
    }

    pub fn with_capacities(grid: GridTopology, max_np: usize, max_nm: usize) -> Self {
        let cells = grid.local_cell_count();
        let seed = grid.rank() as u64;
        Self {
            particles: ParticleStore::with_capacity(max_np),
            movers: MoverList::with_capacity(max_nm),
            fields: CellBuffer::zeroed(cells, FIELD_STRIDE),
            accumulators: CellBuffer::zeroed(cells, ACCUMULATOR_STRIDE),
            grid,
            species: Species::new(0, "electron", -1.0, 1.0),
            handlers: HandlerTable::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Append a particle that is not moving. Returns its index.
    pub fn add_resting(&mut self, particle: Particle) -> u32 {
        let index = self.particles.len() as u32;
        self.particles
            .push(particle)
            .unwrap_or_else(|_| panic!("particle store full at {index}"));
        index
    }

    /// Append a particle with a mover carrying `disp`. Returns its index.
    ///
    /// Movers must be added in particle order to stay strictly increasing.
    pub fn add_moving(&mut self, particle: Particle, disp: [f32; 3]) -> u32 {
        let index = self.add_resting(particle);
        self.movers
            .push(Mover::new(index, disp))
            .unwrap_or_else(|_| panic!("mover list full at {index}"));
        index
    }

    /// Total weight of live particles.
    pub fn weight(&self) -> f64 {
        self.particles.total_weight()
    }
}

// ── Particle builders ───────────────────────────────────────────

/// Particle at the center of `cell`, at rest, with unit weight.
pub fn centered(cell: u32) -> Particle {
    Particle {
        offset: [0.0; 3],
        cell,
        momentum: [0.0; 3],
        weight: 1.0,
    }
}

/// Particle in `cell` sitting on `face` and moving out through it.
///
/// Perpendicular offsets are distinct and nonzero so a test can tell
/// which axis an exchange negated.
pub fn leaving(cell: u32, face: Face) -> Particle {
    let a = face.axis().index();
    let mut offset = [0.25, -0.5, 0.75];
    let mut momentum = [0.125, 0.25, -0.375];
    offset[a] = face.sign();
    momentum[a] = face.sign();
    Particle {
        offset,
        cell,
        momentum,
        weight: 1.0,
    }
}

// ── Multi-rank harness ──────────────────────────────────────────

/// Run `body` once per rank of a fresh channel mesh, each on its own
/// scoped thread, and collect the results in rank order.
///
/// # Panics
///
/// Propagates a panic from any rank.
pub fn spawn_ranks<F, R>(nproc: usize, max_buffer_bytes: usize, body: F) -> Vec<R>
where
    F: Fn(ChannelTransport) -> R + Sync,
    R: Send,
{
    let mesh = ChannelMesh::build(nproc, max_buffer_bytes);
    std::thread::scope(|s| {
        let handles: Vec<_> = mesh
            .into_iter()
            .map(|transport| {
                let body = &body;
                s.spawn(move || body(transport))
            })
            .collect();
        handles
            .into_iter()
            .map(|h| match h.join() {
                Ok(r) => r,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    })
}
