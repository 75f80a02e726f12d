//! Benchmark profiles for the rankhop boundary exchange.
//!
//! - [`periodic_box`] / [`walled_box`]: single-rank topologies
//! - [`seeded_state`]: deterministic particle population with a fixed
//!   share of boundary movers
//! - [`run_exchange`]: one exchange over a [`RankState`]

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rankhop_boundary::HandlerTable;
use rankhop_comm::Transport;
use rankhop_core::{CellBuffer, Face, Mover, MoverList, Particle, ParticleStore, Species};
use rankhop_exchange::{BoundaryExchange, ExchangeContext, ExchangeError, ExchangeReport};
use rankhop_grid::{BoxDecomposition, GlobalBoundary, GridTopology};

/// Mutable per-rank arrays an exchange rewrites.
#[derive(Clone, Debug)]
pub struct RankState {
    /// Local particles.
    pub particles: ParticleStore,
    /// Pending movers.
    pub movers: MoverList,
    /// Field buffer.
    pub fields: CellBuffer,
    /// Accumulator buffer.
    pub accumulators: CellBuffer,
}

/// Single rank owning a fully periodic `dims` box.
pub fn periodic_box(dims: [u32; 3]) -> GridTopology {
    walled_box(dims, GlobalBoundary::Periodic)
}

/// Single rank owning a `dims` box with the same treatment on every face.
///
/// # Panics
///
/// Panics if any dimension is zero.
pub fn walled_box(dims: [u32; 3], boundary: GlobalBoundary) -> GridTopology {
    BoxDecomposition::new(dims, [1, 1, 1], [boundary; 6])
        .and_then(|d| d.topology(0))
        .unwrap_or_else(|e| panic!("invalid benchmark box {dims:?}: {e}"))
}

/// `n` particles in random cells of `grid`; every `leave_every`-th sits on
/// a random face of its cell moving outward and gets a mover.
///
/// Capacity is twice `n` so injections never overflow.
pub fn seeded_state(grid: &GridTopology, n: usize, leave_every: usize, seed: u64) -> RankState {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let cells = grid.local_cell_count() as u32;
    let mut particles = Vec::with_capacity(n);
    let mut movers = Vec::new();
    for i in 0..n {
        let mut p = Particle {
            offset: [
                rng.random_range(-0.9..0.9),
                rng.random_range(-0.9..0.9),
                rng.random_range(-0.9..0.9),
            ],
            cell: rng.random_range(0..cells),
            momentum: [
                rng.random_range(-0.5..0.5),
                rng.random_range(-0.5..0.5),
                rng.random_range(-0.5..0.5),
            ],
            weight: 1.0,
        };
        if leave_every > 0 && i % leave_every == 0 {
            let face = Face::ALL[rng.random_range(0..6)];
            let a = face.axis().index();
            p.offset[a] = face.sign();
            p.momentum[a] = face.sign();
            let mut disp = [0.0; 3];
            disp[a] = face.sign() * rng.random_range(0.0..1.5);
            movers.push(Mover::new(i as u32, disp));
        }
        particles.push(p);
    }
    let local = grid.local_cell_count();
    RankState {
        particles: ParticleStore::from_particles(particles, 2 * n),
        movers: MoverList::from_movers(movers, 2 * n),
        fields: CellBuffer::zeroed(local, 6),
        accumulators: CellBuffer::zeroed(local, 4),
    }
}

/// Run one exchange over `state`.
pub fn run_exchange(
    exchange: &mut BoundaryExchange,
    state: &mut RankState,
    grid: &GridTopology,
    handlers: &HandlerTable,
    transport: &mut dyn Transport,
    rng: &mut ChaCha8Rng,
) -> Result<ExchangeReport, ExchangeError> {
    let species = Species::new(0, "electron", -1.0, 1.0);
    exchange.run(ExchangeContext {
        particles: &mut state.particles,
        movers: &mut state.movers,
        fields: &mut state.fields,
        accumulators: &mut state.accumulators,
        grid,
        species: &species,
        handlers,
        transport,
        rng,
    })
}
