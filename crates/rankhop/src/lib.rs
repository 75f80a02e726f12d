//! rankhop: particle boundary exchange for domain-decomposed
//! particle-in-cell simulations.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all rankhop sub-crates. For most users, adding `rankhop` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use rankhop::prelude::*;
//!
//! // One rank owning a 2×1×1 box that wraps along x.
//! let mut faces = [GlobalBoundary::Absorb; 6];
//! faces[Face::NegX.index()] = GlobalBoundary::Periodic;
//! faces[Face::PosX.index()] = GlobalBoundary::Periodic;
//! let grid = BoxDecomposition::new([2, 1, 1], [1, 1, 1], faces)
//!     .unwrap()
//!     .topology(0)
//!     .unwrap();
//!
//! // A particle on the +x face of cell 1, moving outward.
//! let leaving = Particle {
//!     offset: [1.0, 0.0, 0.0],
//!     cell: 1,
//!     momentum: [1.0, 0.0, 0.0],
//!     weight: 1.0,
//! };
//! let mut particles = ParticleStore::from_particles(vec![leaving], 16);
//! let mut movers = MoverList::from_movers(vec![Mover::new(0, [0.0; 3])], 16);
//! let mut fields = CellBuffer::zeroed(2, 6);
//! let mut accumulators = CellBuffer::zeroed(2, 4);
//! let species = Species::new(0, "electron", -1.0, 1.0);
//! let handlers = HandlerTable::new();
//! let mut transport = SoloTransport::default();
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//!
//! let mut exchange = BoundaryExchange::new(ExchangeConfig::default()).unwrap();
//! let report = exchange
//!     .run(ExchangeContext {
//!         particles: &mut particles,
//!         movers: &mut movers,
//!         fields: &mut fields,
//!         accumulators: &mut accumulators,
//!         grid: &grid,
//!         species: &species,
//!         handlers: &handlers,
//!         transport: &mut transport,
//!         rng: &mut rng,
//!     })
//!     .unwrap();
//!
//! // The particle wrapped onto the -x face of cell 0.
//! assert_eq!(report.wrapped, 1);
//! assert_eq!(particles.get(0).unwrap().cell, 0);
//! assert_eq!(particles.get(0).unwrap().offset[0], -1.0);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `rankhop-core` | Faces, particles, movers, injector records, buffers |
//! | [`grid`] | `rankhop-grid` | Neighbor codes, per-rank topology, box decomposition |
//! | [`comm`] | `rankhop-comm` | Transport trait, channel and solo transports, wire format |
//! | [`boundary`] | `rankhop-boundary` | Boundary handler trait, registry, stock handlers |
//! | [`exchange`] | `rankhop-exchange` | The multi-pass boundary exchange |
//! | [`pipeline`] | `rankhop-pipeline` | Mailbox-driven pipeline workers |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core particle data model (`rankhop-core`).
pub use rankhop_core as types;

/// Grid topology and decomposition (`rankhop-grid`).
///
/// [`grid::BoxDecomposition`] builds the [`grid::GridTopology`] of any
/// rank of a regular box split.
pub use rankhop_grid as grid;

/// Rank-to-rank transports (`rankhop-comm`).
///
/// [`comm::ChannelMesh`] runs ranks as threads of one process;
/// [`comm::SoloTransport`] serves single-rank runs.
pub use rankhop_comm as comm;

/// Custom boundary handlers (`rankhop-boundary`).
pub use rankhop_boundary as boundary;

/// The boundary exchange (`rankhop-exchange`).
///
/// [`exchange::BoundaryExchange`] is the entry point.
pub use rankhop_exchange as exchange;

/// Pipeline workers (`rankhop-pipeline`).
pub use rankhop_pipeline as pipeline;

/// Common imports for typical rankhop usage.
///
/// ```rust
/// use rankhop::prelude::*;
/// ```
pub mod prelude {
    // Data model
    pub use rankhop_core::{
        CellBuffer, Face, InjectorRecord, Mover, MoverList, Particle, ParticleStore, Species,
    };

    // Grid
    pub use rankhop_grid::{BoxDecomposition, GlobalBoundary, GridTopology};

    // Transport
    pub use rankhop_comm::{ChannelMesh, SoloTransport, Transport};

    // Boundary handlers
    pub use rankhop_boundary::{
        Absorber, BoundaryHandler, HandlerContext, HandlerTable, Incident, SpecularReflector,
        ThermalReflux,
    };

    // Exchange
    pub use rankhop_exchange::{
        BoundaryExchange, ExchangeConfig, ExchangeContext, ExchangeError, ExchangeReport,
        ExchangeWarning,
    };
}
