//! Particle boundary exchange for domain-decomposed particle-in-cell codes.
//!
//! After the advance step, every particle that stopped on a cell face
//! has a [`Mover`](rankhop_core::Mover). [`BoundaryExchange::run`]
//! resolves them in up to `max_passes` passes. Each pass:
//!
//! 1. **Classify and compact** ([`classify`], [`compact`]): movers are
//!    taken last to first. The first face the particle leaves through,
//!    in `-x, -y, -z, +x, +y, +z` order, decides its route: absorbed,
//!    staged for another rank, wrapped onto a local cell, or handed to a
//!    custom handler. The particle is then swap-removed.
//! 2. **Remote exchange** ([`protocol`]): counts, then envelopes, are
//!    traded with every face neighbor on another rank. Arrivals are
//!    injected up to capacity.
//! 3. **Local injection** ([`inject`]): wrapped particles and handler
//!    emissions are injected from the [`InjectorScratch`], most recent
//!    first.
//!
//! Injected particles with residual displacement are walked on
//! ([`walk`]); those that stop on another face get a new mover and are
//! resolved in the next pass.
//!
//! Fatal problems are returned as [`ExchangeError`]. Anomalies that only
//! cost a particle are logged through `tracing` and collected as
//! [`ExchangeWarning`]s in the [`ExchangeReport`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod classify;
pub mod compact;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod exchange;
pub mod inject;
pub mod protocol;
pub mod report;
pub mod scratch;
pub mod walk;
pub mod warning;

pub use classify::Route;
pub use config::{ConfigError, ExchangeConfig};
pub use error::ExchangeError;
pub use exchange::{BoundaryExchange, ExchangeContext};
pub use report::ExchangeReport;
pub use scratch::InjectorScratch;
pub use walk::{CellWalk, Completion, MoverCompletion};
pub use warning::ExchangeWarning;
