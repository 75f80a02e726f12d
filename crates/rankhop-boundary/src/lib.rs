//! Custom boundary conditions for rankhop.
//!
//! A particle that crosses a face whose neighbor entry is a custom code
//! `-(h + 3)` is handed to handler `h` of a [`HandlerTable`]. The handler
//! sees the particle, its mover and the crossed face through an
//! [`Incident`], gets mutable access to the field and accumulator buffers
//! through a [`HandlerContext`], and may return one replacement particle
//! as an [`InjectorRecord`](rankhop_core::InjectorRecord). The incident
//! particle is always destroyed.
//!
//! # Stock handlers
//!
//! - [`Absorber`]: tallies absorbed weight into an accumulator slot.
//! - [`SpecularReflector`]: mirrors the normal momentum component.
//! - [`ThermalReflux`]: re-emits with a fresh Maxwellian flux momentum.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod absorber;
pub mod context;
pub mod error;
pub mod handler;
pub mod reflector;
pub mod reflux;
pub mod table;

pub use absorber::Absorber;
pub use context::HandlerContext;
pub use error::BoundaryError;
pub use handler::{BoundaryHandler, Incident};
pub use reflector::SpecularReflector;
pub use reflux::{ThermalReflux, ThermalRefluxBuilder};
pub use table::HandlerTable;
