//! Core types for rankhop particle boundary exchange.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the data model shared by every other crate in the workspace: the
//! dense [`ParticleStore`], the [`MoverList`] produced by the advance
//! step, the wire-neutral [`InjectorRecord`], the six cell [`Face`]s,
//! species metadata, opaque per-cell buffers, and input-validation
//! errors.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod buffer;
pub mod error;
pub mod face;
pub mod injector;
pub mod mover;
pub mod particle;
pub mod species;

pub use buffer::CellBuffer;
pub use error::InputError;
pub use face::{Axis, Face};
pub use injector::InjectorRecord;
pub use mover::{Mover, MoverList};
pub use particle::{Particle, ParticleStore};
pub use species::Species;
