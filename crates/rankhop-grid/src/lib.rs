//! Static grid topology for rankhop.
//!
//! A [`GridTopology`] describes the part of a decomposed domain that one
//! rank owns: the global cell-id range table, the six-entry neighbor row
//! of every local cell, and the rank on the far side of each face of the
//! local box. Neighbor entries are either global cell ids or negative
//! [`code`]s for absorbing, reflecting and custom boundaries.
//!
//! [`BoxDecomposition`] builds consistent topologies for every rank of a
//! rectangular domain split into a regular grid of rank boxes.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod code;
pub mod decompose;
pub mod error;
pub mod topology;

pub use code::{NeighborCode, ABSORB_PARTICLES, REFLECT_PARTICLES};
pub use decompose::{BoxDecomposition, GlobalBoundary};
pub use error::GridError;
pub use topology::{FacePeer, GridTopology};
