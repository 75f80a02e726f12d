//! Mailbox-driven pipeline workers.
//!
//! A worker thread runs a dispatch loop over two 32-bit mailboxes. The
//! host writes a pipeline id, a 64-bit argument token as two words
//! (high, low), the worker's `pipeline_rank` and the pipeline count; the
//! worker runs the registered pipeline and answers with
//! [`PIPELINE_COMPLETE`]. Id 0 stops the loop.
//!
//! [`PipelineWorker`] owns one such thread; [`PipelinePool`] fans one
//! dispatch out over several workers, giving each its pipeline rank.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod mailbox;
pub mod pool;
pub mod registry;
pub mod worker;

pub use error::PipelineError;
pub use mailbox::{run_dispatch_loop, PIPELINE_COMPLETE, STOP};
pub use pool::PipelinePool;
pub use registry::{PipelineArgs, PipelineId, PipelineRegistry};
pub use worker::PipelineWorker;
