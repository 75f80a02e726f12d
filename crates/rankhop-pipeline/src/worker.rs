//! Host side of one pipeline worker thread.

use crate::error::PipelineError;
use crate::mailbox::{run_dispatch_loop, PIPELINE_COMPLETE, STOP};
use crate::registry::{PipelineArgs, PipelineId, PipelineRegistry};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Inbound mailbox depth: one full dispatch plus the stop word.
const INBOX_WORDS: usize = 6;

/// A thread running [`run_dispatch_loop`] over a shared registry.
///
/// Dropping a worker without [`shutdown`](Self::shutdown) stops and
/// joins the thread, discarding its result.
pub struct PipelineWorker {
    inbox: Sender<u32>,
    outbox: Receiver<u32>,
    handle: Option<JoinHandle<Result<usize, PipelineError>>>,
}

impl PipelineWorker {
    /// Start a worker thread named `name`.
    pub fn spawn(name: impl Into<String>, registry: Arc<PipelineRegistry>) -> Result<Self, PipelineError> {
        let (inbox, worker_inbox) = bounded(INBOX_WORDS);
        let (worker_outbox, outbox) = unbounded();
        let handle = thread::Builder::new()
            .name(name.into())
            .spawn(move || run_dispatch_loop(&registry, &worker_inbox, &worker_outbox))
            .map_err(|e| PipelineError::Spawn {
                reason: e.to_string(),
            })?;
        Ok(Self {
            inbox,
            outbox,
            handle: Some(handle),
        })
    }

    /// Post a dispatch without waiting for it to finish.
    pub fn start(&mut self, id: PipelineId, args: PipelineArgs) -> Result<(), PipelineError> {
        if id == STOP {
            return Err(PipelineError::UnknownPipeline { id });
        }
        let (high, low) = args.token_words();
        for word in [id, high, low, args.pipeline_rank, args.n_pipeline] {
            if self.inbox.send(word).is_err() {
                return Err(self.exit_error("writing dispatch"));
            }
        }
        Ok(())
    }

    /// Wait for the completion word of the last [`start`](Self::start).
    pub fn wait(&mut self) -> Result<(), PipelineError> {
        match self.outbox.recv() {
            Ok(PIPELINE_COMPLETE) => Ok(()),
            Ok(word) => Err(PipelineError::UnexpectedReply { word }),
            Err(_) => Err(self.exit_error("awaiting completion")),
        }
    }

    /// Run pipeline `id` and wait for it to complete.
    pub fn dispatch(&mut self, id: PipelineId, args: PipelineArgs) -> Result<(), PipelineError> {
        self.start(id, args)?;
        self.wait()
    }

    /// Stop the loop and join the thread.
    ///
    /// Returns the number of pipelines the worker ran.
    pub fn shutdown(mut self) -> Result<usize, PipelineError> {
        // A worker that already exited has closed its inbox.
        let _ = self.inbox.send(STOP);
        self.join()
    }

    fn join(&mut self) -> Result<usize, PipelineError> {
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| PipelineError::WorkerPanicked)?,
            None => Err(PipelineError::MailboxClosed {
                stage: "joining worker",
            }),
        }
    }

    /// The error that ended the worker's loop, once it is gone.
    fn exit_error(&mut self, stage: &'static str) -> PipelineError {
        match self.join() {
            Err(e) => e,
            Ok(_) => PipelineError::MailboxClosed { stage },
        }
    }
}

impl Drop for PipelineWorker {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = self.inbox.send(STOP);
            let _ = handle.join();
        }
    }
}

impl std::fmt::Debug for PipelineWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineWorker")
            .field("running", &self.handle.is_some())
            .finish()
    }
}
