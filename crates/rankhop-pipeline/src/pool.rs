//! Fan-out of one dispatch over several workers.

use crate::error::PipelineError;
use crate::registry::{PipelineArgs, PipelineId, PipelineRegistry};
use crate::worker::PipelineWorker;
use std::sync::Arc;

/// A fixed set of [`PipelineWorker`]s sharing one registry.
///
/// A dispatch gives worker `k` pipeline rank `k` of `len()`, starts all
/// of them, then waits for every completion.
#[derive(Debug)]
pub struct PipelinePool {
    workers: Vec<PipelineWorker>,
}

impl PipelinePool {
    /// Start `n` workers.
    pub fn spawn(n: usize, registry: Arc<PipelineRegistry>) -> Result<Self, PipelineError> {
        if n == 0 {
            return Err(PipelineError::EmptyPool);
        }
        let workers = (0..n)
            .map(|k| PipelineWorker::spawn(format!("rankhop-pipeline-{k}"), Arc::clone(&registry)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { workers })
    }

    /// Number of workers.
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    /// Always `false`; a pool has at least one worker.
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Run pipeline `id` on every worker with the same `token`.
    ///
    /// Waits for all workers even if one fails, then returns the first
    /// error.
    pub fn dispatch(&mut self, id: PipelineId, token: u64) -> Result<(), PipelineError> {
        let n_pipeline = self.workers.len() as u32;
        let mut first_error = None;
        let mut started = Vec::with_capacity(self.workers.len());
        for (rank, worker) in self.workers.iter_mut().enumerate() {
            let args = PipelineArgs {
                token,
                pipeline_rank: rank as u32,
                n_pipeline,
            };
            match worker.start(id, args) {
                Ok(()) => started.push(rank),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        for rank in started {
            if let Err(e) = self.workers[rank].wait() {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Stop and join every worker.
    ///
    /// Returns the number of pipelines each worker ran, in rank order.
    pub fn shutdown(self) -> Result<Vec<usize>, PipelineError> {
        self.workers.into_iter().map(PipelineWorker::shutdown).collect()
    }
}
