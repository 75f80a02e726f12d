//! The worker-side dispatch loop.

use crate::error::PipelineError;
use crate::registry::{PipelineArgs, PipelineRegistry};
use crossbeam_channel::{Receiver, Sender};

/// Word a worker writes after each pipeline finishes.
pub const PIPELINE_COMPLETE: u32 = 2112;

/// Pipeline id that ends the loop.
pub const STOP: u32 = 0;

fn read(inbox: &Receiver<u32>, stage: &'static str) -> Result<u32, PipelineError> {
    inbox
        .recv()
        .map_err(|_| PipelineError::MailboxClosed { stage })
}

/// Serve dispatches from `inbox` until the stop word arrives.
///
/// Each dispatch is five words: id, token high, token low,
/// `pipeline_rank`, `n_pipeline`. Returns the number of pipelines run.
/// An unknown id ends the loop with an error before anything is
/// written back.
pub fn run_dispatch_loop(
    registry: &PipelineRegistry,
    inbox: &Receiver<u32>,
    outbox: &Sender<u32>,
) -> Result<usize, PipelineError> {
    let mut executed = 0;
    loop {
        let id = read(inbox, "reading pipeline id")?;
        if id == STOP {
            tracing::debug!(executed, "pipeline loop stopped");
            return Ok(executed);
        }
        let high = read(inbox, "reading token high word")?;
        let low = read(inbox, "reading token low word")?;
        let pipeline_rank = read(inbox, "reading pipeline rank")?;
        let n_pipeline = read(inbox, "reading pipeline count")?;
        let args = PipelineArgs {
            token: PipelineArgs::token_from_words(high, low),
            pipeline_rank,
            n_pipeline,
        };

        tracing::trace!(id, pipeline_rank, n_pipeline, "executing pipeline");
        registry.execute(id, args)?;
        executed += 1;

        outbox
            .send(PIPELINE_COMPLETE)
            .map_err(|_| PipelineError::MailboxClosed {
                stage: "writing completion",
            })?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn loop_runs_queued_dispatches_then_stops() {
        let total = Arc::new(AtomicU32::new(0));
        let mut reg = PipelineRegistry::new();
        let t = Arc::clone(&total);
        let id = reg
            .register("add", move |a: PipelineArgs| {
                t.fetch_add(a.token as u32 + a.pipeline_rank, Ordering::SeqCst);
            })
            .unwrap();

        let (host_tx, inbox) = unbounded();
        let (outbox, host_rx) = unbounded();
        for word in [id, 0, 5, 1, 2, id, 0, 7, 0, 2, STOP] {
            host_tx.send(word).unwrap();
        }

        assert_eq!(run_dispatch_loop(&reg, &inbox, &outbox), Ok(2));
        assert_eq!(total.load(Ordering::SeqCst), 13);
        let replies: Vec<u32> = host_rx.try_iter().collect();
        assert_eq!(replies, vec![PIPELINE_COMPLETE; 2]);
    }

    #[test]
    fn unknown_id_is_an_error() {
        let reg = PipelineRegistry::new();
        let (host_tx, inbox) = unbounded();
        let (outbox, host_rx) = unbounded();
        for word in [3, 0, 0, 0, 1] {
            host_tx.send(word).unwrap();
        }
        assert_eq!(
            run_dispatch_loop(&reg, &inbox, &outbox),
            Err(PipelineError::UnknownPipeline { id: 3 })
        );
        assert!(host_rx.try_recv().is_err());
    }

    #[test]
    fn truncated_dispatch_reports_stage() {
        let reg = PipelineRegistry::new();
        let (host_tx, inbox) = unbounded();
        let (outbox, _host_rx) = unbounded();
        host_tx.send(1).unwrap();
        host_tx.send(0).unwrap();
        drop(host_tx);
        assert_eq!(
            run_dispatch_loop(&reg, &inbox, &outbox),
            Err(PipelineError::MailboxClosed {
                stage: "reading token low word"
            })
        );
    }
}
