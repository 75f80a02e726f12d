//! Named pipelines and the ids they are dispatched by.

use crate::error::PipelineError;
use indexmap::IndexMap;

/// Nonzero id of a registered pipeline. Id 0 is the stop word.
pub type PipelineId = u32;

/// What a pipeline is invoked with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PipelineArgs {
    /// Opaque argument token, typically an index into host-side state.
    pub token: u64,
    /// This worker's rank within the dispatch.
    pub pipeline_rank: u32,
    /// Number of workers taking part in the dispatch.
    pub n_pipeline: u32,
}

impl PipelineArgs {
    /// Split `token` into the (high, low) mailbox words.
    pub fn token_words(&self) -> (u32, u32) {
        ((self.token >> 32) as u32, self.token as u32)
    }

    /// Rebuild a token from its (high, low) mailbox words.
    pub fn token_from_words(high: u32, low: u32) -> u64 {
        (u64::from(high) << 32) | u64::from(low)
    }

    /// Half-open slice of `0..len` this worker should process.
    ///
    /// Items are split as evenly as possible, earlier ranks taking the
    /// remainder.
    pub fn partition(&self, len: usize) -> std::ops::Range<usize> {
        let n = self.n_pipeline.max(1) as usize;
        let r = (self.pipeline_rank as usize).min(n);
        let base = len / n;
        let extra = len % n;
        let start = r * base + r.min(extra);
        let end = (start + base + usize::from(r < extra)).min(len);
        start..end
    }
}

type PipelineFn = Box<dyn Fn(PipelineArgs) + Send + Sync>;

/// Ordered, name-unique set of pipelines.
///
/// The `k`-th registered pipeline has id `k + 1`.
#[derive(Default)]
pub struct PipelineRegistry {
    pipelines: IndexMap<String, PipelineFn>,
}

impl PipelineRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `pipeline` under `name` and return its id.
    pub fn register<F>(&mut self, name: impl Into<String>, pipeline: F) -> Result<PipelineId, PipelineError>
    where
        F: Fn(PipelineArgs) + Send + Sync + 'static,
    {
        let name = name.into();
        if self.pipelines.contains_key(&name) {
            return Err(PipelineError::DuplicateName { name });
        }
        let id = PipelineId::try_from(self.pipelines.len() + 1)
            .map_err(|_| PipelineError::RegistryFull)?;
        tracing::debug!(pipeline = %name, id, "registered pipeline");
        self.pipelines.insert(name, Box::new(pipeline));
        Ok(id)
    }

    /// Id of the pipeline called `name`.
    pub fn id_of(&self, name: &str) -> Option<PipelineId> {
        self.pipelines
            .get_index_of(name)
            .and_then(|i| PipelineId::try_from(i + 1).ok())
    }

    /// Run pipeline `id`.
    pub fn execute(&self, id: PipelineId, args: PipelineArgs) -> Result<(), PipelineError> {
        let (_, pipeline) = id
            .checked_sub(1)
            .and_then(|i| self.pipelines.get_index(i as usize))
            .ok_or(PipelineError::UnknownPipeline { id })?;
        pipeline(args);
        Ok(())
    }

    /// Number of registered pipelines.
    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    /// `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }
}

impl std::fmt::Debug for PipelineRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineRegistry")
            .field("pipelines", &self.pipelines.keys().collect::<Vec<_>>())
            .finish()
    }
}
