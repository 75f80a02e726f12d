//! Pipeline registration and dispatch errors.

use std::error::Error;
use std::fmt;

/// Errors from registering or dispatching pipelines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PipelineError {
    /// A pipeline with this name is already registered.
    DuplicateName {
        /// The clashing name.
        name: String,
    },
    /// The registry cannot hand out more ids.
    RegistryFull,
    /// A dispatch named an id with no registered pipeline.
    UnknownPipeline {
        /// The id read from the mailbox.
        id: u32,
    },
    /// The other end of a mailbox went away mid-conversation.
    MailboxClosed {
        /// What was being read or written.
        stage: &'static str,
    },
    /// The worker answered with something other than the completion word.
    UnexpectedReply {
        /// The word received.
        word: u32,
    },
    /// The worker thread could not be started.
    Spawn {
        /// OS error text.
        reason: String,
    },
    /// The worker thread panicked.
    WorkerPanicked,
    /// A pool needs at least one worker.
    EmptyPool,
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateName { name } => write!(f, "pipeline '{name}' is already registered"),
            Self::RegistryFull => write!(f, "pipeline registry is full"),
            Self::UnknownPipeline { id } => write!(f, "no pipeline registered with id {id}"),
            Self::MailboxClosed { stage } => write!(f, "mailbox closed while {stage}"),
            Self::UnexpectedReply { word } => {
                write!(f, "expected completion word, got {word}")
            }
            Self::Spawn { reason } => write!(f, "failed to spawn pipeline worker: {reason}"),
            Self::WorkerPanicked => write!(f, "pipeline worker panicked"),
            Self::EmptyPool => write!(f, "pipeline pool needs at least one worker"),
        }
    }
}

impl Error for PipelineError {}
