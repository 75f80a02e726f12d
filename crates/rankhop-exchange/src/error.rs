//! Fatal exchange errors.

use crate::config::ConfigError;
use rankhop_comm::TransportError;
use rankhop_core::{Face, InputError};
use std::error::Error;
use std::fmt;

/// Conditions that abort an exchange call.
///
/// On error the particle store and mover list may be partially
/// processed; the call must not be retried for the same timestep.
#[derive(Clone, Debug, PartialEq)]
pub enum ExchangeError {
    /// The caller's inputs break a precondition.
    Input(InputError),
    /// The exchange configuration is invalid.
    Config(ConfigError),
    /// A transport operation failed.
    Transport {
        /// Zero-based pass the failure occurred in.
        pass: usize,
        /// Port the operation was posted on.
        face: Face,
        /// The underlying transport error.
        source: TransportError,
    },
    /// The local injection scratch could not be allocated.
    ScratchAllocation {
        /// Requested capacity in records.
        requested: usize,
    },
}

impl fmt::Display for ExchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input(e) => write!(f, "invalid input: {e}"),
            Self::Config(e) => write!(f, "invalid config: {e}"),
            Self::Transport { pass, face, source } => {
                write!(f, "transport failed on {face} in pass {pass}: {source}")
            }
            Self::ScratchAllocation { requested } => write!(
                f,
                "could not allocate injection scratch for {requested} records"
            ),
        }
    }
}

impl Error for ExchangeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Input(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Transport { source, .. } => Some(source),
            Self::ScratchAllocation { .. } => None,
        }
    }
}

impl From<InputError> for ExchangeError {
    fn from(e: InputError) -> Self {
        Self::Input(e)
    }
}

impl From<ConfigError> for ExchangeError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Attach pass and port context to a transport result.
pub(crate) trait TransportContext<T> {
    fn at(self, pass: usize, face: Face) -> Result<T, ExchangeError>;
}

impl<T> TransportContext<T> for Result<T, TransportError> {
    fn at(self, pass: usize, face: Face) -> Result<T, ExchangeError> {
        self.map_err(|source| ExchangeError::Transport { pass, face, source })
    }
}
