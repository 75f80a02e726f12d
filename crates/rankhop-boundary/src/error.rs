//! Boundary handler registration and construction errors.

use std::error::Error;
use std::fmt;

/// Errors from building handlers or registering them in a table.
#[derive(Clone, Debug, PartialEq)]
pub enum BoundaryError {
    /// A handler with this name is already registered.
    DuplicateName {
        /// The clashing name.
        name: String,
    },
    /// A handler parameter is out of its valid range.
    InvalidParameter {
        /// Handler being built.
        handler: &'static str,
        /// What is wrong.
        reason: String,
    },
}

impl fmt::Display for BoundaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateName { name } => {
                write!(f, "boundary handler '{name}' is already registered")
            }
            Self::InvalidParameter { handler, reason } => {
                write!(f, "invalid {handler} parameter: {reason}")
            }
        }
    }
}

impl Error for BoundaryError {}
