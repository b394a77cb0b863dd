//! Error types for registry and topology mutations

use thiserror::Error;

/// Failure of a mutating registry or topology call.
///
/// Route queries never return this: an unknown endpoint degrades to an empty
/// route instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl NetworkError {
    pub(crate) fn unknown_device(id: &str) -> Self {
        Self::InvalidArgument(format!("device not found: {}", id))
    }
}
