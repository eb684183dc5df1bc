//! Engine error taxonomy
//!
//! Every operation over the layout is atomic-or-noop: an error means no
//! state changed. `NotFound` and `InvalidTransition` are always
//! recoverable; `Persistence` and `Serialization` degrade to the
//! in-memory state and are never fatal to the session.

use crate::persistence::backend::StorageError;
use thiserror::Error;

/// Floor engine errors
#[derive(Debug, Error)]
pub enum FloorError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl FloorError {
    pub fn not_found(kind: &str, id: &str) -> Self {
        FloorError::NotFound(format!("{} {}", kind, id))
    }
}

impl From<serde_json::Error> for FloorError {
    fn from(err: serde_json::Error) -> Self {
        FloorError::Serialization(err.to_string())
    }
}

pub type FloorResult<T> = Result<T, FloorError>;
