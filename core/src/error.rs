use crate::types::EntityId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: EntityId },

    #[error("{kind} {id} already exists")]
    DuplicateKey { kind: &'static str, id: EntityId },

    #[error("Corrupt snapshot: {reason}")]
    CorruptSnapshot { reason: String },

    #[error("Backend '{backend}' does not support {operation}")]
    UnsupportedBackend {
        backend:   &'static str,
        operation: &'static str,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SimError {
    pub fn corrupt(reason: impl Into<String>) -> Self {
        Self::CorruptSnapshot { reason: reason.into() }
    }
}

pub type SimResult<T> = Result<T, SimError>;
