//! Persistence layer
//!
//! Checkpoint/restart support for sparse row graphs: a versioned,
//! length-prefixed snapshot format with optional gzip compression.

pub mod snapshot;

pub use snapshot::{SNAPSHOT_MAGIC, SNAPSHOT_VERSION};

use crate::graph::IndexType;
use thiserror::Error;

/// Persistence errors
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("Not a graph snapshot (magic {0:?})")]
    InvalidMagic([u8; 4]),

    #[error("Unsupported snapshot version {0}")]
    UnsupportedVersion(u32),

    #[error("Snapshot holds a graph of size {found}, expected {expected}")]
    SizeMismatch { expected: IndexType, found: IndexType },

    #[error("Corrupted snapshot: {0}")]
    Corrupted(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;
