//! Error types for reelkit.

use thiserror::Error;

/// Main error type for feed playback operations.
#[derive(Error, Debug)]
pub enum ReelsError {
    #[error("Invalid config: capacity {capacity} cannot cover preload count {preload_count} (needs at least {required})")]
    InvalidConfig {
        preload_count: usize,
        capacity: usize,
        required: usize,
    },

    #[error("Player pool exhausted: all {capacity} handles are live")]
    PoolExhausted { capacity: usize },

    #[error("Position {position} out of range (feed has {item_count} items)")]
    OutOfRange { position: i64, item_count: usize },

    #[error("Feed is empty")]
    EmptyFeed,

    #[error("Handle creation failed: {0}")]
    HandleCreation(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReelsError {
    /// Whether the failure only affects a single page binding attempt.
    ///
    /// Recoverable errors are reported and re-evaluated on the next settle.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::PoolExhausted { .. } | Self::HandleCreation(_))
    }
}

/// Result type alias for reelkit operations.
pub type Result<T> = std::result::Result<T, ReelsError>;
