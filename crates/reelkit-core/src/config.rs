//! Validated feed configuration.
//!
//! The pool must be able to hold a handle for the current page plus
//! `preload_count` pages on either side at the same time, so every
//! constructor (including JSON deserialization) enforces
//! `pool_capacity >= 2 * preload_count + 1`. Invalid values are rejected,
//! never clamped.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ReelsError, Result};

/// Default number of pages preloaded on each side of the current page.
pub const DEFAULT_PRELOAD_COUNT: usize = 1;

/// Default number of playback handles in the pool.
pub const DEFAULT_POOL_CAPACITY: usize = 3;

/// Immutable feed configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawConfig", into = "RawConfig")]
pub struct ReelsConfig {
    preload_count: usize,
    pool_capacity: usize,
    circular: bool,
    auto_play: bool,
    start_muted: bool,
    initial_index: usize,
}

/// Unvalidated wire form of [`ReelsConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct RawConfig {
    preload_count: usize,
    pool_capacity: usize,
    circular: bool,
    auto_play: bool,
    start_muted: bool,
    initial_index: usize,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            preload_count: DEFAULT_PRELOAD_COUNT,
            pool_capacity: DEFAULT_POOL_CAPACITY,
            circular: false,
            auto_play: true,
            start_muted: false,
            initial_index: 0,
        }
    }
}

impl TryFrom<RawConfig> for ReelsConfig {
    type Error = ReelsError;

    fn try_from(raw: RawConfig) -> Result<Self> {
        Ok(Self::new(raw.preload_count, raw.pool_capacity, raw.circular)?
            .with_auto_play(raw.auto_play)
            .with_start_muted(raw.start_muted)
            .with_initial_index(raw.initial_index))
    }
}

impl From<ReelsConfig> for RawConfig {
    fn from(config: ReelsConfig) -> Self {
        Self {
            preload_count: config.preload_count,
            pool_capacity: config.pool_capacity,
            circular: config.circular,
            auto_play: config.auto_play,
            start_muted: config.start_muted,
            initial_index: config.initial_index,
        }
    }
}

/// Minimum pool capacity for a preload radius.
pub fn required_capacity(preload_count: usize) -> usize {
    preload_count.saturating_mul(2).saturating_add(1)
}

impl ReelsConfig {
    /// Create a configuration, rejecting pools too small for the preload window.
    pub fn new(preload_count: usize, pool_capacity: usize, circular: bool) -> Result<Self> {
        let required = required_capacity(preload_count);
        if pool_capacity < required {
            return Err(ReelsError::InvalidConfig {
                preload_count,
                capacity: pool_capacity,
                required,
            });
        }

        Ok(Self {
            preload_count,
            pool_capacity,
            circular,
            auto_play: true,
            start_muted: false,
            initial_index: 0,
        })
    }

    /// Start playing the current page as soon as it settles.
    pub fn with_auto_play(mut self, auto_play: bool) -> Self {
        self.auto_play = auto_play;
        self
    }

    /// Start with audio muted.
    pub fn with_start_muted(mut self, muted: bool) -> Self {
        self.start_muted = muted;
        self
    }

    /// Logical item the feed opens on.
    pub fn with_initial_index(mut self, index: usize) -> Self {
        self.initial_index = index;
        self
    }

    pub fn preload_count(&self) -> usize {
        self.preload_count
    }

    pub fn pool_capacity(&self) -> usize {
        self.pool_capacity
    }

    pub fn circular(&self) -> bool {
        self.circular
    }

    pub fn auto_play(&self) -> bool {
        self.auto_play
    }

    pub fn start_muted(&self) -> bool {
        self.start_muted
    }

    pub fn initial_index(&self) -> usize {
        self.initial_index
    }

    /// Serialize to pretty JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| ReelsError::Serialization(format!("Failed to serialize config: {}", e)))
    }

    /// Deserialize and validate from JSON bytes. Missing fields take defaults.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        // Surface sizing violations as InvalidConfig rather than a generic parse error.
        let raw: RawConfig = serde_json::from_slice(data)
            .map_err(|e| ReelsError::Serialization(format!("Invalid config JSON: {}", e)))?;
        Self::try_from(raw)
    }

    /// Save configuration to a file path.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let data = self.to_json()?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Load configuration from a file path.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_json(&data)
    }
}

impl Default for ReelsConfig {
    fn default() -> Self {
        Self {
            preload_count: DEFAULT_PRELOAD_COUNT,
            pool_capacity: DEFAULT_POOL_CAPACITY,
            circular: false,
            auto_play: true,
            start_muted: false,
            initial_index: 0,
        }
    }
}
