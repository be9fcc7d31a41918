//! reelkit player - handle pooling and windowed preload for paged feeds
//!
//! This crate handles:
//! - The playback handle contract and an in-process player
//! - A bounded, fail-fast pool of reusable handles
//! - Page to handle bindings
//! - Settle-driven orchestration of bindings, play/pause and mute
//! - A mutex-wrapped feed for multi-threaded hosts

pub mod binding;
pub mod events;
pub mod handle;
pub mod orchestrator;
pub mod player;
pub mod pool;
pub mod shared;

pub use binding::{Binding, PageBindingTable};
pub use events::{EventBus, FeedEvent};
pub use handle::{HandleFactory, HandleId, PlaybackHandle};
pub use orchestrator::{
    BindingFailure, BindingOutcome, DeferredSettle, PendingBinding, PlaybackOrchestrator,
    SettleReport,
};
pub use player::{MediaPlayer, MediaPlayerFactory, PlayerStats, RepeatMode};
pub use pool::{PoolStats, Reservation, ResourcePool};
pub use shared::{DetachedSettle, SharedFeed};
