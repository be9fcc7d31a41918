//! reelkit core - foundation types for paged media feeds
//!
//! This crate provides the pure, handle-free building blocks:
//! - Error taxonomy shared by every reelkit crate
//! - Media descriptors (video / image)
//! - Validated feed configuration
//! - Raw pager position to logical item mapping (finite and circular)
//! - Preload window computation

pub mod config;
pub mod error;
pub mod index;
pub mod media;
pub mod window;

pub use config::{required_capacity, ReelsConfig};
pub use error::{ReelsError, Result};
pub use index::{to_logical_index, FeedIndexMapper};
pub use media::MediaSource;
pub use window::{window_for, PageWindow, WindowDiff};
