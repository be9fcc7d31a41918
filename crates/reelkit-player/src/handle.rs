//! Contract for pooled playback handles.
//!
//! A handle wraps an expensive platform decoder/player. The pool only needs
//! to reset, reconfigure and tear it down; decoding and rendering stay on the
//! platform side.

use reelkit_core::Result;
use std::fmt;

/// Pool-assigned identity of a playback handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(pub(crate) u64);

impl HandleId {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handle#{}", self.0)
    }
}

/// An expensive, reusable playback resource.
pub trait PlaybackHandle: Send {
    /// Assign media and begin preparing it. Must not block on readiness.
    fn load(&mut self, url: &str);

    /// Stop playback and clear the assigned media.
    fn reset(&mut self);

    fn set_playing(&mut self, playing: bool);

    fn set_muted(&mut self, muted: bool);

    /// Free the underlying platform resource. Called exactly once before drop.
    fn teardown(&mut self) {}
}

/// Builds new handles for the pool.
///
/// Construction may be slow; callers holding a shared lock should use the
/// reservation path of the pool and build outside the lock.
pub trait HandleFactory: Send + Sync {
    type Handle: PlaybackHandle;

    fn create(&self) -> Result<Self::Handle>;
}
