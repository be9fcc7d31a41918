//! In-process media player handle.
//!
//! Records the commands a platform player would receive. Hosts without a
//! real decoder (tests, benchmarks, headless previews) plug this into the
//! pool through [`MediaPlayerFactory`].

use crate::handle::{HandleFactory, PlaybackHandle};
use reelkit_core::{ReelsError, Result};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Repeat behaviour applied to every pooled player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatMode {
    Off,
    One,
}

/// Player state as last commanded.
#[derive(Debug)]
pub struct MediaPlayer {
    serial: usize,
    url: Option<String>,
    playing: bool,
    muted: bool,
    repeat: RepeatMode,
    loads: usize,
    torn_down: bool,
    stats: Arc<PlayerStats>,
}

impl MediaPlayer {
    fn new(serial: usize, stats: Arc<PlayerStats>) -> Self {
        Self {
            serial,
            url: None,
            playing: false,
            muted: false,
            repeat: RepeatMode::One,
            loads: 0,
            torn_down: false,
            stats,
        }
    }

    /// Creation order within the factory, starting at 0.
    pub fn serial(&self) -> usize {
        self.serial
    }

    /// Currently assigned media URL.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat
    }

    /// Number of media assignments over the player's lifetime.
    pub fn load_count(&self) -> usize {
        self.loads
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

impl PlaybackHandle for MediaPlayer {
    fn load(&mut self, url: &str) {
        self.url = Some(url.to_string());
        self.playing = false;
        self.loads += 1;
        debug!("player {} loading {}", self.serial, url);
    }

    fn reset(&mut self) {
        self.playing = false;
        self.url = None;
    }

    fn set_playing(&mut self, playing: bool) {
        // no media, nothing to play
        self.playing = playing && self.url.is_some();
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.playing = false;
        self.url = None;
        self.stats.destroyed.fetch_add(1, Ordering::Relaxed);
    }
}

/// Lifetime counters shared by a factory and its players.
#[derive(Debug, Default)]
pub struct PlayerStats {
    created: AtomicUsize,
    destroyed: AtomicUsize,
}

impl PlayerStats {
    pub fn created(&self) -> usize {
        self.created.load(Ordering::Relaxed)
    }

    pub fn destroyed(&self) -> usize {
        self.destroyed.load(Ordering::Relaxed)
    }

    /// Players created and not yet torn down.
    pub fn alive(&self) -> usize {
        self.created().saturating_sub(self.destroyed())
    }
}

/// Factory for [`MediaPlayer`] handles.
#[derive(Debug, Clone, Default)]
pub struct MediaPlayerFactory {
    stats: Arc<PlayerStats>,
    fail_creation: Arc<AtomicBool>,
}

impl MediaPlayerFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters shared with every player this factory builds.
    pub fn stats(&self) -> Arc<PlayerStats> {
        Arc::clone(&self.stats)
    }

    /// Make subsequent `create` calls fail, simulating decoder setup errors.
    pub fn set_fail_creation(&self, fail: bool) {
        self.fail_creation.store(fail, Ordering::Relaxed);
    }
}

impl HandleFactory for MediaPlayerFactory {
    type Handle = MediaPlayer;

    fn create(&self) -> Result<MediaPlayer> {
        if self.fail_creation.load(Ordering::Relaxed) {
            return Err(ReelsError::HandleCreation(
                "media player unavailable".to_string(),
            ));
        }
        let serial = self.stats.created.fetch_add(1, Ordering::Relaxed);
        debug!("created media player {}", serial);
        Ok(MediaPlayer::new(serial, Arc::clone(&self.stats)))
    }
}
