//! Thread-safe handle to a feed.
//!
//! Pool and binding table live behind one `parking_lot::Mutex`. Handle
//! construction in [`SharedFeed::settle_detached`] runs with the lock
//! released, so a slow decoder setup never blocks other feed calls.

use crate::handle::HandleFactory;
use crate::orchestrator::{BindingFailure, BindingOutcome, PlaybackOrchestrator, SettleReport};
use parking_lot::{Mutex, MutexGuard};
use reelkit_core::Result;
use std::sync::Arc;

/// Outcome of [`SharedFeed::settle_detached`].
#[derive(Debug)]
pub struct DetachedSettle {
    /// Synchronous part of the settle. Construction failures are appended
    /// to `report.failures`.
    pub report: SettleReport,
    /// Pages bound once their new handle was built.
    pub completed: Vec<i64>,
    /// Pages whose handle arrived after a newer settle or a teardown.
    pub stale: Vec<i64>,
}

/// Cloneable, lockable feed.
pub struct SharedFeed<F: HandleFactory> {
    inner: Arc<Mutex<PlaybackOrchestrator<F>>>,
}

impl<F: HandleFactory> Clone for SharedFeed<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<F: HandleFactory> SharedFeed<F> {
    pub fn new(orchestrator: PlaybackOrchestrator<F>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(orchestrator)),
        }
    }

    /// Lock the feed for a batch of calls.
    pub fn lock(&self) -> MutexGuard<'_, PlaybackOrchestrator<F>> {
        self.inner.lock()
    }

    /// Run `f` with the feed locked.
    pub fn with<R>(&self, f: impl FnOnce(&mut PlaybackOrchestrator<F>) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Settle with synchronous handle construction under the lock.
    pub fn settle(&self, raw: i64) -> Result<SettleReport> {
        self.inner.lock().settle(raw)
    }

    /// Settle, building new handles with the lock released.
    ///
    /// A newer settle or a teardown may run while handles are being built;
    /// handles that arrive for pages no longer in the window are released
    /// on completion.
    pub fn settle_detached(&self, raw: i64) -> Result<DetachedSettle> {
        let (deferred, factory) = {
            let mut feed = self.inner.lock();
            (feed.settle_deferred(raw)?, feed.factory())
        };

        let mut outcome = DetachedSettle {
            report: deferred.report,
            completed: Vec::new(),
            stale: Vec::new(),
        };

        for pending in deferred.pending {
            let page = pending.page;
            match factory.create() {
                Ok(handle) => match self.inner.lock().complete_binding(pending, handle) {
                    BindingOutcome::Bound => outcome.completed.push(page),
                    BindingOutcome::Stale => outcome.stale.push(page),
                },
                Err(error) => {
                    self.inner.lock().abandon_binding(&pending, &error);
                    outcome.report.failures.push(BindingFailure { page, error });
                }
            }
        }

        Ok(outcome)
    }

    pub fn set_playing(&self, playing: bool) {
        self.inner.lock().set_playing(playing);
    }

    pub fn toggle_play_pause(&self) {
        self.inner.lock().toggle_play_pause();
    }

    pub fn set_muted(&self, muted: bool) {
        self.inner.lock().set_muted(muted);
    }

    pub fn toggle_mute(&self) {
        self.inner.lock().toggle_mute();
    }

    pub fn on_host_suspend(&self) {
        self.inner.lock().on_host_suspend();
    }

    pub fn on_host_resume(&self) {
        self.inner.lock().on_host_resume();
    }

    pub fn on_host_teardown(&self) {
        self.inner.lock().on_host_teardown();
    }

    pub fn bound_pages(&self) -> Vec<i64> {
        self.inner.lock().bound_pages()
    }
}
