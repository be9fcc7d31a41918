//! Playback orchestration for a paged feed.
//!
//! Every settle event recomputes the preload window around the settled page,
//! evicts bindings that fell outside it, binds pooled handles to the video
//! pages inside it and then applies play/pause. Evictions always run before
//! acquisitions so a full pool frees slots for the new window first.

use crate::binding::{Binding, PageBindingTable};
use crate::events::{EventBus, FeedEvent};
use crate::handle::{HandleFactory, HandleId, PlaybackHandle};
use crate::pool::{PoolStats, Reservation, ResourcePool};
use crossbeam_channel::Receiver;
use reelkit_core::{
    window_for, FeedIndexMapper, MediaSource, PageWindow, ReelsConfig, ReelsError, Result,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A page that could not get a handle during a settle.
#[derive(Debug)]
pub struct BindingFailure {
    pub page: i64,
    pub error: ReelsError,
}

/// What a settle changed.
#[derive(Debug)]
pub struct SettleReport {
    /// Raw page the viewport settled on.
    pub page: i64,
    pub logical_index: usize,
    /// Increases with every settle and teardown.
    pub generation: u64,
    /// Pages whose handle went back to the pool.
    pub released: Vec<i64>,
    /// Pages that received a handle.
    pub acquired: Vec<i64>,
    /// Pages left unbound; retried on the next settle.
    pub failures: Vec<BindingFailure>,
}

impl SettleReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A page waiting for a handle that is being built outside the feed lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingBinding {
    pub page: i64,
    pub handle: HandleId,
    /// Settle generation that requested the handle.
    pub generation: u64,
    pub url: String,
}

/// Result of [`PlaybackOrchestrator::settle_deferred`].
#[derive(Debug)]
pub struct DeferredSettle {
    pub report: SettleReport,
    /// Reservations the caller must complete or abandon.
    pub pending: Vec<PendingBinding>,
}

/// Outcome of completing a pending binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingOutcome {
    /// The handle is attached to the page.
    Bound,
    /// The page no longer wanted this handle; it was released immediately.
    Stale,
}

/// Owns the pool and binding table for one feed.
///
/// Not internally synchronized; wrap it in [`SharedFeed`](crate::SharedFeed)
/// to drive it from several threads.
pub struct PlaybackOrchestrator<F: HandleFactory> {
    config: ReelsConfig,
    mapper: FeedIndexMapper,
    items: Vec<MediaSource>,
    pool: ResourcePool<F>,
    bindings: PageBindingTable,
    current: Option<i64>,
    window: Option<PageWindow>,
    playing: bool,
    muted: bool,
    suspended: bool,
    generation: u64,
    events: EventBus,
}

impl<F: HandleFactory> PlaybackOrchestrator<F> {
    /// Create an orchestrator. The pool starts empty.
    pub fn new(config: ReelsConfig, items: Vec<MediaSource>, factory: F) -> Result<Self> {
        Self::with_shared_factory(config, items, Arc::new(factory))
    }

    /// Create an orchestrator around a factory the host also holds.
    pub fn with_shared_factory(
        config: ReelsConfig,
        items: Vec<MediaSource>,
        factory: Arc<F>,
    ) -> Result<Self> {
        let pool = ResourcePool::with_shared_factory(factory, config.pool_capacity())?;
        let mapper = FeedIndexMapper::new(items.len(), config.circular());

        info!(
            "feed created: {} items, preload {}, pool {}, circular {}",
            items.len(),
            config.preload_count(),
            config.pool_capacity(),
            config.circular()
        );

        Ok(Self {
            playing: config.auto_play(),
            muted: config.start_muted(),
            config,
            mapper,
            items,
            pool,
            bindings: PageBindingTable::new(),
            current: None,
            window: None,
            suspended: false,
            generation: 0,
            events: EventBus::new(),
        })
    }

    pub fn config(&self) -> &ReelsConfig {
        &self.config
    }

    pub fn items(&self) -> &[MediaSource] {
        &self.items
    }

    pub fn mapper(&self) -> &FeedIndexMapper {
        &self.mapper
    }

    pub fn factory(&self) -> Arc<F> {
        self.pool.factory()
    }

    /// Raw position the feed opens on.
    pub fn start_position(&self) -> Result<i64> {
        self.mapper.raw_position_for(self.config.initial_index())
    }

    /// Page of the last settle, `None` before the first settle or after teardown.
    pub fn current_page(&self) -> Option<i64> {
        self.current
    }

    /// Window of the last settle.
    pub fn window(&self) -> Option<PageWindow> {
        self.window
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn logical_index(&self, raw: i64) -> Result<usize> {
        self.mapper.logical_index(raw)
    }

    pub fn media_at(&self, raw: i64) -> Result<&MediaSource> {
        let index = self.mapper.logical_index(raw)?;
        Ok(&self.items[index])
    }

    pub fn binding(&self, page: i64) -> Option<Binding> {
        self.bindings.get(page)
    }

    pub fn handle_id(&self, page: i64) -> Option<HandleId> {
        self.bindings.handle_id(page)
    }

    /// Handle bound to `page`, for attaching to a rendering surface.
    pub fn handle(&self, page: i64) -> Option<&F::Handle> {
        self.bindings
            .handle_id(page)
            .and_then(|id| self.pool.get(id))
    }

    /// Pages with an attached handle, ascending.
    pub fn bound_pages(&self) -> Vec<i64> {
        self.bindings.bound().map(|(page, _)| page).collect()
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Receive diagnostic events from now on.
    pub fn subscribe(&mut self) -> Receiver<FeedEvent> {
        self.events.subscribe()
    }

    /// Handle the viewport coming to rest on `raw`, building any new
    /// handles synchronously.
    ///
    /// Mapping errors abort before anything changes. Per-page acquisition
    /// failures are reported and leave that page unbound.
    pub fn settle(&mut self, raw: i64) -> Result<SettleReport> {
        let (mut report, window) = self.begin_settle(raw)?;
        let acquire = window.diff(self.bindings.pages()).acquire;

        for page in acquire {
            let Some(url) = self.video_url(page) else {
                continue;
            };
            match self.pool.acquire() {
                Ok(id) => self.attach(page, id, &url, &mut report),
                Err(e) => self.record_failure(page, e, &mut report),
            }
        }

        self.apply_play_state();
        Ok(report)
    }

    /// Like [`settle`](Self::settle), but pages needing a brand-new handle
    /// get a pending reservation instead of synchronous construction.
    ///
    /// Each returned [`PendingBinding`] must be passed to
    /// [`complete_binding`](Self::complete_binding) or
    /// [`abandon_binding`](Self::abandon_binding).
    pub fn settle_deferred(&mut self, raw: i64) -> Result<DeferredSettle> {
        let (mut report, window) = self.begin_settle(raw)?;
        let acquire = window.diff(self.bindings.pages()).acquire;
        let mut pending = Vec::new();

        for page in acquire {
            let Some(url) = self.video_url(page) else {
                continue;
            };
            match self.pool.reserve() {
                Ok(Reservation::Ready(id)) => self.attach(page, id, &url, &mut report),
                Ok(Reservation::Pending(id)) => {
                    self.bindings.reserve(page, id);
                    pending.push(PendingBinding {
                        page,
                        handle: id,
                        generation: report.generation,
                        url,
                    });
                }
                Err(e) => self.record_failure(page, e, &mut report),
            }
        }

        self.apply_play_state();
        Ok(DeferredSettle { report, pending })
    }

    /// Install a handle built for `pending`.
    ///
    /// If the page has since left the window its reservation was already
    /// cancelled; the pool keeps the handle idle when there is room and tears
    /// it down otherwise.
    pub fn complete_binding(&mut self, pending: PendingBinding, handle: F::Handle) -> BindingOutcome {
        let PendingBinding {
            page,
            handle: id,
            url,
            ..
        } = pending;

        let installed = self.pool.fulfil(id, handle);
        if installed && self.bindings.promote(page, id) {
            if let Some(handle) = self.pool.get_mut(id) {
                handle.load(&url);
                handle.set_muted(self.muted);
            }
            debug!("page {} bound to {} after construction", page, id);
            self.events.emit(FeedEvent::Bound { page, handle: id });
            self.apply_play_state();
            return BindingOutcome::Bound;
        }

        if installed {
            self.pool.release(id);
        }
        debug!("page {} no longer wants {}, released", page, id);
        self.events.emit(FeedEvent::StaleCompletion { page, handle: id });
        BindingOutcome::Stale
    }

    /// Give up on a pending binding whose handle could not be built.
    pub fn abandon_binding(&mut self, pending: &PendingBinding, error: &ReelsError) {
        self.pool.cancel(pending.handle);
        if self.bindings.get(pending.page) == Some(Binding::Pending(pending.handle)) {
            self.bindings.evict(pending.page, &mut self.pool);
        }
        warn!("page {} left unbound: {}", pending.page, error);
        self.events.emit(FeedEvent::AcquisitionFailed {
            page: pending.page,
            reason: error.to_string(),
        });
    }

    /// Set the global play intent.
    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
        self.apply_play_state();
    }

    pub fn play(&mut self) {
        self.set_playing(true);
    }

    pub fn pause(&mut self) {
        self.set_playing(false);
    }

    pub fn toggle_play_pause(&mut self) {
        self.set_playing(!self.playing);
    }

    /// Set the mute intent and broadcast it to every bound handle.
    /// Handles bound later pick it up at bind time.
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        for (_, id) in self.bindings.bound() {
            if let Some(handle) = self.pool.get_mut(id) {
                handle.set_muted(muted);
            }
        }
    }

    pub fn toggle_mute(&mut self) {
        self.set_muted(!self.muted);
    }

    /// Host went to background: pause everything, keep the play intent.
    pub fn on_host_suspend(&mut self) {
        self.suspended = true;
        self.apply_play_state();
    }

    /// Host came back: restore play intents.
    pub fn on_host_resume(&mut self) {
        self.suspended = false;
        self.apply_play_state();
    }

    /// Host is going away: drop every binding and handle.
    pub fn on_host_teardown(&mut self) {
        self.release_all();
    }

    /// Drop every binding and tear down the pool. Idempotent; the next
    /// settle starts from an empty pool.
    pub fn release_all(&mut self) {
        let had_state = self.current.is_some() || !self.bindings.is_empty();

        self.bindings.clear();
        self.pool.release_all();
        self.current = None;
        self.window = None;
        // outstanding reservations become stale
        self.generation += 1;

        if had_state {
            info!("feed torn down");
            self.events.emit(FeedEvent::TornDown);
        }
    }

    fn begin_settle(&mut self, raw: i64) -> Result<(SettleReport, PageWindow)> {
        let logical_index = self.mapper.logical_index(raw)?;
        self.generation += 1;

        let window = window_for(
            raw,
            self.config.preload_count(),
            self.mapper.last_valid_page(),
        );
        let mut report = SettleReport {
            page: raw,
            logical_index,
            generation: self.generation,
            released: Vec::new(),
            acquired: Vec::new(),
            failures: Vec::new(),
        };

        let release = window.diff(self.bindings.pages()).release;
        for page in release {
            match self.bindings.evict(page, &mut self.pool) {
                Some(Binding::Bound(id)) => {
                    report.released.push(page);
                    self.events.emit(FeedEvent::Released { page, handle: id });
                }
                Some(Binding::Pending(id)) => {
                    debug!("page {} left the window while {} was pending", page, id);
                }
                None => {}
            }
        }

        self.current = Some(raw);
        self.window = Some(window);
        debug!(
            "settled on page {} (item {}), window {}..={}",
            raw,
            logical_index,
            window.start(),
            window.end()
        );
        self.events.emit(FeedEvent::Settled {
            page: raw,
            logical_index,
            generation: self.generation,
        });

        Ok((report, window))
    }

    /// URL of the page's media if it needs a handle.
    fn video_url(&self, page: i64) -> Option<String> {
        let media = self.media_at(page).ok()?;
        media.requires_handle().then(|| media.url().to_string())
    }

    fn attach(&mut self, page: i64, id: HandleId, url: &str, report: &mut SettleReport) {
        if let Some(handle) = self.pool.get_mut(id) {
            handle.load(url);
            handle.set_muted(self.muted);
        }
        self.bindings.bind(page, id);
        report.acquired.push(page);
        self.events.emit(FeedEvent::Bound { page, handle: id });
    }

    fn record_failure(&mut self, page: i64, error: ReelsError, report: &mut SettleReport) {
        warn!("page {} left unbound: {}", page, error);
        self.events.emit(FeedEvent::AcquisitionFailed {
            page,
            reason: error.to_string(),
        });
        report.failures.push(BindingFailure { page, error });
    }

    /// Current page plays if the play intent is set and the host is active;
    /// every other bound page pauses.
    fn apply_play_state(&mut self) {
        let active = if self.playing && !self.suspended {
            self.current
        } else {
            None
        };

        for (page, id) in self.bindings.bound() {
            if let Some(handle) = self.pool.get_mut(id) {
                handle.set_playing(Some(page) == active);
            }
        }
    }
}
