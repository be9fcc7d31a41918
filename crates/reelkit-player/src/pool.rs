//! Bounded pool of playback handles.
//!
//! Handles are created lazily, reused FIFO once released, and never exceed
//! `capacity` live at once (idle + in use + reserved). Acquisition fails
//! fast with [`ReelsError::PoolExhausted`] instead of waiting.

use crate::handle::{HandleFactory, HandleId, PlaybackHandle};
use reelkit_core::{ReelsError, Result};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of reserving a pool slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reservation {
    /// An idle handle was moved to in-use and can be used immediately.
    Ready(HandleId),
    /// A slot is reserved; the caller must build a handle and call
    /// [`ResourcePool::fulfil`] or [`ResourcePool::cancel`].
    Pending(HandleId),
}

impl Reservation {
    pub fn id(&self) -> HandleId {
        match self {
            Self::Ready(id) | Self::Pending(id) => *id,
        }
    }
}

/// Snapshot of pool occupancy and lifetime counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub capacity: usize,
    pub available: usize,
    pub in_use: usize,
    pub pending: usize,
    /// Handles installed over the pool's lifetime.
    pub created: u64,
    /// Handles torn down over the pool's lifetime.
    pub destroyed: u64,
    /// Acquisitions served from the idle queue.
    pub reused: u64,
}

impl PoolStats {
    /// Handles currently counted against capacity.
    pub fn live(&self) -> usize {
        self.available + self.in_use + self.pending
    }
}

/// Pool of reusable playback handles.
pub struct ResourcePool<F: HandleFactory> {
    factory: Arc<F>,
    capacity: usize,
    /// Idle handles, oldest release first.
    available: VecDeque<(HandleId, F::Handle)>,
    in_use: HashMap<HandleId, F::Handle>,
    /// Reserved slots whose handle is still being built.
    pending: HashSet<HandleId>,
    next_id: u64,
    /// Ids below this were issued before the last `release_all`.
    retired_below: u64,
    created: u64,
    destroyed: u64,
    reused: u64,
}

impl<F: HandleFactory> ResourcePool<F> {
    /// Create an empty pool. No handle is built until the first acquisition.
    pub fn new(factory: F, capacity: usize) -> Result<Self> {
        Self::with_shared_factory(Arc::new(factory), capacity)
    }

    /// Create a pool around a factory shared with the host.
    pub fn with_shared_factory(factory: Arc<F>, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(ReelsError::InvalidParameter(
                "pool capacity must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            factory,
            capacity,
            available: VecDeque::with_capacity(capacity),
            in_use: HashMap::with_capacity(capacity),
            pending: HashSet::new(),
            next_id: 0,
            retired_below: 0,
            created: 0,
            destroyed: 0,
            reused: 0,
        })
    }

    /// Factory used to build new handles.
    pub fn factory(&self) -> Arc<F> {
        Arc::clone(&self.factory)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Handles counted against capacity.
    pub fn live_count(&self) -> usize {
        self.available.len() + self.in_use.len() + self.pending.len()
    }

    pub fn available_count(&self) -> usize {
        self.available.len()
    }

    pub fn in_use_count(&self) -> usize {
        self.in_use.len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_in_use(&self, id: HandleId) -> bool {
        self.in_use.contains_key(&id)
    }

    pub fn is_pending(&self, id: HandleId) -> bool {
        self.pending.contains(&id)
    }

    /// In-use handle by id.
    pub fn get(&self, id: HandleId) -> Option<&F::Handle> {
        self.in_use.get(&id)
    }

    /// Mutable in-use handle by id.
    pub fn get_mut(&mut self, id: HandleId) -> Option<&mut F::Handle> {
        self.in_use.get_mut(&id)
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            capacity: self.capacity,
            available: self.available.len(),
            in_use: self.in_use.len(),
            pending: self.pending.len(),
            created: self.created,
            destroyed: self.destroyed,
            reused: self.reused,
        }
    }

    /// Take an idle handle, or reserve a slot for a new one.
    pub fn reserve(&mut self) -> Result<Reservation> {
        if let Some((id, handle)) = self.available.pop_front() {
            self.in_use.insert(id, handle);
            self.reused += 1;
            debug!("reusing {} ({} in use)", id, self.in_use.len());
            return Ok(Reservation::Ready(id));
        }

        if self.live_count() >= self.capacity {
            warn!(
                "pool exhausted: {} in use, {} pending, capacity {}",
                self.in_use.len(),
                self.pending.len(),
                self.capacity
            );
            return Err(ReelsError::PoolExhausted {
                capacity: self.capacity,
            });
        }

        let id = HandleId(self.next_id);
        self.next_id += 1;
        self.pending.insert(id);
        Ok(Reservation::Pending(id))
    }

    /// Install a handle built for a pending reservation.
    ///
    /// Returns `false` if the reservation no longer exists. A handle whose
    /// reservation was cancelled joins the idle queue when there is room;
    /// one reserved before [`release_all`](Self::release_all) is torn down.
    pub fn fulfil(&mut self, id: HandleId, mut handle: F::Handle) -> bool {
        self.created += 1;
        if self.pending.remove(&id) {
            self.in_use.insert(id, handle);
            debug!("created {} ({} in use)", id, self.in_use.len());
            return true;
        }

        if id.0 >= self.retired_below && self.live_count() < self.capacity {
            handle.reset();
            self.available.push_back((id, handle));
            debug!("{} built after its reservation was cancelled, kept idle", id);
        } else {
            handle.teardown();
            self.destroyed += 1;
            debug!("{} built after its reservation was dropped, torn down", id);
        }
        false
    }

    /// Drop a pending reservation whose handle will never be built.
    pub fn cancel(&mut self, id: HandleId) -> bool {
        self.pending.remove(&id)
    }

    /// Acquire a handle, building it synchronously if none is idle.
    pub fn acquire(&mut self) -> Result<HandleId> {
        match self.reserve()? {
            Reservation::Ready(id) => Ok(id),
            Reservation::Pending(id) => match self.factory.create() {
                Ok(handle) => {
                    self.fulfil(id, handle);
                    Ok(id)
                }
                Err(e) => {
                    self.cancel(id);
                    Err(e)
                }
            },
        }
    }

    /// Return a handle to the pool. Unknown or already released ids are ignored.
    pub fn release(&mut self, id: HandleId) -> bool {
        let Some(mut handle) = self.in_use.remove(&id) else {
            return false;
        };

        handle.reset();

        if self.live_count() < self.capacity {
            self.available.push_back((id, handle));
            debug!("released {} ({} idle)", id, self.available.len());
        } else {
            handle.teardown();
            self.destroyed += 1;
            debug!("released {} over capacity, torn down", id);
        }
        true
    }

    /// Tear down every handle and forget pending reservations. Idempotent.
    pub fn release_all(&mut self) {
        let count = self.available.len() + self.in_use.len();

        for (_, mut handle) in self.available.drain(..) {
            handle.teardown();
        }
        for (_, mut handle) in self.in_use.drain() {
            handle.teardown();
        }
        self.pending.clear();
        self.retired_below = self.next_id;
        self.destroyed += count as u64;

        if count > 0 {
            info!("pool released {} handles", count);
        }
    }

    /// Change capacity. Idle handles over the new capacity are torn down now;
    /// in-use handles over it are torn down when released.
    pub fn set_capacity(&mut self, capacity: usize) -> Result<()> {
        if capacity == 0 {
            return Err(ReelsError::InvalidParameter(
                "pool capacity must be at least 1".to_string(),
            ));
        }

        self.capacity = capacity;
        while self.live_count() > self.capacity {
            let Some((id, mut handle)) = self.available.pop_front() else {
                break;
            };
            handle.teardown();
            self.destroyed += 1;
            debug!("capacity shrink tore down {}", id);
        }
        Ok(())
    }
}

impl<F: HandleFactory> Drop for ResourcePool<F> {
    fn drop(&mut self) {
        self.release_all();
    }
}
