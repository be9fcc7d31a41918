//! Page to handle bindings.

use crate::handle::{HandleFactory, HandleId};
use crate::pool::ResourcePool;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Binding state of a page that holds a pool slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Handle is in use and attached to the page.
    Bound(HandleId),
    /// Slot reserved, handle still under construction.
    Pending(HandleId),
}

impl Binding {
    pub fn id(&self) -> HandleId {
        match self {
            Self::Bound(id) | Self::Pending(id) => *id,
        }
    }
}

/// Map from raw page to its binding. Pages without an entry are unbound.
///
/// Evicting a `Bound` entry releases its handle to the pool once. `Pending`
/// entries own no handle yet; their slot is settled when construction
/// completes.
#[derive(Debug, Default)]
pub struct PageBindingTable {
    entries: BTreeMap<i64, Binding>,
}

impl PageBindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, page: i64) -> Option<Binding> {
        self.entries.get(&page).copied()
    }

    /// Handle bound to `page`, ignoring pending reservations.
    pub fn handle_id(&self, page: i64) -> Option<HandleId> {
        match self.entries.get(&page) {
            Some(Binding::Bound(id)) => Some(*id),
            _ => None,
        }
    }

    /// Pages holding a slot (bound or pending), ascending.
    pub fn pages(&self) -> impl Iterator<Item = i64> + '_ {
        self.entries.keys().copied()
    }

    /// Pages with an attached handle, ascending.
    pub fn bound(&self) -> impl Iterator<Item = (i64, HandleId)> + '_ {
        self.entries.iter().filter_map(|(page, binding)| match binding {
            Binding::Bound(id) => Some((*page, *id)),
            Binding::Pending(_) => None,
        })
    }

    /// Attach a handle to an unbound page. Returns `false` if the page already holds a slot.
    pub fn bind(&mut self, page: i64, id: HandleId) -> bool {
        self.insert_if_vacant(page, Binding::Bound(id))
    }

    /// Record a pending reservation for an unbound page.
    pub fn reserve(&mut self, page: i64, id: HandleId) -> bool {
        self.insert_if_vacant(page, Binding::Pending(id))
    }

    /// Turn the page's pending reservation `id` into a binding.
    pub fn promote(&mut self, page: i64, id: HandleId) -> bool {
        match self.entries.get_mut(&page) {
            Some(binding) if *binding == Binding::Pending(id) => {
                *binding = Binding::Bound(id);
                true
            }
            _ => false,
        }
    }

    /// Remove a page's entry, releasing a bound handle back to `pool` or
    /// cancelling a pending reservation.
    pub fn evict<F: HandleFactory>(
        &mut self,
        page: i64,
        pool: &mut ResourcePool<F>,
    ) -> Option<Binding> {
        let binding = self.entries.remove(&page)?;
        match binding {
            Binding::Bound(id) => {
                pool.release(id);
            }
            Binding::Pending(id) => {
                pool.cancel(id);
            }
        }
        Some(binding)
    }

    /// Forget every entry without touching the pool (the pool is being torn down).
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn insert_if_vacant(&mut self, page: i64, binding: Binding) -> bool {
        match self.entries.entry(page) {
            Entry::Vacant(slot) => {
                slot.insert(binding);
                true
            }
            Entry::Occupied(_) => false,
        }
    }
}
