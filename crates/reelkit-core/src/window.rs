//! Preload window around the settled page.

use std::collections::BTreeSet;

/// Inclusive range of raw pages that should hold a live handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    center: i64,
    start: i64,
    end: i64,
}

/// Pages within `radius` of `current`, clipped to `[0, last_valid_page]` for
/// finite feeds. Circular feeds pass `None` and get the unclipped range.
pub fn window_for(current: i64, radius: usize, last_valid_page: Option<i64>) -> PageWindow {
    let radius = i64::try_from(radius).unwrap_or(i64::MAX);
    let mut start = current.saturating_sub(radius);
    let mut end = current.saturating_add(radius);

    if let Some(last) = last_valid_page {
        start = start.max(0);
        end = end.min(last);
    }

    PageWindow {
        center: current,
        start,
        end,
    }
}

impl PageWindow {
    pub fn center(&self) -> i64 {
        self.center
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (i128::from(self.end) - i128::from(self.start) + 1) as usize
        }
    }

    pub fn contains(&self, page: i64) -> bool {
        page >= self.start && page <= self.end
    }

    /// All pages in ascending order.
    pub fn pages(&self) -> impl Iterator<Item = i64> {
        self.start..=self.end
    }

    /// Pages ordered by acquisition priority: center first, then by
    /// increasing distance, the forward page before the backward one.
    pub fn by_priority(&self) -> Vec<i64> {
        let mut pages: Vec<i64> = self.pages().collect();
        pages.sort_by_key(|&page| {
            let distance = (i128::from(page) - i128::from(self.center)).unsigned_abs();
            (distance, page < self.center)
        });
        pages
    }

    /// Compare the window against the currently bound pages.
    pub fn diff<I>(&self, bound: I) -> WindowDiff
    where
        I: IntoIterator<Item = i64>,
    {
        let bound: BTreeSet<i64> = bound.into_iter().collect();

        let release = bound
            .iter()
            .copied()
            .filter(|page| !self.contains(*page))
            .collect();

        let acquire = self
            .by_priority()
            .into_iter()
            .filter(|page| !bound.contains(page))
            .collect();

        WindowDiff { release, acquire }
    }
}

/// Result of comparing a window with the bound page set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowDiff {
    /// Bound pages outside the window, ascending.
    pub release: Vec<i64>,
    /// Window pages without a binding, in priority order.
    pub acquire: Vec<i64>,
}
