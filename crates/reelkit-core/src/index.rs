//! Mapping from raw pager positions to logical feed items.
//!
//! A finite feed uses the raw position directly. A circular feed presents
//! `item_count` items as an unbounded signed position space; the logical
//! index is the Euclidean remainder of `raw - origin`, widened to `i128`
//! so no pair of `i64` inputs can overflow.

use crate::error::{ReelsError, Result};

/// Resolve a raw pager position to a logical item index.
pub fn to_logical_index(
    raw_position: i64,
    item_count: usize,
    circular: bool,
    origin_offset: i64,
) -> Result<usize> {
    if item_count == 0 {
        return Err(ReelsError::EmptyFeed);
    }

    if circular {
        let offset = i128::from(raw_position) - i128::from(origin_offset);
        // rem_euclid with a positive modulus is always in [0, item_count)
        let index = offset.rem_euclid(item_count as i128);
        return Ok(index as usize);
    }

    match usize::try_from(raw_position) {
        Ok(index) if index < item_count => Ok(index),
        _ => Err(ReelsError::OutOfRange {
            position: raw_position,
            item_count,
        }),
    }
}

/// Position mapper for one feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedIndexMapper {
    item_count: usize,
    circular: bool,
    origin: i64,
}

impl FeedIndexMapper {
    /// Finite feed: raw positions `0..item_count`.
    pub fn finite(item_count: usize) -> Self {
        Self {
            item_count,
            circular: false,
            origin: 0,
        }
    }

    /// Circular feed anchored at raw position 0.
    pub fn circular(item_count: usize) -> Self {
        Self::circular_with_origin(item_count, 0)
    }

    /// Circular feed whose logical item 0 sits at `origin`.
    pub fn circular_with_origin(item_count: usize, origin: i64) -> Self {
        Self {
            item_count,
            circular: true,
            origin,
        }
    }

    pub fn new(item_count: usize, circular: bool) -> Self {
        if circular {
            Self::circular(item_count)
        } else {
            Self::finite(item_count)
        }
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn is_circular(&self) -> bool {
        self.circular
    }

    pub fn origin(&self) -> i64 {
        self.origin
    }

    /// Logical index for a raw position.
    pub fn logical_index(&self, raw_position: i64) -> Result<usize> {
        to_logical_index(raw_position, self.item_count, self.circular, self.origin)
    }

    /// Raw position at which `logical` is shown when the feed opens.
    pub fn raw_position_for(&self, logical: usize) -> Result<i64> {
        if self.item_count == 0 {
            return Err(ReelsError::EmptyFeed);
        }
        if logical >= self.item_count {
            return Err(ReelsError::OutOfRange {
                position: i64::try_from(logical).unwrap_or(i64::MAX),
                item_count: self.item_count,
            });
        }
        let unrepresentable = || {
            ReelsError::InvalidParameter(format!("Index {} does not fit a raw position", logical))
        };
        if !self.circular {
            return i64::try_from(logical).map_err(|_| unrepresentable());
        }

        // step back one period when the origin sits too close to i64::MAX
        let mut raw = i128::from(self.origin) + logical as i128;
        if raw > i128::from(i64::MAX) {
            raw -= self.item_count as i128;
        }
        i64::try_from(raw).map_err(|_| unrepresentable())
    }

    /// Last raw position a finite feed can settle on. `None` for circular or empty feeds.
    pub fn last_valid_page(&self) -> Option<i64> {
        if self.circular || self.item_count == 0 {
            return None;
        }
        i64::try_from(self.item_count - 1).ok()
    }
}
