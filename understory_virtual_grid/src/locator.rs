// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Offset-to-index lookup and visible range computation.

use core::cmp::Ordering;
use core::ops::RangeInclusive;

use crate::{MetadataMap, ScrollDirection};

/// An inclusive range of item indices to materialize along one axis.
///
/// `start > stop` describes an empty range; this happens when frozen regions
/// leave nothing to scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibleRange {
    /// First index to render (inclusive).
    pub start: usize,
    /// Last index to render (inclusive).
    pub stop: usize,
}

impl VisibleRange {
    /// Creates a range covering `start..=stop`.
    #[must_use]
    pub const fn new(start: usize, stop: usize) -> Self {
        Self { start, stop }
    }

    /// Returns `true` if the range contains no index.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start > self.stop
    }

    /// Number of indices in the range.
    #[must_use]
    pub const fn len(&self) -> usize {
        if self.start > self.stop {
            0
        } else {
            self.stop - self.start + 1
        }
    }

    /// Returns `true` if `index` lies inside the range.
    #[must_use]
    pub const fn contains(&self, index: usize) -> bool {
        self.start <= index && index <= self.stop
    }

    /// Iterator over the indices in the range.
    #[must_use]
    pub fn indices(&self) -> RangeInclusive<usize> {
        self.start..=self.stop
    }
}

/// Finds the item covering `offset`.
///
/// Offsets inside the measured frontier use a binary search over the cache;
/// offsets beyond it use an exponential search that measures forward from the
/// watermark as it probes. Returns `0` for an empty axis.
pub fn find_nearest_item(
    map: &mut MetadataMap,
    item_count: usize,
    size_of: &dyn Fn(usize) -> f64,
    offset: f64,
) -> usize {
    if item_count == 0 {
        return 0;
    }
    match map.last_measured_index() {
        Some(last) if map.frontier_offset() >= offset => {
            binary_search(map, size_of, 0, last, offset)
        }
        last => exponential_search(map, item_count, size_of, last.unwrap_or(0), offset),
    }
}

/// Binary search over the inclusive index range `[low, high]`.
///
/// Returns the index whose offset equals `offset`, or the largest probed index
/// whose offset is below it (clamped to `0`).
fn binary_search(
    map: &mut MetadataMap,
    size_of: &dyn Fn(usize) -> f64,
    mut low: usize,
    high: usize,
    offset: f64,
) -> usize {
    // Exclusive upper bound keeps the arithmetic unsigned.
    let mut high = high + 1;
    while low < high {
        let middle = low + (high - low) / 2;
        let current = map.measure_up_to(middle, size_of).offset;
        match current.partial_cmp(&offset) {
            Some(Ordering::Equal) => return middle,
            Some(Ordering::Less) => low = middle + 1,
            _ => high = middle,
        }
    }
    low.saturating_sub(1)
}

fn exponential_search(
    map: &mut MetadataMap,
    item_count: usize,
    size_of: &dyn Fn(usize) -> f64,
    mut index: usize,
    offset: f64,
) -> usize {
    let mut interval = 1;
    while index < item_count && map.measure_up_to(index, size_of).offset < offset {
        index += interval;
        interval *= 2;
    }
    binary_search(
        map,
        size_of,
        index / 2,
        index.min(item_count - 1),
        offset,
    )
}

/// Returns the last index needed to fill the viewport when rendering from `start_index`.
///
/// Sizes are accumulated from `start_index` until the running end offset reaches
/// `scroll_offset + viewport_extent - trailing_reserved` or the axis runs out.
pub fn stop_index_for_start_index(
    map: &mut MetadataMap,
    item_count: usize,
    size_of: &dyn Fn(usize) -> f64,
    start_index: usize,
    scroll_offset: f64,
    viewport_extent: f64,
    trailing_reserved: f64,
) -> usize {
    let max_offset = scroll_offset + viewport_extent - trailing_reserved;
    let mut offset = map.measure_up_to(start_index, size_of).end();
    let mut stop_index = start_index;
    while stop_index + 1 < item_count && offset < max_offset {
        stop_index += 1;
        offset += map.measure_up_to(stop_index, size_of).size;
    }
    stop_index
}

/// Everything needed to compute the visible range along one axis.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AxisWindow {
    pub(crate) item_count: usize,
    pub(crate) scroll_offset: f64,
    pub(crate) viewport_extent: f64,
    /// Pixels occupied by leading frozen items.
    pub(crate) leading_yield: f64,
    /// Pixels occupied by trailing frozen items.
    pub(crate) trailing_yield: f64,
    /// Number of leading frozen items.
    pub(crate) leading_frozen: usize,
    /// Index of the first trailing frozen item (`item_count` when there are none).
    pub(crate) first_trailing_frozen: usize,
    pub(crate) overscan: usize,
    pub(crate) direction: ScrollDirection,
    pub(crate) is_scrolling: bool,
}

/// Resolves `(backward, forward)` overscan counts.
///
/// While scrolling, the full overscan is spent in the direction of travel and a
/// single item is kept behind it. At rest both sides get the full overscan.
pub(crate) fn resolve_overscan(
    overscan: usize,
    direction: ScrollDirection,
    is_scrolling: bool,
) -> (usize, usize) {
    let full = overscan.max(1);
    let backward = if !is_scrolling || direction == ScrollDirection::Backward {
        full
    } else {
        1
    };
    let forward = if !is_scrolling || direction == ScrollDirection::Forward {
        full
    } else {
        1
    };
    (backward, forward)
}

/// Computes the scrollable visible range along one axis.
///
/// Frozen items on either edge are excluded; they are laid out separately.
pub(crate) fn compute_visible_range(
    map: &mut MetadataMap,
    size_of: &dyn Fn(usize) -> f64,
    window: &AxisWindow,
) -> VisibleRange {
    let start_index = find_nearest_item(
        map,
        window.item_count,
        size_of,
        window.scroll_offset + window.leading_yield,
    );
    let stop_index = stop_index_for_start_index(
        map,
        window.item_count,
        size_of,
        start_index,
        window.scroll_offset,
        window.viewport_extent,
        window.trailing_yield,
    );

    let (backward, forward) = resolve_overscan(window.overscan, window.direction, window.is_scrolling);

    // Every item is frozen at the trailing edge: nothing is left to scroll.
    let Some(last_scrollable) = window.first_trailing_frozen.checked_sub(1) else {
        return VisibleRange::new(1, 0);
    };
    let start = start_index.saturating_sub(backward).max(window.leading_frozen);
    let stop = (stop_index + forward)
        .min(window.item_count.saturating_sub(1))
        .min(last_scrollable);
    VisibleRange::new(start, stop)
}

#[cfg(test)]
mod tests {
    use super::{
        AxisWindow, VisibleRange, compute_visible_range, find_nearest_item, resolve_overscan,
        stop_index_for_start_index,
    };
    use crate::{MetadataMap, ScrollDirection};

    fn window(item_count: usize, scroll_offset: f64, viewport_extent: f64) -> AxisWindow {
        AxisWindow {
            item_count,
            scroll_offset,
            viewport_extent,
            leading_yield: 0.0,
            trailing_yield: 0.0,
            leading_frozen: 0,
            first_trailing_frozen: item_count,
            overscan: 1,
            direction: ScrollDirection::Forward,
            is_scrolling: false,
        }
    }

    #[test]
    fn exponential_search_locates_row_on_fresh_axis() {
        let mut map = MetadataMap::new();
        let size_of = |_: usize| 50.0;
        assert_eq!(find_nearest_item(&mut map, 100, &size_of, 2025.0), 40);

        // Probing doubles past the target rather than measuring the whole axis.
        let watermark = map.last_measured_index().unwrap();
        assert!(watermark >= 40);
        assert!(watermark < 80, "measured up to {watermark}");
    }

    #[test]
    fn binary_and_exponential_paths_agree() {
        let sizes = [12.0, 40.0, 7.0, 33.0, 21.0, 50.0, 5.0, 18.0, 26.0, 9.0];
        let size_of = |i: usize| sizes[i];
        let total: f64 = sizes.iter().sum();

        let mut full = MetadataMap::new();
        full.measure_up_to(sizes.len() - 1, &size_of);

        let mut offset = 0.0;
        while offset < total + 20.0 {
            let mut fresh = MetadataMap::new();
            let lazy = find_nearest_item(&mut fresh, sizes.len(), &size_of, offset);
            let eager = find_nearest_item(&mut full, sizes.len(), &size_of, offset);
            assert_eq!(lazy, eager, "offset {offset}");
            offset += 3.5;
        }
    }

    #[test]
    fn binary_search_returns_covering_item() {
        let mut map = MetadataMap::new();
        let size_of = |i: usize| if i % 2 == 0 { 10.0 } else { 30.0 };
        map.measure_up_to(9, &size_of);

        for index in 0..10 {
            let meta = map.get(index).unwrap();
            let midpoint = meta.offset + meta.size / 2.0;
            assert_eq!(find_nearest_item(&mut map, 10, &size_of, midpoint), index);
            assert_eq!(find_nearest_item(&mut map, 10, &size_of, meta.offset), index);
        }
    }

    #[test]
    fn offsets_past_the_end_resolve_to_last_item() {
        let mut map = MetadataMap::new();
        let size_of = |_: usize| 10.0;
        assert_eq!(find_nearest_item(&mut map, 5, &size_of, 1_000.0), 4);
        assert_eq!(map.last_measured_index(), Some(4));
    }

    #[test]
    fn empty_axis_resolves_to_zero_without_measuring() {
        let mut map = MetadataMap::new();
        assert_eq!(find_nearest_item(&mut map, 0, &|_| 10.0, 50.0), 0);
        assert_eq!(map.last_measured_index(), None);
    }

    #[test]
    fn stop_index_accounts_for_trailing_reserve() {
        let mut map = MetadataMap::new();
        let size_of = |_: usize| 10.0;
        assert_eq!(stop_index_for_start_index(&mut map, 100, &size_of, 0, 0.0, 50.0, 0.0), 4);
        assert_eq!(stop_index_for_start_index(&mut map, 100, &size_of, 0, 0.0, 50.0, 20.0), 2);
        // Partially visible trailing item is included.
        assert_eq!(stop_index_for_start_index(&mut map, 100, &size_of, 2, 25.0, 30.0, 0.0), 5);
        // Axis exhaustion stops the walk.
        assert_eq!(stop_index_for_start_index(&mut map, 3, &size_of, 0, 0.0, 500.0, 0.0), 2);
    }

    #[test]
    fn overscan_follows_scroll_direction_while_scrolling() {
        assert_eq!(resolve_overscan(0, ScrollDirection::Forward, false), (1, 1));
        assert_eq!(resolve_overscan(4, ScrollDirection::Forward, false), (4, 4));
        assert_eq!(resolve_overscan(4, ScrollDirection::Forward, true), (1, 4));
        assert_eq!(resolve_overscan(4, ScrollDirection::Backward, true), (4, 1));
    }

    #[test]
    fn visible_range_includes_overscan() {
        let mut map = MetadataMap::new();
        let size_of = |_: usize| 10.0;
        let range = compute_visible_range(&mut map, &size_of, &window(100, 100.0, 50.0));
        // Items 10..=14 are visible, one extra on each side.
        assert_eq!(range, VisibleRange::new(9, 15));
        assert_eq!(range.len(), 7);
    }

    #[test]
    fn visible_range_excludes_frozen_items() {
        let mut map = MetadataMap::new();
        let size_of = |_: usize| 10.0;
        let mut w = window(20, 0.0, 200.0);
        w.leading_frozen = 2;
        w.leading_yield = 20.0;
        w.first_trailing_frozen = 18;
        w.trailing_yield = 20.0;
        w.overscan = 10;

        let range = compute_visible_range(&mut map, &size_of, &w);
        assert_eq!(range.start, 2);
        assert_eq!(range.stop, 17);
        assert!(!range.contains(1));
        assert!(!range.contains(18));
    }

    #[test]
    fn fully_frozen_axis_yields_empty_range() {
        let mut map = MetadataMap::new();
        let size_of = |_: usize| 10.0;
        let mut w = window(4, 0.0, 100.0);
        w.leading_frozen = 2;
        w.first_trailing_frozen = 2;
        let range = compute_visible_range(&mut map, &size_of, &w);
        assert!(range.is_empty());
        assert_eq!(range.indices().count(), 0);
    }

    #[test]
    fn axis_frozen_only_at_trailing_edge_yields_empty_range() {
        let mut map = MetadataMap::new();
        let size_of = |_: usize| 10.0;
        let mut w = window(3, 0.0, 100.0);
        w.first_trailing_frozen = 0;
        w.trailing_yield = 30.0;
        let range = compute_visible_range(&mut map, &size_of, &w);
        assert!(range.is_empty());
        assert!(!range.contains(0));
        assert_eq!(range.indices().count(), 0);
    }
}
