// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frozen rows and columns, and the space they reserve at the viewport edges.

use smallvec::SmallVec;

/// Number of rows/columns pinned to each edge of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrozenCounts {
    /// Leading rows pinned to the top edge.
    pub top: usize,
    /// Leading columns pinned to the left edge.
    pub left: usize,
    /// Trailing columns pinned to the right edge.
    pub right: usize,
}

impl FrozenCounts {
    /// Creates counts for the three edges.
    #[must_use]
    pub const fn new(top: usize, left: usize, right: usize) -> Self {
        Self { top, left, right }
    }

    /// Index of the first right-frozen column in an axis of `column_count` columns.
    ///
    /// Equals `column_count` when nothing is frozen on the right.
    #[must_use]
    pub const fn first_right(&self, column_count: usize) -> usize {
        column_count.saturating_sub(self.right)
    }
}

/// Measured sizes of the frozen rows and columns.
///
/// The yields are the pixel extents a frozen region covers at its edge; the
/// scrollable window is shrunk by them when locating visible items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrozenExtents {
    /// Heights of the frozen top rows, in order.
    pub top_heights: SmallVec<[f64; 2]>,
    /// Widths of the left-frozen columns, in order.
    pub left_widths: SmallVec<[f64; 4]>,
    /// Widths of the right-frozen columns, in order.
    pub right_widths: SmallVec<[f64; 4]>,
    /// Index of the first right-frozen column.
    pub first_right: usize,
}

impl FrozenExtents {
    /// Measures the frozen regions described by `counts`.
    ///
    /// Counts larger than the axis are truncated to it so size functions are
    /// never called out of range.
    pub fn measure(
        counts: FrozenCounts,
        row_count: usize,
        column_count: usize,
        row_height: &dyn Fn(usize) -> f64,
        column_width: &dyn Fn(usize) -> f64,
    ) -> Self {
        let first_right = counts.first_right(column_count);
        Self {
            top_heights: (0..counts.top.min(row_count)).map(row_height).collect(),
            left_widths: (0..counts.left.min(column_count))
                .map(column_width)
                .collect(),
            right_widths: (first_right..column_count).map(column_width).collect(),
            first_right,
        }
    }

    /// Total height of the frozen top rows.
    #[must_use]
    pub fn top(&self) -> f64 {
        self.top_heights.iter().sum()
    }

    /// Total width of the left-frozen columns.
    #[must_use]
    pub fn left(&self) -> f64 {
        self.left_widths.iter().sum()
    }

    /// Total width of the right-frozen columns.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.right_widths.iter().sum()
    }

    /// Returns `true` if any column is frozen on either side.
    #[must_use]
    pub fn has_side_columns(&self) -> bool {
        !self.left_widths.is_empty() || !self.right_widths.is_empty()
    }

    /// Offset of frozen top row `row` from the top edge.
    #[must_use]
    pub fn top_offset(&self, row: usize) -> f64 {
        self.top_heights.iter().take(row).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::{FrozenCounts, FrozenExtents};

    #[test]
    fn yields_sum_frozen_sizes() {
        let extents = FrozenExtents::measure(
            FrozenCounts::new(2, 2, 1),
            100,
            10,
            &|r| 30.0 + r as f64,
            &|c| 100.0 + 10.0 * c as f64,
        );
        assert_eq!(extents.top(), 61.0);
        assert_eq!(extents.top_offset(1), 30.0);
        assert_eq!(extents.left(), 210.0);
        assert_eq!(extents.first_right, 9);
        assert_eq!(extents.right(), 190.0);
    }

    #[test]
    fn oversized_counts_are_truncated() {
        let extents = FrozenExtents::measure(
            FrozenCounts::new(5, 5, 5),
            2,
            3,
            &|_| 10.0,
            &|c| {
                assert!(c < 3, "column {c} out of range");
                10.0
            },
        );
        assert_eq!(extents.top(), 20.0);
        assert_eq!(extents.left(), 30.0);
        assert_eq!(extents.first_right, 0);
        assert_eq!(extents.right(), 30.0);
    }

    #[test]
    fn nothing_frozen() {
        let counts = FrozenCounts::default();
        assert_eq!(counts.first_right(7), 7);
        let extents = FrozenExtents::measure(counts, 10, 7, &|_| 10.0, &|_| 10.0);
        assert!(!extents.has_side_columns());
        assert_eq!(extents.top(), 0.0);
        assert_eq!(extents.left(), 0.0);
        assert_eq!(extents.right(), 0.0);
    }
}
