// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lazily measured per-axis offset cache.

use alloc::vec::Vec;

/// One of the two grid axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// The vertical axis; items are rows.
    Row,
    /// The horizontal axis; items are columns.
    Column,
}

/// Position and extent of a single row or column along its axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemMetadata {
    /// Offset of the item's leading edge from the start of the axis.
    pub offset: f64,
    /// Measured extent of the item.
    pub size: f64,
}

impl ItemMetadata {
    /// Offset of the item's trailing edge.
    #[must_use]
    pub fn end(&self) -> f64 {
        self.offset + self.size
    }
}

/// A dense, forward-only cache of [`ItemMetadata`] for one axis.
///
/// Items are measured in increasing index order the first time something at or
/// beyond them is requested. Everything up to [`MetadataMap::last_measured_index`]
/// is cached; nothing past it is. Invariant: for every cached `i > 0`,
/// `offset(i) == offset(i - 1) + size(i - 1)`, and `offset(0) == 0`.
#[derive(Clone, Default, Debug)]
pub struct MetadataMap {
    items: Vec<ItemMetadata>,
}

impl MetadataMap {
    /// Creates an empty map with nothing measured.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Highest measured index, or `None` before anything has been measured.
    #[must_use]
    pub fn last_measured_index(&self) -> Option<usize> {
        self.items.len().checked_sub(1)
    }

    /// Number of measured items.
    #[must_use]
    pub fn measured_len(&self) -> usize {
        self.items.len()
    }

    /// Returns cached metadata for `index` without measuring anything.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<ItemMetadata> {
        self.items.get(index).copied()
    }

    /// Offset of the last measured item, or `0` when nothing is measured.
    #[must_use]
    pub fn frontier_offset(&self) -> f64 {
        self.items.last().map_or(0.0, |item| item.offset)
    }

    /// Returns metadata for `index`, measuring every unmeasured item up to it first.
    ///
    /// `size_of` is called exactly once per newly measured index, in increasing
    /// order. Already measured indices are returned from the cache.
    pub fn measure_up_to(&mut self, index: usize, size_of: &dyn Fn(usize) -> f64) -> ItemMetadata {
        if index >= self.items.len() {
            let mut offset = self.items.last().map_or(0.0, ItemMetadata::end);
            self.items.reserve(index + 1 - self.items.len());
            for i in self.items.len()..=index {
                let mut size = size_of(i);
                debug_assert!(
                    size.is_finite(),
                    "item sizes must be finite; got {size:?} at index {i}"
                );
                if size.is_sign_negative() {
                    size = 0.0;
                }
                self.items.push(ItemMetadata { offset, size });
                offset += size;
            }
        }
        self.items[index]
    }

    /// Lowers the watermark to `index - 1`, dropping everything measured at or after `index`.
    ///
    /// Never raises the watermark. Returns `true` if anything was dropped.
    pub fn reset_after(&mut self, index: usize) -> bool {
        if index < self.items.len() {
            self.items.truncate(index);
            true
        } else {
            false
        }
    }
}

/// The per-instance measurement state: one [`MetadataMap`] per axis.
#[derive(Clone, Default, Debug)]
pub struct InstanceState {
    /// Row metadata.
    pub rows: MetadataMap,
    /// Column metadata.
    pub columns: MetadataMap,
}

impl InstanceState {
    /// Creates state with nothing measured on either axis.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rows: MetadataMap::new(),
            columns: MetadataMap::new(),
        }
    }

    /// Returns the map for `axis`.
    #[must_use]
    pub fn axis(&self, axis: Axis) -> &MetadataMap {
        match axis {
            Axis::Row => &self.rows,
            Axis::Column => &self.columns,
        }
    }

    /// Returns the map for `axis` mutably.
    pub fn axis_mut(&mut self, axis: Axis) -> &mut MetadataMap {
        match axis {
            Axis::Row => &mut self.rows,
            Axis::Column => &mut self.columns,
        }
    }
}
