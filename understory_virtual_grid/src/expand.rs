// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Expandable rows.
//!
//! An expanded row grows by an extra band below its cells. The band is either
//! one strip per column ([`ExpandStrategy::Default`]) or a single overlay
//! spanning the viewport ([`ExpandStrategy::Cover`]).

use hashbrown::HashMap;

/// How the extra band of an expanded row is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExpandStrategy {
    /// One overlay spanning the full viewport width.
    Cover,
    /// One strip under each rendered cell.
    #[default]
    Default,
}

/// Expansion settings for a single row.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Expansion {
    /// Whether the row is currently expanded.
    pub enable: bool,
    /// Height of the extra band, included in the row's size.
    pub height: f64,
    /// Rendering strategy for the band.
    pub strategy: ExpandStrategy,
}

impl Expansion {
    /// An enabled expansion of `height` using `strategy`.
    #[must_use]
    pub const fn new(height: f64, strategy: ExpandStrategy) -> Self {
        Self {
            enable: true,
            height,
            strategy,
        }
    }
}

/// Where an expansion band is being rendered; passed to the band renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExpandAt {
    /// Under a body cell, in the given column.
    Cell {
        /// Column of the cell above the strip.
        column: usize,
    },
    /// Under the frozen left columns.
    Left,
    /// Under the frozen right columns.
    Right,
    /// A full-width overlay.
    Cover,
}

/// Sparse row index → [`Expansion`] table.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExpandableMap {
    rows: HashMap<usize, Expansion>,
}

impl ExpandableMap {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets or replaces the expansion for `row`.
    pub fn insert(&mut self, row: usize, expansion: Expansion) -> Option<Expansion> {
        self.rows.insert(row, expansion)
    }

    /// Removes the expansion for `row`.
    pub fn remove(&mut self, row: usize) -> Option<Expansion> {
        self.rows.remove(&row)
    }

    /// Returns the raw entry for `row`, enabled or not.
    #[must_use]
    pub fn get(&self, row: usize) -> Option<&Expansion> {
        self.rows.get(&row)
    }

    /// Returns the expansion for `row` if it is enabled.
    #[must_use]
    pub fn active(&self, row: usize) -> Option<&Expansion> {
        self.rows.get(&row).filter(|e| e.enable)
    }

    /// Height of the band for `row`, `0` when not expanded.
    #[must_use]
    pub fn expanded_height(&self, row: usize) -> f64 {
        self.active(row).map_or(0.0, |e| e.height)
    }

    /// Returns `true` if no row has an entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates over all entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Expansion)> + '_ {
        self.rows.iter().map(|(row, e)| (*row, e))
    }
}

impl FromIterator<(usize, Expansion)> for ExpandableMap {
    fn from_iter<I: IntoIterator<Item = (usize, Expansion)>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl Extend<(usize, Expansion)> for ExpandableMap {
    fn extend<I: IntoIterator<Item = (usize, Expansion)>>(&mut self, iter: I) {
        self.rows.extend(iter);
    }
}
