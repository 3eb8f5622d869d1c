// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cell styles, descriptor keys, and the per-instance style cache.

use core::fmt;

use hashbrown::HashMap;

use crate::ExpandAt;

/// Stacking layer of a frozen or placeholder cell.
///
/// Body cells have no layer and stack at the host's default level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Layer {
    /// Left-frozen cells inside a frozen top row.
    LeftHead,
    /// Right-frozen cells inside a frozen top row.
    RightHead,
    /// Scrollable cells of a frozen top row, and header placeholders.
    TopRow,
    /// Left-frozen body cells.
    LeftCell,
    /// Right-frozen body cells.
    RightCell,
    /// Body placeholders filling unused width.
    Placeholder,
}

impl Layer {
    /// Numeric z-index for this layer. Higher values paint on top.
    #[must_use]
    pub const fn z_index(self) -> i32 {
        match self {
            Self::LeftHead => 5,
            Self::RightHead => 4,
            Self::TopRow => 3,
            Self::LeftCell => 2,
            Self::RightCell => 1,
            Self::Placeholder => -2,
        }
    }
}

/// How a cell is positioned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Position {
    /// Placed at `left`/`right` and `top` inside the content area.
    #[default]
    Absolute,
    /// Laid out in flow and pinned to the viewport edge by its offsets.
    Sticky,
}

/// A horizontal length.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Length {
    /// A fixed number of pixels.
    Px(f64),
    /// The full width of the containing content area.
    Fill,
    /// The full width of the containing content area minus a pixel amount.
    FillMinus(f64),
}

impl Default for Length {
    fn default() -> Self {
        Self::Px(0.0)
    }
}

/// Position, size, and stacking of one rendered cell.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellStyle {
    /// Positioning scheme.
    pub position: Position,
    /// Offset from the left edge.
    pub left: Option<f64>,
    /// Offset from the right edge, used instead of `left` under right-to-left layout.
    pub right: Option<f64>,
    /// Offset from the top edge.
    pub top: Option<f64>,
    /// Width.
    pub width: Length,
    /// Height.
    pub height: f64,
    /// Stacking layer, `None` for body cells.
    pub layer: Option<Layer>,
    /// Extra space above the cell in flow layout.
    pub margin_top: Option<f64>,
    /// Extra space left of the cell in flow layout.
    pub margin_left: Option<f64>,
    /// Extra space below the cell in flow layout.
    pub margin_bottom: Option<f64>,
    /// Whether the cell flows inline with its neighbours instead of starting a new line.
    pub inline: bool,
    /// Whether the cell only reserves space and must not be painted or hit.
    pub hidden: bool,
}

impl CellStyle {
    /// An absolutely positioned style at `(left, top)` with the given size.
    #[must_use]
    pub const fn absolute(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            position: Position::Absolute,
            left: Some(left),
            right: None,
            top: Some(top),
            width: Length::Px(width),
            height,
            layer: None,
            margin_top: None,
            margin_left: None,
            margin_bottom: None,
            inline: false,
            hidden: false,
        }
    }

    /// A sticky style with the given size and no offsets.
    #[must_use]
    pub const fn sticky(width: Length, height: f64) -> Self {
        Self {
            position: Position::Sticky,
            left: None,
            right: None,
            top: None,
            width,
            height,
            layer: None,
            margin_top: None,
            margin_left: None,
            margin_bottom: None,
            inline: false,
            hidden: false,
        }
    }

    /// Numeric z-index, if the cell is on a layer.
    #[must_use]
    pub fn z_index(&self) -> Option<i32> {
        self.layer.map(Layer::z_index)
    }
}

/// What a descriptor represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellKind {
    /// A data cell produced by the cell renderer.
    Cell,
    /// An expansion band produced by the expansion renderer.
    Expand(ExpandAt),
    /// An invisible spacer keeping right-frozen columns aligned under a cover overlay.
    Shadow,
    /// Filler for width not covered by columns, produced by the placeholder renderer.
    Placeholder,
}

/// Stable identity of a descriptor within one layout pass.
///
/// Displays as the string keys hosts typically use for reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellKey {
    /// `row:column`
    Cell {
        /// Row index.
        row: usize,
        /// Column index.
        column: usize,
    },
    /// `__expand:row:column`
    Strip {
        /// Row index.
        row: usize,
        /// Column index.
        column: usize,
    },
    /// `__expand:cover:row`
    Cover(usize),
    /// `__expand:left:row`
    LeftStrip(usize),
    /// `__expand:right:row`
    RightStrip(usize),
    /// `__expand:shadow:row`
    Shadow(usize),
    /// `__grid_placeholder:head__` for the first frozen row, `__grid_placeholder:head:row__` after it.
    HeadPlaceholder(usize),
    /// `__grid_placeholder:row__`
    Placeholder(usize),
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Cell { row, column } => write!(f, "{row}:{column}"),
            Self::Strip { row, column } => write!(f, "__expand:{row}:{column}"),
            Self::Cover(row) => write!(f, "__expand:cover:{row}"),
            Self::LeftStrip(row) => write!(f, "__expand:left:{row}"),
            Self::RightStrip(row) => write!(f, "__expand:right:{row}"),
            Self::Shadow(row) => write!(f, "__expand:shadow:{row}"),
            Self::HeadPlaceholder(0) => f.write_str("__grid_placeholder:head__"),
            Self::HeadPlaceholder(row) => write!(f, "__grid_placeholder:head:{row}__"),
            Self::Placeholder(row) => write!(f, "__grid_placeholder:{row}__"),
        }
    }
}

/// One positioned unit of layout output.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellDescriptor {
    /// What the descriptor represents.
    pub kind: CellKind,
    /// Row the descriptor belongs to.
    pub row_index: usize,
    /// Column the descriptor belongs to, if it is tied to one.
    pub column_index: Option<usize>,
    /// Where and how large to draw it.
    pub style: CellStyle,
    /// Stable identity.
    pub key: CellKey,
}

impl CellDescriptor {
    pub(crate) fn cell(row: usize, column: usize, style: CellStyle) -> Self {
        Self {
            kind: CellKind::Cell,
            row_index: row,
            column_index: Some(column),
            style,
            key: CellKey::Cell { row, column },
        }
    }

    pub(crate) fn band(row: usize, at: ExpandAt, style: CellStyle) -> Self {
        let (key, column_index) = match at {
            ExpandAt::Cell { column } => (CellKey::Strip { row, column }, Some(column)),
            ExpandAt::Left => (CellKey::LeftStrip(row), None),
            ExpandAt::Right => (CellKey::RightStrip(row), None),
            ExpandAt::Cover => (CellKey::Cover(row), None),
        };
        Self {
            kind: CellKind::Expand(at),
            row_index: row,
            column_index,
            style,
            key,
        }
    }

    pub(crate) fn shadow(row: usize, style: CellStyle) -> Self {
        Self {
            kind: CellKind::Shadow,
            row_index: row,
            column_index: None,
            style,
            key: CellKey::Shadow(row),
        }
    }

    pub(crate) fn placeholder(row: usize, key: CellKey, style: CellStyle) -> Self {
        Self {
            kind: CellKind::Placeholder,
            row_index: row,
            column_index: None,
            style,
            key,
        }
    }
}

/// Base styles of body cells keyed by `(row, column)`.
///
/// Entries hold the unexpanded geometry; they are valid until the next
/// invalidation, which clears the whole cache.
#[derive(Debug, Clone, Default)]
pub struct StyleCache {
    styles: HashMap<(usize, usize), CellStyle>,
}

impl StyleCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached style for `(row, column)`, computing it with `make` on a miss.
    pub fn get_or_insert_with(
        &mut self,
        row: usize,
        column: usize,
        make: impl FnOnce() -> CellStyle,
    ) -> CellStyle {
        *self.styles.entry((row, column)).or_insert_with(make)
    }

    /// Returns the cached style for `(row, column)` without computing anything.
    #[must_use]
    pub fn get(&self, row: usize, column: usize) -> Option<CellStyle> {
        self.styles.get(&(row, column)).copied()
    }

    /// Number of cached styles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Returns `true` if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Drops every cached style.
    pub fn clear(&mut self) {
        self.styles.clear();
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::{CellKey, CellStyle, Layer, Length, Position, StyleCache};

    #[test]
    fn keys_render_as_reconciliation_strings() {
        assert_eq!(CellKey::Cell { row: 3, column: 7 }.to_string(), "3:7");
        assert_eq!(
            CellKey::Strip { row: 3, column: 7 }.to_string(),
            "__expand:3:7"
        );
        assert_eq!(CellKey::Cover(4).to_string(), "__expand:cover:4");
        assert_eq!(CellKey::LeftStrip(4).to_string(), "__expand:left:4");
        assert_eq!(CellKey::RightStrip(4).to_string(), "__expand:right:4");
        assert_eq!(CellKey::Shadow(4).to_string(), "__expand:shadow:4");
        assert_eq!(
            CellKey::HeadPlaceholder(0).to_string(),
            "__grid_placeholder:head__"
        );
        assert_eq!(
            CellKey::HeadPlaceholder(1).to_string(),
            "__grid_placeholder:head:1__"
        );
        assert_eq!(CellKey::Placeholder(9).to_string(), "__grid_placeholder:9__");
    }

    #[test]
    fn layers_stack_in_order() {
        let layers = [
            Layer::Placeholder,
            Layer::RightCell,
            Layer::LeftCell,
            Layer::TopRow,
            Layer::RightHead,
            Layer::LeftHead,
        ];
        for pair in layers.windows(2) {
            assert!(pair[0].z_index() < pair[1].z_index());
        }
    }

    #[test]
    fn constructors_set_positioning_scheme() {
        let style = CellStyle::absolute(10.0, 20.0, 30.0, 40.0);
        assert_eq!(style.position, Position::Absolute);
        assert_eq!((style.left, style.top), (Some(10.0), Some(20.0)));
        assert_eq!(style.width, Length::Px(30.0));
        assert_eq!(style.z_index(), None);

        let sticky = CellStyle::sticky(Length::Fill, 40.0);
        assert_eq!(sticky.position, Position::Sticky);
        assert_eq!((sticky.left, sticky.top), (None, None));
        assert_eq!(sticky.width, Length::Fill);
    }

    #[test]
    fn cache_computes_once_until_cleared() {
        let mut cache = StyleCache::new();
        let mut calls = 0;
        for _ in 0..3 {
            cache.get_or_insert_with(1, 2, || {
                calls += 1;
                CellStyle::absolute(0.0, 0.0, 1.0, 1.0)
            });
        }
        assert_eq!(calls, 1);
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.get(1, 2).is_none());
        cache.get_or_insert_with(1, 2, || {
            calls += 1;
            CellStyle::absolute(0.0, 0.0, 1.0, 1.0)
        });
        assert_eq!(calls, 2);
    }
}
