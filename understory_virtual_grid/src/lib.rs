// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_virtual_grid --heading-base-level=0

//! Understory Virtual Grid: a headless 2D windowing and layout engine.
//!
//! This crate renders large tabular datasets inside a fixed-size viewport by
//! materializing only the rows and columns that are currently visible, plus a
//! small overscan margin. It decides *where* and *whether* each cell is drawn;
//! it never knows *what* is drawn.
//!
//! The core concepts are:
//!
//! - [`MetadataMap`]: a lazily grown per-axis cache of item offsets and sizes.
//!   Items are measured through caller-provided size functions the first time
//!   anything at or past them is needed, and only dropped by invalidation.
//! - [`find_nearest_item`]: offset-to-index lookup over a [`MetadataMap`],
//!   binary searching inside the measured prefix and exponentially probing past it.
//! - [`ScrollController`]: scroll offsets and directions, normalizing raw host
//!   scroll events (including right-to-left conventions, see [`RtlOffsetType`]).
//! - [`offset_for_item`]: scroll-into-view offsets under the [`ScrollAlign`] modes.
//! - [`FrozenCounts`]: rows pinned to the top and columns pinned to the left and
//!   right edges, laid out separately from the scrollable body.
//! - [`ExpandableMap`]: rows that grow an extra band below their cells, rendered
//!   per column or as one full-width overlay ([`ExpandStrategy`]).
//! - [`VirtualGrid`]: the engine. It owns the caches and scroll state, computes
//!   [`GridRanges`], and turns them into an ordered list of [`CellDescriptor`]s.
//! - [`GridControl`]: the imperative surface (scroll to an offset, scroll to an
//!   item, invalidate measurements), also implemented for `&mut` handles.
//!
//! Host frameworks are responsible for:
//!
//! - Feeding viewport scroll events to [`VirtualGrid::on_scroll_event`].
//! - Calling [`VirtualGrid::layout`] (or [`VirtualGrid::render`]) when
//!   [`VirtualGrid::needs_layout`] is set, and mapping each descriptor's
//!   [`CellStyle`] onto their own positioning model.
//! - Applying programmatic scrolls through a [`ScrollHost`].
//! - Calling [`GridControl::reset_after_indices`] when sizes change for rows or
//!   columns that were already measured.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Size, Vec2};
//! use understory_virtual_grid::{
//!     CellKey, GridControl, GridOptions, ItemTarget, ScrollAlign, ScrollEvent, VirtualGrid,
//! };
//!
//! // 10 000 rows of 30px and 50 columns of 120px in an 800×600 viewport.
//! let options = GridOptions::new(10_000, 50, |_| 30.0, |_| 120.0, Size::new(800.0, 600.0));
//! let mut grid = VirtualGrid::new(options);
//!
//! let ranges = grid.visible_ranges();
//! assert_eq!(ranges.rows.start, 0);
//! assert!(ranges.rows.stop < 30);
//!
//! // The host reports a scroll.
//! grid.on_scroll_event(&ScrollEvent {
//!     client_size: Size::new(800.0, 600.0),
//!     scroll_offset: Vec2::new(0.0, 3_000.0),
//!     content_size: grid.estimated_total(),
//! });
//! assert!(grid.visible_ranges().rows.contains(100));
//!
//! // Every descriptor carries a position and a stable key.
//! let cells = grid.layout();
//! let first = cells.iter().find(|d| d.key == CellKey::Cell { row: 100, column: 0 }).unwrap();
//! assert_eq!(first.style.top, Some(3_000.0));
//!
//! // Without a scroll host, programmatic scrolls are committed directly.
//! grid.scroll_to_item(ItemTarget::row(500).with_align(ScrollAlign::Start));
//! assert_eq!(grid.scroll_state().scroll_top, 15_000.0);
//! ```
//!
//! ## Frozen regions and expanded rows
//!
//! ```rust
//! use kurbo::Size;
//! use understory_virtual_grid::{
//!     CellKey, ExpandStrategy, ExpandableMap, Expansion, FrozenCounts, GridOptions, Layer,
//!     VirtualGrid,
//! };
//!
//! let expandable: ExpandableMap =
//!     [(3, Expansion::new(80.0, ExpandStrategy::Default))].into_iter().collect();
//! let row_height = {
//!     let expandable = expandable.clone();
//!     move |row| 30.0 + expandable.expanded_height(row)
//! };
//! let options = GridOptions::new(100, 10, row_height, |_| 100.0, Size::new(600.0, 400.0))
//!     .with_frozen(FrozenCounts::new(1, 1, 1))
//!     .with_item_height(|_| 30.0)
//!     .with_expandable(expandable);
//! let mut grid = VirtualGrid::new(options);
//! let cells = grid.layout();
//!
//! // The header row's left cell sits above everything else.
//! assert_eq!(cells[0].style.layer, Some(Layer::LeftHead));
//!
//! // The expanded row keeps its cells at the base height and adds a strip below.
//! let cell = cells.iter().find(|d| d.key == CellKey::Cell { row: 3, column: 2 }).unwrap();
//! let strip = cells.iter().find(|d| d.key == CellKey::Strip { row: 3, column: 2 }).unwrap();
//! assert_eq!(cell.style.height + strip.style.height, 110.0);
//!
//! // Frozen columns never show up in the scrollable body.
//! let ranges = grid.visible_ranges();
//! assert!(ranges.columns.start >= 1 && ranges.columns.stop <= 8);
//! ```
//!
//! All extents and offsets live in one caller-chosen coordinate space (typically
//! logical pixels) and are expected to be finite and non-negative.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod expand;
mod frozen;
mod grid;
mod layout;
mod locator;
mod metadata;
mod scroll;
mod style;

pub use error::ConfigError;
pub use expand::{ExpandAt, ExpandStrategy, ExpandableMap, Expansion};
pub use frozen::{FrozenCounts, FrozenExtents};
pub use grid::{
    GridControl, GridOptions, GridRanges, ItemTarget, ResetAfter, RowDataFn, ScrollHost, SizeFn,
    VirtualGrid,
};
pub use locator::{VisibleRange, find_nearest_item, stop_index_for_start_index};
pub use metadata::{Axis, InstanceState, ItemMetadata, MetadataMap};
pub use scroll::{
    LayoutDirection, RtlOffsetType, ScrollAlign, ScrollController, ScrollDirection, ScrollEvent,
    ScrollRequest, ScrollState, offset_for_item,
};
pub use style::{CellDescriptor, CellKey, CellKind, CellStyle, Layer, Length, Position, StyleCache};
