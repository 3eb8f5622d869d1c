// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The grid engine and its imperative control surface.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;
use kurbo::{Size, Vec2};
use tracing::{debug, trace, trace_span, warn};

use crate::error::is_valid_size;
use crate::layout::Compositor;
use crate::locator::{AxisWindow, compute_visible_range};
use crate::{
    Axis, CellDescriptor, CellKind, ConfigError, ExpandableMap, FrozenCounts, FrozenExtents,
    InstanceState, LayoutDirection, RtlOffsetType, ScrollAlign, ScrollController, ScrollEvent,
    ScrollRequest, ScrollState, StyleCache, VisibleRange, offset_for_item,
};

/// A per-index size function for rows or columns.
pub type SizeFn = Box<dyn Fn(usize) -> f64>;

/// A per-row auxiliary data callback.
pub type RowDataFn<R> = Box<dyn Fn(usize) -> R>;

/// Inputs of a [`VirtualGrid`].
///
/// Built with [`GridOptions::new`] and the `with_*` setters; changed later
/// through [`VirtualGrid::update_options`].
pub struct GridOptions<R = ()> {
    /// Number of rows.
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// Full height of each row, including its expansion band when expanded.
    pub row_height: SizeFn,
    /// Width of each column.
    pub column_width: SizeFn,
    /// Unexpanded row height used by frozen column cells; `row_height` when absent.
    pub item_height: Option<SizeFn>,
    /// Size of the viewport.
    pub viewport: Size,
    /// Estimated content size; the exact sum of the size functions when absent.
    pub estimated_total: Option<Size>,
    /// Frozen rows and columns.
    pub frozen: FrozenCounts,
    /// Extra rows materialized beyond the viewport (at least one is always used).
    pub overscan_row_count: usize,
    /// Extra columns materialized beyond the viewport (at least one is always used).
    pub overscan_column_count: usize,
    /// Horizontal layout direction.
    pub direction: LayoutDirection,
    /// How the host reports horizontal offsets under right-to-left layout.
    pub rtl_offset_type: RtlOffsetType,
    /// Size of the host's scrollbars.
    pub scrollbar_size: f64,
    /// Whether cells carry a border that needs an allowance at the trailing edge.
    pub bordered: bool,
    /// Scroll offsets at construction.
    pub initial_scroll: Vec2,
    /// Expanded rows; expansion is disabled when absent.
    pub expandable: Option<ExpandableMap>,
    /// Whether to emit placeholders when the columns are narrower than the viewport.
    pub placeholders: bool,
    /// Per-row auxiliary data, computed once per rendered row per pass.
    pub on_row: Option<RowDataFn<R>>,
}

impl GridOptions {
    /// Creates options for a grid of `row_count` × `column_count` cells shown in `viewport`.
    pub fn new(
        row_count: usize,
        column_count: usize,
        row_height: impl Fn(usize) -> f64 + 'static,
        column_width: impl Fn(usize) -> f64 + 'static,
        viewport: Size,
    ) -> Self {
        Self {
            row_count,
            column_count,
            row_height: Box::new(row_height),
            column_width: Box::new(column_width),
            item_height: None,
            viewport,
            estimated_total: None,
            frozen: FrozenCounts::default(),
            overscan_row_count: 1,
            overscan_column_count: 1,
            direction: LayoutDirection::Ltr,
            rtl_offset_type: RtlOffsetType::default(),
            scrollbar_size: 0.0,
            bordered: true,
            initial_scroll: Vec2::ZERO,
            expandable: None,
            placeholders: false,
            on_row: None,
        }
    }
}

impl<R> GridOptions<R> {
    /// Sets the unexpanded row height used by frozen column cells.
    #[must_use]
    pub fn with_item_height(mut self, item_height: impl Fn(usize) -> f64 + 'static) -> Self {
        self.item_height = Some(Box::new(item_height));
        self
    }

    /// Sets an explicit estimated content size.
    #[must_use]
    pub fn with_estimated_total(mut self, estimated_total: Size) -> Self {
        self.estimated_total = Some(estimated_total);
        self
    }

    /// Sets the frozen rows and columns.
    #[must_use]
    pub fn with_frozen(mut self, frozen: FrozenCounts) -> Self {
        self.frozen = frozen;
        self
    }

    /// Sets the row and column overscan counts.
    #[must_use]
    pub fn with_overscan(mut self, rows: usize, columns: usize) -> Self {
        self.overscan_row_count = rows;
        self.overscan_column_count = columns;
        self
    }

    /// Sets the layout direction and the host's RTL offset convention.
    #[must_use]
    pub fn with_direction(
        mut self,
        direction: LayoutDirection,
        rtl_offset_type: RtlOffsetType,
    ) -> Self {
        self.direction = direction;
        self.rtl_offset_type = rtl_offset_type;
        self
    }

    /// Sets the host's scrollbar size.
    #[must_use]
    pub fn with_scrollbar_size(mut self, scrollbar_size: f64) -> Self {
        self.scrollbar_size = scrollbar_size;
        self
    }

    /// Sets whether cells are bordered.
    #[must_use]
    pub fn with_bordered(mut self, bordered: bool) -> Self {
        self.bordered = bordered;
        self
    }

    /// Sets the scroll offsets at construction.
    #[must_use]
    pub fn with_initial_scroll(mut self, initial_scroll: Vec2) -> Self {
        self.initial_scroll = initial_scroll;
        self
    }

    /// Enables row expansion with the given table.
    #[must_use]
    pub fn with_expandable(mut self, expandable: ExpandableMap) -> Self {
        self.expandable = Some(expandable);
        self
    }

    /// Enables or disables placeholders.
    #[must_use]
    pub fn with_placeholders(mut self, placeholders: bool) -> Self {
        self.placeholders = placeholders;
        self
    }

    /// Sets the per-row auxiliary data callback, changing the row data type.
    #[must_use]
    pub fn with_on_row<T>(self, on_row: impl Fn(usize) -> T + 'static) -> GridOptions<T> {
        GridOptions {
            row_count: self.row_count,
            column_count: self.column_count,
            row_height: self.row_height,
            column_width: self.column_width,
            item_height: self.item_height,
            viewport: self.viewport,
            estimated_total: self.estimated_total,
            frozen: self.frozen,
            overscan_row_count: self.overscan_row_count,
            overscan_column_count: self.overscan_column_count,
            direction: self.direction,
            rtl_offset_type: self.rtl_offset_type,
            scrollbar_size: self.scrollbar_size,
            bordered: self.bordered,
            initial_scroll: self.initial_scroll,
            expandable: self.expandable,
            placeholders: self.placeholders,
            on_row: Some(Box::new(on_row)),
        }
    }

    /// The estimated content size: the explicit estimate, or the sum of all item sizes.
    ///
    /// Without an explicit estimate every row and column size function is called
    /// once, at construction and on each [`VirtualGrid::update_options`]. For very
    /// large axes, set one with [`GridOptions::with_estimated_total`] so sizes stay
    /// lazily measured.
    #[must_use]
    pub fn estimated_total(&self) -> Size {
        self.estimated_total.unwrap_or_else(|| {
            Size::new(
                (0..self.column_count)
                    .map(|i| (self.column_width)(i).max(0.0))
                    .sum(),
                (0..self.row_count)
                    .map(|i| (self.row_height)(i).max(0.0))
                    .sum(),
            )
        })
    }

    /// Checks the options against their documented contract.
    ///
    /// Violations are tolerated by the grid; this only reports them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frozen.top > self.row_count {
            return Err(ConfigError::FrozenRowsExceedCount {
                top: self.frozen.top,
                row_count: self.row_count,
            });
        }
        if self.frozen.left.saturating_add(self.frozen.right) > self.column_count {
            return Err(ConfigError::FrozenColumnsExceedCount {
                left: self.frozen.left,
                right: self.frozen.right,
                column_count: self.column_count,
            });
        }
        if !is_valid_size(self.viewport) {
            return Err(ConfigError::InvalidViewport(self.viewport));
        }
        if let Some(estimate) = self.estimated_total {
            if !is_valid_size(estimate) {
                return Err(ConfigError::InvalidEstimate(estimate));
            }
        }
        if !(self.scrollbar_size.is_finite() && self.scrollbar_size >= 0.0) {
            return Err(ConfigError::InvalidScrollbarSize(self.scrollbar_size));
        }
        Ok(())
    }
}

impl<R> fmt::Debug for GridOptions<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridOptions")
            .field("row_count", &self.row_count)
            .field("column_count", &self.column_count)
            .field("viewport", &self.viewport)
            .field("estimated_total", &self.estimated_total)
            .field("frozen", &self.frozen)
            .field("overscan_row_count", &self.overscan_row_count)
            .field("overscan_column_count", &self.overscan_column_count)
            .field("direction", &self.direction)
            .field("rtl_offset_type", &self.rtl_offset_type)
            .field("scrollbar_size", &self.scrollbar_size)
            .field("bordered", &self.bordered)
            .field("initial_scroll", &self.initial_scroll)
            .field("expandable", &self.expandable)
            .field("placeholders", &self.placeholders)
            .finish_non_exhaustive()
    }
}

/// Visible ranges of both axes, excluding frozen rows and columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridRanges {
    /// Scrollable rows to render.
    pub rows: VisibleRange,
    /// Scrollable columns to render.
    pub columns: VisibleRange,
}

/// Target of [`GridControl::scroll_to_item`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemTarget {
    /// Row to bring into view.
    pub row: Option<usize>,
    /// Column to bring into view.
    pub column: Option<usize>,
    /// Alignment on both axes.
    pub align: ScrollAlign,
}

impl ItemTarget {
    /// Targets a row.
    #[must_use]
    pub const fn row(row: usize) -> Self {
        Self {
            row: Some(row),
            column: None,
            align: ScrollAlign::Auto,
        }
    }

    /// Targets a column.
    #[must_use]
    pub const fn column(column: usize) -> Self {
        Self {
            row: None,
            column: Some(column),
            align: ScrollAlign::Auto,
        }
    }

    /// Targets a cell.
    #[must_use]
    pub const fn cell(row: usize, column: usize) -> Self {
        Self {
            row: Some(row),
            column: Some(column),
            align: ScrollAlign::Auto,
        }
    }

    /// Sets the alignment.
    #[must_use]
    pub const fn with_align(mut self, align: ScrollAlign) -> Self {
        self.align = align;
        self
    }
}

/// Arguments of [`GridControl::reset_after_indices`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetAfter {
    /// First row whose measurement is discarded.
    pub row: Option<usize>,
    /// First column whose measurement is discarded.
    pub column: Option<usize>,
    /// Recompute the visible ranges now and request a layout pass.
    pub force_relayout: bool,
}

impl ResetAfter {
    /// Discards row measurements from `row` on.
    #[must_use]
    pub const fn row(row: usize) -> Self {
        Self {
            row: Some(row),
            column: None,
            force_relayout: true,
        }
    }

    /// Discards column measurements from `column` on.
    #[must_use]
    pub const fn column(column: usize) -> Self {
        Self {
            row: None,
            column: Some(column),
            force_relayout: true,
        }
    }

    /// Sets whether to relayout immediately.
    #[must_use]
    pub const fn with_force_relayout(mut self, force_relayout: bool) -> Self {
        self.force_relayout = force_relayout;
        self
    }
}

impl Default for ResetAfter {
    fn default() -> Self {
        Self {
            row: None,
            column: None,
            force_relayout: true,
        }
    }
}

/// Imperative control of a grid.
///
/// Implemented by [`VirtualGrid`] and forwarded through `&mut` handles so
/// wrappers can expose control without owning the grid.
pub trait GridControl {
    /// Scrolls to absolute offsets.
    ///
    /// Targets are clamped to be non-negative. A target only applies on an axis
    /// whose estimated content is larger than the viewport.
    fn scroll_to(&mut self, target: ScrollRequest);

    /// Scrolls so that a row and/or column is in view, per its alignment.
    ///
    /// Indices are clamped to the axis.
    fn scroll_to_item(&mut self, target: ItemTarget);

    /// Discards measurements at and after the given indices and drops all cached styles.
    fn reset_after_indices(&mut self, reset: ResetAfter);

    /// Discards row measurements from `row` on.
    fn reset_after_row_index(&mut self, row: usize, force_relayout: bool) {
        self.reset_after_indices(ResetAfter::row(row).with_force_relayout(force_relayout));
    }

    /// Discards column measurements from `column` on.
    fn reset_after_column_index(&mut self, column: usize, force_relayout: bool) {
        self.reset_after_indices(ResetAfter::column(column).with_force_relayout(force_relayout));
    }
}

impl<C: GridControl + ?Sized> GridControl for &mut C {
    fn scroll_to(&mut self, target: ScrollRequest) {
        (**self).scroll_to(target);
    }

    fn scroll_to_item(&mut self, target: ItemTarget) {
        (**self).scroll_to_item(target);
    }

    fn reset_after_indices(&mut self, reset: ResetAfter) {
        (**self).reset_after_indices(reset);
    }
}

/// The host viewport's side of programmatic scrolling.
///
/// The grid asks the host to move; the host applies the offsets (converted to
/// its own RTL convention) and reports the result back through
/// [`VirtualGrid::on_scroll_event`].
pub trait ScrollHost {
    /// Moves the viewport to the requested normalized offsets.
    fn request_scroll(&mut self, request: ScrollRequest);
}

impl<F: FnMut(ScrollRequest)> ScrollHost for F {
    fn request_scroll(&mut self, request: ScrollRequest) {
        self(request);
    }
}

/// A virtualized two-dimensional grid.
///
/// The grid owns the measurement caches and scroll state. Hosts feed it scroll
/// events and viewport changes, and call [`VirtualGrid::layout`] or
/// [`VirtualGrid::render`] when [`VirtualGrid::needs_layout`] reports a change.
pub struct VirtualGrid<R = ()> {
    options: GridOptions<R>,
    state: InstanceState,
    styles: StyleCache,
    scroll: ScrollController,
    extents: FrozenExtents,
    estimated: Size,

    dirty: bool,
    needs_layout: bool,
    ranges: GridRanges,
    row_data: HashMap<usize, R>,

    host: Option<Box<dyn ScrollHost>>,
    on_scroll: Option<Box<dyn FnMut(&ScrollState)>>,
}

impl<R> fmt::Debug for VirtualGrid<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualGrid")
            .field("options", &self.options)
            .field("state", &self.state)
            .field("scroll", &self.scroll)
            .field("extents", &self.extents)
            .field("estimated", &self.estimated)
            .field("dirty", &self.dirty)
            .field("needs_layout", &self.needs_layout)
            .field("ranges", &self.ranges)
            .field("cached_styles", &self.styles.len())
            .field("has_host", &self.host.is_some())
            .finish_non_exhaustive()
    }
}

impl<R> VirtualGrid<R> {
    /// Creates a grid from `options`.
    ///
    /// Options that violate their contract are logged and used as given.
    pub fn new(options: GridOptions<R>) -> Self {
        if let Err(error) = options.validate() {
            warn!(%error, "grid options violate their contract");
        }
        let scroll = ScrollController::new(
            options.initial_scroll,
            options.direction,
            options.rtl_offset_type,
        );
        let extents = measure_extents(&options);
        let estimated = options.estimated_total();
        debug!(
            rows = options.row_count,
            columns = options.column_count,
            width = estimated.width,
            height = estimated.height,
            "created virtual grid"
        );
        Self {
            options,
            state: InstanceState::new(),
            styles: StyleCache::new(),
            scroll,
            extents,
            estimated,
            dirty: true,
            needs_layout: true,
            ranges: GridRanges::default(),
            row_data: HashMap::new(),
            host: None,
            on_scroll: None,
        }
    }

    /// Returns the options.
    #[must_use]
    pub fn options(&self) -> &GridOptions<R> {
        &self.options
    }

    /// Mutates the options in place and marks the grid dirty.
    ///
    /// Measurements are kept; call [`GridControl::reset_after_indices`] when
    /// size functions change their answers for already measured indices.
    pub fn update_options(&mut self, update: impl FnOnce(&mut GridOptions<R>)) {
        update(&mut self.options);
        if let Err(error) = self.options.validate() {
            warn!(%error, "grid options violate their contract");
        }
        self.scroll
            .set_direction(self.options.direction, self.options.rtl_offset_type);
        self.extents = measure_extents(&self.options);
        self.estimated = self.options.estimated_total();
        self.styles.clear();
        self.invalidate();
    }

    /// Sets the viewport size.
    pub fn set_viewport(&mut self, viewport: Size) {
        if viewport != self.options.viewport {
            self.options.viewport = viewport;
            self.invalidate();
        }
    }

    /// Sets or clears the explicit estimated content size.
    pub fn set_estimated_total(&mut self, estimated_total: Option<Size>) {
        self.options.estimated_total = estimated_total;
        let estimated = self.options.estimated_total();
        if estimated != self.estimated {
            self.estimated = estimated;
            self.invalidate();
        }
    }

    /// Sets the in-progress scroll hint, which narrows overscan behind the scroll direction.
    pub fn set_is_scrolling(&mut self, is_scrolling: bool) {
        if self.scroll.set_is_scrolling(is_scrolling) {
            self.invalidate();
        }
    }

    /// Installs the host that applies programmatic scrolls.
    ///
    /// Without a host, programmatic scrolls are committed directly.
    pub fn set_scroll_host(&mut self, host: impl ScrollHost + 'static) {
        self.host = Some(Box::new(host));
    }

    /// Installs the callback notified after every committed scroll change.
    pub fn set_on_scroll(&mut self, on_scroll: impl FnMut(&ScrollState) + 'static) {
        self.on_scroll = Some(Box::new(on_scroll));
    }

    /// Returns the committed scroll state.
    #[must_use]
    pub fn scroll_state(&self) -> ScrollState {
        self.scroll.state()
    }

    /// Returns the estimated content size in use.
    #[must_use]
    pub fn estimated_total(&self) -> Size {
        self.estimated
    }

    /// Returns the measured frozen regions.
    #[must_use]
    pub fn frozen_extents(&self) -> &FrozenExtents {
        &self.extents
    }

    /// Returns the measurement caches.
    #[must_use]
    pub fn instance_state(&self) -> &InstanceState {
        &self.state
    }

    /// Returns whether something changed since the last layout pass.
    #[must_use]
    pub fn needs_layout(&self) -> bool {
        self.needs_layout
    }

    /// Returns the auxiliary data computed for `row` during the last pass.
    #[must_use]
    pub fn row_data(&self, row: usize) -> Option<&R> {
        self.row_data.get(&row)
    }

    /// Applies a scroll event reported by the host viewport.
    ///
    /// Returns the new state if anything changed; the `on_scroll` callback is
    /// notified in that case too.
    pub fn on_scroll_event(&mut self, event: &ScrollEvent) -> Option<ScrollState> {
        let state = self.scroll.on_scroll_event(event)?;
        self.scroll_committed(&state);
        Some(state)
    }

    /// Computes or returns the cached visible ranges.
    pub fn visible_ranges(&mut self) -> GridRanges {
        if self.dirty {
            self.ranges = self.compute_ranges();
            self.dirty = false;
        }
        self.ranges
    }

    /// Runs a layout pass and returns the positioned descriptors.
    pub fn layout(&mut self) -> Vec<CellDescriptor> {
        let ranges = self.visible_ranges();
        let span = trace_span!("layout", rows = ?ranges.rows, columns = ?ranges.columns);
        let _guard = span.enter();

        self.cache_row_data(ranges.rows);

        let options = &self.options;
        let item_height = options
            .item_height
            .as_deref()
            .unwrap_or(&*options.row_height);
        let descriptors = Compositor {
            state: &mut self.state,
            styles: &mut self.styles,
            row_height: &*options.row_height,
            column_width: &*options.column_width,
            item_height,
            row_count: options.row_count,
            column_count: options.column_count,
            rows: ranges.rows,
            columns: ranges.columns,
            extents: &self.extents,
            viewport: options.viewport,
            estimated: self.estimated,
            expandable: options.expandable.as_ref(),
            placeholders: options.placeholders,
            direction: options.direction,
            scrollbar_size: options.scrollbar_size,
            bordered: options.bordered,
        }
        .compose();

        self.needs_layout = false;
        trace!(descriptors = descriptors.len(), "layout pass");
        descriptors
    }

    /// Runs a layout pass and maps every descriptor through `render`.
    ///
    /// Data cells receive the row's auxiliary data when an `on_row` callback is set.
    pub fn render<T>(
        &mut self,
        mut render: impl FnMut(&CellDescriptor, Option<&R>) -> T,
    ) -> Vec<T> {
        let descriptors = self.layout();
        descriptors
            .iter()
            .map(|descriptor| {
                let data = match descriptor.kind {
                    CellKind::Cell => self.row_data.get(&descriptor.row_index),
                    _ => None,
                };
                render(descriptor, data)
            })
            .collect()
    }

    fn invalidate(&mut self) {
        self.dirty = true;
        self.needs_layout = true;
    }

    fn scroll_committed(&mut self, state: &ScrollState) {
        trace!(
            left = state.scroll_left,
            top = state.scroll_top,
            horizontal = ?state.horizontal_direction,
            vertical = ?state.vertical_direction,
            "scroll committed"
        );
        self.invalidate();
        if let Some(on_scroll) = self.on_scroll.as_mut() {
            on_scroll(state);
        }
    }

    fn compute_ranges(&mut self) -> GridRanges {
        let options = &self.options;
        if options.row_count == 0 || options.column_count == 0 {
            return GridRanges::default();
        }
        let scroll = self.scroll.state();
        let is_scrolling = self.scroll.is_scrolling();

        let columns = compute_visible_range(
            &mut self.state.columns,
            &*options.column_width,
            &AxisWindow {
                item_count: options.column_count,
                scroll_offset: scroll.scroll_left,
                viewport_extent: options.viewport.width,
                leading_yield: self.extents.left(),
                trailing_yield: self.extents.right(),
                leading_frozen: self.extents.left_widths.len(),
                first_trailing_frozen: self.extents.first_right,
                overscan: options.overscan_column_count,
                direction: scroll.horizontal_direction,
                is_scrolling,
            },
        );
        let rows = compute_visible_range(
            &mut self.state.rows,
            &*options.row_height,
            &AxisWindow {
                item_count: options.row_count,
                scroll_offset: scroll.scroll_top,
                viewport_extent: options.viewport.height,
                leading_yield: self.extents.top(),
                trailing_yield: 0.0,
                leading_frozen: self.extents.top_heights.len(),
                first_trailing_frozen: options.row_count,
                overscan: options.overscan_row_count,
                direction: scroll.vertical_direction,
                is_scrolling,
            },
        );
        trace!(?rows, ?columns, "visible ranges");
        GridRanges { rows, columns }
    }

    fn cache_row_data(&mut self, rows: VisibleRange) {
        self.row_data.clear();
        let Some(on_row) = self.options.on_row.as_ref() else {
            return;
        };
        if self.options.row_count == 0 {
            return;
        }
        let frozen = 0..self.extents.top_heights.len();
        let visible = if rows.is_empty() { 0..0 } else { rows.start..rows.stop + 1 };
        for row in frozen.chain(visible) {
            self.row_data.entry(row).or_insert_with(|| on_row(row));
        }
    }

    fn request_scroll(&mut self, request: ScrollRequest) {
        if let Some(host) = self.host.as_mut() {
            host.request_scroll(request);
            return;
        }
        let max = Vec2::new(
            self.estimated.width - self.options.viewport.width,
            self.estimated.height - self.options.viewport.height,
        );
        if let Some(state) = self.scroll.commit(&request, max) {
            self.scroll_committed(&state);
        }
    }
}

impl<R> GridControl for VirtualGrid<R> {
    fn scroll_to(&mut self, target: ScrollRequest) {
        let viewport = self.options.viewport;
        let estimated = self.estimated;
        let request = ScrollRequest {
            left: target
                .left
                .map(|left| left.max(0.0))
                .filter(|_| estimated.width > viewport.width),
            top: target
                .top
                .map(|top| top.max(0.0))
                .filter(|_| estimated.height > viewport.height),
        };
        if request.is_empty() {
            return;
        }
        debug!(?request, "scroll requested");
        self.request_scroll(request);
    }

    fn scroll_to_item(&mut self, target: ItemTarget) {
        let options = &self.options;
        let scroll = self.scroll.state();
        let viewport = options.viewport;
        let estimated = self.estimated;
        let scrollbar = options.scrollbar_size.max(0.0);
        let horizontal_bar = if estimated.width > viewport.width { scrollbar } else { 0.0 };
        let vertical_bar = if estimated.height > viewport.height { scrollbar } else { 0.0 };

        let left = target
            .column
            .filter(|_| options.column_count > 0)
            .map(|column| {
                let column = column.min(options.column_count - 1);
                let item = self
                    .state
                    .columns
                    .measure_up_to(column, &*options.column_width);
                offset_for_item(
                    item,
                    viewport.width,
                    estimated.width,
                    target.align,
                    scroll.scroll_left,
                    vertical_bar,
                )
            });
        let top = target
            .row
            .filter(|_| options.row_count > 0)
            .map(|row| {
                let row = row.min(options.row_count - 1);
                let item = self.state.rows.measure_up_to(row, &*options.row_height);
                offset_for_item(
                    item,
                    viewport.height,
                    estimated.height,
                    target.align,
                    scroll.scroll_top,
                    horizontal_bar,
                )
            });

        self.scroll_to(ScrollRequest { left, top });
    }

    fn reset_after_indices(&mut self, reset: ResetAfter) {
        let mut dropped = false;
        for (axis, index) in [(Axis::Row, reset.row), (Axis::Column, reset.column)] {
            if let Some(index) = index {
                dropped |= self.state.axis_mut(axis).reset_after(index);
            }
        }
        self.styles.clear();
        self.extents = measure_extents(&self.options);
        debug!(
            row = ?reset.row,
            column = ?reset.column,
            dropped,
            force_relayout = reset.force_relayout,
            "reset measurements"
        );

        if reset.force_relayout {
            self.ranges = self.compute_ranges();
            self.dirty = false;
            self.needs_layout = true;
        }
    }
}

fn measure_extents<R>(options: &GridOptions<R>) -> FrozenExtents {
    FrozenExtents::measure(
        options.frozen,
        options.row_count,
        options.column_count,
        &*options.row_height,
        &*options.column_width,
    )
}
