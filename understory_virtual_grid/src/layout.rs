// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layout compositor: visible ranges in, positioned descriptors out.
//!
//! A pass emits, in order:
//!
//! 1. each frozen top row: its left-frozen cells, its right-frozen cells, its
//!    scrollable cells, then a header placeholder;
//! 2. the body: cells of each visible row, its per-column expansion strips, and
//!    its cover overlay when no columns are frozen at the sides;
//! 3. body placeholders;
//! 4. left-frozen columns, column-major, with their expansion bands;
//! 5. right-frozen columns likewise.
//!
//! Sticky descriptors rely on flow layout in the host: their `margin_*` fields
//! are computed so that consecutive sticky descriptors land on the right rows.

use alloc::vec::Vec;

use kurbo::Size;

use crate::{
    CellDescriptor, CellKey, CellStyle, ExpandAt, ExpandStrategy, ExpandableMap, FrozenExtents,
    InstanceState, Layer, LayoutDirection, Length, StyleCache, VisibleRange,
};

/// Border allowance added to the adjustment width of bordered grids.
const BORDER_ALLOWANCE: f64 = 2.0;

/// Everything one layout pass reads, borrowed from the grid.
pub(crate) struct Compositor<'a> {
    pub(crate) state: &'a mut InstanceState,
    pub(crate) styles: &'a mut StyleCache,
    pub(crate) row_height: &'a dyn Fn(usize) -> f64,
    pub(crate) column_width: &'a dyn Fn(usize) -> f64,
    /// Unexpanded height used by frozen column cells.
    pub(crate) item_height: &'a dyn Fn(usize) -> f64,
    pub(crate) row_count: usize,
    pub(crate) column_count: usize,
    pub(crate) rows: VisibleRange,
    pub(crate) columns: VisibleRange,
    pub(crate) extents: &'a FrozenExtents,
    pub(crate) viewport: Size,
    pub(crate) estimated: Size,
    pub(crate) expandable: Option<&'a ExpandableMap>,
    pub(crate) placeholders: bool,
    pub(crate) direction: LayoutDirection,
    pub(crate) scrollbar_size: f64,
    pub(crate) bordered: bool,
}

impl core::fmt::Debug for Compositor<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Compositor")
            .field("rows", &self.rows)
            .field("columns", &self.columns)
            .field("viewport", &self.viewport)
            .field("estimated", &self.estimated)
            .finish_non_exhaustive()
    }
}

impl Compositor<'_> {
    /// Width reserved at the trailing edge for the scrollbar and borders.
    pub(crate) fn adjustment_width(&self) -> f64 {
        let scrollbar = if self.viewport.height < self.estimated.height {
            self.scrollbar_size.max(0.0)
        } else {
            0.0
        };
        scrollbar + self.border_allowance()
    }

    fn border_allowance(&self) -> f64 {
        if self.bordered { BORDER_ALLOWANCE } else { 0.0 }
    }

    fn right_adjustment(&self) -> f64 {
        self.adjustment_width() - self.border_allowance() / 2.0
    }

    fn wants_placeholders(&self) -> bool {
        self.placeholders
            && self.viewport.width - self.estimated.width - self.adjustment_width() > 0.0
    }

    fn expansion(&self, row: usize) -> Option<(f64, ExpandStrategy)> {
        self.expandable
            .and_then(|map| map.active(row))
            .map(|e| (e.height, e.strategy))
    }

    /// Unexpanded base style of a body cell, cached per `(row, column)`.
    fn base_style(&mut self, row: usize, column: usize) -> CellStyle {
        let state = &mut *self.state;
        let row_height = self.row_height;
        let column_width = self.column_width;
        let rtl = self.direction == LayoutDirection::Rtl;
        self.styles.get_or_insert_with(row, column, || {
            let column_meta = state.columns.measure_up_to(column, column_width);
            let row_meta = state.rows.measure_up_to(row, row_height);
            let mut style = CellStyle::absolute(
                column_meta.offset,
                row_meta.offset,
                column_meta.size,
                row_meta.size,
            );
            if rtl {
                style.right = style.left.take();
            }
            style
        })
    }

    /// Body cell style with the expansion band carved out of its height.
    fn body_style(&mut self, row: usize, column: usize) -> CellStyle {
        let mut style = self.base_style(row, column);
        if self.expandable.is_some() {
            style.height -= self.expansion(row).map_or(0.0, |(height, _)| height);
        }
        style
    }

    /// Runs the pass.
    pub(crate) fn compose(mut self) -> Vec<CellDescriptor> {
        let mut out = Vec::with_capacity(
            self.rows.len() * (self.columns.len() + 1)
                + self.extents.top_heights.len() * (self.columns.len() + 1),
        );

        // Empty axes still report `[0, 0]` ranges; nothing in them may be measured.
        if self.row_count == 0 || self.column_count == 0 {
            return out;
        }

        self.frozen_top_rows(&mut out);
        if self.rows.is_empty() {
            return out;
        }

        self.body(&mut out);
        let first_row_top = self
            .state
            .rows
            .measure_up_to(self.rows.start, self.row_height)
            .offset;
        if self.wants_placeholders() {
            self.body_placeholders(first_row_top, &mut out);
        }

        let rendered_rows_height: f64 = self
            .rows
            .indices()
            .map(|row| self.state.rows.measure_up_to(row, self.row_height).size)
            .sum();
        self.left_columns(first_row_top, rendered_rows_height, &mut out);
        self.right_columns(first_row_top, rendered_rows_height, &mut out);
        out
    }

    fn frozen_top_rows(&mut self, out: &mut Vec<CellDescriptor>) {
        let extents = self.extents;
        let yield_left = extents.left();
        let yield_right = extents.right();
        let right_adjustment = self.right_adjustment();
        let placeholders = self.wants_placeholders();

        for (row, &height) in extents.top_heights.iter().enumerate() {
            let top = extents.top_offset(row);
            let sticky = |width: f64, layer: Layer| CellStyle {
                top: Some(top),
                layer: Some(layer),
                inline: true,
                ..CellStyle::sticky(Length::Px(width), height)
            };

            let mut left = 0.0;
            for (column, &width) in extents.left_widths.iter().enumerate() {
                let style = CellStyle {
                    left: Some(left),
                    ..sticky(width, Layer::LeftHead)
                };
                out.push(CellDescriptor::cell(row, column, style));
                left += width;
            }

            let mut remaining = yield_right;
            for (k, &width) in extents.right_widths.iter().enumerate() {
                let style = CellStyle {
                    left: Some(self.viewport.width - remaining - right_adjustment),
                    ..sticky(width, Layer::RightHead)
                };
                out.push(CellDescriptor::cell(row, extents.first_right + k, style));
                remaining -= width;
            }

            if !self.columns.is_empty() {
                for column in self.columns.indices() {
                    let meta = self.state.columns.measure_up_to(column, self.column_width);
                    let style = CellStyle {
                        margin_left: (column == self.columns.start)
                            .then(|| meta.offset - yield_left - yield_right),
                        ..sticky(meta.size, Layer::TopRow)
                    };
                    out.push(CellDescriptor::cell(row, column, style));
                }
            }

            if placeholders {
                let style = CellStyle {
                    top: Some(top),
                    layer: Some(Layer::TopRow),
                    inline: true,
                    ..CellStyle::sticky(Length::FillMinus(self.estimated.width), height)
                };
                out.push(CellDescriptor::placeholder(
                    row,
                    CellKey::HeadPlaceholder(row),
                    style,
                ));
            }
        }
    }

    fn body(&mut self, out: &mut Vec<CellDescriptor>) {
        let covers_in_body = !self.extents.has_side_columns();
        let header_height = self.extents.top();
        // Flow height consumed by cover overlays emitted so far.
        let mut covered = 0.0;

        for row in self.rows.indices() {
            if !self.columns.is_empty() {
                for column in self.columns.indices() {
                    let style = self.body_style(row, column);
                    out.push(CellDescriptor::cell(row, column, style));
                }
            }

            let Some((height, strategy)) = self.expansion(row) else {
                continue;
            };
            match strategy {
                ExpandStrategy::Default if !self.columns.is_empty() => {
                    for column in self.columns.indices() {
                        let cell = self.body_style(row, column);
                        let style = CellStyle {
                            top: cell.top.map(|top| top + cell.height),
                            height,
                            ..cell
                        };
                        out.push(CellDescriptor::band(row, ExpandAt::Cell { column }, style));
                    }
                }
                ExpandStrategy::Cover if covers_in_body => {
                    let cell = self.body_style(row, self.columns.start);
                    let margin_top =
                        cell.top.unwrap_or_default() + cell.height - header_height - covered;
                    let style = CellStyle {
                        left: Some(0.0),
                        margin_top: Some(margin_top),
                        ..CellStyle::sticky(Length::Px(self.viewport.width), height)
                    };
                    out.push(CellDescriptor::band(row, ExpandAt::Cover, style));
                    covered += margin_top + height;
                }
                _ => {}
            }
        }
    }

    fn body_placeholders(&mut self, first_row_top: f64, out: &mut Vec<CellDescriptor>) {
        let mut top = first_row_top;
        for row in self.rows.indices() {
            let height = self.state.rows.measure_up_to(row, self.row_height).size;
            let style = CellStyle {
                width: Length::Fill,
                layer: Some(Layer::Placeholder),
                ..CellStyle::absolute(0.0, top, 0.0, height)
            };
            out.push(CellDescriptor::placeholder(row, CellKey::Placeholder(row), style));
            top += height;
        }
    }

    fn left_columns(&mut self, first_row_top: f64, rendered: f64, out: &mut Vec<CellDescriptor>) {
        let extents = self.extents;
        let mut left = 0.0;
        for (column, &width) in extents.left_widths.iter().enumerate() {
            let first = column == 0;
            for row in self.rows.indices() {
                let expansion = self.expansion(row);
                let margin_top = (row == self.rows.start).then(|| {
                    if first {
                        first_row_top - extents.top()
                    } else {
                        -rendered
                    }
                });
                let style = CellStyle {
                    left: Some(left),
                    layer: Some(Layer::LeftCell),
                    margin_top,
                    margin_bottom: expansion.filter(|_| !first).map(|(height, _)| height),
                    ..CellStyle::sticky(Length::Px(width), (self.item_height)(row))
                };
                out.push(CellDescriptor::cell(row, column, style));

                if let Some((height, strategy)) = expansion.filter(|_| first) {
                    let (at, band_width) = match strategy {
                        ExpandStrategy::Cover => (ExpandAt::Cover, self.viewport.width),
                        ExpandStrategy::Default => (ExpandAt::Left, extents.left()),
                    };
                    let style = CellStyle {
                        left: Some(0.0),
                        ..CellStyle::sticky(Length::Px(band_width), height)
                    };
                    out.push(CellDescriptor::band(row, at, style));
                }
            }
            left += width;
        }
    }

    fn right_columns(&mut self, first_row_top: f64, rendered: f64, out: &mut Vec<CellDescriptor>) {
        let extents = self.extents;
        let has_left = !extents.left_widths.is_empty();
        let right_adjustment = self.right_adjustment();
        let mut remaining = extents.right();
        for (k, &width) in extents.right_widths.iter().enumerate() {
            let column = extents.first_right + k;
            let first = k == 0;
            let left = self.viewport.width - remaining - right_adjustment;
            for row in self.rows.indices() {
                let expansion = self.expansion(row);
                let margin_top = (row == self.rows.start).then(|| {
                    if first && !has_left {
                        first_row_top - extents.top()
                    } else {
                        -rendered
                    }
                });
                let style = CellStyle {
                    left: Some(left),
                    layer: Some(Layer::RightCell),
                    margin_top,
                    margin_bottom: expansion.filter(|_| !first).map(|(height, _)| height),
                    ..CellStyle::sticky(Length::Px(width), (self.item_height)(row))
                };
                out.push(CellDescriptor::cell(row, column, style));

                let Some((height, strategy)) = expansion.filter(|_| first) else {
                    continue;
                };
                match strategy {
                    ExpandStrategy::Default => {
                        let style = CellStyle {
                            left: Some(left),
                            ..CellStyle::sticky(Length::Px(extents.right()), height)
                        };
                        out.push(CellDescriptor::band(row, ExpandAt::Right, style));
                    }
                    ExpandStrategy::Cover if !has_left => {
                        let style = CellStyle {
                            left: Some(0.0),
                            ..CellStyle::sticky(Length::Px(self.viewport.width), height)
                        };
                        out.push(CellDescriptor::band(row, ExpandAt::Cover, style));
                    }
                    // The left columns already emitted the overlay; keep the
                    // right columns in step with an invisible spacer.
                    ExpandStrategy::Cover => {
                        let style = CellStyle {
                            left: Some(left),
                            hidden: true,
                            ..CellStyle::sticky(Length::Px(extents.right()), height)
                        };
                        out.push(CellDescriptor::shadow(row, style));
                    }
                }
            }
            remaining -= width;
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use kurbo::Size;

    use super::Compositor;
    use crate::{
        CellDescriptor, CellKey, CellKind, ExpandAt, ExpandStrategy, ExpandableMap, Expansion,
        FrozenCounts, FrozenExtents, InstanceState, Layer, LayoutDirection, Length, Position,
        StyleCache, VisibleRange,
    };

    struct Fixture {
        state: InstanceState,
        styles: StyleCache,
        extents: FrozenExtents,
        expandable: Option<ExpandableMap>,
        column_count: usize,
        viewport: Size,
        estimated: Size,
        placeholders: bool,
        direction: LayoutDirection,
    }

    const ROW: f64 = 40.0;
    const COLUMN: f64 = 100.0;

    fn row_height(expandable: Option<&ExpandableMap>) -> impl Fn(usize) -> f64 + '_ {
        move |row| ROW + expandable.map_or(0.0, |map| map.expanded_height(row))
    }

    fn column_width(_: usize) -> f64 {
        COLUMN
    }

    impl Fixture {
        fn new(frozen: FrozenCounts, expandable: Option<ExpandableMap>) -> Self {
            let row_count = 50;
            let column_count = 10;
            let (extents, height) = {
                let rows = row_height(expandable.as_ref());
                let extents =
                    FrozenExtents::measure(frozen, row_count, column_count, &rows, &column_width);
                let height: f64 = (0..row_count).map(&rows).sum();
                (extents, height)
            };
            Self {
                state: InstanceState::new(),
                styles: StyleCache::new(),
                extents,
                expandable,
                column_count,
                viewport: Size::new(500.0, 300.0),
                estimated: Size::new(COLUMN * column_count as f64, height),
                placeholders: false,
                direction: LayoutDirection::Ltr,
            }
        }

        fn compose(&mut self, rows: VisibleRange, columns: VisibleRange) -> Vec<CellDescriptor> {
            let row_height = row_height(self.expandable.as_ref());
            let item_height = |_: usize| ROW;
            Compositor {
                state: &mut self.state,
                styles: &mut self.styles,
                row_height: &row_height,
                column_width: &column_width,
                item_height: &item_height,
                row_count: 50,
                column_count: self.column_count,
                rows,
                columns,
                extents: &self.extents,
                viewport: self.viewport,
                estimated: self.estimated,
                expandable: self.expandable.as_ref(),
                placeholders: self.placeholders,
                direction: self.direction,
                scrollbar_size: 0.0,
                bordered: true,
            }
            .compose()
        }
    }

    fn find(out: &[CellDescriptor], key: CellKey) -> &CellDescriptor {
        out.iter()
            .find(|d| d.key == key)
            .unwrap_or_else(|| panic!("no descriptor {key}"))
    }

    #[test]
    fn plain_body_is_row_major_and_absolute() {
        let mut fx = Fixture::new(FrozenCounts::default(), None);
        let out = fx.compose(VisibleRange::new(2, 4), VisibleRange::new(1, 3));
        assert_eq!(out.len(), 9);
        assert_eq!(out[0].key, CellKey::Cell { row: 2, column: 1 });
        assert_eq!(out[3].key, CellKey::Cell { row: 3, column: 1 });

        let style = find(&out, CellKey::Cell { row: 3, column: 2 }).style;
        assert_eq!(style.position, Position::Absolute);
        assert_eq!(style.left, Some(200.0));
        assert_eq!(style.top, Some(120.0));
        assert_eq!(style.width, Length::Px(COLUMN));
        assert_eq!(style.height, ROW);
        assert_eq!(style.z_index(), None);
        assert_eq!(fx.styles.len(), 9);
    }

    #[test]
    fn empty_axis_emits_nothing() {
        let mut fx = Fixture::new(FrozenCounts::new(1, 1, 0), None);
        fx.column_count = 0;
        let out = fx.compose(VisibleRange::new(0, 0), VisibleRange::new(0, 0));
        assert!(out.is_empty());
        assert_eq!(fx.state.columns.last_measured_index(), None);
    }

    #[test]
    fn rtl_anchors_cells_on_the_right() {
        let mut fx = Fixture::new(FrozenCounts::default(), None);
        fx.direction = LayoutDirection::Rtl;
        let out = fx.compose(VisibleRange::new(0, 0), VisibleRange::new(2, 2));
        assert_eq!(out[0].style.left, None);
        assert_eq!(out[0].style.right, Some(200.0));
    }

    #[test]
    fn default_expansion_keeps_row_footprint() {
        let expandable: ExpandableMap = [(3, Expansion::new(60.0, ExpandStrategy::Default))]
            .into_iter()
            .collect();
        let mut fx = Fixture::new(FrozenCounts::default(), Some(expandable));
        let out = fx.compose(VisibleRange::new(2, 4), VisibleRange::new(0, 2));

        let cell = find(&out, CellKey::Cell { row: 3, column: 1 }).style;
        let strip = find(&out, CellKey::Strip { row: 3, column: 1 });
        assert_eq!(strip.kind, CellKind::Expand(ExpandAt::Cell { column: 1 }));
        assert_eq!(cell.height, ROW);
        assert_eq!(strip.style.top, Some(cell.top.unwrap() + cell.height));
        assert_eq!(strip.style.left, cell.left);
        assert_eq!(cell.height + strip.style.height, ROW + 60.0);

        // The next row starts right below the strip.
        let next = find(&out, CellKey::Cell { row: 4, column: 1 }).style;
        assert_eq!(next.top, Some(strip.style.top.unwrap() + strip.style.height));

        // Strips follow the row's cells directly.
        let strips: Vec<_> = out
            .iter()
            .filter(|d| matches!(d.kind, CellKind::Expand(_)))
            .collect();
        assert_eq!(strips.len(), 3);
    }

    #[test]
    fn cover_overlays_accumulate_flow_height() {
        let expandable: ExpandableMap = [
            (2, Expansion::new(60.0, ExpandStrategy::Cover)),
            (4, Expansion::new(30.0, ExpandStrategy::Cover)),
        ]
        .into_iter()
        .collect();
        let mut fx = Fixture::new(FrozenCounts::new(1, 0, 0), Some(expandable));
        let out = fx.compose(VisibleRange::new(1, 5), VisibleRange::new(0, 4));

        // Row 2: top 40 (row 0) + 40 (row 1) = 80, reduced height 40, header 40.
        let first = find(&out, CellKey::Cover(2)).style;
        assert_eq!(first.position, Position::Sticky);
        assert_eq!(first.margin_top, Some(80.0 + 40.0 - 40.0));
        assert_eq!(first.width, Length::Px(500.0));
        assert_eq!(first.height, 60.0);

        // Row 4: top 80 + 100 + 40 = 220; minus header and the 80 + 60 consumed above.
        let second = find(&out, CellKey::Cover(4)).style;
        assert_eq!(second.margin_top, Some(220.0 + 40.0 - 40.0 - 140.0));
    }

    #[test]
    fn frozen_columns_are_never_in_the_body() {
        let mut fx = Fixture::new(FrozenCounts::new(0, 2, 1), None);
        let out = fx.compose(VisibleRange::new(0, 3), VisibleRange::new(2, 8));

        for d in &out {
            let column = d.column_index.unwrap();
            let frozen = column < 2 || column >= 9;
            match d.style.layer {
                Some(Layer::LeftCell) => assert!(column < 2),
                Some(Layer::RightCell) => assert_eq!(column, 9),
                None => assert!(!frozen, "frozen column {column} in body"),
                other => panic!("unexpected layer {other:?}"),
            }
        }
        // 4 rows × (7 body + 2 left + 1 right).
        assert_eq!(out.len(), 40);
    }

    #[test]
    fn frozen_column_margins_stack_columns() {
        let mut fx = Fixture::new(FrozenCounts::new(1, 2, 2), None);
        let out = fx.compose(VisibleRange::new(3, 5), VisibleRange::new(2, 6));
        let rendered = 3.0 * ROW;

        let first_left = find(&out, CellKey::Cell { row: 3, column: 0 }).style;
        assert_eq!(first_left.margin_top, Some(3.0 * ROW - ROW));
        assert_eq!(first_left.left, Some(0.0));
        assert_eq!(first_left.z_index(), Some(2));

        let second_left = find(&out, CellKey::Cell { row: 3, column: 1 }).style;
        assert_eq!(second_left.margin_top, Some(-rendered));
        assert_eq!(second_left.left, Some(COLUMN));
        assert_eq!(find(&out, CellKey::Cell { row: 4, column: 1 }).style.margin_top, None);

        // With left columns present the right columns always rewind.
        let first_right = find(&out, CellKey::Cell { row: 3, column: 8 }).style;
        assert_eq!(first_right.margin_top, Some(-rendered));
        // viewport 500 - right yield 200 - right adjustment (2 - 1).
        assert_eq!(first_right.left, Some(299.0));
        let second_right = find(&out, CellKey::Cell { row: 3, column: 9 }).style;
        assert_eq!(second_right.left, Some(399.0));
    }

    #[test]
    fn frozen_top_row_emits_heads_before_body() {
        let mut fx = Fixture::new(FrozenCounts::new(1, 1, 1), None);
        let out = fx.compose(VisibleRange::new(1, 2), VisibleRange::new(3, 4));

        assert_eq!(out[0].key, CellKey::Cell { row: 0, column: 0 });
        assert_eq!(out[0].style.layer, Some(Layer::LeftHead));
        assert_eq!(out[0].style.top, Some(0.0));
        assert!(out[0].style.inline);

        assert_eq!(out[1].key, CellKey::Cell { row: 0, column: 9 });
        assert_eq!(out[1].style.layer, Some(Layer::RightHead));
        assert_eq!(out[1].style.left, Some(500.0 - COLUMN - 1.0));

        assert_eq!(out[2].key, CellKey::Cell { row: 0, column: 3 });
        assert_eq!(out[2].style.layer, Some(Layer::TopRow));
        // Column 3 starts at 300; minus left and right yields.
        assert_eq!(out[2].style.margin_left, Some(300.0 - COLUMN - COLUMN));
        assert_eq!(out[3].style.margin_left, None);

        assert_eq!(out[4].key, CellKey::Cell { row: 1, column: 3 });
    }

    #[test]
    fn placeholders_fill_narrow_content() {
        let mut fx = Fixture::new(FrozenCounts::new(1, 0, 0), None);
        fx.column_count = 3;
        fx.estimated.width = 300.0;
        fx.placeholders = true;
        let out = fx.compose(VisibleRange::new(1, 3), VisibleRange::new(0, 2));

        let head = find(&out, CellKey::HeadPlaceholder(0));
        assert_eq!(head.kind, CellKind::Placeholder);
        assert_eq!(head.style.width, Length::FillMinus(300.0));
        assert_eq!(head.style.layer, Some(Layer::TopRow));

        let bodies: Vec<_> = out
            .iter()
            .filter(|d| matches!(d.key, CellKey::Placeholder(_)))
            .collect();
        assert_eq!(bodies.len(), 3);
        assert_eq!(bodies[0].style.top, Some(ROW));
        assert_eq!(bodies[2].style.top, Some(3.0 * ROW));
        assert_eq!(bodies[0].style.width, Length::Fill);
        assert_eq!(bodies[0].style.z_index(), Some(-2));
    }

    #[test]
    fn no_placeholders_when_columns_fill_the_viewport() {
        let mut fx = Fixture::new(FrozenCounts::default(), None);
        fx.placeholders = true;
        let out = fx.compose(VisibleRange::new(0, 2), VisibleRange::new(0, 4));
        assert!(out.iter().all(|d| d.kind != CellKind::Placeholder));
    }

    #[test]
    fn cover_with_both_sides_frozen_uses_shadow() {
        let expandable: ExpandableMap = [(2, Expansion::new(50.0, ExpandStrategy::Cover))]
            .into_iter()
            .collect();
        let mut fx = Fixture::new(FrozenCounts::new(0, 1, 1), Some(expandable));
        let out = fx.compose(VisibleRange::new(1, 3), VisibleRange::new(1, 4));

        let covers: Vec<_> = out
            .iter()
            .filter(|d| d.key == CellKey::Cover(2))
            .collect();
        assert_eq!(covers.len(), 1, "cover is emitted once, by the left columns");
        assert_eq!(covers[0].style.margin_top, None);

        let shadow = find(&out, CellKey::Shadow(2));
        assert_eq!(shadow.kind, CellKind::Shadow);
        assert!(shadow.style.hidden);
        assert_eq!(shadow.style.height, 50.0);

        // Frozen cells use the unexpanded height.
        assert_eq!(find(&out, CellKey::Cell { row: 2, column: 0 }).style.height, ROW);
    }

    #[test]
    fn cover_with_only_right_frozen_is_emitted_by_right_columns() {
        let expandable: ExpandableMap = [(2, Expansion::new(50.0, ExpandStrategy::Cover))]
            .into_iter()
            .collect();
        let mut fx = Fixture::new(FrozenCounts::new(0, 0, 2), Some(expandable));
        let out = fx.compose(VisibleRange::new(1, 3), VisibleRange::new(0, 7));

        let cover_at = out.iter().position(|d| d.key == CellKey::Cover(2)).unwrap();
        assert_eq!(out[cover_at - 1].key, CellKey::Cell { row: 2, column: 8 });
        assert!(out.iter().all(|d| d.kind != CellKind::Shadow));

        // The second right column reserves the band below the expanded row.
        let second = find(&out, CellKey::Cell { row: 2, column: 9 }).style;
        assert_eq!(second.margin_bottom, Some(50.0));
        let first = find(&out, CellKey::Cell { row: 2, column: 8 }).style;
        assert_eq!(first.margin_bottom, None);
    }

    #[test]
    fn default_expansion_with_frozen_columns_adds_edge_strips() {
        let expandable: ExpandableMap = [(2, Expansion::new(50.0, ExpandStrategy::Default))]
            .into_iter()
            .collect();
        let mut fx = Fixture::new(FrozenCounts::new(0, 2, 1), Some(expandable));
        let out = fx.compose(VisibleRange::new(1, 3), VisibleRange::new(2, 8));

        let left = find(&out, CellKey::LeftStrip(2));
        assert_eq!(left.style.width, Length::Px(2.0 * COLUMN));
        assert_eq!(left.style.left, Some(0.0));
        let right = find(&out, CellKey::RightStrip(2));
        assert_eq!(right.style.width, Length::Px(COLUMN));
        assert_eq!(right.style.left, Some(500.0 - COLUMN - 1.0));

        // Body strips cover the visible scrollable columns only.
        let strips = out
            .iter()
            .filter(|d| matches!(d.key, CellKey::Strip { .. }))
            .count();
        assert_eq!(strips, 7);
    }
}
