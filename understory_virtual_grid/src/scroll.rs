// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll state, scroll-event normalization, and scroll-into-view alignment.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Size, Vec2};

use crate::ItemMetadata;

/// Alignment mode when scrolling a specific row or column into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollAlign {
    /// Move just enough to make the item visible, keeping the current offset if it already is.
    #[default]
    Auto,
    /// Behave like [`ScrollAlign::Auto`] when the item is within one viewport of
    /// being visible, otherwise like [`ScrollAlign::Center`].
    Smart,
    /// Center the item within the viewport.
    Center,
    /// Align the leading edge of the item with the leading edge of the viewport.
    Start,
    /// Align the trailing edge of the item with the trailing edge of the viewport.
    End,
}

/// Direction of the most recent scroll along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollDirection {
    /// Toward larger offsets.
    #[default]
    Forward,
    /// Toward smaller offsets.
    Backward,
}

/// Horizontal layout direction of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayoutDirection {
    /// Columns run left to right.
    #[default]
    Ltr,
    /// Columns run right to left.
    Rtl,
}

/// How a host reports horizontal scroll offsets under right-to-left layout.
///
/// Platforms disagree here, so the host tells the engine which convention its
/// raw offsets follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RtlOffsetType {
    /// Offsets start at `0` and become negative while scrolling toward the end.
    Negative,
    /// Offsets start at the maximum and decrease toward `0` while scrolling toward the end.
    PositiveAscending,
    /// Offsets behave exactly as in left-to-right layout.
    #[default]
    PositiveDescending,
}

/// Committed scroll offsets and directions of a grid.
///
/// This is also the payload of the grid's `on_scroll` notification.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollState {
    /// Horizontal offset, normalized to left-to-right coordinates.
    pub scroll_left: f64,
    /// Vertical offset.
    pub scroll_top: f64,
    /// Direction of the latest committed horizontal change.
    pub horizontal_direction: ScrollDirection,
    /// Direction of the latest committed vertical change.
    pub vertical_direction: ScrollDirection,
}

/// A raw scroll event as reported by the host viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollEvent {
    /// Size of the visible client area.
    pub client_size: Size,
    /// Raw scroll offsets (`x` is horizontal, `y` is vertical).
    pub scroll_offset: Vec2,
    /// Size of the scrollable content.
    pub content_size: Size,
}

/// Scroll offsets the engine asks the host viewport to apply.
///
/// `None` leaves that axis untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollRequest {
    /// Requested horizontal offset.
    pub left: Option<f64>,
    /// Requested vertical offset.
    pub top: Option<f64>,
}

impl ScrollRequest {
    /// Returns `true` if neither axis is requested to move.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.left.is_none() && self.top.is_none()
    }
}

/// Owns [`ScrollState`] and applies scroll events to it.
#[derive(Debug, Clone)]
pub struct ScrollController {
    state: ScrollState,
    layout_direction: LayoutDirection,
    rtl_offset_type: RtlOffsetType,
    is_scrolling: bool,
}

impl ScrollController {
    /// Creates a controller at `initial` offsets, both directions [`ScrollDirection::Forward`].
    #[must_use]
    pub fn new(
        initial: Vec2,
        layout_direction: LayoutDirection,
        rtl_offset_type: RtlOffsetType,
    ) -> Self {
        Self {
            state: ScrollState {
                scroll_left: initial.x,
                scroll_top: initial.y,
                ..ScrollState::default()
            },
            layout_direction,
            rtl_offset_type,
            is_scrolling: false,
        }
    }

    /// Returns the committed scroll state.
    #[must_use]
    pub const fn state(&self) -> ScrollState {
        self.state
    }

    /// Returns whether the host reported that a scroll gesture is in progress.
    #[must_use]
    pub const fn is_scrolling(&self) -> bool {
        self.is_scrolling
    }

    /// Sets the in-progress scroll hint. Returns `true` if it changed.
    pub fn set_is_scrolling(&mut self, is_scrolling: bool) -> bool {
        let changed = self.is_scrolling != is_scrolling;
        self.is_scrolling = is_scrolling;
        changed
    }

    /// Updates the layout direction and RTL offset convention.
    pub fn set_direction(
        &mut self,
        layout_direction: LayoutDirection,
        rtl_offset_type: RtlOffsetType,
    ) {
        self.layout_direction = layout_direction;
        self.rtl_offset_type = rtl_offset_type;
    }

    /// Applies a raw scroll event.
    ///
    /// Each axis is handled independently: a raw offset equal to the committed one
    /// is ignored; otherwise the offset is normalized (RTL conventions on the
    /// horizontal axis), clamped to the scrollable range, and committed together
    /// with its direction. Returns the new state if anything changed.
    pub fn on_scroll_event(&mut self, event: &ScrollEvent) -> Option<ScrollState> {
        let prev = self.state;

        let raw_left = event.scroll_offset.x;
        if raw_left != prev.scroll_left {
            let max_left = event.content_size.width - event.client_size.width;
            let left = clamp_offset(self.normalize_horizontal(raw_left, max_left), max_left);
            if let Some(direction) = direction_of(prev.scroll_left, left) {
                self.state.scroll_left = left;
                self.state.horizontal_direction = direction;
            }
        }

        let raw_top = event.scroll_offset.y;
        if raw_top != prev.scroll_top {
            let max_top = event.content_size.height - event.client_size.height;
            let top = clamp_offset(raw_top, max_top);
            if let Some(direction) = direction_of(prev.scroll_top, top) {
                self.state.scroll_top = top;
                self.state.vertical_direction = direction;
            }
        }

        (self.state != prev).then_some(self.state)
    }

    /// Commits already-normalized offsets, clamped to `[0, max]` per axis.
    ///
    /// Used when there is no host viewport to round-trip a [`ScrollRequest`] through.
    pub fn commit(&mut self, request: &ScrollRequest, max: Vec2) -> Option<ScrollState> {
        let prev = self.state;
        if let Some(left) = request.left {
            let left = clamp_offset(left, max.x);
            if let Some(direction) = direction_of(prev.scroll_left, left) {
                self.state.scroll_left = left;
                self.state.horizontal_direction = direction;
            }
        }
        if let Some(top) = request.top {
            let top = clamp_offset(top, max.y);
            if let Some(direction) = direction_of(prev.scroll_top, top) {
                self.state.scroll_top = top;
                self.state.vertical_direction = direction;
            }
        }
        (self.state != prev).then_some(self.state)
    }

    fn normalize_horizontal(&self, raw: f64, max_left: f64) -> f64 {
        match (self.layout_direction, self.rtl_offset_type) {
            (LayoutDirection::Rtl, RtlOffsetType::Negative) => -raw,
            (LayoutDirection::Rtl, RtlOffsetType::PositiveAscending) => max_left - raw,
            _ => raw,
        }
    }
}

fn clamp_offset(offset: f64, max: f64) -> f64 {
    offset.min(max).max(0.0)
}

fn direction_of(prev: f64, next: f64) -> Option<ScrollDirection> {
    if next == prev {
        None
    } else if next > prev {
        Some(ScrollDirection::Forward)
    } else {
        Some(ScrollDirection::Backward)
    }
}

/// Computes the scroll offset that brings `item` into view along one axis.
///
/// - `viewport_extent`: size of the viewport along the axis.
/// - `content_extent`: estimated total content size along the axis.
/// - `scroll_offset`: the current offset, consulted by [`ScrollAlign::Auto`] and
///   [`ScrollAlign::Smart`].
/// - `scrollbar_reserve`: space taken by a scrollbar on the cross axis, if any.
#[must_use]
pub fn offset_for_item(
    item: ItemMetadata,
    viewport_extent: f64,
    content_extent: f64,
    align: ScrollAlign,
    scroll_offset: f64,
    scrollbar_reserve: f64,
) -> f64 {
    let max_offset = (content_extent - viewport_extent).min(item.offset).max(0.0);
    let min_offset = (item.offset - viewport_extent + scrollbar_reserve + item.size).max(0.0);

    let align = match align {
        ScrollAlign::Smart => {
            if scroll_offset >= min_offset - viewport_extent
                && scroll_offset <= max_offset + viewport_extent
            {
                ScrollAlign::Auto
            } else {
                ScrollAlign::Center
            }
        }
        other => other,
    };

    match align {
        ScrollAlign::Start => max_offset,
        ScrollAlign::End => min_offset,
        ScrollAlign::Center => round_half_up(min_offset + (max_offset - min_offset) / 2.0),
        ScrollAlign::Auto | ScrollAlign::Smart => {
            if scroll_offset >= min_offset && scroll_offset <= max_offset {
                scroll_offset
            } else if min_offset > max_offset || scroll_offset < min_offset {
                min_offset
            } else {
                max_offset
            }
        }
    }
}

/// Rounds an offset to the nearest pixel, halves rounding up.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
