// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Option validation errors.

use kurbo::Size;

/// A contract violation found by [`GridOptions::validate`](crate::GridOptions::validate).
///
/// The grid never rejects options: out-of-range values degrade to clamped or
/// empty ranges. These errors exist so hosts can surface misconfiguration.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// More frozen top rows than rows.
    #[error("{top} frozen top rows exceed the row count of {row_count}")]
    FrozenRowsExceedCount {
        /// Requested frozen top rows.
        top: usize,
        /// Number of rows.
        row_count: usize,
    },
    /// Left and right frozen columns together exceed the column count.
    #[error("{left} left + {right} right frozen columns exceed the column count of {column_count}")]
    FrozenColumnsExceedCount {
        /// Requested left-frozen columns.
        left: usize,
        /// Requested right-frozen columns.
        right: usize,
        /// Number of columns.
        column_count: usize,
    },
    /// The viewport has a negative or non-finite dimension.
    #[error("viewport size must be finite and non-negative, got {0:?}")]
    InvalidViewport(Size),
    /// The estimated content size has a negative or non-finite dimension.
    #[error("estimated content size must be finite and non-negative, got {0:?}")]
    InvalidEstimate(Size),
    /// The scrollbar size is negative or non-finite.
    #[error("scrollbar size must be finite and non-negative, got {0}")]
    InvalidScrollbarSize(f64),
}

pub(crate) fn is_valid_size(size: Size) -> bool {
    size.is_finite() && size.width >= 0.0 && size.height >= 0.0
}
