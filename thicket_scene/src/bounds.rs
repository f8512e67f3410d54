// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned bounding box with an explicit empty state.

use kurbo::{Affine, Rect};

/// An axis-aligned bounding box that may be empty.
///
/// `Bounds` is the aggregation value type for bounds queries. The empty
/// state is explicit rather than a degenerate `{0,0,0,0}` rectangle:
/// `Rect::ZERO.union(b)` would pin every union to the origin, while
/// [`Bounds::EMPTY`] is a true identity element that contributes nothing.
///
/// Any contained rectangle is finite and normalized (`x0 <= x1`,
/// `y0 <= y1`). Zero-extent rectangles are allowed (genuine point-like
/// geometry still pins a location), but non-finite input collapses to empty
/// so NaN/∞ can never spread through an aggregate.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Bounds(Option<Rect>);

impl Bounds {
    /// The empty bounds: the identity element of [`Bounds::union`].
    pub const EMPTY: Self = Self(None);

    /// Bounds covering `rect`.
    ///
    /// Non-finite rectangles yield [`Bounds::EMPTY`]; inverted rectangles
    /// are normalized.
    pub fn from_rect(rect: Rect) -> Self {
        if !rect.is_finite() {
            return Self::EMPTY;
        }
        Self(Some(rect.abs()))
    }

    /// Returns true if these bounds contain nothing.
    pub fn is_empty(self) -> bool {
        self.0.is_none()
    }

    /// The covered rectangle, or `None` when empty.
    pub fn rect(self) -> Option<Rect> {
        self.0
    }

    /// The covered rectangle, reported as `Rect::ZERO` when empty.
    ///
    /// This is the caller-facing degenerate form: an empty subtree reports
    /// a zero-size box at the origin, not an error.
    pub fn as_rect(self) -> Rect {
        self.0.unwrap_or(Rect::ZERO)
    }

    /// The smallest bounds covering both `self` and `other`.
    ///
    /// Commutative and associative, with [`Bounds::EMPTY`] as identity.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        match (self.0, other.0) {
            (Some(a), Some(b)) => Self(Some(a.union(b))),
            (Some(a), None) => Self(Some(a)),
            (None, b) => Self(b),
        }
    }

    /// These bounds mapped through `affine`: the exact axis-aligned box of
    /// the four transformed corners. Empty stays empty.
    #[must_use]
    pub fn transformed(self, affine: Affine) -> Self {
        match self.0 {
            Some(rect) => Self::from_rect(transform_rect_bbox(affine, rect)),
            None => Self::EMPTY,
        }
    }
}

/// Transform an axis-aligned `Rect` by an `Affine` and return the exact
/// axis-aligned bounding box of the four transformed corners.
pub(crate) fn transform_rect_bbox(affine: Affine, rect: Rect) -> Rect {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    let min_x = (a * rect.x0).min(a * rect.x1) + (c * rect.y0).min(c * rect.y1);
    let max_x = (a * rect.x0).max(a * rect.x1) + (c * rect.y0).max(c * rect.y1);
    let min_y = (b * rect.x0).min(b * rect.x1) + (d * rect.y0).min(d * rect.y1);
    let max_y = (b * rect.x0).max(b * rect.x1) + (d * rect.y0).max(d * rect.y1);
    Rect::new(min_x + e, min_y + f, max_x + e, max_y + f)
}
