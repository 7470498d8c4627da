// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Movement constraints: clamp an item's offset so it stays inside its scope.
//!
//! Bounds are computed once, when a drag session starts, from the scope's
//! bounding rectangle, the item's bounding rectangle, and the item's committed
//! offset. For one axis:
//!
//! - `min = scope_start - (item_start - offset)`
//! - `max = scope_end - (item_end - offset)`
//!
//! Every later pointer position resolves to `offset + delta` clamped into
//! `min..=max`. When `min == max` the item already fills the scope on that axis
//! and the axis is frozen at its committed offset.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Rect, Vec2};
//! use understory_dnd::geometry::Bounds;
//!
//! let scope = Rect::new(0.0, 0.0, 400.0, 200.0);
//! let item = Rect::new(10.0, 10.0, 60.0, 30.0);
//! let bounds = Bounds::new(scope, item, Vec2::ZERO, Point::new(20.0, 20.0));
//!
//! // Dragging far to the left stops at the scope's left edge.
//! let offset = bounds.resolve(Point::new(-500.0, 20.0), None);
//! assert_eq!(offset, Vec2::new(-10.0, 0.0));
//! ```

use kurbo::{Point, Rect, Vec2};

use crate::config::Axis;

/// Constraint data for a single axis, captured at session start.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisBounds {
    /// Pointer coordinate on this axis when the session started.
    pub origin: f64,
    /// Committed item offset on this axis when the session started.
    pub offset: f64,
    /// Smallest offset that keeps the item's start edge inside the scope.
    pub min: f64,
    /// Largest offset that keeps the item's end edge inside the scope.
    pub max: f64,
}

impl AxisBounds {
    /// Compute bounds for one axis from scope and item extents.
    ///
    /// `scope` and `item` are `(start, end)` pairs measured with the item's
    /// current `offset` already applied.
    pub fn new(scope: (f64, f64), item: (f64, f64), offset: f64, origin: f64) -> Self {
        Self {
            origin,
            offset,
            min: scope.0 - (item.0 - offset),
            max: scope.1 - (item.1 - offset),
        }
    }

    /// Returns `true` when the item already fills the scope on this axis.
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    /// Resolve the offset for a pointer coordinate on this axis.
    ///
    /// An item larger than its scope (`min > max`) pins to `min`.
    pub fn resolve(&self, pointer: f64) -> f64 {
        if self.is_degenerate() {
            return self.offset;
        }
        (self.offset + pointer - self.origin)
            .min(self.max)
            .max(self.min)
    }
}

/// Per-axis constraints for a drag session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    /// Horizontal constraints.
    pub x: AxisBounds,
    /// Vertical constraints.
    pub y: AxisBounds,
}

impl Bounds {
    /// Capture bounds from the scope rect, the item rect, the item's committed
    /// offset, and the pointer position at session start.
    pub fn new(scope: Rect, item: Rect, offset: Vec2, origin: Point) -> Self {
        Self {
            x: AxisBounds::new((scope.x0, scope.x1), (item.x0, item.x1), offset.x, origin.x),
            y: AxisBounds::new((scope.y0, scope.y1), (item.y0, item.y1), offset.y, origin.y),
        }
    }

    /// The committed offset these bounds were captured from.
    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.x.offset, self.y.offset)
    }

    /// Resolve the item offset for a pointer position.
    ///
    /// With `axis` set, movement is restricted to that axis and the other one
    /// keeps its committed offset.
    pub fn resolve(&self, pointer: Point, axis: Option<Axis>) -> Vec2 {
        let x = match axis {
            Some(Axis::Y) => self.x.offset,
            _ => self.x.resolve(pointer.x),
        };
        let y = match axis {
            Some(Axis::X) => self.y.offset,
            _ => self.y.resolve(pointer.y),
        };
        Vec2::new(x, y)
    }
}

/// Inclusive point containment: points on any edge count as inside.
pub fn contains_inclusive(rect: Rect, pt: Point) -> bool {
    rect.x0 <= pt.x && pt.x <= rect.x1 && rect.y0 <= pt.y && pt.y <= rect.y1
}

/// Returns `true` when `pointer` has left the `dist` box around `origin`.
///
/// A non-positive `dist` disables the threshold.
pub fn exceeds_threshold(origin: Point, pointer: Point, dist: f64) -> bool {
    if dist <= 0.0 {
        return true;
    }
    (pointer.x - origin.x).abs() > dist || (pointer.y - origin.y).abs() > dist
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope() -> Rect {
        Rect::new(0.0, 0.0, 400.0, 200.0)
    }

    #[test]
    fn bounds_follow_edge_formula() {
        let item = Rect::new(50.0, 20.0, 100.0, 40.0);
        let b = Bounds::new(scope(), item, Vec2::ZERO, Point::ZERO);
        assert_eq!(b.x.min, -50.0);
        assert_eq!(b.x.max, 300.0);
        assert_eq!(b.y.min, -20.0);
        assert_eq!(b.y.max, 160.0);
    }

    #[test]
    fn existing_offset_shifts_range_back_to_layout_position() {
        // Item laid out at x=50 but already translated by 30.
        let item = Rect::new(80.0, 20.0, 130.0, 40.0);
        let b = Bounds::new(scope(), item, Vec2::new(30.0, 0.0), Point::ZERO);
        assert_eq!(b.x.min, -50.0);
        assert_eq!(b.x.max, 300.0);
    }

    #[test]
    fn resolve_clamps_both_directions() {
        let item = Rect::new(50.0, 20.0, 100.0, 40.0);
        let b = Bounds::new(scope(), item, Vec2::ZERO, Point::new(60.0, 30.0));
        assert_eq!(b.resolve(Point::new(1000.0, 1000.0), None), Vec2::new(300.0, 160.0));
        assert_eq!(b.resolve(Point::new(-1000.0, -1000.0), None), Vec2::new(-50.0, -20.0));
        assert_eq!(b.resolve(Point::new(70.0, 35.0), None), Vec2::new(10.0, 5.0));
    }

    #[test]
    fn degenerate_axis_keeps_offset() {
        let item = Rect::new(50.0, 0.0, 100.0, 200.0);
        let b = Bounds::new(scope(), item, Vec2::ZERO, Point::new(60.0, 10.0));
        assert!(b.y.is_degenerate());
        assert!(!b.x.is_degenerate());
        assert_eq!(b.resolve(Point::new(60.0, 180.0), None).y, 0.0);
    }

    #[test]
    fn oversized_item_pins_to_min() {
        let item = Rect::new(-10.0, 0.0, 500.0, 20.0);
        let b = Bounds::new(scope(), item, Vec2::ZERO, Point::ZERO);
        assert!(b.x.min > b.x.max);
        assert_eq!(b.x.resolve(40.0), b.x.min);
    }

    #[test]
    fn axis_lock_keeps_other_axis() {
        let item = Rect::new(50.0, 20.0, 100.0, 40.0);
        let b = Bounds::new(scope(), item, Vec2::new(0.0, 7.0), Point::ZERO);
        let x_only = b.resolve(Point::new(20.0, 50.0), Some(Axis::X));
        assert_eq!(x_only, Vec2::new(20.0, 7.0));
        let y_only = b.resolve(Point::new(20.0, 50.0), Some(Axis::Y));
        assert_eq!(y_only, Vec2::new(0.0, 57.0));
    }

    #[test]
    fn containment_includes_edges() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(contains_inclusive(r, Point::new(10.0, 10.0)));
        assert!(contains_inclusive(r, Point::new(0.0, 5.0)));
        assert!(!contains_inclusive(r, Point::new(10.1, 5.0)));
    }

    #[test]
    fn threshold_is_inclusive() {
        let o = Point::new(100.0, 100.0);
        assert!(!exceeds_threshold(o, Point::new(110.0, 90.0), 10.0));
        assert!(exceeds_threshold(o, Point::new(111.0, 100.0), 10.0));
        assert!(exceeds_threshold(o, o, 0.0));
    }
}
