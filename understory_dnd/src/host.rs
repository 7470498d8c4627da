// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host seam: everything the engine needs from the rendering host.
//!
//! The engine never owns elements. It asks the [`Host`] for tree structure,
//! attributes, geometry, and the element under a point, and tells it to apply
//! offsets, state markers, cursors, and lift styling. A browser binding would
//! implement this over the DOM; [`Document`](crate::doc::Document) implements it
//! over an in-memory tree.
//!
//! ## Offsets and commits
//!
//! An item's offset is stored on the item by the host and outlives sessions.
//! [`Host::apply_offset`] may interpolate the change. A host that finishes the
//! change synchronously returns [`Commit::Done`]; one that animates returns
//! [`Commit::Pending`] and later reports completion through
//! [`Engine::transition_finished`](crate::engine::Engine::transition_finished).
//! The engine holds back the matching `drag` notification until then, and a
//! release arriving meanwhile delays `dragend` the same way. Every `Pending`
//! must eventually be reported, even when a later apply supersedes it.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use kurbo::{Point, Rect, Vec2};

use crate::config::{Lift, Transition};
use crate::state::ActorState;

/// Whether an offset change has been committed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Commit {
    /// The new offset is in effect.
    Done,
    /// The host is still interpolating; completion is reported later.
    Pending,
}

/// Pointer affordance shown over an element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cursor {
    /// Host decides.
    #[default]
    Auto,
    /// Platform default arrow.
    Default,
    /// Link-style pointer.
    Pointer,
    /// Open hand.
    Grab,
    /// Closed hand, shown while dragging.
    Grabbing,
    /// Move arrows.
    Move,
}

/// Rendering host operations used by the drag and drop engine.
pub trait Host {
    /// Element handle. Cheap to copy and compare.
    type Element: Copy + Eq + Hash + Debug;

    /// The document root.
    fn root(&self) -> Self::Element;

    /// Parent of `element`, or `None` for the root and detached elements.
    fn parent(&self, element: Self::Element) -> Option<Self::Element>;

    /// Append all descendants of `element` to `out`, in document order.
    fn descendants(&self, element: Self::Element, out: &mut Vec<Self::Element>);

    /// Attribute value, if present. Present-but-empty is `Some("")`.
    fn attribute(&self, element: Self::Element, name: &str) -> Option<&str>;

    /// Bounding rectangle with committed offsets applied.
    fn bounding_rect(&self, element: Self::Element) -> Rect;

    /// Topmost element at `point` in paint order.
    ///
    /// Lifted elements let hit-testing pass through.
    fn element_at(&self, point: Point) -> Option<Self::Element>;

    /// Committed offset of `element`.
    fn offset(&self, element: Self::Element) -> Vec2;

    /// Commit `offset` as the visual offset of `element`.
    fn apply_offset(&mut self, element: Self::Element, offset: Vec2, transition: &Transition)
    -> Commit;

    /// Set or clear the state marker consumed by styling.
    fn set_state(&mut self, element: Self::Element, state: Option<ActorState>);

    /// Cursor currently in effect on `element`.
    fn cursor(&self, element: Self::Element) -> Cursor;

    /// Override the cursor on `element`; [`Cursor::Auto`] removes the override.
    fn set_cursor(&mut self, element: Self::Element, cursor: Cursor);

    /// Lift `element` for the duration of a session, or restore it with `None`.
    fn set_lift(&mut self, element: Self::Element, lift: Option<Lift>);

    /// Returns `true` if `element` can act as an item, scope, or target.
    ///
    /// Hosts that model trigger handles as separate element kinds return
    /// `false` for them so a trigger's own attributes are not mistaken for
    /// actor attributes.
    fn is_actor(&self, element: Self::Element) -> bool {
        let _ = element;
        true
    }

    /// Returns `true` if `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: Self::Element, node: Self::Element) -> bool {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if n == ancestor {
                return true;
            }
            cur = self.parent(n);
        }
        false
    }

    /// Returns `true` if `element` is attached under the document root.
    fn is_connected(&self, element: Self::Element) -> bool {
        self.contains(self.root(), element)
    }
}
