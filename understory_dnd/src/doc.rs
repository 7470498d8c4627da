// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory [`Host`]: a retained element tree with attributes and layout.
//!
//! [`Document`] is a small stand-in for a real rendering host. It is useful for
//! tests, headless tools, and as a reference when binding the engine to a real
//! UI tree.
//!
//! - Each node has a layout rectangle, laid out in document coordinates.
//!   [`Host::bounding_rect`] adds the committed offsets of the node and all of
//!   its ancestors.
//! - Paint order is preorder: later siblings and children paint above earlier
//!   ones. [`Host::element_at`] returns the last node in paint order whose
//!   rectangle contains the point, skipping lifted subtrees.
//! - Offset changes are committed immediately unless deferred commits are
//!   enabled, in which case any non-instant transition is queued until
//!   [`Document::finish_transition`] is called.
//!
//! ```
//! use kurbo::{Point, Rect};
//! use understory_dnd::doc::{Document, NodeKind};
//! use understory_dnd::host::Host;
//!
//! let mut doc = Document::new(Rect::new(0.0, 0.0, 100.0, 100.0));
//! let root = doc.root();
//! let card = doc.append(root, NodeKind::Actor, Rect::new(10.0, 10.0, 30.0, 30.0));
//! assert_eq!(doc.element_at(Point::new(15.0, 15.0)), Some(card));
//! assert_eq!(doc.element_at(Point::new(50.0, 50.0)), Some(root));
//! ```

use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect, Vec2};

use crate::config::{Lift, Transition};
use crate::host::{Commit, Cursor, Host};
use crate::state::ActorState;

/// Identifier of a [`Document`] node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    const ROOT: Self = Self(0);

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// What a node can be used as.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Layout-only node; never an item, scope, or target.
    #[default]
    Plain,
    /// Can act as an item, scope, or drop target.
    Actor,
    /// A drag handle. Its attributes configure sessions, not actors.
    Trigger,
}

#[derive(Clone, Debug, Default)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: Vec<(String, String)>,
    rect: Rect,
    offset: Vec2,
    state: Option<ActorState>,
    cursor: Cursor,
    lift: Option<Lift>,
    transition: Option<Transition>,
}

/// In-memory element tree implementing [`Host`].
#[derive(Clone, Debug)]
pub struct Document {
    nodes: Vec<Node>,
    deferred: bool,
    /// Queued offset changes; `None` once a later instant apply superseded it.
    pending: VecDeque<(NodeId, Option<Vec2>)>,
}

impl Document {
    /// Create a document whose root covers `root_rect`.
    pub fn new(root_rect: Rect) -> Self {
        Self {
            nodes: alloc::vec![Node {
                rect: root_rect,
                ..Node::default()
            }],
            deferred: false,
            pending: VecDeque::new(),
        }
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Append a new last child to `parent`.
    pub fn append(&mut self, parent: NodeId, kind: NodeKind, rect: Rect) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            rect,
            ..Node::default()
        });
        if let Some(p) = self.nodes.get_mut(parent.idx()) {
            p.children.push(id);
        }
        id
    }

    /// Detach `node` and its subtree from its parent.
    pub fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.node(node).and_then(|n| n.parent) else {
            return;
        };
        if let Some(p) = self.nodes.get_mut(parent.idx()) {
            p.children.retain(|&c| c != node);
        }
        if let Some(n) = self.nodes.get_mut(node.idx()) {
            n.parent = None;
        }
    }

    /// Set an attribute, replacing any previous value.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(n) = self.nodes.get_mut(node.idx()) else {
            return;
        };
        match n.attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = String::from(value),
            None => n.attributes.push((String::from(name), String::from(value))),
        }
    }

    /// Remove an attribute. Returns `true` if it was present.
    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> bool {
        let Some(n) = self.nodes.get_mut(node.idx()) else {
            return false;
        };
        let before = n.attributes.len();
        n.attributes.retain(|(k, _)| k != name);
        n.attributes.len() != before
    }

    /// Replace the layout rectangle of `node`.
    pub fn set_layout_rect(&mut self, node: NodeId, rect: Rect) {
        if let Some(n) = self.nodes.get_mut(node.idx()) {
            n.rect = rect;
        }
    }

    /// Kind of `node`.
    pub fn kind(&self, node: NodeId) -> Option<NodeKind> {
        self.node(node).map(|n| n.kind)
    }

    /// Current state marker of `node`.
    pub fn state(&self, node: NodeId) -> Option<ActorState> {
        self.node(node).and_then(|n| n.state)
    }

    /// Current lift of `node`.
    pub fn lift(&self, node: NodeId) -> Option<Lift> {
        self.node(node).and_then(|n| n.lift)
    }

    /// Transition used by the last offset change applied to `node`.
    pub fn last_transition(&self, node: NodeId) -> Option<Transition> {
        self.node(node).and_then(|n| n.transition)
    }

    /// Queue non-instant offset changes instead of committing them.
    pub fn set_deferred_commits(&mut self, deferred: bool) {
        self.deferred = deferred;
    }

    /// Number of queued offset changes.
    pub fn pending_transitions(&self) -> usize {
        self.pending.len()
    }

    /// Commit the oldest queued offset change and return its node.
    ///
    /// A change superseded by a later instant apply completes without
    /// touching the offset.
    pub fn finish_transition(&mut self) -> Option<NodeId> {
        let (node, offset) = self.pending.pop_front()?;
        if let (Some(n), Some(offset)) = (self.nodes.get_mut(node.idx()), offset) {
            n.offset = offset;
        }
        Some(node)
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.idx())
    }

    fn hit(&self, id: NodeId, point: Point, best: &mut Option<NodeId>) {
        let Some(n) = self.node(id) else {
            return;
        };
        if n.lift.is_some() {
            return;
        }
        if self.bounding_rect(id).contains(point) {
            *best = Some(id);
        }
        for &child in &n.children {
            self.hit(child, point, best);
        }
    }
}

impl Host for Document {
    type Element = NodeId;

    fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    fn parent(&self, element: NodeId) -> Option<NodeId> {
        self.node(element).and_then(|n| n.parent)
    }

    fn descendants(&self, element: NodeId, out: &mut Vec<NodeId>) {
        let Some(n) = self.node(element) else {
            return;
        };
        for &child in &n.children {
            out.push(child);
            self.descendants(child, out);
        }
    }

    fn attribute(&self, element: NodeId, name: &str) -> Option<&str> {
        self.node(element)?
            .attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn bounding_rect(&self, element: NodeId) -> Rect {
        let Some(n) = self.node(element) else {
            return Rect::ZERO;
        };
        let mut shift = Vec2::ZERO;
        let mut cur = Some(element);
        while let Some(id) = cur {
            let Some(node) = self.node(id) else {
                break;
            };
            shift += node.offset;
            cur = node.parent;
        }
        n.rect + shift
    }

    fn element_at(&self, point: Point) -> Option<NodeId> {
        let mut best = None;
        self.hit(NodeId::ROOT, point, &mut best);
        best
    }

    fn offset(&self, element: NodeId) -> Vec2 {
        self.node(element).map_or(Vec2::ZERO, |n| n.offset)
    }

    fn apply_offset(&mut self, element: NodeId, offset: Vec2, transition: &Transition) -> Commit {
        let deferred = self.deferred && !transition.is_instant();
        let Some(n) = self.nodes.get_mut(element.idx()) else {
            return Commit::Done;
        };
        n.transition = Some(*transition);
        if deferred {
            self.pending.push_back((element, Some(offset)));
            return Commit::Pending;
        }
        n.offset = offset;
        for (_, queued) in self.pending.iter_mut().filter(|(node, _)| *node == element) {
            *queued = None;
        }
        Commit::Done
    }

    fn set_state(&mut self, element: NodeId, state: Option<ActorState>) {
        if let Some(n) = self.nodes.get_mut(element.idx()) {
            n.state = state;
        }
    }

    fn cursor(&self, element: NodeId) -> Cursor {
        self.node(element).map_or(Cursor::Auto, |n| n.cursor)
    }

    fn set_cursor(&mut self, element: NodeId, cursor: Cursor) {
        if let Some(n) = self.nodes.get_mut(element.idx()) {
            n.cursor = cursor;
        }
    }

    fn set_lift(&mut self, element: NodeId, lift: Option<Lift>) {
        if let Some(n) = self.nodes.get_mut(element.idx()) {
            n.lift = lift;
        }
    }

    fn is_actor(&self, element: NodeId) -> bool {
        self.kind(element) == Some(NodeKind::Actor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Easing;

    fn slow() -> Transition {
        Transition {
            duration: 100.0,
            delay: 0.0,
            easing: Easing::Linear,
        }
    }

    #[test]
    fn bounding_rect_includes_ancestor_offsets() {
        let mut doc = Document::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let root = doc.root();
        let outer = doc.append(root, NodeKind::Actor, Rect::new(10.0, 10.0, 50.0, 50.0));
        let inner = doc.append(outer, NodeKind::Plain, Rect::new(20.0, 20.0, 30.0, 30.0));
        doc.apply_offset(outer, Vec2::new(5.0, 0.0), &Transition::INSTANT);
        doc.apply_offset(inner, Vec2::new(0.0, 2.0), &Transition::INSTANT);
        assert_eq!(doc.bounding_rect(inner), Rect::new(25.0, 22.0, 35.0, 32.0));
        assert_eq!(doc.bounding_rect(outer), Rect::new(15.0, 10.0, 55.0, 50.0));
    }

    #[test]
    fn lifted_subtrees_are_transparent_to_hits() {
        let mut doc = Document::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let root = doc.root();
        let below = doc.append(root, NodeKind::Actor, Rect::new(0.0, 0.0, 50.0, 50.0));
        let above = doc.append(root, NodeKind::Actor, Rect::new(0.0, 0.0, 50.0, 50.0));
        let handle = doc.append(above, NodeKind::Trigger, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(doc.element_at(Point::new(5.0, 5.0)), Some(handle));

        doc.set_lift(
            above,
            Some(Lift {
                z_index: 1,
                opacity: 0.5,
            }),
        );
        assert_eq!(doc.element_at(Point::new(5.0, 5.0)), Some(below));
    }

    #[test]
    fn deferred_commits_queue_until_finished() {
        let mut doc = Document::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let root = doc.root();
        let a = doc.append(root, NodeKind::Actor, Rect::new(0.0, 0.0, 10.0, 10.0));
        doc.set_deferred_commits(true);

        assert_eq!(doc.apply_offset(a, Vec2::new(4.0, 0.0), &slow()), Commit::Pending);
        assert_eq!(doc.offset(a), Vec2::ZERO);
        assert_eq!(doc.pending_transitions(), 1);
        assert_eq!(doc.finish_transition(), Some(a));
        assert_eq!(doc.offset(a), Vec2::new(4.0, 0.0));
        assert_eq!(doc.finish_transition(), None);

        // Instant changes never wait.
        assert_eq!(doc.apply_offset(a, Vec2::ZERO, &Transition::INSTANT), Commit::Done);
        assert_eq!(doc.offset(a), Vec2::ZERO);
    }

    #[test]
    fn instant_apply_supersedes_queued_changes() {
        let mut doc = Document::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let root = doc.root();
        let a = doc.append(root, NodeKind::Actor, Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = doc.append(root, NodeKind::Actor, Rect::new(20.0, 0.0, 30.0, 10.0));
        doc.set_deferred_commits(true);

        doc.apply_offset(a, Vec2::new(100.0, 0.0), &slow());
        doc.apply_offset(b, Vec2::new(0.0, 7.0), &slow());
        assert_eq!(doc.apply_offset(a, Vec2::ZERO, &Transition::INSTANT), Commit::Done);

        // Superseded changes still complete, but the instant offset stays.
        assert_eq!(doc.pending_transitions(), 2);
        assert_eq!(doc.finish_transition(), Some(a));
        assert_eq!(doc.offset(a), Vec2::ZERO);
        assert_eq!(doc.finish_transition(), Some(b));
        assert_eq!(doc.offset(b), Vec2::new(0.0, 7.0));
    }

    #[test]
    fn attributes_and_detach() {
        let mut doc = Document::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let root = doc.root();
        let a = doc.append(root, NodeKind::Actor, Rect::ZERO);
        let b = doc.append(a, NodeKind::Plain, Rect::ZERO);
        doc.set_attribute(a, "item", "one");
        doc.set_attribute(a, "item", "two");
        assert_eq!(doc.attribute(a, "item"), Some("two"));
        assert!(doc.remove_attribute(a, "item"));
        assert!(!doc.remove_attribute(a, "item"));

        let mut all = Vec::new();
        doc.descendants(root, &mut all);
        assert_eq!(all, [a, b]);

        doc.detach(a);
        assert!(!doc.is_connected(b));
        assert_eq!(doc.parent(a), None);
    }

    #[test]
    fn unknown_nodes_are_inert() {
        let mut doc = Document::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let bogus = NodeId(42);
        doc.set_state(bogus, Some(ActorState::Active));
        assert_eq!(doc.state(bogus), None);
        assert_eq!(doc.bounding_rect(bogus), Rect::ZERO);
        assert_eq!(doc.apply_offset(bogus, Vec2::new(1.0, 1.0), &slow()), Commit::Done);
    }
}
