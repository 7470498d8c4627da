// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! State markers: `active` / `passive` presentation hints on actors.
//!
//! During a session the item is active, the scope and every frozen target are
//! passive, and the hovered target (if any) is active instead of passive. The
//! scope flips to active while the pointer is outside its captured rectangle.
//! Every marker is cleared when the session ends.
//!
//! Markers are write-only from the engine's point of view: they exist for
//! styling and are never read back. The helpers accept `Option`s so callers can
//! pass "no current target" without branching.

use crate::host::Host;

/// Presentation marker on an actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActorState {
    /// Being dragged, hovered as a drop target, or a scope the pointer has left.
    Active,
    /// Participating in the session but not currently in focus.
    Passive,
}

impl ActorState {
    /// Attribute value a DOM host would write.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Passive => "passive",
        }
    }
}

/// Mark every present element active.
pub fn mark_active<H: Host>(host: &mut H, elements: impl IntoIterator<Item = Option<H::Element>>) {
    apply(host, elements, Some(ActorState::Active));
}

/// Mark every present element passive.
pub fn mark_passive<H: Host>(host: &mut H, elements: impl IntoIterator<Item = Option<H::Element>>) {
    apply(host, elements, Some(ActorState::Passive));
}

/// Clear the marker on every present element.
pub fn clear_state<H: Host>(host: &mut H, elements: impl IntoIterator<Item = Option<H::Element>>) {
    apply(host, elements, None);
}

fn apply<H: Host>(
    host: &mut H,
    elements: impl IntoIterator<Item = Option<H::Element>>,
    state: Option<ActorState>,
) {
    for element in elements.into_iter().flatten() {
        host.set_state(element, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::{Document, NodeKind};
    use kurbo::Rect;

    #[test]
    fn markers_skip_missing_elements() {
        let mut doc = Document::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let root = doc.root();
        let a = doc.append(root, NodeKind::Actor, Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = doc.append(root, NodeKind::Actor, Rect::new(0.0, 0.0, 10.0, 10.0));

        mark_passive(&mut doc, [Some(a), None, Some(b)]);
        assert_eq!(doc.state(a), Some(ActorState::Passive));
        assert_eq!(doc.state(b), Some(ActorState::Passive));

        mark_active(&mut doc, [None, Some(b)]);
        assert_eq!(doc.state(a), Some(ActorState::Passive));
        assert_eq!(doc.state(b), Some(ActorState::Active));

        clear_state(&mut doc, [Some(a), Some(b), None]);
        assert_eq!(doc.state(a), None);
        assert_eq!(doc.state(b), None);
    }

    #[test]
    fn state_strings() {
        assert_eq!(ActorState::Active.as_str(), "active");
        assert_eq!(ActorState::Passive.as_str(), "passive");
    }
}
