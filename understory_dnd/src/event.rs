// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lifecycle notifications and their bubbling delivery to observers.
//!
//! Every notification is a [`DndEvent`]: a type, the element it is dispatched
//! from, and an immutable snapshot of the session ([`Refs`] and [`Keys`]) as
//! of dispatch time, plus the originating input. Snapshots are built per
//! dispatch, so an observer holding on to an event never sees later session
//! changes.
//!
//! ## Order within a session
//!
//! 1. `dragstart` from the item when the session begins.
//! 2. On every effective move: if the hovered target changed, `dropleave` from
//!    the old target (snapshot still naming it) then `dropenter` from the new
//!    one; then `drag` from the item once the offset is committed.
//! 3. On end: `drop` then `dropleave` from the hovered target, if any; then
//!    `dragend` from the item.
//!
//! ## Delivery
//!
//! Observers register on a root element (the document root by default).
//! Dispatch walks from the origin up through its ancestors and invokes the
//! observers registered on each element it passes, in registration order.
//! Dispatching from no element is a no-op.
//!
//! ```
//! use understory_dnd::event::Observers;
//!
//! let mut observers = Observers::<u32>::new();
//! let id = observers.observe(None, |event| {
//!     let _ = event.kind.as_str();
//! });
//! assert!(observers.unobserve(id));
//! assert!(!observers.unobserve(id));
//! ```

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use smallvec::SmallVec;

use crate::host::Host;
use crate::input::PointerInput;

/// Lifecycle notification types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DndEventType {
    /// A session began.
    DragStart,
    /// The item moved.
    Drag,
    /// The session ended.
    DragEnd,
    /// The pointer entered a drop target.
    DropEnter,
    /// The pointer left a drop target, or the session ended over it.
    DropLeave,
    /// The item was released over a drop target.
    Drop,
}

impl DndEventType {
    /// Conventional event name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DragStart => "dragstart",
            Self::Drag => "drag",
            Self::DragEnd => "dragend",
            Self::DropEnter => "dropenter",
            Self::DropLeave => "dropleave",
            Self::Drop => "drop",
        }
    }
}

/// Session elements at dispatch time.
#[derive(Clone, Debug, PartialEq)]
pub struct Refs<E> {
    /// Trigger element that started the session.
    pub trigger: E,
    /// Dragged item.
    pub item: Option<E>,
    /// Bounding scope.
    pub scope: Option<E>,
    /// Hovered drop target.
    pub target: Option<E>,
    /// Frozen drop candidates.
    pub areas: Rc<[E]>,
}

/// String identifiers of the session elements at dispatch time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Keys {
    /// Item name; empty if unnamed.
    pub item: String,
    /// Scope name; empty if unnamed.
    pub scope: String,
    /// Hovered target name; empty if none.
    pub target: String,
    /// Names of the frozen drop candidates.
    pub areas: Rc<[String]>,
}

/// A lifecycle notification.
#[derive(Clone, Debug, PartialEq)]
pub struct DndEvent<E> {
    /// Notification type.
    pub kind: DndEventType,
    /// Element the notification is dispatched from.
    pub origin: E,
    /// Session elements.
    pub refs: Refs<E>,
    /// Session element names.
    pub keys: Keys,
    /// Input that caused the notification.
    pub input: PointerInput<E>,
}

/// Handle returned by [`Observers::observe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

type Callback<E> = Box<dyn FnMut(&DndEvent<E>)>;

struct Observer<E> {
    id: ObserverId,
    root: Option<E>,
    callback: Callback<E>,
}

/// Registered lifecycle observers.
pub struct Observers<E> {
    next: u64,
    entries: Vec<Observer<E>>,
}

impl<E: fmt::Debug> fmt::Debug for Observers<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field(
                "roots",
                &self.entries.iter().map(|o| (o.id, &o.root)).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

impl<E> Default for Observers<E> {
    fn default() -> Self {
        Self {
            next: 0,
            entries: Vec::new(),
        }
    }
}

impl<E> Observers<E> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for every notification bubbling through `root`.
    ///
    /// `None` observes at the document root.
    pub fn observe(
        &mut self,
        root: Option<E>,
        callback: impl FnMut(&DndEvent<E>) + 'static,
    ) -> ObserverId {
        let id = ObserverId(self.next);
        self.next += 1;
        self.entries.push(Observer {
            id,
            root,
            callback: Box::new(callback),
        });
        id
    }

    /// Remove an observer. Returns `false` if it was not registered.
    pub fn unobserve(&mut self, id: ObserverId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|o| o.id != id);
        self.entries.len() != before
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is observing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E: Copy + Eq> Observers<E> {
    /// Deliver `event` from `event.origin` up to the document root.
    pub fn dispatch<H: Host<Element = E>>(&mut self, host: &H, event: &DndEvent<E>) {
        if self.entries.is_empty() {
            return;
        }
        let root = host.root();
        let mut path: SmallVec<[E; 16]> = SmallVec::new();
        let mut cur = Some(event.origin);
        while let Some(el) = cur {
            path.push(el);
            cur = host.parent(el);
        }
        tracing::trace!(kind = event.kind.as_str(), depth = path.len(), "dispatch");
        for el in path {
            for observer in &mut self.entries {
                if observer.root.unwrap_or(root) == el {
                    (observer.callback)(event);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::{Document, NodeId, NodeKind};
    use alloc::vec;
    use core::cell::RefCell;
    use kurbo::{Point, Rect};

    fn event(origin: NodeId, kind: DndEventType) -> DndEvent<NodeId> {
        DndEvent {
            kind,
            origin,
            refs: Refs {
                trigger: origin,
                item: Some(origin),
                scope: None,
                target: None,
                areas: Rc::from(Vec::new()),
            },
            keys: Keys::default(),
            input: PointerInput::mouse_move(Point::ZERO),
        }
    }

    #[test]
    fn bubbles_from_origin_to_root() {
        let mut doc = Document::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let root = doc.root();
        let outer = doc.append(root, NodeKind::Actor, Rect::ZERO);
        let inner = doc.append(outer, NodeKind::Actor, Rect::ZERO);
        let sibling = doc.append(root, NodeKind::Actor, Rect::ZERO);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut observers = Observers::new();
        let roots = [
            ("root", None),
            ("outer", Some(outer)),
            ("sibling", Some(sibling)),
            ("inner", Some(inner)),
        ];
        for (tag, at) in roots {
            let seen = Rc::clone(&seen);
            observers.observe(at, move |e: &DndEvent<NodeId>| {
                seen.borrow_mut().push((tag, e.kind));
            });
        }

        observers.dispatch(&doc, &event(inner, DndEventType::Drag));
        assert_eq!(
            *seen.borrow(),
            vec![
                ("inner", DndEventType::Drag),
                ("outer", DndEventType::Drag),
                ("root", DndEventType::Drag),
            ]
        );
    }

    #[test]
    fn unobserved_callbacks_stop_receiving() {
        let doc = Document::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let count = Rc::new(RefCell::new(0));
        let mut observers = Observers::new();
        let c = Rc::clone(&count);
        let id = observers.observe(None, move |_| *c.borrow_mut() += 1);

        observers.dispatch(&doc, &event(doc.root(), DndEventType::DragStart));
        assert!(observers.unobserve(id));
        observers.dispatch(&doc, &event(doc.root(), DndEventType::DragEnd));
        assert_eq!(*count.borrow(), 1);
        assert!(observers.is_empty());
    }

    #[test]
    fn event_names() {
        assert_eq!(DndEventType::DropLeave.as_str(), "dropleave");
        assert_eq!(DndEventType::DragStart.as_str(), "dragstart");
    }
}
