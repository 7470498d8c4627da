// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The engine: trigger registry, document-level listeners, and observers.
//!
//! [`Engine`] is the single owner of drag sessions. Hosts register trigger
//! elements with [`Engine::connect`] and forward native input:
//!
//! - Start inputs go to [`Engine::start`] (from a trigger-level listener) or
//!   [`Engine::handle_input`], which routes them to the innermost connected
//!   trigger containing the input's origin.
//! - Move, end, and cancel inputs go to [`Engine::handle_input`]. They only
//!   reach sessions through document-level listeners, which exist exactly while
//!   a session of that modality is active. With no active session, document
//!   input is ignored without touching any trigger.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Rect};
//! use understory_dnd::doc::{Document, NodeKind};
//! use understory_dnd::engine::Engine;
//! use understory_dnd::input::PointerInput;
//!
//! let mut doc = Document::new(Rect::new(0.0, 0.0, 400.0, 400.0));
//! let root = doc.root();
//! let item = doc.append(root, NodeKind::Actor, Rect::new(0.0, 0.0, 40.0, 40.0));
//! doc.set_attribute(item, "item", "card");
//! let handle = doc.append(item, NodeKind::Trigger, Rect::new(0.0, 0.0, 10.0, 10.0));
//! doc.set_attribute(handle, "dur", "0");
//!
//! let mut engine = Engine::new();
//! let trigger = engine.connect(&doc, handle);
//!
//! engine.handle_input(&mut doc, &PointerInput::mouse_down(handle, Point::new(5.0, 5.0)));
//! engine.handle_input(&mut doc, &PointerInput::mouse_move(Point::new(55.0, 25.0)));
//! engine.handle_input(&mut doc, &PointerInput::mouse_up(Point::new(55.0, 25.0)));
//!
//! assert_eq!(engine.offset(&doc, trigger), Some(kurbo::Vec2::new(50.0, 20.0)));
//! engine.reset(&mut doc, trigger);
//! assert_eq!(engine.offset(&doc, trigger), Some(kurbo::Vec2::ZERO));
//! ```

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashMap;
use kurbo::Vec2;
use smallvec::SmallVec;

use crate::config::{Defaults, InputKinds, Transition, attr};
use crate::event::{DndEvent, ObserverId, Observers};
use crate::host::{Commit, Host};
use crate::input::{InputPhase, Modality, Outcome, PointerInput};
use crate::resolve::{AttributeResolver, Resolver};
use crate::session::Session;

/// Handle of a connected trigger.
///
/// Handles are never reused within one engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriggerId(u64);

#[derive(Debug)]
struct TriggerSlot<E> {
    element: E,
    accepts: InputKinds,
    session: Option<Session<E>>,
}

/// Document-level move/end listeners, one per active session.
#[derive(Debug, Default)]
struct Listeners {
    entries: SmallVec<[(Modality, TriggerId); 2]>,
}

impl Listeners {
    fn install(&mut self, modality: Modality, id: TriggerId) {
        debug_assert!(
            !self.entries.contains(&(modality, id)),
            "listeners installed twice for one session"
        );
        self.entries.push((modality, id));
        tracing::trace!(?modality, ?id, "document listeners installed");
    }

    fn remove(&mut self, modality: Modality, id: TriggerId) -> bool {
        let Some(pos) = self.entries.iter().position(|&e| e == (modality, id)) else {
            return false;
        };
        self.entries.remove(pos);
        tracing::trace!(?modality, ?id, "document listeners removed");
        true
    }

    fn for_modality(&self, modality: Modality) -> SmallVec<[TriggerId; 2]> {
        self.entries
            .iter()
            .filter(|(m, _)| *m == modality)
            .map(|&(_, id)| id)
            .collect()
    }

    fn is_listening(&self, modality: Modality) -> bool {
        self.entries.iter().any(|(m, _)| *m == modality)
    }
}

/// Drag and drop engine over host elements `E`.
#[derive(Debug)]
pub struct Engine<E, R = AttributeResolver> {
    resolver: R,
    defaults: Defaults,
    triggers: HashMap<TriggerId, TriggerSlot<E>>,
    by_element: HashMap<E, TriggerId>,
    next_trigger: u64,
    listeners: Listeners,
    observers: Observers<E>,
}

impl<E: Copy + Eq + Hash + Debug> Default for Engine<E, AttributeResolver> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Copy + Eq + Hash + Debug> Engine<E, AttributeResolver> {
    /// Create an engine with attribute-driven resolution and default settings.
    pub fn new() -> Self {
        Self::with_resolver(AttributeResolver, Defaults::default())
    }

    /// Create an engine with attribute-driven resolution and custom defaults.
    pub fn with_defaults(defaults: Defaults) -> Self {
        Self::with_resolver(AttributeResolver, defaults)
    }
}

impl<E: Copy + Eq + Hash + Debug, R> Engine<E, R> {
    /// Create an engine with a custom resolver.
    pub fn with_resolver(resolver: R, defaults: Defaults) -> Self {
        Self {
            resolver,
            defaults,
            triggers: HashMap::new(),
            by_element: HashMap::new(),
            next_trigger: 0,
            listeners: Listeners::default(),
            observers: Observers::new(),
        }
    }

    /// Attribute fallbacks.
    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    /// The resolver in use.
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Register `callback` for every notification bubbling through `root`
    /// (the document root when `None`).
    pub fn observe(
        &mut self,
        root: Option<E>,
        callback: impl FnMut(&DndEvent<E>) + 'static,
    ) -> ObserverId {
        self.observers.observe(root, callback)
    }

    /// Remove an observer. Returns `false` if it was not registered.
    pub fn unobserve(&mut self, id: ObserverId) -> bool {
        self.observers.unobserve(id)
    }

    /// Register a trigger element.
    ///
    /// The accepted input modalities are read from its `event` attribute now
    /// and kept until it is disconnected. Connecting an element twice returns
    /// the existing handle.
    pub fn connect<H: Host<Element = E>>(&mut self, host: &H, element: E) -> TriggerId {
        if let Some(&id) = self.by_element.get(&element) {
            return id;
        }
        let id = TriggerId(self.next_trigger);
        self.next_trigger += 1;
        let accepts = InputKinds::from_attribute(host.attribute(element, attr::EVENT));
        self.triggers.insert(
            id,
            TriggerSlot {
                element,
                accepts,
                session: None,
            },
        );
        self.by_element.insert(element, id);
        tracing::trace!(?id, ?element, ?accepts, "trigger connected");
        id
    }

    /// Unregister a trigger.
    ///
    /// An active session is ended as if cancelled at the last pointer
    /// position, so observers still see `dragend`. Returns `false` for an
    /// unknown handle.
    pub fn disconnect<H: Host<Element = E>>(&mut self, host: &mut H, id: TriggerId) -> bool {
        let Some(slot) = self.triggers.remove(&id) else {
            return false;
        };
        self.by_element.remove(&slot.element);
        if let Some(session) = slot.session {
            let end = session
                .parked_release()
                .cloned()
                .unwrap_or_else(|| session.cancel_input());
            let modality = session.modality();
            session.finish(host, &end, &mut self.observers);
            self.listeners.remove(modality, id);
        }
        tracing::trace!(?id, "trigger disconnected");
        true
    }

    /// Handle of the trigger registered for `element`.
    pub fn trigger_for(&self, element: E) -> Option<TriggerId> {
        self.by_element.get(&element).copied()
    }

    /// Element registered as trigger `id`.
    pub fn trigger_element(&self, id: TriggerId) -> Option<E> {
        self.triggers.get(&id).map(|slot| slot.element)
    }

    /// Returns `true` while trigger `id` has an active session.
    ///
    /// A released session stays active until its outstanding offset commits
    /// land.
    pub fn is_dragging(&self, id: TriggerId) -> bool {
        self.triggers
            .get(&id)
            .is_some_and(|slot| slot.session.is_some())
    }

    /// Returns `true` while document-level listeners for `modality` exist.
    pub fn is_listening(&self, modality: Modality) -> bool {
        self.listeners.is_listening(modality)
    }

    /// Start a session on trigger `id` (the trigger-level pointer-down listener).
    ///
    /// Ignored unless the input is a start input of an accepted modality whose
    /// origin lies within the trigger, the trigger is idle, and the item
    /// resolves.
    pub fn start<H>(&mut self, host: &mut H, id: TriggerId, input: &PointerInput<E>) -> Outcome
    where
        H: Host<Element = E>,
        R: Resolver<H>,
    {
        if input.phase != InputPhase::Start {
            return Outcome::Ignored;
        }
        let Some(slot) = self.triggers.get_mut(&id) else {
            tracing::trace!(?id, "start on unknown trigger");
            return Outcome::Ignored;
        };
        if slot.session.is_some() || !slot.accepts.contains(input.modality.kind()) {
            return Outcome::Ignored;
        }
        let Some(origin) = input.origin else {
            return Outcome::Ignored;
        };
        if !host.contains(slot.element, origin) {
            return Outcome::Ignored;
        }
        let Some(session) = Session::begin(
            host,
            &self.resolver,
            &self.defaults,
            slot.element,
            input,
            &mut self.observers,
        ) else {
            tracing::trace!(?id, "start ignored, item unresolved");
            return Outcome::Ignored;
        };
        slot.session = Some(session);
        self.listeners.install(input.modality, id);
        Outcome::Consume
    }

    /// Feed a native input.
    ///
    /// Start inputs bubble from their origin to the innermost trigger that
    /// accepts them. Other inputs are delivered through the document-level
    /// listeners of their modality.
    pub fn handle_input<H>(&mut self, host: &mut H, input: &PointerInput<E>) -> Outcome
    where
        H: Host<Element = E>,
        R: Resolver<H>,
    {
        match input.phase {
            InputPhase::Start => {
                let mut cur = input.origin;
                while let Some(el) = cur {
                    if let Some(id) = self.trigger_for(el) {
                        let outcome = self.start(host, id, input);
                        if outcome.is_handled() {
                            return outcome;
                        }
                    }
                    cur = host.parent(el);
                }
                Outcome::Ignored
            }
            InputPhase::Move => self.document_move(host, input),
            InputPhase::End | InputPhase::Cancel => self.document_end(host, input),
        }
    }

    fn document_move<H>(&mut self, host: &mut H, input: &PointerInput<E>) -> Outcome
    where
        H: Host<Element = E>,
        R: Resolver<H>,
    {
        let mut outcome = Outcome::Ignored;
        for id in self.listeners.for_modality(input.modality) {
            let Some(session) = self.triggers.get_mut(&id).and_then(|s| s.session.as_mut()) else {
                continue;
            };
            let result = session.drag(host, &self.resolver, input, &mut self.observers);
            if result.is_handled() {
                outcome = result;
            }
        }
        outcome
    }

    fn document_end<H>(&mut self, host: &mut H, input: &PointerInput<E>) -> Outcome
    where
        H: Host<Element = E>,
    {
        let mut outcome = Outcome::Ignored;
        for id in self.listeners.for_modality(input.modality) {
            let Some(slot) = self.triggers.get_mut(&id) else {
                continue;
            };
            let Some(session) = slot.session.as_mut() else {
                continue;
            };
            self.listeners.remove(session.modality(), id);
            outcome = Outcome::Consume;
            if !session.release(input) {
                continue;
            }
            if let Some(session) = slot.session.take() {
                session.finish(host, input, &mut self.observers);
            }
        }
        outcome
    }

    /// Report that the host finished interpolating an offset change on `item`.
    ///
    /// Emits the oldest held-back `drag` notification for that item. If the
    /// session was already released and this was its last outstanding
    /// commit, the end sequence (`drop`/`dropleave`, `dragend`, unlift,
    /// marker cleanup) runs now. Returns `false` if no session was waiting on
    /// `item`.
    pub fn transition_finished<H: Host<Element = E>>(&mut self, host: &mut H, item: E) -> bool {
        let Some(slot) = self.triggers.values_mut().find(|slot| {
            slot.session
                .as_ref()
                .is_some_and(|session| session.item() == item && session.is_waiting())
        }) else {
            return false;
        };
        let Some(session) = slot.session.as_mut() else {
            return false;
        };
        if !session.commit_finished(host, &mut self.observers) {
            return false;
        }
        let Some(release) = session.settled_release() else {
            return true;
        };
        if let Some(session) = slot.session.take() {
            session.finish(host, &release, &mut self.observers);
        }
        true
    }

    /// Zero the offset of trigger `id`'s item immediately.
    ///
    /// Works with or without an active session and is idempotent. Returns
    /// `None` for an unknown trigger or an unresolvable item.
    pub fn reset<H>(&self, host: &mut H, id: TriggerId) -> Option<Commit>
    where
        H: Host<Element = E>,
        R: Resolver<H>,
    {
        self.reset_with(host, id, &Transition::INSTANT)
    }

    /// Zero the offset of trigger `id`'s item with the given transition.
    pub fn reset_with<H>(
        &self,
        host: &mut H,
        id: TriggerId,
        transition: &Transition,
    ) -> Option<Commit>
    where
        H: Host<Element = E>,
        R: Resolver<H>,
    {
        let item = self.item(host, id)?;
        Some(reset_item(host, item, transition))
    }

    /// The item trigger `id` moves.
    pub fn item<H>(&self, host: &H, id: TriggerId) -> Option<E>
    where
        H: Host<Element = E>,
        R: Resolver<H>,
    {
        let slot = self.triggers.get(&id)?;
        self.resolver.item(host, slot.element)
    }

    /// The scope bounding trigger `id`'s item.
    pub fn scope<H>(&self, host: &H, id: TriggerId) -> Option<E>
    where
        H: Host<Element = E>,
        R: Resolver<H>,
    {
        let slot = self.triggers.get(&id)?;
        Some(self.resolver.scope(host, slot.element))
    }

    /// Drop candidates of trigger `id`, as a session would freeze them now.
    pub fn targets<H>(&self, host: &H, id: TriggerId) -> Vec<E>
    where
        H: Host<Element = E>,
        R: Resolver<H>,
    {
        let Some(slot) = self.triggers.get(&id) else {
            return Vec::new();
        };
        let scope = self.resolver.scope(host, slot.element);
        self.resolver.targets(host, slot.element, scope)
    }

    /// Committed offset of trigger `id`'s item.
    pub fn offset<H>(&self, host: &H, id: TriggerId) -> Option<Vec2>
    where
        H: Host<Element = E>,
        R: Resolver<H>,
    {
        self.item(host, id).map(|item| host.offset(item))
    }
}

/// Zero the committed offset of `item`.
pub fn reset_item<H: Host>(host: &mut H, item: H::Element, transition: &Transition) -> Commit {
    host.apply_offset(item, Vec2::ZERO, transition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::{Document, NodeKind};
    use kurbo::Rect;

    #[test]
    fn trigger_ids_keep_counting_past_u32() {
        let mut doc = Document::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let root = doc.root();
        let a = doc.append(root, NodeKind::Trigger, Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = doc.append(root, NodeKind::Trigger, Rect::new(20.0, 0.0, 30.0, 10.0));

        let mut engine = Engine::new();
        engine.next_trigger = u64::from(u32::MAX);
        let first = engine.connect(&doc, a);
        let second = engine.connect(&doc, b);
        assert_ne!(first, second);
        assert_eq!(engine.trigger_element(first), Some(a));
        assert_eq!(engine.trigger_element(second), Some(b));
    }
}
