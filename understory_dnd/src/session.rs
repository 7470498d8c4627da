// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One drag gesture, from pointer-down to release.
//!
//! A [`Session`] owns everything scoped to a single gesture: the resolved
//! actors, the frozen drop candidates, the hovered target, the bounds captured
//! at start, and `drag` notifications waiting for their offset to commit. It
//! is created by [`Session::begin`], driven by [`Session::drag`], and consumed
//! by [`Session::finish`], which always restores every actor to a neutral
//! state. A release that arrives while offset changes are still being
//! interpolated is parked by [`Session::release`] and replayed once the last
//! commit lands. The engine owns sessions and the document-level listeners that feed
//! them.

use alloc::collections::VecDeque;
use alloc::string::String;
use core::fmt::Debug;
use core::hash::Hash;
use core::iter;

use kurbo::{Point, Rect};

use crate::config::{Defaults, SessionConfig};
use crate::event::{DndEvent, DndEventType, Keys, Observers, Refs};
use crate::geometry::{self, Bounds};
use crate::hit::{self, Areas};
use crate::host::{Commit, Cursor, Host};
use crate::input::{InputPhase, Modality, Outcome, PointerInput};
use crate::resolve::{Resolver, Role};
use crate::state;

/// State of an active drag gesture.
#[derive(Debug)]
pub(crate) struct Session<E> {
    trigger: E,
    modality: Modality,
    config: SessionConfig,
    item: E,
    scope: E,
    target: Option<E>,
    areas: Areas<E>,
    keys: Keys,
    bounds: Bounds,
    scope_rect: Rect,
    origin: Point,
    last_pointer: Point,
    /// Scope cursor before the session overrode it.
    cursor: Cursor,
    /// `drag` notifications whose offset change is still being interpolated.
    pending: VecDeque<DndEvent<E>>,
    /// Release input parked until `pending` drains.
    release: Option<PointerInput<E>>,
}

impl<E: Copy + Eq + Hash + Debug> Session<E> {
    /// Start a session for `trigger`, or `None` if the input has no position
    /// or the item cannot be resolved.
    ///
    /// Captures geometry, marks actors, lifts the item, and emits `dragstart`.
    pub(crate) fn begin<H, R>(
        host: &mut H,
        resolver: &R,
        defaults: &Defaults,
        trigger: E,
        input: &PointerInput<E>,
        observers: &mut Observers<E>,
    ) -> Option<Self>
    where
        H: Host<Element = E>,
        R: Resolver<H> + ?Sized,
    {
        let origin = input.position()?;
        let item = resolver.item(host, trigger)?;
        let config = SessionConfig::resolve(host, trigger, defaults);
        let scope = resolver.scope(host, trigger);
        let areas = Areas::new(resolver.targets(host, trigger, scope));
        let keys = Keys {
            item: resolver.key(host, item, Role::Item),
            scope: resolver.key(host, scope, Role::Scope),
            target: String::new(),
            areas: areas
                .iter()
                .map(|area| resolver.key(host, area, Role::Target))
                .collect(),
        };

        let cursor = host.cursor(scope);
        host.set_cursor(scope, Cursor::Grabbing);
        let scope_rect = host.bounding_rect(scope);
        let bounds = Bounds::new(scope_rect, host.bounding_rect(item), host.offset(item), origin);

        state::mark_active(host, [Some(item)]);
        state::mark_passive(host, iter::once(scope).chain(areas.iter()).map(Some));
        host.set_lift(item, Some(config.lift));

        let session = Self {
            trigger,
            modality: input.modality,
            config,
            item,
            scope,
            target: None,
            areas,
            keys,
            bounds,
            scope_rect,
            origin,
            last_pointer: origin,
            cursor,
            pending: VecDeque::new(),
            release: None,
        };
        tracing::debug!(
            ?trigger,
            ?item,
            ?scope,
            targets = session.areas.len(),
            modality = ?session.modality,
            "drag session started"
        );
        session.emit(host, observers, DndEventType::DragStart, Some(item), input);
        Some(session)
    }

    /// Handle a document-level move.
    pub(crate) fn drag<H, R>(
        &mut self,
        host: &mut H,
        resolver: &R,
        input: &PointerInput<E>,
        observers: &mut Observers<E>,
    ) -> Outcome
    where
        H: Host<Element = E>,
        R: Resolver<H> + ?Sized,
    {
        let Some(pointer) = input.position() else {
            tracing::trace!("move without a pointer position");
            return Outcome::Ignored;
        };
        self.last_pointer = pointer;
        if !geometry::exceeds_threshold(self.origin, pointer, self.config.dist) {
            tracing::trace!(dist = self.config.dist, "move within threshold");
            return Outcome::PreventDefault;
        }

        let next = hit::target_at(host, resolver, pointer, &self.areas);
        if next != self.target {
            self.retarget(host, resolver, next, input, observers);
        }

        let offset = self.bounds.resolve(pointer, self.config.axis);
        if geometry::contains_inclusive(self.scope_rect, pointer) {
            state::mark_passive(host, [Some(self.scope)]);
        } else {
            state::mark_active(host, [Some(self.scope)]);
        }

        let drag = self.snapshot(DndEventType::Drag, self.item, input);
        match host.apply_offset(self.item, offset, &self.config.transition) {
            Commit::Done => observers.dispatch(host, &drag),
            Commit::Pending => self.pending.push_back(drag),
        }
        Outcome::PreventDefault
    }

    fn retarget<H, R>(
        &mut self,
        host: &mut H,
        resolver: &R,
        next: Option<E>,
        input: &PointerInput<E>,
        observers: &mut Observers<E>,
    ) where
        H: Host<Element = E>,
        R: Resolver<H> + ?Sized,
    {
        let previous = self.target;
        state::mark_passive(host, [previous]);
        self.emit(host, observers, DndEventType::DropLeave, previous, input);

        state::mark_active(host, [next]);
        self.target = next;
        self.keys.target = next
            .map(|target| resolver.key(host, target, Role::Target))
            .unwrap_or_default();
        tracing::trace!(?previous, ?next, "hovered target changed");
        self.emit(host, observers, DndEventType::DropEnter, next, input);
    }

    /// Emit the oldest held-back `drag` notification.
    ///
    /// Returns `false` if nothing was waiting. Once the queue drains after a
    /// parked release, [`Session::settled_release`] yields that release.
    pub(crate) fn commit_finished<H>(&mut self, host: &H, observers: &mut Observers<E>) -> bool
    where
        H: Host<Element = E>,
    {
        match self.pending.pop_front() {
            Some(drag) => {
                observers.dispatch(host, &drag);
                true
            }
            None => false,
        }
    }

    /// Handle a release or cancel input.
    ///
    /// Returns `true` if the session can [`finish`](Self::finish) now. With
    /// `drag` notifications still waiting for their commit, the input is
    /// parked instead and the markers stay in place.
    pub(crate) fn release(&mut self, input: &PointerInput<E>) -> bool {
        if self.pending.is_empty() {
            return true;
        }
        tracing::trace!(
            trigger = ?self.trigger,
            waiting = self.pending.len(),
            "release parked until commits land"
        );
        self.release = Some(input.clone());
        false
    }

    /// The parked release, once no commit is outstanding.
    pub(crate) fn settled_release(&mut self) -> Option<PointerInput<E>> {
        if self.pending.is_empty() {
            self.release.take()
        } else {
            None
        }
    }

    /// The parked release, if any.
    pub(crate) fn parked_release(&self) -> Option<&PointerInput<E>> {
        self.release.as_ref()
    }

    /// Returns `true` while a `drag` notification waits for its commit.
    pub(crate) fn is_waiting(&self) -> bool {
        !self.pending.is_empty()
    }

    /// End the session.
    ///
    /// Normally reached once no commit is outstanding. When forced early (the
    /// trigger was disconnected) held-back `drag` notifications are emitted
    /// first so they never follow `dragend`. Then restores the scope cursor,
    /// emits `drop`/`dropleave` over a hovered target and then `dragend`, and
    /// clears every marker the session set.
    pub(crate) fn finish<H>(
        mut self,
        host: &mut H,
        input: &PointerInput<E>,
        observers: &mut Observers<E>,
    ) where
        H: Host<Element = E>,
    {
        for drag in self.pending.drain(..) {
            observers.dispatch(host, &drag);
        }
        host.set_cursor(self.scope, self.cursor);
        if let Some(target) = self.target {
            self.emit(host, observers, DndEventType::Drop, Some(target), input);
            self.emit(host, observers, DndEventType::DropLeave, Some(target), input);
        }
        self.emit(host, observers, DndEventType::DragEnd, Some(self.item), input);
        host.set_lift(self.item, None);
        state::clear_state(
            host,
            [self.scope, self.item]
                .into_iter()
                .chain(self.areas.iter())
                .map(Some),
        );
        tracing::debug!(
            trigger = ?self.trigger,
            dropped_on = ?self.target,
            cancelled = input.phase == InputPhase::Cancel,
            "drag session ended"
        );
    }

    /// A cancel input at the last known pointer position.
    pub(crate) fn cancel_input(&self) -> PointerInput<E> {
        PointerInput::new(self.modality, InputPhase::Cancel, None, self.last_pointer)
    }

    pub(crate) fn modality(&self) -> Modality {
        self.modality
    }

    pub(crate) fn item(&self) -> E {
        self.item
    }

    fn snapshot(&self, kind: DndEventType, origin: E, input: &PointerInput<E>) -> DndEvent<E> {
        DndEvent {
            kind,
            origin,
            refs: Refs {
                trigger: self.trigger,
                item: Some(self.item),
                scope: Some(self.scope),
                target: self.target,
                areas: self.areas.shared(),
            },
            keys: self.keys.clone(),
            input: input.clone(),
        }
    }

    fn emit<H>(
        &self,
        host: &H,
        observers: &mut Observers<E>,
        kind: DndEventType,
        origin: Option<E>,
        input: &PointerInput<E>,
    ) where
        H: Host<Element = E>,
    {
        if let Some(origin) = origin {
            observers.dispatch(host, &self.snapshot(kind, origin, input));
        }
    }
}
