// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drop-target hit testing against a frozen candidate set.
//!
//! The candidate set ([`Areas`]) is captured when a session starts and never
//! re-queried. Each move asks the host for the topmost element under the
//! pointer, walks up to the owning drop candidate via
//! [`Resolver::candidate`], and accepts it only if it is a member of the
//! frozen set. Elements added after the session started are never hit.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashSet;
use kurbo::Point;

use crate::host::Host;
use crate::resolve::Resolver;

/// The frozen set of drop candidates for one session.
///
/// Iteration follows document order; membership checks are hashed.
#[derive(Clone, Debug)]
pub struct Areas<E> {
    order: Rc<[E]>,
    members: HashSet<E>,
}

impl<E: Copy + Eq + Hash> Areas<E> {
    /// Freeze a candidate list. Duplicates keep their first position.
    pub fn new(candidates: Vec<E>) -> Self {
        let mut members = HashSet::with_capacity(candidates.len());
        let mut order = Vec::with_capacity(candidates.len());
        for el in candidates {
            if members.insert(el) {
                order.push(el);
            }
        }
        Self {
            order: order.into(),
            members,
        }
    }

    /// Returns `true` if `element` is a frozen candidate.
    pub fn contains(&self, element: &E) -> bool {
        self.members.contains(element)
    }

    /// Candidates in document order.
    pub fn as_slice(&self) -> &[E] {
        &self.order
    }

    /// Shared handle to the ordered candidates, for event snapshots.
    pub fn shared(&self) -> Rc<[E]> {
        Rc::clone(&self.order)
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if there are no candidates.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate candidates in document order.
    pub fn iter(&self) -> impl Iterator<Item = E> + '_ {
        self.order.iter().copied()
    }
}

impl<E: Copy + Eq + Hash> Default for Areas<E> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// The frozen candidate under `point`, if any.
pub fn target_at<H, R>(
    host: &H,
    resolver: &R,
    point: Point,
    areas: &Areas<H::Element>,
) -> Option<H::Element>
where
    H: Host,
    R: Resolver<H> + ?Sized,
{
    if areas.is_empty() {
        return None;
    }
    let hit = host.element_at(point)?;
    resolver
        .candidate(host, hit)
        .filter(|candidate| areas.contains(candidate))
}
