// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolve a trigger's item, scope, and drop targets.
//!
//! The engine asks a [`Resolver`] for the actors participating in a session.
//! [`AttributeResolver`] implements the markup conventions:
//!
//! - **item**: the trigger's `item` attribute names the item. `#` means the
//!   trigger itself; otherwise the closest ancestor actor with a matching
//!   `item` attribute (any `item` attribute when the name is empty or absent).
//!   Falls back to the trigger itself.
//! - **scope**: the trigger's `scope` attribute names the scope. `#` means the
//!   document root; otherwise the closest ancestor actor with a matching
//!   `scope` attribute. Falls back to the document root.
//! - **targets**: every actor under the scope with a `target` attribute,
//!   restricted to values starting with the trigger's own `target` attribute
//!   when that is non-empty.
//!
//! ```
//! use kurbo::Rect;
//! use understory_dnd::doc::{Document, NodeKind};
//! use understory_dnd::resolve::{AttributeResolver, Resolver};
//!
//! let mut doc = Document::new(Rect::new(0.0, 0.0, 400.0, 400.0));
//! let root = doc.root();
//! let scope = doc.append(root, NodeKind::Actor, Rect::new(0.0, 0.0, 400.0, 200.0));
//! doc.set_attribute(scope, "scope", "local");
//! for name in ["group-1", "group-2", "other-1"] {
//!     let t = doc.append(scope, NodeKind::Actor, Rect::new(0.0, 0.0, 10.0, 10.0));
//!     doc.set_attribute(t, "target", name);
//! }
//! let item = doc.append(scope, NodeKind::Actor, Rect::new(0.0, 0.0, 10.0, 10.0));
//! doc.set_attribute(item, "item", "1");
//! let trigger = doc.append(item, NodeKind::Trigger, Rect::new(0.0, 0.0, 5.0, 5.0));
//! doc.set_attribute(trigger, "scope", "local");
//! doc.set_attribute(trigger, "target", "group");
//!
//! let resolver = AttributeResolver;
//! assert_eq!(resolver.item(&doc, trigger), Some(item));
//! assert_eq!(resolver.scope(&doc, trigger), scope);
//! assert_eq!(resolver.targets(&doc, trigger, scope).len(), 2);
//! ```

use alloc::string::String;
use alloc::vec::Vec;

use crate::host::Host;

/// Sentinel attribute value: "the trigger itself" for items, "the document root" for scopes.
pub const SELF_SENTINEL: &str = "#";

/// Part an actor plays in a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// The dragged element.
    Item,
    /// The bounding container.
    Scope,
    /// A drop candidate.
    Target,
}

impl Role {
    /// Attribute that names an actor in this role.
    pub const fn attribute(self) -> &'static str {
        match self {
            Self::Item => "item",
            Self::Scope => "scope",
            Self::Target => "target",
        }
    }
}

/// Source of the actors participating in a session.
pub trait Resolver<H: Host> {
    /// The item moved by `trigger`; `None` if it cannot be resolved.
    fn item(&self, host: &H, trigger: H::Element) -> Option<H::Element>;

    /// The container bounding `trigger`'s item.
    fn scope(&self, host: &H, trigger: H::Element) -> H::Element;

    /// Drop candidates for `trigger` under `scope`, in document order.
    fn targets(&self, host: &H, trigger: H::Element, scope: H::Element) -> Vec<H::Element>;

    /// The drop candidate owning a hit element, if any.
    fn candidate(&self, host: &H, hit: H::Element) -> Option<H::Element>;

    /// String identifier of `element` in `role`, for observers.
    ///
    /// For [`AttributeResolver`] this is the value of the role's attribute.
    /// Targets are keyed by their `target` attribute, not by a separate
    /// `name`, so `keys.target` always matches one of `keys.areas`. Markup
    /// that named hovered targets with `name` must carry the key in `target`.
    fn key(&self, host: &H, element: H::Element, role: Role) -> String;
}

/// Resolver driven by `item` / `scope` / `target` attributes.
#[derive(Clone, Copy, Debug, Default)]
pub struct AttributeResolver;

impl AttributeResolver {
    /// Closest strict ancestor actor of `from` carrying `attr`, matching `name` when non-empty.
    fn closest_ancestor<H: Host>(
        host: &H,
        from: H::Element,
        attr: &str,
        name: &str,
    ) -> Option<H::Element> {
        let mut cur = host.parent(from);
        while let Some(el) = cur {
            if host.is_actor(el) {
                if let Some(value) = host.attribute(el, attr) {
                    if name.is_empty() || value == name {
                        return Some(el);
                    }
                }
            }
            cur = host.parent(el);
        }
        None
    }
}

impl<H: Host> Resolver<H> for AttributeResolver {
    fn item(&self, host: &H, trigger: H::Element) -> Option<H::Element> {
        if !host.is_connected(trigger) {
            return None;
        }
        let name = host.attribute(trigger, Role::Item.attribute()).unwrap_or("");
        if name == SELF_SENTINEL {
            return Some(trigger);
        }
        Some(Self::closest_ancestor(host, trigger, Role::Item.attribute(), name).unwrap_or(trigger))
    }

    fn scope(&self, host: &H, trigger: H::Element) -> H::Element {
        let name = host.attribute(trigger, Role::Scope.attribute()).unwrap_or("");
        if name == SELF_SENTINEL {
            return host.root();
        }
        Self::closest_ancestor(host, trigger, Role::Scope.attribute(), name)
            .unwrap_or_else(|| host.root())
    }

    fn targets(&self, host: &H, trigger: H::Element, scope: H::Element) -> Vec<H::Element> {
        let prefix = host.attribute(trigger, Role::Target.attribute()).unwrap_or("");
        let mut all = Vec::new();
        host.descendants(scope, &mut all);
        all.retain(|&el| {
            host.is_actor(el)
                && host
                    .attribute(el, Role::Target.attribute())
                    .is_some_and(|value| value.starts_with(prefix))
        });
        all
    }

    fn candidate(&self, host: &H, hit: H::Element) -> Option<H::Element> {
        let mut cur = Some(hit);
        while let Some(el) = cur {
            if host.is_actor(el) && host.attribute(el, Role::Target.attribute()).is_some() {
                return Some(el);
            }
            cur = host.parent(el);
        }
        None
    }

    fn key(&self, host: &H, element: H::Element, role: Role) -> String {
        host.attribute(element, role.attribute())
            .map(String::from)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::{Document, NodeId, NodeKind};
    use kurbo::Rect;

    fn rect() -> Rect {
        Rect::new(0.0, 0.0, 10.0, 10.0)
    }

    struct Fixture {
        doc: Document,
        scope: NodeId,
        item: NodeId,
        trigger: NodeId,
        targets: [NodeId; 3],
    }

    fn fixture() -> Fixture {
        let mut doc = Document::new(Rect::new(0.0, 0.0, 400.0, 400.0));
        let root = doc.root();
        let scope = doc.append(root, NodeKind::Actor, rect());
        doc.set_attribute(scope, "scope", "local");
        let wrapper = doc.append(scope, NodeKind::Plain, rect());
        let targets = ["group-1", "group-2", "3"].map(|name| {
            let t = doc.append(wrapper, NodeKind::Actor, rect());
            doc.set_attribute(t, "target", name);
            t
        });
        let item = doc.append(scope, NodeKind::Actor, rect());
        doc.set_attribute(item, "item", "1");
        let trigger = doc.append(item, NodeKind::Trigger, rect());
        Fixture {
            doc,
            scope,
            item,
            trigger,
            targets,
        }
    }

    #[test]
    fn item_defaults_to_closest_item_actor() {
        let f = fixture();
        assert_eq!(AttributeResolver.item(&f.doc, f.trigger), Some(f.item));
    }

    #[test]
    fn item_sentinel_and_unknown_name_fall_back_to_trigger() {
        let mut f = fixture();
        f.doc.set_attribute(f.trigger, "item", "#");
        assert_eq!(AttributeResolver.item(&f.doc, f.trigger), Some(f.trigger));
        f.doc.set_attribute(f.trigger, "item", "missing");
        assert_eq!(AttributeResolver.item(&f.doc, f.trigger), Some(f.trigger));
    }

    #[test]
    fn detached_trigger_has_no_item() {
        let mut f = fixture();
        f.doc.detach(f.item);
        assert_eq!(AttributeResolver.item(&f.doc, f.trigger), None);
    }

    #[test]
    fn scope_resolution() {
        let mut f = fixture();
        assert_eq!(AttributeResolver.scope(&f.doc, f.trigger), f.scope);
        f.doc.set_attribute(f.trigger, "scope", "#");
        assert_eq!(AttributeResolver.scope(&f.doc, f.trigger), f.doc.root());
        f.doc.set_attribute(f.trigger, "scope", "local");
        assert_eq!(AttributeResolver.scope(&f.doc, f.trigger), f.scope);
        f.doc.set_attribute(f.trigger, "scope", "elsewhere");
        assert_eq!(AttributeResolver.scope(&f.doc, f.trigger), f.doc.root());
    }

    #[test]
    fn targets_filter_by_prefix() {
        let mut f = fixture();
        let all = AttributeResolver.targets(&f.doc, f.trigger, f.scope);
        assert_eq!(all, f.targets.to_vec());
        f.doc.set_attribute(f.trigger, "target", "group");
        let grouped = AttributeResolver.targets(&f.doc, f.trigger, f.scope);
        assert_eq!(grouped, f.targets[..2].to_vec());
    }

    #[test]
    fn trigger_attributes_are_not_actor_attributes() {
        let mut f = fixture();
        // The trigger carries `target` as a filter, not as a candidate name.
        f.doc.set_attribute(f.trigger, "target", "");
        let all = AttributeResolver.targets(&f.doc, f.trigger, f.scope);
        assert!(!all.contains(&f.trigger));
    }

    #[test]
    fn candidate_walks_up_to_target_actor() {
        let mut f = fixture();
        let inner = f.doc.append(f.targets[0], NodeKind::Plain, rect());
        assert_eq!(AttributeResolver.candidate(&f.doc, inner), Some(f.targets[0]));
        assert_eq!(AttributeResolver.candidate(&f.doc, f.item), None);
    }

    #[test]
    fn keys_read_role_attribute() {
        let f = fixture();
        assert_eq!(AttributeResolver.key(&f.doc, f.item, Role::Item), "1");
        assert_eq!(AttributeResolver.key(&f.doc, f.scope, Role::Scope), "local");
        assert_eq!(AttributeResolver.key(&f.doc, f.targets[2], Role::Target), "3");
        assert_eq!(AttributeResolver.key(&f.doc, f.item, Role::Target), "");
    }

    #[test]
    fn target_key_ignores_name_attribute() {
        let mut f = fixture();
        f.doc.set_attribute(f.targets[2], "name", "third");
        assert_eq!(AttributeResolver.key(&f.doc, f.targets[2], Role::Target), "3");
    }
}
