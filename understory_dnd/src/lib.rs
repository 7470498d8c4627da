// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_dnd --heading-base-level=0

//! Understory DnD: a host-agnostic drag and drop engine.
//!
//! ## Overview
//!
//! A *trigger* is a drag handle. Pressing it starts a session that moves an
//! *item* (the trigger itself or an ancestor) by translating it, clamped so it
//! stays inside a bounding *scope*. While the pointer moves, the engine tracks
//! which *drop target* is under it. On release it reports the drop.
//!
//! The engine never owns UI elements. Everything it needs from the rendering
//! host goes through the [`Host`](host::Host) trait: tree structure,
//! attributes, bounding rectangles, the topmost element at a point, and the
//! ability to apply offsets, state markers, cursors, and lift styling.
//! [`Document`](doc::Document) is an in-memory host used for tests and headless
//! tools.
//!
//! ## Actors
//!
//! Which elements play which part is decided by a [`Resolver`](resolve::Resolver).
//! The default [`AttributeResolver`](resolve::AttributeResolver) reads markup:
//!
//! - `item`: names the item, `#` for the trigger itself.
//! - `scope`: names the scope, `#` for the document root.
//! - `target`: on actors, names a drop target; on the trigger, filters drop
//!   targets by prefix.
//!
//! Session parameters (`axis`, `dist`, `dur`, `del`, `tf`, `zi`, `opacity`) are
//! read from the trigger when a session starts; see [`config`].
//!
//! ## Lifecycle
//!
//! Observers registered with [`Engine::observe`](engine::Engine::observe)
//! receive `dragstart`, `drag`, `dropenter`, `dropleave`, `drop`, and `dragend`
//! notifications, bubbling from the element they are dispatched from. Each
//! carries a snapshot of the session's elements and names. See [`event`].
//!
//! ## Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use kurbo::{Point, Rect};
//! use understory_dnd::doc::{Document, NodeKind};
//! use understory_dnd::engine::Engine;
//! use understory_dnd::event::DndEventType;
//! use understory_dnd::input::PointerInput;
//!
//! let mut doc = Document::new(Rect::new(0.0, 0.0, 600.0, 400.0));
//! let root = doc.root();
//! let board = doc.append(root, NodeKind::Actor, Rect::new(0.0, 0.0, 600.0, 400.0));
//! doc.set_attribute(board, "scope", "board");
//! let bin = doc.append(board, NodeKind::Actor, Rect::new(500.0, 0.0, 600.0, 100.0));
//! doc.set_attribute(bin, "target", "bin");
//! let card = doc.append(board, NodeKind::Actor, Rect::new(0.0, 300.0, 50.0, 350.0));
//! doc.set_attribute(card, "item", "card");
//! let handle = doc.append(card, NodeKind::Trigger, Rect::new(0.0, 300.0, 10.0, 310.0));
//!
//! let mut engine = Engine::new();
//! engine.connect(&doc, handle);
//! let drops = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&drops);
//! engine.observe(None, move |event| {
//!     if event.kind == DndEventType::Drop {
//!         sink.borrow_mut().push(event.keys.target.clone());
//!     }
//! });
//!
//! engine.handle_input(&mut doc, &PointerInput::mouse_down(handle, Point::new(5.0, 305.0)));
//! engine.handle_input(&mut doc, &PointerInput::mouse_move(Point::new(550.0, 50.0)));
//! engine.handle_input(&mut doc, &PointerInput::mouse_up(Point::new(550.0, 50.0)));
//!
//! assert_eq!(*drops.borrow(), ["bin"]);
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards to Kurbo's `std` and enables `tracing/std`.
//! - `libm`: use Kurbo's `libm` backend for `no_std` builds.
//!
//! Diagnostics are emitted through [`tracing`] at `debug` (session start and
//! end, malformed attributes) and `trace` (listener and hover changes). The
//! crate never installs a subscriber.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod config;
pub mod doc;
pub mod engine;
pub mod event;
pub mod geometry;
pub mod hit;
pub mod host;
pub mod input;
pub mod resolve;
pub mod state;

mod session;

pub use config::{Axis, Defaults, Easing, InputKinds, Lift, SessionConfig, Transition};
pub use engine::{Engine, TriggerId, reset_item};
pub use event::{DndEvent, DndEventType, Keys, ObserverId, Refs};
pub use host::{Commit, Cursor, Host};
pub use input::{InputPhase, Modality, Outcome, PointerInput};
pub use resolve::{AttributeResolver, Resolver, Role};
pub use state::ActorState;
