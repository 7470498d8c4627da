// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer input as seen by the engine.
//!
//! Hosts translate native mouse and touch events into [`PointerInput`] values.
//! Coordinates are in the same space as [`Host::bounding_rect`](crate::host::Host::bounding_rect)
//! (client/viewport space in a browser).
//!
//! Touch inputs carry every active touch point; the engine only ever looks at
//! the first one.

use kurbo::Point;
use smallvec::SmallVec;

use crate::config::InputKinds;

/// Input device family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Modality {
    /// Mouse or other single pointer.
    Mouse,
    /// Touch screen.
    Touch,
}

impl Modality {
    /// The [`InputKinds`] flag for this modality.
    pub const fn kind(self) -> InputKinds {
        match self {
            Self::Mouse => InputKinds::MOUSE,
            Self::Touch => InputKinds::TOUCH,
        }
    }
}

/// Where in a gesture an input sits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputPhase {
    /// `mousedown` / `touchstart`.
    Start,
    /// `mousemove` / `touchmove`.
    Move,
    /// `mouseup` / `touchend`.
    End,
    /// `touchcancel`, or a host-synthesized abort.
    Cancel,
}

/// A single pointer or touch input.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerInput<E> {
    /// Device family.
    pub modality: Modality,
    /// Gesture phase.
    pub phase: InputPhase,
    /// Element the input was delivered to, if the host knows it.
    pub origin: Option<E>,
    /// Pointer position for mouse input; active touch points for touch input.
    pub points: SmallVec<[Point; 1]>,
}

impl<E> PointerInput<E> {
    /// Build an input with a single point.
    pub fn new(modality: Modality, phase: InputPhase, origin: Option<E>, point: Point) -> Self {
        let mut points = SmallVec::new();
        points.push(point);
        Self {
            modality,
            phase,
            origin,
            points,
        }
    }

    /// `mousedown` on `origin`.
    pub fn mouse_down(origin: E, point: Point) -> Self {
        Self::new(Modality::Mouse, InputPhase::Start, Some(origin), point)
    }

    /// `mousemove`.
    pub fn mouse_move(point: Point) -> Self {
        Self::new(Modality::Mouse, InputPhase::Move, None, point)
    }

    /// `mouseup`.
    pub fn mouse_up(point: Point) -> Self {
        Self::new(Modality::Mouse, InputPhase::End, None, point)
    }

    /// `touchstart` on `origin` with the given active touches.
    pub fn touch_start(origin: E, touches: &[Point]) -> Self {
        Self::touches(InputPhase::Start, Some(origin), touches)
    }

    /// `touchmove` with the given active touches.
    pub fn touch_move(touches: &[Point]) -> Self {
        Self::touches(InputPhase::Move, None, touches)
    }

    /// `touchend`; usually no touches remain active.
    pub fn touch_end(touches: &[Point]) -> Self {
        Self::touches(InputPhase::End, None, touches)
    }

    /// `touchcancel`.
    pub fn touch_cancel() -> Self {
        Self::touches(InputPhase::Cancel, None, &[])
    }

    fn touches(phase: InputPhase, origin: Option<E>, touches: &[Point]) -> Self {
        Self {
            modality: Modality::Touch,
            phase,
            origin,
            points: touches.iter().copied().collect(),
        }
    }

    /// The tracked pointer position: the mouse position, or the first touch.
    pub fn position(&self) -> Option<Point> {
        self.points.first().copied()
    }

    /// Returns `true` for inputs that terminate a gesture.
    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, InputPhase::End | InputPhase::Cancel)
    }
}

/// What the host should do with the native event after the engine saw it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The engine did not use the input.
    Ignored,
    /// Suppress the default action (scrolling, text selection) but keep propagating.
    PreventDefault,
    /// Suppress the default action and stop propagation.
    Consume,
}

impl Outcome {
    /// Returns `true` unless the input was ignored.
    pub fn is_handled(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}
