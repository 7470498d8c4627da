// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Session configuration resolved from trigger attributes.
//!
//! Trigger attributes are plain strings. They are read exactly once per session
//! start by [`SessionConfig::resolve`] and coerced into typed values. Anything
//! missing or malformed falls back to the engine's [`Defaults`]; parsing never
//! fails a session.
//!
//! | Attribute | Meaning | Fallback |
//! |-----------|---------|----------|
//! | `axis`    | `x` or `y` restricts movement to that axis | unrestricted |
//! | `dist`    | movement threshold in pixels | no threshold |
//! | `dur`     | transition duration in milliseconds | [`Defaults::duration`] |
//! | `del`     | transition delay in milliseconds | [`Defaults::delay`] |
//! | `tf`      | easing keyword or `cubic-bezier(a, b, c, d)` | [`Defaults::easing`] |
//! | `zi`      | z-index of the lifted item | [`Defaults::z_index`] |
//! | `opacity` | opacity of the lifted item | [`Defaults::opacity`] |
//! | `event`   | `mouse` or `touch`; read when the trigger connects | both |

use core::fmt;
use core::str::FromStr;

use crate::host::Host;

/// Attribute names read from trigger elements.
pub mod attr {
    /// Movement axis restriction.
    pub const AXIS: &str = "axis";
    /// Movement threshold in pixels.
    pub const DIST: &str = "dist";
    /// Accepted input modality.
    pub const EVENT: &str = "event";
    /// Transition duration.
    pub const DUR: &str = "dur";
    /// Transition delay.
    pub const DEL: &str = "del";
    /// Transition timing function.
    pub const TF: &str = "tf";
    /// Lifted item z-index.
    pub const ZI: &str = "zi";
    /// Lifted item opacity.
    pub const OPACITY: &str = "opacity";
}

/// Error returned when an attribute value cannot be parsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseAttrError {
    /// What the value was expected to be.
    pub expected: &'static str,
}

impl fmt::Display for ParseAttrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid attribute value, expected {}", self.expected)
    }
}

impl core::error::Error for ParseAttrError {}

/// Axis a drag is restricted to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal movement only.
    X,
    /// Vertical movement only.
    Y,
}

impl FromStr for Axis {
    type Err = ParseAttrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "x" | "X" => Ok(Self::X),
            "y" | "Y" => Ok(Self::Y),
            _ => Err(ParseAttrError { expected: "`x` or `y`" }),
        }
    }
}

bitflags::bitflags! {
    /// Input modalities a trigger accepts.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct InputKinds: u8 {
        /// Mouse buttons.
        const MOUSE = 0b0000_0001;
        /// Touch points.
        const TOUCH = 0b0000_0010;
    }
}

impl Default for InputKinds {
    fn default() -> Self {
        Self::MOUSE | Self::TOUCH
    }
}

impl InputKinds {
    /// Interpret an `event` attribute. Anything but `mouse` or `touch` accepts both.
    pub fn from_attribute(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("mouse") => Self::MOUSE,
            Some("touch") => Self::TOUCH,
            _ => Self::default(),
        }
    }
}

/// Timing function used when the host interpolates an offset change.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    /// Constant speed.
    #[default]
    Linear,
    /// `ease`.
    Ease,
    /// `ease-in`.
    EaseIn,
    /// `ease-out`.
    EaseOut,
    /// `ease-in-out`.
    EaseInOut,
    /// Jump to the end value at the start.
    StepStart,
    /// Jump to the end value at the end.
    StepEnd,
    /// `cubic-bezier(x1, y1, x2, y2)`.
    CubicBezier([f64; 4]),
}

impl FromStr for Easing {
    type Err = ParseAttrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const EXPECTED: ParseAttrError = ParseAttrError {
            expected: "an easing keyword or cubic-bezier()",
        };
        let s = s.trim();
        let keyword = match s {
            "linear" => Some(Self::Linear),
            "ease" => Some(Self::Ease),
            "ease-in" => Some(Self::EaseIn),
            "ease-out" => Some(Self::EaseOut),
            "ease-in-out" => Some(Self::EaseInOut),
            "step-start" => Some(Self::StepStart),
            "step-end" => Some(Self::StepEnd),
            _ => None,
        };
        if let Some(easing) = keyword {
            return Ok(easing);
        }
        let args = s
            .strip_prefix("cubic-bezier(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or(EXPECTED)?;
        let mut points = [0.0; 4];
        let mut parts = args.split(',');
        for slot in &mut points {
            let part = parts.next().ok_or(EXPECTED)?;
            *slot = part.trim().parse::<f64>().map_err(|_| EXPECTED)?;
        }
        let unit = 0.0..=1.0;
        if parts.next().is_some() || !unit.contains(&points[0]) || !unit.contains(&points[2]) {
            return Err(EXPECTED);
        }
        Ok(Self::CubicBezier(points))
    }
}

/// How the host should interpolate an offset change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    /// Duration in milliseconds.
    pub duration: f64,
    /// Delay in milliseconds.
    pub delay: f64,
    /// Timing function.
    pub easing: Easing,
}

impl Transition {
    /// Apply immediately.
    pub const INSTANT: Self = Self {
        duration: 0.0,
        delay: 0.0,
        easing: Easing::Linear,
    };

    /// Returns `true` if the change takes no time.
    pub fn is_instant(&self) -> bool {
        self.duration <= 0.0 && self.delay <= 0.0
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self::INSTANT
    }
}

/// Presentation of the dragged item while a session is active.
///
/// A lifted item is raised, faded, and lets pointer hit-testing pass through
/// to whatever lies beneath it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lift {
    /// Stacking order while lifted.
    pub z_index: i32,
    /// Opacity while lifted.
    pub opacity: f64,
}

/// Engine-wide fallbacks for trigger attributes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Defaults {
    /// Transition duration in milliseconds.
    pub duration: f64,
    /// Transition delay in milliseconds.
    pub delay: f64,
    /// Transition timing function.
    pub easing: Easing,
    /// Z-index of the lifted item.
    pub z_index: i32,
    /// Opacity of the lifted item.
    pub opacity: f64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            duration: 100.0,
            delay: 0.0,
            easing: Easing::Linear,
            z_index: 1000,
            opacity: 0.5,
        }
    }
}

/// Parameters of one drag session, resolved once at session start.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionConfig {
    /// Axis restriction, if any.
    pub axis: Option<Axis>,
    /// Movement threshold in pixels; `0.0` disables it.
    pub dist: f64,
    /// Transition used for every move.
    pub transition: Transition,
    /// Presentation of the lifted item.
    pub lift: Lift,
}

impl SessionConfig {
    /// Read a trigger's attributes, falling back to `defaults`.
    pub fn resolve<H: Host>(host: &H, trigger: H::Element, defaults: &Defaults) -> Self {
        let raw = |name: &str| host.attribute(trigger, name);
        let axis = raw(attr::AXIS).and_then(|v| v.parse().ok());
        let dist = parse_or(raw(attr::DIST), attr::DIST, 0.0_f64).max(0.0);
        let duration = parse_or(raw(attr::DUR), attr::DUR, defaults.duration).max(0.0);
        let delay = parse_or(raw(attr::DEL), attr::DEL, defaults.delay).max(0.0);
        let easing = parse_or(raw(attr::TF), attr::TF, defaults.easing);
        let z_index = parse_or(raw(attr::ZI), attr::ZI, defaults.z_index);
        let opacity = parse_or(raw(attr::OPACITY), attr::OPACITY, defaults.opacity).clamp(0.0, 1.0);
        Self {
            axis,
            dist,
            transition: Transition {
                duration,
                delay,
                easing,
            },
            lift: Lift { z_index, opacity },
        }
    }
}

/// Parse an optional attribute value, logging and falling back on failure.
///
/// Non-finite floats count as malformed.
pub fn parse_or<T>(raw: Option<&str>, name: &str, fallback: T) -> T
where
    T: FromStr + Finite,
{
    let Some(raw) = raw else {
        return fallback;
    };
    match raw.trim().parse::<T>() {
        Ok(value) if value.is_finite_value() => value,
        _ => {
            tracing::debug!(attribute = name, value = raw, "malformed attribute, using default");
            fallback
        }
    }
}

/// Values that can be rejected as non-finite after parsing.
pub trait Finite {
    /// Returns `false` for NaN and infinities.
    fn is_finite_value(&self) -> bool {
        true
    }
}

impl Finite for f64 {
    fn is_finite_value(&self) -> bool {
        self.is_finite()
    }
}

impl Finite for i32 {}
impl Finite for Easing {}
