//! Easing table: the named timing curves shared by both backends.
//!
//! Each name maps to one curve. The declarative backend emits the CSS name;
//! the frame loop evaluates the curve itself.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LineDrawError;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    /// Quadratic in-out.
    #[default]
    Ease,
    /// Cubic in.
    EaseIn,
    /// Cubic out.
    EaseOut,
    /// Cubic in-out.
    EaseInOut,
    Linear,
    StepStart,
    StepEnd,
}

impl Easing {
    pub const ALL: [Easing; 7] = [
        Easing::Ease,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::Linear,
        Easing::StepStart,
        Easing::StepEnd,
    ];

    /// Name as accepted in options and emitted into CSS.
    pub fn css_name(&self) -> &'static str {
        match self {
            Self::Ease => "ease",
            Self::EaseIn => "ease-in",
            Self::EaseOut => "ease-out",
            Self::EaseInOut => "ease-in-out",
            Self::Linear => "linear",
            Self::StepStart => "step-start",
            Self::StepEnd => "step-end",
        }
    }

    /// Map normalized time `t` (clamped to [0, 1]) to eased progress.
    #[inline]
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Ease => quadratic_in_out(t),
            Self::EaseIn => t * t * t,
            Self::EaseOut => {
                let u = t - 1.0;
                u * u * u + 1.0
            }
            Self::EaseInOut => cubic_in_out(t),
            Self::Linear => t,
            Self::StepStart => {
                if t > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Self::StepEnd => {
                if t >= 1.0 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

#[inline]
fn quadratic_in_out(t: f64) -> f64 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u / 2.0
    }
}

#[inline]
fn cubic_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}

impl FromStr for Easing {
    type Err = LineDrawError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Easing::ALL
            .into_iter()
            .find(|e| e.css_name() == s)
            .ok_or_else(|| LineDrawError::UnknownEasing { name: s.to_string() })
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_name())
    }
}
