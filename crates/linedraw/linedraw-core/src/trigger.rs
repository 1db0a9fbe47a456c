//! Trigger resolution and the start/continue/idle decision.
//!
//! The raw `animate` value is a bool/number/string union. It is resolved once
//! into a [`Trigger`] and everything downstream works with the tagged form.

use serde::{Deserialize, Serialize};

use crate::ids::RunIdentity;

/// Request value that hides the subject instead of drawing it.
pub const HIDE_SENTINEL: &str = "hide";

/// Raw `animate` option as supplied by the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TriggerValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Default for TriggerValue {
    fn default() -> Self {
        Self::Bool(false)
    }
}

impl From<bool> for TriggerValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for TriggerValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for TriggerValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for TriggerValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Resolved trigger.
#[derive(Clone, Debug, PartialEq)]
pub enum Trigger {
    Idle,
    StartNow(RunIdentity),
    /// Numeric requests: the number is both the identity and the delay.
    StartDelayed { delay_ms: f64, identity: RunIdentity },
    Hide(RunIdentity),
}

impl Trigger {
    /// Resolve a raw value. `false`, `0`, `NaN` and `""` are idle; `true`
    /// mints a fresh identity since it carries none of its own.
    pub fn resolve(value: &TriggerValue) -> Self {
        match value {
            TriggerValue::Bool(false) => Self::Idle,
            TriggerValue::Bool(true) => Self::StartNow(RunIdentity::mint()),
            TriggerValue::Number(n) if *n == 0.0 || n.is_nan() => Self::Idle,
            TriggerValue::Number(n) => Self::StartDelayed {
                delay_ms: if n.is_finite() { n.max(0.0) } else { 0.0 },
                identity: RunIdentity::new(n.to_string()),
            },
            TriggerValue::Text(s) if s.is_empty() => Self::Idle,
            TriggerValue::Text(s) if s == HIDE_SENTINEL => Self::Hide(RunIdentity::new(s.clone())),
            TriggerValue::Text(s) => Self::StartNow(RunIdentity::new(s.clone())),
        }
    }

    pub fn identity(&self) -> Option<&RunIdentity> {
        match self {
            Self::Idle => None,
            Self::StartNow(id) | Self::Hide(id) => Some(id),
            Self::StartDelayed { identity, .. } => Some(identity),
        }
    }

    pub fn start_delay_ms(&self) -> f64 {
        match self {
            Self::StartDelayed { delay_ms, .. } => *delay_ms,
            _ => 0.0,
        }
    }

    pub fn is_hide(&self) -> bool {
        matches!(self, Self::Hide(_))
    }
}

/// Outcome of one animate request.
#[derive(Clone, Debug, PartialEq)]
pub enum Decision {
    /// Build a fresh schedule and run it; carries a non-idle trigger.
    Start(Trigger),
    /// A run with this identity is in flight; only advance it.
    Continue,
    /// Nothing to do.
    Idle,
}

/// Pure decision rule.
pub fn decide(trigger: &Trigger, current: Option<&RunIdentity>, in_flight: bool) -> Decision {
    match trigger.identity() {
        None => Decision::Idle,
        Some(id) if Some(id) == current => {
            if in_flight {
                Decision::Continue
            } else {
                Decision::Idle
            }
        }
        Some(_) => Decision::Start(trigger.clone()),
    }
}

/// Remembers the last request so idempotent re-renders never restart a run.
#[derive(Debug, Default)]
pub struct TriggerController {
    last_value: Option<TriggerValue>,
    last_trigger: Option<Trigger>,
    active: Option<RunIdentity>,
}

impl TriggerController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity of the most recently started run, if any.
    pub fn active(&self) -> Option<&RunIdentity> {
        self.active.as_ref()
    }

    /// Resolve `value`, reusing the previous resolution when the raw value is
    /// unchanged so that a repeated `true` keeps its minted identity.
    pub fn resolve(&mut self, value: &TriggerValue) -> Trigger {
        if self.last_value.as_ref() == Some(value) {
            if let Some(t) = &self.last_trigger {
                return t.clone();
            }
        }
        let trigger = Trigger::resolve(value);
        self.last_value = Some(value.clone());
        self.last_trigger = Some(trigger.clone());
        trigger
    }

    /// Decide what to do with `value`. `in_flight` reports whether the active
    /// backend is still running the current identity.
    pub fn decide(&mut self, value: &TriggerValue, in_flight: bool) -> Decision {
        let trigger = self.resolve(value);
        let decision = decide(&trigger, self.active.as_ref(), in_flight);
        match &decision {
            Decision::Start(t) => self.active = t.identity().cloned(),
            Decision::Idle if trigger.identity().is_none() => self.active = None,
            _ => {}
        }
        decision
    }

    /// Forget everything, as if freshly constructed.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
