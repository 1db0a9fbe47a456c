//! Observable state and per-call events.
//!
//! `Observables` is what the presentation layer re-renders from; `Outputs`
//! carries the discrete events produced by one engine call and is cleared at
//! the start of the next.

use serde::{Deserialize, Serialize};

use crate::ids::{ClassKey, RunIdentity};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Observables {
    /// Wrapper classes: configured class name plus the active class key.
    pub class_identifier: String,
    /// Generated style text (declarative backend; empty for the frame loop).
    pub style_text: String,
    pub elapsed_ms: f64,
    pub progress_pct: u8,
}

/// Discrete signals emitted while driving a run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum DrawEvent {
    RunStarted {
        identity: RunIdentity,
        class_key: ClassKey,
        shape_count: usize,
    },
    RunPreempted {
        previous: RunIdentity,
        next: RunIdentity,
    },
    Progress {
        elapsed_ms: f64,
        progress_pct: u8,
    },
    RunCompleted {
        identity: RunIdentity,
    },
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub events: Vec<DrawEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.events.clear();
    }

    #[inline]
    pub fn push_event(&mut self, event: DrawEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Last progress report in this batch, if any.
    pub fn last_progress(&self) -> Option<(f64, u8)> {
        self.events.iter().rev().find_map(|e| match e {
            DrawEvent::Progress {
                elapsed_ms,
                progress_pct,
            } => Some((*elapsed_ms, *progress_pct)),
            _ => None,
        })
    }
}
