//! Error types for the line drawing core

use serde::{Deserialize, Serialize};

/// Errors raised while configuring or running a line drawing animation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum LineDrawError {
    /// Easing name is not part of the easing table
    #[error("Unknown easing: {name}")]
    UnknownEasing { name: String },

    /// Playback descriptor could not be resolved
    #[error("Invalid playback descriptor '{descriptor}': {reason}")]
    InvalidPlayback { descriptor: String, reason: String },

    /// An option carries a value outside its domain
    #[error("Invalid option '{option}': {reason}")]
    InvalidOption { option: String, reason: String },

    /// Options payload could not be deserialized
    #[error("Parse error: {reason}")]
    Parse { reason: String },

    /// The render target produced no shapes
    #[error("Render target returned no shapes")]
    EmptyMeasurement,

    /// An in-flight run was abandoned for a newer one
    #[error("Run '{previous}' preempted by '{next}'")]
    RunPreempted { previous: String, next: String },
}

impl LineDrawError {
    /// Convenience constructor for option validation failures.
    pub fn invalid_option(option: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            reason: reason.into(),
        }
    }

    /// Recoverable errors never abort a run; the caller can keep going.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::EmptyMeasurement | Self::RunPreempted { .. })
    }

    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::UnknownEasing { .. }
            | Self::InvalidPlayback { .. }
            | Self::InvalidOption { .. } => "configuration",
            Self::Parse { .. } => "serialization",
            Self::EmptyMeasurement => "measurement",
            Self::RunPreempted { .. } => "run",
        }
    }
}

impl From<serde_json::Error> for LineDrawError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            reason: err.to_string(),
        }
    }
}
