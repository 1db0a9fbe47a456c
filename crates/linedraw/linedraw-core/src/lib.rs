//! Line drawing core (host-agnostic)
//!
//! Reveals stroke-based shapes along their paths. A host supplies the shapes
//! through [`RenderTarget`] and, for the frame-loop backend, frame
//! opportunities through [`FrameScheduler`]. Timing is planned once per run
//! into a [`Schedule`] that both the declarative (CSS) and the frame-loop
//! backend execute.

pub mod config;
pub mod driver;
pub mod easing;
pub mod engine;
pub mod error;
pub mod ids;
pub mod measure;
pub mod outputs;
pub mod playback;
pub mod timeline;
pub mod timing;
pub mod trigger;

// Re-exports for hosts
pub use config::{Backend, HostCapabilities, LineDrawOptions, Setup};
pub use driver::{FrameHandle, FrameScheduler, OffsetMap, RunState, TweenDriver, TweenParams};
pub use easing::Easing;
pub use engine::LineDrawer;
pub use error::LineDrawError;
pub use ids::{ClassKey, RunIdentity};
pub use measure::{measure, trim_float, RenderTarget, ShapeData};
pub use outputs::{DrawEvent, Observables, Outputs};
pub use playback::{Direction, PlaybackSpec, Repeat};
pub use timeline::{KeyframeSequence, KeyframeState, StyleRule, TimelineDescription};
pub use timing::{plan, Schedule, ShapeTiming};
pub use trigger::{decide, Decision, Trigger, TriggerController, TriggerValue, HIDE_SENTINEL};

/// Line drawing result type
pub type Result<T> = core::result::Result<T, LineDrawError>;
