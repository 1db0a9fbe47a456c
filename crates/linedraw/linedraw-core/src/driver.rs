//! Frame-loop tween driver.
//!
//! `Idle -> Running -> Idle`. Each shape is an independent sub-tween phased
//! by its own start delay; all of them share the run clock. The driver owns
//! the offset map of the active run and nothing else writes to it.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::ids::RunIdentity;
use crate::measure::RenderTarget;
use crate::outputs::{DrawEvent, Outputs};
use crate::playback::PlaybackSpec;
use crate::timeline::FADE_START_OPACITY;
use crate::timing::{Schedule, ShapeTiming};

/// Minimum spacing between applied frames (60 updates per second).
pub const FRAME_INTERVAL_MS: f64 = 1000.0 / 60.0;
/// Frames arriving this close to the interval still count as on time.
const FRAME_TOLERANCE_MS: f64 = 1.0;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct FrameHandle(pub u64);

/// Host frame-opportunity primitive plus its clock.
///
/// `request_frame` asks for one call to the driver's `on_frame` no earlier
/// than `delay_ms` from now. Cancelling a handle that already fired must be
/// a no-op.
pub trait FrameScheduler {
    fn now_ms(&self) -> f64;
    fn request_frame(&mut self, delay_ms: f64) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Timing state of the current (or last) run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    pub active_identity: Option<RunIdentity>,
    pub start_timestamp: f64,
    pub last_frame_timestamp: Option<f64>,
    pub elapsed_ms: f64,
    pub progress_pct: u8,
}

/// Current offset (and opacity) per shape index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OffsetMap {
    offsets: Vec<f64>,
    opacities: Vec<f64>,
}

impl OffsetMap {
    fn from_schedule(schedule: &Schedule, fade: bool) -> Self {
        let offsets: Vec<f64> = schedule.shapes.iter().map(|t| t.from_offset).collect();
        let opacities = schedule
            .shapes
            .iter()
            .zip(&offsets)
            .map(|(t, off)| opacity_for(t, *off, fade))
            .collect();
        Self { offsets, opacities }
    }

    pub fn offset(&self, index: usize) -> Option<f64> {
        self.offsets.get(index).copied()
    }

    pub fn opacity(&self, index: usize) -> Option<f64> {
        self.opacities.get(index).copied()
    }

    pub fn offsets(&self) -> &[f64] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

/// Per-run tween parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct TweenParams {
    pub easing: Easing,
    pub playback: PlaybackSpec,
    pub fade: bool,
}

#[derive(Debug)]
struct ActiveRun<S> {
    shapes: Vec<S>,
    schedule: Schedule,
    params: TweenParams,
    offsets: OffsetMap,
    pending: Option<FrameHandle>,
}

#[derive(Debug)]
pub struct TweenDriver<S> {
    run: Option<ActiveRun<S>>,
    state: RunState,
}

impl<S> Default for TweenDriver<S> {
    fn default() -> Self {
        Self {
            run: None,
            state: RunState::default(),
        }
    }
}

impl<S: Clone> TweenDriver<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Offsets of the active run; `None` when idle.
    pub fn offsets(&self) -> Option<&OffsetMap> {
        self.run.as_ref().map(|r| &r.offsets)
    }

    /// Begin a run, discarding any run in flight without draining it.
    ///
    /// Shapes are put into their starting state immediately; the first frame
    /// is requested after the schedule's global start delay.
    pub fn start<T, F>(
        &mut self,
        identity: RunIdentity,
        shapes: Vec<S>,
        schedule: Schedule,
        params: TweenParams,
        target: &mut T,
        scheduler: &mut F,
    ) where
        T: RenderTarget<Shape = S>,
        F: FrameScheduler,
    {
        self.cancel_pending(scheduler);

        let offsets = OffsetMap::from_schedule(&schedule, params.fade);
        for (i, timing) in schedule.shapes.iter().enumerate() {
            if let Some(shape) = shapes.get(i) {
                let (pattern, offset) = stroke_for(timing, offsets.offsets[i]);
                target.apply_dash_pattern(shape, pattern);
                target.apply_dash_offset(shape, offset);
                if params.fade {
                    target.apply_opacity(shape, offsets.opacities[i]);
                }
            }
        }

        let now = scheduler.now_ms();
        let pending = Some(scheduler.request_frame(schedule.start_delay));
        debug!(
            "run {identity} started: {} shapes, {}ms, delay {}ms",
            schedule.len(),
            schedule.total_duration,
            schedule.start_delay
        );
        self.state = RunState {
            active_identity: Some(identity),
            start_timestamp: now,
            last_frame_timestamp: None,
            elapsed_ms: 0.0,
            progress_pct: 0,
        };
        self.run = Some(ActiveRun {
            shapes,
            schedule,
            params,
            offsets,
            pending,
        });
    }

    /// Advance the active run by one frame opportunity.
    ///
    /// Returns `true` while the run is still going. Frames arriving faster than
    /// the cadence cap are deferred rather than applied.
    pub fn on_frame<T, F>(&mut self, target: &mut T, scheduler: &mut F, out: &mut Outputs) -> bool
    where
        T: RenderTarget<Shape = S>,
        F: FrameScheduler,
    {
        let Some(run) = self.run.as_mut() else {
            return false;
        };
        if let Some(handle) = run.pending.take() {
            scheduler.cancel_frame(handle);
        }
        let now = scheduler.now_ms();

        if let Some(last) = self.state.last_frame_timestamp {
            let since = now - last;
            if since < FRAME_INTERVAL_MS - FRAME_TOLERANCE_MS {
                trace!("frame {since:.2}ms after previous; deferring");
                run.pending = Some(scheduler.request_frame(FRAME_INTERVAL_MS - since));
                return true;
            }
        }

        let elapsed = (now - self.state.start_timestamp).max(0.0);
        let mut all_done = true;
        for (i, timing) in run.schedule.shapes.iter().enumerate() {
            let (offset, done) = sample_offset(timing, elapsed, &run.params);
            let opacity = opacity_for(timing, offset, run.params.fade);
            run.offsets.offsets[i] = offset;
            run.offsets.opacities[i] = opacity;
            all_done &= done;
            if let Some(shape) = run.shapes.get(i) {
                let (pattern, visible_offset) = stroke_for(timing, offset);
                target.apply_dash_pattern(shape, pattern);
                target.apply_dash_offset(shape, visible_offset);
                if run.params.fade {
                    target.apply_opacity(shape, opacity);
                }
            }
        }

        let pct = if all_done {
            100
        } else {
            progress_pct(elapsed, run.schedule.total_duration).min(99)
        };
        self.state.progress_pct = self.state.progress_pct.max(pct);
        self.state.elapsed_ms = elapsed;
        self.state.last_frame_timestamp = Some(now);
        out.push_event(DrawEvent::Progress {
            elapsed_ms: elapsed,
            progress_pct: self.state.progress_pct,
        });
        trace!("frame at {elapsed:.1}ms: {}%", self.state.progress_pct);

        if all_done {
            if let Some(identity) = self.state.active_identity.clone() {
                debug!("run {identity} completed after {elapsed:.1}ms");
                out.push_event(DrawEvent::RunCompleted { identity });
            }
            self.run = None;
            return false;
        }

        run.pending = Some(scheduler.request_frame(FRAME_INTERVAL_MS));
        true
    }

    /// Abandon the active run and leave every shape fully drawn.
    pub fn stop<T, F>(&mut self, target: &mut T, scheduler: &mut F)
    where
        T: RenderTarget<Shape = S>,
        F: FrameScheduler,
    {
        self.cancel_pending(scheduler);
        if let Some(run) = self.run.take() {
            for shape in &run.shapes {
                target.apply_dash_offset(shape, 0.0);
                if run.params.fade {
                    target.apply_opacity(shape, 1.0);
                }
            }
            debug!("run stopped");
        }
    }

    fn cancel_pending<F: FrameScheduler>(&mut self, scheduler: &mut F) {
        if let Some(handle) = self.run.as_mut().and_then(|r| r.pending.take()) {
            scheduler.cancel_frame(handle);
        }
    }
}

/// `ceil(elapsed / total * 100)`, clamped to [0, 100].
#[inline]
pub fn progress_pct(elapsed_ms: f64, total_ms: f64) -> u8 {
    if total_ms <= 0.0 {
        return 100;
    }
    (elapsed_ms / total_ms * 100.0).ceil().clamp(0.0, 100.0) as u8
}

/// Offset of one sub-tween at run time `elapsed`, and whether it has finished.
pub fn sample_offset(timing: &ShapeTiming, elapsed: f64, params: &TweenParams) -> (f64, bool) {
    if timing.is_static() {
        return (timing.to_offset, true);
    }
    let local = elapsed - timing.start_delay;
    if local < 0.0 {
        return (timing.from_offset, false);
    }
    let pb = &params.playback;
    let final_pair = |cycles: u64| pb.endpoints_for_cycle(cycles - 1, timing.from_offset, timing.to_offset);
    if timing.draw_duration <= 0.0 {
        let cycles = pb.repeat.total_cycles().unwrap_or(1);
        return (final_pair(cycles).1, pb.repeat.total_cycles().is_some());
    }

    let pos = local / timing.draw_duration;
    let cycle = pos.floor() as u64;
    if !pb.repeat.covers(cycle) {
        let cycles = pb.repeat.total_cycles().unwrap_or(cycle);
        return (final_pair(cycles).1, true);
    }
    let (from, to) = pb.endpoints_for_cycle(cycle, timing.from_offset, timing.to_offset);
    let eased = params.easing.apply(pos - cycle as f64);
    (from + (to - from) * eased, false)
}

/// Dash pattern and offset to write for `offset`. Static shapes get a solid
/// stroke, the same as the declarative backend renders them.
#[inline]
fn stroke_for(timing: &ShapeTiming, offset: f64) -> (f64, f64) {
    if timing.is_static() {
        (0.0, 0.0)
    } else {
        (timing.length, offset)
    }
}

fn opacity_for(timing: &ShapeTiming, offset: f64, fade: bool) -> f64 {
    if !fade || timing.is_static() {
        return 1.0;
    }
    let drawn = (1.0 - offset / timing.length).clamp(0.0, 1.0);
    FADE_START_OPACITY + (1.0 - FADE_START_OPACITY) * drawn
}
