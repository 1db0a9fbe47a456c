#![allow(dead_code)]
use std::collections::HashSet;

use linedraw_core::{FrameHandle, FrameScheduler, RenderTarget};

/// In-memory render target; shape handles are indices.
#[derive(Debug, Default)]
pub struct RecordingTarget {
    pub shapes: Vec<(f64, bool)>,
    pub dash_pattern: Vec<Option<f64>>,
    pub dash_offset: Vec<Option<f64>>,
    pub opacity: Vec<Option<f64>>,
    pub detached: HashSet<usize>,
    /// (shape, offset) in write order.
    pub offset_log: Vec<(usize, f64)>,
}

impl RecordingTarget {
    pub fn new(shapes: &[(f64, bool)]) -> Self {
        Self {
            shapes: shapes.to_vec(),
            dash_pattern: vec![None; shapes.len()],
            dash_offset: vec![None; shapes.len()],
            opacity: vec![None; shapes.len()],
            ..Self::default()
        }
    }

    pub fn with_lengths(lengths: &[f64]) -> Self {
        let shapes: Vec<(f64, bool)> = lengths.iter().map(|l| (*l, false)).collect();
        Self::new(&shapes)
    }

    pub fn offset(&self, i: usize) -> f64 {
        self.dash_offset[i].expect("offset written")
    }
}

impl RenderTarget for RecordingTarget {
    type Shape = usize;

    fn acquire_shapes(&self) -> Vec<usize> {
        (0..self.shapes.len()).collect()
    }

    fn measure_length(&self, shape: &usize) -> f64 {
        self.shapes[*shape].0
    }

    fn has_skip_marker(&self, shape: &usize) -> bool {
        self.shapes[*shape].1
    }

    fn apply_dash_pattern(&mut self, shape: &usize, value: f64) {
        if !self.detached.contains(shape) {
            self.dash_pattern[*shape] = Some(value);
        }
    }

    fn apply_dash_offset(&mut self, shape: &usize, value: f64) {
        if !self.detached.contains(shape) {
            self.dash_offset[*shape] = Some(value);
            self.offset_log.push((*shape, value));
        }
    }

    fn apply_opacity(&mut self, shape: &usize, value: f64) {
        if !self.detached.contains(shape) {
            self.opacity[*shape] = Some(value);
        }
    }
}

/// Deterministic clock; frame requests are recorded, never fired on their own.
#[derive(Debug, Default)]
pub struct FakeScheduler {
    pub now: f64,
    next_handle: u64,
    pub requested: Vec<(FrameHandle, f64)>,
    pub cancelled: Vec<FrameHandle>,
}

impl FakeScheduler {
    pub fn advance(&mut self, ms: f64) {
        self.now += ms;
    }

    pub fn last_request(&self) -> Option<(FrameHandle, f64)> {
        self.requested.last().copied()
    }
}

impl FrameScheduler for FakeScheduler {
    fn now_ms(&self) -> f64 {
        self.now
    }

    fn request_frame(&mut self, delay_ms: f64) -> FrameHandle {
        let handle = FrameHandle(self.next_handle);
        self.next_handle += 1;
        self.requested.push((handle, delay_ms));
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.cancelled.push(handle);
    }
}
