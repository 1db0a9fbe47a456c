//! Path measurement and the render-target collaborator.
//!
//! The core never touches a document tree. Hosts implement [`RenderTarget`]
//! for one animated subject and hand it to the engine.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::LineDrawError;

/// Decimal places kept for measured lengths.
pub const LENGTH_DECIMALS: i32 = 2;

/// Host-side view of one animated subject and its stroke shapes.
///
/// Writes are fire-and-forget. A shape that is no longer attached to the
/// host must be ignored by the implementation rather than reported.
pub trait RenderTarget {
    /// Opaque handle to one path-like element.
    type Shape: Clone;

    /// Shapes in a stable order that matches between consecutive calls.
    fn acquire_shapes(&self) -> Vec<Self::Shape>;
    fn measure_length(&self, shape: &Self::Shape) -> f64;
    fn has_skip_marker(&self, shape: &Self::Shape) -> bool;

    fn apply_dash_pattern(&mut self, shape: &Self::Shape, value: f64);
    fn apply_dash_offset(&mut self, shape: &Self::Shape, value: f64);
    fn apply_opacity(&mut self, shape: &Self::Shape, value: f64);
}

/// Measured length and skip flag of one shape.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeData {
    pub length: f64,
    pub skip: bool,
}

impl ShapeData {
    pub fn new(length: f64, skip: bool) -> Self {
        Self {
            length: trim_float(length),
            skip,
        }
    }

    /// Length that is actually revealed; zero for skipped shapes.
    #[inline]
    pub fn visible_length(&self) -> f64 {
        if self.skip {
            0.0
        } else {
            self.length
        }
    }
}

/// Truncate to [`LENGTH_DECIMALS`] places so identical geometry always yields
/// identical schedules. Negative and non-finite inputs collapse to zero.
#[inline]
pub fn trim_float(value: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        return 0.0;
    }
    let scale = 10f64.powi(LENGTH_DECIMALS);
    (value * scale).trunc() / scale
}

/// Measure every shape the target exposes, in order.
pub fn measure<T: RenderTarget>(target: &T) -> (Vec<T::Shape>, Vec<ShapeData>) {
    let shapes = target.acquire_shapes();
    if shapes.is_empty() {
        debug!("{}; schedule will be empty", LineDrawError::EmptyMeasurement);
    }
    let data = shapes
        .iter()
        .map(|s| ShapeData::new(target.measure_length(s), target.has_skip_marker(s)))
        .collect();
    (shapes, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<(f64, bool)>);

    impl RenderTarget for Fixed {
        type Shape = usize;

        fn acquire_shapes(&self) -> Vec<usize> {
            (0..self.0.len()).collect()
        }
        fn measure_length(&self, shape: &usize) -> f64 {
            self.0[*shape].0
        }
        fn has_skip_marker(&self, shape: &usize) -> bool {
            self.0[*shape].1
        }
        fn apply_dash_pattern(&mut self, _: &usize, _: f64) {}
        fn apply_dash_offset(&mut self, _: &usize, _: f64) {}
        fn apply_opacity(&mut self, _: &usize, _: f64) {}
    }

    #[test]
    fn trims_to_two_decimals() {
        assert_eq!(trim_float(123.456789), 123.45);
        assert_eq!(trim_float(10.0), 10.0);
        assert_eq!(trim_float(-3.0), 0.0);
        assert_eq!(trim_float(f64::NAN), 0.0);
    }

    #[test]
    fn noisy_lengths_measure_identically() {
        assert_eq!(
            ShapeData::new(99.990000001, false),
            ShapeData::new(99.9900000004, false)
        );
    }

    #[test]
    fn measure_preserves_order_and_skip_flags() {
        let target = Fixed(vec![(10.129, false), (5.0, true), (0.0, false)]);
        let (shapes, data) = measure(&target);
        assert_eq!(shapes, vec![0, 1, 2]);
        assert_eq!(data[0], ShapeData { length: 10.12, skip: false });
        assert!(data[1].skip);
        assert_eq!(data[1].length, 5.0);
        assert_eq!(data[1].visible_length(), 0.0);
        assert_eq!(data[2].length, 0.0);
    }

    #[test]
    fn empty_target_is_valid() {
        let (shapes, data) = measure(&Fixed(Vec::new()));
        assert!(shapes.is_empty());
        assert!(data.is_empty());
    }
}
