//! Timing planner: per-shape start delays and draw durations.
//!
//! Both backends consume the same [`Schedule`]; the stagger math lives here
//! and nowhere else.

use serde::{Deserialize, Serialize};

use crate::measure::ShapeData;
use crate::playback::PlaybackSpec;

/// Timing of one shape within a run. Times are in milliseconds from run start.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeTiming {
    pub index: usize,
    pub length: f64,
    pub skip: bool,
    pub start_delay: f64,
    pub draw_duration: f64,
    pub from_offset: f64,
    pub to_offset: f64,
}

impl ShapeTiming {
    /// True when the shape never changes on screen (skipped or empty geometry).
    #[inline]
    pub fn is_static(&self) -> bool {
        self.skip || self.length <= 0.0
    }

    /// Delay that has a visible effect; static shapes contribute none.
    #[inline]
    pub fn visible_delay(&self) -> f64 {
        if self.is_static() {
            0.0
        } else {
            self.start_delay
        }
    }
}

/// Immutable timing plan for one run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub shapes: Vec<ShapeTiming>,
    pub total_duration: f64,
    pub start_delay: f64,
    pub per_shape_stagger: f64,
    pub per_shape_draw_duration: f64,
}

impl Schedule {
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }
}

/// Plan a run for `shapes`.
///
/// `stagger_pct` is clamped to [0, 100]. With a non-zero stagger each shape
/// draws over `duration / n * (2 - s)`, so late shapes may end after
/// `total_duration`; that overlap is intended.
pub fn plan(
    shapes: &[ShapeData],
    total_duration: f64,
    stagger_pct: f64,
    playback: &PlaybackSpec,
    start_delay_ms: f64,
) -> Schedule {
    let s = stagger_pct.clamp(0.0, 100.0) / 100.0;
    let n = shapes.len().max(1) as f64;
    let (per_shape_stagger, per_shape_draw_duration) = if s > 0.0 {
        (total_duration / n * s, total_duration / n * (2.0 - s))
    } else {
        (0.0, total_duration)
    };

    let timings = shapes
        .iter()
        .enumerate()
        .map(|(index, data)| {
            let (from_offset, to_offset) = if data.skip {
                (data.length, data.length)
            } else if playback.reversed {
                (0.0, data.length)
            } else {
                (data.length, 0.0)
            };
            ShapeTiming {
                index,
                length: data.length,
                skip: data.skip,
                start_delay: start_delay_ms + per_shape_stagger * index as f64,
                draw_duration: per_shape_draw_duration,
                from_offset,
                to_offset,
            }
        })
        .collect();

    Schedule {
        shapes: timings,
        total_duration,
        start_delay: start_delay_ms,
        per_shape_stagger,
        per_shape_draw_duration,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lengths(ls: &[f64]) -> Vec<ShapeData> {
        ls.iter().map(|l| ShapeData::new(*l, false)).collect()
    }

    #[test]
    fn four_shapes_half_stagger() {
        let sched = plan(
            &lengths(&[10.0, 20.0, 30.0, 40.0]),
            1000.0,
            50.0,
            &PlaybackSpec::default(),
            0.0,
        );
        assert_eq!(sched.per_shape_stagger, 125.0);
        assert_eq!(sched.per_shape_draw_duration, 375.0);
        let delays: Vec<f64> = sched.shapes.iter().map(|t| t.start_delay).collect();
        assert_eq!(delays, vec![0.0, 125.0, 250.0, 375.0]);
        assert!(sched.shapes.iter().all(|t| t.draw_duration == 375.0));
    }

    #[test]
    fn zero_stagger_draws_everything_together() {
        let sched = plan(&lengths(&[1.0, 2.0, 3.0]), 800.0, 0.0, &PlaybackSpec::default(), 200.0);
        for t in &sched.shapes {
            assert_eq!(t.start_delay, 200.0);
            assert_eq!(t.draw_duration, 800.0);
        }
    }

    #[test]
    fn stagger_is_clamped() {
        let over = plan(&lengths(&[1.0, 2.0]), 1000.0, 250.0, &PlaybackSpec::default(), 0.0);
        let full = plan(&lengths(&[1.0, 2.0]), 1000.0, 100.0, &PlaybackSpec::default(), 0.0);
        assert_eq!(over, full);
        let under = plan(&lengths(&[1.0, 2.0]), 1000.0, -5.0, &PlaybackSpec::default(), 0.0);
        assert_eq!(under.per_shape_stagger, 0.0);
        assert_eq!(under.per_shape_draw_duration, 1000.0);
    }

    #[test]
    fn full_stagger_ends_exactly_on_total_duration() {
        let sched = plan(&lengths(&[1.0, 1.0, 1.0]), 900.0, 100.0, &PlaybackSpec::default(), 0.0);
        let last = sched.shapes.last().unwrap();
        assert_eq!(last.start_delay, 600.0);
        assert_eq!(last.start_delay + last.draw_duration, 900.0);
    }

    #[test]
    fn single_shape_stagger_overruns_total_duration() {
        let sched = plan(&lengths(&[1.0]), 1000.0, 50.0, &PlaybackSpec::default(), 0.0);
        assert_eq!(sched.shapes[0].start_delay, 0.0);
        assert_eq!(sched.shapes[0].draw_duration, 1500.0);
    }

    #[test]
    fn skipped_shapes_hold_full_length() {
        let shapes = vec![ShapeData::new(12.0, true), ShapeData::new(8.0, false)];
        for descriptor in ["forwards", "reverse", "2 alternate-reverse both"] {
            let pb = PlaybackSpec::parse(descriptor).unwrap();
            let sched = plan(&shapes, 1000.0, 50.0, &pb, 100.0);
            let skipped = &sched.shapes[0];
            assert_eq!(skipped.from_offset, 12.0);
            assert_eq!(skipped.to_offset, 12.0);
            assert_eq!(skipped.visible_delay(), 0.0);
        }
    }

    #[test]
    fn reverse_swaps_endpoints() {
        let fwd = plan(&lengths(&[5.0]), 1000.0, 0.0, &PlaybackSpec::default(), 0.0);
        let rev = plan(
            &lengths(&[5.0]),
            1000.0,
            0.0,
            &PlaybackSpec::parse("reverse").unwrap(),
            0.0,
        );
        assert_eq!(fwd.shapes[0].from_offset, rev.shapes[0].to_offset);
        assert_eq!(fwd.shapes[0].to_offset, rev.shapes[0].from_offset);
    }

    #[test]
    fn empty_input_is_an_empty_schedule() {
        let sched = plan(&[], 1000.0, 50.0, &PlaybackSpec::default(), 0.0);
        assert!(sched.is_empty());
        assert_eq!(sched.per_shape_stagger, 500.0);
    }
}
