// ============================================================================
// jux-reactive - Tracks
// Per-property piecewise interpolation between keyframes
// ============================================================================
//
// When a timeline starts, every targeted property gets one track. The track
// captures the property's live value as the anchor at time zero and then
// holds one segment per KeyValue targeting that property, in time order.
// Sampling at time t blends across the segment containing t using that
// segment's ending interpolator.
// ============================================================================

use std::cell::RefCell;

use crate::animation::interpolator::{Interpolatable, Interpolator};
use crate::animation::key_value::{AnyKeyValue, KeyValue};
use crate::primitives::property::Property;

/// A type-erased track.
pub trait Track {
    /// Identity of the target property.
    fn key(&self) -> *const ();

    /// Append a segment ending at `time_ms`. Segments must arrive in time
    /// order; a KeyValue of another type is ignored.
    fn push_segment(&self, time_ms: f64, key_value: &dyn AnyKeyValue);

    /// Capture the target's current value as the anchor at time zero.
    fn capture_start(&self);

    /// Write the value at `time_ms` into the target.
    fn apply(&self, time_ms: f64);
}

struct Segment<T> {
    time: f64,
    end: T,
    interpolator: Interpolator,
}

pub(crate) struct TypedTrack<T> {
    target: Property<T>,
    start: RefCell<Option<T>>,
    segments: RefCell<Vec<Segment<T>>>,
}

impl<T: Interpolatable> TypedTrack<T> {
    pub(crate) fn new(target: Property<T>) -> Self {
        Self {
            target,
            start: RefCell::new(None),
            segments: RefCell::new(Vec::new()),
        }
    }

    fn sample(&self, time_ms: f64) -> Option<T> {
        let segments = self.segments.borrow();
        let start = self.start.borrow();
        let mut from_time = 0.0;
        let mut from_value = start.as_ref()?;

        for segment in segments.iter() {
            if time_ms < segment.time {
                let span = segment.time - from_time;
                let fraction = if span > 0.0 {
                    ((time_ms - from_time) / span).clamp(0.0, 1.0)
                } else {
                    1.0
                };
                return Some(segment.interpolator.interpolate(from_value, &segment.end, fraction));
            }
            from_time = segment.time;
            from_value = &segment.end;
        }
        Some(from_value.clone())
    }
}

impl<T: Interpolatable> Track for TypedTrack<T> {
    fn key(&self) -> *const () {
        self.target.key()
    }

    fn push_segment(&self, time_ms: f64, key_value: &dyn AnyKeyValue) {
        if let Some(kv) = key_value.as_any().downcast_ref::<KeyValue<T>>() {
            self.segments.borrow_mut().push(Segment {
                time: time_ms,
                end: kv.end_value().clone(),
                interpolator: kv.interpolator().clone(),
            });
        }
    }

    fn capture_start(&self) {
        *self.start.borrow_mut() = Some(self.target.get());
    }

    fn apply(&self, time_ms: f64) {
        // Borrows end inside sample(): listeners on the target run freely
        if let Some(value) = self.sample(time_ms) {
            self.target.set(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn track_with(p: &Property<f64>, segments: &[(f64, f64)]) -> TypedTrack<f64> {
        let track = TypedTrack::new(p.clone());
        for &(time, end) in segments {
            track.push_segment(time, &KeyValue::new(p, end));
        }
        track.capture_start();
        track
    }

    #[test]
    fn blends_from_captured_start() {
        let p = Property::new(10.0);
        let track = track_with(&p, &[(100.0, 20.0)]);

        track.apply(50.0);
        assert_abs_diff_eq!(p.get(), 15.0);
        track.apply(100.0);
        assert_abs_diff_eq!(p.get(), 20.0);
        track.apply(500.0);
        assert_abs_diff_eq!(p.get(), 20.0);
    }

    #[test]
    fn piecewise_segments() {
        let p = Property::new(0.0);
        let track = track_with(&p, &[(100.0, 10.0), (300.0, 30.0)]);

        track.apply(200.0);
        assert_abs_diff_eq!(p.get(), 20.0);
    }

    #[test]
    fn segment_at_zero_overrides_start() {
        let p = Property::new(5.0);
        let track = track_with(&p, &[(0.0, 0.0), (100.0, 1.0)]);

        track.apply(0.0);
        assert_abs_diff_eq!(p.get(), 0.0);
        track.apply(25.0);
        assert_abs_diff_eq!(p.get(), 0.25);
    }

    #[test]
    fn mismatched_key_value_type_is_ignored() {
        let p = Property::new(0.0);
        let other = Property::new(0_i32);
        let track = TypedTrack::new(p.clone());
        track.push_segment(10.0, &KeyValue::new(&other, 4));
        track.capture_start();
        track.apply(10.0);
        assert_eq!(p.get(), 0.0);
    }
}
