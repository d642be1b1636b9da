// ============================================================================
// jux-reactive - Timeline
// Keyframe animation driven by a FrameScheduler
// ============================================================================
//
// STOPPED --play--> RUNNING --pause--> PAUSED --play--> RUNNING
// RUNNING/PAUSED --stop--> STOPPED (runs on_finished)
// RUNNING --playhead reaches the end--> STOPPED (runs on_finished)
//
// play() from STOPPED rebuilds one track per targeted property and captures
// every start value from the live property, so a timeline can be replayed
// from whatever state the properties are in. The first frame after play or
// resume anchors the clock: elapsed = frame timestamp - anchor.
//
// A pending frame callback holds a strong handle, so a running timeline
// stays alive until it finishes, pauses or stops.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::animation::duration::Duration;
use crate::animation::interpolator::Interpolatable;
use crate::animation::key_frame::KeyFrame;
use crate::animation::key_value::KeyValue;
use crate::animation::scheduler::{FrameHandle, FrameScheduler, default_scheduler};
use crate::animation::track::Track;
use crate::core::constants::INDEFINITE;
use crate::error::{JuxError, Result};
use crate::primitives::property::Property;

/// Playback state of a [`Timeline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnimationStatus {
    #[default]
    Stopped,
    Running,
    Paused,
}

// =============================================================================
// TIMELINE INNER
// =============================================================================

struct TimelineInner {
    key_frames: RefCell<Vec<KeyFrame>>,
    scheduler: Rc<dyn FrameScheduler>,
    cycle_count: Cell<i32>,
    auto_reverse: Cell<bool>,
    on_finished: RefCell<Option<Rc<dyn Fn()>>>,

    state: Cell<AnimationStatus>,
    status: Property<AnimationStatus>,
    current_time: Property<Duration>,

    // Rebuilt on every play from STOPPED
    tracks: RefCell<Vec<Rc<dyn Track>>>,
    cues: RefCell<Vec<(f64, Rc<dyn Fn()>)>>,
    cycle_ms: Cell<f64>,

    pending: Cell<Option<FrameHandle>>,
    anchor: Cell<Option<f64>>,
    offset: Cell<f64>,
    last_elapsed: Cell<Option<f64>>,
}

/// An animation built from [`KeyFrame`]s.
///
/// `Timeline` is a cheap handle; clones control the same animation.
///
/// # Example
///
/// ```
/// use jux_reactive::animation::{
///     AnimationStatus, Duration, KeyFrame, KeyValue, Timeline, VirtualFrameScheduler,
/// };
/// use jux_reactive::DoubleProperty;
/// use std::rc::Rc;
///
/// let clock = Rc::new(VirtualFrameScheduler::with_frame_interval(100.0).unwrap());
/// let x = DoubleProperty::new(0.0);
/// let timeline = Timeline::builder()
///     .key_frame(
///         KeyFrame::new(Duration::millis(1000.0))
///             .unwrap()
///             .with_value(KeyValue::new(&x, 100.0)),
///     )
///     .scheduler(clock.clone())
///     .build()
///     .unwrap();
///
/// timeline.play();
/// clock.run_until_idle(5000.0);
/// assert_eq!(x.get(), 100.0);
/// assert_eq!(timeline.status(), AnimationStatus::Stopped);
/// ```
#[derive(Clone)]
pub struct Timeline {
    inner: Rc<TimelineInner>,
}

impl Timeline {
    /// A single-cycle timeline on the default scheduler.
    pub fn new(key_frames: impl IntoIterator<Item = KeyFrame>) -> Self {
        Self::with_scheduler(key_frames, default_scheduler())
    }

    pub fn with_scheduler(
        key_frames: impl IntoIterator<Item = KeyFrame>,
        scheduler: Rc<dyn FrameScheduler>,
    ) -> Self {
        Self {
            inner: Rc::new(TimelineInner {
                key_frames: RefCell::new(key_frames.into_iter().collect()),
                scheduler,
                cycle_count: Cell::new(1),
                auto_reverse: Cell::new(false),
                on_finished: RefCell::new(None),
                state: Cell::new(AnimationStatus::Stopped),
                status: Property::new(AnimationStatus::Stopped),
                current_time: Property::new(Duration::ZERO),
                tracks: RefCell::new(Vec::new()),
                cues: RefCell::new(Vec::new()),
                cycle_ms: Cell::new(0.0),
                pending: Cell::new(None),
                anchor: Cell::new(None),
                offset: Cell::new(0.0),
                last_elapsed: Cell::new(None),
            }),
        }
    }

    pub fn builder() -> TimelineBuilder {
        TimelineBuilder::default()
    }

    // =========================================================================
    // CONFIGURATION
    // =========================================================================

    /// Number of cycles, or [`INDEFINITE`] to loop until stopped.
    pub fn set_cycle_count(&self, count: i32) -> Result<()> {
        check_cycle_count(count)?;
        self.inner.cycle_count.set(count);
        Ok(())
    }

    pub fn cycle_count(&self) -> i32 {
        self.inner.cycle_count.get()
    }

    /// Play every odd cycle backwards.
    pub fn set_auto_reverse(&self, auto_reverse: bool) {
        self.inner.auto_reverse.set(auto_reverse);
    }

    pub fn auto_reverse(&self) -> bool {
        self.inner.auto_reverse.get()
    }

    /// Runs when the timeline finishes or is stopped.
    pub fn set_on_finished(&self, f: impl Fn() + 'static) {
        *self.inner.on_finished.borrow_mut() = Some(Rc::new(f));
    }

    /// Takes effect on the next play from STOPPED.
    pub fn add_key_frame(&self, key_frame: KeyFrame) {
        self.inner.key_frames.borrow_mut().push(key_frame);
    }

    pub fn key_frames(&self) -> Vec<KeyFrame> {
        self.inner.key_frames.borrow().clone()
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// The latest KeyFrame offset, or zero with no KeyFrames.
    pub fn cycle_duration(&self) -> Duration {
        self.inner
            .key_frames
            .borrow()
            .iter()
            .map(KeyFrame::time)
            .fold(Duration::ZERO, Duration::max)
    }

    /// `cycle_duration * cycle_count`, INDEFINITE when looping forever.
    pub fn total_duration(&self) -> Duration {
        let cycle = self.cycle_duration();
        if cycle == Duration::ZERO {
            Duration::ZERO
        } else if self.cycle_count() == INDEFINITE {
            Duration::INDEFINITE
        } else {
            cycle * f64::from(self.cycle_count())
        }
    }

    /// The end value of the last KeyValue targeting `property`, in time order.
    pub fn end_value<T: Interpolatable>(&self, property: &Property<T>) -> Option<T> {
        let key = property.key();
        sorted(&self.inner.key_frames.borrow())
            .iter()
            .flat_map(|frame| frame.values().iter())
            .filter(|kv| kv.target_key() == key)
            .filter_map(|kv| kv.as_any().downcast_ref::<KeyValue<T>>())
            .last()
            .map(|kv| kv.end_value().clone())
    }

    pub fn status(&self) -> AnimationStatus {
        self.inner.state.get()
    }

    /// Observable mirror of [`status`](Self::status). Writes to it are
    /// overwritten on the next state change.
    pub fn status_property(&self) -> Property<AnimationStatus> {
        self.inner.status.clone()
    }

    /// Observable playhead within the current cycle.
    pub fn current_time_property(&self) -> Property<Duration> {
        self.inner.current_time.clone()
    }

    pub fn current_time(&self) -> Duration {
        self.inner.current_time.get()
    }

    // =========================================================================
    // PLAYBACK
    // =========================================================================

    /// Start from the beginning, or resume where a pause left off.
    pub fn play(&self) {
        match self.status() {
            AnimationStatus::Running => {}
            AnimationStatus::Paused => {
                self.inner.anchor.set(None);
                self.set_state(AnimationStatus::Running);
                tracing::debug!(offset_ms = self.inner.offset.get(), "timeline resumed");
                self.request_next();
            }
            AnimationStatus::Stopped => self.start(),
        }
    }

    pub fn pause(&self) {
        if self.status() != AnimationStatus::Running {
            return;
        }
        self.cancel_pending();
        let inner = &self.inner;
        if let Some(elapsed) = inner.last_elapsed.get() {
            inner.offset.set(elapsed);
        }
        inner.anchor.set(None);
        self.set_state(AnimationStatus::Paused);
        tracing::debug!(offset_ms = inner.offset.get(), "timeline paused");
    }

    /// Stop and rewind. Runs `on_finished` when leaving RUNNING or PAUSED.
    pub fn stop(&self) {
        if self.status() == AnimationStatus::Stopped {
            return;
        }
        self.cancel_pending();
        self.rewind();
        self.inner.current_time.set(Duration::ZERO);
        self.set_state(AnimationStatus::Stopped);
        tracing::debug!("timeline stopped");
        self.fire_on_finished();
    }

    fn start(&self) {
        let inner = &self.inner;
        let frames = sorted(&inner.key_frames.borrow());

        let mut tracks: Vec<Rc<dyn Track>> = Vec::new();
        for frame in &frames {
            let time = frame.time().to_millis();
            for kv in frame.values() {
                let key = kv.target_key();
                let track = match tracks.iter().find(|t| t.key() == key) {
                    Some(track) => track.clone(),
                    None => {
                        let track = kv.new_track();
                        tracks.push(track.clone());
                        track
                    }
                };
                track.push_segment(time, kv.as_ref());
            }
        }
        for track in &tracks {
            track.capture_start();
        }

        let cues = frames
            .iter()
            .filter_map(|frame| frame.on_finished().map(|f| (frame.time().to_millis(), f)))
            .collect();
        let cycle_ms = frames.last().map_or(0.0, |frame| frame.time().to_millis());

        *inner.tracks.borrow_mut() = tracks;
        *inner.cues.borrow_mut() = cues;
        inner.cycle_ms.set(cycle_ms);
        self.rewind();

        self.set_state(AnimationStatus::Running);
        tracing::debug!(
            key_frames = frames.len(),
            cycle_ms,
            cycle_count = self.cycle_count(),
            "timeline playing"
        );

        if cycle_ms <= 0.0 {
            // Nothing to wait for: land on the end values right away
            self.advance_to(0.0);
            self.finish();
        } else {
            self.request_next();
        }
    }

    // =========================================================================
    // FRAMES
    // =========================================================================

    fn request_next(&self) {
        let this = self.clone();
        let handle = self
            .inner
            .scheduler
            .request_frame(Box::new(move |timestamp| this.on_frame(timestamp)));
        self.inner.pending.set(Some(handle));
    }

    fn on_frame(&self, timestamp: f64) {
        let inner = &self.inner;
        inner.pending.set(None);
        if self.status() != AnimationStatus::Running {
            return;
        }

        let anchor = match inner.anchor.get() {
            Some(anchor) => anchor,
            None => {
                let anchor = timestamp - inner.offset.get();
                inner.anchor.set(Some(anchor));
                anchor
            }
        };
        let total = self.total_millis();
        let elapsed = (timestamp - anchor).max(0.0).min(total);
        self.advance_to(elapsed);

        // Listeners and cues may have paused or stopped us
        if self.status() != AnimationStatus::Running {
            return;
        }
        if elapsed >= total {
            self.finish();
        } else if inner.pending.get().is_none() {
            self.request_next();
        }
    }

    /// Move the playhead to `elapsed` ms since the start of the first cycle.
    fn advance_to(&self, elapsed: f64) {
        let inner = &self.inner;
        let previous = inner.last_elapsed.replace(Some(elapsed));
        let position = self.cycle_position(elapsed);

        let tracks = inner.tracks.borrow().clone();
        for track in &tracks {
            track.apply(position);
        }
        inner.current_time.set(Duration::millis(position));

        for cue in self.crossed_cues(previous, elapsed) {
            cue();
        }
    }

    fn finish(&self) {
        self.cancel_pending();
        self.set_state(AnimationStatus::Stopped);
        tracing::debug!("timeline finished");
        self.fire_on_finished();
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    fn total_millis(&self) -> f64 {
        let cycle = self.inner.cycle_ms.get();
        match self.cycle_count() {
            INDEFINITE => f64::INFINITY,
            count => cycle * f64::from(count),
        }
    }

    /// Position inside the cycle, mirrored on odd cycles when auto-reversing.
    fn cycle_position(&self, elapsed: f64) -> f64 {
        let cycle = self.inner.cycle_ms.get();
        if cycle <= 0.0 {
            return 0.0;
        }
        let reverse = self.auto_reverse();
        if elapsed >= self.total_millis() {
            let ends_backwards = reverse && self.cycle_count() % 2 == 0;
            return if ends_backwards { 0.0 } else { cycle };
        }
        let index = (elapsed / cycle).floor();
        let local = elapsed - index * cycle;
        if reverse && index % 2.0 == 1.0 {
            cycle - local
        } else {
            local
        }
    }

    /// KeyFrame callbacks whose offsets lie in `(previous, elapsed]`, or in
    /// `[0, elapsed]` on the first frame, in the order they were crossed.
    fn crossed_cues(&self, previous: Option<f64>, elapsed: f64) -> Vec<Rc<dyn Fn()>> {
        let inner = &self.inner;
        let cues = inner.cues.borrow();
        let cycle = inner.cycle_ms.get();
        if cues.is_empty() {
            return Vec::new();
        }
        if cycle <= 0.0 {
            return cues.iter().map(|(_, f)| f.clone()).collect();
        }

        let in_window = |t: f64| match previous {
            Some(previous) => t > previous && t <= elapsed,
            None => t <= elapsed,
        };
        let first = previous.map_or(0.0, |p| (p / cycle).floor());
        let mut last = (elapsed / cycle).floor();
        if self.cycle_count() != INDEFINITE {
            last = last.min(f64::from(self.cycle_count()) - 1.0);
        }

        let reverse = self.auto_reverse();
        let mut hits: Vec<(f64, usize)> = Vec::new();
        let mut index = first;
        while index <= last {
            let backwards = reverse && index % 2.0 == 1.0;
            for (cue, (offset, _)) in cues.iter().enumerate() {
                let local = if backwards { cycle - offset } else { *offset };
                let at = index * cycle + local;
                if in_window(at) {
                    hits.push((at, cue));
                }
            }
            index += 1.0;
        }
        hits.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        // A turnaround point is reached once, not once per adjoining cycle
        hits.dedup();
        hits.into_iter().map(|(_, cue)| cues[cue].1.clone()).collect()
    }

    fn rewind(&self) {
        let inner = &self.inner;
        inner.anchor.set(None);
        inner.offset.set(0.0);
        inner.last_elapsed.set(None);
    }

    fn cancel_pending(&self) {
        if let Some(handle) = self.inner.pending.take() {
            self.inner.scheduler.cancel_frame(handle);
        }
    }

    fn set_state(&self, status: AnimationStatus) {
        self.inner.state.set(status);
        self.inner.status.set(status);
    }

    fn fire_on_finished(&self) {
        let on_finished = self.inner.on_finished.borrow().clone();
        if let Some(f) = on_finished {
            f();
        }
    }
}

impl fmt::Debug for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timeline")
            .field("status", &self.status())
            .field("key_frames", &self.inner.key_frames.borrow().len())
            .field("cycle_count", &self.cycle_count())
            .field("auto_reverse", &self.auto_reverse())
            .finish()
    }
}

fn check_cycle_count(count: i32) -> Result<()> {
    if count == INDEFINITE || count >= 1 {
        Ok(())
    } else {
        Err(JuxError::illegal(format!(
            "cycle count must be positive or INDEFINITE, got {count}"
        )))
    }
}

/// KeyFrames in time order; equal offsets keep insertion order.
fn sorted(frames: &[KeyFrame]) -> Vec<KeyFrame> {
    let mut frames = frames.to_vec();
    frames.sort_by(|a, b| a.time().total_cmp(&b.time()));
    frames
}

// =============================================================================
// BUILDER
// =============================================================================

/// Chained configuration for a [`Timeline`].
#[derive(Default)]
pub struct TimelineBuilder {
    key_frames: Vec<KeyFrame>,
    cycle_count: Option<i32>,
    auto_reverse: bool,
    on_finished: Option<Rc<dyn Fn()>>,
    scheduler: Option<Rc<dyn FrameScheduler>>,
}

impl TimelineBuilder {
    pub fn key_frame(mut self, key_frame: KeyFrame) -> Self {
        self.key_frames.push(key_frame);
        self
    }

    pub fn key_frames(mut self, key_frames: impl IntoIterator<Item = KeyFrame>) -> Self {
        self.key_frames.extend(key_frames);
        self
    }

    pub fn cycle_count(mut self, count: i32) -> Self {
        self.cycle_count = Some(count);
        self
    }

    pub fn auto_reverse(mut self, auto_reverse: bool) -> Self {
        self.auto_reverse = auto_reverse;
        self
    }

    pub fn on_finished(mut self, f: impl Fn() + 'static) -> Self {
        self.on_finished = Some(Rc::new(f));
        self
    }

    /// Defaults to the thread's default scheduler.
    pub fn scheduler(mut self, scheduler: Rc<dyn FrameScheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Fails when the cycle count is neither positive nor INDEFINITE.
    pub fn build(self) -> Result<Timeline> {
        let cycle_count = self.cycle_count.unwrap_or(1);
        check_cycle_count(cycle_count)?;
        let scheduler = self.scheduler.unwrap_or_else(default_scheduler);
        let timeline = Timeline::with_scheduler(self.key_frames, scheduler);
        timeline.inner.cycle_count.set(cycle_count);
        timeline.inner.auto_reverse.set(self.auto_reverse);
        *timeline.inner.on_finished.borrow_mut() = self.on_finished;
        Ok(timeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::scheduler::VirtualFrameScheduler;
    use approx::assert_abs_diff_eq;

    fn clock() -> Rc<VirtualFrameScheduler> {
        Rc::new(VirtualFrameScheduler::with_frame_interval(100.0).unwrap())
    }

    fn frame(ms: f64) -> KeyFrame {
        KeyFrame::new(Duration::millis(ms)).unwrap()
    }

    fn counter() -> (Rc<Cell<u32>>, impl Fn() + 'static) {
        let count = Rc::new(Cell::new(0));
        let bump = {
            let count = count.clone();
            move || count.set(count.get() + 1)
        };
        (count, bump)
    }

    #[test]
    fn runs_to_the_end_value_and_finishes_once() {
        let clock = clock();
        let x = Property::new(0.0);
        let (finished, bump) = counter();
        let timeline = Timeline::builder()
            .key_frame(frame(1000.0).with_value(KeyValue::new(&x, 100.0)))
            .on_finished(bump)
            .scheduler(clock.clone())
            .build()
            .unwrap();

        timeline.play();
        assert_eq!(timeline.status(), AnimationStatus::Running);
        clock.tick();
        clock.tick();
        clock.tick();
        assert_abs_diff_eq!(x.get(), 20.0, epsilon = 1e-9);

        assert!(clock.run_until_idle(5000.0));
        assert_abs_diff_eq!(x.get(), 100.0, epsilon = 0.01);
        assert_eq!(finished.get(), 1);
        assert_eq!(timeline.status(), AnimationStatus::Stopped);
    }

    #[test]
    fn pause_resumes_from_the_paused_position() {
        let clock = clock();
        let x = Property::new(0.0);
        let timeline = Timeline::with_scheduler(
            [frame(1000.0).with_value(KeyValue::new(&x, 100.0))],
            clock.clone(),
        );

        timeline.play();
        clock.tick(); // anchors at 0 elapsed
        clock.tick();
        clock.tick();
        assert_abs_diff_eq!(x.get(), 20.0, epsilon = 1e-9);

        timeline.pause();
        assert_eq!(timeline.status(), AnimationStatus::Paused);
        assert!(!clock.has_pending());
        clock.tick_by(5000.0);
        assert_abs_diff_eq!(x.get(), 20.0, epsilon = 1e-9);

        timeline.play();
        clock.tick();
        assert_abs_diff_eq!(x.get(), 20.0, epsilon = 1e-9);
        clock.tick();
        assert_abs_diff_eq!(x.get(), 30.0, epsilon = 1e-9);
    }

    #[test]
    fn stop_runs_on_finished_and_replay_captures_fresh_start() {
        let clock = clock();
        let x = Property::new(0.0);
        let (finished, bump) = counter();
        let timeline = Timeline::with_scheduler(
            [frame(1000.0).with_value(KeyValue::new(&x, 100.0))],
            clock.clone(),
        );
        timeline.set_on_finished(bump);

        timeline.stop();
        assert_eq!(finished.get(), 0);

        timeline.play();
        clock.tick();
        clock.tick();
        timeline.stop();
        assert_eq!(finished.get(), 1);
        assert_eq!(timeline.status(), AnimationStatus::Stopped);
        assert_eq!(timeline.current_time(), Duration::ZERO);

        x.set(50.0);
        timeline.play();
        clock.tick();
        assert_abs_diff_eq!(x.get(), 50.0, epsilon = 1e-9);
        clock.tick_by(500.0);
        assert_abs_diff_eq!(x.get(), 75.0, epsilon = 1e-9);
    }

    #[test]
    fn no_key_frames_completes_on_play() {
        let (finished, bump) = counter();
        let timeline = Timeline::builder()
            .on_finished(bump)
            .scheduler(clock())
            .build()
            .unwrap();

        timeline.play();
        assert_eq!(finished.get(), 1);
        assert_eq!(timeline.status(), AnimationStatus::Stopped);
        assert_eq!(timeline.total_duration(), Duration::ZERO);
    }

    #[test]
    fn auto_reverse_mirrors_odd_cycles() {
        let clock = clock();
        let x = Property::new(0.0);
        let timeline = Timeline::builder()
            .key_frame(frame(200.0).with_value(KeyValue::new(&x, 10.0)))
            .cycle_count(2)
            .auto_reverse(true)
            .scheduler(clock.clone())
            .build()
            .unwrap();
        assert_eq!(timeline.total_duration(), Duration::millis(400.0));

        let seen = Rc::new(RefCell::new(Vec::new()));
        x.on_change({
            let seen = seen.clone();
            move |_, new| seen.borrow_mut().push(*new)
        });

        timeline.play();
        assert!(clock.run_until_idle(2000.0));
        assert_eq!(*seen.borrow(), vec![5.0, 10.0, 5.0, 0.0]);
    }

    #[test]
    fn key_frame_callbacks_fire_per_crossing() {
        let clock = clock();
        let (cues, bump) = counter();
        let bump = Rc::new(bump);
        let make = |ms| {
            let bump = bump.clone();
            frame(ms).with_on_finished(move || bump())
        };
        let timeline = Timeline::builder()
            .key_frames([make(0.0), make(200.0)])
            .cycle_count(2)
            .scheduler(clock.clone())
            .build()
            .unwrap();

        timeline.play();
        clock.run_until_idle(2000.0);
        assert_eq!(cues.get(), 4);

        cues.set(0);
        timeline.set_auto_reverse(true);
        timeline.play();
        clock.run_until_idle(2000.0);
        // The turnaround at 200ms is crossed once
        assert_eq!(cues.get(), 3);
    }

    #[test]
    fn indefinite_loops_until_stopped() {
        let clock = clock();
        let x = Property::new(0.0);
        let timeline = Timeline::with_scheduler(
            [frame(200.0).with_value(KeyValue::new(&x, 10.0))],
            clock.clone(),
        );
        timeline.set_cycle_count(INDEFINITE).unwrap();
        assert!(timeline.total_duration().is_indefinite());

        timeline.play();
        assert!(!clock.run_until_idle(1000.0));
        assert_eq!(timeline.status(), AnimationStatus::Running);
        timeline.stop();
        assert!(!clock.has_pending());
    }

    #[test]
    fn end_value_reads_the_last_key_value() {
        let x = Property::new(0.0);
        let unused = Property::new(0.0);
        let timeline = Timeline::with_scheduler(
            [
                frame(500.0).with_value(KeyValue::new(&x, 7.0)),
                frame(100.0).with_value(KeyValue::new(&x, 3.0)),
            ],
            clock(),
        );

        assert_eq!(timeline.end_value(&x), Some(7.0));
        assert_eq!(timeline.end_value(&unused), None);
        assert_eq!(timeline.cycle_duration(), Duration::millis(500.0));
    }

    #[test]
    fn rejects_zero_cycles() {
        assert!(Timeline::builder().cycle_count(0).scheduler(clock()).build().is_err());
        let timeline = Timeline::with_scheduler(Vec::<KeyFrame>::new(), clock());
        assert!(timeline.set_cycle_count(-3).is_err());
        assert_eq!(timeline.cycle_count(), 1);
    }

    #[test]
    fn status_property_is_observable() {
        let clock = clock();
        let x = Property::new(0.0);
        let timeline = Timeline::with_scheduler(
            [frame(100.0).with_value(KeyValue::new(&x, 1.0))],
            clock.clone(),
        );
        let seen = Rc::new(RefCell::new(Vec::new()));
        timeline.status_property().on_change({
            let seen = seen.clone();
            move |_, status| seen.borrow_mut().push(*status)
        });

        timeline.play();
        timeline.pause();
        timeline.play();
        clock.run_until_idle(1000.0);
        assert_eq!(
            *seen.borrow(),
            vec![
                AnimationStatus::Running,
                AnimationStatus::Paused,
                AnimationStatus::Running,
                AnimationStatus::Stopped,
            ]
        );
    }
}
