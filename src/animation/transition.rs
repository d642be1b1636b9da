// ============================================================================
// jux-reactive - Transitions
// One-property animations that build a small Timeline on play
// ============================================================================
//
// Every transition animates one or two DoubleProperty slots of a Node from a
// start value to an end value over its duration:
// - start: `from` if set, otherwise the live value at play time
// - end: `to` if set, otherwise start + `by`, otherwise start
// Unset values are NaN.
//
// play() from STOPPED resolves both ends and builds a fresh two-KeyFrame
// Timeline; play() from PAUSED resumes that Timeline.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::animation::duration::Duration;
use crate::animation::interpolator::Interpolator;
use crate::animation::key_frame::KeyFrame;
use crate::animation::key_value::KeyValue;
use crate::animation::scheduler::FrameScheduler;
use crate::animation::timeline::{AnimationStatus, Timeline};
use crate::core::constants::DEFAULT_TRANSITION_DURATION_MS;
use crate::error::{JuxError, Result};
use crate::primitives::property::DoubleProperty;

// =============================================================================
// NODE
// =============================================================================

/// The animatable visual state of one element.
#[derive(Clone, Debug)]
pub struct Node {
    pub opacity: DoubleProperty,
    pub scale_x: DoubleProperty,
    pub scale_y: DoubleProperty,
    /// Degrees.
    pub rotate: DoubleProperty,
    pub translate_x: DoubleProperty,
    pub translate_y: DoubleProperty,
}

impl Node {
    /// Opaque, unscaled, unrotated, untranslated.
    pub fn new() -> Self {
        Self {
            opacity: DoubleProperty::new(1.0),
            scale_x: DoubleProperty::new(1.0),
            scale_y: DoubleProperty::new(1.0),
            rotate: DoubleProperty::new(0.0),
            translate_x: DoubleProperty::new(0.0),
            translate_y: DoubleProperty::new(0.0),
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// SHARED PLAYBACK
// =============================================================================

/// One animated slot with its from/to/by, resolved at play time.
struct Channel {
    from: f64,
    to: f64,
    by: f64,
}

impl Channel {
    const UNSET: Channel = Channel {
        from: f64::NAN,
        to: f64::NAN,
        by: f64::NAN,
    };

    fn resolve(&self, live: f64) -> (f64, f64) {
        let start = if self.from.is_nan() { live } else { self.from };
        let end = if !self.to.is_nan() {
            self.to
        } else if !self.by.is_nan() {
            start + self.by
        } else {
            start
        };
        (start, end)
    }
}

struct Playback {
    duration: Duration,
    interpolator: Interpolator,
    cycle_count: i32,
    auto_reverse: bool,
    on_finished: Option<Rc<dyn Fn()>>,
    scheduler: Option<Rc<dyn FrameScheduler>>,
    timeline: RefCell<Option<Timeline>>,
}

impl Playback {
    fn new(duration: Duration) -> Self {
        Self {
            duration,
            interpolator: Interpolator::EASE_BOTH,
            cycle_count: 1,
            auto_reverse: false,
            on_finished: None,
            scheduler: None,
            timeline: RefCell::new(None),
        }
    }

    fn current(&self) -> Option<Timeline> {
        self.timeline.borrow().clone()
    }

    /// Resume a paused run. Returns false when a fresh run is needed.
    fn resume(&self) -> bool {
        match self.current() {
            Some(timeline) if timeline.status() == AnimationStatus::Running => true,
            Some(timeline) if timeline.status() == AnimationStatus::Paused => {
                timeline.play();
                true
            }
            _ => false,
        }
    }

    /// Animate each `(target, start, end)` over the duration.
    fn start(&self, kind: &'static str, channels: &[(&DoubleProperty, f64, f64)]) -> Result<()> {
        let mut first = KeyFrame::new(Duration::ZERO)?;
        let mut last = KeyFrame::new(self.duration)?;
        for &(target, start, end) in channels {
            first = first.with_value(KeyValue::new(target, start));
            last = last.with_value(KeyValue::with_interpolator(
                target,
                end,
                self.interpolator.clone(),
            ));
        }

        let mut builder = Timeline::builder()
            .key_frames([first, last])
            .cycle_count(self.cycle_count)
            .auto_reverse(self.auto_reverse);
        if let Some(scheduler) = &self.scheduler {
            builder = builder.scheduler(scheduler.clone());
        }
        if let Some(on_finished) = &self.on_finished {
            let on_finished = on_finished.clone();
            builder = builder.on_finished(move || on_finished());
        }
        let timeline = builder.build()?;
        tracing::debug!(
            kind,
            duration_ms = self.duration.to_millis(),
            channels = channels.len(),
            "transition timeline built"
        );

        *self.timeline.borrow_mut() = Some(timeline.clone());
        timeline.play();
        Ok(())
    }

    fn pause(&self) {
        if let Some(timeline) = self.current() {
            timeline.pause();
        }
    }

    fn stop(&self) {
        if let Some(timeline) = self.current() {
            timeline.stop();
        }
    }

    fn status(&self) -> AnimationStatus {
        self.current().map_or(AnimationStatus::Stopped, |t| t.status())
    }
}

/// Chained setters and playback controls every transition shares.
macro_rules! transition_common {
    ($ty:ident) => {
        impl $ty {
            pub fn duration(mut self, duration: Duration) -> Self {
                self.playback.duration = duration;
                self
            }

            /// Defaults to [`Interpolator::EASE_BOTH`].
            pub fn interpolator(mut self, interpolator: Interpolator) -> Self {
                self.playback.interpolator = interpolator;
                self
            }

            pub fn cycle_count(mut self, count: i32) -> Self {
                self.playback.cycle_count = count;
                self
            }

            pub fn auto_reverse(mut self, auto_reverse: bool) -> Self {
                self.playback.auto_reverse = auto_reverse;
                self
            }

            pub fn on_finished(mut self, f: impl Fn() + 'static) -> Self {
                self.playback.on_finished = Some(Rc::new(f));
                self
            }

            pub fn scheduler(mut self, scheduler: Rc<dyn FrameScheduler>) -> Self {
                self.playback.scheduler = Some(scheduler);
                self
            }

            pub fn pause(&self) {
                self.playback.pause();
            }

            pub fn stop(&self) {
                self.playback.stop();
            }

            pub fn status(&self) -> AnimationStatus {
                self.playback.status()
            }

            /// The Timeline of the current or last run.
            pub fn timeline(&self) -> Option<Timeline> {
                self.playback.current()
            }
        }

        impl Default for $ty {
            fn default() -> Self {
                Self::new(Duration::millis(DEFAULT_TRANSITION_DURATION_MS))
            }
        }
    };
}

fn required(node: &Option<Node>) -> Result<&Node> {
    node.as_ref().ok_or(JuxError::NullArgument { name: "node" })
}

// =============================================================================
// FADE
// =============================================================================

/// Animates `opacity`.
pub struct FadeTransition {
    playback: Playback,
    node: Option<Node>,
    channel: Channel,
}

impl FadeTransition {
    pub fn new(duration: Duration) -> Self {
        Self {
            playback: Playback::new(duration),
            node: None,
            channel: Channel::UNSET,
        }
    }

    pub fn node(mut self, node: &Node) -> Self {
        self.node = Some(node.clone());
        self
    }

    pub fn from_value(mut self, value: f64) -> Self {
        self.channel.from = value;
        self
    }

    pub fn to_value(mut self, value: f64) -> Self {
        self.channel.to = value;
        self
    }

    pub fn by_value(mut self, value: f64) -> Self {
        self.channel.by = value;
        self
    }

    /// Fails with `NullArgument` when no node was set.
    pub fn play(&self) -> Result<()> {
        if self.playback.resume() {
            return Ok(());
        }
        let node = required(&self.node)?;
        let (start, end) = self.channel.resolve(node.opacity.get());
        self.playback.start("fade", &[(&node.opacity, start, end)])
    }
}

transition_common!(FadeTransition);

// =============================================================================
// ROTATE
// =============================================================================

/// Animates `rotate`, in degrees.
pub struct RotateTransition {
    playback: Playback,
    node: Option<Node>,
    channel: Channel,
}

impl RotateTransition {
    pub fn new(duration: Duration) -> Self {
        Self {
            playback: Playback::new(duration),
            node: None,
            channel: Channel::UNSET,
        }
    }

    pub fn node(mut self, node: &Node) -> Self {
        self.node = Some(node.clone());
        self
    }

    pub fn from_angle(mut self, degrees: f64) -> Self {
        self.channel.from = degrees;
        self
    }

    pub fn to_angle(mut self, degrees: f64) -> Self {
        self.channel.to = degrees;
        self
    }

    pub fn by_angle(mut self, degrees: f64) -> Self {
        self.channel.by = degrees;
        self
    }

    pub fn play(&self) -> Result<()> {
        if self.playback.resume() {
            return Ok(());
        }
        let node = required(&self.node)?;
        let (start, end) = self.channel.resolve(node.rotate.get());
        self.playback.start("rotate", &[(&node.rotate, start, end)])
    }
}

transition_common!(RotateTransition);

// =============================================================================
// SCALE AND SLIDE
// =============================================================================

/// Animates `scale_x` and `scale_y`.
pub struct ScaleTransition {
    playback: Playback,
    node: Option<Node>,
    x: Channel,
    y: Channel,
}

impl ScaleTransition {
    pub fn new(duration: Duration) -> Self {
        Self {
            playback: Playback::new(duration),
            node: None,
            x: Channel::UNSET,
            y: Channel::UNSET,
        }
    }

    pub fn node(mut self, node: &Node) -> Self {
        self.node = Some(node.clone());
        self
    }

    pub fn from_x(mut self, value: f64) -> Self {
        self.x.from = value;
        self
    }

    pub fn from_y(mut self, value: f64) -> Self {
        self.y.from = value;
        self
    }

    pub fn to_x(mut self, value: f64) -> Self {
        self.x.to = value;
        self
    }

    pub fn to_y(mut self, value: f64) -> Self {
        self.y.to = value;
        self
    }

    pub fn by_x(mut self, value: f64) -> Self {
        self.x.by = value;
        self
    }

    pub fn by_y(mut self, value: f64) -> Self {
        self.y.by = value;
        self
    }

    pub fn play(&self) -> Result<()> {
        if self.playback.resume() {
            return Ok(());
        }
        let node = required(&self.node)?;
        let (x0, x1) = self.x.resolve(node.scale_x.get());
        let (y0, y1) = self.y.resolve(node.scale_y.get());
        self.playback
            .start("scale", &[(&node.scale_x, x0, x1), (&node.scale_y, y0, y1)])
    }
}

transition_common!(ScaleTransition);

/// Animates `translate_x` and `translate_y`.
pub struct SlideTransition {
    playback: Playback,
    node: Option<Node>,
    x: Channel,
    y: Channel,
}

impl SlideTransition {
    pub fn new(duration: Duration) -> Self {
        Self {
            playback: Playback::new(duration),
            node: None,
            x: Channel::UNSET,
            y: Channel::UNSET,
        }
    }

    pub fn node(mut self, node: &Node) -> Self {
        self.node = Some(node.clone());
        self
    }

    pub fn from_x(mut self, value: f64) -> Self {
        self.x.from = value;
        self
    }

    pub fn from_y(mut self, value: f64) -> Self {
        self.y.from = value;
        self
    }

    pub fn to_x(mut self, value: f64) -> Self {
        self.x.to = value;
        self
    }

    pub fn to_y(mut self, value: f64) -> Self {
        self.y.to = value;
        self
    }

    pub fn by_x(mut self, value: f64) -> Self {
        self.x.by = value;
        self
    }

    pub fn by_y(mut self, value: f64) -> Self {
        self.y.by = value;
        self
    }

    pub fn play(&self) -> Result<()> {
        if self.playback.resume() {
            return Ok(());
        }
        let node = required(&self.node)?;
        let (x0, x1) = self.x.resolve(node.translate_x.get());
        let (y0, y1) = self.y.resolve(node.translate_y.get());
        self.playback.start(
            "slide",
            &[(&node.translate_x, x0, x1), (&node.translate_y, y0, y1)],
        )
    }
}

transition_common!(SlideTransition);

// =============================================================================
// PAUSE
// =============================================================================

/// Waits for its duration, then runs `on_finished`. Needs no node.
pub struct PauseTransition {
    playback: Playback,
}

impl PauseTransition {
    pub fn new(duration: Duration) -> Self {
        Self {
            playback: Playback::new(duration),
        }
    }

    pub fn play(&self) -> Result<()> {
        if self.playback.resume() {
            return Ok(());
        }
        self.playback.start("pause", &[])
    }
}

transition_common!(PauseTransition);
