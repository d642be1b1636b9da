// ============================================================================
// jux-reactive - Animation
// Durations, easing, keyframes, timelines and the frame source driving them
// ============================================================================

mod duration;
mod interpolator;
mod key_frame;
mod key_value;
mod scheduler;
mod timeline;
mod track;
mod transition;

pub use duration::Duration;
pub use interpolator::{Interpolatable, Interpolator};
pub use key_frame::KeyFrame;
pub use key_value::{AnyKeyValue, KeyValue, KeyValueBuilder};
pub use scheduler::{
    FrameCallback, FrameHandle, FrameScheduler, HostFrameScheduler, VirtualFrameScheduler,
    default_scheduler, set_default_scheduler,
};
pub use timeline::{AnimationStatus, Timeline, TimelineBuilder};
pub use track::Track;
pub use transition::{
    FadeTransition, Node, PauseTransition, RotateTransition, ScaleTransition, SlideTransition,
};
