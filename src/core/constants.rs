// ============================================================================
// jux-reactive - Constants
// Tunables for bindings, interpolation and frame scheduling
// ============================================================================

// =============================================================================
// FRAME SCHEDULING
// =============================================================================

/// Frame interval used by `VirtualFrameScheduler::tick()` (60 frames per second)
pub const DEFAULT_FRAME_INTERVAL_MS: f64 = 1000.0 / 60.0;

/// Cycle count that makes a timeline loop until stopped
pub const INDEFINITE: i32 = -1;

/// Duration of a transition that was not given one
pub const DEFAULT_TRANSITION_DURATION_MS: f64 = 400.0;

// =============================================================================
// INTERPOLATION
// =============================================================================

/// Newton-Raphson iterations for solving cubic bezier x(t) = x
pub const SPLINE_NEWTON_ITERATIONS: usize = 8;

/// Precision at which the bezier solver stops refining
pub const SPLINE_EPSILON: f64 = 1e-7;

/// Tension used by `Interpolator::overshoot` callers that want the classic back-ease
pub const DEFAULT_OVERSHOOT_TENSION: f64 = 1.70158;

// =============================================================================
// BINDINGS
// =============================================================================

/// Tolerance used by `bindings::equal_with_epsilon` callers that have no better value
pub const DEFAULT_EPSILON: f64 = 1e-9;
