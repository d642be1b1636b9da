// ============================================================================
// jux-reactive - Interpolators
// Easing curves mapping a linear fraction onto an eased one
// ============================================================================
//
// `curve(t)` takes t in [0, 1] (inputs outside are clamped) and returns the
// eased fraction. The result is not bounded to [0, 1]: overshoot, elastic
// and spring curves leave that range on purpose. Every built-in maps 0 to 0
// and 1 to 1.
// ============================================================================

use std::f64::consts::PI;
use std::fmt;
use std::rc::Rc;

use crate::animation::duration::Duration;
use crate::core::constants::{DEFAULT_OVERSHOOT_TENSION, SPLINE_EPSILON, SPLINE_NEWTON_ITERATIONS};
use crate::error::{JuxError, Result};

/// An easing curve.
///
/// # Example
///
/// ```
/// use jux_reactive::animation::Interpolator;
///
/// let ease = Interpolator::EASE_BOTH;
/// assert!((ease.curve(0.25) + ease.curve(0.75) - 1.0).abs() < 1e-6);
///
/// let blended: f64 = Interpolator::LINEAR.interpolate(&0.0, &10.0, 0.3);
/// assert!((blended - 3.0).abs() < 1e-9);
/// ```
#[derive(Clone)]
pub enum Interpolator {
    Linear,
    /// Holds the start value until the fraction reaches 1
    Discrete,
    EaseIn,
    EaseOut,
    EaseBoth,
    Bounce,
    Elastic,
    /// Cubic bezier through (0,0), (x1,y1), (x2,y2), (1,1)
    Spline { x1: f64, y1: f64, x2: f64, y2: f64 },
    /// `count` equal jumps, each taken at the end of its interval
    Steps { count: u32 },
    /// Back-ease that pulls past the end value before settling
    Overshoot { tension: f64 },
    /// Damped spring settling on 1
    Spring { damping: f64, stiffness: f64 },
    Custom(Rc<dyn Fn(f64) -> f64>),
}

impl Interpolator {
    pub const LINEAR: Interpolator = Interpolator::Linear;
    pub const DISCRETE: Interpolator = Interpolator::Discrete;
    pub const EASE_IN: Interpolator = Interpolator::EaseIn;
    pub const EASE_OUT: Interpolator = Interpolator::EaseOut;
    pub const EASE_BOTH: Interpolator = Interpolator::EaseBoth;
    pub const BOUNCE: Interpolator = Interpolator::Bounce;
    pub const ELASTIC: Interpolator = Interpolator::Elastic;
    /// The classic back-ease
    pub const OVERSHOOT: Interpolator = Interpolator::Overshoot {
        tension: DEFAULT_OVERSHOOT_TENSION,
    };

    /// Cubic bezier easing. Control points must lie in `[0, 1]`.
    pub fn spline(x1: f64, y1: f64, x2: f64, y2: f64) -> Result<Interpolator> {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        if !(in_unit(x1) && in_unit(y1) && in_unit(x2) && in_unit(y2)) {
            return Err(JuxError::illegal(format!(
                "spline control points ({x1}, {y1}), ({x2}, {y2}) must lie in [0, 1]"
            )));
        }
        Ok(Interpolator::Spline { x1, y1, x2, y2 })
    }

    pub fn steps(count: u32) -> Result<Interpolator> {
        if count < 1 {
            return Err(JuxError::illegal("step count must be at least 1"));
        }
        Ok(Interpolator::Steps { count })
    }

    pub fn overshoot(tension: f64) -> Result<Interpolator> {
        if !tension.is_finite() || tension < 0.0 {
            return Err(JuxError::illegal(format!(
                "overshoot tension {tension} must be finite and non-negative"
            )));
        }
        Ok(Interpolator::Overshoot { tension })
    }

    pub fn spring(damping: f64, stiffness: f64) -> Result<Interpolator> {
        if !damping.is_finite() || damping < 0.0 {
            return Err(JuxError::illegal(format!(
                "spring damping {damping} must be finite and non-negative"
            )));
        }
        if !stiffness.is_finite() || stiffness <= 0.0 {
            return Err(JuxError::illegal(format!(
                "spring stiffness {stiffness} must be finite and positive"
            )));
        }
        Ok(Interpolator::Spring { damping, stiffness })
    }

    pub fn custom(curve: impl Fn(f64) -> f64 + 'static) -> Interpolator {
        Interpolator::Custom(Rc::new(curve))
    }

    /// Map a linear fraction onto this curve.
    pub fn curve(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Interpolator::Linear => t,
            Interpolator::Discrete => {
                if t < 1.0 {
                    0.0
                } else {
                    1.0
                }
            }
            Interpolator::EaseIn => t * t * t,
            Interpolator::EaseOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            // Smoothstep: symmetric about (0.5, 0.5)
            Interpolator::EaseBoth => t * t * (3.0 - 2.0 * t),
            Interpolator::Bounce => bounce(t),
            Interpolator::Elastic => elastic(t),
            Interpolator::Spline { x1, y1, x2, y2 } => {
                let s = solve_bezier_x(t, *x1, *x2);
                bezier(s, *y1, *y2)
            }
            Interpolator::Steps { count } => {
                let n = f64::from(*count);
                (t * n).floor() / n
            }
            Interpolator::Overshoot { tension } => {
                let u = t - 1.0;
                1.0 + (tension + 1.0) * u * u * u + tension * u * u
            }
            Interpolator::Spring { damping, stiffness } => spring(t, *damping, *stiffness),
            Interpolator::Custom(curve) => curve(t),
        }
    }

    /// Blend `start` toward `end` by `curve(fraction)`.
    ///
    /// Types that cannot blend ignore the curve: they hold `start` until the
    /// raw `fraction` reaches 1, however far the curve overshoots before that.
    pub fn interpolate<T: Interpolatable>(&self, start: &T, end: &T, fraction: f64) -> T {
        if T::SNAPS {
            T::interpolate(start, end, fraction.clamp(0.0, 1.0))
        } else {
            T::interpolate(start, end, self.curve(fraction))
        }
    }
}

impl Default for Interpolator {
    fn default() -> Self {
        Interpolator::LINEAR
    }
}

impl fmt::Debug for Interpolator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interpolator::Linear => write!(f, "LINEAR"),
            Interpolator::Discrete => write!(f, "DISCRETE"),
            Interpolator::EaseIn => write!(f, "EASE_IN"),
            Interpolator::EaseOut => write!(f, "EASE_OUT"),
            Interpolator::EaseBoth => write!(f, "EASE_BOTH"),
            Interpolator::Bounce => write!(f, "BOUNCE"),
            Interpolator::Elastic => write!(f, "ELASTIC"),
            Interpolator::Spline { x1, y1, x2, y2 } => {
                write!(f, "Spline({x1}, {y1}, {x2}, {y2})")
            }
            Interpolator::Steps { count } => write!(f, "Steps({count})"),
            Interpolator::Overshoot { tension } => write!(f, "Overshoot({tension})"),
            Interpolator::Spring { damping, stiffness } => {
                write!(f, "Spring({damping}, {stiffness})")
            }
            Interpolator::Custom(_) => write!(f, "Custom"),
        }
    }
}

// =============================================================================
// CURVES
// =============================================================================

fn bounce(t: f64) -> f64 {
    const N: f64 = 7.5625;
    const D: f64 = 2.75;
    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984375
    }
}

fn elastic(t: f64) -> f64 {
    if t == 0.0 || t == 1.0 {
        return t;
    }
    let period = (2.0 * PI) / 3.0;
    2f64.powf(-10.0 * t) * ((t * 10.0 - 0.75) * period).sin() + 1.0
}

/// Spring response with the residual at t = 1 spread linearly over the unit
/// interval, so the curve ends on 1 without a jump on the last frame even
/// when the spring has not settled yet.
fn spring(t: f64, damping: f64, stiffness: f64) -> f64 {
    if t == 0.0 || t == 1.0 {
        return t;
    }
    let residual = 1.0 - spring_response(1.0, damping, stiffness);
    spring_response(t, damping, stiffness) + residual * t
}

/// Unit-mass damped oscillator released at rest from 0 toward 1.
fn spring_response(t: f64, damping: f64, stiffness: f64) -> f64 {
    let w0 = stiffness.sqrt();
    let zeta = damping / (2.0 * w0);

    if zeta < 1.0 {
        let wd = w0 * (1.0 - zeta * zeta).sqrt();
        1.0 - (-zeta * w0 * t).exp() * (wd * t).cos()
    } else if zeta == 1.0 {
        1.0 - (-w0 * t).exp() * (1.0 + w0 * t)
    } else {
        let root = (zeta * zeta - 1.0).sqrt();
        let r1 = w0 * (-zeta + root);
        let r2 = w0 * (-zeta - root);
        // Starts at rest at 0
        let c2 = r1 / (r2 - r1);
        let c1 = -1.0 - c2;
        1.0 + c1 * (r1 * t).exp() + c2 * (r2 * t).exp()
    }
}

/// One coordinate of the cubic bezier with endpoints 0 and 1.
fn bezier(s: f64, p1: f64, p2: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

fn bezier_slope(s: f64, p1: f64, p2: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// Find the curve parameter whose x coordinate is `x`.
///
/// Newton-Raphson first; bisection when the slope vanishes or Newton does
/// not converge. x(s) is monotonic because x1 and x2 lie in [0, 1].
fn solve_bezier_x(x: f64, x1: f64, x2: f64) -> f64 {
    let mut s = x;
    for _ in 0..SPLINE_NEWTON_ITERATIONS {
        let error = bezier(s, x1, x2) - x;
        if error.abs() < SPLINE_EPSILON {
            return s;
        }
        let slope = bezier_slope(s, x1, x2);
        if slope.abs() < 1e-6 {
            break;
        }
        s -= error / slope;
    }

    let (mut lower, mut upper) = (0.0, 1.0);
    s = x;
    while upper - lower > SPLINE_EPSILON {
        let value = bezier(s, x1, x2);
        if (value - x).abs() < SPLINE_EPSILON {
            break;
        }
        if value < x {
            lower = s;
        } else {
            upper = s;
        }
        s = (lower + upper) / 2.0;
    }
    s
}

// =============================================================================
// INTERPOLATABLE
// =============================================================================

/// A value type a timeline can blend.
///
/// The default implementation cannot blend: it holds `start` and snaps to
/// `end` once the fraction reaches 1. Types that override `interpolate` with
/// a real blend set `SNAPS` to false so they receive the eased fraction.
pub trait Interpolatable: Clone + PartialEq + 'static {
    /// Whether [`Interpolator::interpolate`] passes the raw fraction, bypassing the curve
    const SNAPS: bool = true;

    fn interpolate(start: &Self, end: &Self, fraction: f64) -> Self {
        if fraction >= 1.0 {
            end.clone()
        } else {
            start.clone()
        }
    }
}

impl Interpolatable for f64 {
    const SNAPS: bool = false;

    fn interpolate(start: &f64, end: &f64, fraction: f64) -> f64 {
        start + (end - start) * fraction
    }
}

impl Interpolatable for f32 {
    const SNAPS: bool = false;

    fn interpolate(start: &f32, end: &f32, fraction: f64) -> f32 {
        (f64::from(*start) + (f64::from(*end) - f64::from(*start)) * fraction) as f32
    }
}

impl Interpolatable for i32 {
    const SNAPS: bool = false;

    fn interpolate(start: &i32, end: &i32, fraction: f64) -> i32 {
        let blended = f64::from(*start) + (f64::from(*end) - f64::from(*start)) * fraction;
        blended.round() as i32
    }
}

impl Interpolatable for i64 {
    const SNAPS: bool = false;

    fn interpolate(start: &i64, end: &i64, fraction: f64) -> i64 {
        let blended = *start as f64 + (*end as f64 - *start as f64) * fraction;
        blended.round() as i64
    }
}

impl Interpolatable for Duration {
    const SNAPS: bool = false;

    fn interpolate(start: &Duration, end: &Duration, fraction: f64) -> Duration {
        Duration::millis(f64::interpolate(
            &start.to_millis(),
            &end.to_millis(),
            fraction,
        ))
    }
}

impl Interpolatable for bool {}
impl Interpolatable for char {}
impl Interpolatable for String {}
impl Interpolatable for &'static str {}
