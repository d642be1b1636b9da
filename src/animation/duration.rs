// ============================================================================
// jux-reactive - Duration
// Milliseconds on the animation time axis, with INDEFINITE and UNKNOWN
// ============================================================================

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

use crate::error::{JuxError, Result};

/// An immutable span of animation time, stored as `f64` milliseconds.
///
/// [`Duration::INDEFINITE`] is positive infinity and compares greater than
/// every finite duration. [`Duration::UNKNOWN`] is NaN; it is unordered and
/// poisons arithmetic.
///
/// # Example
///
/// ```
/// use jux_reactive::animation::Duration;
///
/// let d = Duration::seconds(1.5);
/// assert_eq!(d.to_millis(), 1500.0);
/// assert!(Duration::millis(100.0).divide(0.0).is_indefinite());
/// assert!(Duration::INDEFINITE.greater_than(Duration::millis(999_999.0)));
/// assert_eq!(Duration::value_of("250ms").unwrap(), Duration::millis(250.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Duration {
    millis: f64,
}

impl Duration {
    pub const ZERO: Duration = Duration { millis: 0.0 };
    pub const ONE: Duration = Duration { millis: 1.0 };
    pub const INDEFINITE: Duration = Duration {
        millis: f64::INFINITY,
    };
    pub const UNKNOWN: Duration = Duration { millis: f64::NAN };

    pub const fn millis(ms: f64) -> Duration {
        Duration { millis: ms }
    }

    pub fn seconds(s: f64) -> Duration {
        Duration::millis(s * 1000.0)
    }

    pub fn minutes(m: f64) -> Duration {
        Duration::millis(m * 60_000.0)
    }

    pub fn hours(h: f64) -> Duration {
        Duration::millis(h * 3_600_000.0)
    }

    /// Parse `"<number><unit>"` where unit is `ms`, `s`, `m` or `h`.
    pub fn value_of(text: &str) -> Result<Duration> {
        let text = text.trim();
        let (number, unit): (&str, fn(f64) -> Duration) =
            if let Some(number) = text.strip_suffix("ms") {
                (number, Duration::millis)
            } else if let Some(number) = text.strip_suffix('s') {
                (number, Duration::seconds)
            } else if let Some(number) = text.strip_suffix('m') {
                (number, Duration::minutes)
            } else if let Some(number) = text.strip_suffix('h') {
                (number, Duration::hours)
            } else {
                return Err(JuxError::illegal(format!(
                    "duration {text:?} has no ms/s/m/h unit"
                )));
            };
        number
            .trim()
            .parse::<f64>()
            .map(unit)
            .map_err(|_| JuxError::illegal(format!("duration {text:?} is not a number")))
    }

    pub fn to_millis(self) -> f64 {
        self.millis
    }

    pub fn to_seconds(self) -> f64 {
        self.millis / 1000.0
    }

    pub fn to_minutes(self) -> f64 {
        self.millis / 60_000.0
    }

    pub fn to_hours(self) -> f64 {
        self.millis / 3_600_000.0
    }

    pub fn is_indefinite(self) -> bool {
        self.millis == f64::INFINITY
    }

    pub fn is_unknown(self) -> bool {
        self.millis.is_nan()
    }

    pub fn is_finite(self) -> bool {
        self.millis.is_finite()
    }

    pub fn add(self, other: Duration) -> Duration {
        Duration::millis(self.millis + other.millis)
    }

    pub fn subtract(self, other: Duration) -> Duration {
        Duration::millis(self.millis - other.millis)
    }

    pub fn multiply(self, factor: f64) -> Duration {
        Duration::millis(self.millis * factor)
    }

    /// Divide by a scalar. Dividing a positive duration by zero is INDEFINITE.
    pub fn divide(self, divisor: f64) -> Duration {
        Duration::millis(self.millis / divisor)
    }

    /// The ratio of two durations.
    pub fn divide_by(self, other: Duration) -> f64 {
        self.millis / other.millis
    }

    pub fn negate(self) -> Duration {
        Duration::millis(-self.millis)
    }

    pub fn greater_than(self, other: Duration) -> bool {
        self.millis > other.millis
    }

    pub fn greater_than_or_equal(self, other: Duration) -> bool {
        self.millis >= other.millis
    }

    pub fn less_than(self, other: Duration) -> bool {
        self.millis < other.millis
    }

    pub fn less_than_or_equal(self, other: Duration) -> bool {
        self.millis <= other.millis
    }

    /// Total order for sorting: UNKNOWN sorts after INDEFINITE.
    pub fn total_cmp(&self, other: &Duration) -> Ordering {
        self.millis.total_cmp(&other.millis)
    }

    pub fn min(self, other: Duration) -> Duration {
        if other.millis < self.millis { other } else { self }
    }

    pub fn max(self, other: Duration) -> Duration {
        if other.millis > self.millis { other } else { self }
    }
}

impl Add for Duration {
    type Output = Duration;

    fn add(self, other: Duration) -> Duration {
        Duration::add(self, other)
    }
}

impl Sub for Duration {
    type Output = Duration;

    fn sub(self, other: Duration) -> Duration {
        self.subtract(other)
    }
}

impl Mul<f64> for Duration {
    type Output = Duration;

    fn mul(self, factor: f64) -> Duration {
        self.multiply(factor)
    }
}

impl Div<f64> for Duration {
    type Output = Duration;

    fn div(self, divisor: f64) -> Duration {
        self.divide(divisor)
    }
}

impl Neg for Duration {
    type Output = Duration;

    fn neg(self) -> Duration {
        self.negate()
    }
}

impl FromStr for Duration {
    type Err = JuxError;

    fn from_str(s: &str) -> Result<Duration> {
        Duration::value_of(s)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_indefinite() {
            write!(f, "INDEFINITE")
        } else if self.is_unknown() {
            write!(f, "UNKNOWN")
        } else {
            write!(f, "{:?}ms", self.millis)
        }
    }
}
