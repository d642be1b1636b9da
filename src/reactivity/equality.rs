// ============================================================================
// jux-reactive - Equality Functions
// Comparisons used by the comparison bindings
// ============================================================================
//
// Change suppression everywhere in the graph uses plain `PartialEq`, which
// for floats is IEEE `==`: NaN never equals NaN, so a NaN assignment always
// counts as a change. The helpers below are for the explicit comparison
// bindings only.
// ============================================================================

/// Strict equality using PartialEq.
///
/// # Example
/// ```
/// use jux_reactive::reactivity::equality::equals;
///
/// assert!(equals(&42, &42));
/// assert!(!equals(&f64::NAN, &f64::NAN));
/// ```
pub fn equals<T: PartialEq>(a: &T, b: &T) -> bool {
    a == b
}

/// `|a - b| <= epsilon`.
///
/// NaN on either side is never within any epsilon.
///
/// # Example
/// ```
/// use jux_reactive::reactivity::equality::within_epsilon;
///
/// assert!(within_epsilon(1.0, 1.05, 0.1));
/// assert!(!within_epsilon(1.0, 1.5, 0.1));
/// ```
pub fn within_epsilon(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() <= epsilon
}

/// Case-insensitive string equality (Unicode lowercase folding).
pub fn equals_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
