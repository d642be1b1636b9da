// ============================================================================
// jux-reactive - List Utilities
// In-place bulk operations that fire exactly one change event each
// ============================================================================
//
// Reordering operations compute the final order of indices first and then
// apply it as a single permutation, so listeners never observe the
// intermediate states of the sort or shuffle.
// ============================================================================

use std::cmp::Ordering;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::collections::ObservableList;
use crate::error::Result;

/// Sort ascending (stable).
///
/// # Example
///
/// ```
/// use jux_reactive::collections::{observable_array_list, sort};
///
/// let words = observable_array_list(vec!["gamma", "alpha", "beta"]);
/// sort(&words).unwrap();
/// assert_eq!(words.to_vec(), vec!["alpha", "beta", "gamma"]);
/// ```
pub fn sort<E: Clone + Ord + 'static>(list: &ObservableList<E>) -> Result<()> {
    sort_by(list, |a, b| a.cmp(b))
}

/// Sort with a comparator (stable).
pub fn sort_by<E: Clone + 'static>(
    list: &ObservableList<E>,
    mut compare: impl FnMut(&E, &E) -> Ordering,
) -> Result<()> {
    let order = list.with(|elements| {
        let mut order: Vec<usize> = (0..elements.len()).collect();
        order.sort_by(|&a, &b| compare(&elements[a], &elements[b]));
        order
    });
    list.permute(order)
}

/// Reverse the element order.
pub fn reverse<E: Clone + 'static>(list: &ObservableList<E>) -> Result<()> {
    list.permute((0..list.len()).rev().collect())
}

/// Shuffle with the thread-local random generator.
pub fn shuffle<E: Clone + 'static>(list: &ObservableList<E>) -> Result<()> {
    shuffle_with(list, &mut rand::thread_rng())
}

/// Shuffle with a caller-supplied generator (seed it for reproducible tests).
pub fn shuffle_with<E: Clone + 'static, R: Rng + ?Sized>(
    list: &ObservableList<E>,
    rng: &mut R,
) -> Result<()> {
    let mut order: Vec<usize> = (0..list.len()).collect();
    order.shuffle(rng);
    list.permute(order)
}

/// Rotate right by `distance` (negative rotates left).
pub fn rotate<E: Clone + 'static>(list: &ObservableList<E>, distance: isize) -> Result<()> {
    let len = list.len();
    if len == 0 {
        return list.permute(Vec::new());
    }
    let shift = distance.rem_euclid(len as isize) as usize;
    // The element that ends up at `i` came from `i - shift`
    let order = (0..len).map(|i| (i + len - shift) % len).collect();
    list.permute(order)
}

/// Overwrite every element with `value`.
pub fn fill<E: Clone + 'static>(list: &ObservableList<E>, value: E) -> Result<()> {
    let len = list.len();
    list.replace_at((0..len).map(|i| (i, value.clone())).collect())
}

/// Replace every occurrence of `old` with `new`. Returns whether anything
/// matched.
pub fn replace_all<E: Clone + PartialEq + 'static>(
    list: &ObservableList<E>,
    old: &E,
    new: E,
) -> Result<bool> {
    let hits: Vec<(usize, E)> = list.with(|elements| {
        elements
            .iter()
            .enumerate()
            .filter(|(_, e)| *e == old)
            .map(|(i, _)| (i, new.clone()))
            .collect()
    });
    let matched = !hits.is_empty();
    list.replace_at(hits)?;
    Ok(matched)
}
