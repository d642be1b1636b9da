// ============================================================================
// jux-reactive - Observable Collections
// Lists, maps and sets that describe each mutation to their listeners
// ============================================================================
//
// Every structural mutation produces exactly one change event. Operations
// that logically touch several places (retain, replace_all) put several
// sub-changes into that one event; reordering operations (sort, reverse,
// shuffle, rotate) deliver a single permutation.
//
// Each collection is also an `Observable`: its invalidation listeners fire
// once per mutation, so bindings can depend on a collection directly.
// ============================================================================

mod change;
mod factory;
mod list;
mod map;
mod set;
mod utils;

pub use change::{
    ListChange, ListSubChange, MapChange, MapEntryChange, SetChange, SetEntryChange,
};
pub use factory::{
    concat, empty_observable_list, empty_observable_map, empty_observable_set,
    observable_array_list, observable_hash_map, observable_hash_set, observable_list,
    observable_map, observable_set, singleton_observable_list, unmodifiable_observable_list,
    unmodifiable_observable_map, unmodifiable_observable_set,
};
pub use list::{ListChangeListener, ObservableList};
pub use map::{MapChangeListener, ObservableMap};
pub use set::{ObservableSet, SetChangeListener};
pub use utils::{fill, replace_all, reverse, rotate, shuffle, shuffle_with, sort, sort_by};

/// Whether a collection handle accepts mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mutability {
    /// Ordinary collection
    Mutable,
    /// Read-only view of a collection that may still change underneath
    Unmodifiable,
    /// Empty or singleton instance that never changes
    Immutable,
}
