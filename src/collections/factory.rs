// ============================================================================
// jux-reactive - Collection Factories
// Wrapping, read-only views, and the immutable empty/singleton instances
// ============================================================================

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::rc::Rc;

use crate::collections::{Mutability, ObservableList, ObservableMap, ObservableSet};

// =============================================================================
// LISTS
// =============================================================================

/// A new mutable list holding a copy of `elements`.
pub fn observable_array_list<E: Clone + 'static>(
    elements: impl IntoIterator<Item = E>,
) -> ObservableList<E> {
    ObservableList::from_vec(elements.into_iter().collect())
}

/// A mutable list backed by the caller's vector.
///
/// Mutations made through the list are visible in `backing`. Writes made to
/// `backing` directly bypass notification.
pub fn observable_list<E: Clone + 'static>(backing: Rc<RefCell<Vec<E>>>) -> ObservableList<E> {
    ObservableList::with_backing(backing, Mutability::Mutable)
}

/// A read-only view of `list`.
///
/// Every mutator fails with `UnsupportedOperation`. Changes made through
/// `list` are visible through the view and reach listeners registered on it.
///
/// # Example
///
/// ```
/// use jux_reactive::collections::{observable_array_list, unmodifiable_observable_list};
///
/// let backing = observable_array_list(vec![1]);
/// let view = unmodifiable_observable_list(&backing);
/// assert!(view.add(2).is_err());
///
/// backing.add(2).unwrap();
/// assert_eq!(view.to_vec(), vec![1, 2]);
/// ```
pub fn unmodifiable_observable_list<E: Clone + 'static>(
    list: &ObservableList<E>,
) -> ObservableList<E> {
    list.view(Mutability::Unmodifiable)
}

/// The shared immutable empty list for `E`. Every call returns the same list.
pub fn empty_observable_list<E: Clone + 'static>() -> ObservableList<E> {
    empty_instance(|| ObservableList::with_backing(Rc::default(), Mutability::Immutable))
}

/// An immutable list holding exactly `element`.
pub fn singleton_observable_list<E: Clone + 'static>(element: E) -> ObservableList<E> {
    ObservableList::with_backing(
        Rc::new(RefCell::new(vec![element])),
        Mutability::Immutable,
    )
}

/// A new, independent, mutable list holding the elements of every input in
/// order. Later changes to the inputs do not affect it.
pub fn concat<E: Clone + 'static>(lists: &[&ObservableList<E>]) -> ObservableList<E> {
    let mut data = Vec::with_capacity(lists.iter().map(|l| l.len()).sum());
    for list in lists {
        list.with(|elements| data.extend_from_slice(elements));
    }
    ObservableList::from_vec(data)
}

// =============================================================================
// MAPS + SETS
// =============================================================================

/// A mutable map backed by the caller's map.
pub fn observable_map<K, V>(backing: Rc<RefCell<HashMap<K, V>>>) -> ObservableMap<K, V>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + PartialEq + 'static,
{
    ObservableMap::with_backing(backing, Mutability::Mutable)
}

pub fn observable_hash_map<K, V>() -> ObservableMap<K, V>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + PartialEq + 'static,
{
    ObservableMap::new()
}

/// A read-only view of `map`.
pub fn unmodifiable_observable_map<K, V>(map: &ObservableMap<K, V>) -> ObservableMap<K, V>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + PartialEq + 'static,
{
    map.view(Mutability::Unmodifiable)
}

pub fn empty_observable_map<K, V>() -> ObservableMap<K, V>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + PartialEq + 'static,
{
    empty_instance(|| ObservableMap::with_backing(Rc::default(), Mutability::Immutable))
}

/// A mutable set backed by the caller's set.
pub fn observable_set<E: Eq + Hash + Clone + 'static>(
    backing: Rc<RefCell<HashSet<E>>>,
) -> ObservableSet<E> {
    ObservableSet::with_backing(backing, Mutability::Mutable)
}

pub fn observable_hash_set<E: Eq + Hash + Clone + 'static>(
    elements: impl IntoIterator<Item = E>,
) -> ObservableSet<E> {
    elements.into_iter().collect()
}

/// A read-only view of `set`.
pub fn unmodifiable_observable_set<E: Eq + Hash + Clone + 'static>(
    set: &ObservableSet<E>,
) -> ObservableSet<E> {
    set.view(Mutability::Unmodifiable)
}

pub fn empty_observable_set<E: Eq + Hash + Clone + 'static>() -> ObservableSet<E> {
    empty_instance(|| ObservableSet::with_backing(Rc::default(), Mutability::Immutable))
}

// =============================================================================
// EMPTY INSTANCE REGISTRY
// =============================================================================

thread_local! {
    // One immutable empty collection per concrete type. Collections are Rc
    // based, so "process wide" means per thread.
    static EMPTY_INSTANCES: RefCell<HashMap<TypeId, Box<dyn Any>>> = RefCell::new(HashMap::new());
}

fn empty_instance<C: Clone + 'static>(make: impl FnOnce() -> C) -> C {
    EMPTY_INSTANCES.with(|instances| {
        let key = TypeId::of::<C>();
        if let Some(existing) = instances
            .borrow()
            .get(&key)
            .and_then(|boxed| boxed.downcast_ref::<C>())
        {
            return existing.clone();
        }
        let instance = make();
        instances
            .borrow_mut()
            .insert(key, Box::new(instance.clone()));
        instance
    })
}
