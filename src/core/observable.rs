// ============================================================================
// jux-reactive - Observable Contracts
// Type-erased traits shared by every node of the dependency graph
// ============================================================================
//
// Graph plumbing (attach a listener, ask whether a cache is valid) does not
// need to know the value type, so `Observable` is object safe and stored as
// `Rc<dyn Observable>` in dependency lists. Reading a value and receiving
// old/new pairs needs `T`, which is what `ObservableValue<T>` adds.
// ============================================================================

use std::rc::Rc;

use super::listener::ListenerId;

/// Invalidation callback. Carries no payload.
pub type InvalidationListener = dyn Fn();

/// Change callback, invoked with `(old, new)`.
pub type ChangeListener<T> = dyn Fn(&T, &T);

/// Anything that can be listened to for invalidation.
///
/// Implemented by properties, bindings and observable collections.
pub trait Observable {
    /// Register a listener fired whenever this observable is invalidated.
    fn add_invalidation_listener(&self, listener: Rc<InvalidationListener>) -> ListenerId;

    /// Detach an invalidation listener. Unknown ids are ignored.
    fn remove_invalidation_listener(&self, id: ListenerId) -> bool;

    /// Whether the current value is up to date.
    ///
    /// Properties and collections are always valid; bindings report their
    /// cache state.
    fn is_valid(&self) -> bool {
        true
    }
}

/// An observable that holds a value of type `T`.
pub trait ObservableValue<T>: Observable {
    /// Current value. Bindings recompute here when invalid.
    fn value(&self) -> T;

    /// Register a listener fired with `(old, new)` when the value changes.
    fn add_change_listener(&self, listener: Rc<ChangeListener<T>>) -> ListenerId;

    /// Detach a change listener. Unknown ids are ignored.
    fn remove_change_listener(&self, id: ListenerId) -> bool;
}

/// Address of the shared allocation behind an observable.
///
/// Used to compare dependencies by identity, the same way two `Rc`s
/// are compared with `Rc::ptr_eq`, but across different trait objects.
pub fn observable_key(observable: &Rc<dyn Observable>) -> *const () {
    Rc::as_ptr(observable) as *const ()
}
