// ============================================================================
// jux-reactive - Property Primitive
// The mutable, observable value cell at the leaves of the graph
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::listener::{ListenerId, ListenerList};
use crate::core::observable::{ChangeListener, InvalidationListener, Observable, ObservableValue};

// =============================================================================
// PROPERTY INNER (the data behind Property<T>)
// =============================================================================

/// The shared state of a property.
///
/// Separate from `Property<T>` so it can be stored as `Rc<dyn Observable>`
/// in dependency lists.
pub struct PropertyInner<T> {
    value: RefCell<T>,
    invalidation: ListenerList<InvalidationListener>,
    change: ListenerList<ChangeListener<T>>,
}

impl<T: Clone + PartialEq + 'static> PropertyInner<T> {
    fn new(value: T) -> Self {
        Self {
            value: RefCell::new(value),
            invalidation: ListenerList::new(),
            change: ListenerList::new(),
        }
    }

    fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Number of invalidation listeners currently attached.
    pub fn invalidation_listener_count(&self) -> usize {
        self.invalidation.len()
    }

    fn set(&self, value: T) -> bool {
        let old = self.value.replace(value);
        let changed = old != *self.value.borrow();

        // Assignment always invalidates, even when the value is equal
        self.invalidation.dispatch(|listener| listener());

        if changed {
            let new = self.get();
            self.change.dispatch(|listener| listener(&old, &new));
        }
        changed
    }
}

impl<T: Clone + PartialEq + 'static> Observable for PropertyInner<T> {
    fn add_invalidation_listener(&self, listener: Rc<InvalidationListener>) -> ListenerId {
        self.invalidation.add(listener)
    }

    fn remove_invalidation_listener(&self, id: ListenerId) -> bool {
        self.invalidation.remove(id)
    }
}

impl<T: Clone + PartialEq + 'static> ObservableValue<T> for PropertyInner<T> {
    fn value(&self) -> T {
        self.get()
    }

    fn add_change_listener(&self, listener: Rc<ChangeListener<T>>) -> ListenerId {
        self.change.add(listener)
    }

    fn remove_change_listener(&self, id: ListenerId) -> bool {
        self.change.remove(id)
    }
}

// =============================================================================
// PROPERTY<T> - The public handle
// =============================================================================

/// A mutable, observable value cell.
///
/// Cloning a `Property` creates another handle to the **same** cell.
///
/// `set` always fires invalidation listeners; change listeners fire only
/// when the new value differs from the old one under `PartialEq`. For
/// floating point values that means IEEE semantics: assigning NaN over NaN
/// counts as a change.
///
/// # Example
///
/// ```
/// use jux_reactive::Property;
///
/// let count = Property::new(0);
/// count.set(5);
/// assert_eq!(count.get(), 5);
/// ```
pub struct Property<T> {
    inner: Rc<PropertyInner<T>>,
}

impl<T> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + PartialEq + 'static> Property<T> {
    /// Create a property holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(PropertyInner::new(value)),
        }
    }

    /// Current value (cloning).
    pub fn get(&self) -> T {
        self.inner.get()
    }

    /// Access the current value without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Assign a new value. Returns true if it differs from the old one.
    pub fn set(&self, value: T) -> bool {
        self.inner.set(value)
    }

    /// Compute a new value from the current one and assign it.
    pub fn update(&self, f: impl FnOnce(&mut T)) -> bool {
        let mut value = self.get();
        f(&mut value);
        self.set(value)
    }

    /// Register an invalidation callback.
    pub fn on_invalidated(&self, f: impl Fn() + 'static) -> ListenerId {
        self.inner.invalidation.add(Rc::new(f))
    }

    /// Register a change callback receiving `(old, new)`.
    pub fn on_change(&self, f: impl Fn(&T, &T) + 'static) -> ListenerId {
        self.inner.change.add(Rc::new(f))
    }

    pub fn add_invalidation_listener(&self, listener: Rc<InvalidationListener>) -> ListenerId {
        self.inner.invalidation.add(listener)
    }

    pub fn remove_invalidation_listener(&self, id: ListenerId) -> bool {
        self.inner.invalidation.remove(id)
    }

    pub fn add_change_listener(&self, listener: Rc<ChangeListener<T>>) -> ListenerId {
        self.inner.change.add(listener)
    }

    pub fn remove_change_listener(&self, id: ListenerId) -> bool {
        self.inner.change.remove(id)
    }

    /// The property as a type-erased dependency.
    pub fn as_observable(&self) -> Rc<dyn Observable> {
        self.inner.clone()
    }

    /// The property as a typed read-only observable.
    pub fn as_value(&self) -> Rc<dyn ObservableValue<T>> {
        self.inner.clone()
    }
}

impl<T> Property<T> {
    /// Whether both handles point at the same cell.
    pub fn ptr_eq(&self, other: &Property<T>) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Identity of the underlying cell, stable for its lifetime.
    pub fn key(&self) -> *const () {
        Rc::as_ptr(&self.inner) as *const ()
    }

    /// Get a reference to the inner cell (for advanced use).
    pub fn inner(&self) -> &Rc<PropertyInner<T>> {
        &self.inner
    }
}

impl<T: Clone + PartialEq + Default + 'static> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + PartialEq + std::fmt::Debug + 'static> std::fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.get())
            .finish()
    }
}

// =============================================================================
// TYPED ALIASES
// =============================================================================

pub type IntegerProperty = Property<i32>;
pub type LongProperty = Property<i64>;
pub type DoubleProperty = Property<f64>;
pub type BooleanProperty = Property<bool>;
pub type StringProperty = Property<String>;

// =============================================================================
// TESTS
// =============================================================================
