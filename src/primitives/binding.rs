// ============================================================================
// jux-reactive - Bindings
// Derived, cached, lazily recomputed observable values
// ============================================================================
//
// A binding holds a compute closure and a cache. Dependencies only flip the
// cache to invalid; nothing is recomputed until somebody reads the binding.
// Any number of upstream invalidations between two reads therefore collapse
// into a single recomputation.
//
// Dependencies are not owned: the binding keeps a Weak reference to each one
// together with the id of the invalidation listener it installed there, which
// is all it needs to detach itself again.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::core::listener::{ListenerId, ListenerList};
use crate::core::observable::{
    ChangeListener, InvalidationListener, Observable, ObservableValue, observable_key,
};
use crate::primitives::property::Property;

// =============================================================================
// BINDING INNER
// =============================================================================

/// One dependency this binding listens to.
struct BoundDependency {
    source: Weak<dyn Observable>,
    key: *const (),
    listener: ListenerId,
}

/// The shared state of a binding.
pub struct BindingInner<T> {
    /// The computation, stored instead of being overridden per binding
    compute: Rc<dyn Fn() -> T>,

    /// Cached result (None before the first computation)
    value: RefCell<Option<T>>,

    /// Whether `value` is up to date. Starts false.
    valid: Cell<bool>,

    /// Incremented on every recomputation
    version: Cell<u64>,

    invalidation: ListenerList<InvalidationListener>,
    change: ListenerList<ChangeListener<T>>,
    dependencies: RefCell<Vec<BoundDependency>>,
    on_dispose: RefCell<Option<Box<dyn FnOnce()>>>,

    /// Self-reference handed to dependency listeners
    self_ref: Weak<BindingInner<T>>,
}

impl<T: Clone + PartialEq + 'static> BindingInner<T> {
    fn get(&self) -> T {
        if self.valid.get() {
            if let Some(value) = self.value.borrow().as_ref() {
                return value.clone();
            }
        }
        self.recompute()
    }

    fn recompute(&self) -> T {
        // Clone the closure out so it may re-enter the graph freely
        let compute = Rc::clone(&self.compute);
        let new = compute();

        let version = self.version.get() + 1;
        self.version.set(version);
        let old = self.value.replace(Some(new.clone()));
        self.valid.set(true);
        tracing::trace!(version, "binding recomputed");

        if let Some(old) = old {
            if old != new {
                self.change.dispatch(|listener| listener(&old, &new));
            }
        }
        new
    }

    fn invalidate(&self) {
        if self.valid.replace(false) {
            self.invalidation.dispatch(|listener| listener());
        }
    }

    fn bind(&self, dependencies: &[Rc<dyn Observable>]) {
        for dependency in dependencies {
            let weak = self.self_ref.clone();
            let listener: Rc<InvalidationListener> = Rc::new(move || {
                if let Some(binding) = weak.upgrade() {
                    binding.invalidate();
                }
            });
            let id = dependency.add_invalidation_listener(listener);
            self.dependencies.borrow_mut().push(BoundDependency {
                source: Rc::downgrade(dependency),
                key: observable_key(dependency),
                listener: id,
            });
        }
        if !dependencies.is_empty() {
            self.invalidate();
        }
    }

    fn unbind(&self, dependencies: &[Rc<dyn Observable>]) {
        let keys: Vec<*const ()> = dependencies.iter().map(observable_key).collect();
        let removed: Vec<BoundDependency> = {
            let mut bound = self.dependencies.borrow_mut();
            let (removed, kept): (Vec<BoundDependency>, Vec<BoundDependency>) =
                bound.drain(..).partition(|dep| keys.contains(&dep.key));
            *bound = kept;
            removed
        };
        detach(removed);
    }
}

/// Remove our listeners from every still-alive dependency.
fn detach(dependencies: Vec<BoundDependency>) {
    for dependency in dependencies {
        if let Some(source) = dependency.source.upgrade() {
            source.remove_invalidation_listener(dependency.listener);
        }
    }
}

impl<T> Drop for BindingInner<T> {
    fn drop(&mut self) {
        detach(std::mem::take(self.dependencies.get_mut()));
    }
}

impl<T: Clone + PartialEq + 'static> Observable for BindingInner<T> {
    fn add_invalidation_listener(&self, listener: Rc<InvalidationListener>) -> ListenerId {
        self.invalidation.add(listener)
    }

    fn remove_invalidation_listener(&self, id: ListenerId) -> bool {
        self.invalidation.remove(id)
    }

    fn is_valid(&self) -> bool {
        self.valid.get()
    }
}

impl<T: Clone + PartialEq + 'static> ObservableValue<T> for BindingInner<T> {
    fn value(&self) -> T {
        self.get()
    }

    fn add_change_listener(&self, listener: Rc<ChangeListener<T>>) -> ListenerId {
        // Establish a baseline so the first change has an old value
        if self.value.borrow().is_none() {
            self.get();
        }
        self.change.add(listener)
    }

    fn remove_change_listener(&self, id: ListenerId) -> bool {
        self.change.remove(id)
    }
}

// =============================================================================
// BINDING<T> - The public handle
// =============================================================================

/// A derived, read-only observable whose value is computed from its
/// dependencies and cached until one of them is invalidated.
///
/// Cloning a `Binding` creates a new handle to the **same** cache.
///
/// # Example
///
/// ```
/// use jux_reactive::{Binding, Property};
///
/// let width = Property::new(3);
/// let height = Property::new(4);
/// let area = Binding::with_dependencies(
///     {
///         let (width, height) = (width.clone(), height.clone());
///         move || width.get() * height.get()
///     },
///     &[width.as_observable(), height.as_observable()],
/// );
///
/// assert_eq!(area.get(), 12);
/// width.set(5);
/// assert!(!area.is_valid());
/// assert_eq!(area.get(), 20);
/// ```
pub struct Binding<T> {
    inner: Rc<BindingInner<T>>,
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + PartialEq + 'static> Binding<T> {
    /// Create a binding with no dependencies.
    ///
    /// Call [`bind`](Self::bind) to attach it to the observables the
    /// closure reads; a closure's captured reads cannot be discovered.
    pub fn new(compute: impl Fn() -> T + 'static) -> Self {
        Self {
            inner: Rc::new_cyclic(|self_ref| BindingInner {
                compute: Rc::new(compute),
                value: RefCell::new(None),
                valid: Cell::new(false),
                version: Cell::new(0),
                invalidation: ListenerList::new(),
                change: ListenerList::new(),
                dependencies: RefCell::new(Vec::new()),
                on_dispose: RefCell::new(None),
                self_ref: self_ref.clone(),
            }),
        }
    }

    /// Create a binding and bind it to `dependencies` in one step.
    pub fn with_dependencies(
        compute: impl Fn() -> T + 'static,
        dependencies: &[Rc<dyn Observable>],
    ) -> Self {
        let binding = Self::new(compute);
        binding.bind(dependencies);
        binding
    }

    /// Current value, recomputed first if the cache is invalid.
    pub fn get(&self) -> T {
        self.inner.get()
    }

    /// Whether the cached value is up to date.
    pub fn is_valid(&self) -> bool {
        self.inner.valid.get()
    }

    /// Mark the cache stale. Fires invalidation listeners if it was valid.
    pub fn invalidate(&self) {
        self.inner.invalidate();
    }

    /// Start listening to `dependencies`.
    pub fn bind(&self, dependencies: &[Rc<dyn Observable>]) {
        self.inner.bind(dependencies);
    }

    /// Stop listening to `dependencies`. Unknown dependencies are ignored.
    pub fn unbind(&self, dependencies: &[Rc<dyn Observable>]) {
        self.inner.unbind(dependencies);
    }

    /// The observables this binding currently listens to.
    pub fn dependencies(&self) -> Vec<Rc<dyn Observable>> {
        self.inner
            .dependencies
            .borrow()
            .iter()
            .filter_map(|dep| dep.source.upgrade())
            .collect()
    }

    /// Number of recomputations so far.
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    /// Install a hook that runs once on [`dispose`](Self::dispose).
    pub fn on_dispose(&self, f: impl FnOnce() + 'static) {
        *self.inner.on_dispose.borrow_mut() = Some(Box::new(f));
    }

    /// Detach from every dependency and run the dispose hook, if any.
    ///
    /// The binding keeps its last cached value afterwards.
    pub fn dispose(&self) {
        let bound = std::mem::take(&mut *self.inner.dependencies.borrow_mut());
        detach(bound);
        let hook = self.inner.on_dispose.borrow_mut().take();
        if let Some(hook) = hook {
            hook();
        }
    }

    pub fn on_invalidated(&self, f: impl Fn() + 'static) -> ListenerId {
        self.inner.invalidation.add(Rc::new(f))
    }

    pub fn on_change(&self, f: impl Fn(&T, &T) + 'static) -> ListenerId {
        self.inner.add_change_listener(Rc::new(f))
    }

    pub fn add_invalidation_listener(&self, listener: Rc<InvalidationListener>) -> ListenerId {
        self.inner.invalidation.add(listener)
    }

    pub fn remove_invalidation_listener(&self, id: ListenerId) -> bool {
        self.inner.invalidation.remove(id)
    }

    pub fn add_change_listener(&self, listener: Rc<ChangeListener<T>>) -> ListenerId {
        self.inner.add_change_listener(listener)
    }

    pub fn remove_change_listener(&self, id: ListenerId) -> bool {
        self.inner.change.remove(id)
    }

    pub fn as_observable(&self) -> Rc<dyn Observable> {
        self.inner.clone()
    }

    pub fn as_value(&self) -> Rc<dyn ObservableValue<T>> {
        self.inner.clone()
    }

    /// Derive another binding from this one.
    pub fn map<U: Clone + PartialEq + 'static>(&self, f: impl Fn(&T) -> U + 'static) -> Binding<U> {
        let source = self.clone();
        Binding::with_dependencies(move || f(&source.get()), &[self.as_observable()])
    }
}

impl<T> Binding<T> {
    pub fn ptr_eq(&self, other: &Binding<T>) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: Clone + PartialEq + 'static> Property<T> {
    /// Derive a binding from this property.
    pub fn map<U: Clone + PartialEq + 'static>(&self, f: impl Fn(&T) -> U + 'static) -> Binding<U> {
        let source = self.clone();
        Binding::with_dependencies(move || source.with(&f), &[self.as_observable()])
    }
}

impl<T: Clone + PartialEq + std::fmt::Debug + 'static> std::fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("cached", &*self.inner.value.borrow())
            .field("valid", &self.inner.valid.get())
            .field("version", &self.inner.version.get())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
