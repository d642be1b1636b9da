// ============================================================================
// jux-reactive - ObservableSet
// A hash set reporting every mutation as one change event
// ============================================================================

use std::cell::RefCell;
use std::collections::HashSet;
use std::hash::Hash;
use std::rc::Rc;

use crate::collections::Mutability;
use crate::collections::change::{SetChange, SetEntryChange};
use crate::core::listener::{ListenerId, ListenerList};
use crate::core::observable::{InvalidationListener, Observable};
use crate::error::{JuxError, Result};

/// Callback receiving a set change event.
pub type SetChangeListener<E> = dyn Fn(&mut SetChange<E>);

pub(crate) struct SetCore<E> {
    data: Rc<RefCell<HashSet<E>>>,
    change: ListenerList<SetChangeListener<E>>,
    invalidation: ListenerList<InvalidationListener>,
}

impl<E: Clone + 'static> SetCore<E> {
    fn notify(&self, entries: Vec<SetEntryChange<E>>) {
        if entries.is_empty() {
            return;
        }
        tracing::trace!(entries = entries.len(), "set changed");
        self.invalidation.dispatch(|listener| listener());

        let mut change = SetChange::new(entries);
        self.change.dispatch(|listener| {
            change.reset();
            listener(&mut change);
        });
    }
}

impl<E: Clone + 'static> Observable for SetCore<E> {
    fn add_invalidation_listener(&self, listener: Rc<InvalidationListener>) -> ListenerId {
        self.invalidation.add(listener)
    }

    fn remove_invalidation_listener(&self, id: ListenerId) -> bool {
        self.invalidation.remove(id)
    }
}

/// An observable hash set. Cloning shares the set.
pub struct ObservableSet<E> {
    core: Rc<SetCore<E>>,
    mode: Mutability,
}

impl<E> Clone for ObservableSet<E> {
    fn clone(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
            mode: self.mode,
        }
    }
}

impl<E: Eq + Hash + Clone + 'static> ObservableSet<E> {
    pub fn new() -> Self {
        Self::from_set(HashSet::new())
    }

    pub fn from_set(data: HashSet<E>) -> Self {
        Self::with_backing(Rc::new(RefCell::new(data)), Mutability::Mutable)
    }

    pub(crate) fn with_backing(data: Rc<RefCell<HashSet<E>>>, mode: Mutability) -> Self {
        Self {
            core: Rc::new(SetCore {
                data,
                change: ListenerList::new(),
                invalidation: ListenerList::new(),
            }),
            mode,
        }
    }

    pub(crate) fn view(&self, mode: Mutability) -> Self {
        Self {
            core: Rc::clone(&self.core),
            mode,
        }
    }

    pub fn mutability(&self) -> Mutability {
        self.mode
    }

    pub fn is_modifiable(&self) -> bool {
        self.mode == Mutability::Mutable
    }

    fn check_mutable(&self, operation: &'static str) -> Result<()> {
        if self.is_modifiable() {
            Ok(())
        } else {
            Err(JuxError::unsupported(operation))
        }
    }

    pub fn len(&self) -> usize {
        self.core.data.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.core.data.borrow().is_empty()
    }

    pub fn contains(&self, element: &E) -> bool {
        self.core.data.borrow().contains(element)
    }

    pub fn to_vec(&self) -> Vec<E> {
        self.core.data.borrow().iter().cloned().collect()
    }

    pub fn with<R>(&self, f: impl FnOnce(&HashSet<E>) -> R) -> R {
        f(&self.core.data.borrow())
    }

    /// Add an element. Returns false if it was already present.
    pub fn insert(&self, element: E) -> Result<bool> {
        self.check_mutable("insert")?;
        let inserted = self.core.data.borrow_mut().insert(element.clone());
        if inserted {
            self.core.notify(vec![SetEntryChange::Added(element)]);
        }
        Ok(inserted)
    }

    pub fn remove(&self, element: &E) -> Result<bool> {
        self.check_mutable("remove")?;
        let removed = self.core.data.borrow_mut().take(element);
        let found = removed.is_some();
        if let Some(element) = removed {
            self.core.notify(vec![SetEntryChange::Removed(element)]);
        }
        Ok(found)
    }

    /// Add every element in one event.
    pub fn extend(&self, elements: impl IntoIterator<Item = E>) -> Result<bool> {
        self.check_mutable("extend")?;
        let changes: Vec<SetEntryChange<E>> = {
            let mut data = self.core.data.borrow_mut();
            elements
                .into_iter()
                .filter(|e| data.insert(e.clone()))
                .map(SetEntryChange::Added)
                .collect()
        };
        let changed = !changes.is_empty();
        self.core.notify(changes);
        Ok(changed)
    }

    pub fn retain(&self, mut keep: impl FnMut(&E) -> bool) -> Result<bool> {
        self.check_mutable("retain")?;
        let changes: Vec<SetEntryChange<E>> = {
            let mut data = self.core.data.borrow_mut();
            let doomed: Vec<E> = data.iter().filter(|e| !keep(e)).cloned().collect();
            for element in &doomed {
                data.remove(element);
            }
            doomed.into_iter().map(SetEntryChange::Removed).collect()
        };
        let changed = !changes.is_empty();
        self.core.notify(changes);
        Ok(changed)
    }

    pub fn clear(&self) -> Result<()> {
        self.check_mutable("clear")?;
        let removed = std::mem::take(&mut *self.core.data.borrow_mut());
        self.core
            .notify(removed.into_iter().map(SetEntryChange::Removed).collect());
        Ok(())
    }

    pub fn on_change(&self, f: impl Fn(&mut SetChange<E>) + 'static) -> ListenerId {
        self.core.change.add(Rc::new(f))
    }

    pub fn add_listener(&self, listener: Rc<SetChangeListener<E>>) -> ListenerId {
        self.core.change.add(listener)
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.core.change.remove(id)
    }

    pub fn on_invalidated(&self, f: impl Fn() + 'static) -> ListenerId {
        self.core.invalidation.add(Rc::new(f))
    }

    pub fn remove_invalidation_listener(&self, id: ListenerId) -> bool {
        self.core.invalidation.remove(id)
    }

    pub fn as_observable(&self) -> Rc<dyn Observable> {
        self.core.clone()
    }
}

impl<E> ObservableSet<E> {
    pub fn ptr_eq(&self, other: &ObservableSet<E>) -> bool {
        Rc::ptr_eq(&self.core, &other.core)
    }
}

impl<E: Eq + Hash + Clone + 'static> Default for ObservableSet<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Eq + Hash + Clone + 'static> FromIterator<E> for ObservableSet<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self::from_set(iter.into_iter().collect())
    }
}

impl<E: std::fmt::Debug> std::fmt::Debug for ObservableSet<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservableSet")
            .field("data", &*self.core.data.borrow())
            .field("mode", &self.mode)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn duplicate_insert_is_silent() {
        let set = ObservableSet::new();
        let events = Rc::new(Cell::new(0));
        set.on_change({
            let events = events.clone();
            move |_| events.set(events.get() + 1)
        });

        assert!(set.insert(1).unwrap());
        assert!(!set.insert(1).unwrap());
        assert_eq!(events.get(), 1);
    }

    #[test]
    fn extend_is_one_event() {
        let set: ObservableSet<i32> = [1].into_iter().collect();
        let seen = Rc::new(RefCell::new(Vec::new()));
        set.on_change({
            let seen = seen.clone();
            move |change| {
                while change.next() {
                    if let Some(e) = change.element_added() {
                        seen.borrow_mut().push(*e);
                    }
                }
            }
        });

        assert!(set.extend([1, 2, 3]).unwrap());
        let mut seen = seen.borrow().clone();
        seen.sort();
        assert_eq!(seen, vec![2, 3]);
    }

    #[test]
    fn remove_retain_clear() {
        let set: ObservableSet<i32> = (0..6).collect();
        assert!(set.remove(&0).unwrap());
        assert!(!set.remove(&0).unwrap());
        assert!(set.retain(|e| e % 2 == 0).unwrap());
        assert_eq!(set.len(), 2);
        set.clear().unwrap();
        assert!(set.is_empty());
    }
}
