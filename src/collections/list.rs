// ============================================================================
// jux-reactive - ObservableList
// An array-backed list that reports every mutation as one change event
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::collections::change::{ListChange, ListSubChange};
use crate::collections::Mutability;
use crate::core::listener::{ListenerId, ListenerList};
use crate::core::observable::{InvalidationListener, Observable};
use crate::error::{JuxError, Result};

/// Callback receiving a list change event.
pub type ListChangeListener<E> = dyn Fn(&mut ListChange<E>);

// =============================================================================
// LIST CORE (shared between a list and its read-only views)
// =============================================================================

pub(crate) struct ListCore<E> {
    data: Rc<RefCell<Vec<E>>>,
    change: ListenerList<ListChangeListener<E>>,
    invalidation: ListenerList<InvalidationListener>,
}

impl<E: Clone + 'static> ListCore<E> {
    fn notify(&self, changes: Vec<ListSubChange<E>>) {
        if changes.is_empty() {
            return;
        }
        tracing::trace!(sub_changes = changes.len(), "list changed");
        self.invalidation.dispatch(|listener| listener());

        let mut change = ListChange::new(changes);
        self.change.dispatch(|listener| {
            change.reset();
            listener(&mut change);
        });
    }
}

impl<E: Clone + 'static> Observable for ListCore<E> {
    fn add_invalidation_listener(&self, listener: Rc<InvalidationListener>) -> ListenerId {
        self.invalidation.add(listener)
    }

    fn remove_invalidation_listener(&self, id: ListenerId) -> bool {
        self.invalidation.remove(id)
    }
}

// =============================================================================
// OBSERVABLE LIST
// =============================================================================

/// An observable, random-access list.
///
/// Cloning creates another handle to the **same** list. Every successful
/// structural mutation fires exactly one change event; no-op mutations
/// (clearing an empty list, adding nothing) fire none.
///
/// Lists created by [`unmodifiable_observable_list`](super::unmodifiable_observable_list),
/// [`empty_observable_list`](super::empty_observable_list) and
/// [`singleton_observable_list`](super::singleton_observable_list) reject all
/// mutators with [`JuxError::UnsupportedOperation`] before touching anything.
pub struct ObservableList<E> {
    core: Rc<ListCore<E>>,
    mode: Mutability,
}

impl<E> Clone for ObservableList<E> {
    fn clone(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
            mode: self.mode,
        }
    }
}

impl<E: Clone + 'static> ObservableList<E> {
    /// An empty, mutable list.
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    /// A mutable list that takes ownership of `data`.
    pub fn from_vec(data: Vec<E>) -> Self {
        Self::with_backing(Rc::new(RefCell::new(data)), Mutability::Mutable)
    }

    pub(crate) fn with_backing(data: Rc<RefCell<Vec<E>>>, mode: Mutability) -> Self {
        Self {
            core: Rc::new(ListCore {
                data,
                change: ListenerList::new(),
                invalidation: ListenerList::new(),
            }),
            mode,
        }
    }

    /// A handle to the same list with a different mutability.
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

    // =========================================================================
    // READS
    // =========================================================================

    pub fn len(&self) -> usize {
        self.core.data.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.core.data.borrow().is_empty()
    }

    pub fn get(&self, index: usize) -> Result<E> {
        let data = self.core.data.borrow();
        data.get(index).cloned().ok_or(JuxError::IndexOutOfBounds {
            index,
            len: data.len(),
        })
    }

    /// Access the elements without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&[E]) -> R) -> R {
        f(&self.core.data.borrow())
    }

    pub fn to_vec(&self) -> Vec<E> {
        self.core.data.borrow().clone()
    }

    /// Iterate over a snapshot of the current elements.
    pub fn iter(&self) -> std::vec::IntoIter<E> {
        self.to_vec().into_iter()
    }

    // =========================================================================
    // MUTATORS
    // =========================================================================

    /// Append one element.
    pub fn add(&self, element: E) -> Result<()> {
        self.check_mutable("add")?;
        let from = {
            let mut data = self.core.data.borrow_mut();
            data.push(element.clone());
            data.len() - 1
        };
        self.core.notify(vec![ListSubChange::added(from, vec![element])]);
        Ok(())
    }

    /// Insert one element at `index` (`index == len` appends).
    pub fn insert(&self, index: usize, element: E) -> Result<()> {
        self.check_mutable("insert")?;
        self.insert_all(index, [element]).map(|_| ())
    }

    /// Append every element. Returns false (and fires nothing) when empty.
    pub fn add_all(&self, elements: impl IntoIterator<Item = E>) -> Result<bool> {
        self.check_mutable("add_all")?;
        let len = self.len();
        self.insert_all(len, elements)
    }

    /// Insert every element starting at `index`.
    pub fn insert_all(&self, index: usize, elements: impl IntoIterator<Item = E>) -> Result<bool> {
        self.check_mutable("insert_all")?;
        let len = self.len();
        if index > len {
            return Err(JuxError::IndexOutOfBounds { index, len });
        }
        let added: Vec<E> = elements.into_iter().collect();
        if added.is_empty() {
            return Ok(false);
        }
        {
            let mut data = self.core.data.borrow_mut();
            let tail = data.split_off(index);
            data.extend(added.iter().cloned());
            data.extend(tail);
        }
        self.core.notify(vec![ListSubChange::added(index, added)]);
        Ok(true)
    }

    /// Replace the element at `index`, returning the old one.
    pub fn set(&self, index: usize, element: E) -> Result<E> {
        self.check_mutable("set")?;
        let old = {
            let mut data = self.core.data.borrow_mut();
            let len = data.len();
            let slot = data
                .get_mut(index)
                .ok_or(JuxError::IndexOutOfBounds { index, len })?;
            std::mem::replace(slot, element.clone())
        };
        self.core
            .notify(vec![ListSubChange::replaced(index, vec![old.clone()], vec![element])]);
        Ok(old)
    }

    /// Remove and return the element at `index`.
    pub fn remove_at(&self, index: usize) -> Result<E> {
        self.check_mutable("remove_at")?;
        let removed = {
            let mut data = self.core.data.borrow_mut();
            let len = data.len();
            if index >= len {
                return Err(JuxError::IndexOutOfBounds { index, len });
            }
            data.remove(index)
        };
        self.core
            .notify(vec![ListSubChange::removed(index, vec![removed.clone()])]);
        Ok(removed)
    }

    /// Remove the elements in `from..to`.
    pub fn remove_range(&self, from: usize, to: usize) -> Result<()> {
        self.check_mutable("remove_range")?;
        let len = self.len();
        if to > len {
            return Err(JuxError::IndexOutOfBounds { index: to, len });
        }
        if from > to {
            return Err(JuxError::IndexOutOfBounds { index: from, len });
        }
        if from == to {
            return Ok(());
        }
        let removed: Vec<E> = self.core.data.borrow_mut().drain(from..to).collect();
        self.core.notify(vec![ListSubChange::removed(from, removed)]);
        Ok(())
    }

    /// Keep only the elements matching `keep`. One event with one
    /// sub-change per contiguous run of removed elements.
    pub fn retain(&self, mut keep: impl FnMut(&E) -> bool) -> Result<bool> {
        self.check_mutable("retain")?;
        let changes = {
            let mut data = self.core.data.borrow_mut();
            let old = std::mem::take(&mut *data);
            let mut changes: Vec<ListSubChange<E>> = Vec::new();
            let mut run: Vec<E> = Vec::new();

            for element in old {
                if keep(&element) {
                    if !run.is_empty() {
                        changes.push(ListSubChange::removed(data.len(), std::mem::take(&mut run)));
                    }
                    data.push(element);
                } else {
                    run.push(element);
                }
            }
            if !run.is_empty() {
                changes.push(ListSubChange::removed(data.len(), run));
            }
            changes
        };
        let changed = !changes.is_empty();
        self.core.notify(changes);
        Ok(changed)
    }

    /// Remove every element.
    pub fn clear(&self) -> Result<()> {
        self.check_mutable("clear")?;
        let removed = std::mem::take(&mut *self.core.data.borrow_mut());
        if !removed.is_empty() {
            self.core.notify(vec![ListSubChange::removed(0, removed)]);
        }
        Ok(())
    }

    /// Replace the whole content in one event.
    pub fn set_all(&self, elements: impl IntoIterator<Item = E>) -> Result<bool> {
        self.check_mutable("set_all")?;
        let added: Vec<E> = elements.into_iter().collect();
        let removed = self.core.data.replace(added.clone());
        if removed.is_empty() && added.is_empty() {
            return Ok(false);
        }
        self.core
            .notify(vec![ListSubChange::replaced(0, removed, added)]);
        Ok(true)
    }

    /// Reorder in one event. `order[new_index]` is the old index of the
    /// element that ends up at `new_index`; it must be a permutation of
    /// `0..len`.
    pub(crate) fn permute(&self, order: Vec<usize>) -> Result<()> {
        self.check_mutable("permute")?;
        let len = self.len();
        if order.len() != len {
            return Err(JuxError::illegal(format!(
                "permutation of length {} for list of length {len}",
                order.len()
            )));
        }
        if len == 0 {
            return Ok(());
        }
        // Validate fully before touching the data
        let mut new_index = vec![usize::MAX; len];
        for (to, &from) in order.iter().enumerate() {
            match new_index.get_mut(from) {
                Some(slot) if *slot == usize::MAX => *slot = to,
                _ => return Err(JuxError::illegal(format!("index {from} repeated or out of range"))),
            }
        }
        {
            let mut data = self.core.data.borrow_mut();
            let reordered: Vec<E> = order.iter().map(|&from| data[from].clone()).collect();
            *data = reordered;
        }
        self.core
            .notify(vec![ListSubChange::permutated(0, new_index)]);
        Ok(())
    }

    /// Replace elements at several indices in one event, one replaced
    /// sub-change per index. Indices must be ascending.
    pub(crate) fn replace_at(&self, replacements: Vec<(usize, E)>) -> Result<()> {
        self.check_mutable("replace")?;
        let changes = {
            let mut data = self.core.data.borrow_mut();
            let len = data.len();
            if let Some(&(index, _)) = replacements.iter().find(|(i, _)| *i >= len) {
                return Err(JuxError::IndexOutOfBounds { index, len });
            }
            replacements
                .into_iter()
                .map(|(index, element)| {
                    let old = std::mem::replace(&mut data[index], element.clone());
                    ListSubChange::replaced(index, vec![old], vec![element])
                })
                .collect()
        };
        self.core.notify(changes);
        Ok(())
    }

    // =========================================================================
    // LISTENERS
    // =========================================================================

    /// Register a change listener.
    pub fn on_change(&self, f: impl Fn(&mut ListChange<E>) + 'static) -> ListenerId {
        self.core.change.add(Rc::new(f))
    }

    pub fn add_listener(&self, listener: Rc<ListChangeListener<E>>) -> ListenerId {
        self.core.change.add(listener)
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.core.change.remove(id)
    }

    pub fn on_invalidated(&self, f: impl Fn() + 'static) -> ListenerId {
        self.core.invalidation.add(Rc::new(f))
    }

    pub fn add_invalidation_listener(&self, listener: Rc<InvalidationListener>) -> ListenerId {
        self.core.invalidation.add(listener)
    }

    pub fn remove_invalidation_listener(&self, id: ListenerId) -> bool {
        self.core.invalidation.remove(id)
    }

    /// The list as a binding dependency.
    pub fn as_observable(&self) -> Rc<dyn Observable> {
        self.core.clone()
    }
}

impl<E: Clone + PartialEq + 'static> ObservableList<E> {
    pub fn contains(&self, element: &E) -> bool {
        self.core.data.borrow().contains(element)
    }

    pub fn index_of(&self, element: &E) -> Option<usize> {
        self.core.data.borrow().iter().position(|e| e == element)
    }

    /// Remove the first occurrence of `element`.
    pub fn remove(&self, element: &E) -> Result<bool> {
        self.check_mutable("remove")?;
        match self.index_of(element) {
            Some(index) => self.remove_at(index).map(|_| true),
            None => Ok(false),
        }
    }

    /// Remove every occurrence of every element in `elements`.
    pub fn remove_all(&self, elements: &[E]) -> Result<bool> {
        self.retain(|e| !elements.contains(e))
    }
}

impl<E> ObservableList<E> {
    /// Whether both handles refer to the same list.
    pub fn ptr_eq(&self, other: &ObservableList<E>) -> bool {
        Rc::ptr_eq(&self.core, &other.core)
    }
}

impl<E: Clone + 'static> Default for ObservableList<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Clone + 'static> FromIterator<E> for ObservableList<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<E: Clone + std::fmt::Debug + 'static> std::fmt::Debug for ObservableList<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservableList")
            .field("data", &*self.core.data.borrow())
            .field("mode", &self.mode)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn recorded<E: Clone + 'static>(list: &ObservableList<E>) -> Rc<RefCell<Vec<ListChange<E>>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        list.on_change({
            let events = events.clone();
            move |change| events.borrow_mut().push(change.clone())
        });
        events
    }

    #[test]
    fn add_fires_one_event() {
        let list = ObservableList::from_vec(vec![1, 2]);
        let events = recorded(&list);

        list.add(3).unwrap();
        let mut change = events.borrow()[0].clone();
        assert!(change.next());
        assert!(change.was_added());
        assert_eq!((change.from(), change.to()), (2, 3));
        assert_eq!(change.added(), &[3]);
        assert!(!change.next());
    }

    #[test]
    fn insert_out_of_range_fails_without_event() {
        let list = ObservableList::from_vec(vec![1]);
        let events = recorded(&list);
        assert_eq!(
            list.insert(5, 9),
            Err(JuxError::IndexOutOfBounds { index: 5, len: 1 })
        );
        assert!(events.borrow().is_empty());
        assert_eq!(list.to_vec(), vec![1]);
    }

    #[test]
    fn set_reports_replacement() {
        let list = ObservableList::from_vec(vec!['a', 'b']);
        let events = recorded(&list);
        assert_eq!(list.set(1, 'z').unwrap(), 'b');

        let mut change = events.borrow()[0].clone();
        change.next();
        assert!(change.was_replaced());
        assert_eq!(change.removed(), &['b']);
        assert_eq!(change.added(), &['z']);
    }

    #[test]
    fn remove_range_is_one_event() {
        let list: ObservableList<i32> = (0..10).collect();
        let events = recorded(&list);
        list.remove_range(2, 5).unwrap();
        assert_eq!(list.len(), 7);
        assert_eq!(events.borrow().len(), 1);
        assert_eq!(events.borrow()[0].iter().next().unwrap().removed_elements(), &[2, 3, 4]);
        assert!(list.remove_range(3, 2).is_err());
        assert!(list.remove_range(0, 8).is_err());
    }

    #[test]
    fn retain_reports_each_run() {
        let list: ObservableList<i32> = (0..8).collect();
        let events = recorded(&list);
        list.retain(|v| !(2..4).contains(v) && *v != 6).unwrap();

        assert_eq!(list.to_vec(), vec![0, 1, 4, 5, 7]);
        let event = &events.borrow()[0];
        let subs: Vec<_> = event.iter().map(|s| (s.from(), s.removed_elements().to_vec())).collect();
        assert_eq!(subs, vec![(2, vec![2, 3]), (4, vec![6])]);
    }

    #[test]
    fn set_all_is_a_single_replacement() {
        let list = ObservableList::from_vec(vec![1, 2, 3]);
        let events = recorded(&list);
        assert!(list.set_all(vec![9]).unwrap());

        let mut change = events.borrow()[0].clone();
        assert!(change.next());
        assert_eq!(change.removed(), &[1, 2, 3]);
        assert_eq!(change.added(), &[9]);
        assert!(!change.next());
    }

    #[test]
    fn clearing_an_empty_list_is_silent() {
        let list: ObservableList<u8> = ObservableList::new();
        let events = recorded(&list);
        list.clear().unwrap();
        assert!(!list.add_all(Vec::new()).unwrap());
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn remove_by_value() {
        let list = ObservableList::from_vec(vec!["x", "y", "x"]);
        assert!(list.remove(&"x").unwrap());
        assert_eq!(list.to_vec(), vec!["y", "x"]);
        assert!(!list.remove(&"q").unwrap());
        assert!(list.remove_all(&["x", "y"]).unwrap());
        assert!(list.is_empty());
    }

    #[test]
    fn permute_reports_new_positions() {
        let list = ObservableList::from_vec(vec!['a', 'b', 'c']);
        let events = recorded(&list);
        list.permute(vec![2, 0, 1]).unwrap();
        assert_eq!(list.to_vec(), vec!['c', 'a', 'b']);

        let mut change = events.borrow()[0].clone();
        change.next();
        assert!(change.was_permutated());
        assert_eq!(change.permutation(0), 1);
        assert_eq!(change.permutation(2), 0);
        assert!(list.permute(vec![0, 0, 1]).is_err());
    }

    #[test]
    fn invalidation_listener_fires_per_mutation() {
        let list = ObservableList::from_vec(vec![1]);
        let count = Rc::new(Cell::new(0));
        list.on_invalidated({
            let count = count.clone();
            move || count.set(count.get() + 1)
        });
        list.add(2).unwrap();
        list.set_all(vec![3, 4, 5]).unwrap();
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn listener_may_mutate_the_list() {
        let list = ObservableList::from_vec(vec![1]);
        list.on_change({
            let list = list.clone();
            move |_| {
                if list.len() < 3 {
                    list.add(0).unwrap();
                }
            }
        });
        list.add(1).unwrap();
        assert_eq!(list.len(), 3);
    }
}
