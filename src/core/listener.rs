// ============================================================================
// jux-reactive - Listener Lists
// Ordered, re-entrancy safe listener registration and dispatch
// ============================================================================
//
// Listeners are invoked synchronously, in registration order, on the stack of
// whatever triggered them. A listener may add or remove listeners (including
// itself) or write to other properties while being dispatched, so dispatch
// never holds a borrow of the registration list while a callback runs:
//
// 1. Snapshot the (id, callback) pairs into a temporary Vec (releases borrow)
// 2. Before each call, skip entries removed since the snapshot was taken
// 3. Listeners added during dispatch wait for the next notification
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Handle returned by every `add_*_listener` call.
///
/// Passing it to the matching `remove_*_listener` detaches the listener.
/// Removing an id twice, or an id that was never registered, is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Raw numeric value, unique within the list that issued it.
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// An ordered set of listeners of (possibly unsized) callback type `F`.
pub struct ListenerList<F: ?Sized> {
    entries: RefCell<Vec<(ListenerId, Rc<F>)>>,
    next_id: Cell<u64>,
}

impl<F: ?Sized> ListenerList<F> {
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Register a listener, returning its id.
    pub fn add(&self, listener: Rc<F>) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.entries.borrow_mut().push((id, listener));
        id
    }

    /// Remove a listener. Returns false when `id` was not registered.
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() < before
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.entries.borrow().iter().any(|(entry_id, _)| *entry_id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    /// Call `invoke` for every listener registered at the time of the call,
    /// skipping the ones removed while dispatch is in progress.
    pub fn dispatch(&self, mut invoke: impl FnMut(&F)) {
        // Collect first so callbacks can mutate the list
        let snapshot: Vec<(ListenerId, Rc<F>)> = self.entries.borrow().clone();

        for (id, listener) in snapshot {
            if self.contains(id) {
                invoke(&listener);
            }
        }
    }
}

impl<F: ?Sized> Default for ListenerList<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: ?Sized> std::fmt::Debug for ListenerList<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerList")
            .field("len", &self.len())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    type Callback = dyn Fn();

    #[test]
    fn dispatches_in_registration_order() {
        let list: ListenerList<Callback> = ListenerList::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for n in 0..3 {
            let log = log.clone();
            list.add(Rc::new(move || log.borrow_mut().push(n)));
        }

        list.dispatch(|l| l());
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn remove_is_idempotent() {
        let list: ListenerList<Callback> = ListenerList::new();
        let id = list.add(Rc::new(|| {}));

        assert!(list.remove(id));
        assert!(!list.remove(id));
        assert!(list.is_empty());
    }

    #[test]
    fn listener_can_remove_itself_during_dispatch() {
        let list: Rc<ListenerList<Callback>> = Rc::new(ListenerList::new());
        let calls = Rc::new(Cell::new(0));
        let own_id: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));

        let id = list.add(Rc::new({
            let list = Rc::downgrade(&list);
            let calls = calls.clone();
            let own_id = own_id.clone();
            move || {
                calls.set(calls.get() + 1);
                if let (Some(list), Some(id)) = (list.upgrade(), own_id.get()) {
                    list.remove(id);
                }
            }
        }));
        own_id.set(Some(id));

        list.dispatch(|l| l());
        list.dispatch(|l| l());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn listener_removed_mid_dispatch_is_skipped() {
        let list: Rc<ListenerList<Callback>> = Rc::new(ListenerList::new());
        let second_ran = Rc::new(Cell::new(false));
        let second_id: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));

        list.add(Rc::new({
            let list = Rc::downgrade(&list);
            let second_id = second_id.clone();
            move || {
                if let (Some(list), Some(id)) = (list.upgrade(), second_id.get()) {
                    list.remove(id);
                }
            }
        }));
        let id = list.add(Rc::new({
            let second_ran = second_ran.clone();
            move || second_ran.set(true)
        }));
        second_id.set(Some(id));

        list.dispatch(|l| l());
        assert!(!second_ran.get());
    }

    #[test]
    fn listener_added_mid_dispatch_waits_for_next_round() {
        let list: Rc<ListenerList<Callback>> = Rc::new(ListenerList::new());
        let late_calls = Rc::new(Cell::new(0));

        list.add(Rc::new({
            let list = Rc::downgrade(&list);
            let late_calls = late_calls.clone();
            move || {
                if let Some(list) = list.upgrade() {
                    if list.len() == 1 {
                        let late_calls = late_calls.clone();
                        list.add(Rc::new(move || late_calls.set(late_calls.get() + 1)));
                    }
                }
            }
        }));

        list.dispatch(|l| l());
        assert_eq!(late_calls.get(), 0);

        list.dispatch(|l| l());
        assert_eq!(late_calls.get(), 1);
    }
}
