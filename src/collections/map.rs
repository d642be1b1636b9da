// ============================================================================
// jux-reactive - ObservableMap
// A hash map reporting every mutation as one change event
// ============================================================================

use std::cell::RefCell;
use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;

use crate::collections::Mutability;
use crate::collections::change::{MapChange, MapEntryChange};
use crate::core::listener::{ListenerId, ListenerList};
use crate::core::observable::{InvalidationListener, Observable};
use crate::error::{JuxError, Result};

/// Callback receiving a map change event.
pub type MapChangeListener<K, V> = dyn Fn(&mut MapChange<K, V>);

pub(crate) struct MapCore<K, V> {
    data: Rc<RefCell<HashMap<K, V>>>,
    change: ListenerList<MapChangeListener<K, V>>,
    invalidation: ListenerList<InvalidationListener>,
}

impl<K: Clone + 'static, V: Clone + 'static> MapCore<K, V> {
    fn notify(&self, entries: Vec<MapEntryChange<K, V>>) {
        if entries.is_empty() {
            return;
        }
        tracing::trace!(entries = entries.len(), "map changed");
        self.invalidation.dispatch(|listener| listener());

        let mut change = MapChange::new(entries);
        self.change.dispatch(|listener| {
            change.reset();
            listener(&mut change);
        });
    }
}

impl<K: Clone + 'static, V: Clone + 'static> Observable for MapCore<K, V> {
    fn add_invalidation_listener(&self, listener: Rc<InvalidationListener>) -> ListenerId {
        self.invalidation.add(listener)
    }

    fn remove_invalidation_listener(&self, id: ListenerId) -> bool {
        self.invalidation.remove(id)
    }
}

/// An observable hash map.
///
/// Cloning creates another handle to the **same** map. Re-inserting a value
/// equal to the current one is not a change and fires nothing.
///
/// # Example
///
/// ```
/// use jux_reactive::collections::ObservableMap;
///
/// let scores = ObservableMap::new();
/// scores.on_change(|change| {
///     while change.next() {
///         println!("{:?} -> {:?}", change.key(), change.value_added());
///     }
/// });
/// scores.insert("ada", 3).unwrap();
/// assert_eq!(scores.get(&"ada"), Some(3));
/// ```
pub struct ObservableMap<K, V> {
    core: Rc<MapCore<K, V>>,
    mode: Mutability,
}

impl<K, V> Clone for ObservableMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
            mode: self.mode,
        }
    }
}

impl<K, V> ObservableMap<K, V>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + PartialEq + 'static,
{
    pub fn new() -> Self {
        Self::from_map(HashMap::new())
    }

    pub fn from_map(data: HashMap<K, V>) -> Self {
        Self::with_backing(Rc::new(RefCell::new(data)), Mutability::Mutable)
    }

    pub(crate) fn with_backing(data: Rc<RefCell<HashMap<K, V>>>, mode: Mutability) -> Self {
        Self {
            core: Rc::new(MapCore {
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

    // =========================================================================
    // READS
    // =========================================================================

    pub fn len(&self) -> usize {
        self.core.data.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.core.data.borrow().is_empty()
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.core.data.borrow().get(key).cloned()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.core.data.borrow().contains_key(key)
    }

    pub fn keys(&self) -> Vec<K> {
        self.core.data.borrow().keys().cloned().collect()
    }

    pub fn values(&self) -> Vec<V> {
        self.core.data.borrow().values().cloned().collect()
    }

    pub fn to_hash_map(&self) -> HashMap<K, V> {
        self.core.data.borrow().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&HashMap<K, V>) -> R) -> R {
        f(&self.core.data.borrow())
    }

    // =========================================================================
    // MUTATORS
    // =========================================================================

    /// Insert or replace, returning the previous value.
    pub fn insert(&self, key: K, value: V) -> Result<Option<V>> {
        self.check_mutable("insert")?;
        let previous = self
            .core
            .data
            .borrow_mut()
            .insert(key.clone(), value.clone());
        if previous.as_ref() != Some(&value) {
            self.core.notify(vec![MapEntryChange {
                key,
                removed: previous.clone(),
                added: Some(value),
            }]);
        }
        Ok(previous)
    }

    pub fn remove(&self, key: &K) -> Result<Option<V>> {
        self.check_mutable("remove")?;
        let removed = self.core.data.borrow_mut().remove(key);
        if let Some(value) = &removed {
            self.core.notify(vec![MapEntryChange {
                key: key.clone(),
                removed: Some(value.clone()),
                added: None,
            }]);
        }
        Ok(removed)
    }

    /// Insert every pair in one event.
    pub fn extend(&self, entries: impl IntoIterator<Item = (K, V)>) -> Result<()> {
        self.check_mutable("extend")?;
        let changes = {
            let mut data = self.core.data.borrow_mut();
            entries
                .into_iter()
                .filter_map(|(key, value)| {
                    let previous = data.insert(key.clone(), value.clone());
                    (previous.as_ref() != Some(&value)).then(|| MapEntryChange {
                        key,
                        removed: previous,
                        added: Some(value),
                    })
                })
                .collect()
        };
        self.core.notify(changes);
        Ok(())
    }

    /// Keep only entries matching `keep`, in one event.
    pub fn retain(&self, mut keep: impl FnMut(&K, &V) -> bool) -> Result<bool> {
        self.check_mutable("retain")?;
        let changes: Vec<MapEntryChange<K, V>> = {
            let mut data = self.core.data.borrow_mut();
            let doomed: Vec<K> = data
                .iter()
                .filter(|(k, v)| !keep(k, v))
                .map(|(k, _)| k.clone())
                .collect();
            doomed
                .into_iter()
                .filter_map(|key| {
                    data.remove(&key).map(|value| MapEntryChange {
                        key,
                        removed: Some(value),
                        added: None,
                    })
                })
                .collect()
        };
        let changed = !changes.is_empty();
        self.core.notify(changes);
        Ok(changed)
    }

    pub fn clear(&self) -> Result<()> {
        self.check_mutable("clear")?;
        let removed = std::mem::take(&mut *self.core.data.borrow_mut());
        let changes = removed
            .into_iter()
            .map(|(key, value)| MapEntryChange {
                key,
                removed: Some(value),
                added: None,
            })
            .collect();
        self.core.notify(changes);
        Ok(())
    }

    // =========================================================================
    // LISTENERS
    // =========================================================================

    pub fn on_change(&self, f: impl Fn(&mut MapChange<K, V>) + 'static) -> ListenerId {
        self.core.change.add(Rc::new(f))
    }

    pub fn add_listener(&self, listener: Rc<MapChangeListener<K, V>>) -> ListenerId {
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

impl<K, V> ObservableMap<K, V> {
    pub fn ptr_eq(&self, other: &ObservableMap<K, V>) -> bool {
        Rc::ptr_eq(&self.core, &other.core)
    }
}

impl<K, V> Default for ObservableMap<K, V>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + PartialEq + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> std::fmt::Debug for ObservableMap<K, V>
where
    K: std::fmt::Debug,
    V: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservableMap")
            .field("data", &*self.core.data.borrow())
            .field("mode", &self.mode)
            .finish()
    }
}
