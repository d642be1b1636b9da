// ============================================================================
// jux-reactive - Collection Change Events
// Structured descriptions of what a single mutation did
// ============================================================================
//
// A change event is delivered once per mutation. It may contain several
// sub-changes (a `retain` that removes two separate runs, a `replace_all`
// touching scattered indices); listeners step through them with `next()`.
// Every listener receives the event rewound to before its first sub-change.
// ============================================================================

// =============================================================================
// LIST CHANGES
// =============================================================================

/// One contiguous piece of a list change.
///
/// `from..to` is the index span the sub-change occupies in the list *after*
/// the mutation. For a pure removal `from == to`.
#[derive(Debug, Clone, PartialEq)]
pub struct ListSubChange<E> {
    from: usize,
    to: usize,
    removed: Vec<E>,
    added: Vec<E>,
    /// `permutation[i - from]` is the new index of the element previously at `i`
    permutation: Vec<usize>,
}

impl<E> ListSubChange<E> {
    pub(crate) fn added(from: usize, added: Vec<E>) -> Self {
        Self {
            from,
            to: from + added.len(),
            removed: Vec::new(),
            added,
            permutation: Vec::new(),
        }
    }

    pub(crate) fn removed(from: usize, removed: Vec<E>) -> Self {
        Self {
            from,
            to: from,
            removed,
            added: Vec::new(),
            permutation: Vec::new(),
        }
    }

    pub(crate) fn replaced(from: usize, removed: Vec<E>, added: Vec<E>) -> Self {
        Self {
            from,
            to: from + added.len(),
            removed,
            added,
            permutation: Vec::new(),
        }
    }

    pub(crate) fn permutated(from: usize, permutation: Vec<usize>) -> Self {
        Self {
            from,
            to: from + permutation.len(),
            removed: Vec::new(),
            added: Vec::new(),
            permutation,
        }
    }

    pub fn from(&self) -> usize {
        self.from
    }

    pub fn to(&self) -> usize {
        self.to
    }

    pub fn removed_elements(&self) -> &[E] {
        &self.removed
    }

    pub fn added_elements(&self) -> &[E] {
        &self.added
    }

    pub fn was_added(&self) -> bool {
        !self.added.is_empty()
    }

    pub fn was_removed(&self) -> bool {
        !self.removed.is_empty()
    }

    pub fn was_replaced(&self) -> bool {
        self.was_added() && self.was_removed()
    }

    pub fn was_permutated(&self) -> bool {
        !self.permutation.is_empty()
    }

    /// New index of the element that was at `old_index` before a
    /// permutation. Indices outside the permutated span map to themselves.
    pub fn permutation(&self, old_index: usize) -> usize {
        old_index
            .checked_sub(self.from)
            .and_then(|offset| self.permutation.get(offset).copied())
            .unwrap_or(old_index)
    }
}

/// The event passed to list change listeners.
///
/// # Example
///
/// ```
/// use jux_reactive::collections::observable_array_list;
///
/// let list = observable_array_list(vec![1, 2, 3]);
/// list.on_change(|change| {
///     while change.next() {
///         assert!(change.was_removed());
///         assert_eq!(change.removed(), &[2]);
///     }
/// });
/// list.remove_at(1).unwrap();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ListChange<E> {
    changes: Vec<ListSubChange<E>>,
    cursor: Option<usize>,
}

impl<E> ListChange<E> {
    pub(crate) fn new(changes: Vec<ListSubChange<E>>) -> Self {
        Self {
            changes,
            cursor: None,
        }
    }

    /// Advance to the next sub-change. Returns false when exhausted.
    pub fn next(&mut self) -> bool {
        let next = self.cursor.map_or(0, |c| c + 1);
        if next < self.changes.len() {
            self.cursor = Some(next);
            true
        } else {
            self.cursor = Some(self.changes.len());
            false
        }
    }

    /// Rewind to before the first sub-change.
    pub fn reset(&mut self) {
        self.cursor = None;
    }

    /// The current sub-change, if `next()` has positioned on one.
    pub fn sub_change(&self) -> Option<&ListSubChange<E>> {
        self.cursor.and_then(|c| self.changes.get(c))
    }

    /// All sub-changes, independent of the cursor.
    pub fn iter(&self) -> std::slice::Iter<'_, ListSubChange<E>> {
        self.changes.iter()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    // Accessors below read the current sub-change and report an empty
    // change when the cursor is not on one.

    pub fn from(&self) -> usize {
        self.sub_change().map_or(0, |sub| sub.from())
    }

    pub fn to(&self) -> usize {
        self.sub_change().map_or(0, |sub| sub.to())
    }

    pub fn removed(&self) -> &[E] {
        self.sub_change()
            .map(ListSubChange::removed_elements)
            .unwrap_or_default()
    }

    pub fn added(&self) -> &[E] {
        self.sub_change()
            .map(ListSubChange::added_elements)
            .unwrap_or_default()
    }

    pub fn removed_size(&self) -> usize {
        self.removed().len()
    }

    pub fn added_size(&self) -> usize {
        self.added().len()
    }

    pub fn was_added(&self) -> bool {
        self.sub_change().is_some_and(ListSubChange::was_added)
    }

    pub fn was_removed(&self) -> bool {
        self.sub_change().is_some_and(ListSubChange::was_removed)
    }

    pub fn was_replaced(&self) -> bool {
        self.sub_change().is_some_and(ListSubChange::was_replaced)
    }

    pub fn was_permutated(&self) -> bool {
        self.sub_change().is_some_and(ListSubChange::was_permutated)
    }

    pub fn permutation(&self, old_index: usize) -> usize {
        self.sub_change()
            .map_or(old_index, |sub| sub.permutation(old_index))
    }
}

// =============================================================================
// MAP CHANGES
// =============================================================================

/// What happened to one key.
#[derive(Debug, Clone, PartialEq)]
pub struct MapEntryChange<K, V> {
    pub key: K,
    pub removed: Option<V>,
    pub added: Option<V>,
}

/// The event passed to map change listeners. One entry per affected key.
#[derive(Debug, Clone, PartialEq)]
pub struct MapChange<K, V> {
    entries: Vec<MapEntryChange<K, V>>,
    cursor: Option<usize>,
}

impl<K, V> MapChange<K, V> {
    pub(crate) fn new(entries: Vec<MapEntryChange<K, V>>) -> Self {
        Self {
            entries,
            cursor: None,
        }
    }

    pub fn next(&mut self) -> bool {
        let next = self.cursor.map_or(0, |c| c + 1);
        self.cursor = Some(next.min(self.entries.len()));
        next < self.entries.len()
    }

    pub fn reset(&mut self) {
        self.cursor = None;
    }

    pub fn entry(&self) -> Option<&MapEntryChange<K, V>> {
        self.cursor.and_then(|c| self.entries.get(c))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MapEntryChange<K, V>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn key(&self) -> Option<&K> {
        self.entry().map(|e| &e.key)
    }

    pub fn value_added(&self) -> Option<&V> {
        self.entry().and_then(|e| e.added.as_ref())
    }

    pub fn value_removed(&self) -> Option<&V> {
        self.entry().and_then(|e| e.removed.as_ref())
    }

    pub fn was_added(&self) -> bool {
        self.value_added().is_some()
    }

    pub fn was_removed(&self) -> bool {
        self.value_removed().is_some()
    }
}

// =============================================================================
// SET CHANGES
// =============================================================================

/// What happened to one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetEntryChange<E> {
    Added(E),
    Removed(E),
}

/// The event passed to set change listeners. One entry per affected element.
#[derive(Debug, Clone, PartialEq)]
pub struct SetChange<E> {
    entries: Vec<SetEntryChange<E>>,
    cursor: Option<usize>,
}

impl<E> SetChange<E> {
    pub(crate) fn new(entries: Vec<SetEntryChange<E>>) -> Self {
        Self {
            entries,
            cursor: None,
        }
    }

    pub fn next(&mut self) -> bool {
        let next = self.cursor.map_or(0, |c| c + 1);
        self.cursor = Some(next.min(self.entries.len()));
        next < self.entries.len()
    }

    pub fn reset(&mut self) {
        self.cursor = None;
    }

    pub fn entry(&self) -> Option<&SetEntryChange<E>> {
        self.cursor.and_then(|c| self.entries.get(c))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SetEntryChange<E>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn element_added(&self) -> Option<&E> {
        match self.entry() {
            Some(SetEntryChange::Added(e)) => Some(e),
            _ => None,
        }
    }

    pub fn element_removed(&self) -> Option<&E> {
        match self.entry() {
            Some(SetEntryChange::Removed(e)) => Some(e),
            _ => None,
        }
    }

    pub fn was_added(&self) -> bool {
        self.element_added().is_some()
    }

    pub fn was_removed(&self) -> bool {
        self.element_removed().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_walks_sub_changes() {
        let mut change = ListChange::new(vec![
            ListSubChange::removed(0, vec!['a']),
            ListSubChange::added(3, vec!['x', 'y']),
        ]);

        assert!(!change.was_removed(), "nothing before next()");
        assert!(change.next());
        assert!(change.was_removed());
        assert_eq!(change.removed(), &['a']);
        assert!(change.next());
        assert_eq!((change.from(), change.to()), (3, 5));
        assert!(!change.next());
        assert!(!change.next());

        change.reset();
        assert!(change.next());
        assert_eq!(change.from(), 0);
    }

    #[test]
    fn permutation_maps_outside_span_to_itself() {
        let sub: ListSubChange<u8> = ListSubChange::permutated(2, vec![3, 2]);
        assert_eq!(sub.permutation(2), 3);
        assert_eq!(sub.permutation(3), 2);
        assert_eq!(sub.permutation(0), 0);
        assert_eq!(sub.permutation(9), 9);
    }

    #[test]
    fn replaced_reports_both_sides() {
        let sub = ListSubChange::replaced(1, vec![1], vec![2, 3]);
        assert!(sub.was_replaced());
        assert_eq!(sub.to(), 3);
    }

    #[test]
    fn map_and_set_cursors() {
        let mut map = MapChange::new(vec![MapEntryChange {
            key: "k",
            removed: Some(1),
            added: Some(2),
        }]);
        assert!(map.next());
        assert_eq!(map.key(), Some(&"k"));
        assert!(map.was_added() && map.was_removed());
        assert!(!map.next());

        let mut set = SetChange::new(vec![SetEntryChange::Removed(5)]);
        assert!(set.next());
        assert_eq!(set.element_removed(), Some(&5));
        assert!(!set.was_added());
    }
}
