use std::cmp::Ordering;
use std::fmt;
use std::ops::{Bound, Index, RangeBounds};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use log::{debug, trace};

use crate::compare::{Compare, Natural};
use crate::cursor::{Cursor, Position};
use crate::entry::{Entry, OccupiedEntry, VacantEntry};
use crate::error::Error;
use crate::index::{DefaultIx, IndexType, NodeIndex};
use crate::iter::{IntoIter, Iter, IterMut, Keys, Range, Values, ValuesMut};
use crate::node::{Color, Node};

static NEXT_MAP_ID: AtomicU64 = AtomicU64::new(0);

fn next_map_id() -> u64 {
    NEXT_MAP_ID.fetch_add(1, AtomicOrdering::Relaxed)
}

/// An ordered key-value map, which supports O(log n) insertion, lookup and removal.
///
/// Nodes are stored in a vector and link to each other by index, so the map is
/// `Send` whenever its keys, values and comparator are. The map performs no
/// internal locking; share it between threads behind a lock of your own.
pub struct TreeMap<K, V, C = Natural, Ix = DefaultIx> {
    /// Vector that stores nodes
    pub(crate) nodes: Vec<Node<K, V, Ix>>,
    /// Root of the red-black tree
    pub(crate) root: NodeIndex<Ix>,
    /// Number of elements in the map
    pub(crate) len: usize,
    /// Key ordering
    pub(crate) cmp: C,
    /// Bumped on every structural change, checked by `Position`
    pub(crate) generation: u64,
    /// Unique per map instance, clones included
    pub(crate) id: u64,
}

/// Where a key lives in the tree, or where it would be linked.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Slot<Ix> {
    /// The key is stored in this node.
    Occupied(NodeIndex<Ix>),
    /// The key is absent and would become a child of `parent`.
    Vacant {
        parent: NodeIndex<Ix>,
        go_left: bool,
    },
}

impl<K, V> TreeMap<K, V>
where
    K: Ord,
{
    /// Create an empty `TreeMap` ordered by `K: Ord`.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity_and_comparator(0, Natural)
    }

    /// Creates a new `TreeMap` with estimated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, Natural)
    }
}

impl<K, V, C> TreeMap<K, V, C>
where
    C: Compare<K>,
{
    /// Create an empty `TreeMap` ordered by the given comparator.
    ///
    /// # Example
    /// ```rust
    /// use rb_tree_map::TreeMap;
    ///
    /// let mut map: TreeMap<i32, &str, _> = TreeMap::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    /// map.insert(1, "one");
    /// map.insert(2, "two");
    /// assert_eq!(map.first_key_value(), Some((&2, &"two")));
    /// ```
    #[inline]
    #[must_use]
    pub fn with_comparator(cmp: C) -> Self {
        Self::with_capacity_and_comparator(0, cmp)
    }
}

impl<K, V, C, Ix> Default for TreeMap<K, V, C, Ix>
where
    C: Compare<K> + Default,
    Ix: IndexType,
{
    #[inline]
    fn default() -> Self {
        Self::with_capacity_and_comparator(0, C::default())
    }
}

impl<K, V, C, Ix> TreeMap<K, V, C, Ix>
where
    C: Compare<K>,
    Ix: IndexType,
{
    /// Creates a new `TreeMap` with estimated capacity and the given comparator.
    #[inline]
    #[must_use]
    pub fn with_capacity_and_comparator(capacity: usize, cmp: C) -> Self {
        let mut nodes = vec![Self::new_sentinel()];
        nodes.reserve(capacity);
        TreeMap {
            nodes,
            root: NodeIndex::sentinel(),
            len: 0,
            cmp,
            generation: 0,
            id: next_map_id(),
        }
    }

    /// Return the comparator that orders the keys.
    #[inline]
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Insert a key-value pair into the map.
    /// If the key exists, overwrite and return the previous value.
    ///
    /// # Panics
    ///
    /// This method panics when the tree is at the maximum number of nodes for its index
    ///
    /// # Example
    /// ```rust
    /// use rb_tree_map::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// assert_eq!(map.insert(5, 1), None);
    /// assert_eq!(map.insert(5, 2), Some(1));
    /// assert_eq!(map.insert(5, 3), Some(2));
    /// assert_eq!(map.len(), 1);
    /// ```
    #[inline]
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.locate(&key) {
            Slot::Occupied(node_idx) => Some(self.node_mut(node_idx, Node::set_value(value))),
            Slot::Vacant { parent, go_left } => {
                assert!(self.has_room(), "Reached maximum number of nodes");
                let _ignore = self.insert_at(parent, go_left, key, value);
                None
            }
        }
    }

    /// Insert a key-value pair into the map, reporting failure instead of panicking.
    ///
    /// Returns the previous value if the key was present. When the index space is
    /// exhausted or the node storage cannot grow, the map is left untouched.
    ///
    /// # Example
    /// ```rust
    /// use rb_tree_map::{Error, Natural, TreeMap};
    ///
    /// let mut map: TreeMap<u32, (), Natural, u8> =
    ///     TreeMap::with_capacity_and_comparator(0, Natural);
    /// for k in 0..254 {
    ///     assert_eq!(map.try_insert(k, ()), Ok(None));
    /// }
    /// assert_eq!(map.try_insert(300, ()), Err(Error::CapacityExceeded));
    /// assert_eq!(map.try_insert(7, ()), Ok(Some(())));
    /// ```
    #[inline]
    pub fn try_insert(&mut self, key: K, value: V) -> Result<Option<V>, Error> {
        match self.locate(&key) {
            Slot::Occupied(node_idx) => Ok(Some(self.node_mut(node_idx, Node::set_value(value)))),
            Slot::Vacant { parent, go_left } => {
                if !self.has_room() {
                    debug!("rejecting insert, {} nodes already stored", self.len);
                    return Err(Error::CapacityExceeded);
                }
                if let Err(err) = self.nodes.try_reserve(1) {
                    debug!("rejecting insert, node storage cannot grow: {err}");
                    return Err(Error::AllocFailed(err));
                }
                let _ignore = self.insert_at(parent, go_left, key, value);
                Ok(None)
            }
        }
    }

    /// Remove a key from the map, returning the value at the key if the key exists
    ///
    /// # Example
    /// ```rust
    /// use rb_tree_map::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    /// assert_eq!(map.remove(&3), None);
    /// assert_eq!(map.len(), 2);
    /// assert_eq!(map.remove(&2), Some("b"));
    /// assert_eq!(map.len(), 1);
    /// ```
    #[inline]
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Remove a key from the map, returning the stored key and value if the key exists
    #[inline]
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let node_idx = self.search(key)?;
        self.remove_node(node_idx)
    }

    /// Return reference to the value corresponding to the key.
    ///
    /// # Example
    /// ```rust
    /// use rb_tree_map::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// map.insert(1, 10);
    /// map.insert(7, 70);
    /// assert_eq!(map.get(&1), Some(&10));
    /// assert_eq!(map.get(&7), Some(&70));
    /// assert_eq!(map.get(&5), None);
    /// ```
    #[inline]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.search(key).map(|idx| self.node_ref(idx, Node::value))
    }

    /// Return the stored key and value corresponding to the key.
    #[inline]
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.search(key).map(|idx| self.node_ref(idx, Node::key_value))
    }

    /// Return a mutable reference to the value corresponding to the key.
    ///
    /// # Example
    /// ```rust
    /// use rb_tree_map::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// map.insert(3, 0);
    /// if let Some(v) = map.get_mut(&3) {
    ///     *v += 1;
    /// }
    /// assert_eq!(map.get(&3), Some(&1));
    /// ```
    #[inline]
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let node_idx = self.search(key)?;
        Some(self.node_mut(node_idx, Node::value_mut))
    }

    /// Return `true` if the map contains the key.
    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.search(key).is_some()
    }

    /// Return the number of entries with the given key, which is either 0 or 1.
    #[inline]
    pub fn count(&self, key: &K) -> usize {
        usize::from(self.contains_key(key))
    }

    /// Return the entry with the smallest key.
    #[inline]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.entry_at(self.first_idx())
    }

    /// Return the entry with the largest key.
    #[inline]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.entry_at(self.last_idx())
    }

    /// Remove and return the entry with the smallest key.
    #[inline]
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let first = self.first_idx();
        self.remove_node(first)
    }

    /// Remove and return the entry with the largest key.
    #[inline]
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let last = self.last_idx();
        self.remove_node(last)
    }

    /// Get the given key's corresponding entry in the map for in-place manipulation.
    ///
    /// # Example
    /// ```rust
    /// use rb_tree_map::{Entry, TreeMap};
    ///
    /// let mut map = TreeMap::new();
    ///
    /// assert!(matches!(map.entry(1), Entry::Vacant(_)));
    /// map.entry(1).or_insert(0);
    /// assert!(matches!(map.entry(1), Entry::Occupied(_)));
    /// map.entry(1).and_modify(|v| *v += 1);
    /// assert_eq!(map.get(&1), Some(&1));
    /// ```
    #[inline]
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V, C, Ix> {
        match self.locate(&key) {
            Slot::Occupied(node_idx) => Entry::Occupied(OccupiedEntry {
                map_ref: self,
                node_idx,
            }),
            Slot::Vacant { parent, go_left } => Entry::Vacant(VacantEntry {
                map_ref: self,
                key,
                parent,
                go_left,
            }),
        }
    }

    /// Get an iterator over the entries of the map, sorted by key.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V, C, Ix> {
        Iter::new(self)
    }

    /// Get an iterator over the keys of the map, in sorted order.
    #[inline]
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, V, C, Ix> {
        Keys { inner: self.iter() }
    }

    /// Get an iterator over the values of the map, in key order.
    #[inline]
    #[must_use]
    pub fn values(&self) -> Values<'_, K, V, C, Ix> {
        Values { inner: self.iter() }
    }

    /// Get an iterator over the entries of the map with mutable values, sorted by key.
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let order: Vec<NodeIndex<Ix>> = self.node_indices().collect();
        let mut slots: Vec<Option<&mut Node<K, V, Ix>>> = self.nodes.iter_mut().map(Some).collect();
        let entries: Vec<(&K, &mut V)> = order
            .into_iter()
            .filter_map(|idx| slots[idx.index()].take())
            .filter_map(Node::key_value_mut)
            .collect();
        IterMut::new(entries)
    }

    /// Get an iterator over mutable references to the values, in key order.
    #[inline]
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Get an iterator over the entries whose keys fall in `range`, sorted by key.
    ///
    /// # Example
    /// ```rust
    /// use rb_tree_map::TreeMap;
    ///
    /// let map: TreeMap<i32, ()> = (0..10).map(|k| (k, ())).collect();
    /// let keys: Vec<_> = map.range(3..6).map(|(k, _)| *k).collect();
    /// assert_eq!(keys, [3, 4, 5]);
    /// let keys: Vec<_> = map.range(..=2).rev().map(|(k, _)| *k).collect();
    /// assert_eq!(keys, [2, 1, 0]);
    /// ```
    #[inline]
    pub fn range<R>(&self, range: R) -> Range<'_, K, V, C, Ix>
    where
        R: RangeBounds<K>,
    {
        let front = match range.start_bound() {
            Bound::Included(key) => self.lower_bound_idx(key),
            Bound::Excluded(key) => self.upper_bound_idx(key),
            Bound::Unbounded => self.first_idx(),
        };
        let back = match range.end_bound() {
            Bound::Included(key) => self.floor_idx(key, true),
            Bound::Excluded(key) => self.floor_idx(key, false),
            Bound::Unbounded => self.last_idx(),
        };
        let empty = self.node_ref(front, Node::is_sentinel)
            || self.node_ref(back, Node::is_sentinel)
            || self.compare_nodes(front, back) == Ordering::Greater;
        Range::new(self, front, back, empty)
    }

    /// Return a cursor at the smallest key, or at the end position if the map is empty.
    #[inline]
    pub fn cursor_front(&self) -> Cursor<'_, K, V, C, Ix> {
        Cursor::new(self, self.first_idx())
    }

    /// Return a cursor at the largest key, or at the end position if the map is empty.
    #[inline]
    pub fn cursor_back(&self) -> Cursor<'_, K, V, C, Ix> {
        Cursor::new(self, self.last_idx())
    }

    /// Return a cursor at the end position, which lies past the largest key and
    /// before the smallest one.
    #[inline]
    pub fn cursor_end(&self) -> Cursor<'_, K, V, C, Ix> {
        Cursor::new(self, NodeIndex::sentinel())
    }

    /// Return a cursor at the given key, or at the end position if the key is absent.
    #[inline]
    pub fn find(&self, key: &K) -> Cursor<'_, K, V, C, Ix> {
        Cursor::new(self, self.search(key).unwrap_or_else(NodeIndex::sentinel))
    }

    /// Return a cursor at the first key that is not less than `key`.
    ///
    /// # Example
    /// ```rust
    /// use rb_tree_map::TreeMap;
    ///
    /// let map: TreeMap<i32, ()> = [10, 20, 30].into_iter().map(|k| (k, ())).collect();
    /// assert_eq!(map.lower_bound(&20).key(), Some(&20));
    /// assert_eq!(map.lower_bound(&21).key(), Some(&30));
    /// assert!(map.lower_bound(&31).is_end());
    /// ```
    #[inline]
    pub fn lower_bound(&self, key: &K) -> Cursor<'_, K, V, C, Ix> {
        Cursor::new(self, self.lower_bound_idx(key))
    }

    /// Return a cursor at the first key that is greater than `key`.
    #[inline]
    pub fn upper_bound(&self, key: &K) -> Cursor<'_, K, V, C, Ix> {
        Cursor::new(self, self.upper_bound_idx(key))
    }

    /// Return the pair `(lower_bound(key), upper_bound(key))`.
    #[inline]
    pub fn equal_range(&self, key: &K) -> (Cursor<'_, K, V, C, Ix>, Cursor<'_, K, V, C, Ix>) {
        (self.lower_bound(key), self.upper_bound(key))
    }

    /// Re-attach a detached `Position` to the map.
    ///
    /// # Errors
    ///
    /// Returns `Error::StalePosition` if the map was structurally modified
    /// since the position was taken, and `Error::ForeignPosition` if the
    /// position was taken from another map.
    ///
    /// # Example
    /// ```rust
    /// use rb_tree_map::{Error, TreeMap};
    ///
    /// let mut map = TreeMap::new();
    /// map.insert(1, "a");
    /// let pos = map.find(&1).position();
    /// assert_eq!(map.cursor_at(pos).unwrap().key(), Some(&1));
    /// map.insert(2, "b");
    /// assert!(matches!(map.cursor_at(pos), Err(Error::StalePosition { .. })));
    /// ```
    #[inline]
    pub fn cursor_at(&self, position: Position<Ix>) -> Result<Cursor<'_, K, V, C, Ix>, Error> {
        self.check_position(position)?;
        Ok(Cursor::new(self, position.node))
    }

    /// Remove the entry a detached `Position` points at.
    ///
    /// Returns `Ok(None)` for the end position.
    ///
    /// # Errors
    ///
    /// Returns `Error::StalePosition` if the map was structurally modified
    /// since the position was taken, and `Error::ForeignPosition` if the
    /// position was taken from another map.
    #[inline]
    pub fn remove_at(&mut self, position: Position<Ix>) -> Result<Option<(K, V)>, Error> {
        self.check_position(position)?;
        Ok(self.remove_node(position.node))
    }

    /// Remove all elements from the map
    #[inline]
    pub fn clear(&mut self) {
        debug!("clearing map with {} entries", self.len);
        self.nodes.clear();
        self.nodes.push(Self::new_sentinel());
        self.root = NodeIndex::sentinel();
        self.len = 0;
        self.bump_generation();
    }
}

impl<K, V, C, Ix> TreeMap<K, V, C, Ix>
where
    Ix: IndexType,
{
    /// Return the number of elements in the map.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Return `true` if the map contains no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the largest number of elements the index type can address.
    #[inline]
    #[must_use]
    pub fn max_len() -> usize {
        <Ix as IndexType>::max().index() - 1
    }

    /// Create a new sentinel node
    fn new_sentinel() -> Node<K, V, Ix> {
        Node {
            key: None,
            value: None,
            left: NodeIndex::sentinel(),
            right: NodeIndex::sentinel(),
            parent: NodeIndex::sentinel(),
            color: Color::Black,
        }
    }

    /// Create a new tree node
    fn new_node(key: K, value: V, parent: NodeIndex<Ix>) -> Node<K, V, Ix> {
        Node {
            key: Some(key),
            value: Some(value),
            left: NodeIndex::sentinel(),
            right: NodeIndex::sentinel(),
            parent,
            color: Color::Red,
        }
    }

    /// Check that one more node still gets an addressable index.
    pub(crate) fn has_room(&self) -> bool {
        // the maximum index is reserved, except if we use usize
        <Ix as IndexType>::max().index() == !0 || NodeIndex::<Ix>::end().index() > self.nodes.len()
    }

    fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    pub(crate) fn check_position(&self, position: Position<Ix>) -> Result<(), Error> {
        if position.map_id != self.id {
            debug!("rejecting position taken from another map");
            return Err(Error::ForeignPosition);
        }
        if position.generation != self.generation || position.node.index() >= self.nodes.len() {
            debug!(
                "rejecting position from generation {}, map is at {}",
                position.generation, self.generation
            );
            return Err(Error::StalePosition {
                expected: position.generation,
                found: self.generation,
            });
        }
        Ok(())
    }

    fn entry_at(&self, node: NodeIndex<Ix>) -> Option<(&K, &V)> {
        (!self.node_ref(node, Node::is_sentinel)).then(|| self.node_ref(node, Node::key_value))
    }

    /// Link a new red node below `parent` and rebalance.
    pub(crate) fn insert_at(
        &mut self,
        parent: NodeIndex<Ix>,
        go_left: bool,
        key: K,
        value: V,
    ) -> NodeIndex<Ix> {
        let z = NodeIndex::new(self.nodes.len());
        self.nodes.push(Self::new_node(key, value, parent));
        if self.node_ref(parent, Node::is_sentinel) {
            self.root = z;
        } else if go_left {
            self.node_mut(parent, Node::set_left(z));
        } else {
            self.node_mut(parent, Node::set_right(z));
        }

        self.insert_fixup(z);
        debug_assert!(self.node_ref(self.root, Node::is_black), "root must be black");

        self.len = self.len.wrapping_add(1);
        self.bump_generation();
        z
    }

    /// Unlink a node, rebalance and release its slot.
    pub(crate) fn remove_node(&mut self, node_idx: NodeIndex<Ix>) -> Option<(K, V)> {
        if self.node_ref(node_idx, Node::is_sentinel) {
            return None;
        }
        self.remove_inner(node_idx);
        // Swap the node with the last node stored in the vector and update indices
        let mut node = self.nodes.swap_remove(node_idx.index());
        let old = NodeIndex::<Ix>::new(self.nodes.len());
        self.update_idx(old, node_idx);
        self.bump_generation();
        debug_assert!(self.node_ref(self.root, Node::is_black), "root must be black");

        node.take_entry()
    }

    /// Remove a node from the tree.
    fn remove_inner(&mut self, z: NodeIndex<Ix>) {
        let mut y_orig_color = self.node_ref(z, Node::color);
        let x;
        if self.left_ref(z, Node::is_sentinel) {
            x = self.node_ref(z, Node::right);
            self.transplant(z, x);
        } else if self.right_ref(z, Node::is_sentinel) {
            x = self.node_ref(z, Node::left);
            self.transplant(z, x);
        } else {
            let y = self.tree_minimum(self.node_ref(z, Node::right));
            y_orig_color = self.node_ref(y, Node::color);
            x = self.node_ref(y, Node::right);
            if self.node_ref(y, Node::parent) == z {
                self.node_mut(x, Node::set_parent(y));
            } else {
                self.transplant(y, x);
                self.node_mut(y, Node::set_right(self.node_ref(z, Node::right)));
                self.right_mut(y, Node::set_parent(y));
            }
            self.transplant(z, y);
            self.node_mut(y, Node::set_left(self.node_ref(z, Node::left)));
            self.left_mut(y, Node::set_parent(y));
            self.node_mut(y, Node::set_color(self.node_ref(z, Node::color)));
        }

        if matches!(y_orig_color, Color::Black) {
            self.remove_fixup(x);
        }

        self.len = self.len.wrapping_sub(1);
    }

    /// Restore red-black tree properties after an insert.
    fn insert_fixup(&mut self, mut z: NodeIndex<Ix>) {
        while self.parent_ref(z, Node::is_red) {
            if self.grand_parent_ref(z, Node::is_sentinel) {
                break;
            }
            if self.is_left_child(self.node_ref(z, Node::parent)) {
                let y = self.grand_parent_ref(z, Node::right);
                if self.node_ref(y, Node::is_red) {
                    trace!("insert fixup at {z:?}: red uncle, recolor");
                    self.parent_mut(z, Node::set_color(Color::Black));
                    self.node_mut(y, Node::set_color(Color::Black));
                    self.grand_parent_mut(z, Node::set_color(Color::Red));
                    z = self.parent_ref(z, Node::parent);
                } else {
                    if self.is_right_child(z) {
                        trace!("insert fixup at {z:?}: inner grandchild, rotate parent left");
                        z = self.node_ref(z, Node::parent);
                        self.left_rotate(z);
                    }
                    trace!("insert fixup at {z:?}: outer grandchild, rotate grandparent right");
                    self.parent_mut(z, Node::set_color(Color::Black));
                    self.grand_parent_mut(z, Node::set_color(Color::Red));
                    self.right_rotate(self.parent_ref(z, Node::parent));
                }
            } else {
                let y = self.grand_parent_ref(z, Node::left);
                if self.node_ref(y, Node::is_red) {
                    trace!("insert fixup at {z:?}: red uncle, recolor");
                    self.parent_mut(z, Node::set_color(Color::Black));
                    self.node_mut(y, Node::set_color(Color::Black));
                    self.grand_parent_mut(z, Node::set_color(Color::Red));
                    z = self.parent_ref(z, Node::parent);
                } else {
                    if self.is_left_child(z) {
                        trace!("insert fixup at {z:?}: inner grandchild, rotate parent right");
                        z = self.node_ref(z, Node::parent);
                        self.right_rotate(z);
                    }
                    trace!("insert fixup at {z:?}: outer grandchild, rotate grandparent left");
                    self.parent_mut(z, Node::set_color(Color::Black));
                    self.grand_parent_mut(z, Node::set_color(Color::Red));
                    self.left_rotate(self.parent_ref(z, Node::parent));
                }
            }
        }
        self.node_mut(self.root, Node::set_color(Color::Black));
    }

    /// Restore red-black tree properties after a remove.
    fn remove_fixup(&mut self, mut x: NodeIndex<Ix>) {
        while x != self.root && self.node_ref(x, Node::is_black) {
            let mut w;
            if self.is_left_child(x) {
                w = self.parent_ref(x, Node::right);
                if self.node_ref(w, Node::is_red) {
                    trace!("remove fixup at {x:?}: red sibling, rotate parent left");
                    self.node_mut(w, Node::set_color(Color::Black));
                    self.parent_mut(x, Node::set_color(Color::Red));
                    self.left_rotate(self.node_ref(x, Node::parent));
                    w = self.parent_ref(x, Node::right);
                }
                if self.node_ref(w, Node::is_sentinel) {
                    break;
                }
                if self.left_ref(w, Node::is_black) && self.right_ref(w, Node::is_black) {
                    trace!("remove fixup at {x:?}: black nephews, push deficit up");
                    self.node_mut(w, Node::set_color(Color::Red));
                    x = self.node_ref(x, Node::parent);
                } else {
                    if self.right_ref(w, Node::is_black) {
                        trace!("remove fixup at {x:?}: red near nephew, rotate sibling right");
                        self.left_mut(w, Node::set_color(Color::Black));
                        self.node_mut(w, Node::set_color(Color::Red));
                        self.right_rotate(w);
                        w = self.parent_ref(x, Node::right);
                    }
                    trace!("remove fixup at {x:?}: red far nephew, rotate parent left");
                    self.node_mut(w, Node::set_color(self.parent_ref(x, Node::color)));
                    self.parent_mut(x, Node::set_color(Color::Black));
                    self.right_mut(w, Node::set_color(Color::Black));
                    self.left_rotate(self.node_ref(x, Node::parent));
                    x = self.root;
                }
            } else {
                w = self.parent_ref(x, Node::left);
                if self.node_ref(w, Node::is_red) {
                    trace!("remove fixup at {x:?}: red sibling, rotate parent right");
                    self.node_mut(w, Node::set_color(Color::Black));
                    self.parent_mut(x, Node::set_color(Color::Red));
                    self.right_rotate(self.node_ref(x, Node::parent));
                    w = self.parent_ref(x, Node::left);
                }
                if self.node_ref(w, Node::is_sentinel) {
                    break;
                }
                if self.right_ref(w, Node::is_black) && self.left_ref(w, Node::is_black) {
                    trace!("remove fixup at {x:?}: black nephews, push deficit up");
                    self.node_mut(w, Node::set_color(Color::Red));
                    x = self.node_ref(x, Node::parent);
                } else {
                    if self.left_ref(w, Node::is_black) {
                        trace!("remove fixup at {x:?}: red near nephew, rotate sibling left");
                        self.right_mut(w, Node::set_color(Color::Black));
                        self.node_mut(w, Node::set_color(Color::Red));
                        self.left_rotate(w);
                        w = self.parent_ref(x, Node::left);
                    }
                    trace!("remove fixup at {x:?}: red far nephew, rotate parent right");
                    self.node_mut(w, Node::set_color(self.parent_ref(x, Node::color)));
                    self.parent_mut(x, Node::set_color(Color::Black));
                    self.left_mut(w, Node::set_color(Color::Black));
                    self.right_rotate(self.node_ref(x, Node::parent));
                    x = self.root;
                }
            }
        }
        self.node_mut(x, Node::set_color(Color::Black));
    }

    /// Binary tree left rotate.
    fn left_rotate(&mut self, x: NodeIndex<Ix>) {
        if self.right_ref(x, Node::is_sentinel) {
            return;
        }
        let y = self.node_ref(x, Node::right);
        self.node_mut(x, Node::set_right(self.node_ref(y, Node::left)));
        if !self.left_ref(y, Node::is_sentinel) {
            self.left_mut(y, Node::set_parent(x));
        }

        self.replace_parent(x, y);
        self.node_mut(y, Node::set_left(x));
    }

    /// Binary tree right rotate.
    fn right_rotate(&mut self, x: NodeIndex<Ix>) {
        if self.left_ref(x, Node::is_sentinel) {
            return;
        }
        let y = self.node_ref(x, Node::left);
        self.node_mut(x, Node::set_left(self.node_ref(y, Node::right)));
        if !self.right_ref(y, Node::is_sentinel) {
            self.right_mut(y, Node::set_parent(x));
        }

        self.replace_parent(x, y);
        self.node_mut(y, Node::set_right(x));
    }

    /// Replace parent during a rotation.
    fn replace_parent(&mut self, x: NodeIndex<Ix>, y: NodeIndex<Ix>) {
        self.node_mut(y, Node::set_parent(self.node_ref(x, Node::parent)));
        if self.parent_ref(x, Node::is_sentinel) {
            self.root = y;
        } else if self.is_left_child(x) {
            self.parent_mut(x, Node::set_left(y));
        } else {
            self.parent_mut(x, Node::set_right(y));
        }
        self.node_mut(x, Node::set_parent(y));
    }

    /// Replace one subtree as a child of its parent with another subtree.
    fn transplant(&mut self, u: NodeIndex<Ix>, v: NodeIndex<Ix>) {
        if self.parent_ref(u, Node::is_sentinel) {
            self.root = v;
        } else if self.is_left_child(u) {
            self.parent_mut(u, Node::set_left(v));
        } else {
            self.parent_mut(u, Node::set_right(v));
        }
        self.node_mut(v, Node::set_parent(self.node_ref(u, Node::parent)));
    }

    // Navigation below compares indices rather than node contents, so it
    // stays valid while `IntoIter` moves entries out of the nodes.

    /// Find the node with the minimum key in a subtree.
    fn tree_minimum(&self, mut x: NodeIndex<Ix>) -> NodeIndex<Ix> {
        while !self.node_ref(x, Node::left).is_sentinel() {
            x = self.node_ref(x, Node::left);
        }
        x
    }

    /// Find the node with the maximum key in a subtree.
    fn tree_maximum(&self, mut x: NodeIndex<Ix>) -> NodeIndex<Ix> {
        while !self.node_ref(x, Node::right).is_sentinel() {
            x = self.node_ref(x, Node::right);
        }
        x
    }

    /// Leftmost node, or the sentinel when empty.
    pub(crate) fn first_idx(&self) -> NodeIndex<Ix> {
        if self.root.is_sentinel() {
            return self.root;
        }
        self.tree_minimum(self.root)
    }

    /// Rightmost node, or the sentinel when empty.
    pub(crate) fn last_idx(&self) -> NodeIndex<Ix> {
        if self.root.is_sentinel() {
            return self.root;
        }
        self.tree_maximum(self.root)
    }

    /// The in-order successor, or the sentinel after the last node.
    pub(crate) fn successor(&self, mut x: NodeIndex<Ix>) -> NodeIndex<Ix> {
        let right = self.node_ref(x, Node::right);
        if !right.is_sentinel() {
            return self.tree_minimum(right);
        }
        let mut y = self.node_ref(x, Node::parent);
        while !y.is_sentinel() && self.node_ref(y, Node::right) == x {
            x = y;
            y = self.node_ref(y, Node::parent);
        }
        y
    }

    /// The in-order predecessor, or the sentinel before the first node.
    pub(crate) fn predecessor(&self, mut x: NodeIndex<Ix>) -> NodeIndex<Ix> {
        let left = self.node_ref(x, Node::left);
        if !left.is_sentinel() {
            return self.tree_maximum(left);
        }
        let mut y = self.node_ref(x, Node::parent);
        while !y.is_sentinel() && self.node_ref(y, Node::left) == x {
            x = y;
            y = self.node_ref(y, Node::parent);
        }
        y
    }

    /// In-order node indices.
    fn node_indices(&self) -> impl Iterator<Item = NodeIndex<Ix>> + '_ {
        let first = self.first_idx();
        std::iter::successors(
            (!self.node_ref(first, Node::is_sentinel)).then_some(first),
            move |&x| {
                let next = self.successor(x);
                (!self.node_ref(next, Node::is_sentinel)).then_some(next)
            },
        )
    }

    /// Check if a node is a left child of its parent.
    fn is_left_child(&self, node: NodeIndex<Ix>) -> bool {
        self.parent_ref(node, Node::left) == node
    }

    /// Check if a node is a right child of its parent.
    fn is_right_child(&self, node: NodeIndex<Ix>) -> bool {
        self.parent_ref(node, Node::right) == node
    }

    /// Update nodes indices after remove
    ///
    /// The node that lived at `old` now lives at `new`; rewire its parent
    /// and children to the new slot.
    fn update_idx(&mut self, old: NodeIndex<Ix>, new: NodeIndex<Ix>) {
        if self.root == old {
            self.root = new;
        }
        if self.nodes.get(new.index()).is_some() {
            if !self.parent_ref(new, Node::is_sentinel) {
                if self.parent_ref(new, Node::left) == old {
                    self.parent_mut(new, Node::set_left(new));
                } else {
                    self.parent_mut(new, Node::set_right(new));
                }
            }
            self.left_mut(new, Node::set_parent(new));
            self.right_mut(new, Node::set_parent(new));
        }
    }
}

impl<K, V, C, Ix> TreeMap<K, V, C, Ix>
where
    C: Compare<K>,
    Ix: IndexType,
{
    fn compare_nodes(&self, a: NodeIndex<Ix>, b: NodeIndex<Ix>) -> Ordering {
        self.cmp
            .compare(self.node_ref(a, Node::key), self.node_ref(b, Node::key))
    }

    /// Find the node holding `key`, or the place a new node for it would go.
    pub(crate) fn locate(&self, key: &K) -> Slot<Ix> {
        let mut y = NodeIndex::sentinel();
        let mut x = self.root;
        let mut go_left = false;
        while !self.node_ref(x, Node::is_sentinel) {
            y = x;
            match self.cmp.compare(key, self.node_ref(x, Node::key)) {
                Ordering::Less => {
                    go_left = true;
                    x = self.node_ref(x, Node::left);
                }
                Ordering::Greater => {
                    go_left = false;
                    x = self.node_ref(x, Node::right);
                }
                Ordering::Equal => return Slot::Occupied(x),
            }
        }
        Slot::Vacant { parent: y, go_left }
    }

    /// Search for the node with exact the given key
    fn search(&self, key: &K) -> Option<NodeIndex<Ix>> {
        match self.locate(key) {
            Slot::Occupied(node_idx) => Some(node_idx),
            Slot::Vacant { .. } => None,
        }
    }

    /// Leftmost node whose key is not less than `key`.
    fn lower_bound_idx(&self, key: &K) -> NodeIndex<Ix> {
        let mut x = self.root;
        let mut candidate = NodeIndex::sentinel();
        while !self.node_ref(x, Node::is_sentinel) {
            if self.cmp.compare(self.node_ref(x, Node::key), key) == Ordering::Less {
                x = self.node_ref(x, Node::right);
            } else {
                candidate = x;
                x = self.node_ref(x, Node::left);
            }
        }
        candidate
    }

    /// Leftmost node whose key is greater than `key`.
    fn upper_bound_idx(&self, key: &K) -> NodeIndex<Ix> {
        let mut x = self.root;
        let mut candidate = NodeIndex::sentinel();
        while !self.node_ref(x, Node::is_sentinel) {
            if self.cmp.compare(self.node_ref(x, Node::key), key) == Ordering::Greater {
                candidate = x;
                x = self.node_ref(x, Node::left);
            } else {
                x = self.node_ref(x, Node::right);
            }
        }
        candidate
    }

    /// Rightmost node whose key is less than `key`, or equal to it when `inclusive`.
    fn floor_idx(&self, key: &K, inclusive: bool) -> NodeIndex<Ix> {
        let mut x = self.root;
        let mut candidate = NodeIndex::sentinel();
        while !self.node_ref(x, Node::is_sentinel) {
            let ord = self.cmp.compare(self.node_ref(x, Node::key), key);
            if ord == Ordering::Less || (inclusive && ord == Ordering::Equal) {
                candidate = x;
                x = self.node_ref(x, Node::right);
            } else {
                x = self.node_ref(x, Node::left);
            }
        }
        candidate
    }
}

// Convenient methods for reference or mutate current/parent/left/right node
impl<'a, K, V, C, Ix> TreeMap<K, V, C, Ix>
where
    Ix: IndexType,
{
    pub(crate) fn node_ref<F, R>(&'a self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a Node<K, V, Ix>) -> R,
    {
        op(&self.nodes[node.index()])
    }

    pub(crate) fn node_mut<F, R>(&'a mut self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a mut Node<K, V, Ix>) -> R,
    {
        op(&mut self.nodes[node.index()])
    }

    fn left_ref<F, R>(&'a self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a Node<K, V, Ix>) -> R,
    {
        let idx = self.nodes[node.index()].left().index();
        op(&self.nodes[idx])
    }

    fn right_ref<F, R>(&'a self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a Node<K, V, Ix>) -> R,
    {
        let idx = self.nodes[node.index()].right().index();
        op(&self.nodes[idx])
    }

    fn parent_ref<F, R>(&'a self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a Node<K, V, Ix>) -> R,
    {
        let idx = self.nodes[node.index()].parent().index();
        op(&self.nodes[idx])
    }

    fn grand_parent_ref<F, R>(&'a self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a Node<K, V, Ix>) -> R,
    {
        let parent_idx = self.nodes[node.index()].parent().index();
        let grand_parent_idx = self.nodes[parent_idx].parent().index();
        op(&self.nodes[grand_parent_idx])
    }

    fn left_mut<F, R>(&'a mut self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a mut Node<K, V, Ix>) -> R,
    {
        let idx = self.nodes[node.index()].left().index();
        op(&mut self.nodes[idx])
    }

    fn right_mut<F, R>(&'a mut self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a mut Node<K, V, Ix>) -> R,
    {
        let idx = self.nodes[node.index()].right().index();
        op(&mut self.nodes[idx])
    }

    fn parent_mut<F, R>(&'a mut self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a mut Node<K, V, Ix>) -> R,
    {
        let idx = self.nodes[node.index()].parent().index();
        op(&mut self.nodes[idx])
    }

    fn grand_parent_mut<F, R>(&'a mut self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a mut Node<K, V, Ix>) -> R,
    {
        let parent_idx = self.nodes[node.index()].parent().index();
        let grand_parent_idx = self.nodes[parent_idx].parent().index();
        op(&mut self.nodes[grand_parent_idx])
    }
}

impl<K, V, C, Ix> Clone for TreeMap<K, V, C, Ix>
where
    K: Clone,
    V: Clone,
    C: Clone,
    Ix: IndexType,
{
    fn clone(&self) -> Self {
        TreeMap {
            nodes: self.nodes.clone(),
            root: self.root,
            len: self.len,
            cmp: self.cmp.clone(),
            generation: self.generation,
            id: next_map_id(),
        }
    }
}

impl<K, V, C, Ix> fmt::Debug for TreeMap<K, V, C, Ix>
where
    K: fmt::Debug,
    V: fmt::Debug,
    Ix: IndexType,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        let mut x = self.first_idx();
        while !self.node_ref(x, Node::is_sentinel) {
            let (k, v) = self.node_ref(x, Node::key_value);
            let _ignore = map.entry(k, v);
            x = self.successor(x);
        }
        map.finish()
    }
}

impl<K, V, C, Ix> PartialEq for TreeMap<K, V, C, Ix>
where
    K: PartialEq,
    V: PartialEq,
    C: Compare<K>,
    Ix: IndexType,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K, V, C, Ix> Eq for TreeMap<K, V, C, Ix>
where
    K: Eq,
    V: Eq,
    C: Compare<K>,
    Ix: IndexType,
{
}

impl<K, V, C, Ix> Index<&K> for TreeMap<K, V, C, Ix>
where
    C: Compare<K>,
    Ix: IndexType,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics if the key is not present in the map.
    #[inline]
    fn index(&self, key: &K) -> &V {
        self.get(key).expect("key not found in map")
    }
}

impl<K, V, C, Ix> Extend<(K, V)> for TreeMap<K, V, C, Ix>
where
    C: Compare<K>,
    Ix: IndexType,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            let _ignore = self.insert(k, v);
        }
    }
}

impl<K, V, C, Ix> FromIterator<(K, V)> for TreeMap<K, V, C, Ix>
where
    C: Compare<K> + Default,
    Ix: IndexType,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K, V, C, Ix> IntoIterator for TreeMap<K, V, C, Ix>
where
    C: Compare<K>,
    Ix: IndexType,
{
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, C, Ix>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<'a, K, V, C, Ix> IntoIterator for &'a TreeMap<K, V, C, Ix>
where
    C: Compare<K>,
    Ix: IndexType,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, C, Ix>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, C, Ix> IntoIterator for &'a mut TreeMap<K, V, C, Ix>
where
    C: Compare<K>,
    Ix: IndexType,
{
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
