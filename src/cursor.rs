//! Bidirectional cursors over a `TreeMap`.
//!
//! A cursor points either at an entry or at the end position, a ghost slot
//! that sits after the largest key and before the smallest one. Moving past
//! either extreme lands on the end position, and moving again wraps around:
//!
//! ```rust
//! use rb_tree_map::TreeMap;
//!
//! let map: TreeMap<i32, char> = [(1, 'a'), (2, 'b')].into_iter().collect();
//! let mut cursor = map.cursor_back();
//! assert_eq!(cursor.key(), Some(&2));
//! cursor.move_next();
//! assert!(cursor.is_end());
//! cursor.move_next();
//! assert_eq!(cursor.key(), Some(&1));
//! ```
//!
//! A cursor borrows its map, so the map cannot change under it. To hold on
//! to a location across mutations, detach it with [`Cursor::position`].

use std::fmt;

use crate::index::{DefaultIx, IndexType, NodeIndex};
use crate::node::Node;
use crate::treemap::TreeMap;

/// A cursor over the entries of a `TreeMap`.
pub struct Cursor<'a, K, V, C, Ix> {
    /// Reference to the map
    map_ref: &'a TreeMap<K, V, C, Ix>,
    /// Current node, the sentinel for the end position
    current: NodeIndex<Ix>,
}

impl<'a, K, V, C, Ix> Cursor<'a, K, V, C, Ix>
where
    Ix: IndexType,
{
    pub(crate) fn new(map_ref: &'a TreeMap<K, V, C, Ix>, current: NodeIndex<Ix>) -> Self {
        Cursor { map_ref, current }
    }

    /// Return `true` if the cursor is at the end position.
    #[inline]
    pub fn is_end(&self) -> bool {
        self.current.is_sentinel()
    }

    /// Return the key under the cursor, or `None` at the end position.
    #[inline]
    pub fn key(&self) -> Option<&'a K> {
        self.key_value().map(|(k, _)| k)
    }

    /// Return the value under the cursor, or `None` at the end position.
    #[inline]
    pub fn value(&self) -> Option<&'a V> {
        self.key_value().map(|(_, v)| v)
    }

    /// Return the entry under the cursor, or `None` at the end position.
    #[inline]
    pub fn key_value(&self) -> Option<(&'a K, &'a V)> {
        if self.is_end() {
            return None;
        }
        Some(self.map_ref.node_ref(self.current, Node::key_value))
    }

    /// Move to the next entry in key order.
    #[inline]
    pub fn move_next(&mut self) {
        self.current = self.next_idx();
    }

    /// Move to the previous entry in key order.
    #[inline]
    pub fn move_prev(&mut self) {
        self.current = self.prev_idx();
    }

    /// Return the entry after the cursor without moving it.
    #[inline]
    pub fn peek_next(&self) -> Option<(&'a K, &'a V)> {
        Cursor::new(self.map_ref, self.next_idx()).key_value()
    }

    /// Return the entry before the cursor without moving it.
    #[inline]
    pub fn peek_prev(&self) -> Option<(&'a K, &'a V)> {
        Cursor::new(self.map_ref, self.prev_idx()).key_value()
    }

    /// Detach the cursor from the map borrow.
    ///
    /// The returned `Position` can be turned back into a cursor with
    /// [`TreeMap::cursor_at`] on the same map, as long as that map is not
    /// restructured in the meantime; overwriting values does not count as
    /// restructuring.
    #[inline]
    pub fn position(&self) -> Position<Ix> {
        Position {
            node: self.current,
            generation: self.map_ref.generation,
            map_id: self.map_ref.id,
        }
    }

    fn next_idx(&self) -> NodeIndex<Ix> {
        if self.is_end() {
            self.map_ref.first_idx()
        } else {
            self.map_ref.successor(self.current)
        }
    }

    fn prev_idx(&self) -> NodeIndex<Ix> {
        if self.is_end() {
            self.map_ref.last_idx()
        } else {
            self.map_ref.predecessor(self.current)
        }
    }
}

impl<K, V, C, Ix: Copy> Clone for Cursor<'_, K, V, C, Ix> {
    fn clone(&self) -> Self {
        Cursor {
            map_ref: self.map_ref,
            current: self.current,
        }
    }
}

impl<K, V, C, Ix: Copy> Copy for Cursor<'_, K, V, C, Ix> {}

/// Cursors are equal when they point at the same slot of the same map.
impl<K, V, C, Ix: PartialEq> PartialEq for Cursor<'_, K, V, C, Ix> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.map_ref, other.map_ref) && self.current == other.current
    }
}

impl<K, V, C, Ix: Eq> Eq for Cursor<'_, K, V, C, Ix> {}

impl<K, V, C, Ix> fmt::Debug for Cursor<'_, K, V, C, Ix>
where
    K: fmt::Debug,
    V: fmt::Debug,
    Ix: IndexType,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.key_value()).finish()
    }
}

/// A cursor location detached from the map borrow.
///
/// It records which map it came from and that map's generation at the time
/// it was taken. Using it after the map gained or lost an entry, or was
/// cleared, fails with `Error::StalePosition`; using it on any other map,
/// a clone included, fails with `Error::ForeignPosition`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position<Ix = DefaultIx> {
    pub(crate) node: NodeIndex<Ix>,
    pub(crate) generation: u64,
    pub(crate) map_id: u64,
}

impl<Ix: IndexType> Position<Ix> {
    /// Return `true` if the position is the end position.
    #[inline]
    pub fn is_end(&self) -> bool {
        self.node.is_sentinel()
    }
}
