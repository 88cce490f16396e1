use std::fmt;
use std::iter::FusedIterator;

use crate::index::{IndexType, NodeIndex};
use crate::node::Node;
use crate::treemap::TreeMap;

/// An iterator over the entries of a `TreeMap`, sorted by key.
///
/// Walks the tree through parent links, so it holds no stack.
pub struct Iter<'a, K, V, C, Ix> {
    /// Reference to the map
    map_ref: &'a TreeMap<K, V, C, Ix>,
    /// Next node yielded from the front
    front: NodeIndex<Ix>,
    /// Next node yielded from the back
    back: NodeIndex<Ix>,
    /// Number of entries not yet yielded
    remaining: usize,
}

impl<'a, K, V, C, Ix> Iter<'a, K, V, C, Ix>
where
    Ix: IndexType,
{
    pub(crate) fn new(map_ref: &'a TreeMap<K, V, C, Ix>) -> Self {
        Iter {
            map_ref,
            front: map_ref.first_idx(),
            back: map_ref.last_idx(),
            remaining: map_ref.len(),
        }
    }
}

impl<K, V, C, Ix: Copy> Clone for Iter<'_, K, V, C, Ix> {
    fn clone(&self) -> Self {
        Iter {
            map_ref: self.map_ref,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<K, V, C, Ix> fmt::Debug for Iter<'_, K, V, C, Ix>
where
    K: fmt::Debug,
    V: fmt::Debug,
    Ix: IndexType,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V, C, Ix> Iterator for Iter<'a, K, V, C, Ix>
where
    Ix: IndexType,
{
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let x = self.front;
        self.front = self.map_ref.successor(x);
        self.remaining -= 1;
        Some(self.map_ref.node_ref(x, Node::key_value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, C, Ix> DoubleEndedIterator for Iter<'_, K, V, C, Ix>
where
    Ix: IndexType,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let x = self.back;
        self.back = self.map_ref.predecessor(x);
        self.remaining -= 1;
        Some(self.map_ref.node_ref(x, Node::key_value))
    }
}

impl<K, V, C, Ix: IndexType> ExactSizeIterator for Iter<'_, K, V, C, Ix> {}

impl<K, V, C, Ix: IndexType> FusedIterator for Iter<'_, K, V, C, Ix> {}

/// An iterator over the keys of a `TreeMap`.
pub struct Keys<'a, K, V, C, Ix> {
    pub(crate) inner: Iter<'a, K, V, C, Ix>,
}

impl<'a, K, V, C, Ix: IndexType> Iterator for Keys<'a, K, V, C, Ix> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, C, Ix: IndexType> DoubleEndedIterator for Keys<'_, K, V, C, Ix> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V, C, Ix: IndexType> ExactSizeIterator for Keys<'_, K, V, C, Ix> {}

impl<K, V, C, Ix: IndexType> FusedIterator for Keys<'_, K, V, C, Ix> {}

impl<K: fmt::Debug, V, C, Ix: IndexType> fmt::Debug for Keys<'_, K, V, C, Ix> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.inner.clone().map(|(k, _)| k))
            .finish()
    }
}

/// An iterator over the values of a `TreeMap`, in key order.
pub struct Values<'a, K, V, C, Ix> {
    pub(crate) inner: Iter<'a, K, V, C, Ix>,
}

impl<'a, K, V, C, Ix: IndexType> Iterator for Values<'a, K, V, C, Ix> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, C, Ix: IndexType> DoubleEndedIterator for Values<'_, K, V, C, Ix> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V, C, Ix: IndexType> ExactSizeIterator for Values<'_, K, V, C, Ix> {}

impl<K, V, C, Ix: IndexType> FusedIterator for Values<'_, K, V, C, Ix> {}

impl<K, V: fmt::Debug, C, Ix: IndexType> fmt::Debug for Values<'_, K, V, C, Ix> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.inner.clone().map(|(_, v)| v))
            .finish()
    }
}

/// An iterator over the entries of a `TreeMap` with mutable values, sorted by key.
///
/// The visiting order is resolved when the iterator is created.
#[derive(Debug)]
pub struct IterMut<'a, K, V> {
    inner: std::vec::IntoIter<(&'a K, &'a mut V)>,
}

impl<'a, K, V> IterMut<'a, K, V> {
    pub(crate) fn new(entries: Vec<(&'a K, &'a mut V)>) -> Self {
        IterMut {
            inner: entries.into_iter(),
        }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// An iterator over mutable references to the values of a `TreeMap`, in key order.
#[derive(Debug)]
pub struct ValuesMut<'a, K, V> {
    pub(crate) inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    #[inline]
    fn next(&mut self) -> Option<&'a mut V> {
        self.inner.next().map(|(_, v)| v)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for ValuesMut<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}

impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}

/// An into iterator over the entries of a `TreeMap`, sorted by key.
pub struct IntoIter<K, V, C, Ix> {
    map: TreeMap<K, V, C, Ix>,
    front: NodeIndex<Ix>,
    back: NodeIndex<Ix>,
    remaining: usize,
}

impl<K, V, C, Ix> IntoIter<K, V, C, Ix>
where
    Ix: IndexType,
{
    pub(crate) fn new(map: TreeMap<K, V, C, Ix>) -> Self {
        IntoIter {
            front: map.first_idx(),
            back: map.last_idx(),
            remaining: map.len(),
            map,
        }
    }
}

impl<K, V, C, Ix> Iterator for IntoIter<K, V, C, Ix>
where
    Ix: IndexType,
{
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        // links stay intact, only the entry is moved out
        let x = self.front;
        self.front = self.map.successor(x);
        self.remaining -= 1;
        self.map.node_mut(x, Node::take_entry)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, C, Ix> DoubleEndedIterator for IntoIter<K, V, C, Ix>
where
    Ix: IndexType,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let x = self.back;
        self.back = self.map.predecessor(x);
        self.remaining -= 1;
        self.map.node_mut(x, Node::take_entry)
    }
}

impl<K, V, C, Ix: IndexType> ExactSizeIterator for IntoIter<K, V, C, Ix> {}

impl<K, V, C, Ix: IndexType> FusedIterator for IntoIter<K, V, C, Ix> {}

/// An iterator over a sub-range of the entries of a `TreeMap`, sorted by key.
pub struct Range<'a, K, V, C, Ix> {
    /// Reference to the map
    map_ref: &'a TreeMap<K, V, C, Ix>,
    /// Next node yielded from the front
    front: NodeIndex<Ix>,
    /// Next node yielded from the back
    back: NodeIndex<Ix>,
    /// Set once `front` and `back` have met
    finished: bool,
}

impl<'a, K, V, C, Ix> Range<'a, K, V, C, Ix>
where
    Ix: IndexType,
{
    pub(crate) fn new(
        map_ref: &'a TreeMap<K, V, C, Ix>,
        front: NodeIndex<Ix>,
        back: NodeIndex<Ix>,
        finished: bool,
    ) -> Self {
        Range {
            map_ref,
            front,
            back,
            finished,
        }
    }
}

impl<'a, K, V, C, Ix> Iterator for Range<'a, K, V, C, Ix>
where
    Ix: IndexType,
{
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let x = self.front;
        if x == self.back {
            self.finished = true;
        } else {
            self.front = self.map_ref.successor(x);
        }
        Some(self.map_ref.node_ref(x, Node::key_value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            (0, Some(0))
        } else {
            (1, Some(self.map_ref.len()))
        }
    }
}

impl<K, V, C, Ix> DoubleEndedIterator for Range<'_, K, V, C, Ix>
where
    Ix: IndexType,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let x = self.back;
        if x == self.front {
            self.finished = true;
        } else {
            self.back = self.map_ref.predecessor(x);
        }
        Some(self.map_ref.node_ref(x, Node::key_value))
    }
}

impl<K, V, C, Ix: IndexType> FusedIterator for Range<'_, K, V, C, Ix> {}

impl<K, V, C, Ix> fmt::Debug for Range<'_, K, V, C, Ix>
where
    K: fmt::Debug,
    V: fmt::Debug,
    Ix: IndexType,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rest = Range::new(self.map_ref, self.front, self.back, self.finished);
        f.debug_list().entries(rest).finish()
    }
}
