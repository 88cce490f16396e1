//! Key orderings used by `TreeMap`.
//!
//! A comparator must be a strict total order: antisymmetric, transitive and
//! consistent between calls. The map never stores two keys that compare
//! `Equal`, so a comparator that treats distinct keys as equal merges them.

use std::cmp::Ordering;

/// A total order over keys of type `K`.
///
/// Any `Fn(&K, &K) -> Ordering` closure is a comparator:
///
/// ```rust
/// use rb_tree_map::TreeMap;
///
/// let by_len = |a: &String, b: &String| a.len().cmp(&b.len()).then_with(|| a.cmp(b));
/// let mut map: TreeMap<String, u32, _> = TreeMap::with_comparator(by_len);
/// map.insert("ccc".to_string(), 3);
/// map.insert("a".to_string(), 1);
/// map.insert("bb".to_string(), 2);
/// assert_eq!(map.values().copied().collect::<Vec<_>>(), [1, 2, 3]);
/// ```
pub trait Compare<K: ?Sized> {
    /// Compares two keys.
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// Orders keys by their `Ord` implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Natural;

impl<K: Ord + ?Sized> Compare<K> for Natural {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Flips the order of another comparator.
///
/// ```rust
/// use rb_tree_map::{Natural, Reverse, TreeMap};
///
/// let mut map: TreeMap<i32, ()> = TreeMap::new();
/// let mut rev: TreeMap<i32, (), Reverse> = TreeMap::with_comparator(Reverse(Natural));
/// for k in [2, 3, 1] {
///     map.insert(k, ());
///     rev.insert(k, ());
/// }
/// assert!(map.keys().eq(rev.keys().rev()));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Reverse<C = Natural>(pub C);

impl<K: ?Sized, C: Compare<K>> Compare<K> for Reverse<C> {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self.0.compare(b, a)
    }
}

impl<K: ?Sized, F> Compare<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn natural_follows_ord() {
        assert_eq!(Natural.compare(&1, &2), Ordering::Less);
        assert_eq!(Natural.compare("b", "a"), Ordering::Greater);
        assert_eq!(Natural.compare(&7, &7), Ordering::Equal);
    }

    #[test]
    fn reverse_flips_inner_order() {
        assert_eq!(Reverse(Natural).compare(&1, &2), Ordering::Greater);
        assert_eq!(Reverse(Reverse(Natural)).compare(&1, &2), Ordering::Less);
    }

    #[test]
    fn closure_is_comparator() {
        let by_abs = |a: &i32, b: &i32| a.abs().cmp(&b.abs());
        assert_eq!(by_abs.compare(&-5, &3), Ordering::Greater);
        assert_eq!(by_abs.compare(&-3, &3), Ordering::Equal);
    }
}
