//! `rb_tree_map` is an ordered map based on a red-black tree.
//!
//! It fully implements the insertion and deletion functionality of a red-black tree,
//! ensuring that each modification operation requires at most O(logN) time complexity,
//! and keeps its entries sorted by key for iteration, range queries and cursors.
//!
//! To safely and efficiently handle insertion and deletion operations in Rust,
//! `rb_tree_map` uses arrays to simulate pointers for managing the parent-child
//! references in the red-black tree. This approach also ensures that the map has the
//! `Send` and `Unpin` traits, allowing it to be safely transferred between threads and
//! to maintain a fixed memory location during asynchronous operations.
//!
//! The map does no locking of its own. Iterators and cursors borrow it, so it
//! cannot be modified while they are alive; detached [`Position`]s are checked
//! against a generation counter instead.
//!
//! # Example
//!
//! ```rust
//! use rb_tree_map::TreeMap;
//!
//! let mut map = TreeMap::new();
//! for k in [10, 5, 20, 3, 7, 15, 25] {
//!     map.insert(k, k * 10);
//! }
//! assert_eq!(map.get(&7), Some(&70));
//! assert!(map.remove(&10).is_some());
//! assert_eq!(map.keys().copied().collect::<Vec<_>>(), [3, 5, 7, 15, 20, 25]);
//! ```
//!

mod compare;
mod cursor;
mod entry;
mod error;
#[cfg(feature = "graphviz")]
mod graphviz;
mod index;
mod iter;
mod node;
#[cfg(feature = "serde")]
mod serde_impl;
mod treemap;


pub use compare::{Compare, Natural, Reverse};
pub use cursor::{Cursor, Position};
pub use entry::{Entry, OccupiedEntry, VacantEntry};
pub use error::Error;
pub use index::{DefaultIx, IndexType};
pub use iter::{IntoIter, Iter, IterMut, Keys, Range, Values, ValuesMut};
pub use treemap::TreeMap;
