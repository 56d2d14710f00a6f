//! Persistent priority queues.
//!
//! A [`PHeap`] is an immutable mergeable heap backed by a binomial forest.
//! The ordering polarity is part of the type: [`PMinHeap`] pops its
//! smallest key first, [`PMaxHeap`] its largest, and the two cannot be
//! merged or compared with each other by construction. Entries are
//! `(key, value)` pairs; entries pushed with equal keys may come back in
//! any order.
//!
//! Like the sequences, every operation returns a new heap sharing
//! structure with the old one. Structural operations clone the keys and
//! values they re-root, so the element bounds are `K: Ord + Clone` and
//! `V: Clone`.

use std::marker::PhantomData;
use std::rc::Rc;

use crate::error::{Error, Result};

mod forest;
mod implementations;
mod iterators;

pub use iterators::{Items, IterSorted, IterUnordered, Keys, Values};

use forest::{singleton, Forest};

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Min {}
    impl Sealed for super::Max {}
}

/// The ordering polarity of a heap: which of two keys is closer to the
/// top. Sealed; the only implementations are [`Min`] and [`Max`].
pub trait Polarity: sealed::Sealed + 'static {
    /// Name mixed into hashes and debug output so heaps of different
    /// polarity never collide.
    const NAME: &'static str;

    /// Whether key `a` beats key `b` for the top of the heap. Strict:
    /// equal keys do not beat each other.
    fn wins<K: Ord>(a: &K, b: &K) -> bool;
}

/// Min-heap polarity: smaller keys surface first.
pub enum Min {}

/// Max-heap polarity: larger keys surface first.
pub enum Max {}

impl Polarity for Min {
    const NAME: &'static str = "PMinHeap";

    fn wins<K: Ord>(a: &K, b: &K) -> bool {
        a < b
    }
}

impl Polarity for Max {
    const NAME: &'static str = "PMaxHeap";

    fn wins<K: Ord>(a: &K, b: &K) -> bool {
        a > b
    }
}

/// A persistent binomial heap. See the [module docs](self).
///
/// The entry whose key wins under the polarity is cached outside the
/// forest, so peeking is O(1); push is amortized O(1), and pop and merge
/// are O(log n).
///
/// ```
/// use bramble::pminheap;
///
/// let heap = pminheap![(2, "b"), (1, "a")];
/// assert_eq!(heap.peek(), Ok((&1, &"a")));
/// let (key, value, rest) = heap.pop().unwrap();
/// assert_eq!((key, value), (1, "a"));
/// assert_eq!(rest.peek(), Ok((&2, &"b")));
/// assert_eq!(heap.len(), 2);
/// ```
pub struct PHeap<K, V, P> {
    size: usize,
    top: Option<(K, V)>,
    forest: Option<Rc<Forest<K, V>>>,
    polarity: PhantomData<P>,
}

/// A heap that pops its smallest key first.
pub type PMinHeap<K, V> = PHeap<K, V, Min>;

/// A heap that pops its largest key first.
pub type PMaxHeap<K, V> = PHeap<K, V, Max>;

impl<K, V, P: Polarity> PHeap<K, V, P> {
    /// Creates an empty heap.
    pub fn new() -> Self {
        PHeap {
            size: 0,
            top: None,
            forest: None,
            polarity: PhantomData,
        }
    }

    /// The number of entries. O(1).
    pub fn len(&self) -> usize {
        self.size
    }

    /// Whether the heap has no entries. O(1).
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// The winning entry, failing with [`Empty`](Error::Empty) on an empty
    /// heap. O(1).
    pub fn peek(&self) -> Result<(&K, &V)> {
        match &self.top {
            None => Err(Error::Empty),
            Some((key, value)) => Ok((key, value)),
        }
    }

    /// A borrowing traversal in no particular (but deterministic) order.
    /// O(n) overall and needs no bounds on the entries.
    pub fn iter_unordered(&self) -> IterUnordered<'_, K, V> {
        IterUnordered::new(self)
    }

    pub(crate) fn top_entry(&self) -> Option<&(K, V)> {
        self.top.as_ref()
    }

    pub(crate) fn forest_entries(&self) -> Option<&Rc<Forest<K, V>>> {
        self.forest.as_ref()
    }
}

impl<K: Ord + Clone, V: Clone, P: Polarity> PHeap<K, V, P> {
    /// Inserts an entry. Amortized O(1), worst case O(log n).
    ///
    /// ```
    /// use bramble::{pminheap, pmaxheap};
    ///
    /// let heap = pminheap![(1, "a"), (2, "b")].push(0, "z");
    /// assert_eq!(heap.peek(), Ok((&0, &"z")));
    /// let heap = pmaxheap![(1, "a"), (2, "b")].push(0, "z");
    /// assert_eq!(heap.peek(), Ok((&2, &"b")));
    /// ```
    pub fn push(&self, key: K, value: V) -> Self {
        match &self.top {
            None => PHeap {
                size: 1,
                top: Some((key, value)),
                forest: None,
                polarity: PhantomData,
            },
            Some((top_key, top_value)) => {
                let (top, demoted) = if P::wins(&key, top_key) {
                    ((key, value), (top_key.clone(), top_value.clone()))
                } else {
                    ((top_key.clone(), top_value.clone()), (key, value))
                };
                PHeap {
                    size: self.size + 1,
                    top: Some(top),
                    forest: Some(forest::push::<K, V, P>(
                        &self.forest,
                        0,
                        singleton(demoted.0, demoted.1),
                    )),
                    polarity: PhantomData,
                }
            }
        }
    }

    /// Removes the winning entry, returning it together with the rest of
    /// the heap. O(log n).
    ///
    /// ```
    /// use bramble::pminheap;
    ///
    /// let (key, value, rest) = pminheap![(2, "b"), (1, "a")].pop().unwrap();
    /// assert_eq!((key, value), (1, "a"));
    /// assert_eq!(rest.len(), 1);
    /// ```
    pub fn pop(&self) -> Result<(K, V, Self)> {
        match &self.top {
            None => Err(Error::Empty),
            Some((key, value)) => {
                let rest = match &self.forest {
                    None => PHeap::new(),
                    Some(forest) => {
                        let (next_key, next_value, next_forest) =
                            forest::pop::<K, V, P>(forest);
                        PHeap {
                            size: self.size - 1,
                            top: Some((next_key, next_value)),
                            forest: next_forest,
                            polarity: PhantomData,
                        }
                    }
                };
                Ok((key.clone(), value.clone(), rest))
            }
        }
    }

    /// The union of two heaps of the same polarity. O(log(n + m)).
    ///
    /// The losing cached top is demoted back into the merged forest as a
    /// rank-0 tree.
    pub fn merge(&self, other: &Self) -> Self {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }
        let self_top = self.top.as_ref().expect("nonempty heap with no top");
        let other_top = other.top.as_ref().expect("nonempty heap with no top");
        let (winner, loser) = if P::wins(&other_top.0, &self_top.0) {
            (other, self)
        } else {
            (self, other)
        };
        let (demoted_key, demoted_value) = loser
            .top
            .clone()
            .expect("nonempty heap with no top");
        let merged = forest::merge::<K, V, P>(&winner.forest, &loser.forest);
        let forest = forest::push::<K, V, P>(&merged, 0, singleton(demoted_key, demoted_value));
        PHeap {
            size: self.size + other.size,
            top: winner.top.clone(),
            forest: Some(forest),
            polarity: PhantomData,
        }
    }

    /// Merges in an iterable of `(key, value)` pairs.
    pub fn merge_pairs(&self, pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        self.merge(&pairs.into_iter().collect())
    }

    /// Builds a heap giving every key the same value. O(n).
    pub fn from_keys(keys: impl IntoIterator<Item = K>, value: V) -> Self {
        keys.into_iter()
            .map(|key| (key, value.clone()))
            .collect()
    }

    /// Whether any entry has this key. O(n).
    pub fn contains_key(&self, key: &K) -> bool {
        self.iter_unordered().any(|(candidate, _)| candidate == key)
    }

    /// Traverses entries in key order (ties in unspecified order) by
    /// repeatedly popping a working copy. O(n log n) overall.
    pub fn iter_sorted(&self) -> IterSorted<K, V, P> {
        IterSorted::new(self.clone())
    }

    /// A view of the `(key, value)` entries. With `sorted` the entries
    /// come out in key order (O(n log n) overall); without it they come
    /// out in an order determined only by the forest shape (O(n)).
    ///
    /// ```
    /// use bramble::pminheap;
    ///
    /// let heap = pminheap![(2, "b"), (1, "a"), (3, "c")];
    /// assert_eq!(
    ///     heap.items(true).collect::<Vec<_>>(),
    ///     vec![(1, "a"), (2, "b"), (3, "c")],
    /// );
    /// assert_eq!(heap.items(false).count(), 3);
    /// ```
    pub fn items(&self, sorted: bool) -> Items<'_, K, V, P> {
        Items::new(self, sorted)
    }

    /// A view of the keys; the `sorted` flag works like
    /// [`items`](Self::items).
    pub fn keys(&self, sorted: bool) -> Keys<'_, K, V, P> {
        Keys::new(self, sorted)
    }

    /// A view of the values, ordered like the corresponding
    /// [`items`](Self::items) view.
    pub fn values(&self, sorted: bool) -> Values<'_, K, V, P> {
        Values::new(self, sorted)
    }

    /// Panics unless every heap invariant holds: rank-sorted forest,
    /// well-formed binomial trees, the heap property on every edge, the
    /// cached top beating every forest key, and a consistent size.
    /// Intended for tests.
    pub fn assert_correctness(&self) {
        let forest_count = forest::check::<K, V, P>(&self.forest);
        match &self.top {
            None => {
                assert_eq!(self.size, 0, "empty heap with a nonzero size");
                assert_eq!(forest_count, 0, "empty heap with a forest");
            }
            Some((top_key, _)) => {
                assert_eq!(self.size, forest_count + 1, "cached size out of date");
                for (key, _) in self.iter_unordered() {
                    assert!(
                        !P::wins(key, top_key),
                        "cached top does not win against the forest"
                    );
                }
            }
        }
    }
}

impl<K: Clone, V: Clone, P> Clone for PHeap<K, V, P> {
    fn clone(&self) -> Self {
        PHeap {
            size: self.size,
            top: self.top.clone(),
            forest: self.forest.clone(),
            polarity: PhantomData,
        }
    }
}

/// Builds a [`PMinHeap`] from `(key, value)` pairs, like `vec!`.
///
/// ```
/// use bramble::pminheap;
///
/// let heap = pminheap![(2, "b"), (1, "a"), (3, "c")];
/// assert_eq!(heap.keys(true).collect::<Vec<_>>(), vec![1, 2, 3]);
/// ```
#[macro_export]
macro_rules! pminheap {
    () => {
        $crate::PMinHeap::new()
    };
    ($($pair:expr),+ $(,)?) => {
        vec![$($pair),+].into_iter().collect::<$crate::PMinHeap<_, _>>()
    };
}

/// Builds a [`PMaxHeap`] from `(key, value)` pairs, like `vec!`.
///
/// ```
/// use bramble::pmaxheap;
///
/// let heap = pmaxheap![(2, "b"), (1, "a"), (3, "c")];
/// assert_eq!(heap.keys(true).collect::<Vec<_>>(), vec![3, 2, 1]);
/// ```
#[macro_export]
macro_rules! pmaxheap {
    () => {
        $crate::PMaxHeap::new()
    };
    ($($pair:expr),+ $(,)?) => {
        vec![$($pair),+].into_iter().collect::<$crate::PMaxHeap<_, _>>()
    };
}
