//! Persistent sequences.
//!
//! A [`PSequence`] is an immutable sequence with fast access to both ends,
//! logarithmic random access, and logarithmic split and concatenation. Every
//! operation that looks like a mutation returns a new sequence sharing
//! structure with the old one; the old sequence is never changed.
//!
//! Indices are [`isize`]: negative indices count from the right end, so `-1`
//! is the last element. Range selections take a [`Slice`](crate::Slice),
//! which converts from the standard range types.

use std::rc::Rc;

use crate::error::{Error, Result};
use crate::utility::{check_index, clamp_index, Slice};

pub(crate) mod tree;

mod evolver;
mod implementations;
mod iterators;

pub use evolver::Evolver;
pub use iterators::{IntoIter, Iter};

use tree::{from_nodes, unwrap_leaf, FingerTree, Node};

/// A persistent sequence backed by a size-annotated 2-3 finger tree.
///
/// Cloning is O(1) and shares all structure. The cheap operations are the
/// ones a finger tree is good at:
///
/// - pushing or popping at either end: amortized O(1)
/// - indexing, inserting or deleting in the middle: O(log n)
/// - splitting and concatenating: O(log n)
/// - repeating `k` times: O(log n · log k)
///
/// ```
/// use bramble::psequence;
///
/// let seq = psequence![1, 2, 3];
/// let longer = seq.push_back(4);
/// assert_eq!(seq.len(), 3);
/// assert_eq!(longer.to_vec(), vec![1, 2, 3, 4]);
/// assert_eq!(seq.concat(&longer).len(), 7);
/// ```
pub struct PSequence<T> {
    tree: FingerTree<T>,
}

impl<T> PSequence<T> {
    /// Creates an empty sequence.
    pub fn new() -> Self {
        PSequence {
            tree: FingerTree::Empty,
        }
    }

    /// Creates a one-element sequence.
    pub fn unit(value: T) -> Self {
        PSequence {
            tree: FingerTree::Single(Rc::new(Node::Leaf(value))),
        }
    }

    fn from_tree(tree: FingerTree<T>) -> Self {
        PSequence { tree }
    }

    /// The number of elements. O(1).
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Whether the sequence has no elements. O(1).
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// The first element, or `None` when empty. O(1).
    pub fn front(&self) -> Option<&T> {
        self.tree.front()
    }

    /// The last element, or `None` when empty. O(1).
    pub fn back(&self) -> Option<&T> {
        self.tree.back()
    }

    /// The element at `index`. O(log min(i, n−i)).
    ///
    /// ```
    /// use bramble::psequence;
    ///
    /// let seq = psequence![1, 2, 3, 4];
    /// assert_eq!(seq.get(2), Ok(&3));
    /// assert_eq!(seq.get(-1), Ok(&4));
    /// assert!(seq.get(4).is_err());
    /// ```
    pub fn get(&self, index: isize) -> Result<&T> {
        let index = check_index(self.len(), index)?;
        Ok(self.tree.lookup(index))
    }

    /// The subsequence selected by `slice`, as a new sequence.
    ///
    /// Contiguous slices (step ±1) are O(log n); strided slices walk the
    /// selected elements. A negative step reverses the result.
    ///
    /// ```
    /// use bramble::{psequence, Slice};
    ///
    /// let seq = psequence![1, 2, 3, 4, 5];
    /// assert_eq!(seq.get_slice(1..4).unwrap().to_vec(), vec![2, 3, 4]);
    /// let evens = seq.get_slice(Slice::everything().step_by(2)).unwrap();
    /// assert_eq!(evens.to_vec(), vec![1, 3, 5]);
    /// ```
    pub fn get_slice(&self, slice: impl Into<Slice>) -> Result<PSequence<T>> {
        let ix = slice.into().normalize(self.len())?;
        if ix.count == 0 {
            return Ok(PSequence::new());
        }
        let ix = ix.ascending();
        let tree = if ix.step.abs() == 1 {
            let (start, stop) = (ix.start as usize, ix.stop as usize);
            let mut tree = self.tree.clone();
            if stop < self.len() {
                tree = tree.take_front(stop);
            }
            if start > 0 {
                tree = tree.take_back(stop - start);
            }
            tree
        } else {
            let mut nodes = Vec::with_capacity(ix.count);
            self.tree.stride(
                ix.start as usize,
                ix.count,
                (ix.step.abs() - 1) as usize,
                &mut nodes,
            );
            from_nodes(&nodes)
        };
        Ok(PSequence::from_tree(if ix.step < 0 {
            tree.reverse()
        } else {
            tree
        }))
    }

    /// Replaces the element at `index`. O(log n).
    ///
    /// ```
    /// use bramble::psequence;
    ///
    /// assert_eq!(
    ///     psequence![1, 2, 3, 4].set(2, 0).unwrap(),
    ///     psequence![1, 2, 0, 4],
    /// );
    /// ```
    pub fn set(&self, index: isize, value: T) -> Result<PSequence<T>> {
        let index = check_index(self.len(), index)?;
        Ok(PSequence::from_tree(self.tree.update(index, value)))
    }

    /// Replaces the elements selected by `slice` with `values`.
    ///
    /// With step 1 this is a splice: the replacement may have any length.
    /// With any other step the replacement length must equal the number of
    /// selected positions, or the call fails with
    /// [`LengthMismatch`](Error::LengthMismatch); a negative step consumes
    /// the replacement right to left.
    pub fn set_slice(
        &self,
        slice: impl Into<Slice>,
        values: impl IntoIterator<Item = T>,
    ) -> Result<PSequence<T>> {
        let ix = slice.into().normalize(self.len())?;
        if ix.step == 1 {
            let (start, stop) = (ix.start as usize, ix.stop as usize);
            let middle: PSequence<T> = values.into_iter().collect();
            let front = self.tree.take_front(start);
            let back = self.tree.take_back(self.len() - start.max(stop));
            return Ok(PSequence::from_tree(front.concat(&middle.tree).concat(&back)));
        }
        if ix.count == 0 {
            return Ok(self.clone());
        }
        let ix = ix.ascending();
        let mut replacement: Vec<T> = values.into_iter().collect();
        if replacement.len() != ix.count {
            return Err(Error::LengthMismatch {
                expected: ix.count,
                actual: replacement.len(),
            });
        }
        if ix.step < 0 {
            replacement.reverse();
        }
        let mut values = replacement.into_iter();
        let (tree, _, _) = self.tree.stride_set(
            ix.start as usize,
            ix.count,
            (ix.step.abs() - 1) as usize,
            &mut values,
        );
        Ok(PSequence::from_tree(tree))
    }

    /// Replaces several positions at once in a single downward pass.
    ///
    /// Every index is validated before anything is rewritten; when an index
    /// appears more than once, the last value given for it wins.
    ///
    /// ```
    /// use bramble::psequence;
    ///
    /// assert_eq!(
    ///     psequence![1, 2, 3, 4].mset(vec![(2, 0), (3, 5)]).unwrap(),
    ///     psequence![1, 2, 0, 5],
    /// );
    /// ```
    pub fn mset(&self, pairs: impl IntoIterator<Item = (isize, T)>) -> Result<PSequence<T>> {
        let mut resolved: Vec<(usize, T)> = Vec::new();
        for (index, value) in pairs {
            resolved.push((check_index(self.len(), index)?, value));
        }
        resolved.sort_by_key(|pair| pair.0);
        let mut pending: Vec<(usize, T)> = Vec::with_capacity(resolved.len());
        for pair in resolved {
            match pending.last_mut() {
                Some(last) if last.0 == pair.0 => *last = pair,
                _ => pending.push(pair),
            }
        }
        pending.reverse();
        Ok(PSequence::from_tree(self.tree.mset(0, &mut pending)))
    }

    /// Inserts `value` so that it ends up at position `index`. Out-of-range
    /// indices clamp: inserting far left pushes to the front, far right to
    /// the back. O(log min(i, n−i)).
    ///
    /// ```
    /// use bramble::psequence;
    ///
    /// assert_eq!(
    ///     psequence![1, 2, 3, 4].insert(-10, 0),
    ///     psequence![0, 1, 2, 3, 4],
    /// );
    /// ```
    pub fn insert(&self, index: isize, value: T) -> PSequence<T> {
        match check_index(self.len(), index) {
            Ok(index) => PSequence::from_tree(self.tree.insert_at(index, value)),
            Err(_) if index < 0 => self.push_front(value),
            Err(_) => self.push_back(value),
        }
    }

    /// Deletes the element at `index`. O(log min(i, n−i)).
    pub fn delete(&self, index: isize) -> Result<PSequence<T>> {
        let index = check_index(self.len(), index)?;
        Ok(PSequence::from_tree(self.tree.delete_at(index)))
    }

    /// Deletes every element selected by `slice`.
    ///
    /// ```
    /// use bramble::psequence;
    ///
    /// assert_eq!(
    ///     psequence![1, 2, 3, 4, 5].delete_slice(1..4).unwrap(),
    ///     psequence![1, 5],
    /// );
    /// ```
    pub fn delete_slice(&self, slice: impl Into<Slice>) -> Result<PSequence<T>> {
        let ix = slice.into().normalize(self.len())?;
        if ix.count == 0 {
            return Ok(self.clone());
        }
        let ix = ix.ascending();
        let (start, stop) = (ix.start as usize, ix.stop as usize);
        if ix.step.abs() == 1 {
            let front = self.tree.take_front(start);
            let back = self.tree.take_back(self.len() - start.max(stop));
            return Ok(PSequence::from_tree(front.concat(&back)));
        }
        let gap = (ix.step.abs() - 1) as usize;
        let (mut acc, _, mut rest) = self.tree.split(start);
        for _ in 1..ix.count {
            let (chunk, _, tail) = rest.split(gap);
            acc = acc.concat(&chunk);
            rest = tail;
        }
        Ok(PSequence::from_tree(acc.concat(&rest)))
    }

    /// Deletes the first element equal to `value`, failing with
    /// [`NotFound`](Error::NotFound) when there is none. O(n).
    pub fn remove(&self, value: &T) -> Result<PSequence<T>>
    where
        T: PartialEq,
    {
        let index = self.index_of(value)?;
        self.delete(index as isize)
    }

    /// The position of the first element equal to `value`. O(n).
    pub fn index_of(&self, value: &T) -> Result<usize>
    where
        T: PartialEq,
    {
        self.index_of_range(value, 0, None)
    }

    /// Like [`index_of`](Self::index_of), restricted to the positions in
    /// `[start, stop)`. Bounds clamp like slice bounds; a `stop` of `None`
    /// means the end of the sequence, while an explicit `0` means an empty
    /// range. The returned position is absolute.
    pub fn index_of_range(&self, value: &T, start: isize, stop: Option<isize>) -> Result<usize>
    where
        T: PartialEq,
    {
        let start = clamp_index(self.len(), start);
        let stop = match stop {
            None => self.len(),
            Some(stop) => clamp_index(self.len(), stop),
        };
        if start < stop {
            for (position, item) in self.iter().enumerate().skip(start).take(stop - start) {
                if item == value {
                    return Ok(position);
                }
            }
        }
        Err(Error::NotFound)
    }

    /// How many elements equal `value`. O(n).
    pub fn count(&self, value: &T) -> usize
    where
        T: PartialEq,
    {
        self.iter().filter(|item| *item == value).count()
    }

    /// Adds an element at the front. Amortized O(1).
    pub fn push_front(&self, value: T) -> PSequence<T> {
        PSequence::from_tree(self.tree.push_front_node(Rc::new(Node::Leaf(value))))
    }

    /// Adds an element at the back. Amortized O(1).
    pub fn push_back(&self, value: T) -> PSequence<T> {
        PSequence::from_tree(self.tree.push_back_node(Rc::new(Node::Leaf(value))))
    }

    /// Splits off the first element, failing with [`Empty`](Error::Empty)
    /// on an empty sequence. Amortized O(1).
    ///
    /// ```
    /// use bramble::psequence;
    ///
    /// let (head, rest) = psequence![1, 2, 3].view_front().unwrap();
    /// assert_eq!(head, 1);
    /// assert_eq!(rest, psequence![2, 3]);
    /// ```
    pub fn view_front(&self) -> Result<(T, PSequence<T>)>
    where
        T: Clone,
    {
        match self.tree.view_front_node() {
            None => Err(Error::Empty),
            Some((node, rest)) => Ok((unwrap_leaf(node), PSequence::from_tree(rest))),
        }
    }

    /// Splits off the last element. Amortized O(1).
    pub fn view_back(&self) -> Result<(PSequence<T>, T)>
    where
        T: Clone,
    {
        match self.tree.view_back_node() {
            None => Err(Error::Empty),
            Some((rest, node)) => Ok((PSequence::from_tree(rest), unwrap_leaf(node))),
        }
    }

    /// Splits the sequence around each of a strictly ascending list of
    /// indices: returns one `(preceding segment, element)` pair per index,
    /// plus the segment after the last index. O(k log n).
    pub fn view(&self, indices: &[isize]) -> Result<(Vec<(PSequence<T>, T)>, PSequence<T>)>
    where
        T: Clone,
    {
        let mut parts = Vec::with_capacity(indices.len());
        let mut consumed = 0usize;
        let mut rest = self.tree.clone();
        for &index in indices {
            let index = check_index(self.len(), index)?;
            if index < consumed {
                return Err(Error::InvalidArgument(
                    "view indices must be strictly ascending",
                ));
            }
            let (before, node, after) = rest.split(index - consumed);
            parts.push((PSequence::from_tree(before), unwrap_leaf(node)));
            consumed = index + 1;
            rest = after;
        }
        Ok((parts, PSequence::from_tree(rest)))
    }

    /// Splits into the first `index` elements and the rest. Out-of-range
    /// indices clamp to the ends, so this never fails.
    /// O(log min(i, n−i)).
    ///
    /// ```
    /// use bramble::{psequence, PSequence};
    ///
    /// let seq = psequence![1, 2, 3, 4];
    /// assert_eq!(seq.split_at(2), (psequence![1, 2], psequence![3, 4]));
    /// assert_eq!(seq.split_at(5), (seq.clone(), PSequence::new()));
    /// assert_eq!(seq.split_at(-1), (psequence![1, 2, 3], psequence![4]));
    /// ```
    pub fn split_at(&self, index: isize) -> (PSequence<T>, PSequence<T>) {
        self.split_off(clamp_index(self.len(), index))
    }

    fn split_off(&self, index: usize) -> (PSequence<T>, PSequence<T>) {
        if index == 0 {
            (PSequence::new(), self.clone())
        } else if index >= self.len() {
            (self.clone(), PSequence::new())
        } else {
            let (before, node, after) = self.tree.split(index);
            (
                PSequence::from_tree(before),
                PSequence::from_tree(after.push_front_node(node)),
            )
        }
    }

    /// Splits the sequence into chunks of `size` elements; the last chunk
    /// holds the remainder. A zero chunk size is rejected.
    ///
    /// ```
    /// use bramble::psequence;
    ///
    /// let chunks = psequence![1, 2, 3, 4, 5].chunks_of(2).unwrap();
    /// assert_eq!(
    ///     chunks,
    ///     psequence![psequence![1, 2], psequence![3, 4], psequence![5]],
    /// );
    /// ```
    pub fn chunks_of(&self, size: usize) -> Result<PSequence<PSequence<T>>> {
        if size == 0 {
            return Err(Error::InvalidArgument("chunk size cannot be zero"));
        }
        let mut chunks: Vec<PSequence<T>> = Vec::with_capacity(self.len() / size + 1);
        let mut rest = self.clone();
        while !rest.is_empty() {
            let (chunk, tail) = rest.split_off(size.min(rest.len()));
            chunks.push(chunk);
            rest = tail;
        }
        Ok(chunks.into_iter().collect())
    }

    /// The sequence in reverse order. O(n).
    pub fn reverse(&self) -> PSequence<T> {
        PSequence::from_tree(self.tree.reverse())
    }

    /// Concatenates two sequences. O(log min(n, m)).
    pub fn concat(&self, other: &PSequence<T>) -> PSequence<T> {
        PSequence::from_tree(self.tree.concat(&other.tree))
    }

    /// The sequence repeated `times` times, built by binary exponentiation
    /// over concatenation. O(log n · log k).
    ///
    /// ```
    /// use bramble::psequence;
    ///
    /// assert_eq!(
    ///     psequence![1, 2, 3].repeat(3),
    ///     psequence![1, 2, 3, 1, 2, 3, 1, 2, 3],
    /// );
    /// ```
    pub fn repeat(&self, times: usize) -> PSequence<T> {
        let mut acc = FingerTree::Empty;
        let mut power = self.tree.clone();
        let mut times = times;
        while times != 0 {
            if times % 2 == 1 {
                acc = acc.concat(&power);
            }
            times /= 2;
            if times != 0 {
                power = power.concat(&power);
            }
        }
        PSequence::from_tree(acc)
    }

    /// A sorted copy of the sequence. The sort is not stable. O(n log n).
    pub fn sort(&self) -> PSequence<T>
    where
        T: Ord + Clone,
    {
        self.sort_by(Ord::cmp)
    }

    /// A copy sorted by a caller-supplied comparison; reverse the ordering
    /// in the comparator to sort descending.
    pub fn sort_by(&self, mut compare: impl FnMut(&T, &T) -> std::cmp::Ordering) -> PSequence<T>
    where
        T: Clone,
    {
        let mut values = self.to_vec();
        values.sort_unstable_by(&mut compare);
        values.into_iter().collect()
    }

    /// A copy sorted by the key each element maps to.
    pub fn sort_by_key<K: Ord>(&self, mut key: impl FnMut(&T) -> K) -> PSequence<T>
    where
        T: Clone,
    {
        self.sort_by(|a, b| key(a).cmp(&key(b)))
    }

    /// Iterates the elements in order. Creating the iterator is O(1); the
    /// whole walk is O(n). The iterator is double-ended.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.tree)
    }

    /// Copies the elements into a `Vec`. O(n).
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Creates an [`Evolver`] over this sequence. O(1).
    pub fn evolver(&self) -> Evolver<T> {
        Evolver::new(self.clone())
    }

    /// Panics unless every structural invariant of the underlying tree
    /// holds. Intended for tests.
    pub fn assert_correctness(&self) {
        self.tree.assert_correctness();
    }
}

impl<T> Clone for PSequence<T> {
    fn clone(&self) -> Self {
        PSequence {
            tree: self.tree.clone(),
        }
    }
}

/// Builds a [`PSequence`] from its elements, like `vec!`.
///
/// ```
/// use bramble::psequence;
///
/// let seq = psequence![1, 2, 3];
/// assert_eq!(seq.to_vec(), vec![1, 2, 3]);
/// ```
#[macro_export]
macro_rules! psequence {
    () => {
        $crate::PSequence::new()
    };
    ($($value:expr),+ $(,)?) => {
        vec![$($value),+].into_iter().collect::<$crate::PSequence<_>>()
    };
}
