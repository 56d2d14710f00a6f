//! Standard trait implementations for [`PHeap`].
//!
//! Equality is over the multiset of `(key, value)` entries: two heaps
//! compare equal exactly when popping both to exhaustion would yield the
//! same entries, regardless of internal shape. Ordering and hashing
//! canonicalize by sorting, so they need `V: Ord`; equality only needs
//! `V: PartialEq` and falls back to elementwise removal inside each
//! equal-key group.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use super::{IterSorted, PHeap, Polarity};

impl<K, V, P: Polarity> Default for PHeap<K, V, P> {
    fn default() -> Self {
        PHeap::new()
    }
}

impl<K: Ord + Clone, V: Clone, P: Polarity> std::iter::FromIterator<(K, V)> for PHeap<K, V, P> {
    /// Builds a heap in O(n) by pushing every entry as a rank-0 tree and
    /// extracting the winner once at the end.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        use super::forest;
        use std::marker::PhantomData;

        let mut size = 0;
        let mut forest = None;
        for (key, value) in iter {
            forest = Some(forest::push::<K, V, P>(
                &forest,
                0,
                forest::singleton(key, value),
            ));
            size += 1;
        }
        match forest {
            None => PHeap::new(),
            Some(entries) => {
                let (key, value, rest) = forest::pop::<K, V, P>(&entries);
                PHeap {
                    size,
                    top: Some((key, value)),
                    forest: rest,
                    polarity: PhantomData,
                }
            }
        }
    }
}

impl<K: Ord + Clone, V: Clone, P: Polarity> IntoIterator for PHeap<K, V, P> {
    type Item = (K, V);
    type IntoIter = IterSorted<K, V, P>;

    /// Consuming iteration pops the heap to exhaustion, so entries arrive
    /// in key order.
    fn into_iter(self) -> IterSorted<K, V, P> {
        IterSorted::new(self)
    }
}

impl<K: Ord + Clone, V: Clone, P: Polarity> std::ops::Add for PHeap<K, V, P> {
    type Output = PHeap<K, V, P>;

    fn add(self, other: PHeap<K, V, P>) -> PHeap<K, V, P> {
        self.merge(&other)
    }
}

impl<K, V, P> PartialEq for PHeap<K, V, P>
where
    K: Ord + Clone,
    V: PartialEq + Clone,
    P: Polarity,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let ours: Vec<(K, V)> = self.iter_sorted().collect();
        let theirs: Vec<(K, V)> = other.iter_sorted().collect();
        let mut start = 0;
        while start < ours.len() {
            if theirs[start].0 != ours[start].0 {
                return false;
            }
            let mut our_end = start + 1;
            while our_end < ours.len() && ours[our_end].0 == ours[start].0 {
                our_end += 1;
            }
            let mut their_end = start + 1;
            while their_end < theirs.len() && theirs[their_end].0 == theirs[start].0 {
                their_end += 1;
            }
            if their_end != our_end {
                return false;
            }
            // multiset equality of the values within this key group
            let mut remaining: Vec<&V> = theirs[start..their_end].iter().map(|(_, v)| v).collect();
            for (_, value) in &ours[start..our_end] {
                match remaining.iter().position(|candidate| *candidate == value) {
                    Some(found) => {
                        remaining.swap_remove(found);
                    }
                    None => return false,
                }
            }
            start = our_end;
        }
        true
    }
}

impl<K, V, P> Eq for PHeap<K, V, P>
where
    K: Ord + Clone,
    V: Eq + Clone,
    P: Polarity,
{
}

impl<K, V, P> PartialOrd for PHeap<K, V, P>
where
    K: Ord + Clone,
    V: Ord + Clone,
    P: Polarity,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K, V, P> Ord for PHeap<K, V, P>
where
    K: Ord + Clone,
    V: Ord + Clone,
    P: Polarity,
{
    /// Compares the two entry multisets in their canonical order: sorted
    /// by key, then by value within equal keys.
    fn cmp(&self, other: &Self) -> Ordering {
        let mut ours: Vec<(K, V)> = self.iter_sorted().collect();
        let mut theirs: Vec<(K, V)> = other.iter_sorted().collect();
        ours.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        theirs.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        ours.cmp(&theirs)
    }
}

impl<K, V, P> Hash for PHeap<K, V, P>
where
    K: Ord + Hash + Clone,
    V: Ord + Hash + Clone,
    P: Polarity,
{
    /// Hashes the polarity tag plus the canonically ordered entries, so
    /// equal heaps hash equal and a min-heap never collides with the
    /// max-heap holding the same entries.
    fn hash<H: Hasher>(&self, state: &mut H) {
        P::NAME.hash(state);
        self.len().hash(state);
        let mut items: Vec<(K, V)> = self.iter_sorted().collect();
        items.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        for (key, value) in items {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl<K, V, P> std::fmt::Debug for PHeap<K, V, P>
where
    K: Ord + Clone + std::fmt::Debug,
    V: Clone + std::fmt::Debug,
    P: Polarity,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ", P::NAME)?;
        f.debug_list().entries(self.iter_sorted()).finish()
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::{PHeap, Polarity};

    use serde::de::{Deserialize, Deserializer, SeqAccess, Visitor};
    use serde::ser::{Serialize, SerializeSeq, Serializer};

    /// A heap serializes as a list of `(key, value)` pairs; the polarity
    /// is implied by the type being deserialized into, so the round trip
    /// yields an equal heap.
    impl<K: Serialize, V: Serialize, P: Polarity> Serialize for PHeap<K, V, P> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut seq = serializer.serialize_seq(Some(self.len()))?;
            for entry in self.iter_unordered() {
                seq.serialize_element(&entry)?;
            }
            seq.end()
        }
    }

    struct PHeapVisitor<K, V, P>(std::marker::PhantomData<(K, V, P)>);

    impl<'de, K, V, P> Visitor<'de> for PHeapVisitor<K, V, P>
    where
        K: Deserialize<'de> + Ord + Clone,
        V: Deserialize<'de> + Clone,
        P: Polarity,
    {
        type Value = PHeap<K, V, P>;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("a sequence of key/value pairs")
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut pairs: Vec<(K, V)> = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some(pair) = access.next_element()? {
                pairs.push(pair);
            }
            Ok(pairs.into_iter().collect())
        }
    }

    impl<'de, K, V, P> Deserialize<'de> for PHeap<K, V, P>
    where
        K: Deserialize<'de> + Ord + Clone,
        V: Deserialize<'de> + Clone,
        P: Polarity,
    {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_seq(PHeapVisitor(std::marker::PhantomData))
        }
    }
}
