//! Standard trait implementations for [`PSequence`]. A separate file from
//! the main module, since the operations themselves live there and these
//! are mostly translations onto them.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use super::tree::{from_nodes, Node};
use super::{IntoIter, Iter, PSequence};

impl<T> Default for PSequence<T> {
    fn default() -> Self {
        PSequence::new()
    }
}

impl<T> std::iter::FromIterator<T> for PSequence<T> {
    /// Builds a balanced sequence in O(n): the elements become leaves and
    /// are handed to the bulk rebalancer in one pass.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let nodes: Vec<Rc<Node<T>>> = iter
            .into_iter()
            .map(|value| Rc::new(Node::Leaf(value)))
            .collect();
        PSequence::from_tree(from_nodes(&nodes))
    }
}

impl<'a, T> IntoIterator for &'a PSequence<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T: Clone> IntoIterator for PSequence<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter::new(self)
    }
}

impl<T> std::ops::Index<usize> for PSequence<T> {
    type Output = T;

    /// Panics when the index is out of bounds, like indexing a slice. Use
    /// [`get`](PSequence::get) for the fallible form (which also accepts
    /// negative indices).
    fn index(&self, index: usize) -> &T {
        match self.get(index as isize) {
            Ok(value) => value,
            Err(error) => panic!("{}", error),
        }
    }
}

impl<T> std::ops::Add for PSequence<T> {
    type Output = PSequence<T>;

    fn add(self, other: PSequence<T>) -> PSequence<T> {
        self.concat(&other)
    }
}

impl<T> std::ops::Add<&PSequence<T>> for PSequence<T> {
    type Output = PSequence<T>;

    fn add(self, other: &PSequence<T>) -> PSequence<T> {
        self.concat(other)
    }
}

impl<T> std::ops::Mul<usize> for PSequence<T> {
    type Output = PSequence<T>;

    fn mul(self, times: usize) -> PSequence<T> {
        self.repeat(times)
    }
}

impl<T: PartialEq> PartialEq for PSequence<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for PSequence<T> {}

impl<T: PartialEq> PartialEq<Vec<T>> for PSequence<T> {
    fn eq(&self, other: &Vec<T>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: PartialEq> PartialEq<&[T]> for PSequence<T> {
    fn eq(&self, other: &&[T]) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: PartialOrd> PartialOrd for PSequence<T> {
    /// Lexicographic, element by element; `None` as soon as a pair of
    /// elements cannot be compared.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord> Ord for PSequence<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: Hash> Hash for PSequence<T> {
    /// Equal sequences hash equal: the hash covers the length and every
    /// element in order.
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for value in self.iter() {
            value.hash(state);
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for PSequence<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::PSequence;

    use serde::de::{Deserialize, Deserializer, SeqAccess, Visitor};
    use serde::ser::{Serialize, SerializeSeq, Serializer};

    /// A sequence serializes as its linear element list, so any format
    /// that can hold a list can hold a sequence, and deserializing gives
    /// back an equal value.
    impl<T: Serialize> Serialize for PSequence<T> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut seq = serializer.serialize_seq(Some(self.len()))?;
            for value in self.iter() {
                seq.serialize_element(value)?;
            }
            seq.end()
        }
    }

    struct PSequenceVisitor<T>(std::marker::PhantomData<T>);

    impl<'de, T: Deserialize<'de>> Visitor<'de> for PSequenceVisitor<T> {
        type Value = PSequence<T>;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("a sequence of elements")
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<PSequence<T>, A::Error> {
            let mut values = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some(value) = access.next_element()? {
                values.push(value);
            }
            Ok(values.into_iter().collect())
        }
    }

    impl<'de, T: Deserialize<'de>> Deserialize<'de> for PSequence<T> {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_seq(PSequenceVisitor(std::marker::PhantomData))
        }
    }
}
