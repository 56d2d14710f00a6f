//! Bramble is a library of persistent (immutable, structurally shared)
//! container data structures:
//!
//! * [`PSequence`] — a sequence with fast access to both ends, logarithmic
//!   random access, and logarithmic split, concatenate and slice, backed
//!   by a size-annotated 2-3 finger tree.
//! * [`PMinHeap`] / [`PMaxHeap`] — mergeable priority queues backed by a
//!   binomial forest, with the ordering polarity carried in the type so
//!   the two kinds cannot be mixed by accident.
//!
//! Every operation that looks like a mutation returns a new value and
//! leaves every existing value intact; old and new versions share almost
//! all of their structure, which is what makes the operations cheap.
//! Cloning any container is O(1). All of it is plain single-threaded
//! value manipulation: no locks, no interior mutability, no I/O.
//!
//! ```
//! use bramble::{pminheap, psequence};
//!
//! let seq = psequence![1, 2, 3];
//! let both = seq.concat(&seq.reverse());
//! assert_eq!(both.to_vec(), vec![1, 2, 3, 3, 2, 1]);
//! assert_eq!(seq.len(), 3); // untouched
//!
//! let heap = pminheap![(2, "b"), (1, "a")].push(0, "z");
//! assert_eq!(heap.peek(), Ok((&0, &"z")));
//! ```
//!
//! For batches of updates where the intermediate sequences are of no
//! interest, [`Evolver`] wraps one current sequence value behind a
//! mutable interface; see its documentation.
//!
//! With the `serde` feature enabled, sequences serialize as their element
//! list and heaps as their `(key, value)` pairs, and deserializing gives
//! back an equal value.

pub mod error;
pub mod heap;
pub mod sequence;

pub(crate) mod utility;

pub use error::{Error, Result};
pub use heap::{Max, Min, PHeap, PMaxHeap, PMinHeap, Polarity};
pub use sequence::{Evolver, PSequence};
pub use utility::Slice;
