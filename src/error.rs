//! The error type shared by every fallible container operation.
//!
//! All errors are raised at the boundary of the offending operation, before
//! any new value is built: a failed call leaves every existing value (and any
//! [`Evolver`](crate::Evolver)) exactly as it was.

/// Errors returned by [`PSequence`](crate::PSequence), [`Evolver`](crate::Evolver)
/// and [`PHeap`](crate::PHeap) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A scalar index fell outside `[-len, len)`.
    #[error("index out of range: {index} (len {len})")]
    OutOfRange {
        /// The index as given by the caller, before normalization.
        index: isize,
        /// The container length at the time of the call.
        len: usize,
    },

    /// Peek, pop or view on an empty container.
    #[error("operation on an empty container")]
    Empty,

    /// `remove` or `index_of` did not find the requested value.
    #[error("value not found")]
    NotFound,

    /// A strided slice assignment was given a replacement of the wrong length.
    #[error("replacement of length {actual} for a slice of length {expected}")]
    LengthMismatch {
        /// Number of positions selected by the slice.
        expected: usize,
        /// Number of replacement values supplied.
        actual: usize,
    },

    /// A structurally invalid argument: a zero slice step, a zero chunk
    /// size, or a multi-view index list that is not strictly ascending.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
