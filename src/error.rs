//! Errors reported by pools and lists.

use thiserror::Error;

/// Error returned by fallible pool and list operations.
///
/// Every operation validates its inputs before touching any links, so a
/// returned error always leaves the structure exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The pool has no free slot left.
    #[error("node pool exhausted: all {capacity} slots are in use")]
    Exhausted {
        /// Capacity of the exhausted pool.
        capacity: usize,
    },
    /// A slot index outside of the pool was passed to `recycle`.
    #[error("slot index {index} is out of range for a pool of {capacity} slots")]
    InvalidIndex {
        /// The offending index.
        index: usize,
        /// Capacity of the pool.
        capacity: usize,
    },
    /// A position passed to `insert_after` or `delete_after` does not name a
    /// node of the list. `None` stands for the null sentinel.
    #[error("invalid list position {position:?} for a pool of {capacity} slots")]
    InvalidPosition {
        /// The offending position, `None` if it was the null sentinel.
        position: Option<usize>,
        /// Capacity of the pool.
        capacity: usize,
    },
    /// `delete_after` was called on the last node.
    #[error("node at position {position} has no successor")]
    NoSuccessor {
        /// The position whose successor was requested.
        position: usize,
    },
    /// `delete_front` was called on an empty list.
    #[error("cannot delete from an empty list")]
    EmptyList,
}

/// Shorthand for results carrying an [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;
