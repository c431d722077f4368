//! Index-preserving edits on page sequences.
//!
//! Both functions are pure: they read the input slice and build a new `Vec`, leaving the
//! original untouched. They are what back-stack surgery (`insert_page` / `remove_page`) uses
//! to splice a context's pages without a visible transition.
//!
//! Out-of-range indices are rejected with [`SpliceError::IndexOutOfBounds`]; they are never
//! clamped.

use thiserror::Error;

/// Errors produced by the splice functions.
///
/// An out-of-range index is a caller bug. The operation that triggered it is aborted and
/// nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SpliceError {
    /// The index lies outside the range the operation accepts.
    #[error("Index {index} is out of bounds for a sequence of length {len}")]
    IndexOutOfBounds {
        /// The rejected index
        index: usize,
        /// Length of the sequence at the time of the call
        len: usize,
    },
}

impl SpliceError {
    /// Check if this is an out-of-bounds index.
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, SpliceError::IndexOutOfBounds { .. })
    }
}

impl From<SpliceError> for crate::Error {
    fn from(err: SpliceError) -> Self {
        crate::Error::Splice(err)
    }
}

/// Build a new sequence with `element` placed at `index`.
///
/// Elements before `index` keep their positions, elements at or after it move one slot
/// right. `index == items.len()` appends.
///
/// # Errors
/// [`SpliceError::IndexOutOfBounds`] when `index > items.len()`.
pub fn insert_at<T: Clone>(items: &[T], element: T, index: usize) -> Result<Vec<T>, SpliceError> {
    if index > items.len() {
        return Err(SpliceError::IndexOutOfBounds {
            index,
            len: items.len(),
        });
    }

    let mut spliced = Vec::with_capacity(items.len() + 1);
    spliced.extend_from_slice(&items[..index]);
    spliced.push(element);
    spliced.extend_from_slice(&items[index..]);
    Ok(spliced)
}

/// Build a new sequence without the element at `index`.
///
/// # Errors
/// [`SpliceError::IndexOutOfBounds`] when `index >= items.len()`, which includes every index
/// on an empty sequence.
pub fn remove_at<T: Clone>(items: &[T], index: usize) -> Result<Vec<T>, SpliceError> {
    if index >= items.len() {
        return Err(SpliceError::IndexOutOfBounds {
            index,
            len: items.len(),
        });
    }

    let mut spliced = Vec::with_capacity(items.len() - 1);
    spliced.extend_from_slice(&items[..index]);
    spliced.extend_from_slice(&items[index + 1..]);
    Ok(spliced)
}
