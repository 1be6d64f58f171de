//
// Copyright 2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Queue error types.
//!
//! Blocking operations fail only when the queue has been closed. The
//! non-suspending variants additionally report [`TryPutError::WouldBlock`] and
//! [`TryGetError::WouldBlock`], which are not faults: they tell the caller
//! that the suspending variant would have waited.

use std::fmt;
use thiserror::Error;

/// Errors raised by queue construction and the suspending `get` operations.
///
/// # Examples
///
/// ```rust
/// use pacer::queue::{BoundedQueue, QueueError};
///
/// let error = BoundedQueue::<u32>::new(usize::MAX).unwrap_err();
/// assert!(matches!(error, QueueError::Capacity { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    /// The requested capacity cannot be represented by the wait-lists.
    #[error("capacity {requested} exceeds the supported maximum of {max}")]
    Capacity {
        /// The capacity that was requested
        requested: usize,
        /// The largest supported capacity
        max: usize,
    },

    /// The queue is closed and holds no more items.
    #[error("queue is closed")]
    Closed,
}

/// Error returned by [`BoundedQueue::put`] when the queue is closed.
///
/// The rejected item is handed back.
///
/// [`BoundedQueue::put`]: super::BoundedQueue::put
#[derive(Clone, PartialEq, Eq)]
pub struct PutError<T>(pub T);

impl<T> PutError<T> {
    /// Returns the item that could not be enqueued.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for PutError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PutError").finish_non_exhaustive()
    }
}

impl<T> fmt::Display for PutError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "queue is closed")
    }
}

impl<T> std::error::Error for PutError<T> {}

/// Error returned by [`BoundedQueue::try_put`].
///
/// [`BoundedQueue::try_put`]: super::BoundedQueue::try_put
#[derive(Clone, PartialEq, Eq)]
pub enum TryPutError<T> {
    /// The queue is full; `put` would have suspended.
    WouldBlock(T),
    /// The queue is closed.
    Closed(T),
}

impl<T> TryPutError<T> {
    /// Returns the item that could not be enqueued.
    pub fn into_inner(self) -> T {
        match self {
            Self::WouldBlock(item) | Self::Closed(item) => item,
        }
    }

    /// Returns `true` if the queue was merely full.
    #[must_use]
    pub const fn is_would_block(&self) -> bool {
        matches!(self, Self::WouldBlock(_))
    }

    /// Returns `true` if the queue was closed.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Closed(_))
    }
}

impl<T> fmt::Debug for TryPutError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WouldBlock(_) => f.write_str("WouldBlock(..)"),
            Self::Closed(_) => f.write_str("Closed(..)"),
        }
    }
}

impl<T> fmt::Display for TryPutError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WouldBlock(_) => write!(f, "queue is full"),
            Self::Closed(_) => write!(f, "queue is closed"),
        }
    }
}

impl<T> std::error::Error for TryPutError<T> {}

impl<T> From<PutError<T>> for TryPutError<T> {
    fn from(error: PutError<T>) -> Self {
        Self::Closed(error.0)
    }
}

/// Error returned by [`BoundedQueue::try_get`].
///
/// [`BoundedQueue::try_get`]: super::BoundedQueue::try_get
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TryGetError {
    /// The queue is empty; `get` would have suspended.
    #[error("queue is empty")]
    WouldBlock,
    /// The queue is closed and drained.
    #[error("queue is closed")]
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_error_returns_item() {
        let error = PutError("job");
        assert_eq!(error.to_string(), "queue is closed");
        assert_eq!(error.into_inner(), "job");
    }

    #[test]
    fn test_try_put_error_kinds() {
        let full = TryPutError::WouldBlock(1);
        assert!(full.is_would_block());
        assert!(!full.is_closed());
        assert_eq!(full.to_string(), "queue is full");
        assert_eq!(full.into_inner(), 1);

        let closed: TryPutError<u8> = PutError(2).into();
        assert!(closed.is_closed());
        assert_eq!(format!("{:?}", closed), "Closed(..)");
    }

    #[test]
    fn test_queue_error_display() {
        let error = QueueError::Capacity {
            requested: 10,
            max: 5,
        };
        assert_eq!(
            error.to_string(),
            "capacity 10 exceeds the supported maximum of 5"
        );
        assert_eq!(QueueError::Closed.to_string(), "queue is closed");
    }
}
