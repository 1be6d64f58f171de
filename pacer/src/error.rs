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

//! Top-level error type for pacer.
//!
//! Errors are layered the same way the primitives are:
//!
//! 1. **Queue layer**: capacity and closed-queue failures ([`QueueError`])
//! 2. **Callable layer**: failures raised by a wrapped callable ([`CallError`])
//! 3. **Runtime layer**: no scheduler runtime could be reached
//!
//! [`PacerError`] composes these layers into a single type. The non-suspending
//! queue operations have their own error types ([`TryPutError`],
//! [`TryGetError`], [`PutError`]) because they hand the rejected item back to
//! the caller.
//!
//! # Examples
//!
//! ```rust
//! use pacer::{CallError, PacerError, QueueError};
//!
//! let error: PacerError = QueueError::Closed.into();
//! assert!(error.is_queue_error());
//!
//! let error: PacerError = CallError::new("boom").into();
//! assert!(error.is_callable_error());
//! ```
//!
//! [`TryPutError`]: crate::queue::TryPutError
//! [`TryGetError`]: crate::queue::TryGetError
//! [`PutError`]: crate::queue::PutError

use crate::pacing::CallError;
use crate::queue::QueueError;
use std::error::Error as StdError;
use std::fmt;

/// Top-level error type for pacer operations.
#[derive(Debug)]
pub enum PacerError {
    /// A queue-layer error occurred.
    ///
    /// Raised when a queue is constructed with an unsupported capacity or
    /// when an operation hits a closed queue.
    Queue(QueueError),

    /// The wrapped callable of a throttle or debounce failed.
    ///
    /// Returned from `call`/`flush` when the callable runs synchronously, and
    /// handed to the scheduler when it runs from a timer. The primitive's own
    /// state is already settled when this error is produced.
    Callable(CallError),

    /// No async runtime was available to drive timers.
    RuntimeUnavailable {
        /// Why the runtime could not be reached
        reason: String,
    },
}

impl PacerError {
    /// Returns `true` if this is a queue error.
    #[must_use]
    pub const fn is_queue_error(&self) -> bool {
        matches!(self, Self::Queue(_))
    }

    /// Returns `true` if the wrapped callable failed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pacer::{CallError, PacerError};
    ///
    /// let error = PacerError::Callable(CallError::new("disk full"));
    /// assert!(error.is_callable_error());
    /// assert!(!error.is_queue_error());
    /// ```
    #[must_use]
    pub const fn is_callable_error(&self) -> bool {
        matches!(self, Self::Callable(_))
    }

    /// Returns `true` if this error reports a missing runtime.
    #[must_use]
    pub const fn is_runtime_error(&self) -> bool {
        matches!(self, Self::RuntimeUnavailable { .. })
    }

    /// Returns `true` if retrying the same operation may succeed.
    ///
    /// Only callable failures qualify: the primitive is left in a clean
    /// state, so a later call can succeed. Closed queues and missing
    /// runtimes stay that way.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Callable(_))
    }
}

impl fmt::Display for PacerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queue(e) => write!(f, "queue error: {}", e),
            Self::Callable(e) => write!(f, "callable failed: {}", e),
            Self::RuntimeUnavailable { reason } => write!(f, "runtime unavailable: {}", reason),
        }
    }
}

impl StdError for PacerError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Queue(e) => Some(e),
            Self::Callable(e) => Some(e),
            Self::RuntimeUnavailable { .. } => None,
        }
    }
}

impl From<QueueError> for PacerError {
    fn from(error: QueueError) -> Self {
        Self::Queue(error)
    }
}

impl From<CallError> for PacerError {
    fn from(error: CallError) -> Self {
        Self::Callable(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_is_queue_error() {
        let error = PacerError::Queue(QueueError::Closed);
        assert!(error.is_queue_error());
        assert!(!error.is_callable_error());
        assert!(!error.is_runtime_error());
    }

    #[test]
    fn test_is_callable_error() {
        let error = PacerError::Callable(CallError::new(io::Error::other("test")));
        assert!(!error.is_queue_error());
        assert!(error.is_callable_error());
        assert!(error.is_recoverable());
    }

    #[test]
    fn test_runtime_unavailable_not_recoverable() {
        let error = PacerError::RuntimeUnavailable {
            reason: "no reactor".to_string(),
        };
        assert!(error.is_runtime_error());
        assert!(!error.is_recoverable());
        assert!(error.source().is_none());
    }

    #[test]
    fn test_display() {
        let error = PacerError::Queue(QueueError::Closed);
        assert!(error.to_string().contains("queue error"));

        let error = PacerError::Callable(CallError::new("boom"));
        assert_eq!(error.to_string(), "callable failed: boom");

        let error = PacerError::RuntimeUnavailable {
            reason: "no reactor".to_string(),
        };
        assert!(error.to_string().contains("no reactor"));
    }

    #[test]
    fn test_error_source() {
        let error = PacerError::Queue(QueueError::Closed);
        assert!(error.source().is_some());

        let error = PacerError::Callable(CallError::new("boom"));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_from_conversions() {
        let error: PacerError = QueueError::Capacity {
            requested: usize::MAX,
            max: 10,
        }
        .into();
        assert!(error.is_queue_error());

        let error: PacerError = CallError::new("boom").into();
        assert!(error.is_callable_error());
    }
}
