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

//! Observability support for pacer.
//!
//! - **[`QueueStats`] / [`QueueMetrics`]**: depth, throughput and wait counters
//!   for [`BoundedQueue`](crate::queue::BoundedQueue)
//! - **[`CallStats`] / [`PacerMetrics`]**: call, forward and coalesce counters
//!   for [`Throttle`](crate::pacing::Throttle) and
//!   [`Debounce`](crate::pacing::Debounce)
//! - **[`ErrorMetrics`]**: error tracking by layer
//! - **[`log_error`]**: structured logging of [`PacerError`]s
//!
//! Every primitive owns its counters and exposes a snapshot through its
//! `metrics()` method:
//!
//! ```rust
//! use pacer::queue::BoundedQueue;
//!
//! let queue = BoundedQueue::new(4).unwrap();
//! queue.try_put("a").unwrap();
//! queue.try_put("b").unwrap();
//! queue.try_get().unwrap();
//!
//! let metrics = queue.metrics();
//! assert_eq!(metrics.puts, 2);
//! assert_eq!(metrics.gets, 1);
//! assert_eq!(metrics.queue_depth, 1);
//! ```
//!
//! # Feature Flags
//!
//! With `observability` enabled, counters are also exported through the
//! `metrics` crate under the `pacer.` prefix. Logging always goes through
//! `tracing`; install a subscriber to see it:
//!
//! ```rust,ignore
//! use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
//!
//! tracing_subscriber::registry()
//!     .with(tracing_subscriber::fmt::layer())
//!     .with(tracing_subscriber::EnvFilter::from_default_env())
//!     .init();
//! ```

mod metrics;

pub use metrics::{CallStats, PacerMetrics, QueueMetrics, QueueStats};

use crate::PacerError;
use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for tracking errors across all layers.
///
/// # Examples
///
/// ```rust
/// use pacer::observability::ErrorMetrics;
/// use pacer::{CallError, PacerError, QueueError};
///
/// let metrics = ErrorMetrics::new();
/// metrics.record_error(&PacerError::Queue(QueueError::Closed));
/// metrics.record_error(&PacerError::Callable(CallError::new("boom")));
///
/// assert_eq!(metrics.queue_errors(), 1);
/// assert_eq!(metrics.callable_errors(), 1);
/// assert_eq!(metrics.total_errors(), 2);
/// ```
#[derive(Debug, Default)]
pub struct ErrorMetrics {
    /// Total number of queue errors
    queue_errors: AtomicU64,
    /// Total number of wrapped-callable failures
    callable_errors: AtomicU64,
    /// Total number of missing-runtime errors
    runtime_errors: AtomicU64,
}

impl ErrorMetrics {
    /// Creates a new error metrics tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error and updates the counter for its layer.
    pub fn record_error(&self, error: &PacerError) {
        match error {
            PacerError::Queue(_) => {
                self.queue_errors.fetch_add(1, Ordering::Relaxed);
                #[cfg(feature = "observability")]
                ::metrics::counter!("pacer.errors.queue").increment(1);
            }
            PacerError::Callable(_) => {
                self.callable_errors.fetch_add(1, Ordering::Relaxed);
                #[cfg(feature = "observability")]
                ::metrics::counter!("pacer.errors.callable").increment(1);
            }
            PacerError::RuntimeUnavailable { .. } => {
                self.runtime_errors.fetch_add(1, Ordering::Relaxed);
                #[cfg(feature = "observability")]
                ::metrics::counter!("pacer.errors.runtime").increment(1);
            }
        }
    }

    /// Returns the number of queue errors.
    pub fn queue_errors(&self) -> u64 {
        self.queue_errors.load(Ordering::Relaxed)
    }

    /// Returns the number of wrapped-callable failures.
    pub fn callable_errors(&self) -> u64 {
        self.callable_errors.load(Ordering::Relaxed)
    }

    /// Returns the number of missing-runtime errors.
    pub fn runtime_errors(&self) -> u64 {
        self.runtime_errors.load(Ordering::Relaxed)
    }

    /// Returns the total number of errors recorded.
    pub fn total_errors(&self) -> u64 {
        self.queue_errors() + self.callable_errors() + self.runtime_errors()
    }

    /// Resets all counters to zero.
    pub fn reset(&self) {
        self.queue_errors.store(0, Ordering::Relaxed);
        self.callable_errors.store(0, Ordering::Relaxed);
        self.runtime_errors.store(0, Ordering::Relaxed);
    }
}

/// Logs an error with structured context.
///
/// Callable failures are logged at ERROR level since nothing above the
/// timer will see them otherwise; closed queues are routine shutdown
/// traffic and go out at DEBUG.
pub fn log_error(error: &PacerError) {
    match error {
        PacerError::Queue(e) => {
            tracing::debug!(error = %e, "Queue error occurred");
        }
        PacerError::Callable(e) => {
            tracing::error!(
                error = %e,
                recoverable = error.is_recoverable(),
                "Wrapped callable failed"
            );
        }
        PacerError::RuntimeUnavailable { reason } => {
            tracing::error!(reason = %reason, "Runtime unavailable");
        }
    }
}
