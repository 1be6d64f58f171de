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

//! Counters for queues and call pacing.
//!
//! Counters are plain atomics so recording never takes a lock. When the
//! `observability` feature is enabled every record is also forwarded to the
//! `metrics` facade, so any installed recorder (Prometheus, statsd, ...) sees
//! the same events.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Point-in-time view of a queue.
///
/// # Examples
///
/// ```rust
/// use pacer::observability::QueueMetrics;
///
/// let metrics = QueueMetrics {
///     queue_depth: 5,
///     capacity: 10,
///     ..Default::default()
/// };
/// assert_eq!(metrics.utilization_percent(), 50.0);
/// assert!(!metrics.is_full());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueMetrics {
    /// Number of items currently stored
    pub queue_depth: usize,

    /// Maximum capacity of the queue (0 when unbounded)
    pub capacity: usize,

    /// Total number of items accepted
    pub puts: u64,

    /// Total number of items handed out
    pub gets: u64,

    /// Number of `put` calls that had to suspend
    pub put_waits: u64,

    /// Number of `get` calls that had to suspend
    pub get_waits: u64,

    /// Total time spent suspended in `put` and `get` (milliseconds)
    pub wait_time_ms: u64,
}

impl QueueMetrics {
    /// Returns `true` if the queue has no capacity limit.
    pub fn is_unbounded(&self) -> bool {
        self.capacity == 0
    }

    /// Calculate the current utilization as a percentage (0-100).
    ///
    /// Unbounded queues always report 0.
    pub fn utilization_percent(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            (self.queue_depth as f64 / self.capacity as f64) * 100.0
        }
    }

    /// Check if the queue is at capacity.
    pub fn is_full(&self) -> bool {
        self.capacity != 0 && self.queue_depth >= self.capacity
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue_depth == 0
    }
}

/// Live counters owned by a queue.
#[derive(Debug, Default)]
pub struct QueueStats {
    puts: AtomicU64,
    gets: AtomicU64,
    put_waits: AtomicU64,
    get_waits: AtomicU64,
    wait_time_ms: AtomicU64,
}

impl QueueStats {
    /// Creates a zeroed tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an item entering the queue.
    pub fn record_put(&self) {
        self.puts.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observability")]
        metrics::counter!("pacer.queue.puts").increment(1);
    }

    /// Records an item leaving the queue.
    pub fn record_get(&self) {
        self.gets.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observability")]
        metrics::counter!("pacer.queue.gets").increment(1);
    }

    /// Records a `put` that found the queue full.
    pub fn record_put_wait(&self) {
        self.put_waits.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observability")]
        metrics::counter!("pacer.queue.put_waits").increment(1);
    }

    /// Records a `get` that found the queue empty.
    pub fn record_get_wait(&self) {
        self.get_waits.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observability")]
        metrics::counter!("pacer.queue.get_waits").increment(1);
    }

    /// Adds time spent suspended.
    pub fn record_wait_time(&self, waited: Duration) {
        let ms = waited.as_millis() as u64;
        self.wait_time_ms.fetch_add(ms, Ordering::Relaxed);
        #[cfg(feature = "observability")]
        metrics::histogram!("pacer.queue.wait_ms").record(ms as f64);
    }

    /// Builds a snapshot using the caller's view of depth and capacity.
    pub fn snapshot(&self, queue_depth: usize, capacity: usize) -> QueueMetrics {
        QueueMetrics {
            queue_depth,
            capacity,
            puts: self.puts.load(Ordering::Relaxed),
            gets: self.gets.load(Ordering::Relaxed),
            put_waits: self.put_waits.load(Ordering::Relaxed),
            get_waits: self.get_waits.load(Ordering::Relaxed),
            wait_time_ms: self.wait_time_ms.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of a throttle or debounce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PacerMetrics {
    /// Calls received through `call`
    pub calls: u64,

    /// Invocations of the wrapped callable (immediate, timer-fired or flushed)
    pub forwarded: u64,

    /// Calls whose arguments were buffered for a later invocation
    pub deferred: u64,

    /// Buffered arguments replaced or dropped before being forwarded
    pub coalesced: u64,

    /// Calls dropped outright (after discard, or with trailing edge disabled)
    pub suppressed: u64,

    /// Invocations of the wrapped callable that returned an error
    pub failures: u64,

    /// Timers canceled before they fired
    pub timers_cancelled: u64,
}

/// Live counters owned by a throttle or debounce.
///
/// # Examples
///
/// ```rust
/// use pacer::observability::CallStats;
///
/// let stats = CallStats::new("throttle");
/// stats.record_call();
/// stats.record_forwarded();
///
/// let snapshot = stats.snapshot();
/// assert_eq!(snapshot.calls, 1);
/// assert_eq!(snapshot.forwarded, 1);
/// ```
#[derive(Debug)]
pub struct CallStats {
    /// Label attached to exported counters
    component: &'static str,
    calls: AtomicU64,
    forwarded: AtomicU64,
    deferred: AtomicU64,
    coalesced: AtomicU64,
    suppressed: AtomicU64,
    failures: AtomicU64,
    timers_cancelled: AtomicU64,
}

impl CallStats {
    /// Creates a zeroed tracker labelled with `component`.
    #[must_use]
    pub fn new(component: &'static str) -> Self {
        Self {
            component,
            calls: AtomicU64::new(0),
            forwarded: AtomicU64::new(0),
            deferred: AtomicU64::new(0),
            coalesced: AtomicU64::new(0),
            suppressed: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            timers_cancelled: AtomicU64::new(0),
        }
    }

    /// Returns the component label.
    pub fn component(&self) -> &'static str {
        self.component
    }

    /// Records an incoming call.
    pub fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observability")]
        metrics::counter!("pacer.calls.received", "component" => self.component).increment(1);
    }

    /// Records an invocation of the wrapped callable.
    pub fn record_forwarded(&self) {
        self.forwarded.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observability")]
        metrics::counter!("pacer.calls.forwarded", "component" => self.component).increment(1);
    }

    /// Records a call whose arguments were buffered.
    pub fn record_deferred(&self) {
        self.deferred.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observability")]
        metrics::counter!("pacer.calls.deferred", "component" => self.component).increment(1);
    }

    /// Records buffered arguments that were never forwarded.
    pub fn record_coalesced(&self) {
        self.coalesced.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observability")]
        metrics::counter!("pacer.calls.coalesced", "component" => self.component).increment(1);
    }

    /// Records a call that was dropped outright.
    pub fn record_suppressed(&self) {
        self.suppressed.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observability")]
        metrics::counter!("pacer.calls.suppressed", "component" => self.component).increment(1);
    }

    /// Records a failed invocation.
    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observability")]
        metrics::counter!("pacer.calls.failures", "component" => self.component).increment(1);
    }

    /// Records a timer canceled before firing.
    pub fn record_timer_cancelled(&self) {
        self.timers_cancelled.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observability")]
        metrics::counter!("pacer.timers.cancelled", "component" => self.component).increment(1);
    }

    /// Returns the current counter values.
    pub fn snapshot(&self) -> PacerMetrics {
        PacerMetrics {
            calls: self.calls.load(Ordering::Relaxed),
            forwarded: self.forwarded.load(Ordering::Relaxed),
            deferred: self.deferred.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
            suppressed: self.suppressed.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            timers_cancelled: self.timers_cancelled.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_metrics_utilization() {
        let mut metrics = QueueMetrics {
            capacity: 100,
            ..Default::default()
        };
        assert_eq!(metrics.utilization_percent(), 0.0);

        metrics.queue_depth = 50;
        assert_eq!(metrics.utilization_percent(), 50.0);

        metrics.queue_depth = 100;
        assert_eq!(metrics.utilization_percent(), 100.0);
        assert!(metrics.is_full());
    }

    #[test]
    fn test_unbounded_queue_metrics_never_full() {
        let metrics = QueueMetrics {
            queue_depth: 10_000,
            capacity: 0,
            ..Default::default()
        };
        assert!(metrics.is_unbounded());
        assert!(!metrics.is_full());
        assert!(!metrics.is_empty());
        assert_eq!(metrics.utilization_percent(), 0.0);
    }

    #[test]
    fn test_queue_stats_snapshot() {
        let stats = QueueStats::new();
        stats.record_put();
        stats.record_put();
        stats.record_get();
        stats.record_put_wait();
        stats.record_wait_time(Duration::from_millis(15));

        let snapshot = stats.snapshot(1, 4);
        assert_eq!(snapshot.puts, 2);
        assert_eq!(snapshot.gets, 1);
        assert_eq!(snapshot.put_waits, 1);
        assert_eq!(snapshot.get_waits, 0);
        assert_eq!(snapshot.wait_time_ms, 15);
        assert_eq!(snapshot.queue_depth, 1);
        assert_eq!(snapshot.capacity, 4);
    }

    #[test]
    fn test_call_stats_counters() {
        let stats = CallStats::new("debounce");
        assert_eq!(stats.component(), "debounce");

        stats.record_call();
        stats.record_call();
        stats.record_deferred();
        stats.record_coalesced();
        stats.record_suppressed();
        stats.record_failure();
        stats.record_timer_cancelled();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.calls, 2);
        assert_eq!(snapshot.forwarded, 0);
        assert_eq!(snapshot.deferred, 1);
        assert_eq!(snapshot.coalesced, 1);
        assert_eq!(snapshot.suppressed, 1);
        assert_eq!(snapshot.failures, 1);
        assert_eq!(snapshot.timers_cancelled, 1);
    }
}
