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

//! Scheduler backed by a tokio runtime.

use super::traits::{Scheduler, TimerCallback, TimerHandle};
use crate::error::PacerError;
use crate::observability::{ErrorMetrics, log_error};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;

/// Runs timers as tasks on a tokio runtime.
///
/// Time is read through `tokio::time`, so a runtime started with a paused
/// clock (`#[tokio::test(start_paused = true)]`) drives timers
/// deterministically.
///
/// Callback failures have no caller to return to. They are logged and
/// counted; see [`failed_callbacks`](Self::failed_callbacks).
///
/// # Examples
///
/// ```rust
/// use pacer::scheduler::{Scheduler, TokioScheduler};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let scheduler = TokioScheduler::new().unwrap();
/// assert_eq!(scheduler.name(), "tokio");
/// # }
/// ```
#[derive(Clone)]
pub struct TokioScheduler {
    handle: Handle,
    errors: Arc<ErrorMetrics>,
}

impl TokioScheduler {
    /// Creates a scheduler on the runtime the caller is running in.
    ///
    /// # Errors
    ///
    /// Returns [`PacerError::RuntimeUnavailable`] when called outside a
    /// tokio runtime.
    pub fn new() -> Result<Self, PacerError> {
        let handle = Handle::try_current().map_err(|e| PacerError::RuntimeUnavailable {
            reason: e.to_string(),
        })?;
        Ok(Self::with_handle(handle))
    }

    /// Creates a scheduler on a specific runtime.
    pub fn with_handle(handle: Handle) -> Self {
        Self {
            handle,
            errors: Arc::new(ErrorMetrics::new()),
        }
    }

    /// Number of timer callbacks that returned an error.
    pub fn failed_callbacks(&self) -> u64 {
        self.errors.total_errors()
    }

    /// Error counters for timer callbacks, by layer.
    pub fn error_metrics(&self) -> &ErrorMetrics {
        &self.errors
    }
}

impl Scheduler for TokioScheduler {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }

    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
        let timer = TimerHandle::new();
        let token = timer.token();
        let id = timer.id();
        let errors = Arc::clone(&self.errors);

        tracing::trace!(timer = %id, delay_ms = delay.as_millis() as u64, "Scheduling timer");

        let task = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if token.is_cancelled() {
                return;
            }
            if let Err(error) = callback() {
                errors.record_error(&error);
                tracing::error!(timer = %id, "Timer callback failed");
                log_error(&error);
            }
        });

        timer.with_abort(task.abort_handle())
    }

    fn name(&self) -> &str {
        "tokio"
    }
}

impl fmt::Debug for TokioScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokioScheduler")
            .field("failed_callbacks", &self.failed_callbacks())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pacing::CallError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_new_outside_runtime() {
        let error = TokioScheduler::new().unwrap_err();
        assert!(error.is_runtime_error());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_fires_after_delay() {
        let scheduler = TokioScheduler::new().unwrap();
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = fired.clone();
        scheduler.schedule(
            Duration::from_millis(100),
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        );

        tokio::time::sleep(Duration::from_millis(99)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_timer_does_not_fire() {
        let scheduler = TokioScheduler::new().unwrap();
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = fired.clone();
        let timer = scheduler.schedule(
            Duration::from_millis(10),
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        );
        timer.cancel();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_callback_is_counted() {
        let scheduler = TokioScheduler::new().unwrap();
        scheduler.schedule(
            Duration::from_millis(5),
            Box::new(|| Err(PacerError::from(CallError::new("boom")))),
        );

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(scheduler.failed_callbacks(), 1);
        assert_eq!(scheduler.error_metrics().callable_errors(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_now_follows_paused_clock() {
        let scheduler = TokioScheduler::new().unwrap();
        let start = scheduler.now();
        tokio::time::advance(Duration::from_secs(3)).await;
        assert_eq!(scheduler.now() - start, Duration::from_secs(3));
    }
}
