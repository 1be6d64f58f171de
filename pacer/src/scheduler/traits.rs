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

//! Scheduler capability and timer handles.

use super::id::TimerId;
use crate::error::PacerError;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tokio::task::AbortHandle;

/// Work run when a timer fires.
///
/// A failure is reported to the scheduler, which decides what to do with it:
/// [`TokioScheduler`](super::TokioScheduler) logs and counts it,
/// [`ManualScheduler`](super::ManualScheduler) hands it back from
/// [`advance`](super::ManualScheduler::advance).
pub type TimerCallback = Box<dyn FnOnce() -> Result<(), PacerError> + Send>;

/// A source of time and delayed execution.
///
/// Throttle and debounce never read the clock or sleep themselves; they ask
/// a scheduler. Swapping the scheduler swaps the notion of time, which is how
/// the timing behavior is tested deterministically.
///
/// # Examples
///
/// ```rust
/// use pacer::scheduler::{ManualScheduler, Scheduler};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::time::Duration;
///
/// let scheduler = ManualScheduler::new();
/// let fired = Arc::new(AtomicBool::new(false));
///
/// let flag = fired.clone();
/// scheduler.schedule(Duration::from_millis(50), Box::new(move || {
///     flag.store(true, Ordering::SeqCst);
///     Ok(())
/// }));
///
/// scheduler.advance(Duration::from_millis(49));
/// assert!(!fired.load(Ordering::SeqCst));
/// scheduler.advance(Duration::from_millis(1));
/// assert!(fired.load(Ordering::SeqCst));
/// ```
pub trait Scheduler: Send + Sync + fmt::Debug {
    /// Current time as seen by this scheduler.
    fn now(&self) -> Instant;

    /// Run `callback` once `delay` has elapsed.
    ///
    /// The returned handle cancels the timer. Cancelling after the timer has
    /// fired has no effect.
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerHandle;

    /// Short name used in logs.
    fn name(&self) -> &str;
}

/// Handle to a scheduled timer.
///
/// Dropping the handle does not cancel the timer; call [`cancel`](Self::cancel).
pub struct TimerHandle {
    id: TimerId,
    cancelled: Arc<AtomicBool>,
    abort: Option<AbortHandle>,
}

impl TimerHandle {
    /// Creates a handle for a new timer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: TimerId::new(),
            cancelled: Arc::new(AtomicBool::new(false)),
            abort: None,
        }
    }

    /// Attaches the task running the timer, so `cancel` also aborts it.
    #[must_use]
    pub fn with_abort(mut self, abort: AbortHandle) -> Self {
        self.abort = Some(abort);
        self
    }

    /// Returns the timer's identifier.
    pub fn id(&self) -> TimerId {
        self.id
    }

    /// A token the scheduler checks before running the callback.
    pub fn token(&self) -> TimerToken {
        TimerToken {
            cancelled: Arc::clone(&self.cancelled),
        }
    }

    /// Cancel the timer. Idempotent.
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::AcqRel) {
            tracing::trace!(timer = %self.id, "Timer cancelled");
        }
        if let Some(abort) = &self.abort {
            abort.abort();
        }
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Default for TimerHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle")
            .field("id", &self.id)
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Scheduler-side view of a timer's cancel flag.
#[derive(Debug, Clone)]
pub struct TimerToken {
    cancelled: Arc<AtomicBool>,
}

impl TimerToken {
    /// Returns `true` if the owning handle was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
