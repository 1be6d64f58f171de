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

//! Rate limiting for a wrapped callable.

use super::callable::Callable;
use super::config::ThrottleConfig;
use super::slot::PendingSlot;
use super::state::PacerState;
use crate::error::PacerError;
use crate::observability::{CallStats, PacerMetrics};
use crate::scheduler::{Scheduler, TimerHandle};
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

/// Forwards calls to a wrapped callable at most once per interval.
///
/// The first call after a quiet period is forwarded immediately. Calls that
/// arrive while the interval is still running are coalesced: only the latest
/// arguments are kept, and they are forwarded once the interval has passed.
///
/// `call` never suspends. Clones share the same throttle; dropping the last
/// clone discards it. The output of the most recent successful forward is
/// kept and available through [`last_result`](Self::last_result).
///
/// # Examples
///
/// ```rust
/// use pacer::pacing::Throttle;
/// use pacer::scheduler::ManualScheduler;
/// use parking_lot::Mutex;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let scheduler = Arc::new(ManualScheduler::new());
/// let seen = Arc::new(Mutex::new(Vec::new()));
///
/// let sink = seen.clone();
/// let throttle = Throttle::new(
///     Duration::from_millis(100),
///     scheduler.clone(),
///     move |value: u32| sink.lock().push(value),
/// );
///
/// throttle.call(1).unwrap(); // forwarded now
/// throttle.call(2).unwrap(); // deferred
/// throttle.call(3).unwrap(); // replaces 2
/// assert_eq!(*seen.lock(), vec![1]);
///
/// scheduler.advance(Duration::from_millis(100));
/// assert_eq!(*seen.lock(), vec![1, 3]);
/// ```
pub struct Throttle<A, R = ()> {
    inner: Arc<ThrottleInner<A, R>>,
}

struct ThrottleInner<A, R> {
    config: ThrottleConfig,
    target: Arc<dyn Callable<A, Output = R>>,
    scheduler: Arc<dyn Scheduler>,
    state: Mutex<ThrottleState<A, R>>,
    stats: CallStats,
}

struct ThrottleState<A, R> {
    /// When the wrapped callable last ran
    last_forward: Option<Instant>,
    /// Output of the last successful forward
    last_result: Option<R>,
    pending: PendingSlot<A>,
    timer: Option<TimerHandle>,
    /// Bumped whenever `timer` is replaced or dropped
    epoch: u64,
    discarded: bool,
}

impl<A: Send + 'static, R: Send + 'static> Throttle<A, R> {
    /// Creates a throttle with leading and trailing edges enabled.
    pub fn new<F>(interval: Duration, scheduler: Arc<dyn Scheduler>, target: F) -> Self
    where
        F: Callable<A, Output = R>,
    {
        let config = ThrottleConfig {
            interval,
            ..Default::default()
        };
        Self::with_config(config, scheduler, target)
    }

    /// Creates a throttle from configuration.
    pub fn with_config<F>(
        config: ThrottleConfig,
        scheduler: Arc<dyn Scheduler>,
        target: F,
    ) -> Self
    where
        F: Callable<A, Output = R>,
    {
        tracing::debug!(
            interval_ms = config.interval.as_millis() as u64,
            leading = config.leading,
            trailing = config.trailing,
            scheduler = scheduler.name(),
            "Creating throttle"
        );

        Self {
            inner: Arc::new(ThrottleInner {
                config,
                target: Arc::new(target),
                scheduler,
                state: Mutex::new(ThrottleState {
                    last_forward: None,
                    last_result: None,
                    pending: PendingSlot::new(),
                    timer: None,
                    epoch: 0,
                    discarded: false,
                }),
                stats: CallStats::new("throttle"),
            }),
        }
    }

    /// Submit a call.
    ///
    /// Forwards immediately when no forward happened within the last
    /// interval; otherwise keeps `args` for the end of the interval.
    ///
    /// # Errors
    ///
    /// Returns [`PacerError::Callable`] if the call was forwarded immediately
    /// and the wrapped callable failed. Deferred calls report failures to the
    /// scheduler instead.
    pub fn call(&self, args: A) -> Result<(), PacerError> {
        let inner = &self.inner;
        inner.stats.record_call();

        let now = inner.scheduler.now();
        let interval = inner.config.interval;
        let mut state = inner.state.lock();

        if state.discarded {
            drop(state);
            inner.stats.record_suppressed();
            tracing::debug!("Call on discarded throttle ignored");
            return Ok(());
        }

        let window_open = state
            .last_forward
            .is_some_and(|last| now.saturating_duration_since(last) < interval);

        if inner.config.leading && !window_open {
            if let Some(timer) = state.timer.take() {
                timer.cancel();
                state.epoch += 1;
                inner.stats.record_timer_cancelled();
            }
            if state.pending.clear() {
                inner.stats.record_coalesced();
            }
            state.last_forward = Some(now);
            drop(state);
            return inner.forward(args);
        }

        if !inner.config.trailing {
            drop(state);
            inner.stats.record_suppressed();
            tracing::trace!("Call inside throttle window suppressed");
            return Ok(());
        }

        inner.stats.record_deferred();
        if state.pending.store(args) {
            inner.stats.record_coalesced();
            tracing::trace!("Pending throttle call replaced");
        }

        if state.timer.is_none() {
            let delay = match state.last_forward {
                Some(last) if window_open => last
                    .checked_add(interval)
                    .map_or(interval, |deadline| deadline.saturating_duration_since(now)),
                _ => interval,
            };
            state.epoch += 1;
            let epoch = state.epoch;
            let weak = Arc::downgrade(&self.inner);
            let timer = inner
                .scheduler
                .schedule(delay, Box::new(move || ThrottleInner::fire(&weak, epoch)));
            tracing::trace!(
                timer = %timer.id(),
                delay_ms = delay.as_millis() as u64,
                "Throttle window armed"
            );
            state.timer = Some(timer);
        }

        Ok(())
    }

    /// Forward pending arguments now instead of waiting for the timer.
    ///
    /// Returns `Ok(true)` if something was forwarded.
    ///
    /// # Errors
    ///
    /// Returns [`PacerError::Callable`] if the wrapped callable failed.
    pub fn flush(&self) -> Result<bool, PacerError> {
        let inner = &self.inner;
        let args = {
            let mut state = inner.state.lock();
            if state.discarded {
                return Ok(false);
            }
            inner.drop_timer(&mut state);
            let args = state.pending.take();
            if args.is_some() {
                state.last_forward = Some(inner.scheduler.now());
            }
            args
        };

        match args {
            Some(args) => inner.forward(args).map(|()| true),
            None => Ok(false),
        }
    }

    /// Drop pending arguments and the timer, and forget the last forward.
    ///
    /// The throttle stays usable; the next call forwards immediately.
    pub fn cancel(&self) {
        let mut state = self.inner.state.lock();
        self.inner.reset(&mut state);
    }

    /// Permanently shut the throttle down.
    ///
    /// Pending arguments are dropped and later calls are ignored. Calling
    /// `discard` again has no effect.
    pub fn discard(&self) {
        let mut state = self.inner.state.lock();
        if state.discarded {
            return;
        }
        self.inner.reset(&mut state);
        state.discarded = true;
        tracing::debug!("Throttle discarded");
    }

    /// Returns `true` once [`discard`](Self::discard) has been called.
    pub fn is_discarded(&self) -> bool {
        self.inner.state.lock().discarded
    }

    /// Current state of the throttle.
    pub fn state(&self) -> PacerState {
        let now = self.inner.scheduler.now();
        let state = self.inner.state.lock();

        if state.discarded {
            PacerState::Discarded
        } else if state.pending.is_occupied() {
            PacerState::Pending
        } else if state.timer.is_some()
            || state.last_forward.is_some_and(|last| {
                now.saturating_duration_since(last) < self.inner.config.interval
            })
        {
            PacerState::Cooldown
        } else {
            PacerState::Idle
        }
    }

    /// Minimum spacing between forwarded calls.
    pub fn interval(&self) -> Duration {
        self.inner.config.interval
    }

    /// Configuration this throttle was built with.
    pub fn config(&self) -> &ThrottleConfig {
        &self.inner.config
    }

    /// Get current call metrics.
    pub fn metrics(&self) -> PacerMetrics {
        self.inner.stats.snapshot()
    }

    /// Output of the most recent successful forward, if any.
    ///
    /// Survives [`cancel`](Self::cancel) and [`discard`](Self::discard);
    /// a failed forward leaves the previous output in place.
    pub fn last_result(&self) -> Option<R>
    where
        R: Clone,
    {
        self.inner.state.lock().last_result.clone()
    }
}

impl<A: Send + 'static, R: Send + 'static> ThrottleInner<A, R> {
    /// Timer entry point; a no-op when the throttle is gone or the timer stale.
    fn fire(weak: &Weak<Self>, epoch: u64) -> Result<(), PacerError> {
        let Some(inner) = weak.upgrade() else {
            return Ok(());
        };

        let args = {
            let mut state = inner.state.lock();
            if state.discarded || state.epoch != epoch || state.timer.is_none() {
                return Ok(());
            }
            state.timer = None;
            let args = state.pending.take();
            if args.is_some() {
                state.last_forward = Some(inner.scheduler.now());
            }
            args
        };

        match args {
            Some(args) => inner.forward(args),
            None => Ok(()),
        }
    }

    fn forward(&self, args: A) -> Result<(), PacerError> {
        self.stats.record_forwarded();
        match self.target.invoke(args) {
            Ok(output) => {
                self.state.lock().last_result = Some(output);
                Ok(())
            }
            Err(error) => {
                self.stats.record_failure();
                tracing::debug!(error = %error, "Throttled callable failed");
                Err(PacerError::Callable(error))
            }
        }
    }

    fn drop_timer(&self, state: &mut ThrottleState<A, R>) {
        if let Some(timer) = state.timer.take() {
            timer.cancel();
            self.stats.record_timer_cancelled();
        }
        state.epoch += 1;
    }

    fn reset(&self, state: &mut ThrottleState<A, R>) {
        self.drop_timer(state);
        if state.pending.clear() {
            self.stats.record_coalesced();
        }
        state.last_forward = None;
    }
}

impl<A, R> Drop for ThrottleInner<A, R> {
    fn drop(&mut self) {
        if let Some(timer) = self.state.get_mut().timer.take() {
            timer.cancel();
        }
    }
}

impl<A, R> Clone for Throttle<A, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A, R> fmt::Debug for Throttle<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Throttle")
            .field("interval", &self.inner.config.interval)
            .field("pending", &state.pending.is_occupied())
            .field("discarded", &state.discarded)
            .finish_non_exhaustive()
    }
}
