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

//! Burst collapsing for a wrapped callable.

use super::callable::Callable;
use super::config::DebounceConfig;
use super::slot::PendingSlot;
use super::state::PacerState;
use crate::error::PacerError;
use crate::observability::{CallStats, PacerMetrics};
use crate::scheduler::{Scheduler, TimerHandle};
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

/// Delays calls until a quiet period has passed, collapsing bursts.
///
/// Every call restarts the delay. Once `delay` passes without a new call,
/// the wrapped callable runs once with the arguments of the last call.
/// With [`DebounceConfig::max_wait`] set, a burst that never goes quiet is
/// still forwarded at least once per `max_wait`; with
/// [`DebounceConfig::leading`] the first call of a burst runs immediately.
///
/// `call` never suspends. Clones share the same debounce; dropping the last
/// clone discards it. The output of the most recent successful forward is
/// kept and available through [`last_result`](Self::last_result).
///
/// # Examples
///
/// ```rust
/// use pacer::pacing::Debounce;
/// use pacer::scheduler::ManualScheduler;
/// use parking_lot::Mutex;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let scheduler = Arc::new(ManualScheduler::new());
/// let saved = Arc::new(Mutex::new(Vec::new()));
///
/// let sink = saved.clone();
/// let autosave = Debounce::new(
///     Duration::from_millis(300),
///     scheduler.clone(),
///     move |text: String| sink.lock().push(text),
/// );
///
/// for draft in ["h", "he", "hel", "hello"] {
///     autosave.call(draft.to_string()).unwrap();
///     scheduler.advance(Duration::from_millis(100));
/// }
/// assert!(saved.lock().is_empty());
///
/// scheduler.advance(Duration::from_millis(200));
/// assert_eq!(*saved.lock(), vec!["hello".to_string()]);
/// ```
pub struct Debounce<A, R = ()> {
    inner: Arc<DebounceInner<A, R>>,
}

struct DebounceInner<A, R> {
    config: DebounceConfig,
    target: Arc<dyn Callable<A, Output = R>>,
    scheduler: Arc<dyn Scheduler>,
    state: Mutex<DebounceState<A, R>>,
    stats: CallStats,
}

struct DebounceState<A, R> {
    pending: PendingSlot<A>,
    /// Output of the last successful forward
    last_result: Option<R>,
    timer: Option<TimerHandle>,
    /// First call of the current burst, for `max_wait`
    burst_started: Option<Instant>,
    /// Bumped whenever `timer` is replaced or dropped
    epoch: u64,
    discarded: bool,
}

impl<A: Send + 'static, R: Send + 'static> Debounce<A, R> {
    /// Creates a trailing-edge debounce.
    pub fn new<F>(delay: Duration, scheduler: Arc<dyn Scheduler>, target: F) -> Self
    where
        F: Callable<A, Output = R>,
    {
        let config = DebounceConfig {
            delay,
            ..Default::default()
        };
        Self::with_config(config, scheduler, target)
    }

    /// Creates a debounce from configuration.
    pub fn with_config<F>(
        mut config: DebounceConfig,
        scheduler: Arc<dyn Scheduler>,
        target: F,
    ) -> Self
    where
        F: Callable<A, Output = R>,
    {
        config.max_wait = config.max_wait.map(|max_wait| max_wait.max(config.delay));

        tracing::debug!(
            delay_ms = config.delay.as_millis() as u64,
            leading = config.leading,
            trailing = config.trailing,
            max_wait_ms = config.max_wait.map(|w| w.as_millis() as u64),
            scheduler = scheduler.name(),
            "Creating debounce"
        );

        Self {
            inner: Arc::new(DebounceInner {
                config,
                target: Arc::new(target),
                scheduler,
                state: Mutex::new(DebounceState {
                    pending: PendingSlot::new(),
                    last_result: None,
                    timer: None,
                    burst_started: None,
                    epoch: 0,
                    discarded: false,
                }),
                stats: CallStats::new("debounce"),
            }),
        }
    }

    /// Submit a call.
    ///
    /// Restarts the quiet period and keeps `args` as the latest arguments.
    ///
    /// # Errors
    ///
    /// Returns [`PacerError::Callable`] if the call was forwarded on the
    /// leading edge and the wrapped callable failed. Trailing-edge failures
    /// are reported to the scheduler instead.
    pub fn call(&self, args: A) -> Result<(), PacerError> {
        let inner = &self.inner;
        inner.stats.record_call();

        let now = inner.scheduler.now();
        let mut state = inner.state.lock();

        if state.discarded {
            drop(state);
            inner.stats.record_suppressed();
            tracing::debug!("Call on discarded debounce ignored");
            return Ok(());
        }

        if inner.config.leading && state.timer.is_none() {
            state.burst_started = Some(now);
            inner.arm(&mut state, &self.inner, inner.config.delay);
            drop(state);
            return inner.forward(args);
        }

        if let Some(timer) = state.timer.take() {
            timer.cancel();
            inner.stats.record_timer_cancelled();
        }

        if inner.config.trailing {
            inner.stats.record_deferred();
            if state.pending.store(args) {
                inner.stats.record_coalesced();
                tracing::trace!("Pending debounce call replaced");
            }
        } else {
            inner.stats.record_suppressed();
        }

        let started = *state.burst_started.get_or_insert(now);
        let delay = match inner.config.max_wait {
            Some(max_wait) => {
                let waited = now.saturating_duration_since(started);
                inner.config.delay.min(max_wait.saturating_sub(waited))
            }
            None => inner.config.delay,
        };
        inner.arm(&mut state, &self.inner, delay);

        Ok(())
    }

    /// Forward pending arguments now instead of waiting for quiet.
    ///
    /// Ends the current burst. Returns `Ok(true)` if something was forwarded.
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
            inner.end_burst(&mut state);
            state.pending.take()
        };

        match args {
            Some(args) => inner.forward(args).map(|()| true),
            None => Ok(false),
        }
    }

    /// Drop pending arguments and end the current burst.
    ///
    /// The debounce stays usable.
    pub fn cancel(&self) {
        let mut state = self.inner.state.lock();
        self.inner.reset(&mut state);
    }

    /// Permanently shut the debounce down.
    ///
    /// A call waiting for its quiet period never runs, and later calls are
    /// ignored. Calling `discard` again has no effect.
    pub fn discard(&self) {
        let mut state = self.inner.state.lock();
        if state.discarded {
            return;
        }
        self.inner.reset(&mut state);
        state.discarded = true;
        tracing::debug!("Debounce discarded");
    }

    /// Returns `true` once [`discard`](Self::discard) has been called.
    pub fn is_discarded(&self) -> bool {
        self.inner.state.lock().discarded
    }

    /// Current state of the debounce.
    pub fn state(&self) -> PacerState {
        let state = self.inner.state.lock();
        match (state.discarded, state.timer.is_some(), state.pending.is_occupied()) {
            (true, _, _) => PacerState::Discarded,
            (false, true, true) => PacerState::Pending,
            (false, true, false) => PacerState::Cooldown,
            (false, false, _) => PacerState::Idle,
        }
    }

    /// Quiet period required after the last call.
    pub fn delay(&self) -> Duration {
        self.inner.config.delay
    }

    /// Longest a burst may hold back a call, if limited.
    pub fn max_wait(&self) -> Option<Duration> {
        self.inner.config.max_wait
    }

    /// Configuration this debounce was built with.
    pub fn config(&self) -> &DebounceConfig {
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

impl<A: Send + 'static, R: Send + 'static> DebounceInner<A, R> {
    /// Schedules a fresh timer; the caller has already dropped the old one.
    fn arm(&self, state: &mut DebounceState<A, R>, this: &Arc<Self>, delay: Duration) {
        state.epoch += 1;
        let epoch = state.epoch;
        let weak = Arc::downgrade(this);
        let timer = self
            .scheduler
            .schedule(delay, Box::new(move || DebounceInner::fire(&weak, epoch)));
        tracing::trace!(
            timer = %timer.id(),
            delay_ms = delay.as_millis() as u64,
            "Debounce timer armed"
        );
        state.timer = Some(timer);
    }

    /// Timer entry point; a no-op when the debounce is gone or the timer stale.
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
            state.burst_started = None;
            state.pending.take()
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
                tracing::debug!(error = %error, "Debounced callable failed");
                Err(PacerError::Callable(error))
            }
        }
    }

    fn end_burst(&self, state: &mut DebounceState<A, R>) {
        if let Some(timer) = state.timer.take() {
            timer.cancel();
            self.stats.record_timer_cancelled();
        }
        state.burst_started = None;
        state.epoch += 1;
    }

    fn reset(&self, state: &mut DebounceState<A, R>) {
        self.end_burst(state);
        if state.pending.clear() {
            self.stats.record_coalesced();
        }
    }
}

impl<A, R> Drop for DebounceInner<A, R> {
    fn drop(&mut self) {
        if let Some(timer) = self.state.get_mut().timer.take() {
            timer.cancel();
        }
    }
}

impl<A, R> Clone for Debounce<A, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A, R> fmt::Debug for Debounce<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Debounce")
            .field("delay", &self.inner.config.delay)
            .field("max_wait", &self.inner.config.max_wait)
            .field("pending", &state.pending.is_occupied())
            .field("discarded", &state.discarded)
            .finish_non_exhaustive()
    }
}
