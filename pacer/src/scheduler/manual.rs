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

//! Deterministic scheduler driven by hand.

use super::id::TimerId;
use super::traits::{Scheduler, TimerCallback, TimerHandle, TimerToken};
use crate::error::PacerError;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

/// A scheduler whose clock only moves when [`advance`](Self::advance) is
/// called.
///
/// Timers fire in deadline order; timers sharing a deadline fire in the
/// order they were scheduled. Callbacks run on the caller of `advance`, with
/// the clock set to the timer's deadline, and may schedule further timers.
///
/// # Examples
///
/// ```rust
/// use pacer::scheduler::{ManualScheduler, Scheduler};
/// use std::time::Duration;
///
/// let scheduler = ManualScheduler::new();
/// let start = scheduler.now();
///
/// scheduler.schedule(Duration::from_secs(1), Box::new(|| Ok(())));
/// assert_eq!(scheduler.pending_timers(), 1);
///
/// let report = scheduler.advance(Duration::from_secs(2));
/// assert_eq!(report.fired, 1);
/// assert_eq!(scheduler.now() - start, Duration::from_secs(2));
/// ```
pub struct ManualScheduler {
    origin: Instant,
    state: Mutex<ManualState>,
}

struct ManualState {
    /// Time passed since `origin`
    elapsed: Duration,
    /// Tie-breaker for timers with equal deadlines
    next_seq: u64,
    timers: BTreeMap<(Duration, u64), ManualTimer>,
}

struct ManualTimer {
    id: TimerId,
    token: TimerToken,
    callback: TimerCallback,
}

/// What happened during one [`ManualScheduler::advance`].
#[derive(Debug, Default)]
pub struct TickReport {
    /// Timers whose callback ran
    pub fired: usize,
    /// Timers that came due but had been cancelled since the last `schedule`
    pub skipped: usize,
    /// Failures returned by callbacks, in firing order
    pub errors: Vec<PacerError>,
}

impl TickReport {
    /// Returns `true` if no callback failed.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

impl ManualScheduler {
    /// Creates a scheduler with its clock at the current instant.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            state: Mutex::new(ManualState {
                elapsed: Duration::ZERO,
                next_seq: 0,
                timers: BTreeMap::new(),
            }),
        }
    }

    /// Move the clock forward by `by`, firing every timer that comes due.
    pub fn advance(&self, by: Duration) -> TickReport {
        let target = self.state.lock().elapsed.saturating_add(by);
        let mut report = TickReport::default();

        loop {
            let next = {
                let mut state = self.state.lock();
                let due = state
                    .timers
                    .first_key_value()
                    .map(|(&(deadline, _), _)| deadline)
                    .filter(|deadline| *deadline <= target);
                match due {
                    Some(deadline) => {
                        state.elapsed = state.elapsed.max(deadline);
                        state.timers.pop_first().map(|(_, timer)| timer)
                    }
                    None => None,
                }
            };

            let Some(timer) = next else {
                break;
            };

            if timer.token.is_cancelled() {
                report.skipped += 1;
                continue;
            }

            report.fired += 1;
            if let Err(error) = (timer.callback)() {
                tracing::warn!(timer = %timer.id, error = %error, "Timer callback failed");
                report.errors.push(error);
            }
        }

        let mut state = self.state.lock();
        state.elapsed = state.elapsed.max(target);
        report
    }

    /// Number of scheduled timers that have not been cancelled.
    pub fn pending_timers(&self) -> usize {
        self.state
            .lock()
            .timers
            .values()
            .filter(|timer| !timer.token.is_cancelled())
            .count()
    }

    /// Time advanced since the scheduler was created.
    pub fn elapsed(&self) -> Duration {
        self.state.lock().elapsed
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for ManualScheduler {
    fn now(&self) -> Instant {
        let elapsed = self.state.lock().elapsed;
        self.origin
            .checked_add(elapsed)
            .unwrap_or_else(|| latest_instant(self.origin, elapsed))
    }

    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
        let handle = TimerHandle::new();
        let mut state = self.state.lock();
        state.timers.retain(|_, timer| !timer.token.is_cancelled());

        let deadline = state.elapsed.saturating_add(delay);
        let seq = state.next_seq;
        state.next_seq += 1;
        state.timers.insert(
            (deadline, seq),
            ManualTimer {
                id: handle.id(),
                token: handle.token(),
                callback,
            },
        );

        tracing::trace!(
            timer = %handle.id(),
            delay_ms = delay.as_millis() as u64,
            "Scheduling timer"
        );
        handle
    }

    fn name(&self) -> &str {
        "manual"
    }
}

/// Furthest instant reachable from `origin` without exceeding `elapsed`.
fn latest_instant(origin: Instant, elapsed: Duration) -> Instant {
    let mut at = origin;
    let mut step = elapsed;
    while !step.is_zero() {
        match at.checked_add(step) {
            Some(next) => at = next,
            None => step /= 2,
        }
    }
    at
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ManualScheduler")
            .field("elapsed", &state.elapsed)
            .field("timers", &state.timers.len())
            .finish()
    }
}
