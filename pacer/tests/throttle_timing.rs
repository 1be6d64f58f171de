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

//! Timing tests for throttle on a paused tokio clock.

use pacer::{CallError, PacerState, Throttle, ThrottleConfig, TokioScheduler};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing_subscriber::EnvFilter;

const INTERVAL: Duration = Duration::from_millis(100);

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn recording_throttle(config: ThrottleConfig) -> (Throttle<u32>, Arc<Mutex<Vec<(Instant, u32)>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let scheduler = Arc::new(TokioScheduler::new().unwrap());
    let throttle = Throttle::with_config(config, scheduler, move |value: u32| {
        sink.lock().push((Instant::now(), value));
    });
    (throttle, seen)
}

fn values(seen: &Mutex<Vec<(Instant, u32)>>) -> Vec<u32> {
    seen.lock().iter().map(|(_, value)| *value).collect()
}

#[tokio::test(start_paused = true)]
async fn test_first_call_immediate_then_trailing() {
    init_tracing();
    let (throttle, seen) = recording_throttle(ThrottleConfig {
        interval: INTERVAL,
        ..Default::default()
    });
    let start = Instant::now();

    throttle.call(1).unwrap();
    throttle.call(2).unwrap();
    throttle.call(3).unwrap();
    assert_eq!(values(&seen), vec![1]);

    sleep(Duration::from_millis(99)).await;
    assert_eq!(values(&seen), vec![1]);

    sleep(Duration::from_millis(2)).await;
    assert_eq!(values(&seen), vec![1, 3]);

    let forwarded_at = seen.lock()[1].0;
    assert_eq!(forwarded_at - start, INTERVAL);
}

#[tokio::test(start_paused = true)]
async fn test_steady_stream_is_spaced_by_interval() {
    init_tracing();
    let (throttle, seen) = recording_throttle(ThrottleConfig {
        interval: INTERVAL,
        ..Default::default()
    });

    for i in 0..100 {
        throttle.call(i).unwrap();
        sleep(Duration::from_millis(10)).await;
    }
    sleep(INTERVAL).await;

    let seen = seen.lock();
    assert!(seen.len() >= 10);
    for pair in seen.windows(2) {
        assert!(pair[1].0 - pair[0].0 >= INTERVAL);
    }
    // The final call is never lost
    assert_eq!(seen.last().map(|(_, value)| *value), Some(99));
}

#[tokio::test(start_paused = true)]
async fn test_drop_cancels_pending_forward() {
    init_tracing();
    let (throttle, seen) = recording_throttle(ThrottleConfig {
        interval: INTERVAL,
        ..Default::default()
    });

    throttle.call(1).unwrap();
    throttle.call(2).unwrap();
    drop(throttle);

    sleep(INTERVAL * 3).await;
    assert_eq!(values(&seen), vec![1]);
}

#[tokio::test(start_paused = true)]
async fn test_discard_then_calls_are_ignored() {
    init_tracing();
    let (throttle, seen) = recording_throttle(ThrottleConfig {
        interval: INTERVAL,
        ..Default::default()
    });

    throttle.call(1).unwrap();
    throttle.call(2).unwrap();
    throttle.discard();
    throttle.call(3).unwrap();

    sleep(INTERVAL * 3).await;
    assert_eq!(values(&seen), vec![1]);
    assert_eq!(throttle.state(), PacerState::Discarded);
    assert_eq!(throttle.metrics().suppressed, 1);
}

#[tokio::test(start_paused = true)]
async fn test_trailing_failure_is_counted_by_scheduler() {
    init_tracing();
    let scheduler = Arc::new(TokioScheduler::new().unwrap());
    let throttle = Throttle::new(
        INTERVAL,
        scheduler.clone(),
        |value: u32| -> Result<(), CallError> {
            if value > 1 {
                return Err(CallError::new(format!("value {} rejected", value)));
            }
            Ok(())
        },
    );

    throttle.call(1).unwrap();
    throttle.call(2).unwrap();
    sleep(INTERVAL + Duration::from_millis(1)).await;

    assert_eq!(scheduler.failed_callbacks(), 1);
    assert_eq!(throttle.metrics().failures, 1);
    assert_eq!(throttle.state(), PacerState::Cooldown);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_shared_across_tasks() {
    init_tracing();
    let (throttle, seen) = recording_throttle(ThrottleConfig {
        interval: Duration::from_millis(5),
        ..Default::default()
    });

    let mut handles = vec![];
    for task in 0..8u32 {
        let throttle = throttle.clone();
        handles.push(tokio::spawn(async move {
            for i in 0..500 {
                throttle.call(task * 1000 + i).unwrap();
                if i % 50 == 0 {
                    tokio::task::yield_now().await;
                }
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }
    throttle.flush().unwrap();

    let metrics = throttle.metrics();
    assert_eq!(metrics.calls, 4000);
    assert!(metrics.forwarded >= 1);
    assert!(metrics.forwarded < metrics.calls);
    assert!(!seen.lock().is_empty());
}

/// An interval of `Duration::MAX` forwards once and then holds the latest call.
#[tokio::test(start_paused = true)]
async fn test_unbounded_interval_forwards_once() {
    init_tracing();
    let (throttle, seen) = recording_throttle(ThrottleConfig {
        interval: Duration::MAX,
        ..Default::default()
    });

    throttle.call(1).unwrap();
    throttle.call(2).unwrap();
    sleep(Duration::from_secs(3600)).await;

    assert_eq!(values(&seen), vec![1]);
    assert_eq!(throttle.state(), PacerState::Pending);
}
