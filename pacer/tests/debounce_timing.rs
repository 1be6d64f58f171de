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

//! Timing tests for debounce on a paused tokio clock.

use pacer::{BoundedQueue, Debounce, DebounceConfig, PacerState, TokioScheduler};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing_subscriber::EnvFilter;

const DELAY: Duration = Duration::from_millis(50);

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn recording_debounce(config: DebounceConfig) -> (Debounce<u32>, Arc<Mutex<Vec<(Instant, u32)>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let scheduler = Arc::new(TokioScheduler::new().unwrap());
    let debounce = Debounce::with_config(config, scheduler, move |value: u32| {
        sink.lock().push((Instant::now(), value));
    });
    (debounce, seen)
}

#[tokio::test(start_paused = true)]
async fn test_burst_forwards_once_after_quiet() {
    init_tracing();
    let (debounce, seen) = recording_debounce(DebounceConfig {
        delay: DELAY,
        ..Default::default()
    });

    for i in 0..10 {
        debounce.call(i).unwrap();
        sleep(Duration::from_millis(10)).await;
    }
    let last_call = Instant::now() - Duration::from_millis(10);
    assert!(seen.lock().is_empty());

    sleep(DELAY).await;
    let seen = seen.lock();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].1, 9);
    assert_eq!(seen[0].0 - last_call, DELAY);
}

#[tokio::test(start_paused = true)]
async fn test_max_wait_bounds_latency_of_endless_burst() {
    init_tracing();
    let (debounce, seen) = recording_debounce(DebounceConfig {
        delay: DELAY,
        max_wait: Some(Duration::from_millis(200)),
        ..Default::default()
    });
    let start = Instant::now();

    for i in 0..34 {
        debounce.call(i).unwrap();
        sleep(Duration::from_millis(30)).await;
    }
    sleep(DELAY).await;

    let seen = seen.lock();
    assert!(seen.len() >= 4, "expected periodic forwards, got {}", seen.len());
    assert!(seen[0].0 - start <= Duration::from_millis(200));
    for pair in seen.windows(2) {
        assert!(pair[1].0 - pair[0].0 <= Duration::from_millis(240));
    }
    assert_eq!(seen.last().map(|(_, value)| *value), Some(33));
}

#[tokio::test(start_paused = true)]
async fn test_leading_edge_forwards_immediately() {
    init_tracing();
    let (debounce, seen) = recording_debounce(DebounceConfig {
        delay: DELAY,
        leading: true,
        ..Default::default()
    });

    debounce.call(1).unwrap();
    assert_eq!(seen.lock().len(), 1);

    debounce.call(2).unwrap();
    sleep(DELAY + Duration::from_millis(1)).await;

    let values: Vec<u32> = seen.lock().iter().map(|(_, value)| *value).collect();
    assert_eq!(values, vec![1, 2]);
    assert_eq!(debounce.state(), PacerState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_discard_before_fire_suppresses_forever() {
    init_tracing();
    let (debounce, seen) = recording_debounce(DebounceConfig {
        delay: DELAY,
        ..Default::default()
    });

    debounce.call(1).unwrap();
    sleep(DELAY / 2).await;
    debounce.discard();

    sleep(DELAY * 4).await;
    debounce.call(2).unwrap();
    sleep(DELAY * 4).await;

    assert!(seen.lock().is_empty());
    assert!(debounce.is_discarded());
}

/// Debounced search terms feeding a worker through a queue.
#[tokio::test(start_paused = true)]
async fn test_debounce_feeds_queue() {
    init_tracing();
    let queue: BoundedQueue<String> = BoundedQueue::new(4).unwrap();
    let scheduler = Arc::new(TokioScheduler::new().unwrap());

    let producer = queue.clone();
    let search = Debounce::new(DELAY, scheduler.clone(), move |term: String| {
        producer.try_put(term)
    });

    let worker_queue = queue.clone();
    let worker = tokio::spawn(async move {
        let mut searches = vec![];
        while let Ok(term) = worker_queue.get().await {
            searches.push(term);
        }
        searches
    });

    for word in ["r", "ru", "rus", "rust"] {
        search.call(word.to_string()).unwrap();
        sleep(Duration::from_millis(20)).await;
    }
    sleep(DELAY).await;

    for word in ["t", "to", "tok", "tokio"] {
        search.call(word.to_string()).unwrap();
        sleep(Duration::from_millis(20)).await;
    }
    sleep(DELAY).await;
    queue.close();

    assert_eq!(worker.await.unwrap(), vec!["rust".to_string(), "tokio".to_string()]);
    assert_eq!(scheduler.failed_callbacks(), 0);
}
