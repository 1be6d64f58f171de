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

//! Keyed queue where a newer value replaces a waiting one.
//!
//! Keys leave in the order they were first inserted. Inserting a key that
//! is already waiting swaps its value in place, so a slow consumer only ever
//! sees the latest value per key.

use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::Notify;

/// A queue of key/value pairs in which the latest value for a key wins.
///
/// Typical use is change propagation: producers report "object X changed to
/// Y" as often as they like, and the consumer handles each changed object
/// once with its current value. [`next`](Self::next) suspends while the queue
/// is empty.
///
/// Clones share the same queue.
///
/// # Examples
///
/// ```rust
/// use pacer::queue::DictQueue;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let changes = DictQueue::new();
/// changes.insert("cpu", 10);
/// changes.insert("mem", 512);
/// changes.insert("cpu", 95);
///
/// assert_eq!(changes.next().await, ("cpu", 95));
/// assert_eq!(changes.next().await, ("mem", 512));
/// assert!(changes.is_empty());
/// # }
/// ```
pub struct DictQueue<K, V> {
    inner: Arc<DictInner<K, V>>,
}

struct DictInner<K, V> {
    entries: Mutex<Entries<K, V>>,
    /// Signalled on every insert
    readable: Notify,
}

struct Entries<K, V> {
    /// Value and position of each waiting key
    values: HashMap<K, (u64, V)>,
    /// Waiting keys by position
    order: BTreeMap<u64, K>,
    next_seq: u64,
}

impl<K, V> Entries<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some((_, current)) = self.values.get_mut(&key) {
            return Some(std::mem::replace(current, value));
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.order.insert(seq, key.clone());
        self.values.insert(key, (seq, value));
        None
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        let (seq, value) = self.values.remove(key)?;
        self.order.remove(&seq);
        Some(value)
    }

    fn pop_first(&mut self) -> Option<(K, V)> {
        let (_, key) = self.order.pop_first()?;
        let (_, value) = self.values.remove(&key)?;
        Some((key, value))
    }
}

impl<K, V> DictQueue<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DictInner {
                entries: Mutex::new(Entries {
                    values: HashMap::new(),
                    order: BTreeMap::new(),
                    next_seq: 0,
                }),
                readable: Notify::new(),
            }),
        }
    }

    /// Queue `value` under `key`.
    ///
    /// If `key` is already waiting its value is replaced and the old value
    /// returned; the key keeps its place in line.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        let replaced = self.inner.entries.lock().insert(key, value);
        if replaced.is_some() {
            tracing::trace!("Waiting value replaced");
        }
        self.inner.readable.notify_one();
        replaced
    }

    /// Queue `key` with `make()` unless it is already waiting.
    ///
    /// Returns `true` if the key was added.
    pub fn insert_if_absent(&self, key: K, make: impl FnOnce() -> V) -> bool {
        let added = {
            let mut entries = self.inner.entries.lock();
            if entries.values.contains_key(&key) {
                false
            } else {
                entries.insert(key, make());
                true
            }
        };
        self.inner.readable.notify_one();
        added
    }

    /// Take `key` out of the queue, returning its waiting value.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.entries.lock().remove(key)
    }

    /// Returns `true` if `key` is waiting.
    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.entries.lock().values.contains_key(key)
    }

    /// Remove and return the oldest key with its latest value, suspending
    /// while the queue is empty.
    ///
    /// Dropping the returned future before it completes takes nothing.
    pub async fn next(&self) -> (K, V) {
        loop {
            let readable = self.inner.readable.notified();
            if let Some(entry) = self.try_next() {
                return entry;
            }
            tracing::trace!("Dict queue empty, next waiting");
            readable.await;
        }
    }

    /// Remove and return the oldest entry without suspending.
    pub fn try_next(&self) -> Option<(K, V)> {
        self.inner.entries.lock().pop_first()
    }

    /// Drop every waiting entry and return how many were dropped.
    pub fn clear(&self) -> usize {
        let mut entries = self.inner.entries.lock();
        let dropped = entries.values.len();
        entries.values.clear();
        entries.order.clear();
        dropped
    }

    /// Number of waiting keys.
    pub fn len(&self) -> usize {
        self.inner.entries.lock().values.len()
    }

    /// Returns `true` if no key is waiting.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> Default for DictQueue<K, V>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Clone for DictQueue<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> fmt::Debug for DictQueue<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DictQueue")
            .field("len", &self.inner.entries.lock().values.len())
            .finish()
    }
}
