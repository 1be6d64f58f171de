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

//! Bounded FIFO queue with cooperatively suspending `put`/`get`.
//!
//! Items live in a `VecDeque` behind a short-lived lock. Suspension is
//! handled by two fair semaphores: `slots` counts free capacity (absent for
//! unbounded queues) and `items` counts stored items. Tokio's semaphore hands
//! permits to waiters in the order they started waiting, which gives the
//! queue its first-suspended, first-resumed guarantee, and dropping a waiting
//! acquire gives its place up without leaking a permit.

use super::config::QueueConfig;
use super::error::{PutError, QueueError, TryGetError, TryPutError};
use crate::observability::{QueueMetrics, QueueStats};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tokio::sync::{Semaphore, TryAcquireError};

/// A FIFO queue with an optional capacity limit.
///
/// `put` suspends while the queue is full and `get` suspends while it is
/// empty. Tasks suspended on the same operation are released in the order
/// they suspended. A capacity of 0 means unbounded: `put` never suspends.
///
/// Clones share the same queue, so a producer and a consumer task can each
/// hold their own handle.
///
/// # Examples
///
/// ```rust
/// use pacer::queue::BoundedQueue;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let queue = BoundedQueue::new(2).unwrap();
///
/// let producer = queue.clone();
/// let task = tokio::spawn(async move {
///     for i in 0..5 {
///         // Suspends whenever two items are already waiting
///         producer.put(i).await.unwrap();
///     }
/// });
///
/// let mut received = Vec::new();
/// for _ in 0..5 {
///     received.push(queue.get().await.unwrap());
/// }
/// task.await.unwrap();
///
/// assert_eq!(received, vec![0, 1, 2, 3, 4]);
/// # }
/// ```
pub struct BoundedQueue<T> {
    inner: Arc<QueueInner<T>>,
}

struct QueueInner<T> {
    /// Maximum number of stored items, 0 when unbounded
    capacity: usize,

    /// Stored items, oldest first
    store: Mutex<VecDeque<T>>,

    /// Free capacity; `None` for unbounded queues
    slots: Option<Semaphore>,

    /// Items available to `get`
    items: Semaphore,

    /// Set once by `close`
    closed: AtomicBool,

    stats: QueueStats,
}

impl<T> BoundedQueue<T> {
    /// Largest capacity a bounded queue supports.
    pub const MAX_CAPACITY: usize = Semaphore::MAX_PERMITS;

    /// Create a queue holding at most `capacity` items.
    ///
    /// A capacity of 0 creates an unbounded queue.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Capacity`] if `capacity` exceeds
    /// [`MAX_CAPACITY`](Self::MAX_CAPACITY).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pacer::queue::BoundedQueue;
    ///
    /// let queue: BoundedQueue<String> = BoundedQueue::new(100).unwrap();
    /// assert_eq!(queue.capacity(), 100);
    /// assert!(queue.is_bounded());
    /// ```
    pub fn new(capacity: usize) -> Result<Self, QueueError> {
        if capacity > Self::MAX_CAPACITY {
            return Err(QueueError::Capacity {
                requested: capacity,
                max: Self::MAX_CAPACITY,
            });
        }

        tracing::debug!(capacity, "Creating queue");

        Ok(Self {
            inner: Arc::new(QueueInner {
                capacity,
                store: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
                slots: (capacity > 0).then(|| Semaphore::new(capacity)),
                items: Semaphore::new(0),
                closed: AtomicBool::new(false),
                stats: QueueStats::new(),
            }),
        })
    }

    /// Create a queue without a capacity limit.
    pub fn unbounded() -> Self {
        Self {
            inner: Arc::new(QueueInner {
                capacity: 0,
                store: Mutex::new(VecDeque::new()),
                slots: None,
                items: Semaphore::new(0),
                closed: AtomicBool::new(false),
                stats: QueueStats::new(),
            }),
        }
    }

    /// Create a queue from configuration.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn with_config(config: &QueueConfig) -> Result<Self, QueueError> {
        Self::new(config.capacity)
    }

    /// Append `item`, suspending while the queue is full.
    ///
    /// Wakes the longest-waiting `get`, if any.
    ///
    /// # Errors
    ///
    /// Returns the item inside [`PutError`] if the queue is closed, including
    /// when it is closed while this call is suspended.
    pub async fn put(&self, item: T) -> Result<(), PutError<T>> {
        if let Some(slots) = &self.inner.slots {
            match slots.try_acquire() {
                Ok(permit) => permit.forget(),
                Err(TryAcquireError::Closed) => return Err(PutError(item)),
                Err(TryAcquireError::NoPermits) => {
                    self.inner.stats.record_put_wait();
                    tracing::trace!(capacity = self.inner.capacity, "Queue full, put waiting");

                    let started = Instant::now();
                    let acquired = slots.acquire().await;
                    self.inner.stats.record_wait_time(started.elapsed());

                    match acquired {
                        Ok(permit) => permit.forget(),
                        Err(_) => return Err(PutError(item)),
                    }
                }
            }
        }

        self.inner.push(item).map_err(PutError)
    }

    /// Remove and return the oldest item, suspending while the queue is empty.
    ///
    /// Wakes the longest-waiting `put`, if any. After [`close`](Self::close)
    /// the remaining items are still handed out.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Closed`] once the queue is closed and empty.
    pub async fn get(&self) -> Result<T, QueueError> {
        match self.inner.items.try_acquire() {
            Ok(permit) => permit.forget(),
            Err(TryAcquireError::Closed) => return self.inner.pop().ok_or(QueueError::Closed),
            Err(TryAcquireError::NoPermits) => {
                self.inner.stats.record_get_wait();
                tracing::trace!("Queue empty, get waiting");

                let started = Instant::now();
                let acquired = self.inner.items.acquire().await;
                self.inner.stats.record_wait_time(started.elapsed());

                match acquired {
                    Ok(permit) => permit.forget(),
                    Err(_) => return self.inner.pop().ok_or(QueueError::Closed),
                }
            }
        }

        self.inner.pop().ok_or(QueueError::Closed)
    }

    /// Append `item` without suspending.
    ///
    /// # Errors
    ///
    /// [`TryPutError::WouldBlock`] if the queue is full,
    /// [`TryPutError::Closed`] if it is closed. The item is handed back in
    /// both cases.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pacer::queue::{BoundedQueue, TryPutError};
    ///
    /// let queue = BoundedQueue::new(1).unwrap();
    /// assert!(queue.try_put(1).is_ok());
    /// assert!(matches!(queue.try_put(2), Err(TryPutError::WouldBlock(2))));
    /// ```
    pub fn try_put(&self, item: T) -> Result<(), TryPutError<T>> {
        if let Some(slots) = &self.inner.slots {
            match slots.try_acquire() {
                Ok(permit) => permit.forget(),
                Err(TryAcquireError::Closed) => return Err(TryPutError::Closed(item)),
                Err(TryAcquireError::NoPermits) => return Err(TryPutError::WouldBlock(item)),
            }
        }

        self.inner.push(item).map_err(TryPutError::Closed)
    }

    /// Remove and return the oldest item without suspending.
    ///
    /// Items already promised to a suspended `get` are not visible here, so
    /// `try_get` never overtakes a waiting task.
    ///
    /// # Errors
    ///
    /// [`TryGetError::WouldBlock`] if no item is available,
    /// [`TryGetError::Closed`] if the queue is closed and drained.
    pub fn try_get(&self) -> Result<T, TryGetError> {
        match self.inner.items.try_acquire() {
            Ok(permit) => permit.forget(),
            Err(TryAcquireError::Closed) => {}
            Err(TryAcquireError::NoPermits) => return Err(TryGetError::WouldBlock),
        }

        self.inner.pop().ok_or(TryGetError::Closed)
    }

    /// Wait for at least one item, then take every available item.
    ///
    /// Items come back oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Closed`] once the queue is closed and empty.
    pub async fn get_all(&self) -> Result<Vec<T>, QueueError> {
        let first = self.get().await?;
        let rest = self.inner.take_available();

        let mut batch = Vec::with_capacity(rest.len() + 1);
        batch.push(first);
        batch.extend(rest);
        Ok(batch)
    }

    /// Drop every available item and return how many were dropped.
    ///
    /// Items already promised to a woken `get` are left for it. Freed slots
    /// wake suspended `put` calls.
    pub fn clear(&self) -> usize {
        let dropped = self.inner.take_available().len();
        if dropped > 0 {
            tracing::debug!(dropped, "Queue cleared");
        }
        dropped
    }

    /// Close the queue.
    ///
    /// Every suspended `put` fails with its item handed back; every suspended
    /// `get` drains what is left and then fails with [`QueueError::Closed`].
    /// Closing twice is a no-op.
    pub fn close(&self) {
        let remaining = {
            let store = self.inner.store.lock();
            if self.inner.closed.swap(true, Ordering::AcqRel) {
                return;
            }
            store.len()
        };

        self.inner.items.close();
        if let Some(slots) = &self.inner.slots {
            slots.close();
        }

        tracing::debug!(remaining, "Queue closed");
    }

    /// Returns `true` once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    /// Number of items currently stored.
    ///
    /// Exact at the instant of the call; it can only change at the caller's
    /// next suspension point under cooperative scheduling.
    pub fn size(&self) -> usize {
        self.inner.store.lock().len()
    }

    /// Alias for [`size`](Self::size).
    pub fn len(&self) -> usize {
        self.size()
    }

    /// Returns `true` if no items are stored.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Returns `true` if a bounded queue holds `capacity` items.
    pub fn is_full(&self) -> bool {
        self.is_bounded() && self.size() >= self.inner.capacity
    }

    /// Configured capacity, 0 when unbounded.
    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Returns `true` if the queue has a capacity limit.
    pub fn is_bounded(&self) -> bool {
        self.inner.slots.is_some()
    }

    /// Get current queue metrics.
    pub fn metrics(&self) -> QueueMetrics {
        self.inner.stats.snapshot(self.size(), self.inner.capacity)
    }
}

impl<T> QueueInner<T> {
    /// Stores an item whose slot is already reserved.
    fn push(&self, item: T) -> Result<(), T> {
        let mut store = self.store.lock();
        if self.closed.load(Ordering::Acquire) {
            return Err(item);
        }
        store.push_back(item);
        drop(store);

        self.stats.record_put();
        self.items.add_permits(1);
        Ok(())
    }

    /// Removes the oldest item and frees its slot.
    fn pop(&self) -> Option<T> {
        let item = self.store.lock().pop_front()?;

        self.stats.record_get();
        if let Some(slots) = &self.slots {
            slots.add_permits(1);
        }
        Some(item)
    }

    /// Takes every item not promised to a woken getter.
    fn take_available(&self) -> Vec<T> {
        let mut store = self.store.lock();

        let count = if self.closed.load(Ordering::Acquire) {
            store.len()
        } else {
            let available = self
                .items
                .available_permits()
                .min(store.len())
                .min(u32::MAX as usize);
            if available == 0 {
                return Vec::new();
            }
            match self.items.try_acquire_many(available as u32) {
                Ok(permit) => {
                    permit.forget();
                    available
                }
                Err(_) => 0,
            }
        };

        let batch: Vec<T> = store.drain(..count).collect();
        drop(store);

        for _ in 0..count {
            self.stats.record_get();
        }
        if let Some(slots) = &self.slots {
            if count > 0 {
                slots.add_permits(count);
            }
        }
        batch
    }
}

impl<T> Clone for BoundedQueue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for BoundedQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedQueue")
            .field("capacity", &self.inner.capacity)
            .field("size", &self.size())
            .field("closed", &self.is_closed())
            .finish()
    }
}
