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

//! Lock over a set of ids, shared by holders with the same cause.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::Notify;

/// Locks any number of ids at once.
///
/// Each held id records the cause that locked it. Acquiring succeeds when
/// every requested id is either free or already held for an equal cause;
/// otherwise the caller suspends until some holder releases. Ids stay held
/// until the last guard naming them is dropped.
///
/// # Examples
///
/// ```rust
/// use pacer::queue::MultiLock;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let lock = MultiLock::new();
///
/// let a = lock.acquire("sync", [1, 2, 3]).await;
/// // Same cause shares the ids
/// let b = lock.acquire("sync", [3, 4]).await;
/// // A different cause is refused while 3 is held
/// assert!(lock.try_acquire("import", [3]).is_none());
/// // Id 5 is free for anyone
/// assert!(lock.try_acquire("import", [5]).is_some());
///
/// drop(a);
/// drop(b);
/// assert!(lock.try_acquire("import", [3]).is_some());
/// # }
/// ```
pub struct MultiLock<I, C> {
    inner: Arc<LockInner<I, C>>,
}

struct LockInner<I, C> {
    held: Mutex<HashMap<I, Holder<C>>>,
    /// Signalled whenever ids are released
    released: Notify,
}

struct Holder<C> {
    cause: C,
    count: usize,
}

impl<I, C> MultiLock<I, C>
where
    I: Eq + Hash + Clone,
    C: PartialEq + Clone,
{
    /// Creates a lock with nothing held.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(LockInner {
                held: Mutex::new(HashMap::new()),
                released: Notify::new(),
            }),
        }
    }

    /// Lock `ids` for `cause`, suspending until none of them is held for a
    /// different cause.
    ///
    /// The ids are taken all at once or not at all. Dropping the returned
    /// future before it completes holds nothing.
    pub async fn acquire(
        &self,
        cause: C,
        ids: impl IntoIterator<Item = I>,
    ) -> MultiLockGuard<I, C> {
        let ids: Vec<I> = ids.into_iter().collect();
        loop {
            let released = self.inner.released.notified();
            if self.inner.try_lock(&cause, &ids) {
                return self.guard(ids);
            }
            tracing::trace!(ids = ids.len(), "Ids held for another cause, waiting");
            released.await;
        }
    }

    /// Lock `ids` for `cause` if that is possible without waiting.
    pub fn try_acquire(
        &self,
        cause: C,
        ids: impl IntoIterator<Item = I>,
    ) -> Option<MultiLockGuard<I, C>> {
        let ids: Vec<I> = ids.into_iter().collect();
        self.inner.try_lock(&cause, &ids).then(|| self.guard(ids))
    }

    /// Returns `true` if `id` is currently held.
    pub fn contains(&self, id: &I) -> bool {
        self.inner.held.lock().contains_key(id)
    }

    /// Cause `id` is held for, if it is held.
    pub fn holder(&self, id: &I) -> Option<C> {
        self.inner.held.lock().get(id).map(|holder| holder.cause.clone())
    }

    /// Number of ids currently held.
    pub fn len(&self) -> usize {
        self.inner.held.lock().len()
    }

    /// Returns `true` if no id is held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn guard(&self, ids: Vec<I>) -> MultiLockGuard<I, C> {
        MultiLockGuard {
            inner: Arc::clone(&self.inner),
            ids,
        }
    }
}

impl<I, C> LockInner<I, C>
where
    I: Eq + Hash + Clone,
    C: PartialEq + Clone,
{
    fn try_lock(&self, cause: &C, ids: &[I]) -> bool {
        let mut held = self.held.lock();
        let blocked = ids
            .iter()
            .filter_map(|id| held.get(id))
            .any(|holder| holder.cause != *cause);
        if blocked {
            return false;
        }

        for id in ids {
            held.entry(id.clone())
                .or_insert_with(|| Holder {
                    cause: cause.clone(),
                    count: 0,
                })
                .count += 1;
        }
        true
    }
}

impl<I, C> LockInner<I, C>
where
    I: Eq + Hash,
{
    fn release(&self, ids: &[I]) {
        {
            let mut held = self.held.lock();
            for id in ids {
                if let Some(holder) = held.get_mut(id) {
                    holder.count -= 1;
                    if holder.count == 0 {
                        held.remove(id);
                    }
                }
            }
        }
        self.released.notify_waiters();
    }
}

impl<I, C> Default for MultiLock<I, C>
where
    I: Eq + Hash + Clone,
    C: PartialEq + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<I, C> Clone for MultiLock<I, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<I, C> fmt::Debug for MultiLock<I, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiLock")
            .field("held", &self.inner.held.lock().len())
            .finish()
    }
}

/// Holds ids locked by [`MultiLock::acquire`]; releases them when dropped.
#[must_use = "the ids are released as soon as the guard is dropped"]
pub struct MultiLockGuard<I: Eq + Hash, C> {
    inner: Arc<LockInner<I, C>>,
    ids: Vec<I>,
}

impl<I: Eq + Hash, C> MultiLockGuard<I, C> {
    /// Ids this guard holds.
    pub fn ids(&self) -> &[I] {
        &self.ids
    }
}

impl<I: Eq + Hash, C> Drop for MultiLockGuard<I, C> {
    fn drop(&mut self) {
        self.inner.release(&self.ids);
    }
}

impl<I: Eq + Hash + fmt::Debug, C> fmt::Debug for MultiLockGuard<I, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiLockGuard")
            .field("ids", &self.ids)
            .finish()
    }
}
