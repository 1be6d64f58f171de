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

//! Configuration for queues.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for a [`BoundedQueue`](super::BoundedQueue).
///
/// # Examples
///
/// ```rust
/// use pacer::queue::{BoundedQueue, QueueConfig};
///
/// let config = QueueConfig { capacity: 16 };
/// let queue: BoundedQueue<u64> = BoundedQueue::with_config(&config).unwrap();
/// assert_eq!(queue.capacity(), 16);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct QueueConfig {
    /// Maximum number of stored items.
    ///
    /// `put` suspends once this many items are waiting. 0 disables the
    /// limit entirely.
    ///
    /// Default: 0 (unbounded)
    pub capacity: usize,
}

impl QueueConfig {
    /// Configuration for a queue holding at most `capacity` items.
    pub const fn bounded(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Configuration for an unbounded queue.
    pub const fn unbounded() -> Self {
        Self { capacity: 0 }
    }
}
