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

//! Cooperative queues and the id lock that goes with them.
//!
//! [`BoundedQueue`] is a producer/consumer queue whose `put` suspends while
//! the queue is full and whose `get` suspends while it is empty. Suspended
//! tasks resume strictly in the order they suspended.
//!
//! [`DictQueue`] keeps one waiting value per key, replacing it on every
//! insert. [`MultiLock`] lets tasks working for the same cause share a set of
//! ids while keeping other causes out.
//!
//! # Examples
//!
//! ```rust
//! use pacer::queue::{BoundedQueue, QueueError};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let queue = BoundedQueue::new(8).unwrap();
//! queue.put("job-1").await.unwrap();
//! queue.put("job-2").await.unwrap();
//! queue.close();
//!
//! // Remaining items are still delivered after close
//! assert_eq!(queue.get_all().await.unwrap(), vec!["job-1", "job-2"]);
//! assert_eq!(queue.get().await, Err(QueueError::Closed));
//! # }
//! ```

mod bounded_queue;
mod config;
mod dict_queue;
mod error;
mod multi_lock;

pub use bounded_queue::BoundedQueue;
pub use config::QueueConfig;
pub use dict_queue::DictQueue;
pub use error::{PutError, QueueError, TryGetError, TryPutError};
pub use multi_lock::{MultiLock, MultiLockGuard};
