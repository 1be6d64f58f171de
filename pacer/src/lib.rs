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

#![doc = include_str!("../../README.md")]
#![allow(clippy::module_inception)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

//! ## Architecture
//!
//! - **[`queue`]**: [`BoundedQueue`], [`DictQueue`], [`MultiLock`] and the
//!   queue error types
//! - **[`pacing`]**: [`Throttle`], [`Debounce`] and the [`Callable`] they wrap
//! - **[`scheduler`]**: the [`Scheduler`] capability with [`TokioScheduler`]
//!   and [`ManualScheduler`]
//! - **[`observability`]**: counters and structured error logging
//! - **[`error`]**: the top-level [`PacerError`]
//!
//! ## Testing With a Manual Clock
//!
//! ```rust
//! use pacer::{Debounce, ManualScheduler};
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use std::time::Duration;
//!
//! let scheduler = Arc::new(ManualScheduler::new());
//! let hits = Arc::new(AtomicU32::new(0));
//!
//! let counter = hits.clone();
//! let debounce = Debounce::new(Duration::from_millis(10), scheduler.clone(), move |_: u8| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! for i in 0..20 {
//!     debounce.call(i).unwrap();
//! }
//! scheduler.advance(Duration::from_millis(10));
//! assert_eq!(hits.load(Ordering::SeqCst), 1);
//! ```

pub mod error;
pub mod observability;
pub mod pacing;
pub mod queue;
pub mod scheduler;

pub use error::PacerError;
pub use observability::{ErrorMetrics, PacerMetrics, QueueMetrics, log_error};
pub use pacing::{
    CallError, Callable, Debounce, DebounceConfig, PacerState, Throttle, ThrottleConfig,
};
pub use queue::{
    BoundedQueue, DictQueue, MultiLock, PutError, QueueConfig, QueueError, TryGetError,
    TryPutError,
};
pub use scheduler::{ManualScheduler, Scheduler, TimerHandle, TimerId, TokioScheduler};
