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

//! Time sources for throttle and debounce.
//!
//! Pacing primitives never sleep or read the clock directly. They go through
//! a [`Scheduler`], which comes in two flavors:
//!
//! - [`TokioScheduler`]: spawns one task per timer on a tokio runtime
//! - [`ManualScheduler`]: a fake clock advanced by hand, for tests
//!
//! # Examples
//!
//! ```rust
//! use pacer::scheduler::{ManualScheduler, Scheduler, TokioScheduler};
//! use std::sync::Arc;
//!
//! // Outside a runtime only the manual scheduler is available
//! assert!(TokioScheduler::new().is_err());
//! let scheduler: Arc<dyn Scheduler> = Arc::new(ManualScheduler::new());
//! assert_eq!(scheduler.name(), "manual");
//! ```

mod id;
mod manual;
mod runtime;
mod traits;

pub use id::TimerId;
pub use manual::{ManualScheduler, TickReport};
pub use runtime::TokioScheduler;
pub use traits::{Scheduler, TimerCallback, TimerHandle, TimerToken};
