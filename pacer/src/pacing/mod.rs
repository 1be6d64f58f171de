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

//! Rate limiting and burst collapsing for callables.
//!
//! Both primitives wrap a [`Callable`] and a [`Scheduler`](crate::scheduler::Scheduler):
//!
//! - [`Throttle`]: forward at most once per interval, keeping the latest
//!   arguments seen inside the interval
//! - [`Debounce`]: forward once a burst of calls has gone quiet
//!
//! Neither ever suspends the caller. Arguments that cannot be forwarded yet
//! wait in a [`PendingSlot`], which holds only the most recent call.
//!
//! # Examples
//!
//! ```rust
//! use pacer::pacing::{Debounce, DebounceConfig, PacerState};
//! use pacer::scheduler::ManualScheduler;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let scheduler = Arc::new(ManualScheduler::new());
//! let config = DebounceConfig {
//!     delay: Duration::from_millis(50),
//!     leading: true,
//!     ..Default::default()
//! };
//! let debounce = Debounce::with_config(config, scheduler.clone(), |_: ()| {});
//!
//! debounce.call(()).unwrap();
//! assert_eq!(debounce.state(), PacerState::Cooldown);
//!
//! debounce.discard();
//! assert_eq!(debounce.state(), PacerState::Discarded);
//! ```

mod callable;
mod config;
mod debounce;
mod slot;
mod state;
mod throttle;

pub use callable::{BoxError, CallError, Callable, IntoCallResult};
pub use config::{DebounceConfig, ThrottleConfig};
pub use debounce::Debounce;
pub use slot::PendingSlot;
pub use state::PacerState;
pub use throttle::Throttle;
