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

//! Configuration types for throttle and debounce.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a [`Throttle`](super::Throttle).
///
/// # Examples
///
/// ```rust
/// use pacer::pacing::ThrottleConfig;
/// use std::time::Duration;
///
/// // Forward at most once a second, only ever the latest call
/// let config = ThrottleConfig {
///     interval: Duration::from_secs(1),
///     leading: false,
///     ..Default::default()
/// };
/// assert!(config.trailing);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ThrottleConfig {
    /// Minimum spacing between two forwarded calls.
    ///
    /// Default: 100 ms
    pub interval: Duration,

    /// Forward a call immediately when the window is open.
    ///
    /// Default: true
    pub leading: bool,

    /// Forward the latest call made inside the window once it closes.
    ///
    /// Default: true
    pub trailing: bool,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(100),
            leading: true,
            trailing: true,
        }
    }
}

/// Configuration for a [`Debounce`](super::Debounce).
///
/// # Examples
///
/// ```rust
/// use pacer::pacing::DebounceConfig;
/// use std::time::Duration;
///
/// // Wait for 200 ms of quiet, but never hold a call for more than 1 s
/// let config = DebounceConfig {
///     delay: Duration::from_millis(200),
///     max_wait: Some(Duration::from_secs(1)),
///     ..Default::default()
/// };
/// assert!(!config.leading);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DebounceConfig {
    /// Quiet period required after the last call.
    ///
    /// Default: 100 ms
    pub delay: Duration,

    /// Forward the first call of a burst immediately.
    ///
    /// Default: false
    pub leading: bool,

    /// Forward the last call of a burst once it goes quiet.
    ///
    /// Default: true
    pub trailing: bool,

    /// Longest a burst may hold back a call.
    ///
    /// Values shorter than `delay` are raised to `delay`.
    ///
    /// Default: None (a burst can defer forever)
    pub max_wait: Option<Duration>,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(100),
            leading: false,
            trailing: true,
            max_wait: None,
        }
    }
}
