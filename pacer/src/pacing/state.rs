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

//! Observable state of a throttle or debounce.

use std::fmt;

/// Where a pacing primitive is in its cycle.
///
/// ```text
/// Idle ──call──▶ Pending ──timer──▶ Idle
///   │                                 ▲
///   └──forward──▶ Cooldown ──window───┘
///
/// any ──discard──▶ Discarded
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PacerState {
    /// Nothing pending and no window open; the next call may forward at once.
    Idle,
    /// A window is open but no call is waiting on it.
    Cooldown,
    /// A call is waiting for its timer.
    Pending,
    /// Permanently shut down; calls are ignored.
    Discarded,
}

impl PacerState {
    /// Returns `true` for [`PacerState::Discarded`].
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Discarded)
    }
}

impl fmt::Display for PacerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Cooldown => write!(f, "cooldown"),
            Self::Pending => write!(f, "pending"),
            Self::Discarded => write!(f, "discarded"),
        }
    }
}
