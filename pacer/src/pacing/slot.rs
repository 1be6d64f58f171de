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

//! Single-value buffer holding the latest deferred arguments.

/// Holds at most one value; storing into a full slot overwrites it.
///
/// # Examples
///
/// ```rust
/// use pacer::pacing::PendingSlot;
///
/// let mut slot = PendingSlot::new();
/// assert!(!slot.store(1));
/// assert!(slot.store(2));
///
/// assert_eq!(slot.take(), Some(2));
/// assert_eq!(slot.overwritten(), 1);
/// assert!(!slot.is_occupied());
/// ```
#[derive(Debug)]
pub struct PendingSlot<A> {
    value: Option<A>,
    overwritten: u64,
}

impl<A> PendingSlot<A> {
    /// Creates an empty slot.
    pub const fn new() -> Self {
        Self {
            value: None,
            overwritten: 0,
        }
    }

    /// Stores `value`, returning `true` if it replaced an earlier one.
    pub fn store(&mut self, value: A) -> bool {
        let replaced = self.value.replace(value).is_some();
        if replaced {
            self.overwritten += 1;
        }
        replaced
    }

    /// Takes the stored value, leaving the slot empty.
    pub fn take(&mut self) -> Option<A> {
        self.value.take()
    }

    /// Drops the stored value, returning `true` if there was one.
    pub fn clear(&mut self) -> bool {
        self.value.take().is_some()
    }

    /// Returns `true` if a value is stored.
    pub fn is_occupied(&self) -> bool {
        self.value.is_some()
    }

    /// Total number of values that were overwritten before being taken.
    pub fn overwritten(&self) -> u64 {
        self.overwritten
    }
}

impl<A> Default for PendingSlot<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_slot() {
        let mut slot: PendingSlot<&str> = PendingSlot::default();
        assert!(!slot.is_occupied());
        assert_eq!(slot.take(), None);
        assert!(!slot.clear());
    }

    #[test]
    fn test_latest_value_wins() {
        let mut slot = PendingSlot::new();
        for i in 0..5 {
            slot.store(i);
        }
        assert_eq!(slot.overwritten(), 4);
        assert!(slot.clear());
        assert_eq!(slot.take(), None);
    }
}
