/*
 *  engine/slot.rs
 *
 *  screend - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  One text line and its expiry
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use tokio::time::Instant;

/// What one display line holds
///
/// `expires_at == None` means the text stays until replaced. A slot whose
/// instant has passed is logically empty, the revert task makes it so.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slot {
    pub text: String,
    pub expires_at: Option<Instant>,
}

impl Slot {
    pub fn permanent(text: impl Into<String>) -> Self {
        Self { text: text.into(), expires_at: None }
    }

    pub fn temporary(text: impl Into<String>, expires_at: Instant) -> Self {
        Self { text: text.into(), expires_at: Some(expires_at) }
    }

    /// Whether a revert armed at `armed` still owns this slot
    pub fn armed_at(&self, armed: Instant) -> bool {
        self.expires_at == Some(armed)
    }

    pub fn is_temporary(&self) -> bool {
        self.expires_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_is_empty_and_permanent() {
        let slot = Slot::default();
        assert!(slot.text.is_empty());
        assert!(!slot.is_temporary());
    }

    #[test]
    fn test_armed_at_matches_only_same_instant() {
        let now = Instant::now();
        let slot = Slot::temporary("X", now);
        assert!(slot.armed_at(now));
        assert!(!slot.armed_at(now + Duration::from_secs(1)));
        assert!(!Slot::permanent("X").armed_at(now));
    }
}
