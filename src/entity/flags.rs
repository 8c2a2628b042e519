//! Synchronized agent flags
//!
//! Flags are mutated only on the authoritative side and mirrored to
//! observers. Setters record changes in a dirty mask; the simulation drains
//! the mask after each agent tick and publishes the diff as events, keeping
//! the flag set decoupled from any transport.

use serde::{Deserialize, Serialize};

/// Identity of a synchronized boolean flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlagId {
    HasHat,
    HasTrunk,
    IsAngry,
    IsGiving,
}

const FLAG_COUNT: usize = 4;

impl FlagId {
    #[inline]
    fn index(self) -> usize {
        match self {
            FlagId::HasHat => 0,
            FlagId::HasTrunk => 1,
            FlagId::IsAngry => 2,
            FlagId::IsGiving => 3,
        }
    }

    fn from_index(index: usize) -> Self {
        match index {
            0 => FlagId::HasHat,
            1 => FlagId::HasTrunk,
            2 => FlagId::IsAngry,
            _ => FlagId::IsGiving,
        }
    }
}

/// Boolean flag set with observer dirty tracking
#[derive(Debug, Clone, Default)]
pub struct SyncedFlags {
    values: [bool; FLAG_COUNT],
    dirty: [bool; FLAG_COUNT],
}

impl SyncedFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, flag: FlagId) -> bool {
        self.values[flag.index()]
    }

    /// Set a flag, marking it dirty only when the value actually changes
    pub fn set(&mut self, flag: FlagId, value: bool) {
        let i = flag.index();
        if self.values[i] != value {
            self.values[i] = value;
            self.dirty[i] = true;
        }
    }

    /// Take the pending diff for publication to observers
    pub fn drain_dirty(&mut self) -> Vec<(FlagId, bool)> {
        let mut diff = Vec::new();
        for i in 0..FLAG_COUNT {
            if self.dirty[i] {
                self.dirty[i] = false;
                diff.push((FlagId::from_index(i), self.values[i]));
            }
        }
        diff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_marks_dirty_once() {
        let mut flags = SyncedFlags::new();
        flags.set(FlagId::HasHat, true);
        assert!(flags.get(FlagId::HasHat));
        assert_eq!(flags.drain_dirty(), vec![(FlagId::HasHat, true)]);
        // Drained; nothing pending
        assert!(flags.drain_dirty().is_empty());
    }

    #[test]
    fn test_redundant_set_is_not_dirty() {
        let mut flags = SyncedFlags::new();
        flags.set(FlagId::IsAngry, false);
        assert!(flags.drain_dirty().is_empty());

        flags.set(FlagId::IsAngry, true);
        flags.drain_dirty();
        flags.set(FlagId::IsAngry, true);
        assert!(flags.drain_dirty().is_empty());
    }

    #[test]
    fn test_toggle_within_one_drain_reports_final_value() {
        let mut flags = SyncedFlags::new();
        flags.set(FlagId::IsGiving, true);
        flags.set(FlagId::IsGiving, false);
        // Observers only ever see the latest value
        assert_eq!(flags.drain_dirty(), vec![(FlagId::IsGiving, false)]);
    }
}
