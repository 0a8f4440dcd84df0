use std::mem;

/// One cell of the backing array.
///
/// A slot starts `Empty` and, once written, never becomes `Empty` again. Only
/// a rehash, which replaces the whole array, produces fresh empty slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Slot {
    Empty,
    Live { key: String, value: u64 },
    /// Logically deleted. Still part of every probe chain running through it.
    Tombstone { key: String, value: u64 },
}

impl Slot {
    /// Returns the stored key for both live slots and tombstones.
    pub fn key(&self) -> Option<&str> {
        match self {
            Slot::Empty => None,
            Slot::Live { key, .. } | Slot::Tombstone { key, .. } => Some(key.as_str()),
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Slot::Live { .. })
    }

    /// Turns a live slot into a tombstone, keeping key and value in place.
    /// Returns `false` if the slot was not live.
    pub fn bury(&mut self) -> bool {
        match mem::replace(self, Slot::Empty) {
            Slot::Live { key, value } => {
                *self = Slot::Tombstone { key, value };
                true
            }
            other => {
                *self = other;
                false
            }
        }
    }

    /// Makes the slot live with `value`. Returns `true` if it was a
    /// tombstone, i.e. the number of live entries went up by one.
    pub fn revive(&mut self, value: u64) -> bool {
        match mem::replace(self, Slot::Empty) {
            Slot::Live { key, .. } => {
                *self = Slot::Live { key, value };
                false
            }
            Slot::Tombstone { key, .. } => {
                *self = Slot::Live { key, value };
                true
            }
            Slot::Empty => false,
        }
    }
}
