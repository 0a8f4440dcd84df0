use crate::error::DeleteError;
use crate::Hashtable;
use hashbrown::HashMap;
use std::hash::BuildHasher;

/// The map interface a [`FrequencyModel`](crate::FrequencyModel) needs from
/// its backing store.
pub trait CountTable {
    /// Value stored for `key`, or the table's default when absent.
    fn get(&self, key: &str) -> u64;

    fn set(&mut self, key: &str, value: u64);

    fn delete(&mut self, key: &str) -> Result<(), DeleteError>;

    /// Number of live entries.
    fn size(&self) -> usize;

    /// Value [`CountTable::get`] returns for absent keys.
    fn default_value(&self) -> u64;
}

impl CountTable for Hashtable {
    fn get(&self, key: &str) -> u64 {
        Hashtable::get(self, key)
    }

    fn set(&mut self, key: &str, value: u64) {
        Hashtable::set(self, key, value)
    }

    fn delete(&mut self, key: &str) -> Result<(), DeleteError> {
        Hashtable::delete(self, key)
    }

    fn size(&self) -> usize {
        self.len()
    }

    fn default_value(&self) -> u64 {
        Hashtable::default_value(self)
    }
}

/// Absent keys read as `0`. Removal is physical, so a second delete of the
/// same key reports `NotFound` rather than `AlreadyDeleted`.
impl<S: BuildHasher> CountTable for HashMap<String, u64, S> {
    fn get(&self, key: &str) -> u64 {
        HashMap::get(self, key).copied().unwrap_or(0)
    }

    fn set(&mut self, key: &str, value: u64) {
        match self.get_mut(key) {
            Some(slot) => *slot = value,
            None => {
                self.insert(key.to_owned(), value);
            }
        }
    }

    fn delete(&mut self, key: &str) -> Result<(), DeleteError> {
        self.remove(key)
            .map(|_| ())
            .ok_or_else(|| DeleteError::NotFound(key.to_owned()))
    }

    fn size(&self) -> usize {
        self.len()
    }

    fn default_value(&self) -> u64 {
        0
    }
}
