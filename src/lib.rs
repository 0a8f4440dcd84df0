//! An open-addressing table from string keys to integer counts, and a
//! character n-gram model that uses it to attribute a text to one of two
//! reference sources.
//!
//! [`Hashtable`] resolves collisions with linear probing, deletes lazily by
//! leaving tombstones in the probe chain, and grows by a fixed factor once its
//! load factor passes a threshold. [`FrequencyModel`] consumes any
//! [`CountTable`], which is implemented both for [`Hashtable`] and for
//! `hashbrown::HashMap`.

mod circular_range;
mod config;
mod error;
mod hasher;
mod markov;
mod slot;
mod table;

#[cfg(feature = "serde")]
mod serde;


pub use config::TableConfig;
pub use error::{ConfigError, DeleteError, ModelError};
pub use hasher::{horner_index, P_CONSTANT};
pub use markov::{identify_source, Attribution, Backend, FrequencyModel, Source, MODEL_TABLE};
pub use table::CountTable;

use circular_range::CircularRange;
use slot::Slot;
use std::borrow::Cow;
use std::fmt;
use std::mem;
use tracing::{debug, trace};

/// Where a probe for a key ended up.
enum Probe {
    /// A slot holding the key, live or tombstoned.
    Found(usize),
    /// The first empty slot of the chain. The key is absent.
    Vacant(usize),
    /// Every slot is occupied by other keys.
    Exhausted,
}

/// An open-addressing table mapping strings to `u64` values.
///
/// Lookups of absent or deleted keys return the configured default value
/// instead of failing.
///
/// # Examples
///
/// ```
/// use probetable::Hashtable;
///
/// let mut counts = Hashtable::new(4, 0, 0.5, 2.0).unwrap();
/// counts.set("ab", 1);
/// counts.set("ab", counts.get("ab") + 1);
///
/// assert_eq!(counts.get("ab"), 2);
/// assert_eq!(counts.get("zz"), 0);
/// assert_eq!(counts.len(), 1);
///
/// counts.delete("ab").unwrap();
/// assert!(counts.delete("ab").is_err());
/// ```
#[derive(Clone)]
pub struct Hashtable {
    slots: Box<[Slot]>,
    /// Live slots.
    len: usize,
    /// Non-empty slots, live or tombstoned.
    used: usize,
    config: TableConfig,
}

fn empty_slots(capacity: usize) -> Box<[Slot]> {
    (0..capacity).map(|_| Slot::Empty).collect()
}

impl Hashtable {
    /// Creates an empty table. All parameters are required.
    pub fn new(
        capacity: usize,
        default_value: u64,
        load_factor: f64,
        growth_factor: f64,
    ) -> Result<Self, ConfigError> {
        Self::from_config(TableConfig::new(
            capacity,
            default_value,
            load_factor,
            growth_factor,
        ))
    }

    /// Creates an empty table from a [`TableConfig`], rejecting invalid
    /// parameters.
    pub fn from_config(config: TableConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            slots: empty_slots(config.capacity),
            len: 0,
            used: 0,
            config,
        })
    }

    /// The parameters this table was created with. `capacity` here is the
    /// initial capacity, see [`Hashtable::capacity`] for the current one.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Value returned by [`Hashtable::get`] for absent or deleted keys.
    pub fn default_value(&self) -> u64 {
        self.config.default_value
    }

    /// Current number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live entries, in constant time.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of live entries, counted by scanning every slot.
    /// Always equal to [`Hashtable::len`].
    pub fn count_live(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_live()).count()
    }

    /// Returns the value stored for `key`, or the default value if the key is
    /// absent or was deleted.
    ///
    /// A stored value equal to the default cannot be told apart from absence
    /// here. Use [`Hashtable::contains_key`] when that matters.
    pub fn get(&self, key: &str) -> u64 {
        match self.probe(key) {
            Probe::Found(idx) => match &self.slots[idx] {
                Slot::Live { value, .. } => *value,
                _ => self.config.default_value,
            },
            Probe::Vacant(_) | Probe::Exhausted => self.config.default_value,
        }
    }

    /// Returns `true` if `key` has a live entry.
    pub fn contains_key(&self, key: &str) -> bool {
        match self.probe(key) {
            Probe::Found(idx) => self.slots[idx].is_live(),
            Probe::Vacant(_) | Probe::Exhausted => false,
        }
    }

    /// Stores `value` under `key`, overwriting any previous value and
    /// reviving the key if it was deleted. May resize before returning, or
    /// rebuild at the same capacity once tombstones take up too many slots.
    pub fn set(&mut self, key: &str, value: u64) {
        while !self.insert_entry(Cow::Borrowed(key), value) {
            self.resize();
        }

        if self.config.exceeds_load(self.len, self.slots.len()) {
            self.resize();
        } else if self.config.exceeds_occupancy(self.used, self.slots.len()) {
            trace!(
                capacity = self.slots.len(),
                len = self.len,
                used = self.used,
                "too many tombstones, rebuilding in place"
            );
            self.rehash(self.slots.len());
        }
    }

    /// Marks the entry for `key` as deleted. The slot stays in place as a
    /// tombstone until the next rehash.
    pub fn delete(&mut self, key: &str) -> Result<(), DeleteError> {
        match self.probe(key) {
            Probe::Found(idx) => {
                if self.slots[idx].bury() {
                    self.len -= 1;
                    Ok(())
                } else {
                    Err(DeleteError::AlreadyDeleted(key.to_owned()))
                }
            }
            Probe::Vacant(_) | Probe::Exhausted => Err(DeleteError::NotFound(key.to_owned())),
        }
    }

    fn probe(&self, key: &str) -> Probe {
        let capacity = self.slots.len();
        let start = horner_index(key, capacity);

        for idx in CircularRange::new(capacity, start) {
            match self.slots[idx].key() {
                None => return Probe::Vacant(idx),
                Some(k) if k == key => return Probe::Found(idx),
                Some(_) => {}
            }
        }

        Probe::Exhausted
    }

    /// Writes an entry without looking at the load factor. Returns `false`
    /// only when the probe found neither the key nor an empty slot.
    fn insert_entry(&mut self, key: Cow<'_, str>, value: u64) -> bool {
        match self.probe(&key) {
            Probe::Found(idx) => {
                if self.slots[idx].revive(value) {
                    self.len += 1;
                }
                true
            }
            Probe::Vacant(idx) => {
                self.slots[idx] = Slot::Live {
                    key: key.into_owned(),
                    value,
                };
                self.len += 1;
                self.used += 1;
                true
            }
            Probe::Exhausted => false,
        }
    }

    /// Grows the backing array and reinserts every live entry. Tombstones are
    /// dropped.
    fn resize(&mut self) {
        let mut new_capacity = self.config.grown_capacity(self.slots.len());
        while self.config.exceeds_load(self.len, new_capacity) {
            new_capacity = self.config.grown_capacity(new_capacity);
        }

        self.rehash(new_capacity);
    }

    /// Replaces the backing array with `new_capacity` empty slots and
    /// reinserts every live entry.
    fn rehash(&mut self, new_capacity: usize) {
        debug_assert!(new_capacity >= self.slots.len());
        let old_capacity = self.slots.len();
        let old = mem::replace(&mut self.slots, empty_slots(new_capacity));
        let carried = self.len;
        self.len = 0;
        self.used = 0;

        for slot in Vec::from(old) {
            if let Slot::Live { key, value } = slot {
                let placed = self.insert_entry(Cow::Owned(key), value);
                debug_assert!(placed);
            }
        }

        debug_assert_eq!(self.len, carried);
        debug!(
            old_capacity,
            new_capacity,
            live = self.len,
            "rehashed hashtable"
        );
    }

    pub(crate) fn live_entries(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Live { key, value } => Some((key.as_str(), *value)),
            _ => None,
        })
    }
}

impl fmt::Debug for Hashtable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct Entries<'a>(&'a Hashtable);

        impl fmt::Debug for Entries<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_map().entries(self.0.live_entries()).finish()
            }
        }

        f.debug_struct("Hashtable")
            .field("capacity", &self.capacity())
            .field("len", &self.len)
            .field("entries", &Entries(self))
            .finish()
    }
}
