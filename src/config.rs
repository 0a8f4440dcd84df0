use crate::error::ConfigError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Construction parameters of a [`Hashtable`](crate::Hashtable).
///
/// Every field is required; there is no `Default` impl.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TableConfig {
    /// Initial number of slots.
    pub capacity: usize,
    /// Value returned by lookups of absent or deleted keys.
    pub default_value: u64,
    /// Resize once `len / capacity` exceeds this.
    pub load_factor: f64,
    /// Capacity multiplier applied on resize.
    pub growth_factor: f64,
}

impl TableConfig {
    pub fn new(capacity: usize, default_value: u64, load_factor: f64, growth_factor: f64) -> Self {
        Self {
            capacity,
            default_value,
            load_factor,
            growth_factor,
        }
    }

    /// Checks that the parameters describe a table that can always find an
    /// empty slot and always grows when it resizes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }

        // NaN fails both comparisons.
        if !(self.load_factor > 0.0 && self.load_factor < 1.0) {
            return Err(ConfigError::LoadFactorOutOfRange(self.load_factor));
        }

        if !(self.growth_factor.is_finite() && self.growth_factor > 1.0) {
            return Err(ConfigError::GrowthFactorTooSmall(self.growth_factor));
        }

        Ok(())
    }

    /// The capacity that follows `capacity` under this growth policy.
    /// Always strictly larger than `capacity`.
    pub(crate) fn grown_capacity(&self, capacity: usize) -> usize {
        let scaled = (capacity as f64 * self.growth_factor).ceil();
        let scaled = if scaled >= usize::MAX as f64 {
            usize::MAX
        } else {
            scaled as usize
        };

        scaled.max(capacity.saturating_add(1))
    }

    /// Live entries plus tombstones may fill at most this share of the slots.
    /// Lies halfway between the load factor and 1, so a table without
    /// tombstones always resizes on load first.
    pub(crate) fn occupancy_bound(&self) -> f64 {
        (self.load_factor + 1.0) / 2.0
    }

    pub(crate) fn exceeds_occupancy(&self, used: usize, capacity: usize) -> bool {
        used as f64 / capacity as f64 > self.occupancy_bound()
    }

    pub(crate) fn exceeds_load(&self, len: usize, capacity: usize) -> bool {
        len as f64 / capacity as f64 > self.load_factor
    }
}
