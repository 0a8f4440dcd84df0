use crate::Hashtable;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Serializes the live entries as a map. Tombstones and the table's
/// configuration are not part of the output.
impl Serialize for Hashtable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.live_entries() {
            map.serialize_entry(key, &value)?;
        }
        map.end()
    }
}
