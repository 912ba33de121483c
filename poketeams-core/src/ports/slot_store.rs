//! Slot store port - durable key-value slots

use crate::domain::result::Result;

/// Durable key-value storage
///
/// Each slot holds one serialized document under a string key. Writes
/// replace the whole value; there is no partial update.
pub trait SlotStore: Send + Sync {
    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn put(&self, key: &str, value: &str) -> Result<()>;
}
