//! Store trait definitions

use crate::StoreResult;

/// Flat string-keyed slot storage.
///
/// Every write replaces the whole value of a slot; there is no partial
/// update and no coordination between concurrent writers (last write wins).
pub trait KeyValueStore: Send + Sync {
    /// Read a slot, `None` if it was never written or has been removed
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write a slot, replacing any previous value
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove a slot; removing a missing slot is not an error
    fn remove(&self, key: &str) -> StoreResult<()>;
}
