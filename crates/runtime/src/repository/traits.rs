//! Repository contract for live raid instances.

use raid_core::RaidGameState;

use super::{RaidId, Result, SharedRaid};

/// Registry of running raids.
///
/// Each raid sits behind its own lock so distinct raids can be driven in
/// parallel while every mutation of a single raid stays serialized.
pub trait RaidRepository: Send + Sync {
    /// Store a new raid and return the id assigned to it.
    fn create(&self, raid: RaidGameState) -> Result<RaidId>;

    /// Look up a raid by id.
    fn get(&self, id: RaidId) -> Result<SharedRaid>;

    /// Remove a raid, returning its handle if it existed.
    fn remove(&self, id: RaidId) -> Result<Option<SharedRaid>>;

    /// Check whether a raid with this id is stored.
    fn exists(&self, id: RaidId) -> bool;

    /// List stored raid ids in ascending order.
    fn list(&self) -> Result<Vec<RaidId>>;
}
