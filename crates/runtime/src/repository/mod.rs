//! Repository layer for live raids.
//!
//! Raids are created, looked up and removed explicitly through a
//! [`RaidRepository`]. Nothing is persisted; a raid lives as long as the
//! process or until it is closed.

mod error;
mod memory;
mod traits;

use std::fmt;
use std::sync::{Arc, Mutex};

use raid_core::RaidGameState;

pub use error::{RepositoryError, Result};
pub use memory::InMemoryRaidRepository;
pub use traits::RaidRepository;

/// Identifier assigned to a raid by its repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct RaidId(pub u64);

impl fmt::Display for RaidId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A stored raid. Lock it for the duration of one action.
pub type SharedRaid = Arc<Mutex<RaidGameState>>;
