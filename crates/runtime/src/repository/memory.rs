//! In-memory [`RaidRepository`] for the service and tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use raid_core::RaidGameState;

use super::{RaidId, RaidRepository, RepositoryError, Result, SharedRaid};

pub struct InMemoryRaidRepository {
    raids: RwLock<HashMap<RaidId, SharedRaid>>,
    next_id: AtomicU64,
    max_raids: usize,
}

impl InMemoryRaidRepository {
    pub const DEFAULT_MAX_RAIDS: usize = 64;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_MAX_RAIDS)
    }

    /// Create a repository that refuses new raids beyond `max_raids`.
    pub fn with_capacity(max_raids: usize) -> Self {
        Self {
            raids: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            max_raids,
        }
    }

    pub fn max_raids(&self) -> usize {
        self.max_raids
    }

    pub fn len(&self) -> usize {
        self.raids.read().map(|raids| raids.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryRaidRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl RaidRepository for InMemoryRaidRepository {
    fn create(&self, raid: RaidGameState) -> Result<RaidId> {
        let mut raids = self
            .raids
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        if raids.len() >= self.max_raids {
            return Err(RepositoryError::CapacityReached {
                max: self.max_raids,
            });
        }
        let id = RaidId(self.next_id.fetch_add(1, Ordering::Relaxed));
        raids.insert(id, Arc::new(Mutex::new(raid)));
        Ok(id)
    }

    fn get(&self, id: RaidId) -> Result<SharedRaid> {
        let raids = self
            .raids
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        raids
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::RaidNotFound(id))
    }

    fn remove(&self, id: RaidId) -> Result<Option<SharedRaid>> {
        let mut raids = self
            .raids
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(raids.remove(&id))
    }

    fn exists(&self, id: RaidId) -> bool {
        self.raids
            .read()
            .map(|raids| raids.contains_key(&id))
            .unwrap_or(false)
    }

    fn list(&self) -> Result<Vec<RaidId>> {
        let raids = self
            .raids
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let mut ids: Vec<RaidId> = raids.keys().copied().collect();
        ids.sort_unstable();
        Ok(ids)
    }
}
