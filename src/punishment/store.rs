//! Punishment store
//!
//! This module defines the narrow persistence interface the engine commits
//! through, plus an in-memory implementation. Real deployments back this with
//! durable storage; the engine only sees the trait.

use crate::error::{TribunalError, TribunalResult};
use crate::punishment::{Punishment, Victim};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Persistence interface for punishment records
#[async_trait]
pub trait PunishmentStore: Send + Sync {
    /// Allocate the next punishment id
    fn allocate_id(&self) -> i64;

    /// Persist a new record
    async fn insert(&self, punishment: Punishment) -> TribunalResult<()>;

    /// Fetch an active record by id
    async fn fetch(&self, id: i64) -> Option<Punishment>;

    /// Lift an active record, returning it
    ///
    /// The original record is append-only: lifting removes it from the active
    /// set without mutating it.
    async fn lift(&self, id: i64) -> TribunalResult<Punishment>;

    /// All active records against a victim
    async fn active_for_victim(&self, victim: Victim) -> Vec<Punishment>;
}

/// In-memory punishment store
#[derive(Clone, Default)]
pub struct InMemoryPunishmentStore {
    active: Arc<DashMap<i64, Punishment>>,
    lifted: Arc<DashMap<i64, Punishment>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryPunishmentStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A lifted record by id, if any
    #[must_use]
    pub fn lifted(&self, id: i64) -> Option<Punishment> {
        self.lifted.get(&id).map(|entry| entry.value().clone())
    }
}

#[async_trait]
impl PunishmentStore for InMemoryPunishmentStore {
    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    async fn insert(&self, punishment: Punishment) -> TribunalResult<()> {
        self.active.insert(punishment.id, punishment);
        Ok(())
    }

    async fn fetch(&self, id: i64) -> Option<Punishment> {
        self.active.get(&id).map(|entry| entry.value().clone())
    }

    async fn lift(&self, id: i64) -> TribunalResult<Punishment> {
        let (_, punishment) = self
            .active
            .remove(&id)
            .ok_or(TribunalError::NotFound(id))?;
        self.lifted.insert(id, punishment.clone());
        Ok(punishment)
    }

    async fn active_for_victim(&self, victim: Victim) -> Vec<Punishment> {
        self.active
            .iter()
            .filter_map(|entry| {
                let record = entry.value();
                if record.victim == victim {
                    Some(record.clone())
                } else {
                    None
                }
            })
            .collect()
    }
}
