//! Identity and display-name resolution
//!
//! This module defines the narrow interfaces the engine consumes for player
//! identity: a synchronous UUID-existence check and an asynchronous display
//! name resolver. Both caches are written by the identity-ingestion side; the
//! engine only reads through them.

use crate::error::{TribunalError, TribunalResult};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Synchronous UUID-existence check over an already-warm cache
#[cfg_attr(test, mockall::automock)]
pub trait IdentityCache: Send + Sync {
    /// Whether the UUID is known to the identity directory
    fn uuid_exists(&self, uuid: Uuid) -> bool;
}

/// Asynchronous player-name resolution
///
/// A cached name answers instantly; a miss triggers a remote lookup whose
/// failure surfaces as [`TribunalError::NameLookupFailed`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NameResolver: Send + Sync {
    /// Display name for the UUID, if already cached
    fn cached_name(&self, uuid: Uuid) -> Option<String>;

    /// Resolve the display name through the backing directory
    async fn lookup_name(&self, uuid: Uuid) -> TribunalResult<String>;
}

/// In-memory identity directory backing both resolution interfaces
///
/// The ingestion side records identities via [`InMemoryDirectory::record`];
/// resolvers only read.
#[derive(Clone, Default)]
pub struct InMemoryDirectory {
    names: Arc<DashMap<Uuid, String>>,
}

impl InMemoryDirectory {
    /// Create an empty directory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a known identity and its display name
    pub fn record(&self, uuid: Uuid, name: impl Into<String>) {
        self.names.insert(uuid, name.into());
    }
}

impl IdentityCache for InMemoryDirectory {
    fn uuid_exists(&self, uuid: Uuid) -> bool {
        self.names.contains_key(&uuid)
    }
}

#[async_trait]
impl NameResolver for InMemoryDirectory {
    fn cached_name(&self, uuid: Uuid) -> Option<String> {
        self.names.get(&uuid).map(|entry| entry.value().clone())
    }

    async fn lookup_name(&self, uuid: Uuid) -> TribunalResult<String> {
        // The directory has no remote backing; a miss here is a failed lookup.
        self.cached_name(uuid)
            .ok_or(TribunalError::NameLookupFailed(uuid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_record_and_resolve() {
        let directory = InMemoryDirectory::new();
        let uuid = Uuid::new_v4();

        assert!(!directory.uuid_exists(uuid));
        assert_eq!(directory.cached_name(uuid), None);

        directory.record(uuid, "Notch");
        assert!(directory.uuid_exists(uuid));
        assert_eq!(directory.cached_name(uuid), Some("Notch".to_string()));
        assert_eq!(directory.lookup_name(uuid).await.unwrap(), "Notch");
    }

    #[tokio::test]
    async fn test_lookup_miss_fails() {
        let directory = InMemoryDirectory::new();
        let uuid = Uuid::new_v4();

        let err = directory.lookup_name(uuid).await.unwrap_err();
        assert!(matches!(err, TribunalError::NameLookupFailed(u) if u == uuid));
    }
}
