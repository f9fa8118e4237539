//! Enforcement service
//!
//! Drives the two-phase lifecycle around punish and unpunish operations:
//! a cancellable pre-event, the store commit, the asynchronous notification
//! render, and finally the informational post-event. A vetoed pre-event
//! aborts before anything takes effect and is an outcome, not an error.

use crate::error::{TribunalError, TribunalResult};
use crate::format::{PunishmentFormatter, RenderedMessage};
use crate::punishment::{
    LifecycleEventBus, Punishment, PunishmentDraft, PunishmentStore,
};
use crate::{AUDIT_TARGET, ERROR_TARGET};
use std::sync::Arc;
use tracing::{error, info};

/// Outcome of an enforcement attempt
#[derive(Debug)]
pub enum Enforcement {
    /// An observer vetoed the pre-event; nothing was committed
    Cancelled,
    /// The action committed and its notification rendered
    Applied {
        punishment: Punishment,
        notification: RenderedMessage,
    },
}

/// Service for punish and unpunish operations
#[derive(Clone)]
pub struct EnforcementService {
    store: Arc<dyn PunishmentStore>,
    bus: Arc<LifecycleEventBus>,
    formatter: Arc<PunishmentFormatter>,
}

impl EnforcementService {
    /// Create a service over the given collaborators
    pub fn new(
        store: Arc<dyn PunishmentStore>,
        bus: Arc<LifecycleEventBus>,
        formatter: Arc<PunishmentFormatter>,
    ) -> Self {
        Self {
            store,
            bus,
            formatter,
        }
    }

    /// Apply a punishment
    ///
    /// # Errors
    /// Fails on an invalid punishment window, a store fault, or a failed
    /// notification render. A vetoed attempt is [`Enforcement::Cancelled`],
    /// not an error.
    pub async fn punish(&self, draft: PunishmentDraft) -> TribunalResult<Enforcement> {
        let id = self.store.allocate_id();
        let punishment = draft.into_punishment(id)?;

        if self.bus.publish_pre_punish(&punishment) {
            return Ok(Enforcement::Cancelled);
        }

        self.store.insert(punishment.clone()).await?;
        let notification = match self.formatter.render_notification(&punishment).await {
            Ok(notification) => notification,
            Err(e) => {
                error!(
                    target: ERROR_TARGET,
                    punishment_id = punishment.id,
                    error = %e,
                    "Failed to render punishment notification"
                );
                return Err(e);
            }
        };
        self.bus.publish_post_punish(&punishment);

        info!(
            target: AUDIT_TARGET,
            punishment_id = punishment.id,
            kind = %punishment.kind,
            victim = %crate::punishment::Subject::from(punishment.victim),
            automatic = punishment.automatic,
            retroactive = punishment.retroactive,
            "Punishment applied"
        );

        Ok(Enforcement::Applied {
            punishment,
            notification,
        })
    }

    /// Lift a punishment by id
    ///
    /// The original record is not mutated; it leaves the active set and the
    /// removal notification renders from the removals layout.
    ///
    /// # Errors
    /// Fails with [`TribunalError::NotFound`] for an unknown id, or on a
    /// store fault or failed render.
    pub async fn unpunish(&self, id: i64, automatic: bool) -> TribunalResult<Enforcement> {
        let punishment = self
            .store
            .fetch(id)
            .await
            .ok_or(TribunalError::NotFound(id))?;

        if self.bus.publish_pre_unpunish(&punishment) {
            return Ok(Enforcement::Cancelled);
        }

        let lifted = self.store.lift(id).await?;
        let notification = self.formatter.render_removal(&lifted).await?;
        self.bus.publish_post_unpunish(&lifted, automatic);

        info!(
            target: AUDIT_TARGET,
            punishment_id = lifted.id,
            kind = %lifted.kind,
            automatic,
            "Punishment lifted"
        );

        Ok(Enforcement::Applied {
            punishment: lifted,
            notification,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigStore;
    use crate::names::InMemoryDirectory;
    use crate::punishment::{
        InMemoryPunishmentStore, LifecycleEvent, LifecycleObserver, Operator, PunishmentType,
        StaticScopes, Victim,
    };
    use std::sync::Mutex;
    use uuid::Uuid;

    struct Recorder {
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl LifecycleObserver for Recorder {
        fn on_event(&self, event: &mut LifecycleEvent<'_>) {
            let label = match event {
                LifecycleEvent::PrePunish { .. } => "pre-punish",
                LifecycleEvent::PostPunish { .. } => "post-punish",
                LifecycleEvent::PreUnpunish { .. } => "pre-unpunish",
                LifecycleEvent::PostUnpunish { .. } => "post-unpunish",
            };
            self.seen.lock().unwrap().push(label.to_string());
        }
    }

    struct VetoPunish;

    impl LifecycleObserver for VetoPunish {
        fn on_event(&self, event: &mut LifecycleEvent<'_>) {
            if matches!(event, LifecycleEvent::PrePunish { .. }) {
                event.cancel();
            }
        }
    }

    fn harness() -> (EnforcementService, Arc<InMemoryPunishmentStore>, Arc<LifecycleEventBus>, Uuid) {
        let directory = InMemoryDirectory::new();
        let uuid = Uuid::new_v4();
        directory.record(uuid, "Alice");

        let store = Arc::new(InMemoryPunishmentStore::new());
        let bus = Arc::new(LifecycleEventBus::new());
        let formatter = Arc::new(
            PunishmentFormatter::new(
                Arc::new(ConfigStore::defaults()),
                Arc::new(directory),
                Arc::new(StaticScopes::new()),
            )
            .unwrap(),
        );
        let service = EnforcementService::new(store.clone(), bus.clone(), formatter);
        (service, store, bus, uuid)
    }

    fn draft(uuid: Uuid) -> PunishmentDraft {
        PunishmentDraft::new(
            PunishmentType::Ban,
            Victim::Player(uuid),
            Operator::Console,
            "griefing",
        )
    }

    #[tokio::test]
    async fn test_punish_commits_renders_and_notifies() {
        let (service, store, bus, uuid) = harness();
        let seen = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe(Box::new(Recorder { seen: seen.clone() }));

        let outcome = service.punish(draft(uuid)).await.unwrap();
        let Enforcement::Applied { punishment, notification } = outcome else {
            panic!("expected applied outcome");
        };

        assert!(store.fetch(punishment.id).await.is_some());
        assert!(notification.plain().contains("Alice"));
        assert_eq!(*seen.lock().unwrap(), vec!["pre-punish", "post-punish"]);
    }

    #[tokio::test]
    async fn test_vetoed_punish_commits_nothing() {
        let (service, store, bus, uuid) = harness();
        let seen = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe(Box::new(VetoPunish));
        bus.subscribe(Box::new(Recorder { seen: seen.clone() }));

        let outcome = service.punish(draft(uuid)).await.unwrap();
        assert!(matches!(outcome, Enforcement::Cancelled));

        // Nothing persisted, no post-event
        assert!(store.active_for_victim(Victim::Player(uuid)).await.is_empty());
        assert_eq!(*seen.lock().unwrap(), vec!["pre-punish"]);
    }

    #[tokio::test]
    async fn test_unpunish_lifts_without_mutation() {
        let (service, store, bus, uuid) = harness();
        let seen = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe(Box::new(Recorder { seen: seen.clone() }));

        let outcome = service.punish(draft(uuid)).await.unwrap();
        let Enforcement::Applied { punishment: original, .. } = outcome else {
            panic!("expected applied outcome");
        };

        let outcome = service.unpunish(original.id, true).await.unwrap();
        let Enforcement::Applied { punishment: lifted, notification } = outcome else {
            panic!("expected applied outcome");
        };

        assert_eq!(lifted, original);
        assert!(notification.plain().contains("unbanned"));
        assert!(store.fetch(original.id).await.is_none());
        assert_eq!(store.lifted(original.id), Some(original));
        assert_eq!(
            *seen.lock().unwrap(),
            vec!["pre-punish", "post-punish", "pre-unpunish", "post-unpunish"]
        );
    }

    #[tokio::test]
    async fn test_unpunish_unknown_id() {
        let (service, _, _, _) = harness();
        let err = service.unpunish(404, false).await.unwrap_err();
        assert!(matches!(err, TribunalError::NotFound(404)));
    }

    #[tokio::test]
    async fn test_invalid_window_rejected_before_events() {
        let (service, _, bus, uuid) = harness();
        let seen = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe(Box::new(Recorder { seen: seen.clone() }));

        let mut bad = draft(uuid);
        bad.end = bad.start - 1;
        let err = service.punish(bad).await.unwrap_err();
        assert!(matches!(err, TribunalError::InvalidWindow { .. }));
        assert!(seen.lock().unwrap().is_empty());
    }
}
