//! Punishment lifecycle events
//!
//! Pre-events are dispatched synchronously before an enforcement action
//! commits and may be cancelled by any observer; post-events are dispatched
//! after commit and are informational only. Observers run in registration
//! order.

use crate::EVENT_TARGET;
use crate::punishment::Punishment;
use std::sync::{PoisonError, RwLock};
use tracing::info;

/// A lifecycle transition around a punish or unpunish action
#[derive(Debug)]
pub enum LifecycleEvent<'a> {
    /// About to punish; cancellable
    PrePunish {
        punishment: &'a Punishment,
        cancelled: bool,
    },
    /// Punishment committed
    PostPunish {
        punishment: &'a Punishment,
        automatic: bool,
        retroactive: bool,
    },
    /// About to lift a punishment; cancellable
    PreUnpunish {
        punishment: &'a Punishment,
        cancelled: bool,
    },
    /// Punishment lifted
    PostUnpunish {
        punishment: &'a Punishment,
        automatic: bool,
    },
}

impl LifecycleEvent<'_> {
    /// The punishment this event is about
    #[must_use]
    pub fn punishment(&self) -> &Punishment {
        match self {
            Self::PrePunish { punishment, .. }
            | Self::PostPunish { punishment, .. }
            | Self::PreUnpunish { punishment, .. }
            | Self::PostUnpunish { punishment, .. } => punishment,
        }
    }

    /// Whether observers may veto this event
    #[must_use]
    pub fn is_cancellable(&self) -> bool {
        matches!(self, Self::PrePunish { .. } | Self::PreUnpunish { .. })
    }

    /// Set the cancellation flag; a no-op on post-events
    pub fn cancel(&mut self) {
        match self {
            Self::PrePunish { cancelled, .. } | Self::PreUnpunish { cancelled, .. } => {
                *cancelled = true;
            }
            Self::PostPunish { .. } | Self::PostUnpunish { .. } => {}
        }
    }

    /// Whether an observer has cancelled this event
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        match self {
            Self::PrePunish { cancelled, .. } | Self::PreUnpunish { cancelled, .. } => *cancelled,
            Self::PostPunish { .. } | Self::PostUnpunish { .. } => false,
        }
    }
}

/// Observer of punishment lifecycle events
pub trait LifecycleObserver: Send + Sync {
    /// Called synchronously for every published event
    fn on_event(&self, event: &mut LifecycleEvent<'_>);
}

/// Publishes lifecycle events to registered observers in order
#[derive(Default)]
pub struct LifecycleEventBus {
    observers: RwLock<Vec<Box<dyn LifecycleObserver>>>,
}

impl LifecycleEventBus {
    /// Create a bus with no observers
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer; dispatch order follows registration order
    pub fn subscribe(&self, observer: Box<dyn LifecycleObserver>) {
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(observer);
    }

    fn dispatch(&self, event: &mut LifecycleEvent<'_>) {
        let observers = self
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        for observer in observers.iter() {
            observer.on_event(event);
        }
    }

    /// Publish a cancellable pre-punish event, returning whether it was vetoed
    pub fn publish_pre_punish(&self, punishment: &Punishment) -> bool {
        let mut event = LifecycleEvent::PrePunish {
            punishment,
            cancelled: false,
        };
        self.dispatch(&mut event);
        if event.is_cancelled() {
            info!(
                target: EVENT_TARGET,
                punishment_id = punishment.id,
                kind = %punishment.kind,
                "Punish attempt cancelled by observer"
            );
        }
        event.is_cancelled()
    }

    /// Publish an informational post-punish event
    pub fn publish_post_punish(&self, punishment: &Punishment) {
        let mut event = LifecycleEvent::PostPunish {
            punishment,
            automatic: punishment.automatic,
            retroactive: punishment.retroactive,
        };
        self.dispatch(&mut event);
    }

    /// Publish a cancellable pre-unpunish event, returning whether it was vetoed
    pub fn publish_pre_unpunish(&self, punishment: &Punishment) -> bool {
        let mut event = LifecycleEvent::PreUnpunish {
            punishment,
            cancelled: false,
        };
        self.dispatch(&mut event);
        if event.is_cancelled() {
            info!(
                target: EVENT_TARGET,
                punishment_id = punishment.id,
                kind = %punishment.kind,
                "Unpunish attempt cancelled by observer"
            );
        }
        event.is_cancelled()
    }

    /// Publish an informational post-unpunish event
    pub fn publish_post_unpunish(&self, punishment: &Punishment, automatic: bool) {
        let mut event = LifecycleEvent::PostUnpunish {
            punishment,
            automatic,
        };
        self.dispatch(&mut event);
    }
}
