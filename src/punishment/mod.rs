//! Punishment engine core
//!
//! This module groups the punishment record model, subject resolution, the
//! lifecycle event bus, the persistence interface, and the enforcement
//! service that ties them together.

mod events;
mod record;
mod service;
mod store;
mod subject;

pub use events::{LifecycleEvent, LifecycleEventBus, LifecycleObserver};
pub use record::{
    Punishment, PunishmentDraft, PunishmentType, Scope, ScopeManager, StaticScopes,
};
pub use service::{Enforcement, EnforcementService};
pub use store::{InMemoryPunishmentStore, PunishmentStore};
pub use subject::{Operator, Subject, SubjectResolver, Victim, expand_uuid};
