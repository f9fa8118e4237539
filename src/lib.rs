//! tribunal: punishment-record engine for a networked moderation platform
//!
//! Models bans, mutes, warns and kicks as first-class records, resolves the
//! identities that issue and receive them, renders notifications from
//! configurable templates asynchronously, and exposes a cancellable lifecycle
//! event hook around every enforcement action.

pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod names;
pub mod punishment;

pub const ENGINE_NAME: &str = "tribunal";
pub const AUDIT_TARGET: &str = "tribunal::audit";
pub const ERROR_TARGET: &str = "tribunal::error";
pub const EVENT_TARGET: &str = "tribunal::events";

pub use config::ConfigStore;
pub use error::{TribunalError, TribunalResult};
pub use format::{AltReportFormatter, PunishmentFormatter, RenderedMessage};
pub use punishment::{
    Enforcement, EnforcementService, LifecycleEventBus, LifecycleObserver, Punishment,
    PunishmentDraft, PunishmentType, Subject, SubjectResolver,
};
