//! Punishment records
//!
//! This module defines the punishment record itself, its type and scope, and
//! the draft used to construct a record before the store assigns an id.
//! Records are immutable once created; lifting one goes through the removal
//! flow rather than mutation.

use crate::error::{TribunalError, TribunalResult};
use crate::punishment::{Operator, Victim};
use chrono::Utc;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of punishment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PunishmentType {
    Ban,
    Mute,
    Warn,
    Kick,
}

impl PunishmentType {
    /// Lowercase plural name, used in message layout paths
    #[must_use]
    pub fn plural(&self) -> &'static str {
        match self {
            Self::Ban => "bans",
            Self::Mute => "mutes",
            Self::Warn => "warns",
            Self::Kick => "kicks",
        }
    }
}

impl fmt::Display for PunishmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ban => write!(f, "ban"),
            Self::Mute => write!(f, "mute"),
            Self::Warn => write!(f, "warn"),
            Self::Kick => write!(f, "kick"),
        }
    }
}

/// Which server(s) a punishment applies to; absence of a server means global
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    Global,
    Server(String),
}

impl Default for Scope {
    fn default() -> Self {
        Self::Global
    }
}

/// Display-name lookup for punishment scopes
pub trait ScopeManager: Send + Sync {
    /// Server-specific label for the scope, if one is configured
    fn display_name_for(&self, scope: &Scope) -> Option<String>;
}

/// Scope labels registered at startup
#[derive(Clone, Default)]
pub struct StaticScopes {
    labels: DashMap<String, String>,
}

impl StaticScopes {
    /// Create an empty label table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a display label for a server id
    pub fn label(&self, server: impl Into<String>, display: impl Into<String>) {
        self.labels.insert(server.into(), display.into());
    }
}

impl ScopeManager for StaticScopes {
    fn display_name_for(&self, scope: &Scope) -> Option<String> {
        match scope {
            Scope::Global => None,
            Scope::Server(id) => self.labels.get(id).map(|entry| entry.value().clone()),
        }
    }
}

/// An immutable punishment record
///
/// `end == 0` means permanent; otherwise `end` strictly follows `start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Punishment {
    /// Numeric id assigned by the store
    pub id: i64,
    /// Kind of punishment
    pub kind: PunishmentType,
    /// Who receives the punishment
    pub victim: Victim,
    /// Who issued the punishment
    pub operator: Operator,
    /// Human-readable reason
    pub reason: String,
    /// Which server(s) the punishment applies to
    pub scope: Scope,
    /// Epoch seconds at which the punishment starts
    pub start: i64,
    /// Epoch seconds at which the punishment ends; 0 means permanent
    pub end: i64,
    /// Applied to sessions predating its creation
    pub retroactive: bool,
    /// Issued by a system rule rather than a human operator
    pub automatic: bool,
}

impl Punishment {
    /// Whether the punishment never expires
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        self.end == 0
    }
}

/// A punishment waiting for an id from the store
#[derive(Debug, Clone)]
pub struct PunishmentDraft {
    pub kind: PunishmentType,
    pub victim: Victim,
    pub operator: Operator,
    pub reason: String,
    pub scope: Scope,
    pub start: i64,
    pub end: i64,
    pub retroactive: bool,
    pub automatic: bool,
}

impl PunishmentDraft {
    /// Create a permanent draft starting now
    pub fn new(
        kind: PunishmentType,
        victim: Victim,
        operator: Operator,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            victim,
            operator,
            reason: reason.into(),
            scope: Scope::Global,
            start: Utc::now().timestamp(),
            end: 0,
            retroactive: false,
            automatic: false,
        }
    }

    /// Give the punishment a fixed duration in seconds from its start
    #[must_use]
    pub fn lasting(mut self, seconds: i64) -> Self {
        self.end = self.start + seconds;
        self
    }

    /// Restrict the punishment to a single server
    #[must_use]
    pub fn scoped(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Mark the punishment as applying to past sessions
    #[must_use]
    pub fn retroactive(mut self) -> Self {
        self.retroactive = true;
        self
    }

    /// Mark the punishment as system-issued
    #[must_use]
    pub fn automatic(mut self) -> Self {
        self.automatic = true;
        self
    }

    /// Seal the draft into a record with the given id
    ///
    /// # Errors
    /// Returns [`TribunalError::InvalidWindow`] unless `end == 0 || end > start`.
    pub fn into_punishment(self, id: i64) -> TribunalResult<Punishment> {
        if self.end != 0 && self.end <= self.start {
            return Err(TribunalError::InvalidWindow {
                start: self.start,
                end: self.end,
            });
        }
        Ok(Punishment {
            id,
            kind: self.kind,
            victim: self.victim,
            operator: self.operator,
            reason: self.reason,
            scope: self.scope,
            start: self.start,
            end: self.end,
            retroactive: self.retroactive,
            automatic: self.automatic,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn draft() -> PunishmentDraft {
        PunishmentDraft::new(
            PunishmentType::Ban,
            Victim::Player(Uuid::new_v4()),
            Operator::Console,
            "spamming",
        )
    }

    #[test]
    fn test_permanent_by_default() {
        let punishment = draft().into_punishment(1).unwrap();
        assert!(punishment.is_permanent());
        assert_eq!(punishment.scope, Scope::Global);
        assert!(!punishment.retroactive);
        assert!(!punishment.automatic);
    }

    #[test]
    fn test_window_invariant() {
        let punishment = draft().lasting(3600).into_punishment(2).unwrap();
        assert!(!punishment.is_permanent());
        assert_eq!(punishment.end - punishment.start, 3600);

        let mut bad = draft();
        bad.end = bad.start;
        let err = bad.into_punishment(3).unwrap_err();
        assert!(matches!(err, TribunalError::InvalidWindow { .. }));

        let mut bad = draft();
        bad.end = bad.start - 60;
        assert!(bad.into_punishment(4).is_err());
    }

    #[test]
    fn test_draft_flags() {
        let punishment = draft()
            .retroactive()
            .automatic()
            .scoped(Scope::Server("lobby".to_string()))
            .into_punishment(5)
            .unwrap();
        assert!(punishment.retroactive);
        assert!(punishment.automatic);
        assert_eq!(punishment.scope, Scope::Server("lobby".to_string()));
    }

    #[test]
    fn test_scope_labels() {
        let scopes = StaticScopes::new();
        scopes.label("lobby", "the lobby");

        assert_eq!(
            scopes.display_name_for(&Scope::Server("lobby".to_string())),
            Some("the lobby".to_string())
        );
        assert_eq!(scopes.display_name_for(&Scope::Server("other".to_string())), None);
        assert_eq!(scopes.display_name_for(&Scope::Global), None);
    }

    #[test]
    fn test_type_plural_and_display() {
        assert_eq!(PunishmentType::Ban.plural(), "bans");
        assert_eq!(PunishmentType::Mute.plural(), "mutes");
        assert_eq!(PunishmentType::Warn.plural(), "warns");
        assert_eq!(PunishmentType::Kick.plural(), "kicks");
        assert_eq!(PunishmentType::Ban.to_string(), "ban");
    }
}
