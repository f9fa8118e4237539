//! Subjects and subject resolution
//!
//! This module defines the canonical identity value behind every punishment
//! (a player UUID, a network address, or the console), the role-restricted
//! victim/operator views of it, and the resolver that parses raw textual
//! input into a validated subject.

use crate::error::{TribunalError, TribunalResult};
use crate::names::IdentityCache;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;
use uuid::Uuid;

const LENGTH_OF_FULL_UUID: usize = 36;
const LENGTH_OF_SHORT_UUID: usize = 32;

/// Canonical identity value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subject {
    /// A player, by UUID
    Player(Uuid),
    /// A network address
    Address(IpAddr),
    /// The server console
    Console,
}

impl Subject {
    /// Tag name, for diagnostics
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Player(_) => "player",
            Self::Address(_) => "address",
            Self::Console => "console",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player(uuid) => write!(f, "{uuid}"),
            Self::Address(addr) => write!(f, "{addr}"),
            Self::Console => write!(f, "console"),
        }
    }
}

/// The receiving side of a punishment: a player or an address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Victim {
    Player(Uuid),
    Address(IpAddr),
}

impl TryFrom<Subject> for Victim {
    type Error = TribunalError;

    fn try_from(subject: Subject) -> TribunalResult<Self> {
        match subject {
            Subject::Player(uuid) => Ok(Self::Player(uuid)),
            Subject::Address(addr) => Ok(Self::Address(addr)),
            Subject::Console => Err(TribunalError::UnsupportedRole {
                tag: subject.tag(),
                role: "victim",
            }),
        }
    }
}

impl From<Victim> for Subject {
    fn from(victim: Victim) -> Self {
        match victim {
            Victim::Player(uuid) => Self::Player(uuid),
            Victim::Address(addr) => Self::Address(addr),
        }
    }
}

/// The issuing side of a punishment: a player or the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Player(Uuid),
    Console,
}

impl TryFrom<Subject> for Operator {
    type Error = TribunalError;

    fn try_from(subject: Subject) -> TribunalResult<Self> {
        match subject {
            Subject::Player(uuid) => Ok(Self::Player(uuid)),
            Subject::Console => Ok(Self::Console),
            Subject::Address(_) => Err(TribunalError::UnsupportedRole {
                tag: subject.tag(),
                role: "operator",
            }),
        }
    }
}

impl From<Operator> for Subject {
    fn from(operator: Operator) -> Self {
        match operator {
            Operator::Player(uuid) => Self::Player(uuid),
            Operator::Console => Self::Console,
        }
    }
}

/// Expand a 32-character short UUID into canonical dashed form.
///
/// Dashes are inserted at offsets 8, 13, 18 and 23 of the output. The input
/// must be 32 ASCII characters; callers gate on length and character set.
#[must_use]
pub fn expand_uuid(short: &str) -> String {
    debug_assert!(short.len() == LENGTH_OF_SHORT_UUID && short.is_ascii());
    format!(
        "{}-{}-{}-{}-{}",
        &short[0..8],
        &short[8..12],
        &short[12..16],
        &short[16..20],
        &short[20..32]
    )
}

/// Parses raw textual input into a canonical [`Subject`]
///
/// Resolution is ordered, first match wins: address literal, full UUID,
/// short UUID, console alias. UUID-shaped input is validated against the
/// identity cache and fails closed when unknown.
pub struct SubjectResolver {
    identity: Arc<dyn IdentityCache>,
    console_display: String,
}

impl SubjectResolver {
    /// Create a resolver over the given identity cache
    pub fn new(identity: Arc<dyn IdentityCache>, console_display: impl Into<String>) -> Self {
        Self {
            identity,
            console_display: console_display.into(),
        }
    }

    /// Parse a raw string into a subject
    ///
    /// When `consolable` is set, input case-insensitively equal to the
    /// configured console display string resolves to [`Subject::Console`].
    ///
    /// # Errors
    /// Returns [`TribunalError::InvalidFormat`] when the input matches no
    /// recognized shape and [`TribunalError::InvalidIdentity`] when a
    /// well-formed UUID is unknown to the identity cache.
    pub fn parse(&self, raw: &str, consolable: bool) -> TribunalResult<Subject> {
        if let Ok(addr) = raw.parse::<IpAddr>() {
            return Ok(Subject::Address(addr));
        }
        if raw.len() == LENGTH_OF_FULL_UUID {
            let uuid = Uuid::try_parse(raw)
                .map_err(|_| TribunalError::InvalidFormat(raw.to_string()))?;
            return self.checked_player(uuid);
        }
        if raw.len() == LENGTH_OF_SHORT_UUID && raw.is_ascii() {
            let uuid = Uuid::try_parse(&expand_uuid(raw))
                .map_err(|_| TribunalError::InvalidFormat(raw.to_string()))?;
            return self.checked_player(uuid);
        }
        if consolable && raw.eq_ignore_ascii_case(&self.console_display) {
            return Ok(Subject::Console);
        }
        Err(TribunalError::InvalidFormat(raw.to_string()))
    }

    fn checked_player(&self, uuid: Uuid) -> TribunalResult<Subject> {
        if self.identity.uuid_exists(uuid) {
            Ok(Subject::Player(uuid))
        } else {
            Err(TribunalError::InvalidIdentity(uuid))
        }
    }
}
